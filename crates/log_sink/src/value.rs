//! The typed value carried by key/value pairs, and the network address types it recognizes.

use std::{
    borrow::Cow,
    error::Error,
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    sync::Arc,
    time::{Duration, SystemTime},
};

use time::OffsetDateTime;

/// A shared error value, as carried by [`Value::Error`] and [`Value::Errors`].
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// A single key or value in a key/value sequence passed to a [`Logger`][crate::Logger].
///
/// Keys and values travel in one flat sequence (`key, value, key, value, ...`), so keys are
/// `Value`s too. Only [`Value::Str`] is accepted as a key; anything else is replaced by a
/// placeholder key when the event is encoded.
///
/// Every variant except the last three maps onto a dedicated field setter of the
/// [`Event`][crate::Event] it is written to.
#[derive(Clone, Debug)]
pub enum Value {
    /// Text.
    Str(Cow<'static, str>),
    /// A byte sequence.
    Bytes(Vec<u8>),
    /// A boolean.
    Bool(bool),
    /// An `i8`.
    I8(i8),
    /// An `i16`.
    I16(i16),
    /// An `i32`.
    I32(i32),
    /// An `i64`.
    I64(i64),
    /// An `isize`.
    Isize(isize),
    /// A `u8`.
    U8(u8),
    /// A `u16`.
    U16(u16),
    /// A `u32`.
    U32(u32),
    /// A `u64`.
    U64(u64),
    /// A `usize`.
    Usize(usize),
    /// An `f32`.
    F32(f32),
    /// An `f64`.
    F64(f64),
    /// An absolute point in time.
    Time(OffsetDateTime),
    /// A span of time.
    Duration(Duration),
    /// A list of strings.
    Strs(Vec<String>),
    /// A list of booleans.
    Bools(Vec<bool>),
    /// A list of `i8`s.
    I8s(Vec<i8>),
    /// A list of `i16`s.
    I16s(Vec<i16>),
    /// A list of `i32`s.
    I32s(Vec<i32>),
    /// A list of `i64`s.
    I64s(Vec<i64>),
    /// A list of `isize`s.
    Isizes(Vec<isize>),
    /// A list of `u16`s.
    U16s(Vec<u16>),
    /// A list of `u32`s.
    U32s(Vec<u32>),
    /// A list of `u64`s.
    U64s(Vec<u64>),
    /// A list of `usize`s.
    Usizes(Vec<usize>),
    /// A list of `f32`s.
    F32s(Vec<f32>),
    /// A list of `f64`s.
    F64s(Vec<f64>),
    /// A list of points in time.
    Times(Vec<OffsetDateTime>),
    /// A list of time spans.
    Durations(Vec<Duration>),
    /// An IPv4 or IPv6 address.
    IpAddr(IpAddr),
    /// A subnet.
    IpPrefix(IpPrefix),
    /// A hardware (MAC) address.
    HardwareAddr(HardwareAddr),
    /// An already-encoded JSON value, attached verbatim.
    Json(serde_json::Value),
    /// A single error.
    Error(SharedError),
    /// A list of errors.
    Errors(Vec<SharedError>),
    /// Anything else, rendered through its [`Debug`][fmt::Debug] implementation.
    Any(Arc<dyn fmt::Debug + Send + Sync + 'static>),
}

impl Value {
    /// Wraps an error value.
    pub fn error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Error(Arc::new(err))
    }

    /// Wraps a list of errors.
    pub fn errors<I, E>(errs: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Error + Send + Sync + 'static,
    {
        Self::Errors(
            errs.into_iter()
                .map(|err| -> SharedError { Arc::new(err) })
                .collect(),
        )
    }

    /// Wraps a value of a type with no dedicated representation.
    pub fn debug<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self::Any(Arc::new(value))
    }

    /// Encodes a [`serde::Serialize`] value as JSON up front.
    ///
    /// If serialization fails, the value is kept through its `Debug` representation instead.
    pub fn serialized<T>(value: &T) -> Self
    where
        T: serde::Serialize + fmt::Debug + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(json) => Self::Json(json),
            Err(_) => Self::Any(Arc::new(format!("{value:?}"))),
        }
    }

    /// Returns the text if this value is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }
}

/// An IP network: an address and the length of its routing prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpPrefix {
    /// Creates a prefix, returning `None` if `prefix_len` is longer than the address.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Option<Self> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        (prefix_len <= max).then_some(Self { addr, prefix_len })
    }

    /// The network address.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// The prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

/// A hardware (link-layer) address, such as a 48-bit MAC address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HardwareAddr(Vec<u8>);

impl HardwareAddr {
    /// Creates a hardware address from its raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 6]> for HardwareAddr {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    Vec<u8> => Bytes,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    OffsetDateTime => Time,
    Duration => Duration,
    Vec<String> => Strs,
    Vec<bool> => Bools,
    Vec<i8> => I8s,
    Vec<i16> => I16s,
    Vec<i32> => I32s,
    Vec<i64> => I64s,
    Vec<isize> => Isizes,
    Vec<u16> => U16s,
    Vec<u32> => U32s,
    Vec<u64> => U64s,
    Vec<usize> => Usizes,
    Vec<f32> => F32s,
    Vec<f64> => F64s,
    Vec<OffsetDateTime> => Times,
    Vec<Duration> => Durations,
    IpAddr => IpAddr,
    IpPrefix => IpPrefix,
    HardwareAddr => HardwareAddr,
    serde_json::Value => Json,
    SharedError => Error,
    Vec<SharedError> => Errors,
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(value: Cow<'static, str>) -> Self {
        Self::Str(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Self::Strs(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<SystemTime> for Value {
    fn from(value: SystemTime) -> Self {
        Self::Time(OffsetDateTime::from(value))
    }
}

impl From<Ipv4Addr> for Value {
    fn from(value: Ipv4Addr) -> Self {
        Self::IpAddr(IpAddr::V4(value))
    }
}

impl From<Ipv6Addr> for Value {
    fn from(value: Ipv6Addr) -> Self {
        Self::IpAddr(IpAddr::V6(value))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Json(serde_json::Value::Null), Into::into)
    }
}
