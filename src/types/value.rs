//! MessagePack value model.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Type alias for MessagePack maps (arbitrary value keys).
pub type ValueMap = HashMap<Value, Value>;

/// A MessagePack value.
///
/// `Int` and `UInt` compare equal when they hold the same non-negative
/// number. `Float32` and `Float64` never compare equal to each other, and
/// floats of the same width compare by bit pattern so that `Value` can be
/// a map key.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    Map(ValueMap),
    /// Application-defined type tag plus opaque payload.
    Extended(i8, Vec<u8>),
}

impl Value {
    /// Builds a map from key/value pairs. A repeated key keeps the last value.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Builds an extended value.
    pub fn ext(type_tag: i8, data: impl Into<Vec<u8>>) -> Self {
        Self::Extended(type_tag, data.into())
    }

    /// Number of elements in an `Array` or entries in a `Map`.
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Array(items) => Some(items.len()),
            Self::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Element at `index` of an `Array`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Entry for `key` in a `Map`.
    pub fn get_key(&self, key: &Value) -> Option<&Value> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an `Int` or a `UInt` that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Returns the value as a u64, if it is a `UInt` or a non-negative `Int`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(u) => Some(*u),
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Returns either float variant as an f32 (doubles are narrowed).
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(f) => Some(*f),
            Self::Float64(f) => Some(*f as f32),
            _ => None,
        }
    }

    /// Returns either float variant as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(f) => Some(f64::from(*f)),
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string reference, if it is a `Str` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text view that also accepts `Bin`, mapping each byte to one char.
    ///
    /// Pairs with compatibility-mode decoding, where old-format strings
    /// arrive as `Bin`.
    pub fn string_value(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Str(s) => Some(Cow::Borrowed(s)),
            Self::Bin(data) => Some(Cow::Owned(data.iter().copied().map(char::from).collect())),
            _ => None,
        }
    }

    /// Payload of a `Bin` or `Extended` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bin(data) | Self::Extended(_, data) => Some(data),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_extended(&self) -> Option<(i8, &[u8])> {
        match self {
            Self::Extended(t, data) => Some((*t, data.as_slice())),
            _ => None,
        }
    }

    pub fn extended_type(&self) -> Option<i8> {
        match self {
            Self::Extended(t, _) => Some(*t),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Int(i), Self::UInt(u)) | (Self::UInt(u), Self::Int(i)) => {
                u64::try_from(*i).is_ok_and(|i| i == *u)
            }
            (Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
            (Self::Float64(a), Self::Float64(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bin(a), Self::Bin(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Extended(ta, da), Self::Extended(tb, db)) => ta == tb && da == db,
            _ => false,
        }
    }
}

impl Eq for Value {}

// Discriminants fed to the hasher. Non-negative integers share one so that
// `Int(n)` and `UInt(n)` hash alike.
const HASH_NIL: u8 = 0;
const HASH_BOOL: u8 = 1;
const HASH_UNSIGNED: u8 = 2;
const HASH_NEGATIVE: u8 = 3;
const HASH_FLOAT32: u8 = 4;
const HASH_FLOAT64: u8 = 5;
const HASH_STR: u8 = 6;
const HASH_BIN: u8 = 7;
const HASH_ARRAY: u8 = 8;
const HASH_MAP: u8 = 9;
const HASH_EXTENDED: u8 = 10;

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Nil => state.write_u8(HASH_NIL),
            Self::Bool(b) => {
                state.write_u8(HASH_BOOL);
                b.hash(state);
            }
            Self::Int(i) => match u64::try_from(*i) {
                Ok(u) => {
                    state.write_u8(HASH_UNSIGNED);
                    u.hash(state);
                }
                Err(_) => {
                    state.write_u8(HASH_NEGATIVE);
                    i.hash(state);
                }
            },
            Self::UInt(u) => {
                state.write_u8(HASH_UNSIGNED);
                u.hash(state);
            }
            Self::Float32(f) => {
                state.write_u8(HASH_FLOAT32);
                f.to_bits().hash(state);
            }
            Self::Float64(f) => {
                state.write_u8(HASH_FLOAT64);
                f.to_bits().hash(state);
            }
            Self::Str(s) => {
                state.write_u8(HASH_STR);
                s.hash(state);
            }
            Self::Bin(data) => {
                state.write_u8(HASH_BIN);
                data.hash(state);
            }
            Self::Array(items) => {
                state.write_u8(HASH_ARRAY);
                items.hash(state);
            }
            Self::Map(map) => {
                state.write_u8(HASH_MAP);
                state.write_usize(map.len());
                // Entry order is unspecified, so combine per-entry hashes commutatively.
                let combined = map.iter().fold(0u64, |acc, (k, v)| {
                    let mut entry = DefaultHasher::new();
                    k.hash(&mut entry);
                    v.hash(&mut entry);
                    acc.wrapping_add(entry.finish())
                });
                state.write_u64(combined);
            }
            Self::Extended(t, data) => {
                state.write_u8(HASH_EXTENDED);
                t.hash(state);
                data.hash(state);
            }
        }
    }
}

struct HexBytes<'a>(&'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "0x{byte:02x}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "Nil"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Int(i) => write!(f, "Int({i})"),
            Self::UInt(u) => write!(f, "UInt({u})"),
            Self::Float32(v) => write!(f, "Float({v:?})"),
            Self::Float64(v) => write!(f, "Double({v:?})"),
            Self::Str(s) => write!(f, "String({s})"),
            Self::Bin(data) => write!(f, "Data({})", HexBytes(data)),
            Self::Array(items) => {
                write!(f, "Array([")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "])")
            }
            Self::Map(map) => {
                if map.is_empty() {
                    return write!(f, "Map([:])");
                }
                write!(f, "Map([")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "])")
            }
            Self::Extended(t, data) => write!(f, "Extended({t}, {})", HexBytes(data)),
        }
    }
}
