use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::convert::TryFrom;

/// Generic mapping: field name → untyped value. Nested records appear as
/// nested [`SpookyValue::Object`]s.
pub type Mapping = BTreeMap<SmolStr, SpookyValue>;

// ─── SpookyNumber ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
pub enum SpookyNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl std::fmt::Debug for SpookyNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpookyNumber::I64(i) => write!(f, "I64({})", i),
            SpookyNumber::U64(u) => write!(f, "U64({})", u),
            SpookyNumber::F64(v) => write!(f, "F64({})", v),
        }
    }
}

impl SpookyNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            SpookyNumber::I64(i) => i as f64,
            SpookyNumber::U64(u) => u as f64,
            SpookyNumber::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            SpookyNumber::I64(i) => Some(i),
            SpookyNumber::U64(u) => i64::try_from(u).ok(),
            SpookyNumber::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            SpookyNumber::U64(u) => Some(u),
            SpookyNumber::I64(i) => u64::try_from(i).ok(),
            SpookyNumber::F64(f) => {
                if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
                    Some(f as u64)
                } else {
                    None
                }
            }
        }
    }
}

// ─── SpookyValue ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpookyValue {
    #[default]
    Null,
    Bool(bool),
    Number(SpookyNumber),
    Str(SmolStr),
    Bytes(Vec<u8>),
    Array(Vec<SpookyValue>),
    Object(Mapping),
}

impl SpookyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SpookyValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<SpookyNumber> {
        match self {
            SpookyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(SpookyNumber::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number()?.as_i64()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_number()?.as_u64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SpookyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Mapping> {
        match self {
            SpookyValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&SpookyValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SpookyValue::Null)
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for SpookyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SpookyValue::Null => serializer.serialize_none(),
            SpookyValue::Bool(b) => serializer.serialize_bool(*b),
            SpookyValue::Number(n) => match n {
                SpookyNumber::I64(i) => serializer.serialize_i64(*i),
                SpookyNumber::U64(u) => serializer.serialize_u64(*u),
                SpookyNumber::F64(f) => serializer.serialize_f64(*f),
            },
            SpookyValue::Str(s) => serializer.serialize_str(s.as_str()),
            SpookyValue::Bytes(b) => serializer.serialize_bytes(b),
            SpookyValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            SpookyValue::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for SpookyValue {
    fn from(n: f64) -> Self {
        SpookyValue::Number(SpookyNumber::F64(n))
    }
}

impl From<i64> for SpookyValue {
    fn from(n: i64) -> Self {
        SpookyValue::Number(SpookyNumber::I64(n))
    }
}

impl From<u64> for SpookyValue {
    fn from(n: u64) -> Self {
        SpookyValue::Number(SpookyNumber::U64(n))
    }
}

impl From<bool> for SpookyValue {
    fn from(b: bool) -> Self {
        SpookyValue::Bool(b)
    }
}

impl From<&str> for SpookyValue {
    fn from(s: &str) -> Self {
        SpookyValue::Str(SmolStr::from(s))
    }
}

impl From<String> for SpookyValue {
    fn from(s: String) -> Self {
        SpookyValue::Str(SmolStr::from(s))
    }
}

impl From<Vec<u8>> for SpookyValue {
    fn from(b: Vec<u8>) -> Self {
        SpookyValue::Bytes(b)
    }
}

impl From<Mapping> for SpookyValue {
    fn from(map: Mapping) -> Self {
        SpookyValue::Object(map)
    }
}

// ─── From<cbor4ii::core::Value> ─────────────────────────────────────────────

impl From<cbor4ii::core::Value> for SpookyValue {
    fn from(v: cbor4ii::core::Value) -> Self {
        match v {
            cbor4ii::core::Value::Null => SpookyValue::Null,
            cbor4ii::core::Value::Bool(b) => SpookyValue::Bool(b),
            cbor4ii::core::Value::Integer(i) => {
                if let Ok(val) = i64::try_from(i) {
                    SpookyValue::Number(SpookyNumber::I64(val))
                } else if let Ok(val) = u64::try_from(i) {
                    SpookyValue::Number(SpookyNumber::U64(val))
                } else {
                    SpookyValue::Number(SpookyNumber::F64(i as f64))
                }
            }
            cbor4ii::core::Value::Float(f) => SpookyValue::Number(SpookyNumber::F64(f)),
            cbor4ii::core::Value::Bytes(b) => SpookyValue::Bytes(b),
            cbor4ii::core::Value::Text(s) => SpookyValue::Str(SmolStr::from(s)),
            cbor4ii::core::Value::Array(arr) => {
                SpookyValue::Array(arr.into_iter().map(SpookyValue::from).collect())
            }
            cbor4ii::core::Value::Map(map) => SpookyValue::Object(
                map.into_iter()
                    .map(|(k, v)| {
                        let key = match k {
                            cbor4ii::core::Value::Text(s) => SmolStr::from(s),
                            cbor4ii::core::Value::Integer(i) => SmolStr::from(i.to_string()),
                            other => SmolStr::from(format!("{:?}", other)),
                        };
                        (key, SpookyValue::from(v))
                    })
                    .collect(),
            ),
            _ => SpookyValue::Null,
        }
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

impl From<serde_json::Value> for SpookyValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => SpookyValue::Null,
            serde_json::Value::Bool(b) => SpookyValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SpookyValue::Number(SpookyNumber::I64(i))
                } else if let Some(u) = n.as_u64() {
                    SpookyValue::Number(SpookyNumber::U64(u))
                } else {
                    SpookyValue::Number(SpookyNumber::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => SpookyValue::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                SpookyValue::Array(arr.into_iter().map(SpookyValue::from).collect())
            }
            serde_json::Value::Object(obj) => SpookyValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), SpookyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<SpookyValue> for serde_json::Value {
    fn from(val: SpookyValue) -> Self {
        match val {
            SpookyValue::Null => serde_json::Value::Null,
            SpookyValue::Bool(b) => serde_json::Value::Bool(b),
            SpookyValue::Number(n) => match n {
                SpookyNumber::I64(i) => serde_json::json!(i),
                SpookyNumber::U64(u) => serde_json::json!(u),
                SpookyNumber::F64(f) => serde_json::json!(f),
            },
            SpookyValue::Str(s) => serde_json::Value::String(s.to_string()),
            SpookyValue::Bytes(b) => {
                serde_json::Value::Array(b.into_iter().map(serde_json::Value::from).collect())
            }
            SpookyValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(|v| v.into()).collect())
            }
            SpookyValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Build a [`SpookyValue::Object`] literal; nested `{ … }` become nested
/// objects, anything else goes through `SpookyValue::from`.
///
/// ```
/// use spooky_shape::spooky_obj;
/// let v = spooky_obj!({ "Name" => "Alice", "Profile" => { "Level" => 3i64 } });
/// assert_eq!(v.get("Name").and_then(|n| n.as_str()), Some("Alice"));
/// ```
#[macro_export]
macro_rules! spooky_obj {
    (@entries $map:ident;) => {};

    (@entries $map:ident; $key:expr => { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::__private::SmolStr::new($key),
            $crate::spooky_obj!({ $($inner)* }),
        );
        $crate::spooky_obj!(@entries $map; $($($rest)*)?);
    };

    (@entries $map:ident; $key:expr => $val:expr $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::__private::SmolStr::new($key),
            $crate::spooky_value::SpookyValue::from($val),
        );
        $crate::spooky_obj!(@entries $map; $($($rest)*)?);
    };

    ({ $($body:tt)* }) => {{
        let mut map = $crate::spooky_value::Mapping::new();
        $crate::spooky_obj!(@entries map; $($body)*);
        $crate::spooky_value::SpookyValue::Object(map)
    }};
}
