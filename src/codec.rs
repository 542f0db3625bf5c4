use crate::error::RecordError;
use crate::mapping::{self, KeyResolver};
use crate::spooky_value::SpookyValue;
use crate::tag::{self, TagName};
use crate::types::FieldDescriptor;
use crate::value::{RecordValue, Value};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::borrow::Cow;

// ─── Options ────────────────────────────────────────────────────────────────

/// How a field without a usable tag name is keyed in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFallback {
    #[default]
    FieldName,
    Lowercase,
}

/// Which part of a field tag names the field in encoded documents.
///
/// With `tag_key = "json"` a tag `json:"name,omitempty"` keys the field as
/// `name`. An empty `tag_key` takes the whole tag as `name[,options]`.
/// `-` excludes a field; a missing or empty name uses `fallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    pub tag_key: SmolStr,
    pub fallback: KeyFallback,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            tag_key: SmolStr::new("json"),
            fallback: KeyFallback::FieldName,
        }
    }
}

impl CodecOptions {
    pub fn new(tag_key: impl Into<SmolStr>) -> Self {
        Self {
            tag_key: tag_key.into(),
            ..Self::default()
        }
    }

    /// The whole tag is the key.
    pub fn whole_tag() -> Self {
        Self::new("")
    }

    pub fn with_fallback(mut self, fallback: KeyFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Document key for `field` and whether zero values are omitted.
    fn resolve<'f>(&self, field: &'f FieldDescriptor) -> Option<(Cow<'f, str>, bool)> {
        let fallback = move || match self.fallback {
            KeyFallback::FieldName => Cow::Borrowed(field.name()),
            KeyFallback::Lowercase => Cow::Owned(field.name().to_lowercase()),
        };

        let value: Cow<'f, str> = if self.tag_key.is_empty() {
            Cow::Borrowed(field.tag())
        } else {
            match tag::lookup(field.tag(), &self.tag_key) {
                Some(value) => Cow::Owned(value),
                None => return Some((fallback(), false)),
            }
        };

        let parsed = TagName::parse(&value);
        if parsed.is_skipped() {
            return None;
        }
        let omit_empty = parsed.has_option("omitempty");
        let key = if parsed.name.is_empty() {
            fallback()
        } else {
            Cow::Owned(parsed.name.to_owned())
        };
        Some((key, omit_empty))
    }
}

impl KeyResolver for CodecOptions {
    fn key<'f>(&self, field: &'f FieldDescriptor) -> Option<Cow<'f, str>> {
        self.resolve(field).map(|(key, _)| key)
    }
}

// ─── Encoding ───────────────────────────────────────────────────────────────

/// A record ready for any serde serializer, keyed by tag.
pub struct Encoded<'a> {
    record: &'a RecordValue,
    options: &'a CodecOptions,
}

pub fn encode<'a>(record: &'a RecordValue, options: &'a CodecOptions) -> Encoded<'a> {
    Encoded { record, options }
}

impl Serialize for Encoded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries = Vec::with_capacity(self.record.values().len());
        for (field, value) in self.record.iter_fields() {
            let Some((key, omit_empty)) = self.options.resolve(field) else {
                continue;
            };
            if omit_empty && *value == field.ty().zero_value() {
                continue;
            }
            entries.push((key, value));
        }

        let mut m = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            m.serialize_entry(
                key.as_ref(),
                &EncodedValue {
                    value,
                    options: self.options,
                },
            )?;
        }
        m.end()
    }
}

struct EncodedValue<'a> {
    value: &'a Value,
    options: &'a CodecOptions,
}

impl Serialize for EncodedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I64(i) => serializer.serialize_i64(*i),
            Value::U64(u) => serializer.serialize_u64(*u),
            Value::F64(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for value in items {
                    seq.serialize_element(&EncodedValue {
                        value,
                        options: self.options,
                    })?;
                }
                seq.end()
            }
            Value::Record(rv) => encode(rv, self.options).serialize(serializer),
        }
    }
}

pub fn to_json(record: &RecordValue, options: &CodecOptions) -> Result<String, RecordError> {
    serde_json::to_string(&encode(record, options)).map_err(|e| RecordError::Json(e.to_string()))
}

pub fn to_cbor(record: &RecordValue, options: &CodecOptions) -> Result<Vec<u8>, RecordError> {
    let mut buf = Vec::new();
    cbor4ii::serde::to_writer(&mut buf, &encode(record, options))
        .map_err(|e| RecordError::Cbor(e.to_string()))?;
    Ok(buf)
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Assign the fields of `dst` from a parsed document, keyed by tag.
///
/// Same rules as [`mapping::fill`]: unknown keys are ignored, absent fields
/// keep their value, nothing is written if any value does not fit.
pub fn decode(
    dst: &mut RecordValue,
    doc: &SpookyValue,
    options: &CodecOptions,
) -> Result<(), RecordError> {
    match doc {
        SpookyValue::Object(map) => mapping::assign(dst, map, options),
        SpookyValue::Null => Ok(()),
        _ => Err(RecordError::ValueMismatch {
            field: SmolStr::default(),
            expected: dst.record_type().to_string(),
        }),
    }
}

pub fn from_json(
    dst: &mut RecordValue,
    input: &str,
    options: &CodecOptions,
) -> Result<(), RecordError> {
    let doc: serde_json::Value =
        serde_json::from_str(input).map_err(|e| RecordError::Json(e.to_string()))?;
    decode(dst, &SpookyValue::from(doc), options)
}

pub fn from_cbor(
    dst: &mut RecordValue,
    input: &[u8],
    options: &CodecOptions,
) -> Result<(), RecordError> {
    let doc: cbor4ii::core::Value =
        cbor4ii::serde::from_slice(input).map_err(|e| RecordError::Cbor(e.to_string()))?;
    decode(dst, &SpookyValue::from(doc), options)
}
