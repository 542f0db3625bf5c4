use crate::error::RecordError;
use crate::operand::Operand;
use crate::spooky_value::{Mapping, SpookyValue};
use crate::types::{FieldDescriptor, FieldType};
use crate::value::{RecordValue, Value};
use std::borrow::Cow;

// ─── KeyResolver ────────────────────────────────────────────────────────────

/// Decides which mapping key a record field is read from.
///
/// Generic mappings are keyed by field name ([`FieldNames`]); the codec keys
/// documents by field tag.
pub trait KeyResolver {
    /// Key for `field`, or `None` if the field takes no part.
    fn key<'f>(&self, field: &'f FieldDescriptor) -> Option<Cow<'f, str>>;
}

/// Keys are exactly the field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNames;

impl KeyResolver for FieldNames {
    #[inline]
    fn key<'f>(&self, field: &'f FieldDescriptor) -> Option<Cow<'f, str>> {
        Some(Cow::Borrowed(field.name()))
    }
}

// ─── Record → Mapping ───────────────────────────────────────────────────────

/// Flatten a record into a generic mapping keyed by field name. Nested
/// records become nested objects.
pub fn flatten(src: &RecordValue) -> Mapping {
    let mut dst = Mapping::new();
    flatten_into(&mut dst, src);
    dst
}

/// Like [`flatten`], but writes into an existing mapping. Keys already present
/// are overwritten, unrelated keys are kept.
pub fn flatten_into(dst: &mut Mapping, src: &RecordValue) {
    for (field, value) in src.iter_fields() {
        dst.insert(field.name.clone(), to_spooky(value));
    }
}

pub(crate) fn to_spooky(value: &Value) -> SpookyValue {
    match value {
        Value::Bool(b) => SpookyValue::from(*b),
        Value::I64(i) => SpookyValue::from(*i),
        Value::U64(u) => SpookyValue::from(*u),
        Value::F64(f) => SpookyValue::from(*f),
        Value::Str(s) => SpookyValue::Str(s.clone()),
        Value::Bytes(b) => SpookyValue::Bytes(b.clone()),
        Value::List(items) => SpookyValue::Array(items.iter().map(to_spooky).collect()),
        Value::Record(rv) => SpookyValue::Object(flatten(rv)),
    }
}

/// Flatten the record behind `src`, which must be a reference to a record.
pub fn to_mapping<'a>(src: impl Into<Operand<'a>>) -> Result<Mapping, RecordError> {
    let src = src.into();
    Ok(flatten(src.record_ref("src")?))
}

// ─── Mapping → Record ───────────────────────────────────────────────────────

/// Assign every field of `dst` whose name is a key of `src`. Keys unknown to
/// the record are ignored.
///
/// Either every matching field is assigned or, on a value that does not fit
/// its field, nothing is.
pub fn fill(dst: &mut RecordValue, src: &Mapping) -> Result<(), RecordError> {
    assign(dst, src, &FieldNames)
}

/// [`fill`] through a dynamic destination, which must be a writable
/// reference to a record.
pub fn from_mapping<'a>(dst: impl Into<Operand<'a>>, src: &Mapping) -> Result<(), RecordError> {
    let mut dst = dst.into();
    fill(dst.record_mut("dst")?, src)
}

pub(crate) fn assign<K>(dst: &mut RecordValue, src: &Mapping, keys: &K) -> Result<(), RecordError>
where
    K: KeyResolver + ?Sized,
{
    let mut staged = dst.clone();
    assign_in_place(&mut staged, src, keys)?;
    *dst = staged;
    Ok(())
}

fn assign_in_place<K>(dst: &mut RecordValue, src: &Mapping, keys: &K) -> Result<(), RecordError>
where
    K: KeyResolver + ?Sized,
{
    for (pos, field) in dst.ty.fields().iter().enumerate() {
        let Some(key) = keys.key(field) else {
            continue;
        };
        let Some(incoming) = src.get(key.as_ref()) else {
            continue;
        };
        match (&mut dst.values[pos], incoming) {
            // Nested objects merge into the record already in place.
            (Value::Record(nested), SpookyValue::Object(map)) => {
                assign_in_place(nested, map, keys)?
            }
            (slot, incoming) => *slot = convert(field, field.ty(), incoming, keys)?,
        }
    }
    Ok(())
}

/// Convert an untyped value to `ty`. Null becomes the zero value; integers
/// convert only when lossless.
fn convert<K>(
    field: &FieldDescriptor,
    ty: &FieldType,
    incoming: &SpookyValue,
    keys: &K,
) -> Result<Value, RecordError>
where
    K: KeyResolver + ?Sized,
{
    if incoming.is_null() {
        return Ok(ty.zero_value());
    }
    let converted = match (ty, incoming) {
        (FieldType::Bool, _) => incoming.as_bool().map(Value::Bool),
        (FieldType::I64, _) => incoming.as_i64().map(Value::I64),
        (FieldType::U64, _) => incoming.as_u64().map(Value::U64),
        (FieldType::F64, _) => incoming.as_f64().map(Value::F64),
        (FieldType::Str, SpookyValue::Str(s)) => Some(Value::Str(s.clone())),
        (FieldType::Bytes, SpookyValue::Bytes(b)) => Some(Value::Bytes(b.clone())),
        (FieldType::Bytes, SpookyValue::Array(items)) => items
            .iter()
            .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Value::Bytes),
        (FieldType::List(elem), SpookyValue::Array(items)) => {
            let items = items
                .iter()
                .map(|item| convert(field, elem, item, keys))
                .collect::<Result<Vec<_>, _>>()?;
            Some(Value::List(items))
        }
        (FieldType::Record(rt), SpookyValue::Object(map)) => {
            let mut rv = rt.instantiate();
            assign_in_place(&mut rv, map, keys)?;
            Some(Value::Record(rv))
        }
        _ => None,
    };
    converted.ok_or_else(|| RecordError::ValueMismatch {
        field: field.name.clone(),
        expected: ty.to_string(),
    })
}
