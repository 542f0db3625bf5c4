use crate::error::RecordError;
use crate::types::{FieldDescriptor, FieldType, RecordType};
use smol_str::SmolStr;
use std::ops::Deref;
use std::sync::Arc;

// ─── Value ──────────────────────────────────────────────────────────────────

/// A typed field value. Every value held by a [`RecordValue`] conforms to the
/// declared [`FieldType`] of its field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(SmolStr),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Record(RecordValue),
}

impl FieldType {
    /// The zero value of this type: false, 0, 0.0, "", empty, or a record
    /// whose fields are all zero.
    pub fn zero_value(&self) -> Value {
        match self {
            FieldType::Bool => Value::Bool(false),
            FieldType::I64 => Value::I64(0),
            FieldType::U64 => Value::U64(0),
            FieldType::F64 => Value::F64(0.0),
            FieldType::Str => Value::Str(SmolStr::default()),
            FieldType::Bytes => Value::Bytes(Vec::new()),
            FieldType::List(_) => Value::List(Vec::new()),
            FieldType::Record(rt) => Value::Record(RecordValue::zero(Arc::clone(rt))),
        }
    }
}

impl Value {
    /// Whether this value may be stored in a field of type `ty`.
    pub fn conforms_to(&self, ty: &FieldType) -> bool {
        match (self, ty) {
            (Value::Bool(_), FieldType::Bool)
            | (Value::I64(_), FieldType::I64)
            | (Value::U64(_), FieldType::U64)
            | (Value::F64(_), FieldType::F64)
            | (Value::Str(_), FieldType::Str)
            | (Value::Bytes(_), FieldType::Bytes) => true,
            (Value::List(items), FieldType::List(elem)) => {
                items.iter().all(|item| item.conforms_to(elem))
            }
            (Value::Record(rv), FieldType::Record(rt)) => rv.ty == *rt,
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut RecordValue> {
        match self {
            Value::Record(rv) => Some(rv),
            _ => None,
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::I64(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::U64(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::F64(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<RecordValue> for Value {
    fn from(rv: RecordValue) -> Self {
        Value::Record(rv)
    }
}

// ─── RecordValue ────────────────────────────────────────────────────────────

/// One live instance of a record type. `values[i]` belongs to field `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub(crate) ty: Arc<RecordType>,
    pub(crate) values: Vec<Value>,
}

impl RecordValue {
    pub(crate) fn zero(ty: Arc<RecordType>) -> Self {
        let values = ty.fields().iter().map(|f| f.ty().zero_value()).collect();
        Self { ty, values }
    }

    /// Build an instance from values given in field order.
    pub fn from_values(ty: Arc<RecordType>, values: Vec<Value>) -> Result<Self, RecordError> {
        if values.len() != ty.len() {
            return Err(RecordError::ValueMismatch {
                field: SmolStr::default(),
                expected: format!("{} values for {}", ty.len(), ty),
            });
        }
        for (field, value) in ty.fields().iter().zip(&values) {
            if !value.conforms_to(field.ty()) {
                return Err(RecordError::ValueMismatch {
                    field: field.name.clone(),
                    expected: field.ty().to_string(),
                });
            }
        }
        Ok(Self { ty, values })
    }

    #[inline]
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.ty.position(name).map(|pos| &self.values[pos])
    }

    #[inline]
    pub fn get_at(&self, pos: usize) -> Option<&Value> {
        self.values.get(pos)
    }

    /// Mutable access to a nested record field, one field at a time.
    pub fn get_record_mut(&mut self, name: &str) -> Option<NestedMut<'_>> {
        let pos = self.ty.position(name)?;
        let record = self.values[pos].as_record_mut()?;
        Some(NestedMut { record })
    }

    /// Overwrite one field. The value must conform to the declared type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let pos = self
            .ty
            .position(name)
            .ok_or_else(|| RecordError::FieldNotFound(SmolStr::new(name)))?;
        let value = value.into();
        let field = &self.ty.fields()[pos];
        if !value.conforms_to(field.ty()) {
            return Err(RecordError::ValueMismatch {
                field: field.name.clone(),
                expected: field.ty().to_string(),
            });
        }
        self.values[pos] = value;
        Ok(())
    }

    /// Iterate over `(field, value)` pairs in declaration order.
    #[inline]
    pub fn iter_fields(&self) -> FieldIter<'_> {
        FieldIter {
            record: self,
            pos: 0,
        }
    }
}

// ─── NestedMut ──────────────────────────────────────────────────────────────

/// A nested record borrowed for writing. Its fields go through
/// [`RecordValue::set`]; the record itself cannot be replaced, so it keeps
/// the type its parent field declares.
///
/// ```compile_fail
/// use spooky_shape::{FieldDescriptor, FieldType, RecordType};
/// use std::sync::Arc;
///
/// let inner = RecordType::synthesize(vec![FieldDescriptor::new("A", FieldType::Bool, "")]).unwrap();
/// let outer = Arc::new(
///     RecordType::synthesize(vec![FieldDescriptor::new("In", FieldType::record(inner), "")]).unwrap(),
/// );
/// let other = Arc::new(RecordType::synthesize(Vec::new()).unwrap());
/// let mut rv = outer.instantiate();
/// *rv.get_record_mut("In").unwrap() = other.instantiate();
/// ```
#[derive(Debug)]
pub struct NestedMut<'a> {
    record: &'a mut RecordValue,
}

impl NestedMut<'_> {
    #[inline]
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        self.record.set(name, value)
    }

    #[inline]
    pub fn get_record_mut(&mut self, name: &str) -> Option<NestedMut<'_>> {
        self.record.get_record_mut(name)
    }
}

impl Deref for NestedMut<'_> {
    type Target = RecordValue;

    #[inline]
    fn deref(&self) -> &RecordValue {
        self.record
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

pub struct FieldIter<'a> {
    record: &'a RecordValue,
    pos: usize,
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = (&'a FieldDescriptor, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.record.ty.fields().get(self.pos)?;
        let value = &self.record.values[self.pos];
        self.pos += 1;
        Some((field, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.values.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FieldIter<'a> {}
