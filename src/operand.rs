use crate::error::RecordError;
use crate::spooky_value::Mapping;
use crate::value::{RecordValue, Value};

/// A dynamically shaped argument for the checked entry points
/// ([`merge`](crate::copier::merge), [`Record::save_into`](crate::Record::save_into), …).
///
/// The variant carries what a reflective API would discover at runtime:
/// whether the caller handed over a plain value or a reference, and whether
/// that reference may be written through. Only [`Operand::Exclusive`] and
/// [`Operand::MapMut`] are writable destinations.
#[derive(Debug)]
pub enum Operand<'a> {
    /// A value passed by copy. Readable, never a reference.
    Value(Value),
    Shared(&'a Value),
    Exclusive(&'a mut Value),
    Map(&'a Mapping),
    MapMut(&'a mut Mapping),
}

impl<'a> Operand<'a> {
    #[inline]
    pub fn is_writable(&self) -> bool {
        matches!(self, Operand::Exclusive(_) | Operand::MapMut(_))
    }

    /// The record behind the operand, if it holds one, reference or not.
    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Operand::Value(v) => v.as_record(),
            Operand::Shared(v) => v.as_record(),
            Operand::Exclusive(v) => v.as_record(),
            Operand::Map(_) | Operand::MapMut(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Operand::Map(m) => Some(*m),
            Operand::MapMut(m) => Some(&**m),
            _ => None,
        }
    }

    /// Borrow a record reference for reading. `arg` names the argument in
    /// the error.
    pub(crate) fn record_ref(&self, arg: &'static str) -> Result<&RecordValue, RecordError> {
        match self {
            Operand::Shared(v) => v.as_record(),
            Operand::Exclusive(v) => v.as_record(),
            _ => None,
        }
        .ok_or(RecordError::NeedReference { arg })
    }

    /// Borrow a record reference for writing. Shape is checked before
    /// writability, so a shared reference to a record reports
    /// [`RecordError::ImmutableDestination`].
    pub(crate) fn record_mut(&mut self, arg: &'static str) -> Result<&mut RecordValue, RecordError> {
        match self {
            Operand::Exclusive(v) => v.as_record_mut().ok_or(RecordError::NeedReference { arg }),
            Operand::Shared(v) if v.as_record().is_some() => Err(RecordError::ImmutableDestination),
            _ => Err(RecordError::NeedReference { arg }),
        }
    }
}

impl<'a> From<&'a Value> for Operand<'a> {
    fn from(v: &'a Value) -> Self {
        Operand::Shared(v)
    }
}

impl<'a> From<&'a mut Value> for Operand<'a> {
    fn from(v: &'a mut Value) -> Self {
        Operand::Exclusive(v)
    }
}

impl<'a> From<&'a Mapping> for Operand<'a> {
    fn from(m: &'a Mapping) -> Self {
        Operand::Map(m)
    }
}

impl<'a> From<&'a mut Mapping> for Operand<'a> {
    fn from(m: &'a mut Mapping) -> Self {
        Operand::MapMut(m)
    }
}

impl From<Value> for Operand<'_> {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<RecordValue> for Operand<'_> {
    fn from(rv: RecordValue) -> Self {
        Operand::Value(Value::Record(rv))
    }
}
