use crate::error::RecordError;
use crate::operand::Operand;
use crate::types::{FieldDescriptor, FieldType, RecordType};
use crate::value::RecordValue;
use std::sync::Arc;

/// Where the live instance of a [`Record`] lives.
#[derive(Debug)]
pub(crate) enum Slot<'a> {
    Owned(RecordValue),
    Shared(&'a RecordValue),
    Exclusive(&'a mut RecordValue),
}

// ─── Record ─────────────────────────────────────────────────────────────────

/// Wraps one live record instance: either an instance owned by the record
/// (synthesized, or produced by a tag rewrite) or a caller's instance behind
/// a reference.
///
/// Writes through an exclusively wrapped instance are visible to the caller.
/// A shared wrap is read-only.
#[derive(Debug)]
pub struct Record<'a> {
    pub(crate) slot: Slot<'a>,
}

impl<'a> Record<'a> {
    /// A record owning a zero-valued instance of `ty`.
    pub fn new(ty: RecordType) -> Self {
        Self::from_type(&Arc::new(ty))
    }

    pub fn from_type(ty: &Arc<RecordType>) -> Self {
        Self {
            slot: Slot::Owned(ty.instantiate()),
        }
    }

    /// Wrap a caller's instance. It must be passed by reference: a plain
    /// value is rejected with [`RecordError::NotAddressable`], a reference to
    /// anything but a record with [`RecordError::NeedReference`].
    pub fn wrap(instance: impl Into<Operand<'a>>) -> Result<Self, RecordError> {
        let not_a_record = RecordError::NeedReference { arg: "instance" };
        let slot = match instance.into() {
            Operand::Shared(v) => Slot::Shared(v.as_record().ok_or(not_a_record)?),
            Operand::Exclusive(v) => Slot::Exclusive(v.as_record_mut().ok_or(not_a_record)?),
            Operand::Map(_) | Operand::MapMut(_) => return Err(not_a_record),
            Operand::Value(_) => return Err(RecordError::NotAddressable),
        };
        Ok(Self { slot })
    }

    /// The live instance.
    #[inline]
    pub fn current(&self) -> &RecordValue {
        match &self.slot {
            Slot::Owned(rv) => rv,
            Slot::Shared(rv) => *rv,
            Slot::Exclusive(rv) => &**rv,
        }
    }

    /// The live instance, for writing. Fails for a shared wrap.
    #[inline]
    pub fn current_mut(&mut self) -> Result<&mut RecordValue, RecordError> {
        match &mut self.slot {
            Slot::Owned(rv) => Ok(rv),
            Slot::Exclusive(rv) => Ok(&mut **rv),
            Slot::Shared(_) => Err(RecordError::ImmutableDestination),
        }
    }

    #[inline]
    pub fn record_type(&self) -> &Arc<RecordType> {
        self.current().record_type()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        !matches!(self.slot, Slot::Shared(_))
    }

    /// Take the live instance out, cloning it if it is borrowed.
    pub fn into_value(self) -> RecordValue {
        match self.slot {
            Slot::Owned(rv) => rv,
            Slot::Shared(rv) => rv.clone(),
            Slot::Exclusive(rv) => rv.clone(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Tags
    // ════════════════════════════════════════════════════════════════════════

    /// Replace every field tag with `get_new_tag(field_name, current_tag)`,
    /// descending into nested record types with the same callback.
    ///
    /// The callback runs once per field in declaration order, for a field
    /// before the fields of its nested record. The record then holds a fresh
    /// zero-valued instance of the rebuilt, anonymous type: values held
    /// before the rewrite are not carried over, and a wrapped caller instance
    /// is released untouched.
    pub fn rewrite_tags<F>(&mut self, mut get_new_tag: F)
    where
        F: FnMut(&str, &str) -> String,
    {
        let ty = rewrite_type(self.record_type(), &mut get_new_tag);
        log::trace!("rewrote tags, new type {}", ty);
        self.slot = Slot::Owned(Arc::new(ty).instantiate());
    }

    /// Like [`Record::rewrite_tags`], ignoring the current tags.
    pub fn set_tags<F>(&mut self, mut get_tag: F)
    where
        F: FnMut(&str) -> String,
    {
        self.rewrite_tags(|name, _| get_tag(name));
    }
}

fn rewrite_type<F>(ty: &RecordType, get_new_tag: &mut F) -> RecordType
where
    F: FnMut(&str, &str) -> String,
{
    let mut fields = Vec::with_capacity(ty.len());
    for field in ty.fields() {
        let tag = get_new_tag(field.name(), field.tag());
        let field_ty = match field.ty() {
            FieldType::Record(nested) => FieldType::record(rewrite_type(nested, get_new_tag)),
            other => other.clone(),
        };
        fields.push(FieldDescriptor::new(field.name.clone(), field_ty, tag));
    }
    RecordType::from_validated(fields)
}
