use super::record::Record;
use crate::copier;
use crate::error::RecordError;
use crate::mapping;
use crate::operand::Operand;
use crate::value::Value;

impl<'a> Record<'a> {
    // ════════════════════════════════════════════════════════════════════════
    // Transfer out
    // ════════════════════════════════════════════════════════════════════════

    /// Save the live instance into `dst`.
    ///
    /// - writable mapping: every field is flattened into it by name;
    /// - writable record reference: fields are copied by name and exact type.
    ///
    /// A read-only mapping, a shared record reference or a record passed by
    /// value is [`RecordError::ImmutableDestination`]; any other shape is
    /// [`RecordError::NotAcceptable`].
    pub fn save_into<'d>(&self, dst: impl Into<Operand<'d>>) -> Result<(), RecordError> {
        match dst.into() {
            Operand::MapMut(map) => {
                mapping::flatten_into(map, self.current());
                Ok(())
            }
            Operand::Exclusive(v) => {
                let dst = v.as_record_mut().ok_or(RecordError::NotAcceptable)?;
                copier::copy(dst, self.current());
                Ok(())
            }
            Operand::Map(_) | Operand::Value(Value::Record(_)) => {
                Err(RecordError::ImmutableDestination)
            }
            Operand::Shared(v) if v.as_record().is_some() => {
                Err(RecordError::ImmutableDestination)
            }
            _ => Err(RecordError::NotAcceptable),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Transfer in
    // ════════════════════════════════════════════════════════════════════════

    /// Load the live instance from `src`: a mapping (by field name, unknown
    /// keys ignored) or any record, by value or by reference (by name and
    /// exact type).
    ///
    /// The live instance must be writable; this is checked before `src`.
    pub fn assign_from<'s>(&mut self, src: impl Into<Operand<'s>>) -> Result<(), RecordError> {
        let src = src.into();
        let dst = self.current_mut()?;

        if let Some(map) = src.as_mapping() {
            return mapping::fill(dst, map);
        }
        let src = src.as_record().ok_or(RecordError::NotAcceptable)?;
        copier::copy(dst, src);
        Ok(())
    }
}
