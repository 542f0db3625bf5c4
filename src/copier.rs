use crate::error::RecordError;
use crate::operand::Operand;
use crate::value::{RecordValue, Value};

// ─── Cross-record copy ──────────────────────────────────────────────────────

/// Copy field values from `src` into `dst` wherever a destination field has a
/// source field with the same name and an identical declared type.
///
/// Destination fields without such a counterpart are left untouched, as are
/// source-only fields. Matching is exact: no numeric widening, and nested
/// record types must be identical down to their tags.
///
/// Nested records are copied field by field first and then assigned as a
/// whole. Since both sides have the identical type, the final value is the
/// source value either way.
pub fn copy(dst: &mut RecordValue, src: &RecordValue) {
    for (pos, field) in dst.ty.fields().iter().enumerate() {
        let Some(src_pos) = src.ty.position(field.name()) else {
            log::trace!("copy: {} has no source counterpart", field.name());
            continue;
        };
        if src.ty.fields()[src_pos].ty() != field.ty() {
            log::trace!(
                "copy: {} skipped, {} != {}",
                field.name(),
                src.ty.fields()[src_pos].ty(),
                field.ty()
            );
            continue;
        }

        let src_value = &src.values[src_pos];
        if let (Value::Record(nested_dst), Value::Record(nested_src)) =
            (&mut dst.values[pos], src_value)
        {
            copy(nested_dst, nested_src);
        }
        dst.values[pos] = src_value.clone();
    }
}

/// Merge two records by field names and types.
///
/// Both arguments must be references to records. Only `dst` needs to be
/// writable: `src` is only read, so a shared reference to a record is
/// accepted for it as well as an exclusive one. `src` is checked before
/// `dst`, and everything is validated before the first field is written.
pub fn merge<'d, 's>(
    dst: impl Into<Operand<'d>>,
    src: impl Into<Operand<'s>>,
) -> Result<(), RecordError> {
    let mut dst = dst.into();
    let src = src.into();

    let src = src.record_ref("src")?;
    let dst = dst.record_mut("dst")?;
    copy(dst, src);
    Ok(())
}
