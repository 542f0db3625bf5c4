use super::record::Record;
use crate::error::RecordError;
use crate::types::{FieldDescriptor, FieldType, RecordType};
use smol_str::SmolStr;

/// Collects field descriptors and builds a [`Record`] over the synthesized
/// type.
///
/// ```
/// use spooky_shape::{FieldType, RecordBuilder};
///
/// let record = RecordBuilder::new()
///     .add_field("Id", FieldType::Str, r#"json:"id""#)
///     .add_field("Age", FieldType::I64, r#"json:"age""#)
///     .build()
///     .unwrap();
/// assert_eq!(record.record_type().len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    fields: Vec<FieldDescriptor>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(
        mut self,
        name: impl Into<SmolStr>,
        ty: FieldType,
        tag: impl Into<SmolStr>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, ty, tag));
        self
    }

    /// Synthesize the type. Name checks happen here, not in `add_field`.
    pub fn build(self) -> Result<Record<'static>, RecordError> {
        let ty = RecordType::synthesize(self.fields)?;
        Ok(Record::new(ty))
    }
}
