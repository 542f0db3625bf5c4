use crate::error::RecordError;
use crate::value::RecordValue;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

// ─── FieldType ──────────────────────────────────────────────────────────────

/// Declared type of a record field.
///
/// Two field types are identical only if they are structurally equal, which
/// for nested records includes every nested tag and the nested type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    I64,
    U64,
    F64,
    Str,
    Bytes,
    List(Box<FieldType>),
    Record(Arc<RecordType>),
}

impl FieldType {
    pub fn list(elem: FieldType) -> Self {
        FieldType::List(Box::new(elem))
    }

    pub fn record(ty: RecordType) -> Self {
        FieldType::Record(Arc::new(ty))
    }

    #[inline]
    pub fn as_record(&self) -> Option<&Arc<RecordType>> {
        match self {
            FieldType::Record(rt) => Some(rt),
            _ => None,
        }
    }

    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self, FieldType::Record(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::I64 => f.write_str("i64"),
            FieldType::U64 => f.write_str("u64"),
            FieldType::F64 => f.write_str("f64"),
            FieldType::Str => f.write_str("string"),
            FieldType::Bytes => f.write_str("bytes"),
            FieldType::List(elem) => write!(f, "[]{}", elem),
            FieldType::Record(rt) => write!(f, "{}", rt),
        }
    }
}

// ─── FieldDescriptor ────────────────────────────────────────────────────────

/// One field of a record type: name, declared type and opaque tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub(crate) name: SmolStr,
    pub(crate) ty: FieldType,
    pub(crate) tag: SmolStr,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<SmolStr>, ty: FieldType, tag: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: tag.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

// ─── RecordType ─────────────────────────────────────────────────────────────

/// An immutable record shape. Field order is declaration order.
///
/// Types built by [`RecordType::synthesize`] are anonymous. Named types stand
/// in for declared record types and are never identical to an anonymous type,
/// even with the same fields.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: Option<SmolStr>,
    fields: Vec<FieldDescriptor>,
    /// name → position in `fields`
    index: FxHashMap<SmolStr, usize>,
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Eq for RecordType {}

impl RecordType {
    /// Build an anonymous record type from descriptors, in order.
    ///
    /// Tags are attached verbatim and types are taken as-is. Fails on a
    /// name that is not an identifier or on a repeated name.
    pub fn synthesize<I>(descriptors: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        Self::build(None, descriptors)
    }

    /// Like [`RecordType::synthesize`], but the result carries a type name.
    pub fn named<I>(name: impl Into<SmolStr>, descriptors: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        Self::build(Some(name.into()), descriptors)
    }

    fn build<I>(name: Option<SmolStr>, descriptors: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        let fields: Vec<FieldDescriptor> = descriptors.into_iter().collect();
        let mut index = FxHashMap::default();
        index.reserve(fields.len());

        for (pos, field) in fields.iter().enumerate() {
            if !is_identifier(&field.name) {
                return Err(RecordError::InvalidFieldName(field.name.clone()));
            }
            if index.insert(field.name.clone(), pos).is_some() {
                return Err(RecordError::DuplicateFieldName(field.name.clone()));
            }
        }

        log::trace!(
            "synthesized record type {} with {} fields",
            name.as_deref().unwrap_or("<anonymous>"),
            fields.len()
        );
        Ok(Self {
            name,
            fields,
            index,
        })
    }

    /// Rebuild from fields that were already validated by a previous build.
    pub(crate) fn from_validated(fields: Vec<FieldDescriptor>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(pos, f)| (f.name.clone(), pos))
            .collect();
        Self {
            name: None,
            fields,
            index,
        }
    }

    /// Allocate a zero-valued instance of this type.
    pub fn instantiate(self: &Arc<Self>) -> RecordValue {
        RecordValue::zero(Arc::clone(self))
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field by exact (case-sensitive) name.
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.position(name).map(|pos| &self.fields[pos])
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return f.write_str(name);
        }
        f.write_str("record {")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, " {} {}", field.name, field.ty)?;
            if !field.tag.is_empty() {
                write!(f, " {:?}", field.tag.as_str())?;
            }
        }
        f.write_str(" }")
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
