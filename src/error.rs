// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// `arg` is `"src"` or `"dst"`.
    #[error("{arg}: needs a reference to a record")]
    NeedReference { arg: &'static str },
    #[error("needs a reference to a record, got a plain value")]
    NotAddressable,
    #[error("destination is immutable")]
    ImmutableDestination,
    #[error("the type of dst is not acceptable")]
    NotAcceptable,
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(SmolStr),
    #[error("duplicate field name: {0}")]
    DuplicateFieldName(SmolStr),
    #[error("Field not found: {0}")]
    FieldNotFound(SmolStr),
    #[error("Value mismatch on field {field}: expected {expected}")]
    ValueMismatch { field: SmolStr, expected: String },
    #[error("JSON error: {0}")]
    Json(String),
    #[error("CBOR error: {0}")]
    Cbor(String),
}
