//! Record types built at runtime from field descriptors, with by-name
//! transfer between records and generic mappings, and tag-driven
//! JSON/CBOR encoding.
//!
//! ```
//! use spooky_shape::{CodecOptions, FieldType, RecordBuilder, codec};
//!
//! let mut record = RecordBuilder::new()
//!     .add_field("Name", FieldType::Str, r#"json:"name""#)
//!     .add_field("Age", FieldType::I64, r#"json:"age""#)
//!     .build()
//!     .unwrap();
//!
//! let options = CodecOptions::default();
//! codec::from_json(record.current_mut().unwrap(), r#"{"name":"Alice","age":28}"#, &options)
//!     .unwrap();
//! assert_eq!(
//!     codec::to_json(record.current(), &options).unwrap(),
//!     r#"{"name":"Alice","age":28}"#
//! );
//! ```

pub mod codec;
pub mod copier;
pub mod error;
pub mod mapping;
pub mod operand;
pub mod record;
pub mod spooky_value;
pub mod tag;
pub mod types;
pub mod value;

pub use codec::{CodecOptions, KeyFallback};
pub use copier::{copy, merge};
pub use error::RecordError;
pub use mapping::{KeyResolver, fill, flatten, from_mapping, to_mapping};
pub use operand::Operand;
pub use record::{Record, RecordBuilder};
pub use spooky_value::{Mapping, SpookyNumber, SpookyValue};
pub use types::{FieldDescriptor, FieldType, RecordType};
pub use value::{NestedMut, RecordValue, Value};

#[doc(hidden)]
pub mod __private {
    pub use smol_str::SmolStr;
}
