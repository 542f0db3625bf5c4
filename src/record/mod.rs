mod builder;
#[allow(clippy::module_inception)]
mod record;
mod transfer_op;

pub use builder::RecordBuilder;
pub use record::Record;

#[cfg(test)]
mod tests;
