//! Raw input decoder module
//!
//! Newline-delimited JSON files are split on `\n`, each line parsed and
//! conformed to a [`RecordSchema`](crate::schema::RecordSchema). Lines that
//! fail either step are dropped and only counted.

mod decoders;
mod types;

pub use decoders::JsonlDecoder;
pub use types::Decoded;

#[cfg(test)]
mod tests;
