//! Neo.IO
//!
//! Little-endian binary encoding used by scripts, ledger entities and the stack item
//! serialization format: fixed-width integers, var-ints and var-length byte strings.

mod binary_writer;
mod error;
mod memory_reader;
mod serializable;

pub use binary_writer::BinaryWriter;
pub use error::{IoError, IoResult};
pub use memory_reader::MemoryReader;
pub use serializable::{helper, Serializable, SerializableExt};
