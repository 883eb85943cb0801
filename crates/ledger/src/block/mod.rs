//! Block data structures.
//!
//! - header: block header fields and hash
//! - block: header plus transactions

pub mod block;
pub mod header;

pub use block::Block;
pub use header::Header;
