//! Report decoding and reading storage

pub mod parser;
pub mod store;

pub use parser::{ParseError, ReportParser, ReportPayload};
pub use store::ReadingStore;
