//! Ingestion of basket holdings disclosures.
//!
//! A disclosure is comma-delimited text: an arbitrary metadata preamble
//! followed by a table whose header line starts with `ISSUER,CUSIP`.
//! [`parse_holdings`] turns the table into a [`HoldingsTable`] and discards
//! the preamble; [`parse_preamble`] reads the preamble on its own for callers
//! that want the fund metadata.

pub mod parser;
pub mod preamble;
pub mod table;

pub use parser::{parse_holdings, InvalidRow, ParsedHoldings, HEADER_MARKER};
pub use preamble::{parse_preamble, Preamble, PreambleEntry};
pub use table::HoldingsTable;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HoldingsError {
    #[error("malformed holdings document: {0}")]
    MalformedDocument(String),
}
