use serde::Serialize;

use crate::holdings::{InvalidRow, PreambleEntry};
use crate::lookthrough::Exposure;

#[derive(Debug, Serialize)]
pub struct QueryMetadata {
    pub total_rows: usize,
    pub returned_rows: usize,
    pub query_time_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecomposeResponse {
    Ranked {
        total_value: f64,
        exposures: Vec<Exposure>,
        unresolved: Vec<String>,
        metadata: QueryMetadata,
    },
    /// Total portfolio value is zero. Never collapsed into an empty list.
    Undefined { reason: String },
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub basket_id: String,
    pub holdings_count: usize,
    pub weight_sum: f64,
    pub invalid_rows: Vec<InvalidRow>,
    pub skipped_rows: usize,
    pub replaced: bool,
    pub unchanged: bool,
    pub digest: String,
    pub preamble: Vec<PreambleEntry>,
}

#[derive(Debug, Serialize)]
pub struct BasketsResponse {
    pub baskets: Vec<BasketSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct BasketSummary {
    pub basket_id: String,
    pub holdings_count: usize,
    pub digest: String,
}

#[derive(Debug, Serialize)]
pub struct HoldingsResponse {
    pub basket_id: String,
    pub holdings: Vec<Holding>,
    pub count: usize,
    pub preamble: Vec<PreambleEntry>,
}

#[derive(Debug, Serialize)]
pub struct Holding {
    pub security: String,
    /// `None` when the document's weight cell was unreadable.
    pub weight: Option<f64>,
}
