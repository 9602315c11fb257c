//! Per-session storage of ingested holdings tables.

mod sessions;

pub use sessions::SessionRegistries;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

use crate::holdings::{
    parse_holdings, parse_preamble, HoldingsError, HoldingsTable, InvalidRow, Preamble,
};
use crate::lookthrough::HoldingsSource;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("basket identifier is empty")]
    EmptyBasketId,
    #[error("holdings document is empty")]
    EmptyDocument,
    #[error(transparent)]
    Holdings(#[from] HoldingsError),
}

/// One basket's stored holdings, as parsed from its latest document.
#[derive(Debug, Clone)]
pub struct BasketHoldings {
    pub table: HoldingsTable,
    pub invalid_rows: Vec<InvalidRow>,
    pub skipped_rows: usize,
    pub preamble: Preamble,
    /// SHA-256 of the raw document.
    pub digest: String,
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub basket_id: String,
    pub holdings: Arc<BasketHoldings>,
    /// A table already existed for this basket and was overwritten.
    pub replaced: bool,
    /// The overwritten table came from a byte-identical document.
    pub unchanged: bool,
}

/// Holdings tables keyed by basket identifier.
///
/// Writers replace a basket's whole entry under the write lock, so readers
/// never see a partially updated table. Decompositions should run on a
/// [`RegistrySnapshot`].
#[derive(Debug, Default)]
pub struct HoldingsRegistry {
    baskets: RwLock<HashMap<String, Arc<BasketHoldings>>>,
}

impl HoldingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `raw` and stores it as the holdings of `basket_id`, replacing
    /// any previous table. On error the registry is left untouched.
    pub fn ingest(&self, basket_id: &str, raw: &[u8]) -> Result<IngestOutcome, RegistryError> {
        if basket_id.trim().is_empty() {
            return Err(RegistryError::EmptyBasketId);
        }
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(RegistryError::EmptyDocument);
        }

        let parsed = parse_holdings(raw)?;
        let digest = document_digest(raw);
        let holdings = Arc::new(BasketHoldings {
            table: parsed.table,
            invalid_rows: parsed.invalid_rows,
            skipped_rows: parsed.skipped_rows,
            preamble: parse_preamble(raw),
            digest,
        });

        let previous = self
            .baskets
            .write()
            .insert(basket_id.to_string(), Arc::clone(&holdings));

        Ok(IngestOutcome {
            basket_id: basket_id.to_string(),
            replaced: previous.is_some(),
            unchanged: previous.map_or(false, |p| p.digest == holdings.digest),
            holdings,
        })
    }

    pub fn get(&self, basket_id: &str) -> Option<Arc<BasketHoldings>> {
        self.baskets.read().get(basket_id).cloned()
    }

    pub fn basket_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.baskets.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.baskets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.read().is_empty()
    }

    /// Point-in-time copy of the registry, taken under a single read lock.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            baskets: self.baskets.read().clone(),
        }
    }
}

/// Immutable view of a [`HoldingsRegistry`]. Later ingestions do not affect it.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    baskets: HashMap<String, Arc<BasketHoldings>>,
}

impl RegistrySnapshot {
    pub fn get(&self, basket_id: &str) -> Option<&BasketHoldings> {
        self.baskets.get(basket_id).map(Arc::as_ref)
    }

    /// Stored baskets in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BasketHoldings)> + '_ {
        let mut entries: Vec<(&str, &BasketHoldings)> = self
            .baskets
            .iter()
            .map(|(id, holdings)| (id.as_str(), holdings.as_ref()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.baskets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }
}

impl HoldingsSource for RegistrySnapshot {
    fn holdings(&self, basket_id: &str) -> Option<&HoldingsTable> {
        self.baskets.get(basket_id).map(|b| &b.table)
    }
}

pub fn document_digest(raw: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookthrough::{decompose, BasketPosition, LookThroughError};
    use std::collections::BTreeMap;

    const FUND_A: &str = "Fund Name,A\n\nISSUER,CUSIP,WEIGHT\nx,X,80%\ny,Y,20%\n";
    const FUND_A_REBALANCED: &str = "Fund Name,A\n\nISSUER,CUSIP,WEIGHT\nx,X,50%\nq,Q,50%\n";

    fn one_position(basket: &str) -> BTreeMap<String, BasketPosition> {
        BTreeMap::from([(basket.to_string(), BasketPosition::new(10.0, 10.0))])
    }

    #[test]
    fn test_ingest_stores_table() {
        let registry = HoldingsRegistry::new();
        let outcome = registry.ingest("A", FUND_A.as_bytes()).unwrap();

        assert!(!outcome.replaced);
        assert_eq!(outcome.holdings.table.len(), 2);
        assert_eq!(outcome.holdings.preamble.get("Fund Name"), Some("A"));
        assert_eq!(registry.basket_ids(), vec!["A".to_string()]);
    }

    #[test]
    fn test_reingest_same_document_is_idempotent() {
        let registry = HoldingsRegistry::new();
        registry.ingest("A", FUND_A.as_bytes()).unwrap();
        let first = registry.get("A").unwrap();

        let outcome = registry.ingest("A", FUND_A.as_bytes()).unwrap();
        let second = registry.get("A").unwrap();

        assert!(outcome.replaced);
        assert!(outcome.unchanged);
        assert_eq!(registry.len(), 1);
        assert_eq!(first.table, second.table);
        assert_eq!(first.digest, second.digest);
    }

    #[test]
    fn test_reingest_overwrites_instead_of_merging() {
        let registry = HoldingsRegistry::new();
        registry.ingest("A", FUND_A.as_bytes()).unwrap();
        let outcome = registry.ingest("A", FUND_A_REBALANCED.as_bytes()).unwrap();
        assert!(outcome.replaced);
        assert!(!outcome.unchanged);

        let result = decompose(&one_position("A"), &registry.snapshot()).unwrap();
        let securities: Vec<&str> = result
            .ranked()
            .unwrap()
            .exposures
            .iter()
            .map(|e| e.security.as_str())
            .collect();
        assert_eq!(securities, vec!["Q", "X"]);
    }

    #[test]
    fn test_failed_ingest_leaves_registry_untouched() {
        let registry = HoldingsRegistry::new();
        registry.ingest("A", FUND_A.as_bytes()).unwrap();

        let err = registry.ingest("A", b"no table here\n").unwrap_err();
        assert!(matches!(err, RegistryError::Holdings(HoldingsError::MalformedDocument(_))));
        assert_eq!(registry.get("A").unwrap().table.len(), 2);
        assert!(registry.get("A").unwrap().table.contains("Y"));
    }

    #[test]
    fn test_rejects_empty_inputs_before_parsing() {
        let registry = HoldingsRegistry::new();
        assert_eq!(registry.ingest("  ", FUND_A.as_bytes()).unwrap_err(), RegistryError::EmptyBasketId);
        assert_eq!(registry.ingest("A", b" \n ").unwrap_err(), RegistryError::EmptyDocument);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_ingestion() {
        let registry = HoldingsRegistry::new();
        let before = registry.snapshot();
        registry.ingest("A", FUND_A.as_bytes()).unwrap();

        assert!(before.is_empty());
        assert_eq!(
            decompose(&one_position("A"), &before).unwrap_err(),
            LookThroughError::UnknownBasket("A".to_string())
        );
        assert_eq!(registry.snapshot().len(), 1);
    }
}
