use std::collections::BTreeMap;

/// Weight-per-security breakdown of one basket.
///
/// Weights are fractions of the basket value. A NaN weight marks a row whose
/// weight cell could not be read; it is kept so it stays distinguishable from
/// a genuine zero weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsTable {
    weights: BTreeMap<String, f64>,
}

impl HoldingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the weight for `security`, returning the previous one.
    pub fn insert(&mut self, security: impl Into<String>, weight: f64) -> Option<f64> {
        self.weights.insert(security.into(), weight)
    }

    pub fn get(&self, security: &str) -> Option<f64> {
        self.weights.get(security).copied()
    }

    pub fn contains(&self, security: &str) -> bool {
        self.weights.contains_key(security)
    }

    /// Securities in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of the readable weights. Not enforced to be 1.
    pub fn weight_sum(&self) -> f64 {
        self.weights.values().filter(|w| !w.is_nan()).sum()
    }

    /// Number of securities carrying the unreadable-weight marker.
    pub fn invalid_count(&self) -> usize {
        self.weights.values().filter(|w| w.is_nan()).count()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for HoldingsTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut table = HoldingsTable::new();
        for (security, weight) in iter {
            table.insert(security, weight);
        }
        table
    }
}
