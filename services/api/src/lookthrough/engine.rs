use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::holdings::HoldingsTable;

/// A directly held basket: unit price times quantity held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasketPosition {
    pub price: f64,
    pub shares: f64,
}

impl BasketPosition {
    pub fn new(price: f64, shares: f64) -> Self {
        Self { price, shares }
    }

    pub fn value(&self) -> f64 {
        self.price * self.shares
    }
}

/// Anything that can hand out a basket's holdings table by basket identifier.
pub trait HoldingsSource {
    fn holdings(&self, basket_id: &str) -> Option<&HoldingsTable>;
}

impl<S: BuildHasher> HoldingsSource for HashMap<String, HoldingsTable, S> {
    fn holdings(&self, basket_id: &str) -> Option<&HoldingsTable> {
        self.get(basket_id)
    }
}

impl HoldingsSource for BTreeMap<String, HoldingsTable> {
    fn holdings(&self, basket_id: &str) -> Option<&HoldingsTable> {
        self.get(basket_id)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookThroughError {
    #[error("no holdings registered for basket '{0}'")]
    UnknownBasket(String),
    #[error("total portfolio value is not finite")]
    NonFiniteTotal,
}

/// Aggregate exposure to one underlying security.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exposure {
    pub security: String,
    /// Monetary exposure summed over every basket holding the security.
    pub value: f64,
    /// Share of total portfolio value, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookThrough {
    pub total_value: f64,
    /// Ranked by percentage descending, ties by security identifier ascending.
    pub exposures: Vec<Exposure>,
    /// Securities whose exposure is unknown because a holdings row carried an
    /// unreadable weight. Sorted ascending; not part of `exposures`.
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decomposition {
    Ranked(LookThrough),
    /// Total portfolio value is zero, so no percentage is defined.
    Undefined,
}

impl Decomposition {
    pub fn ranked(&self) -> Option<&LookThrough> {
        match self {
            Decomposition::Ranked(result) => Some(result),
            Decomposition::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Decomposition::Undefined)
    }
}

/// Decomposes basket positions into aggregate exposure per underlying security.
///
/// Every position must have a holdings table in `source`; a missing one fails
/// the whole call with [`LookThroughError::UnknownBasket`]. Contributions from
/// different baskets to the same security are merged into one entry. Weights
/// are trusted as given and never renormalized.
pub fn decompose<S>(
    positions: &BTreeMap<String, BasketPosition>,
    source: &S,
) -> Result<Decomposition, LookThroughError>
where
    S: HoldingsSource + ?Sized,
{
    let mut total_value = 0.0;
    let mut accumulated: HashMap<&str, f64> = HashMap::new();

    for (basket_id, position) in positions {
        let basket_value = position.value();
        total_value += basket_value;

        let table = source
            .holdings(basket_id)
            .ok_or_else(|| LookThroughError::UnknownBasket(basket_id.clone()))?;

        for (security, weight) in table.iter() {
            *accumulated.entry(security).or_insert(0.0) += basket_value * weight;
        }
    }

    if total_value == 0.0 {
        return Ok(Decomposition::Undefined);
    }
    if !total_value.is_finite() {
        return Err(LookThroughError::NonFiniteTotal);
    }

    let mut exposures = Vec::with_capacity(accumulated.len());
    let mut unresolved = Vec::new();

    for (security, value) in accumulated {
        if value.is_nan() {
            unresolved.push(security.to_string());
            continue;
        }
        exposures.push(Exposure {
            security: security.to_string(),
            value,
            percentage: value / total_value * 100.0,
        });
    }

    exposures.sort_by(rank_order);
    unresolved.sort();

    Ok(Decomposition::Ranked(LookThrough {
        total_value,
        exposures,
        unresolved,
    }))
}

fn rank_order(a: &Exposure, b: &Exposure) -> Ordering {
    b.percentage
        .total_cmp(&a.percentage)
        .then_with(|| a.security.cmp(&b.security))
}
