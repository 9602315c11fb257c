use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::lookthrough::BasketPosition;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecomposeRequest {
    pub positions: BTreeMap<String, BasketPosition>,
    /// Truncates the ranked list after sorting.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl DecomposeRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.positions.is_empty() {
            return Err(ApiError::BadRequest(
                "At least one basket position is required".to_string(),
            ));
        }

        for (basket_id, position) in &self.positions {
            if basket_id.trim().is_empty() {
                return Err(ApiError::BadRequest("Basket identifier is empty".to_string()));
            }
            if !position.price.is_finite() || !position.shares.is_finite() {
                return Err(ApiError::BadRequest(format!(
                    "Position '{}' has a non-finite price or share count",
                    basket_id
                )));
            }
            if !position.value().is_finite() {
                return Err(ApiError::BadRequest(format!(
                    "Position '{}' has a value too large to represent",
                    basket_id
                )));
            }
            if position.price < 0.0 {
                return Err(ApiError::BadRequest(format!(
                    "Position '{}' has a negative price",
                    basket_id
                )));
            }
        }

        Ok(())
    }
}
