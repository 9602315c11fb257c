use actix_web::{web, HttpRequest, HttpResponse};
use std::time::Instant;

use super::session_snapshot;
use crate::error::ApiError;
use crate::lookthrough::{decompose, Decomposition};
use crate::models::request::DecomposeRequest;
use crate::models::response::{DecomposeResponse, QueryMetadata};
use crate::AppState;

/// `POST /api/v1/decompose`
pub async fn handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<DecomposeRequest>,
) -> Result<HttpResponse, ApiError> {
    let start = Instant::now();
    let request = body.into_inner();
    request.validate()?;

    let (session, snapshot) = session_snapshot(&req, &state);

    let response = match decompose(&request.positions, &snapshot)? {
        Decomposition::Undefined => {
            tracing::info!(session = %session, "Decomposition undefined: zero portfolio value");
            DecomposeResponse::Undefined {
                reason: "total portfolio value is zero".to_string(),
            }
        }
        Decomposition::Ranked(mut result) => {
            let total_rows = result.exposures.len();
            if let Some(limit) = request.limit {
                result.exposures.truncate(limit);
            }
            if !result.unresolved.is_empty() {
                tracing::warn!(
                    "{} securities excluded for unreadable weights",
                    result.unresolved.len()
                );
            }
            tracing::debug!(
                "Decomposed {} baskets into {} securities",
                request.positions.len(),
                total_rows
            );

            DecomposeResponse::Ranked {
                total_value: result.total_value,
                metadata: QueryMetadata {
                    total_rows,
                    returned_rows: result.exposures.len(),
                    query_time_ms: start.elapsed().as_millis() as u64,
                },
                exposures: result.exposures,
                unresolved: result.unresolved,
            }
        }
    };

    Ok(HttpResponse::Ok().json(response))
}
