use actix_web::{web, HttpRequest, HttpResponse};

use super::{session_registry, session_snapshot};
use crate::error::ApiError;
use crate::models::response::{
    BasketSummary, BasketsResponse, Holding, HoldingsResponse, IngestResponse,
};
use crate::AppState;

/// `PUT /api/v1/baskets/{basket_id}/holdings` with the raw disclosure as body.
pub async fn ingest(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let basket_id = path.into_inner();
    let (session, registry) = session_registry(&req, &state);

    let outcome = registry.ingest(&basket_id, &body)?;
    let holdings = &outcome.holdings;

    if !holdings.invalid_rows.is_empty() {
        tracing::warn!(
            "Basket {} has {} rows with unreadable weights",
            basket_id,
            holdings.invalid_rows.len()
        );
    }
    tracing::info!(
        session = %session,
        basket = %basket_id,
        holdings = holdings.table.len(),
        replaced = outcome.replaced,
        "Ingested holdings document"
    );

    let response = IngestResponse {
        basket_id: outcome.basket_id.clone(),
        holdings_count: holdings.table.len(),
        weight_sum: holdings.table.weight_sum(),
        invalid_rows: holdings.invalid_rows.clone(),
        skipped_rows: holdings.skipped_rows,
        replaced: outcome.replaced,
        unchanged: outcome.unchanged,
        digest: holdings.digest.clone(),
        preamble: holdings.preamble.entries().to_vec(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// `GET /api/v1/baskets`
pub async fn list(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let (_, snapshot) = session_snapshot(&req, &state);

    let baskets: Vec<BasketSummary> = snapshot
        .iter()
        .map(|(basket_id, holdings)| BasketSummary {
            basket_id: basket_id.to_string(),
            holdings_count: holdings.table.len(),
            digest: holdings.digest.clone(),
        })
        .collect();

    HttpResponse::Ok().json(BasketsResponse {
        count: baskets.len(),
        baskets,
    })
}

/// `GET /api/v1/baskets/{basket_id}/holdings`
pub async fn show(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let basket_id = path.into_inner();
    let (_, snapshot) = session_snapshot(&req, &state);

    let stored = snapshot
        .get(&basket_id)
        .ok_or_else(|| ApiError::NotFound(format!("no holdings registered for basket '{}'", basket_id)))?;

    let holdings: Vec<Holding> = stored
        .table
        .iter()
        .map(|(security, weight)| Holding {
            security: security.to_string(),
            weight: (!weight.is_nan()).then_some(weight),
        })
        .collect();

    Ok(HttpResponse::Ok().json(HoldingsResponse {
        basket_id,
        count: holdings.len(),
        holdings,
        preamble: stored.preamble.entries().to_vec(),
    }))
}
