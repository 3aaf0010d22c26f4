//! Read-only HTTP surface over the airport store.
//!
//! Handlers only read from the store; they never reach the upstream.

use airport_store::AirportStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use common::Airport;
use serde_json::{json, Value};
use tracing::debug;

/// Build the router. Every handler shares `store`.
pub fn router(store: AirportStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/airports", get(all_airports))
        .route("/airports/summary", get(airport_summary))
        .route("/airports/airport/:id", get(airport_by_id))
        .with_state(store)
}

async fn health(State(store): State<AirportStore>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "airports": store.len(),
    }))
}

async fn all_airports(State(store): State<AirportStore>) -> Json<Vec<Airport>> {
    Json(store.all().map(|a| Airport::clone(&a)).collect())
}

/// One `"<icao>, <name>"` line per airport, as `text/plain`.
async fn airport_summary(State(store): State<AirportStore>) -> String {
    let airports: Vec<_> = store.all().collect();
    common::summarize(airports.iter().map(|a| a.as_ref()))
}

/// Not-found is a bare 404; absence is a normal outcome, not an error.
async fn airport_by_id(
    State(store): State<AirportStore>,
    Path(id): Path<String>,
) -> Result<Json<Airport>, StatusCode> {
    let id = id.trim().to_ascii_uppercase();
    match store.lookup(&id) {
        Some(airport) => Ok(Json(Airport::clone(&airport))),
        None => {
            debug!("Airport {} not in store", id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}
