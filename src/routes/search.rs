//! Metadata search endpoint.
//!
//! Runs the raw query map through validation and compilation, issues the
//! backend search, and shapes the response envelope. All real decisions
//! happen in [`crate::params`] and [`crate::query`]; this module only wires
//! them to HTTP and formats what the backend returns.

use axum::Json;
use axum::extract::{Query, State};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::params::{QueryParams, check_params};
use crate::query::build_query;
use crate::state::AppState;

/// Static portion of the `meta` block served with every successful response.
static META: Lazy<Value> = Lazy::new(|| {
    json!({
        "credit": "This API is based on the openFDA's API https://github.com/FDA/openfda/tree/master/api ",
        "license": "http://creativecommons.org/publicdomain/zero/1.0/legalcode",
        "last_updated": "2014-08-01",
    })
});

/// GET handler for the metadata index endpoint.
pub async fn metadata_search(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    tracing::info!(query = ?raw, "request query");

    let params = check_params(&raw)?;
    let request = build_query(&params)?;
    let body = state.backend.search(&request).await?;

    if params.count.is_some() {
        format_count_results(&body)
    } else {
        format_search_results(&params, &body)
    }
}

/// Shape a non-count response: `meta` with the pagination window and the
/// raw document sources as `results`.
fn format_search_results(params: &QueryParams, body: &Value) -> ApiResult<Json<Value>> {
    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .filter(|hits| !hits.is_empty())
        .ok_or(ApiError::NoMatches)?;
    let total = body.pointer("/hits/total").cloned().unwrap_or(Value::Null);

    let results: Vec<Value> = hits
        .iter()
        .map(|hit| hit.get("_source").cloned().unwrap_or(Value::Null))
        .collect();

    let mut meta = META.clone();
    meta["results"] = json!({
        "skip": params.skip,
        "limit": params.limit,
        "total": total,
    });

    Ok(Json(json!({ "meta": meta, "results": results })))
}

/// Shape a count response from the `count` facet: term buckets verbatim,
/// date-histogram entries with `time` reformatted.
fn format_count_results(body: &Value) -> ApiResult<Json<Value>> {
    let facet = body
        .pointer("/facets/count")
        .ok_or(ApiError::NothingToCount)?;

    let results: Vec<Value> = if let Some(terms) = facet.get("terms").and_then(Value::as_array) {
        if terms.is_empty() {
            return Err(ApiError::NothingToCount);
        }
        terms.to_vec()
    } else if let Some(entries) = facet.get("entries").and_then(Value::as_array) {
        if entries.is_empty() {
            return Err(ApiError::NothingToCount);
        }
        entries.iter().map(format_histogram_entry).collect()
    } else {
        return Err(ApiError::NothingToCount);
    };

    Ok(Json(json!({ "meta": META.clone(), "results": results })))
}

/// Histogram buckets arrive keyed by epoch millis; clients get `YYYYMMDD`.
fn format_histogram_entry(entry: &Value) -> Value {
    let mut entry = entry.clone();
    if let Some(millis) = entry.get("time").and_then(Value::as_i64) {
        if let Some(day) = chrono::DateTime::from_timestamp_millis(millis) {
            entry["time"] = Value::String(day.format("%Y%m%d").to_string());
        }
    }
    entry
}
