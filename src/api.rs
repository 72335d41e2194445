//! Inbound HTTP surface: route dispatch and error-shape translation only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};

use crate::cache::{CENSUS_KEY, CensusCache};
use crate::census::census_table;
use crate::client::{CocClient, prefix_tag};
use crate::errors::GatewayError;
use crate::missing::missing_members;
use crate::rounds::{parse_round_index, resolve_war};
use crate::types::{CensusTable, LeagueGroup, MissingEntry};

#[derive(Clone)]
pub struct AppState {
    pub client: CocClient,
    pub cache: CensusCache,
    /// Default clan tag from config, without the `#` prefix
    pub clan_tag: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/cwl", get(cwl_census))
        .route("/api/cwl/group", get(cwl_group))
        .route("/api/cwl/war/{index}", get(cwl_war))
        .route("/api/cwl/missing", get(cwl_missing))
        .route("/api/clan/{tag}", get(clan_profile))
        .route("/api/clan/{tag}/warlog", get(clan_war_log))
        .with_state(state)
}

/// Response-shaped error: status plus the stable `{"error", "details"?}` body.
struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn bad_request(message: &str) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.to_string(),
                details: None,
            },
        }
    }

    fn not_found(message: &str) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                error: message.to_string(),
                details: None,
            },
        }
    }

    fn server_error(details: String) -> Self {
        tracing::warn!(details = %details, "request failed against upstream");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: "server error".to_string(),
                details: Some(details),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Error phrasing for the league-group backed endpoints.
fn league_error(err: GatewayError) -> ApiError {
    match err {
        GatewayError::UpstreamNotFound => ApiError::not_found("CWL not found or clan tag wrong"),
        other => ApiError::server_error(other.to_string()),
    }
}

/// Error phrasing for the war-day endpoint. An out-of-range round and a
/// missing war document are indistinguishable to the caller by design.
fn war_error(err: GatewayError) -> ApiError {
    match err {
        GatewayError::RoundNotFound | GatewayError::UpstreamNotFound => {
            ApiError::not_found("war day not found or clan tag wrong")
        }
        GatewayError::InvalidIndex => ApiError::bad_request("invalid index"),
        other => ApiError::server_error(other.to_string()),
    }
}

async fn fetch_league_group(state: &AppState) -> Result<Value, GatewayError> {
    state
        .client
        .league_group(&prefix_tag(&state.clan_tag))
        .await
}

fn parse_league_group(raw: &Value) -> Result<LeagueGroup, ApiError> {
    LeagueGroup::from_value(raw).map_err(|e| ApiError::server_error(e.to_string()))
}

async fn cwl_census(State(state): State<AppState>) -> Result<Json<CensusTable>, ApiError> {
    if let Some(table) = state.cache.get(CENSUS_KEY) {
        tracing::debug!("serving census table from cache");
        return Ok(Json(table));
    }

    let raw = fetch_league_group(&state).await.map_err(league_error)?;
    let group = parse_league_group(&raw)?;
    let table = census_table(&group);
    state.cache.insert(CENSUS_KEY, table.clone());
    Ok(Json(table))
}

async fn cwl_group(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let raw = fetch_league_group(&state).await.map_err(league_error)?;
    Ok(Json(raw))
}

async fn cwl_war(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let index = parse_round_index(&index).map_err(war_error)?;
    let raw = fetch_league_group(&state).await.map_err(war_error)?;
    let group = parse_league_group(&raw)?;
    let war = resolve_war(&state.client, &group, index)
        .await
        .map_err(war_error)?;
    Ok(Json(war))
}

#[derive(Serialize)]
struct MissingResponse {
    missing: Vec<MissingEntry>,
}

async fn cwl_missing(State(state): State<AppState>) -> Result<Json<MissingResponse>, ApiError> {
    let raw = fetch_league_group(&state)
        .await
        .map_err(|e| ApiError::server_error(e.to_string()))?;
    let group = parse_league_group(&raw)?;
    let missing = missing_members(&state.client, &group)
        .await
        .map_err(|e| ApiError::server_error(e.to_string()))?;
    Ok(Json(MissingResponse { missing }))
}

async fn clan_profile(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let profile = state
        .client
        .clan(&prefix_tag(&tag))
        .await
        .map_err(|e| ApiError::server_error(e.to_string()))?;
    Ok(Json(profile))
}

async fn clan_war_log(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.client.war_log(&prefix_tag(&tag)).await {
        Ok(log) => Ok(Json(log)),
        Err(GatewayError::UpstreamForbidden) => Ok(Json(json!({"private": true}))),
        Err(GatewayError::UpstreamNotFound) => Err(ApiError::not_found("clan not found")),
        Err(other) => Err(ApiError::server_error(other.to_string())),
    }
}
