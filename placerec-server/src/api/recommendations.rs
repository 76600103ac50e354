//! Recommendation endpoints
//!
//! - `GET /api/recommendations`: every place keyed by `placeName|address`
//! - `POST /api/recommendations`: append a reason, 201 with the updated place
//! - `OPTIONS /api/recommendations`: answered by the CORS layer
//! - `GET /api/recommendations/ranked`: places by recommendation count

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use placerec_common::{Place, PlaceListing, RankedPlace, Submission};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST body. Fields are optional here so that a missing field is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecommendationRequest {
    pub place_name: Option<String>,
    pub address: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub reason: Option<String>,
}

impl CreateRecommendationRequest {
    fn into_submission(self) -> ApiResult<Submission> {
        let (Some(place_name), Some(reason)) = (self.place_name, self.reason) else {
            return Err(ApiError::Validation(
                "placeName and reason are required".to_string(),
            ));
        };
        Ok(Submission::new(place_name, self.address, self.x, self.y, reason)?)
    }
}

/// GET /api/recommendations
pub async fn list_recommendations(State(state): State<AppState>) -> ApiResult<Json<PlaceListing>> {
    let listing = state.store.list().await?;
    debug!(places = listing.len(), "Listed recommendations");
    Ok(Json(listing))
}

/// POST /api/recommendations
///
/// Each call appends, even when the reason text repeats an earlier one.
pub async fn create_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecommendationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Place>)> {
    let Json(request) = payload?;
    let submission = request.into_submission()?;

    let place = state.store.upsert_reason(submission).await?;
    info!(
        key = %place.key(),
        reasons = place.recommendation_count(),
        "Recommendation added"
    );

    Ok((StatusCode::CREATED, Json(place)))
}

/// GET /api/recommendations/ranked
pub async fn ranked_recommendations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RankedPlace>>> {
    let listing = state.store.list().await?;
    Ok(Json(listing.ranked()))
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method.to_string())
}

/// Build recommendation routes
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recommendations",
            get(list_recommendations)
                .post(create_recommendation)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/recommendations/ranked",
            get(ranked_recommendations).fallback(method_not_allowed),
        )
}
