use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use mingle_service::{Error as ServiceError, SearchAllResponse, SearchRequest, SearchResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search/users", post(search_users))
		.route("/v1/search/events", post(search_events))
		.route("/v1/search/dating", post(search_dating))
		.route("/v1/search/all", post(search_all))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_users(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search_users(payload).await?;

	Ok(Json(response))
}

async fn search_events(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search_events(payload).await?;

	Ok(Json(response))
}

async fn search_dating(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search_datings(payload).await?;

	Ok(Json(response))
}

async fn search_all(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchAllResponse>, ApiError> {
	let response = state.service.search_all(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failure while serving a search.");

				Self::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"The search backend is unavailable.",
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
