//! Request handlers for the IPCA endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use ipca_core::error::{IpcaError, Result};
use ipca_core::models::LongRecord;
use ipca_data::output::load_output_table;

// ── State ─────────────────────────────────────────────────────────────────────

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where the ETL writes the long table.
    pub output_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path: Arc::new(output_path),
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Any failure while answering a request. Always rendered as a bare 500.
#[derive(Debug)]
pub struct ApiError(String);

impl From<IpcaError> for ApiError {
    fn from(err: IpcaError) -> Self {
        Self(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to load IPCA table",
        )
            .into_response()
    }
}

// ── Serialization ─────────────────────────────────────────────────────────────

/// Render records as a JSON array of `{ano, mes, grupo, regiao, variacao}`.
pub fn records_to_json(records: &[LongRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(records)?)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /api/ipca`: the whole long table, re-read from disk on every call.
pub async fn ipca_table(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    let path = Arc::clone(&state.output_path);
    let records = tokio::task::spawn_blocking(move || load_output_table(&path))
        .await
        .map_err(|e| ApiError(format!("load task failed: {e}")))??;

    tracing::debug!(rows = records.len(), "serving IPCA table");

    let body = records_to_json(&records)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_to_json_array_of_objects() {
        let records = vec![
            LongRecord {
                year: 2024,
                month: 1,
                group: "Alimentação".into(),
                region: "Brasil".into(),
                variation: 0.5,
            },
            LongRecord {
                year: 2024,
                month: 1,
                group: "Alimentação".into(),
                region: "Sudeste".into(),
                variation: 1.2,
            },
        ];

        let body = records_to_json(&records).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!([
                {"ano": 2024, "mes": 1, "grupo": "Alimentação", "regiao": "Brasil", "variacao": 0.5},
                {"ano": 2024, "mes": 1, "grupo": "Alimentação", "regiao": "Sudeste", "variacao": 1.2},
            ])
        );
    }

    #[test]
    fn test_records_to_json_empty() {
        assert_eq!(records_to_json(&[]).unwrap(), b"[]");
    }

    #[test]
    fn test_api_error_is_internal_server_error() {
        let err: ApiError = IpcaError::OutputNotFound(PathBuf::from("/x")).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
