use axum::routing::get;
use axum::Router;
use ipca_core::settings::ServerConfig;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{ipca_table, AppState};

/// Build the application router.
///
/// The table lives at `/api/ipca`. Without a static directory `/` answers
/// with the same payload; with one, the directory is served as the fallback
/// and owns `/`.
pub fn app_router(config: &ServerConfig) -> Router {
    let state = AppState::new(config.output_path.clone());

    let mut router = Router::new().route("/api/ipca", get(ipca_table));
    if config.static_dir.is_none() {
        router = router.route("/", get(ipca_table));
    }
    let router = router.with_state(state);

    let router = match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use ipca_core::models::{LongRecord, OUTPUT_COLUMNS};
    use ipca_data::output::write_output_table;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn config(output_path: PathBuf, static_dir: Option<PathBuf>) -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:0".parse().unwrap(),
            output_path,
            static_dir,
        }
    }

    fn sample_records() -> Vec<LongRecord> {
        ["Brasil", "Sudeste", "Sul"]
            .iter()
            .enumerate()
            .map(|(i, region)| LongRecord {
                year: 2024,
                month: 1,
                group: "Alimentação".into(),
                region: region.to_string(),
                variation: i as f64 / 10.0,
            })
            .collect()
    }

    async fn request(router: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_api_ipca_returns_all_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.csv");
        write_output_table(&path, &sample_records()).unwrap();

        let (status, content_type, body) = request(app_router(&config(path, None)), "/api/ipca").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);

        let mut keys: Vec<&str> = rows[0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        let mut expected = OUTPUT_COLUMNS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(rows[1]["regiao"], "Sudeste");
    }

    #[tokio::test]
    async fn test_root_alias_without_static_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.csv");
        write_output_table(&path, &sample_records()).unwrap();

        let (status, _, body) = request(app_router(&config(path, None)), "/").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_table_reread_on_each_request() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.csv");
        write_output_table(&path, &sample_records()).unwrap();
        let router = app_router(&config(path.clone(), None));

        let (_, _, first) = request(router.clone(), "/api/ipca").await;
        write_output_table(&path, &sample_records()[..1]).unwrap();
        let (_, _, second) = request(router, "/api/ipca").await;

        let first: serde_json::Value = serde_json::from_slice(&first).unwrap();
        let second: serde_json::Value = serde_json::from_slice(&second).unwrap();
        assert_eq!(first.as_array().unwrap().len(), 3);
        assert_eq!(second.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_output_is_server_error() {
        let tmp = TempDir::new().unwrap();
        let router = app_router(&config(tmp.path().join("absent.csv"), None));

        let (status, _, _) = request(router, "/api/ipca").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_output_is_server_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.csv");
        std::fs::write(&path, "ano\tmes\tgrupo\tregiao\tvariacao\nx\ty\tA\tB\tz\n").unwrap();

        let (status, _, _) = request(app_router(&config(path, None)), "/api/ipca").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_static_dir_serves_dashboard() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.csv");
        write_output_table(&path, &sample_records()).unwrap();
        let www = tmp.path().join("www");
        std::fs::create_dir_all(&www).unwrap();
        std::fs::write(www.join("index.html"), "<html>dashboard</html>").unwrap();

        let router = app_router(&config(path, Some(www)));

        let (status, _, body) = request(router.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<html>dashboard</html>");

        let (status, content_type, _) = request(router, "/api/ipca").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let router = app_router(&config(tmp.path().join("long.csv"), None));

        let (status, _, _) = request(router, "/api/other").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
