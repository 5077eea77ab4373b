use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "recon-tracker");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_route_without_user_header_is_401() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/vehicle")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // El envelope de error es estable: lo consume el cliente
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_login_with_malformed_body_is_client_error() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from("{\"pin\": 12}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// Función helper para crear la app de test.
// Réplica mínima de la topología del router: health público, login con
// body JSON y rutas de vehículos detrás de la cabecera x-user-id.
fn create_test_app() -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "service": "recon-tracker",
                    "status": "healthy",
                }))
            }),
        )
        .route(
            "/api/auth/login",
            post(|Json(body): Json<serde_json::Value>| async move {
                match body.get("pin").and_then(|p| p.as_str()) {
                    Some(_) => StatusCode::OK.into_response(),
                    None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
                }
            }),
        )
        .route(
            "/api/vehicle",
            get(|request: Request<Body>| async move {
                if request.headers().contains_key("x-user-id") {
                    Json(json!([])).into_response()
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({
                            "error": "Unauthorized",
                            "message": "Cabecera x-user-id requerida",
                            "code": "UNAUTHORIZED",
                        })),
                    )
                        .into_response()
                }
            }),
        )
}
