use axum::extract::FromRequestParts;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use uuid::Uuid;

use pitstop_api::middleware::auth::{ExtractPrincipal, USER_ID_HEADER, USER_ROLE_HEADER};
use pitstop_api::middleware::error_handling::AppError;
use pitstop_core::errors::BookingError;
use pitstop_core::models::user::Role;

#[test]
fn error_status_code_mapping() {
    let cases = vec![
        (
            BookingError::NotFound("missing".to_string()),
            StatusCode::NOT_FOUND,
        ),
        (
            BookingError::Validation("bad input".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            BookingError::NoCapacity("full".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            BookingError::InvalidStatus("Paused".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            BookingError::Unauthenticated("who?".to_string()),
            StatusCode::UNAUTHORIZED,
        ),
        (
            BookingError::Forbidden("not yours".to_string()),
            StatusCode::FORBIDDEN,
        ),
        (
            BookingError::Database(eyre::eyre!("connection refused")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        let response = AppError(err).into_response();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn principal_extracted_from_headers() {
    let id = Uuid::new_v4();
    let request = Request::builder()
        .uri("/api/bookings")
        .header(USER_ID_HEADER, id.to_string())
        .header(USER_ROLE_HEADER, "client")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let ExtractPrincipal(principal) = ExtractPrincipal::from_request_parts(&mut parts, &())
        .await
        .expect("valid headers produce a principal");

    assert_eq!(principal.id, id);
    assert_eq!(principal.role, Role::Client);
}

#[tokio::test]
async fn missing_identity_is_unauthenticated() {
    let request = Request::builder().uri("/api/bookings").body(()).unwrap();
    let (mut parts, _) = request.into_parts();

    let result = ExtractPrincipal::from_request_parts(&mut parts, &()).await;
    let err = result.expect_err("missing headers must be rejected");
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_role_is_unauthenticated() {
    let request = Request::builder()
        .uri("/api/bookings")
        .header(USER_ID_HEADER, Uuid::new_v4().to_string())
        .header(USER_ROLE_HEADER, "superuser")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let result = ExtractPrincipal::from_request_parts(&mut parts, &()).await;
    let err = result.expect_err("unknown role must be rejected");
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}
