//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Pitstop
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pitstop_core::errors::BookingError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookingError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// Converts application errors to HTTP responses
///
/// Maps each error type to the appropriate HTTP status code and formats the
/// error message into a JSON body of the shape `{"error": "..."}`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::NoCapacity(_) => StatusCode::BAD_REQUEST,
            BookingError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            BookingError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            BookingError::Forbidden(_) => StatusCode::FORBIDDEN,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, BookingError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Wraps the eyre error in a `BookingError::Database` variant so repository
/// failures can propagate with `?`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}
