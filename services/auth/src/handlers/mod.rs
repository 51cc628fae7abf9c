pub mod account;
pub mod health;
pub mod recovery;
pub mod session;

mod validate;

use axum::extract::FromRequest;
use serde::Serialize;

use crate::error::AuthServiceError;

/// `Json` extractor whose rejections render as `INVALID_REQUEST`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AuthServiceError))]
pub struct JsonBody<T>(pub T);

/// Body of the 200 responses that carry no data.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
