use serde_json::{json, Value};
use vercel_runtime::{Body, Response};

use crate::{error::AppError, models::CoachResponse};

/// Transport-neutral reply: status plus an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiReply {
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize reply body");
            json!({ "error": "internal error" })
        });
        Self { status, body: Some(body) }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

pub fn error_response(err: &AppError) -> (u16, CoachResponse) {
    let details = match err {
        AppError::EmptyResponse => None,
        AppError::Upstream { details, .. } => Some(details.clone()),
        other => Some(other.to_string()),
    };
    let status = match err {
        AppError::Upstream { status, .. } => Some(*status),
        _ => None,
    };
    (err.status(), CoachResponse::Error { error: err.code(), details, status })
}

/// Maps the pipeline result onto the public response contract.
pub fn normalize(result: crate::Result<String>) -> ApiReply {
    let (status, body) = match result {
        Ok(text) => (200, CoachResponse::Success { response: text }),
        Err(err) => {
            tracing::warn!(status = err.status(), code = err.code(), error = %err, "coaching request failed");
            error_response(&err)
        }
    };
    ApiReply::json(status, &body)
}

/// Renders an [`ApiReply`] for the serverless runtime.
pub fn json_response(reply: &ApiReply) -> anyhow::Result<Response<Body>> {
    let builder = Response::builder().status(reply.status);
    Ok(match &reply.body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(value)?.into())?,
        None => builder.body(Body::Empty)?,
    })
}
