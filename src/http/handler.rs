use serde_json::json;

use super::response::{normalize, ApiReply};
use crate::services::CoachService;

/// Method gate for the coaching route. Shared by the serverless entry point
/// and the local dev server.
pub async fn handle(
    service: &CoachService,
    method: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> ApiReply {
    match method {
        "OPTIONS" => ApiReply::empty(200),
        "GET" => ApiReply::json(200, &json!({ "ok": true, "message": "coach api healthy" })),
        "POST" => normalize(service.create_answer(content_type, body).await),
        _ => ApiReply::json(405, &json!({ "error": "Method not allowed" })),
    }
}
