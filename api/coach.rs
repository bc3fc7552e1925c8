use std::sync::OnceLock;

use coach_api::{
    http::{cors::add_cors, handle, response::json_response},
    telemetry, CoachConfig, CoachService,
};
use vercel_runtime::{run, Body, Error, Request, Response};

static SERVICE: OnceLock<CoachService> = OnceLock::new();

fn service() -> &'static CoachService {
    SERVICE.get_or_init(|| CoachService::from_config(CoachConfig::from_env()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init();
    service();
    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    let service = service();
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok());
    let body: &[u8] = req.body();

    tracing::debug!(method = %req.method(), body_len = body.len(), "coach request");
    let reply = handle(service, req.method().as_str(), content_type, body).await;
    let resp = json_response(&reply)?;
    Ok(add_cors(resp, &service.config().allowed_origin))
}
