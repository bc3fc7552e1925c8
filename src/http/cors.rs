use vercel_runtime::{Body, Response};

pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const MAX_AGE_SECS: &str = "86400";

pub fn cors_headers(origin: &str) -> [(&'static str, &str); 4] {
    [
        ("Access-Control-Allow-Origin", origin),
        ("Access-Control-Allow-Methods", ALLOW_METHODS),
        ("Access-Control-Allow-Headers", ALLOW_HEADERS),
        ("Access-Control-Max-Age", MAX_AGE_SECS),
    ]
}

pub fn add_cors(mut resp: Response<Body>, origin: &str) -> Response<Body> {
    let h = resp.headers_mut();
    for (name, value) in cors_headers(origin) {
        match value.parse() {
            Ok(v) => {
                h.insert(name, v);
            }
            Err(_) => tracing::warn!(header = name, "skipping CORS header with invalid value"),
        }
    }
    resp
}
