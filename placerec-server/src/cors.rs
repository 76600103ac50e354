//! CORS policy
//!
//! Every response carries `Access-Control-Allow-Origin` for the configured
//! origin. Preflight requests are answered by the layer itself with the
//! allowed methods (GET, POST, OPTIONS) and headers (Content-Type).

use axum::http::{header, HeaderValue, Method};
use placerec_common::{Error, Result};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Origin permitted to call the API
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AllowedOrigin {
    /// `*`
    #[default]
    Any,
    /// A single frontend origin, e.g. `https://realbocho.github.io`
    Exact(HeaderValue),
}

impl AllowedOrigin {
    /// Parse a configured origin; `"*"` means any origin
    pub fn parse(origin: &str) -> Result<Self> {
        if origin == "*" {
            return Ok(AllowedOrigin::Any);
        }
        HeaderValue::from_str(origin)
            .map(AllowedOrigin::Exact)
            .map_err(|e| Error::Config(format!("Invalid allowed origin '{}': {}", origin, e)))
    }
}

/// Build the CORS layer for the configured origin
pub fn cors_layer(origin: &AllowedOrigin) -> CorsLayer {
    let allow_origin = match origin {
        AllowedOrigin::Any => AllowOrigin::any(),
        AllowedOrigin::Exact(value) => AllowOrigin::exact(value.clone()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
