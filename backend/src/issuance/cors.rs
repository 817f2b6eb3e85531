use axum::{
    extract::State,
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderMap, HeaderValue,
    },
    response::Response,
};

/// Cross-origin headers attached to every issuance response, whatever its status
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
}

impl CorsPolicy {
    /// Creates a policy allowing `allowed_origin`
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not a valid header value
    pub fn new(allowed_origin: &str) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(allowed_origin)?,
            allow_headers: HeaderValue::from_static("Content-Type"),
        })
    }

    /// Writes the CORS headers into `headers`
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
    }
}

/// Response mapper for `axum::middleware::map_response_with_state`, covering
/// responses produced outside the endpoint such as request timeouts
#[allow(clippy::unused_async)]
pub async fn apply_cors(State(cors): State<CorsPolicy>, mut response: Response) -> Response {
    cors.apply(response.headers_mut());
    response
}
