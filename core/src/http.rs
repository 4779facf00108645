//! HTTP exchange types and the transport capability.
//!
//! # Design
//! Requests and responses are plain data. The client builds an
//! `HttpRequest`, hands it to whatever `Transport` it was configured with,
//! and decodes the `HttpResponse` it gets back. Connection handling, TLS,
//! pooling and retries all belong to the transport. `UreqTransport` is the
//! blocking default used when no transport is supplied.

use crate::error::BoxError;

/// A GET request with no body, described as plain data. Every API
/// parameter travels in the query string of `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
}

/// An HTTP response described as plain data. The client decodes only
/// `body`; `status` and `headers` are kept for transports and callers.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes one HTTP exchange.
///
/// Any `Fn(HttpRequest) -> Result<HttpResponse, BoxError>` closure is a
/// transport, which keeps test doubles one line long.
pub trait Transport: Send + Sync {
    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;

    /// Name shown in `Debug` output of the owning client. Defaults to the
    /// type name; closure transports print their compiler-generated name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, BoxError> + Send + Sync,
{
    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        self(request)
    }
}

/// Default transport backed by a blocking `ureq` agent.
///
/// Status codes are returned as data rather than errors; the envelope in the
/// body decides whether a call succeeded.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut response = self.agent.get(&request.url).call()?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
