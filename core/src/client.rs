//! Client for the Synology web API.
//!
//! # Design
//! `Client` owns a validated base URL, a `Transport`, and an optional cached
//! session id. Every call is one GET with all parameters in the query
//! string; the response body is always the same envelope
//! (`{success, error: {code}, data}`) and is decoded here before `data` is
//! handed to the caller's type.
//!
//! Construction goes through `ClientBuilder`, which records options in call
//! order and applies them to a `ClientConfig` at `build()`. The login option
//! issues a real request through whatever URL and transport are configured
//! at that point, so it belongs after them.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::auth::{AuthLogin, AuthLoginResponse};
use crate::error::{ApiError, Error};
use crate::http::{HttpRequest, Transport, UreqTransport};
use crate::request::{MarshalRequest, Request};

/// Provides access to the Synology API.
pub struct Client {
    url: Url,
    transport: Box<dyn Transport>,
    sid: Option<String>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.url
    }

    /// The session id attached to requests that do not carry their own.
    pub fn session_id(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    /// Marshal `request` and send it, decoding the payload into `T`.
    ///
    /// A marshaling failure is returned before any network activity.
    pub fn call<T, R>(&self, request: &R) -> Result<T, Error>
    where
        T: DeserializeOwned,
        R: MarshalRequest + ?Sized,
    {
        let req = request.marshal_request()?;
        self.send(&req)
    }

    /// Like `call`, but ignores any payload.
    pub fn call_discard<R>(&self, request: &R) -> Result<(), Error>
    where
        R: MarshalRequest + ?Sized,
    {
        let req = request.marshal_request()?;
        self.send_discard(&req)
    }

    /// Perform an API request and decode its `data` into `T`.
    pub fn send<T: DeserializeOwned>(&self, request: &Request) -> Result<T, Error> {
        let data = exchange(
            &self.url,
            self.transport.as_ref(),
            self.sid.as_deref(),
            request,
        )?;
        Ok(serde_json::from_value(data)?)
    }

    /// Perform an API request, succeeding as long as the API reports success.
    pub fn send_discard(&self, request: &Request) -> Result<(), Error> {
        exchange(
            &self.url,
            self.transport.as_ref(),
            self.sid.as_deref(),
            request,
        )?;
        Ok(())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url.as_str())
            .field("transport", &self.transport.name())
            .field("sid", &self.sid.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A partially built client that options mutate in order.
pub struct ClientConfig {
    url: Option<Url>,
    transport: Box<dyn Transport>,
    sid: Option<String>,
}

impl ClientConfig {
    fn new() -> Self {
        Self {
            url: None,
            transport: Box::new(UreqTransport::default()),
            sid: None,
        }
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Box::new(transport);
    }

    pub fn set_sid(&mut self, sid: impl Into<String>) {
        self.sid = Some(sid.into());
    }

    /// Log in through the currently configured URL and transport and cache
    /// the returned session id.
    pub fn login(&mut self, mut login: AuthLogin) -> Result<(), Error> {
        let url = self
            .url
            .as_ref()
            .filter(|u| is_absolute(u))
            .ok_or(Error::UrlMisconfigured)?;
        login.format = "sid".to_string();
        let req = login.marshal_request()?;
        let data = exchange(url, self.transport.as_ref(), self.sid.as_deref(), &req)?;
        let res: AuthLoginResponse = serde_json::from_value(data)?;
        info!(account = %login.account, "logged in");
        self.sid = Some(res.sid);
        Ok(())
    }

    fn finish(self) -> Result<Client, Error> {
        match self.url {
            Some(url) if is_absolute(&url) => Ok(Client {
                url,
                transport: self.transport,
                sid: self.sid,
            }),
            _ => Err(Error::UrlMisconfigured),
        }
    }
}

type ClientOption = Box<dyn FnOnce(&mut ClientConfig) -> Result<(), Error>>;

/// Collects configuration options and applies them in order on `build()`.
#[derive(Default)]
pub struct ClientBuilder {
    options: Vec<ClientOption>,
}

impl ClientBuilder {
    /// Base URL all API paths are resolved against. Only its scheme, host
    /// and port are used.
    pub fn url(self, url: Url) -> Self {
        self.with(move |c| {
            c.set_url(url);
            Ok(())
        })
    }

    /// Like `url`, parsing `raw` when the client is built.
    pub fn raw_url(self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.with(move |c| {
            c.set_url(Url::parse(&raw)?);
            Ok(())
        })
    }

    /// Transport for all requests. `UreqTransport` is used if not set.
    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.with(move |c| {
            c.set_transport(transport);
            Ok(())
        })
    }

    /// Default session id to authenticate requests with.
    pub fn sid(self, sid: impl Into<String>) -> Self {
        let sid = sid.into();
        self.with(move |c| {
            c.set_sid(sid);
            Ok(())
        })
    }

    /// Log in while building and use the returned session id. Runs with the
    /// URL and transport configured by the options before it.
    pub fn login(self, login: AuthLogin) -> Self {
        self.with(move |c| c.login(login))
    }

    /// Add an arbitrary option. Its error aborts `build()`.
    pub fn with<F>(mut self, option: F) -> Self
    where
        F: FnOnce(&mut ClientConfig) -> Result<(), Error> + 'static,
    {
        self.options.push(Box::new(option));
        self
    }

    /// Apply every option in order and validate the result.
    pub fn build(self) -> Result<Client, Error> {
        let mut config = ClientConfig::new();
        for option in self.options {
            option(&mut config)?;
        }
        config.finish()
    }
}

fn is_absolute(url: &Url) -> bool {
    url.has_host() && !url.cannot_be_a_base()
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<EnvelopeError>,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    code: i32,
}

/// Build the query, run the exchange, and unwrap the envelope into its
/// `data` on success.
fn exchange(
    base: &Url,
    transport: &dyn Transport,
    cached_sid: Option<&str>,
    request: &Request,
) -> Result<serde_json::Value, Error> {
    let url = request_url(base, cached_sid, request);
    debug!(
        api = %request.api,
        method = %request.method,
        path = %request.path,
        "sending request"
    );

    let response = transport
        .round_trip(HttpRequest { url: url.into() })
        .map_err(Error::Transport)?;

    let envelope: Envelope = serde_json::from_str(&response.body)?;
    if !envelope.success.unwrap_or(false) {
        let code = envelope.error.map_or(0, |e| e.code);
        debug!(api = %request.api, method = %request.method, code, "API returned an error");
        return Err(ApiError(code).into());
    }
    Ok(envelope.data)
}

/// Resolve `request` against the base URL. The base's own path, query and
/// fragment are replaced; the request's sid wins over the cached one.
fn request_url(base: &Url, cached_sid: Option<&str>, request: &Request) -> Url {
    let mut url = base.clone();
    url.set_path(&request.path);
    url.set_fragment(None);

    let sid = request
        .sid
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(cached_sid.filter(|s| !s.is_empty()));

    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("api", &request.api)
            .append_pair("version", &request.version)
            .append_pair("method", &request.method);
        if let Some(sid) = sid {
            query.append_pair("_sid", sid);
        }
        for (key, value) in request.params.iter() {
            query.append_pair(key, value);
        }
    }
    url
}
