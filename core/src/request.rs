//! The generic request descriptor every API call is reduced to.
//!
//! # Design
//! Typed request objects (`AuthLogin`, `DownloadTaskList`, ...) know their
//! endpoint and how to encode their fields; `Request` is what they produce
//! and the only thing the client consumes. Anything implementing
//! `MarshalRequest` can be passed to `Client::call`.

use std::collections::BTreeMap;

use crate::error::Error;

/// Multi-valued query parameters. Keys are unique and kept sorted, each key
/// may carry several values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, Vec<String>>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, keeping any existing values.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every `(key, value)` pair, repeated keys included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Remove keys whose only value is the empty string.
    pub fn drop_empty(mut self) -> Self {
        self.0.retain(|_, v| !(v.len() == 1 && v[0].is_empty()));
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

/// An API request to Synology, before session and transport concerns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub path: String,
    pub api: String,
    pub version: String,
    pub method: String,
    pub params: Params,
    /// Overrides the client's cached session id when set and non-empty.
    pub sid: Option<String>,
}

/// The fixed location of one API family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub api: &'static str,
    pub version: &'static str,
}

impl Endpoint {
    pub const AUTH: Endpoint = Endpoint {
        path: "/webapi/auth.cgi",
        api: "SYNO.API.Auth",
        version: "3",
    };

    pub const DOWNLOAD_TASK: Endpoint = Endpoint {
        path: "/webapi/DownloadStation/task.cgi",
        api: "SYNO.DownloadStation.Task",
        version: "1",
    };

    pub fn request(&self, method: &str, params: Params) -> Request {
        Request {
            path: self.path.to_string(),
            api: self.api.to_string(),
            version: self.version.to_string(),
            method: method.to_string(),
            params,
            sid: None,
        }
    }
}

/// Implemented by anything that can be serialized to a `Request`.
pub trait MarshalRequest {
    fn marshal_request(&self) -> Result<Request, Error>;
}

impl MarshalRequest for Request {
    fn marshal_request(&self) -> Result<Request, Error> {
        Ok(self.clone())
    }
}

impl<F> MarshalRequest for F
where
    F: Fn() -> Result<Request, Error>,
{
    fn marshal_request(&self) -> Result<Request, Error> {
        self()
    }
}
