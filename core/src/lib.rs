//! Client for the Synology NAS web APIs.
//!
//! # Overview
//! Typed request objects (`AuthLogin`, `DownloadTaskList`,
//! `DownloadTaskCreate`) marshal themselves into a generic `Request`. The
//! `Client` adds the API name, version, method and session id to the query
//! string, sends a GET through its `Transport`, and decodes the uniform
//! `{success, error, data}` envelope into either an `ApiError` or the
//! caller's payload type.
//!
//! # Design
//! - The transport is injected; `UreqTransport` is the blocking default.
//! - Options on `ClientBuilder` run in order, so `login` sees the URL and
//!   transport configured before it.
//! - Each call is a single exchange: no retries, no background work.
//!
//! The APIs are documented in the Synology developer guides:
//! <https://global.download.synology.com/ftp/Document/DeveloperGuide/>

pub mod auth;
pub mod client;
pub mod download_station;
pub mod error;
pub mod http;
pub mod request;

pub use auth::{AuthLogin, AuthLoginResponse};
pub use client::{Client, ClientBuilder, ClientConfig};
pub use download_station::{
    DownloadTask, DownloadTaskCreate, DownloadTaskList, DownloadTaskListResponse, TaskStatus,
};
pub use error::{ApiError, BoxError, Error};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use request::{Endpoint, MarshalRequest, Params, Request};
