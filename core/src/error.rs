//! Error types for the Synology API client.
//!
//! # Design
//! `Error` separates failures by where they happen: building the client,
//! marshaling a typed request, moving bytes over the transport, decoding the
//! envelope, or the API itself answering `success: false`. Transport and
//! decode failures are carried transparently so callers see the underlying
//! error unchanged. `ApiError` is its own `Copy` type so callers can compare
//! against the well-known codes directly.

use std::fmt;

use thiserror::Error;

/// A boxed error from an injected collaborator (transport, option, marshaler).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `Client` construction and calls.
#[derive(Debug, Error)]
pub enum Error {
    /// The base URL was never set, or is not absolute.
    #[error("syno: client URL misconfigured")]
    UrlMisconfigured,

    /// A raw base URL string could not be parsed.
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    /// A caller-supplied configuration option failed.
    #[error(transparent)]
    Config(BoxError),

    /// A typed request object could not produce a `Request`.
    #[error(transparent)]
    Marshal(BoxError),

    /// The transport failed to execute the HTTP exchange.
    #[error(transparent)]
    Transport(BoxError),

    /// The response envelope or its payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// The API answered with `success: false`.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// The API error code, if this is an API-level failure.
    pub fn api_error(&self) -> Option<ApiError> {
        match self {
            Error::Api(e) => Some(*e),
            _ => None,
        }
    }
}

/// The integer error code returned by the Synology API.
///
/// Two values are equal when their codes are equal, so a returned error can
/// be compared against the associated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiError(pub i32);

impl ApiError {
    pub const UNKNOWN: ApiError = ApiError(100);
    pub const INVALID_PARAMETER: ApiError = ApiError(101);
    pub const INVALID_API: ApiError = ApiError(102);
    pub const INVALID_METHOD: ApiError = ApiError(103);
    pub const UNSUPPORTED_VERSION: ApiError = ApiError(104);
    pub const PERMISSION_DENIED: ApiError = ApiError(105);
    pub const SESSION_TIMEOUT: ApiError = ApiError(106);
    pub const SESSION_INTERRUPTED_DUPLICATE_LOGIN: ApiError = ApiError(107);

    pub fn code(self) -> i32 {
        self.0
    }

    /// Human readable description for the generic codes, `None` otherwise.
    pub fn description(self) -> Option<&'static str> {
        let s = match self {
            ApiError::UNKNOWN => "unknown API error",
            ApiError::INVALID_PARAMETER => "invalid parameter",
            ApiError::INVALID_API => "invalid API",
            ApiError::INVALID_METHOD => "invalid method",
            ApiError::UNSUPPORTED_VERSION => "unsupported version",
            ApiError::PERMISSION_DENIED => "permission denied",
            ApiError::SESSION_TIMEOUT => "session timeout error",
            ApiError::SESSION_INTERRUPTED_DUPLICATE_LOGIN => {
                "session interrupted with duplicated login"
            }
            _ => return None,
        };
        Some(s)
    }

    /// Whether the session id is no longer usable and a new login is needed.
    pub fn is_session_error(self) -> bool {
        matches!(
            self,
            ApiError::SESSION_TIMEOUT | ApiError::SESSION_INTERRUPTED_DUPLICATE_LOGIN
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(s) => write!(f, "syno: {s} ({})", self.0),
            None => write!(f, "syno: error code {}", self.0),
        }
    }
}

impl std::error::Error for ApiError {}
