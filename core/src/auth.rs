//! `SYNO.API.Auth` requests.

use std::fmt;

use serde::Deserialize;

use crate::error::Error;
use crate::request::{Endpoint, MarshalRequest, Params, Request};

/// Logs in an account. The response is `AuthLoginResponse`.
///
/// Empty fields are left out of the request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthLogin {
    pub account: String,
    pub password: String,
    pub session: String,
    pub format: String,
    pub otp_code: String,
}

impl fmt::Debug for AuthLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthLogin")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .field("session", &self.session)
            .field("format", &self.format)
            .field("otp_code", &self.otp_code)
            .finish()
    }
}

impl MarshalRequest for AuthLogin {
    fn marshal_request(&self) -> Result<Request, Error> {
        let params: Params = [
            ("account", &self.account),
            ("passwd", &self.password),
            ("session", &self.session),
            ("format", &self.format),
            ("otp_code", &self.otp_code),
        ]
        .into_iter()
        .collect();
        Ok(Endpoint::AUTH.request("login", params.drop_empty()))
    }
}

/// The response from an `AuthLogin` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthLoginResponse {
    pub sid: String,
    pub cookie: String,
}
