// Authentication endpoints
//
// `POST /auth/login` trades email + password for a bearer token;
// `GET /auth/me` returns the profile the token belongs to.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{ApiClient, handle_response, parse_error};
use crate::error::Error;
use crate::types::{LoginRequest, LoginResponse, User};

impl ApiClient {
    /// Authenticate with email/password and return the issued token.
    ///
    /// A success status without a token in the body is treated as a failed
    /// login, not as an anonymous session.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString, Error> {
        let url = self.url("auth/login")?;
        debug!("logging in at {url}");

        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match parse_error(status, resp).await {
                Error::Api {
                    message,
                    detail: Some(detail),
                    ..
                } => format!("{message} (HTTP {status}): {detail}"),
                Error::Api { message, .. } | Error::Unauthorized { message } => {
                    format!("{message} (HTTP {status})")
                }
                other => other.to_string(),
            };
            return Err(Error::Authentication { message });
        }

        let parsed: LoginResponse = handle_response(resp).await?;
        match parsed.token {
            Some(token) if !token.is_empty() => {
                debug!("login successful");
                Ok(SecretString::from(token))
            }
            _ => Err(Error::MissingField("token")),
        }
    }

    /// Fetch the profile of the account that owns `token`.
    pub async fn me(&self, token: &SecretString) -> Result<User, Error> {
        self.get("auth/me", token, &[]).await
    }
}
