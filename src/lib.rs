#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod api;
pub mod auth;
pub mod error;
pub(crate) mod serde_helpers;
pub mod storage;
pub mod types;

use std::fmt::Write as _;

use rand::Rng as _;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Request, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Base URL used when no host is configured.
pub const DEFAULT_HOST: &str = "http://localhost:3001/api";

/// Environment variable holding the API base URL, read by [`api::Client::from_env`].
pub const API_URL_VAR: &str = "BETTING_API_URL";

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields into a query string, in
/// field declaration order. Fields skipped during serialization are omitted entirely.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise returns
    /// a string starting with `?` followed by URL-encoded key-value pairs.
    fn query_params(&self) -> String {
        let params = serde_html_form::to_string(self)
            .inspect_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::error!("Unable to convert to URL-encoded string {e:?}");
                #[cfg(not(feature = "tracing"))]
                let _: &serde_html_form::ser::Error = e;
            })
            .unwrap_or_default();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }
}

impl<T: Serialize> ToQueryParams for T {}

/// Generates a fresh client seed for bet placement: 32 random bytes, hex encoded.
///
/// The seed is only forwarded to the server; outcomes are never derived from it locally.
#[must_use]
pub fn generate_client_seed() -> String {
    let bytes: [u8; 32] = rand::rng().random();

    bytes.iter().fold(String::with_capacity(64), |mut seed, byte| {
        let _ = write!(seed, "{byte:02x}");
        seed
    })
}

/// Builds the `Authorization: Bearer <token>` header map for an authenticated call.
pub(crate) fn bearer_headers(token: &SecretString) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Extracts the server's `error` string from a failed response body, falling back to
/// `API Error: <status>` when the body is not JSON or carries no non-empty such field.
pub(crate) fn error_message(status_code: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("API Error: {}", status_code.as_u16()))
}

#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request, headers),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(h) = headers {
        request.headers_mut().extend(h);
    }

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status_code, &body);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let body = response.text().await?;
    let json_value = serde_json::from_str::<serde_json::Value>(&body)?;
    serde_helpers::deserialize_with_warnings(json_value)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_with::skip_serializing_none;

    use super::*;

    #[skip_serializing_none]
    #[derive(Serialize)]
    struct Params {
        status: Option<&'static str>,
        limit: Option<u32>,
        offset: Option<u32>,
    }

    #[test]
    fn query_params_omits_unset_fields() {
        let params = Params {
            status: Some("pending"),
            limit: Some(10),
            offset: None,
        };

        assert_eq!(params.query_params(), "?status=pending&limit=10");
    }

    #[test]
    fn query_params_empty_when_nothing_set() {
        let params = Params {
            status: None,
            limit: None,
            offset: None,
        };

        assert_eq!(params.query_params(), "");
    }

    #[test]
    fn error_message_uses_server_error_field() {
        let message = error_message(StatusCode::UNAUTHORIZED, r#"{"error":"invalid token"}"#);
        assert_eq!(message, "invalid token");
    }

    #[test]
    fn error_message_falls_back_on_unparseable_body() {
        let message = error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(message, "API Error: 500");
    }

    #[test]
    fn error_message_falls_back_when_error_is_not_a_string() {
        let message = error_message(StatusCode::BAD_REQUEST, r#"{"error":{"code":1}}"#);
        assert_eq!(message, "API Error: 400");

        let message = error_message(StatusCode::NOT_FOUND, r#"{"message":"missing"}"#);
        assert_eq!(message, "API Error: 404");
    }

    #[test]
    fn error_message_falls_back_on_empty_error() {
        let message = error_message(StatusCode::FORBIDDEN, r#"{"error":""}"#);
        assert_eq!(message, "API Error: 403");
    }

    #[test]
    fn bearer_headers_carry_token() {
        let headers = bearer_headers(&SecretString::from("t1")).expect("valid header");
        assert_eq!(
            headers.get(AUTHORIZATION).map(HeaderValue::as_bytes),
            Some(b"Bearer t1".as_slice())
        );
        assert!(
            headers
                .get(AUTHORIZATION)
                .is_some_and(HeaderValue::is_sensitive),
            "authorization header should be marked sensitive"
        );
    }

    #[test]
    fn client_seed_is_64_hex_chars() {
        let seed = generate_client_seed();
        assert_eq!(seed.len(), 64);
        assert!(
            seed.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "seed should be lowercase hex: {seed}"
        );
        assert_ne!(seed, generate_client_seed());
    }
}
