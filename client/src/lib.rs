//! HTTP client for the remote persons collection.
//!
//! # Operations
//!
//! | Method | Request | Success body |
//! |--------|---------|--------------|
//! | [`PersonsClient::get_all`] | `GET {base}` | `[{id, name, number}]` |
//! | [`PersonsClient::create`] | `POST {base}` with `{name, number}` | created record |
//! | [`PersonsClient::update`] | `PUT {base}/{id}` with `{id, name, number}` | updated record |
//! | [`PersonsClient::delete_item`] | `DELETE {base}/{id}` | ignored |
//!
//! # Error Handling
//!
//! Every call returns [`ClientError`]. Non-2xx answers carry the (bounded)
//! failure body; its optional `error` field is parsed when present and exposed
//! through [`ClientError::server_message`]. There are no retries.

mod error;

pub use error::{ClientError, ErrorBody};

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use phonebook_types::{Contact, ContactId, NewContact};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build the shared HTTP client.
///
/// Redirects are not followed: a collection that moves should be reconfigured,
/// not silently chased. Plain `http` is allowed since the collection usually
/// runs on localhost.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("phonebook/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Client for one persons collection.
#[derive(Debug, Clone)]
pub struct PersonsClient {
    http: reqwest::Client,
    base: Url,
}

impl PersonsClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = http_client().map_err(ClientError::Transport)?;
        Self::with_http(http, base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base = parse_base_url(base_url)?;
        Ok(Self { http, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn get_all(&self) -> Result<Vec<Contact>, ClientError> {
        let url = self.base.clone();
        let response = send("GET", &url, self.http.get(url.clone())).await?;
        decode(response).await
    }

    pub async fn create(&self, contact: &NewContact) -> Result<Contact, ClientError> {
        let url = self.base.clone();
        let response = send("POST", &url, self.http.post(url.clone()).json(contact)).await?;
        decode(response).await
    }

    /// Full replace of one contact.
    pub async fn update(&self, id: &ContactId, contact: &Contact) -> Result<Contact, ClientError> {
        let url = self.item_url(id)?;
        let response = send("PUT", &url, self.http.put(url.clone()).json(contact)).await?;
        decode(response).await
    }

    pub async fn delete_item(&self, id: &ContactId) -> Result<(), ClientError> {
        let url = self.item_url(id)?;
        send("DELETE", &url, self.http.delete(url.clone())).await?;
        Ok(())
    }

    fn item_url(&self, id: &ContactId) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base.to_string(),
                reason: "cannot append a path segment".to_string(),
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim()).map_err(|e| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }
    Ok(url)
}

async fn send(
    method: &'static str,
    url: &Url,
    request: RequestBuilder,
) -> Result<Response, ClientError> {
    tracing::debug!(method, %url, "Sending request");

    let response = request.send().await.map_err(|e| {
        tracing::warn!(method, %url, error = %e, "Request failed");
        ClientError::Transport(e)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = ErrorBody::parse(read_capped_error_body(response).await);
    tracing::warn!(
        method,
        %url,
        %status,
        server_error = body.error().unwrap_or(""),
        "Request rejected"
    );
    Err(ClientError::Status { status, body })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(ClientError::Transport)?;
    serde_json::from_slice(&bytes).map_err(ClientError::Decode)
}

async fn read_capped_error_body(response: Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > error::MAX_ERROR_BODY_BYTES {
            body.truncate(error::MAX_ERROR_BODY_BYTES);
            break;
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
