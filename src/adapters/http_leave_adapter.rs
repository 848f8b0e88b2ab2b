//! Blocking HTTP adapter for the HR platform's v3 API.

use crate::domain::credential::Credential;
use crate::domain::error::{NetworkError, NetworkErrorKind};
use crate::domain::leave::LeaveListing;
use crate::ports::leave_port::LeavePort;
use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "https://lengow.ilucca.net";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const LEAVES_ROUTE: &str = "/api/v3/leaves";
pub const CURRENT_USER_ROUTE: &str = "/api/v3/users/me";
pub const LEAVE_REQUEST_ROUTE: &str = "/api/v3/leaveRequestFactory";

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    header: Option<ResponseHeader>,
    data: T,
}

#[derive(Deserialize)]
struct ResponseHeader {
    #[serde(default)]
    principal: Option<String>,
}

#[derive(Deserialize)]
struct LeaveItems {
    #[serde(default)]
    items: Vec<LeaveItem>,
}

#[derive(Deserialize)]
struct LeaveItem {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct CurrentUser {
    #[serde(default)]
    id: Value,
}

pub struct HttpLeaveAdapter {
    client: Option<Client>,
    host: String,
}

impl HttpLeaveAdapter {
    /// Builds a client that sends `credential` on every request.
    pub fn connect(
        host: &str,
        credential: &Credential,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let setup_error = |reason: String| NetworkError::new(NetworkErrorKind::Connect, host, reason);

        let (name, value) = credential.header();
        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| setup_error("credential is not a valid header value".into()))?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(name), value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| setup_error(e.to_string()))?;

        tracing::debug!(host, scheme = %credential.scheme(), "http client ready");
        Ok(Self {
            client: Some(client),
            host: host.trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.host, route)
    }

    fn client(&self, kind: NetworkErrorKind, route: &str) -> Result<&Client, NetworkError> {
        self.client
            .as_ref()
            .ok_or_else(|| NetworkError::new(kind, route, "client already closed"))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        kind: NetworkErrorKind,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, NetworkError> {
        let response = self
            .client(kind, route)?
            .get(self.url(route))
            .query(query)
            .send()
            .map_err(|e| NetworkError::new(kind, route, e.to_string()))?;
        read_envelope(kind, route, response)
    }
}

fn read_envelope<T: DeserializeOwned>(
    kind: NetworkErrorKind,
    route: &str,
    response: Response,
) -> Result<Envelope<T>, NetworkError> {
    let status = response.status();
    tracing::debug!(route, status = status.as_u16(), "GET");
    if !status.is_success() {
        return Err(NetworkError::new(kind, route, format!("HTTP {}", status.as_u16())));
    }
    response
        .json::<Envelope<T>>()
        .map_err(|e| NetworkError::new(kind, route, format!("invalid response body: {e}")))
}

impl LeavePort for HttpLeaveAdapter {
    fn current_user_id(&self) -> Result<u64, NetworkError> {
        let kind = NetworkErrorKind::IdentityLookup;
        let envelope: Envelope<CurrentUser> =
            self.get_json(kind, CURRENT_USER_ROUTE, &[("fields", "id".to_string())])?;
        envelope
            .data
            .id
            .as_u64()
            .ok_or_else(|| NetworkError::new(kind, CURRENT_USER_ROUTE, "response has no numeric data.id"))
    }

    fn list_leaves(
        &self,
        owner_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LeaveListing, NetworkError> {
        let query = [
            ("leavePeriod.ownerId", owner_id.to_string()),
            (
                "date",
                format!("between,{},{}", from.format("%Y-%m-%d"), to.format("%Y-%m-%d")),
            ),
        ];
        let envelope: Envelope<LeaveItems> =
            self.get_json(NetworkErrorKind::LeaveQuery, LEAVES_ROUTE, &query)?;
        Ok(LeaveListing {
            names: envelope.data.items.into_iter().map(|item| item.name).collect(),
            principal: envelope.header.and_then(|h| h.principal),
        })
    }

    fn create_leave(&self, payload: &Value) -> Result<u16, NetworkError> {
        let kind = NetworkErrorKind::Submission;
        let response = self
            .client(kind, LEAVE_REQUEST_ROUTE)?
            .post(self.url(LEAVE_REQUEST_ROUTE))
            .query(&[("isCreation", "true")])
            .json(payload)
            .send()
            .map_err(|e| NetworkError::new(kind, LEAVE_REQUEST_ROUTE, e.to_string()))?;
        let status = response.status().as_u16();
        tracing::debug!(route = LEAVE_REQUEST_ROUTE, status, "POST");
        Ok(status)
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!(host = %self.host, "http client released");
        }
    }
}
