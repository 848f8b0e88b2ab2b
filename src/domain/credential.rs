//! Session credentials: cookie strings and bearer tokens.

use crate::domain::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// How the credential is presented to the HR platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthScheme {
    #[default]
    Cookie,
    Bearer,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cookie" | "cookies" => Ok(AuthScheme::Cookie),
            "bearer" | "token" => Ok(AuthScheme::Bearer),
            other => Err(format!("unknown auth scheme '{other}' (expected cookie or bearer)")),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::Cookie => f.write_str("cookie"),
            AuthScheme::Bearer => f.write_str("bearer"),
        }
    }
}

/// A validated credential. `Debug` never prints secret values.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Cookies(Vec<(String, String)>),
    Bearer(String),
}

impl Credential {
    pub fn parse(raw: &str, scheme: AuthScheme) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingCredential);
        }
        match scheme {
            AuthScheme::Cookie => parse_cookies(raw).map(Credential::Cookies),
            AuthScheme::Bearer => parse_bearer(raw).map(Credential::Bearer),
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        match self {
            Credential::Cookies(_) => AuthScheme::Cookie,
            Credential::Bearer(_) => AuthScheme::Bearer,
        }
    }

    /// Header name and value carrying this credential on every request.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Credential::Cookies(pairs) => {
                let joined: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                ("cookie", joined.join("; "))
            }
            Credential::Bearer(token) => ("authorization", format!("Bearer {token}")),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Cookies(pairs) => {
                let names: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
                f.debug_tuple("Cookies").field(&names).finish()
            }
            Credential::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

fn malformed(reason: impl Into<String>) -> ValidationError {
    ValidationError::MalformedCredential {
        reason: reason.into(),
    }
}

fn parse_cookies(raw: &str) -> Result<Vec<(String, String)>, ValidationError> {
    let body = raw.strip_suffix(';').unwrap_or(raw);
    let mut pairs = Vec::new();
    for (index, part) in body.split(';').enumerate() {
        let part = part.trim();
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| malformed(format!("cookie #{} has no '='", index + 1)))?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            return Err(malformed(format!("cookie #{} has an empty name", index + 1)));
        }
        if value.is_empty() {
            return Err(malformed(format!("cookie '{key}' has an empty value")));
        }
        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(malformed(format!("cookie name '{key}' contains whitespace")));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(malformed(format!("cookie '{key}' contains control characters")));
        }
        pairs.push((key.to_string(), value.to_string()));
    }
    Ok(pairs)
}

fn parse_bearer(raw: &str) -> Result<String, ValidationError> {
    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim();
    let body = token.trim_end_matches('=');
    let valid = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '+' | '/'));
    if !valid {
        return Err(malformed("token contains characters outside the token alphabet"));
    }
    Ok(token.to_string())
}
