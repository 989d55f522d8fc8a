//! Versioned API dialects of the upstream QoD gateway.
//!
//! Everything here is a pure function of `(resource, operation, api_version)`:
//! no I/O, no token handling.

pub mod payload;

use std::fmt;
use std::str::FromStr;

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::credentials::Credentials;
use crate::dialect::payload::project_session_payload;
use crate::errors::{TelcoError, TelcoResult};
use crate::utils::constants::{API_VERSION_MEC_QOS_V1, API_VERSION_QOD_RC_V1, API_VERSION_QOD_V0};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    QodV0,
    QodRcV1,
    MecQosV1,
}

impl FromStr for ApiVersion {
    type Err = TelcoError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim() {
            API_VERSION_QOD_V0 => Ok(ApiVersion::QodV0),
            API_VERSION_QOD_RC_V1 => Ok(ApiVersion::QodRcV1),
            API_VERSION_MEC_QOS_V1 => Ok(ApiVersion::MecQosV1),
            other => Err(TelcoError::Configuration(format!(
                "unsupported api version '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::QodV0 => API_VERSION_QOD_V0,
            ApiVersion::QodRcV1 => API_VERSION_QOD_RC_V1,
            ApiVersion::MecQosV1 => API_VERSION_MEC_QOS_V1,
        }
    }

    fn sessions_root(&self) -> &'static str {
        match self {
            ApiVersion::QodV0 => "/qod/v0/sessions",
            ApiVersion::QodRcV1 => "/qod-rc/v1/sessions",
            ApiVersion::MecQosV1 => "/hp3v-meccontroller-v1-qos/sessions",
        }
    }

    fn consent_root(&self) -> Option<&'static str> {
        match self {
            ApiVersion::QodV0 => Some("/consent/v0"),
            ApiVersion::QodRcV1 => Some("/consent-rc/v1"),
            ApiVersion::MecQosV1 => None,
        }
    }

    /// Status the upstream answers a successful session create with.
    pub fn create_success(&self) -> StatusCode {
        match self {
            ApiVersion::QodV0 | ApiVersion::QodRcV1 => StatusCode::CREATED,
            ApiVersion::MecQosV1 => StatusCode::OK,
        }
    }

    /// Field of the upstream create response holding the session id.
    pub fn upstream_id_field(&self) -> &'static str {
        match self {
            ApiVersion::QodV0 | ApiVersion::QodRcV1 => "id",
            ApiVersion::MecQosV1 => "sessionId",
        }
    }

    pub fn wrap_session_id(&self, id: String) -> SessionCreated {
        match self {
            ApiVersion::QodV0 | ApiVersion::MecQosV1 => SessionCreated::Id { id },
            ApiVersion::QodRcV1 => SessionCreated::SessionId { session_id: id },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Session,
    Purpose,
    App,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Session => "session",
            Resource::Purpose => "purpose",
            Resource::App => "app",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create(Value),
    Get(String),
    Delete(String),
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create(_) => "create",
            Operation::Get(_) => "get",
            Operation::Delete(_) => "delete",
        }
    }
}

/// Normalized session-create result handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionCreated {
    SessionId { session_id: String },
    Id { id: String },
}

impl SessionCreated {
    pub fn id(&self) -> &str {
        match self {
            SessionCreated::Id { id } => id,
            SessionCreated::SessionId { session_id } => session_id,
        }
    }
}

/// Upstream request minus the bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(&'static str, String)>,
}

pub fn build_request(
    resource: Resource,
    operation: &Operation,
    version: ApiVersion,
    credentials: &Credentials,
) -> TelcoResult<UpstreamRequest> {
    let root = match resource {
        Resource::Session => version.sessions_root().to_string(),
        Resource::Purpose | Resource::App => {
            let consent = version.consent_root().ok_or_else(|| {
                TelcoError::Configuration(format!(
                    "api version '{}' does not expose {} resources",
                    version,
                    resource.as_str()
                ))
            })?;
            let collection = match resource {
                Resource::Purpose => "purposes",
                _ => "apps",
            };
            format!("{}/{}", consent, collection)
        }
    };

    let (method, path, body) = match operation {
        Operation::Create(payload) => {
            let body = match resource {
                Resource::Session => project_session_payload(payload),
                Resource::Purpose | Resource::App => payload.clone(),
            };
            (Method::POST, root, Some(body))
        }
        Operation::Get(id) => (Method::GET, format!("{}/{}", root, path_segment(id)?), None),
        Operation::Delete(id) => (Method::DELETE, format!("{}/{}", root, path_segment(id)?), None),
    };

    Ok(UpstreamRequest {
        method,
        path,
        body,
        headers: gateway_headers(version, credentials)?,
    })
}

/// Caller ids always land as exactly one segment below the collection.
fn path_segment(id: &str) -> TelcoResult<String> {
    match id {
        "" | "." | ".." => Err(TelcoError::Configuration(format!(
            "'{}' is not a valid resource id",
            id
        ))),
        _ => Ok(urlencoding::encode(id).into_owned()),
    }
}

fn gateway_headers(
    version: ApiVersion,
    credentials: &Credentials,
) -> TelcoResult<Vec<(&'static str, String)>> {
    if version != ApiVersion::MecQosV1 {
        return Ok(Vec::new());
    }
    let subject_name = credentials.gateway_subject_name.as_ref().ok_or_else(|| {
        TelcoError::Configuration(format!("api version '{}' requires gateway_headers", version))
    })?;
    Ok(vec![
        ("apikey", credentials.session.client_id.to_owned()),
        ("X-SUBJECT-NAME", subject_name.to_owned()),
        ("X-CLIENT-CERT-STATUS", "ok".to_string()),
    ])
}

/// `None` unless the upstream answered with the dialect's create status and an id.
pub fn normalize_session_created(
    version: ApiVersion,
    status: StatusCode,
    body: Option<&Value>,
) -> Option<SessionCreated> {
    if status != version.create_success() {
        warn!("session create returned {} on {}, no result", status, version);
        return None;
    }

    let id = body
        .and_then(|value| value.get(version.upstream_id_field()))
        .and_then(|id| match id {
            Value::String(s) if !s.is_empty() => Some(s.to_owned()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    match id {
        Some(id) => Some(version.wrap_session_id(id)),
        None => {
            warn!(
                "session create on {} succeeded without '{}' in the response",
                version,
                version.upstream_id_field()
            );
            None
        }
    }
}
