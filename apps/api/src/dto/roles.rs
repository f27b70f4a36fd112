use std::time::Duration;

use camgate_application::RoleInput;
use camgate_core::AppResult;
use camgate_domain::{RoleRecord, parse_duration};
use serde::{Deserialize, Serialize};

/// Incoming role write payload. Absent fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct RoleRequest {
    pub arn: Option<String>,
    pub policies: Option<StringListRequest>,
    pub ttl: Option<DurationRequest>,
    pub max_ttl: Option<DurationRequest>,
    pub period: Option<DurationRequest>,
    pub bound_cidrs: Option<StringListRequest>,
}

/// A list given either as an array or as a comma separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StringListRequest {
    Many(Vec<String>),
    Joined(String),
}

/// A duration given in seconds or with an `s`, `m`, `h` or `d` suffix.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DurationRequest {
    Seconds(u64),
    Text(String),
}

/// API representation of a role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub name: String,
    pub arn: String,
    pub policies: Vec<String>,
    pub ttl: u64,
    pub max_ttl: u64,
    pub period: u64,
    pub bound_cidrs: Vec<String>,
}

impl RoleRequest {
    pub fn into_input(self) -> AppResult<RoleInput> {
        Ok(RoleInput {
            arn: self.arn,
            policies: self.policies.map(StringListRequest::into_values),
            ttl: self.ttl.map(|value| value.into_duration("ttl")).transpose()?,
            max_ttl: self
                .max_ttl
                .map(|value| value.into_duration("max_ttl"))
                .transpose()?,
            period: self
                .period
                .map(|value| value.into_duration("period"))
                .transpose()?,
            bound_cidrs: self.bound_cidrs.map(StringListRequest::into_values),
        })
    }
}

impl StringListRequest {
    fn into_values(self) -> Vec<String> {
        match self {
            Self::Many(values) => values,
            Self::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl DurationRequest {
    fn into_duration(self, field: &str) -> AppResult<Duration> {
        match self {
            Self::Seconds(seconds) => Ok(Duration::from_secs(seconds)),
            Self::Text(text) => parse_duration(field, text.as_str()),
        }
    }
}

impl From<RoleRecord> for RoleResponse {
    fn from(value: RoleRecord) -> Self {
        let lease = value.lease();
        Self {
            name: value.name().to_string(),
            arn: value.arn().to_string(),
            policies: value.policies(),
            ttl: lease.ttl().as_secs(),
            max_ttl: lease.max_ttl().as_secs(),
            period: lease.period().as_secs(),
            bound_cidrs: value
                .bound_cidrs()
                .networks()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
