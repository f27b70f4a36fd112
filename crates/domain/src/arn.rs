//! Provider identity strings and the membership relation between them.
//!
//! Two shapes are recognized:
//!
//! - `qcs::cam::uin/<account>:roleName/<role name>` for a named role;
//! - `qcs::sts:<account>:assumed-role/<role id>` for a session that assumed a role.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use camgate_core::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider prefix of every supported identity string.
pub const ARN_PROVIDER_PREFIX: &str = "qcs";

/// Service namespace of account-management identities.
pub const ARN_SERVICE_CAM: &str = "cam";

/// Service namespace of security-token identities.
pub const ARN_SERVICE_STS: &str = "sts";

const ROLE_NAME_TAG: &str = "roleName";
const ASSUMED_ROLE_TAG: &str = "assumed-role";

/// Shape an identity string matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArnKind {
    /// A long-lived, named role definition.
    Role,
    /// A temporary session derived from a role.
    AssumedRole,
}

impl ArnKind {
    /// Returns the resource tag used by this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => ROLE_NAME_TAG,
            Self::AssumedRole => ASSUMED_ROLE_TAG,
        }
    }
}

impl Display for ArnKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Reasons an identity string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnParseError {
    /// The input was empty.
    #[error("no arn provided")]
    Empty,

    /// Field count, separators or resource tags do not match a known shape.
    #[error("unrecognized arn: {0}")]
    Malformed(String),

    /// The provider prefix or service namespace is not supported.
    #[error("unsupported service: {0}")]
    UnsupportedService(String),
}

impl From<ArnParseError> for AppError {
    fn from(value: ArnParseError) -> Self {
        AppError::InvalidArn(value.to_string())
    }
}

/// Structured, comparable decomposition of a provider identity string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Arn {
    account_id: String,
    role_name: String,
    role_id: String,
    raw: String,
    kind: ArnKind,
}

impl Arn {
    /// Parses an identity string.
    pub fn parse(text: &str) -> Result<Self, ArnParseError> {
        if text.is_empty() {
            return Err(ArnParseError::Empty);
        }

        let fields: Vec<&str> = text.split(':').collect();
        let (prefix, service, account, resource, qualifier) = match fields.as_slice() {
            [prefix, _, service, account, resource] => (*prefix, *service, *account, *resource, None),
            [prefix, _, service, account, resource, qualifier] => {
                (*prefix, *service, *account, *resource, Some(*qualifier))
            }
            other => {
                return Err(ArnParseError::Malformed(format!(
                    "contains {} colon-separated fields, expected 5 or 6",
                    other.len()
                )));
            }
        };

        if prefix != ARN_PROVIDER_PREFIX {
            return Err(ArnParseError::UnsupportedService(format!(
                "arn does not begin with \"{ARN_PROVIDER_PREFIX}:\""
            )));
        }

        match service {
            ARN_SERVICE_CAM => Self::parse_role(text, resource, qualifier),
            ARN_SERVICE_STS => Self::parse_assumed_role(text, account, resource),
            other => Err(ArnParseError::UnsupportedService(format!(
                "'{other}' is neither {ARN_SERVICE_CAM} nor {ARN_SERVICE_STS}"
            ))),
        }
    }

    fn parse_role(
        text: &str,
        resource: &str,
        qualifier: Option<&str>,
    ) -> Result<Self, ArnParseError> {
        let account_id = resource.split('/').nth(1).ok_or_else(|| {
            ArnParseError::Malformed(format!(
                "'{resource}' contains fewer than 2 slash-separated parts"
            ))
        })?;

        let qualifier = qualifier.ok_or_else(|| {
            ArnParseError::Malformed(format!(
                "{ARN_SERVICE_CAM} arn must carry a '{ROLE_NAME_TAG}/<name>' field"
            ))
        })?;
        let role_name = split_tagged(qualifier, ROLE_NAME_TAG)?;

        Ok(Self {
            account_id: account_id.to_owned(),
            role_name: role_name.to_owned(),
            role_id: String::new(),
            raw: text.to_owned(),
            kind: ArnKind::Role,
        })
    }

    fn parse_assumed_role(text: &str, account: &str, resource: &str) -> Result<Self, ArnParseError> {
        let role_id = split_tagged(resource, ASSUMED_ROLE_TAG)?;

        Ok(Self {
            account_id: account.to_owned(),
            role_name: String::new(),
            role_id: role_id.to_owned(),
            raw: text.to_owned(),
            kind: ArnKind::AssumedRole,
        })
    }

    /// Returns the numeric account identifier.
    #[must_use]
    pub fn account_id(&self) -> &str {
        self.account_id.as_str()
    }

    /// Returns the role name, empty for an unresolved assumed role.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role_name.as_str()
    }

    /// Returns the role id, empty for a named role.
    #[must_use]
    pub fn role_id(&self) -> &str {
        self.role_id.as_str()
    }

    /// Returns which shape the identity string matched.
    #[must_use]
    pub fn kind(&self) -> ArnKind {
        self.kind
    }

    /// Returns the identity string exactly as it was parsed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Returns a copy carrying the role name resolved for this identity's role id.
    #[must_use]
    pub fn with_resolved_role_name(&self, role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            ..self.clone()
        }
    }

    /// Reports whether this identity belongs to `possible_parent`.
    ///
    /// Membership requires the same account and the same role name. The
    /// relation is not symmetric: a session is a member of its role, not the
    /// other way round. An assumed role must carry a resolved role name or
    /// it only matches parents whose role name is empty as well.
    #[must_use]
    pub fn is_member_of(&self, possible_parent: &Arn) -> bool {
        possible_parent.account_id == self.account_id && possible_parent.role_name == self.role_name
    }
}

fn split_tagged<'a>(value: &'a str, expected_tag: &str) -> Result<&'a str, ArnParseError> {
    let Some((tag, name)) = value.split_once('/') else {
        return Err(ArnParseError::Malformed(format!(
            "'{value}' does not contain 2 slash-separated parts"
        )));
    };

    if name.contains('/') {
        return Err(ArnParseError::Malformed(format!(
            "'{value}' contains more than 2 slash-separated parts"
        )));
    }

    if tag != expected_tag {
        return Err(ArnParseError::Malformed(format!(
            "expected '{expected_tag}' resource but found '{tag}'"
        )));
    }

    Ok(name)
}

impl FromStr for Arn {
    type Err = ArnParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Arn {
    type Error = ArnParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<Arn> for String {
    fn from(value: Arn) -> Self {
        value.raw
    }
}

impl Display for Arn {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.raw.as_str())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Arn, ArnKind, ArnParseError};

    #[test]
    fn parses_role_arn() {
        let parsed = Arn::parse("qcs::cam::uin/1000215438890:roleName/elk");

        assert!(parsed.is_ok());
        if let Ok(arn) = parsed {
            assert_eq!(arn.account_id(), "1000215438890");
            assert_eq!(arn.role_name(), "elk");
            assert_eq!(arn.role_id(), "");
            assert_eq!(arn.kind(), ArnKind::Role);
        }
    }

    #[test]
    fn parses_assumed_role_arn() {
        let parsed = Arn::parse("qcs::sts:1000215438890:assumed-role/4611686018427418890");

        assert!(parsed.is_ok());
        if let Ok(arn) = parsed {
            assert_eq!(arn.account_id(), "1000215438890");
            assert_eq!(arn.role_name(), "");
            assert_eq!(arn.role_id(), "4611686018427418890");
            assert_eq!(arn.kind(), ArnKind::AssumedRole);
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Arn::parse(""), Err(ArnParseError::Empty));
    }

    #[test]
    fn rejects_unknown_prefix_and_service() {
        assert!(matches!(
            Arn::parse("acs::cam::uin/1:roleName/elk"),
            Err(ArnParseError::UnsupportedService(_))
        ));
        assert!(matches!(
            Arn::parse("qcs::cvm::uin/1:roleName/elk"),
            Err(ArnParseError::UnsupportedService(_))
        ));
    }

    #[test]
    fn rejects_wrong_resource_tags() {
        assert!(matches!(
            Arn::parse("qcs::cam::uin/1:userName/elk"),
            Err(ArnParseError::Malformed(_))
        ));
        assert!(matches!(
            Arn::parse("qcs::sts:1:federated-user/elk"),
            Err(ArnParseError::Malformed(_))
        ));
        assert!(matches!(
            Arn::parse("qcs::sts:1:assumed-role/123/session"),
            Err(ArnParseError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_cam_arn_without_role_field() {
        assert!(matches!(
            Arn::parse("qcs::cam::uin/1000215438890"),
            Err(ArnParseError::Malformed(_))
        ));
        assert!(matches!(
            Arn::parse("qcs::cam::uin:roleName/elk"),
            Err(ArnParseError::Malformed(_))
        ));
    }

    #[test]
    fn resolved_session_is_member_of_its_role() {
        let role = Arn::parse("qcs::cam::uin/1000215438890:roleName/elk");
        let session = Arn::parse("qcs::sts:1000215438890:assumed-role/4611686018427418890");
        assert!(role.is_ok() && session.is_ok());

        if let (Ok(role), Ok(session)) = (role, session) {
            assert!(!session.is_member_of(&role));
            assert!(session.with_resolved_role_name("elk").is_member_of(&role));
            assert!(!session.with_resolved_role_name("fox").is_member_of(&role));
        }
    }

    #[test]
    fn membership_requires_matching_account() {
        let role = Arn::parse("qcs::cam::uin/1000215438890:roleName/elk");
        let session = Arn::parse("qcs::sts:2000215438890:assumed-role/4611686018427418890");
        assert!(role.is_ok() && session.is_ok());

        if let (Ok(role), Ok(session)) = (role, session) {
            assert!(!session.with_resolved_role_name("elk").is_member_of(&role));
        }
    }

    #[test]
    fn empty_role_names_do_not_match_across_accounts() {
        let parent = Arn::parse("qcs::cam::uin/1:roleName/");
        let child = Arn::parse("qcs::sts:2:assumed-role/77");
        assert!(parent.is_ok() && child.is_ok());

        if let (Ok(parent), Ok(child)) = (parent, child) {
            assert_eq!(parent.role_name(), "");
            assert!(!child.is_member_of(&parent));
        }
    }

    #[test]
    fn serde_uses_raw_text() {
        let parsed = Arn::parse("qcs::cam::uin/1000215438890:roleName/elk");
        assert!(parsed.is_ok());

        if let Ok(arn) = parsed {
            let encoded = serde_json::to_string(&arn).unwrap_or_default();
            assert_eq!(encoded, "\"qcs::cam::uin/1000215438890:roleName/elk\"");

            let decoded = serde_json::from_str::<Arn>(encoded.as_str());
            assert!(matches!(decoded, Ok(ref value) if value == &arn));
        }

        assert!(serde_json::from_str::<Arn>("\"qcs::cam\"").is_err());
    }

    proptest! {
        #[test]
        fn role_arns_parse_and_reparse(
            account in "[0-9]{1,13}",
            name in "[A-Za-z0-9_+=,.@-]{1,32}",
        ) {
            let text = format!("qcs::cam::uin/{account}:roleName/{name}");
            let parsed = Arn::parse(text.as_str());
            prop_assert!(parsed.is_ok());

            if let Ok(arn) = parsed {
                prop_assert_eq!(arn.account_id(), account.as_str());
                prop_assert_eq!(arn.role_name(), name.as_str());
                prop_assert_eq!(arn.kind(), ArnKind::Role);
                prop_assert_eq!(Arn::parse(arn.as_str()), Ok(arn.clone()));
            }
        }

        #[test]
        fn assumed_role_arns_parse(
            account in "[0-9]{1,13}",
            role_id in "[0-9]{1,19}",
        ) {
            let text = format!("qcs::sts:{account}:assumed-role/{role_id}");
            let parsed = Arn::parse(text.as_str());
            prop_assert!(parsed.is_ok());

            if let Ok(arn) = parsed {
                prop_assert_eq!(arn.account_id(), account.as_str());
                prop_assert_eq!(arn.role_id(), role_id.as_str());
                prop_assert_eq!(arn.kind(), ArnKind::AssumedRole);
            }
        }

        #[test]
        fn wrong_field_counts_are_rejected(
            fields in prop::collection::vec("[a-z0-9/]{0,6}", 1..12usize)
                .prop_filter("5 or 6 fields may be valid", |fields| fields.len() != 5 && fields.len() != 6),
        ) {
            let text = fields.join(":");
            prop_assume!(!text.is_empty());
            prop_assert!(matches!(Arn::parse(text.as_str()), Err(ArnParseError::Malformed(_))));
        }
    }
}
