//! Role definitions binding a provider identity to local policies.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use camgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{Arn, ArnKind, BoundCidrs, LeaseParams};

/// Validated, lower-cased role name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Creates a role name, trimming and lower-casing the input.
    ///
    /// Accepts ASCII letters, digits, `_`, `-`, `.` and `@`, starting and
    /// ending with a letter, digit or `_`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_ascii_lowercase();
        if value.is_empty() {
            return Err(AppError::MissingField("name".to_owned()));
        }

        let is_word = |character: char| character.is_ascii_alphanumeric() || character == '_';
        let allowed = |character: char| is_word(character) || matches!(character, '-' | '.' | '@');

        let starts_with_word = value.chars().next().is_some_and(is_word);
        let ends_with_word = value.chars().last().is_some_and(is_word);
        if !starts_with_word || !ends_with_word || !value.chars().all(allowed) {
            return Err(AppError::Validation(format!(
                "role name '{value}' must use letters, digits, '_', '-', '.' or '@' and start and end with a letter, digit or '_'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Checks that an identity can be bound to a role.
///
/// Only named roles qualify. The role name must be present, otherwise
/// membership would match any unresolved session of the account.
pub fn validate_role_binding(arn: &Arn) -> AppResult<()> {
    if arn.kind() != ArnKind::Role {
        return Err(AppError::InvalidRoleArn(format!(
            "'{arn}' is a {} identity, only {} identities can be bound to a role",
            arn.kind(),
            ArnKind::Role
        )));
    }

    if arn.role_name().is_empty() || arn.account_id().is_empty() {
        return Err(AppError::InvalidRoleArn(format!(
            "'{arn}' must name both an account and a role"
        )));
    }

    Ok(())
}

/// Persisted definition of a login role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    name: RoleName,
    arn: Arn,
    policies: BTreeSet<String>,
    #[serde(flatten)]
    lease: LeaseParams,
    #[serde(default)]
    bound_cidrs: BoundCidrs,
}

impl RoleRecord {
    /// Creates a validated role record.
    pub fn new(
        name: RoleName,
        arn: Arn,
        policies: impl IntoIterator<Item = String>,
        lease: LeaseParams,
        bound_cidrs: BoundCidrs,
    ) -> AppResult<Self> {
        validate_role_binding(&arn)?;

        let policies = policies
            .into_iter()
            .map(|policy| policy.trim().to_owned())
            .filter(|policy| !policy.is_empty())
            .collect();

        Ok(Self {
            name,
            arn,
            policies,
            lease,
            bound_cidrs,
        })
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the bound provider identity.
    #[must_use]
    pub fn arn(&self) -> &Arn {
        &self.arn
    }

    /// Returns policies in sorted order.
    #[must_use]
    pub fn policies(&self) -> Vec<String> {
        self.policies.iter().cloned().collect()
    }

    /// Returns lease parameters.
    #[must_use]
    pub fn lease(&self) -> LeaseParams {
        self.lease
    }

    /// Returns network restrictions.
    #[must_use]
    pub fn bound_cidrs(&self) -> &BoundCidrs {
        &self.bound_cidrs
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use camgate_core::AppError;

    use super::{RoleName, RoleRecord, validate_role_binding};
    use crate::{Arn, BoundCidrs, LeaseParams};

    #[test]
    fn role_names_are_normalized() {
        let name = RoleName::new("  ELK-Prod.eu@team_1 ");
        assert!(matches!(name, Ok(ref value) if value.as_str() == "elk-prod.eu@team_1"));
    }

    #[test]
    fn role_names_reject_bad_shapes() {
        assert!(matches!(RoleName::new("   "), Err(AppError::MissingField(_))));
        assert!(RoleName::new("-elk").is_err());
        assert!(RoleName::new("elk.").is_err());
        assert!(RoleName::new("elk/prod").is_err());
        assert!(RoleName::new("e").is_ok());
    }

    #[test]
    fn assumed_role_cannot_be_bound() {
        let arn = Arn::parse("qcs::sts:1000215438890:assumed-role/4611686018427418890");
        assert!(arn.is_ok());

        if let Ok(arn) = arn {
            assert!(matches!(
                validate_role_binding(&arn),
                Err(AppError::InvalidRoleArn(_))
            ));
        }
    }

    #[test]
    fn role_arn_must_name_a_role() {
        let arn = Arn::parse("qcs::cam::uin/1000215438890:roleName/");
        assert!(arn.is_ok());

        if let Ok(arn) = arn {
            assert!(matches!(
                validate_role_binding(&arn),
                Err(AppError::InvalidRoleArn(_))
            ));
        }
    }

    #[test]
    fn record_round_trips_through_storage_encoding() {
        let record = RoleName::new("elk").and_then(|name| {
            let arn = Arn::parse("qcs::cam::uin/1000215438890:roleName/elk")?;
            let lease = LeaseParams::new(
                Duration::from_secs(10),
                Duration::from_secs(10),
                Duration::from_secs(1),
            )?;
            let cidrs = BoundCidrs::parse(["127.0.0.1/24"])?;
            RoleRecord::new(
                name,
                arn,
                vec!["default".to_owned(), " ".to_owned(), "dev".to_owned()],
                lease,
                cidrs,
            )
        });
        assert!(record.is_ok());

        if let Ok(record) = record {
            assert_eq!(record.policies(), vec!["default".to_owned(), "dev".to_owned()]);

            let encoded = serde_json::to_value(&record).unwrap_or_default();
            assert_eq!(encoded["ttl"], 10);
            assert_eq!(encoded["period"], 1);
            assert_eq!(encoded["arn"], "qcs::cam::uin/1000215438890:roleName/elk");

            let decoded = serde_json::from_value::<RoleRecord>(encoded);
            assert!(matches!(decoded, Ok(ref value) if value == &record));
        }
    }
}
