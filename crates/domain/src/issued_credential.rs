//! Credential descriptor handed back to the host after a successful login.

use std::collections::BTreeMap;

use camgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{Arn, BoundCidrs, CallerIdentity, LeaseParams, RoleRecord};

/// Metadata key holding the role the credential was issued for.
pub const METADATA_ROLE_NAME: &str = "role_name";
/// Metadata key holding the id of the bound provider role.
pub const METADATA_ROLE_ID: &str = "role_id";
/// Metadata key holding the caller's identity string.
pub const METADATA_ARN: &str = "arn";
/// Metadata key holding the provider role name resolved at login.
pub const METADATA_ARN_ROLE_NAME: &str = "arn_role_name";
/// Metadata key holding the caller's account.
pub const METADATA_ACCOUNT_ID: &str = "account_id";
/// Metadata key holding the caller's user id.
pub const METADATA_USER_ID: &str = "user_id";
/// Metadata key holding the caller's principal id.
pub const METADATA_PRINCIPAL_ID: &str = "principal_id";
/// Metadata key holding the caller's identity type.
pub const METADATA_IDENTITY_TYPE: &str = "identity_type";
/// Metadata key holding the verification request id.
pub const METADATA_REQUEST_ID: &str = "request_id";

/// Credential descriptor returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredential {
    /// Caller and role details recorded for renewal and audit.
    pub metadata: BTreeMap<String, String>,
    /// Human-readable name of the caller.
    pub display_name: String,
    /// Stable alias of the caller.
    pub alias_name: String,
    /// Policies granted by the role.
    pub policies: Vec<String>,
    /// Network restriction copied from the role.
    #[serde(default)]
    pub bound_cidrs: BoundCidrs,
    /// Lease parameters copied from the role.
    #[serde(flatten)]
    pub lease: LeaseParams,
    /// Whether the host may renew this credential.
    pub renewable: bool,
}

impl IssuedCredential {
    /// Builds the credential for a verified caller acting as `role`.
    ///
    /// `resolved_arn` is the caller's identity with its role name resolved.
    #[must_use]
    pub fn issue(claim: &CallerIdentity, role: &RoleRecord, resolved_arn: &Arn) -> Self {
        let metadata = BTreeMap::from([
            (METADATA_ROLE_NAME.to_owned(), role.name().as_str().to_owned()),
            (METADATA_ROLE_ID.to_owned(), resolved_arn.role_id().to_owned()),
            (METADATA_ARN.to_owned(), claim.arn.clone()),
            (
                METADATA_ARN_ROLE_NAME.to_owned(),
                resolved_arn.role_name().to_owned(),
            ),
            (METADATA_ACCOUNT_ID.to_owned(), claim.account_id.clone()),
            (METADATA_USER_ID.to_owned(), claim.user_id.clone()),
            (METADATA_PRINCIPAL_ID.to_owned(), claim.principal_id.clone()),
            (METADATA_IDENTITY_TYPE.to_owned(), claim.identity_type.clone()),
            (METADATA_REQUEST_ID.to_owned(), claim.request_id.clone()),
        ]);

        Self {
            metadata,
            display_name: claim.caller_name().to_owned(),
            alias_name: claim.caller_name().to_owned(),
            policies: role.policies(),
            bound_cidrs: role.bound_cidrs().clone(),
            lease: role.lease(),
            renewable: true,
        }
    }

    /// Returns a required metadata value.
    pub fn required_metadata(&self, key: &str) -> AppResult<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::MissingMetadata(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use camgate_core::AppError;

    use super::{IssuedCredential, METADATA_ARN_ROLE_NAME, METADATA_ROLE_NAME};
    use crate::{Arn, BoundCidrs, CallerIdentity, LeaseParams, RoleName, RoleRecord};

    #[test]
    fn issue_copies_role_and_caller_details() {
        let built = RoleName::new("elk").and_then(|name| {
            let role = RoleRecord::new(
                name,
                Arn::parse("qcs::cam::uin/1000215438890:roleName/elk")?,
                vec!["default".to_owned()],
                LeaseParams::default(),
                BoundCidrs::default(),
            )?;
            let caller = Arn::parse("qcs::sts:1000215438890:assumed-role/4611686018427418890")?
                .with_resolved_role_name("elk");
            Ok((role, caller))
        });
        assert!(built.is_ok());

        if let Ok((role, caller)) = built {
            let claim = CallerIdentity {
                arn: caller.as_str().to_owned(),
                account_id: "1000215438890".to_owned(),
                principal_id: "4611686018427418890".to_owned(),
                identity_type: "CAMRole".to_owned(),
                ..CallerIdentity::default()
            };

            let credential = IssuedCredential::issue(&claim, &role, &caller);
            assert!(credential.renewable);
            assert_eq!(credential.display_name, "4611686018427418890");
            assert_eq!(credential.policies, vec!["default".to_owned()]);
            assert!(matches!(credential.required_metadata(METADATA_ROLE_NAME), Ok("elk")));
            assert!(matches!(credential.required_metadata(METADATA_ARN_ROLE_NAME), Ok("elk")));
            assert!(matches!(
                credential.required_metadata("user_id"),
                Err(AppError::MissingMetadata(key)) if key == "user_id"
            ));
        }
    }
}
