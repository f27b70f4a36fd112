//! Verified caller identity returned by the provider.

use camgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// The only caller identity type accepted as a login proof.
pub const SUPPORTED_IDENTITY_TYPE: &str = "CAMRole";

/// Caller identity claim produced by a successful identity round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Identity string of the caller.
    pub arn: String,
    /// Account the caller belongs to.
    pub account_id: String,
    /// Provider user id of the caller.
    pub user_id: String,
    /// Provider principal id of the caller.
    pub principal_id: String,
    /// Provider identity type, e.g. `CAMRole`.
    pub identity_type: String,
    /// Provider request id of the verification call.
    pub request_id: String,
}

impl CallerIdentity {
    /// Rejects claims that cannot authenticate a role login.
    pub fn ensure_supported(&self) -> AppResult<()> {
        if self.identity_type != SUPPORTED_IDENTITY_TYPE {
            return Err(AppError::UnsupportedIdentityType(
                self.identity_type.clone(),
            ));
        }

        if self.arn.is_empty() || self.account_id.is_empty() {
            return Err(AppError::Verification(
                "caller identity response did not include an arn and account id".to_owned(),
            ));
        }

        Ok(())
    }

    /// Returns the name used for display and alias, preferring the user id.
    #[must_use]
    pub fn caller_name(&self) -> &str {
        if self.user_id.is_empty() {
            self.principal_id.as_str()
        } else {
            self.user_id.as_str()
        }
    }
}

#[cfg(test)]
mod tests {
    use camgate_core::AppError;

    use super::CallerIdentity;

    #[test]
    fn only_cam_roles_are_supported() {
        let claim = CallerIdentity {
            arn: "qcs::cam::uin/1:uin/2".to_owned(),
            identity_type: "CAMUser".to_owned(),
            ..CallerIdentity::default()
        };

        assert!(matches!(
            claim.ensure_supported(),
            Err(AppError::UnsupportedIdentityType(kind)) if kind == "CAMUser"
        ));
    }

    #[test]
    fn caller_name_falls_back_to_principal() {
        let mut claim = CallerIdentity {
            principal_id: "4611686018427418890".to_owned(),
            ..CallerIdentity::default()
        };
        assert_eq!(claim.caller_name(), "4611686018427418890");

        claim.user_id = "4611686018427418890:session".to_owned();
        assert_eq!(claim.caller_name(), "4611686018427418890:session");
    }
}
