use camgate_domain::{METADATA_ARN, METADATA_ARN_ROLE_NAME, METADATA_ROLE_NAME};

use super::*;

impl LoginService {
    /// Re-validates a previously issued credential against the current role.
    ///
    /// Only stored data is consulted. The lease is replaced with the role's
    /// current settings and everything else is returned unchanged.
    pub async fn renew(&self, credential: IssuedCredential) -> AppResult<IssuedCredential> {
        let caller_arn = Arn::parse(credential.required_metadata(METADATA_ARN)?)?;
        let role_name = RoleName::new(credential.required_metadata(METADATA_ROLE_NAME)?)?;
        let caller_arn =
            caller_arn.with_resolved_role_name(credential.required_metadata(METADATA_ARN_ROLE_NAME)?);

        let role = self.load_bound_role(&role_name).await?;
        ensure_member(&caller_arn, &role)?;

        let mut renewed = credential;
        renewed.lease = role.lease();

        tracing::info!(role = %role_name, arn = %caller_arn, "credential renewed");
        Ok(renewed)
    }
}
