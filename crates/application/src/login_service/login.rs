use camgate_domain::{ArnKind, METADATA_ARN, METADATA_ROLE_NAME};

use super::*;

impl LoginService {
    /// Authenticates a caller and issues a credential for the acting role.
    ///
    /// `remote_address` is the caller's network origin, when known.
    pub async fn login(
        &self,
        input: LoginInput,
        remote_address: Option<IpAddr>,
    ) -> AppResult<IssuedCredential> {
        let mut stage = LoginStage::Received;
        let result = self.run_login(input, remote_address, &mut stage).await;

        match &result {
            Ok(credential) => tracing::info!(
                role = credential.required_metadata(METADATA_ROLE_NAME).unwrap_or_default(),
                arn = credential.required_metadata(METADATA_ARN).unwrap_or_default(),
                "login succeeded"
            ),
            Err(error) => tracing::warn!(stage = %stage, error = %error, "login rejected"),
        }

        result
    }

    async fn run_login(
        &self,
        input: LoginInput,
        remote_address: Option<IpAddr>,
        stage: &mut LoginStage,
    ) -> AppResult<IssuedCredential> {
        let (requested_role, proof) = input.into_proof()?;
        if !self.settings.enabled_strategies.contains(&proof.strategy()) {
            return Err(AppError::Validation(format!(
                "login strategy '{}' is not enabled",
                proof.strategy()
            )));
        }
        advance(stage, LoginStage::InputValidated);

        let claim = self.identity_verifier.verify(&proof).await?;
        claim.ensure_supported()?;
        advance(stage, LoginStage::IdentityVerified);

        let caller_arn = Arn::parse(claim.arn.as_str())?;
        if caller_arn.kind() != ArnKind::AssumedRole {
            return Err(AppError::UnsupportedArnType(format!(
                "only {} arns are supported, but {} was provided",
                ArnKind::AssumedRole,
                caller_arn.kind()
            )));
        }

        let access_key = self.lookup_access_key().await?;
        let provider_role_name = self
            .role_name_resolver
            .resolve_role_name(&access_key, caller_arn.role_id())
            .await?;
        let caller_arn = caller_arn.with_resolved_role_name(provider_role_name);

        let role_name = match requested_role {
            Some(role) => RoleName::new(role)?,
            None => RoleName::new(caller_arn.role_name())
                .map_err(|_| AppError::RoleNotFound(caller_arn.role_name().to_owned()))?,
        };
        advance(stage, LoginStage::RoleResolved);

        let role = self.load_bound_role(&role_name).await?;
        advance(stage, LoginStage::RoleLoaded);

        if !role.bound_cidrs().is_empty() && remote_address.is_none() {
            tracing::warn!(
                role = %role_name,
                "token bound CIDRs found but no connection information available for validation"
            );
        }
        role.bound_cidrs().permits(remote_address)?;
        advance(stage, LoginStage::NetworkChecked);

        ensure_member(&caller_arn, &role)?;
        advance(stage, LoginStage::MembershipChecked);

        let credential = IssuedCredential::issue(&claim, &role, &caller_arn);
        advance(stage, LoginStage::CredentialIssued);

        Ok(credential)
    }

    async fn lookup_access_key(&self) -> AppResult<AccessKey> {
        if let Some(config) = self.client_config_service.read_config().await? {
            return Ok(config.access_key().clone());
        }

        self.settings.fallback_access_key.clone().ok_or_else(|| {
            AppError::Validation(
                "no client configuration or service credentials are available to resolve the caller's role"
                    .to_owned(),
            )
        })
    }
}
