use camgate_domain::{Arn, BoundCidrs, LeaseParams};

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoleWriteMode {
    Create,
    Update,
}

impl RoleService {
    /// Creates a role, or updates it when one already exists under `name`.
    pub async fn create_role(&self, name: &str, input: RoleInput) -> AppResult<RoleWriteOutcome> {
        self.write_role(name, input, RoleWriteMode::Create).await
    }

    /// Updates an existing role. Absent fields keep their stored values.
    pub async fn update_role(&self, name: &str, input: RoleInput) -> AppResult<RoleWriteOutcome> {
        self.write_role(name, input, RoleWriteMode::Update).await
    }

    async fn write_role(
        &self,
        name: &str,
        input: RoleInput,
        mode: RoleWriteMode,
    ) -> AppResult<RoleWriteOutcome> {
        let name = RoleName::new(name)?;
        let existing = self.load_role(&name).await?;
        if mode == RoleWriteMode::Update && existing.is_none() {
            return Err(AppError::RoleNotFound(name.to_string()));
        }

        let arn = match (input.arn, existing.as_ref()) {
            (Some(arn), _) => Arn::parse(arn.trim())
                .map_err(|error| AppError::InvalidRoleArn(error.to_string()))?,
            (None, Some(record)) => record.arn().clone(),
            (None, None) => return Err(AppError::MissingField("arn".to_owned())),
        };

        let policies = match (input.policies, existing.as_ref()) {
            (Some(policies), _) => policies,
            (None, Some(record)) => record.policies(),
            (None, None) => Vec::new(),
        };

        let current_lease = existing
            .as_ref()
            .map(RoleRecord::lease)
            .unwrap_or_default();
        let lease = LeaseParams::new(
            input.ttl.unwrap_or(current_lease.ttl()),
            input.max_ttl.unwrap_or(current_lease.max_ttl()),
            input.period.unwrap_or(current_lease.period()),
        )?;

        let bound_cidrs = match (input.bound_cidrs, existing.as_ref()) {
            (Some(cidrs), _) => BoundCidrs::parse(cidrs)?,
            (None, Some(record)) => record.bound_cidrs().clone(),
            (None, None) => BoundCidrs::default(),
        };

        let record = RoleRecord::new(name.clone(), arn, policies, lease, bound_cidrs)?;
        let warnings = self.lease_warnings(&lease);

        let bytes = serde_json::to_vec(&record)
            .map_err(|error| AppError::Internal(format!("failed to encode role '{name}': {error}")))?;
        self.storage.put(role_key(&name).as_str(), bytes).await?;

        tracing::info!(
            role = %name,
            arn = %record.arn(),
            created = existing.is_none(),
            "role written"
        );

        Ok(RoleWriteOutcome { warnings })
    }

    fn lease_warnings(&self, lease: &LeaseParams) -> Vec<String> {
        let system_max = self.system_max_lease_ttl;
        if system_max.is_zero() {
            return Vec::new();
        }

        let mut warnings = Vec::new();
        if lease.ttl() > system_max {
            warnings.push(format!(
                "ttl of {}s is greater than the system max lease ttl of {}s; issued leases will be capped",
                lease.ttl().as_secs(),
                system_max.as_secs()
            ));
        }
        if lease.max_ttl() > system_max {
            warnings.push(format!(
                "max_ttl of {}s is greater than the system max lease ttl of {}s; issued leases will be capped",
                lease.max_ttl().as_secs(),
                system_max.as_secs()
            ));
        }

        warnings
    }
}
