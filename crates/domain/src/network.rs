//! Network-origin restrictions.

use std::net::IpAddr;

use camgate_core::{AppError, AppResult};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// Set of networks a caller must connect from. Empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundCidrs(Vec<IpNet>);

impl BoundCidrs {
    /// Parses CIDR blocks. A bare address is treated as a single-host network.
    pub fn parse<I, S>(values: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut networks = Vec::new();
        for value in values {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            let network = match value.parse::<IpNet>() {
                Ok(network) => network,
                Err(_) => value.parse::<IpAddr>().map(IpNet::from).map_err(|error| {
                    AppError::Decode {
                        field: "bound_cidrs".to_owned(),
                        reason: format!("'{value}' is not a CIDR block: {error}"),
                    }
                })?,
            };
            networks.push(network);
        }

        Ok(Self(networks))
    }

    /// Returns whether no restriction is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the configured networks.
    #[must_use]
    pub fn networks(&self) -> &[IpNet] {
        self.0.as_slice()
    }

    /// Returns whether `address` falls inside any configured network.
    #[must_use]
    pub fn contains(&self, address: IpAddr) -> bool {
        let address = address.to_canonical();
        self.0.iter().any(|network| network.contains(&address))
    }

    /// Checks a caller's remote address against the restriction.
    ///
    /// A restricted set with no known remote address denies the caller.
    pub fn permits(&self, remote_address: Option<IpAddr>) -> AppResult<()> {
        if self.is_empty() {
            return Ok(());
        }

        match remote_address {
            Some(address) if self.contains(address) => Ok(()),
            Some(address) => Err(AppError::PermissionDenied(format!(
                "login is not allowed from {address}"
            ))),
            None => Err(AppError::PermissionDenied(
                "connection information is unavailable for a CIDR-bound role".to_owned(),
            )),
        }
    }
}
