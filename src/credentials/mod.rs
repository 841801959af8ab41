mod cognito;
pub use cognito::{CognitoCredentialsProvider, CognitoIdentity};

use crate::{config::StoreConfig, errors::ConfigError};
use aws_credential_types::{provider::SharedCredentialsProvider, Credentials};
use aws_sdk_dynamodb::config::Region;
use log::info;

const STATIC_PROVIDER_NAME: &str = "DynamoLiteStatic";

/// Supplies short-lived credentials for an identity pool.
///
/// The returned provider is only asked for credentials once the client makes its first request,
/// so resolving never touches the network.
pub trait FederatedIdentity {
    fn resolve(&self, region: &Region, identity_pool_id: &str) -> SharedCredentialsProvider;
}

/// The credentials a client will be built with.
#[derive(Debug, Clone)]
pub enum ResolvedCredentials {
    Federated(SharedCredentialsProvider),
    Static(Credentials),
}

impl ResolvedCredentials {
    pub fn into_provider(self) -> SharedCredentialsProvider {
        match self {
            Self::Federated(provider) => provider,
            Self::Static(credentials) => SharedCredentialsProvider::new(credentials),
        }
    }
}

/// Pick credentials for `config`.
///
/// An identity pool id wins over a static key pair, even when both are configured.
/// Anything else fails with [`ConfigError::InsufficientCredentials`].
pub fn resolve_credentials(
    config: &StoreConfig,
    federated: &dyn FederatedIdentity,
) -> Result<ResolvedCredentials, ConfigError> {
    if let Some(pool_id) = config.identity_pool_id.as_deref().filter(|id| !id.is_empty()) {
        info!("Using federated credentials from identity pool {pool_id}");
        let region = Region::new(config.region.clone());
        return Ok(ResolvedCredentials::Federated(
            federated.resolve(&region, pool_id),
        ));
    }

    match (
        config.access_key_id.as_deref(),
        config.secret_access_key.as_deref(),
    ) {
        (Some(access_key_id), Some(secret_access_key))
            if !access_key_id.is_empty() && !secret_access_key.is_empty() =>
        {
            info!("Using static credentials");
            Ok(ResolvedCredentials::Static(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                STATIC_PROVIDER_NAME,
            )))
        }
        _ => Err(ConfigError::InsufficientCredentials),
    }
}
