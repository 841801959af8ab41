use super::FederatedIdentity;
use aws_credential_types::{
    provider::{self, error::CredentialsError, future, ProvideCredentials, SharedCredentialsProvider},
    Credentials,
};
use aws_sdk_cognitoidentity::{config::BehaviorVersion, Client};
use aws_sdk_dynamodb::config::Region;
use log::debug;
use std::time::SystemTime;
use tokio::sync::OnceCell;

const PROVIDER_NAME: &str = "CognitoIdentityPool";

/// Federated identity backed by an Amazon Cognito identity pool (unauthenticated identities).
#[derive(Debug, Default, Clone, Copy)]
pub struct CognitoIdentity;

impl FederatedIdentity for CognitoIdentity {
    fn resolve(&self, region: &Region, identity_pool_id: &str) -> SharedCredentialsProvider {
        SharedCredentialsProvider::new(CognitoCredentialsProvider::new(
            region.clone(),
            identity_pool_id,
        ))
    }
}

/// Exchanges a Cognito identity for temporary AWS credentials whenever the SDK asks for them.
///
/// The identity id is fetched on first use and reused afterwards; concurrent first requests
/// share a single `GetId` call. Caching of the credentials themselves is left to the SDK's
/// identity cache.
#[derive(Debug)]
pub struct CognitoCredentialsProvider {
    client: Client,
    identity_pool_id: String,
    identity_id: OnceCell<String>,
}

impl CognitoCredentialsProvider {
    pub fn new(region: Region, identity_pool_id: impl Into<String>) -> Self {
        // Cognito identity calls are unsigned, so this client carries no credentials
        let config = aws_sdk_cognitoidentity::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(region)
            .build();

        Self::from_client(Client::from_conf(config), identity_pool_id)
    }

    /// Use a preconfigured Cognito Identity client, e.g. one with a custom HTTP client.
    pub fn from_client(client: Client, identity_pool_id: impl Into<String>) -> Self {
        Self {
            client,
            identity_pool_id: identity_pool_id.into(),
            identity_id: OnceCell::new(),
        }
    }

    async fn identity_id(&self) -> Result<&str, CredentialsError> {
        self.identity_id
            .get_or_try_init(|| async {
                debug!("Requesting identity id from pool {}", self.identity_pool_id);
                self.client
                    .get_id()
                    .identity_pool_id(&self.identity_pool_id)
                    .send()
                    .await
                    .map_err(CredentialsError::provider_error)?
                    .identity_id
                    .ok_or_else(|| {
                        CredentialsError::provider_error("GetId returned no identity id")
                    })
            })
            .await
            .map(String::as_str)
    }

    async fn credentials(&self) -> provider::Result {
        let identity_id = self.identity_id().await?;

        debug!("Requesting credentials for identity {identity_id}");
        let credentials = self
            .client
            .get_credentials_for_identity()
            .identity_id(identity_id)
            .send()
            .await
            .map_err(CredentialsError::provider_error)?
            .credentials
            .ok_or_else(|| {
                CredentialsError::provider_error("GetCredentialsForIdentity returned no credentials")
            })?;

        let access_key_id = credentials
            .access_key_id
            .ok_or_else(|| CredentialsError::provider_error("missing access key id"))?;
        let secret_key = credentials
            .secret_key
            .ok_or_else(|| CredentialsError::provider_error("missing secret key"))?;
        let expiry = credentials
            .expiration
            .and_then(|expiration| SystemTime::try_from(expiration).ok());

        Ok(Credentials::new(
            access_key_id,
            secret_key,
            credentials.session_token,
            expiry,
            PROVIDER_NAME,
        ))
    }
}

impl ProvideCredentials for CognitoCredentialsProvider {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(self.credentials())
    }
}
