use crate::errors::ConfigError;
use std::{env, fmt};

pub const TABLE_ENV: &str = "DYNAMODB_TABLE";
pub const REGION_ENV: &str = "AWS_REGION";
pub const IDENTITY_POOL_ENV: &str = "AWS_IDENTITY_POOL_ID";
pub const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENDPOINT_ENV: &str = "DYNAMODB_ENDPOINT";

/// Settings used to initialize a [`Store`](crate::Store).
///
/// Build one with [`StoreConfig::builder`]. Values set explicitly on the builder always take
/// precedence over the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub region: String,
    pub identity_pool_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub table_name: TableName,
    pub endpoint_url: Option<String>,
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

// The secret must never end up in logs
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("region", &self.region)
            .field("identity_pool_id", &self.identity_pool_id)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "** redacted **"),
            )
            .field("table_name", &self.table_name)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Where the target table name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableName {
    /// Read the named environment variable on every call.
    Env(String),
    Fixed(String),
}

impl TableName {
    /// Resolve the table name for a single request.
    pub fn resolve(&self) -> Result<String, ConfigError> {
        match self {
            Self::Fixed(name) => Ok(name.clone()),
            Self::Env(var) => non_empty(env::var(var).ok())
                .ok_or_else(|| ConfigError::MissingTableName(var.clone())),
        }
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self::Env(TABLE_ENV.to_string())
    }
}

#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    region: Option<String>,
    identity_pool_id: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    table_name: Option<String>,
    endpoint_url: Option<String>,
    env: Option<EnvDefaults>,
}

#[derive(Debug, Default)]
struct EnvDefaults {
    region: Option<String>,
    identity_pool_id: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    endpoint_url: Option<String>,
}

impl EnvDefaults {
    fn load() -> Self {
        let var = |name: &str| non_empty(env::var(name).ok());

        Self {
            region: var(REGION_ENV),
            identity_pool_id: var(IDENTITY_POOL_ENV),
            access_key_id: var(ACCESS_KEY_ID_ENV),
            secret_access_key: var(SECRET_ACCESS_KEY_ENV),
            endpoint_url: var(ENDPOINT_ENV),
        }
    }
}

impl StoreConfigBuilder {
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn identity_pool_id(mut self, identity_pool_id: impl Into<String>) -> Self {
        self.identity_pool_id = Some(identity_pool_id.into());
        self
    }

    pub fn access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    pub fn secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Use a fixed table instead of reading `DYNAMODB_TABLE` on every call.
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Send requests to a custom endpoint, e.g. DynamoDB Local on `http://localhost:8000`.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Fill any field that is not set explicitly from the environment.
    ///
    /// The table name is not captured here; see [`TableName::Env`].
    pub fn with_env(mut self) -> Self {
        self.env = Some(EnvDefaults::load());
        self
    }

    pub fn build(self) -> Result<StoreConfig, ConfigError> {
        let env = self.env.unwrap_or_default();

        let region = non_empty(self.region)
            .or(env.region)
            .ok_or(ConfigError::MissingRegion)?;

        Ok(StoreConfig {
            region,
            identity_pool_id: non_empty(self.identity_pool_id).or(env.identity_pool_id),
            access_key_id: non_empty(self.access_key_id).or(env.access_key_id),
            secret_access_key: non_empty(self.secret_access_key).or(env.secret_access_key),
            table_name: non_empty(self.table_name)
                .map(TableName::Fixed)
                .unwrap_or_default(),
            endpoint_url: non_empty(self.endpoint_url).or(env.endpoint_url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
