use thiserror::Error;

pub use aws_sdk_dynamodb::Error as AwsError;

/// Error returned when a [`StoreConfig`](crate::StoreConfig) cannot produce a usable client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("insufficient credentials: set an identity pool id or both an access key id and a secret access key")]
    InsufficientCredentials,
    #[error("no region configured (set AWS_REGION)")]
    MissingRegion,
    #[error("no table name configured (set {0})")]
    MissingTableName(String),
}

/// Error returned by [`encode`](crate::encode) when a value cannot be serialized to JSON
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("JsonError: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error returned when the `JSON` attribute of a stored item cannot be decoded
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid attribute {name}: expected {expected}")]
    InvalidAttribute { name: String, expected: &'static str },
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Error returned by [`Store::get`](crate::Store::get)
#[derive(Error, Debug)]
pub enum GetError {
    #[error("store has not been initialized")]
    NotInitialized,
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("AwsError: {0}")]
    Aws(#[from] AwsError),
    #[error("DecodeError: {0}")]
    Decode(#[from] DecodeError),
}

/// Error returned by [`Store::put`](crate::Store::put)
#[derive(Error, Debug)]
pub enum PutError {
    #[error("store has not been initialized")]
    NotInitialized,
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("AwsError: {0}")]
    Aws(#[from] AwsError),
    #[error("EncodeError: {0}")]
    Encode(#[from] EncodeError),
}

/// Error returned by [`Store::update_item`](crate::Store::update_item)
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("store has not been initialized")]
    NotInitialized,
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("AwsError: {0}")]
    Aws(#[from] AwsError),
}

/// Error returned by [`Store::delete_item`](crate::Store::delete_item)
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("store has not been initialized")]
    NotInitialized,
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("AwsError: {0}")]
    Aws(#[from] AwsError),
}

/// Error returned by [`Store::query_items`](crate::Store::query_items)
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("store has not been initialized")]
    NotInitialized,
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("AwsError: {0}")]
    Aws(#[from] AwsError),
    #[error("DecodeError: {0}")]
    Decode(#[from] DecodeError),
}

/// Error returned by [`Store::scan_table`](crate::Store::scan_table)
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("store has not been initialized")]
    NotInitialized,
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("AwsError: {0}")]
    Aws(#[from] AwsError),
    #[error("DecodeError: {0}")]
    Decode(#[from] DecodeError),
}

/// Error abstracting all errors returned by `dynamo-lite`.
///
/// If you use this error you can use `?` to convert from other `dynamo-lite` errors to
/// this one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("ConfigError: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("GetError: {0}")]
    GetError(#[from] GetError),
    #[error("PutError: {0}")]
    PutError(#[from] PutError),
    #[error("UpdateError: {0}")]
    UpdateError(#[from] UpdateError),
    #[error("DeleteError: {0}")]
    DeleteError(#[from] DeleteError),
    #[error("QueryError: {0}")]
    QueryError(#[from] QueryError),
    #[error("ScanError: {0}")]
    ScanError(#[from] ScanError),
}
