//! Store JSON documents in DynamoDB under a minimal item convention.
//!
//! Every item has a partition key `PK`, an optional sort key `SK` and a single `JSON`
//! attribute holding the serialized value:
//!
//! | PK   | SK   | JSON                      |
//! |------|------|---------------------------|
//! | `K1` |      | `{"name":"A","age":1}`    |
//! | `K2` | `S1` | `{"lastLogin":"2024-..."}`|
//!
//! Writes serialize with `serde_json`, reads parse the payload back. Everything else
//! (transport, retries, signing) is handled by `aws-sdk-dynamodb`.
//!
//! Use a [`Store`] directly, or the free functions ([`init`], [`get`], [`put`], ...) which act
//! on one process-wide store.
//!
//! ## Configuration
//!
//! [`StoreConfig::builder`] with [`with_env`](config::StoreConfigBuilder::with_env) reads
//! `AWS_REGION`, `AWS_IDENTITY_POOL_ID`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and
//! `DYNAMODB_ENDPOINT`. Unless a table name is set explicitly, `DYNAMODB_TABLE` is read on
//! every request.
//!
//! An identity pool id takes precedence over a static key pair. With neither, initialization
//! fails with [`ConfigError::InsufficientCredentials`].

pub mod config;
pub mod credentials;
pub mod errors;
pub mod store;
pub mod traits;

pub use config::{StoreConfig, TableName};
pub use errors::{ConfigError, Error};
pub use store::{
    decode, encode,
    global::{delete_item, get, init, put, query_items, scan_table, update_item},
    Item, Page, Store,
};
pub use traits::{DynamoBackend, Key, KeyValue};

// Re-exports
pub use aws_sdk_dynamodb;
pub use aws_sdk_dynamodb::types::AttributeValue;
