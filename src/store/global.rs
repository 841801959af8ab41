//! Free functions over a single process-wide [`Store`].
//!
//! Call [`init`] once, early, before issuing requests from other tasks. Re-initializing while
//! requests are in flight is allowed but the caller is responsible for any ordering it needs.

use super::{Item, Page, Store};
use crate::{
    config::StoreConfig,
    errors::{ConfigError, DeleteError, GetError, PutError, QueryError, ScanError, UpdateError},
    traits::{AttributeMap, Key},
};
use aws_sdk_dynamodb::operation::{
    delete_item::DeleteItemOutput, put_item::PutItemOutput, update_item::UpdateItemOutput,
};
use serde::{de::DeserializeOwned, Serialize};

static GLOBAL: Store = Store::new();

/// The process-wide store used by the free functions in this module.
pub fn global() -> &'static Store {
    &GLOBAL
}

pub fn init(config: StoreConfig) -> Result<(), ConfigError> {
    GLOBAL.init(config)
}

pub async fn get<T>(key: impl Into<Key>) -> Result<Option<Item<T>>, GetError>
where
    T: DeserializeOwned,
{
    GLOBAL.get(key).await
}

pub async fn put<T>(value: &T, key: impl Into<Key>) -> Result<PutItemOutput, PutError>
where
    T: Serialize + ?Sized,
{
    GLOBAL.put(value, key).await
}

pub async fn update_item(
    key: impl Into<Key>,
    update_expression: &str,
    attribute_values: AttributeMap,
) -> Result<UpdateItemOutput, UpdateError> {
    GLOBAL
        .update_item(key, update_expression, attribute_values)
        .await
}

pub async fn delete_item(key: impl Into<Key>) -> Result<DeleteItemOutput, DeleteError> {
    GLOBAL.delete_item(key).await
}

pub async fn query_items<T>(
    key_condition_expression: &str,
    attribute_values: AttributeMap,
) -> Result<Page<T>, QueryError>
where
    T: DeserializeOwned,
{
    GLOBAL
        .query_items(key_condition_expression, attribute_values)
        .await
}

pub async fn scan_table<T>(
    filter_expression: Option<&str>,
    attribute_values: Option<AttributeMap>,
) -> Result<Page<T>, ScanError>
where
    T: DeserializeOwned,
{
    GLOBAL.scan_table(filter_expression, attribute_values).await
}
