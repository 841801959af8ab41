mod primary_key;
pub use primary_key::*;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::SdkError,
    operation::{
        delete_item::{DeleteItemError, DeleteItemOutput},
        get_item::{GetItemError, GetItemOutput},
        put_item::{PutItemError, PutItemOutput},
        query::{QueryError, QueryOutput},
        scan::{ScanError, ScanOutput},
        update_item::{UpdateItemError, UpdateItemOutput},
    },
    types::AttributeValue,
};
use std::collections::HashMap;

pub type AttributeMap = HashMap<String, AttributeValue>;

/// The DynamoDB operations a [`Store`](crate::Store) needs from its client.
///
/// Mirrors the request shapes of [`aws_sdk_dynamodb::Client`], which implements it.
/// Empty value maps are passed as `None` by the store before they reach the backend.
#[async_trait]
pub trait DynamoBackend: Send + Sync {
    async fn get_item(
        &self,
        table_name: &str,
        key: AttributeMap,
    ) -> Result<GetItemOutput, SdkError<GetItemError>>;

    async fn put_item(
        &self,
        table_name: &str,
        item: AttributeMap,
    ) -> Result<PutItemOutput, SdkError<PutItemError>>;

    async fn update_item(
        &self,
        table_name: &str,
        key: AttributeMap,
        update_expression: &str,
        attribute_values: Option<AttributeMap>,
    ) -> Result<UpdateItemOutput, SdkError<UpdateItemError>>;

    async fn delete_item(
        &self,
        table_name: &str,
        key: AttributeMap,
    ) -> Result<DeleteItemOutput, SdkError<DeleteItemError>>;

    async fn query(
        &self,
        table_name: &str,
        key_condition_expression: &str,
        attribute_values: Option<AttributeMap>,
    ) -> Result<QueryOutput, SdkError<QueryError>>;

    async fn scan(
        &self,
        table_name: &str,
        filter_expression: Option<&str>,
        attribute_values: Option<AttributeMap>,
    ) -> Result<ScanOutput, SdkError<ScanError>>;
}
