use crate::traits::{AttributeMap, DynamoBackend};
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
    Client,
};

#[async_trait]
impl DynamoBackend for Client {
    async fn get_item(
        &self,
        table_name: &str,
        key: AttributeMap,
    ) -> Result<GetItemOutput, SdkError<GetItemError>> {
        Client::get_item(self)
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: AttributeMap,
    ) -> Result<PutItemOutput, SdkError<PutItemError>> {
        Client::put_item(self)
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: AttributeMap,
        update_expression: &str,
        attribute_values: Option<AttributeMap>,
    ) -> Result<UpdateItemOutput, SdkError<UpdateItemError>> {
        Client::update_item(self)
            .table_name(table_name)
            .set_key(Some(key))
            .update_expression(update_expression)
            .set_expression_attribute_values(attribute_values)
            .send()
            .await
    }

    async fn delete_item(
        &self,
        table_name: &str,
        key: AttributeMap,
    ) -> Result<DeleteItemOutput, SdkError<DeleteItemError>> {
        Client::delete_item(self)
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await
    }

    async fn query(
        &self,
        table_name: &str,
        key_condition_expression: &str,
        attribute_values: Option<AttributeMap>,
    ) -> Result<QueryOutput, SdkError<QueryError>> {
        Client::query(self)
            .table_name(table_name)
            .key_condition_expression(key_condition_expression)
            .set_expression_attribute_values(attribute_values)
            .send()
            .await
    }

    async fn scan(
        &self,
        table_name: &str,
        filter_expression: Option<&str>,
        attribute_values: Option<AttributeMap>,
    ) -> Result<ScanOutput, SdkError<ScanError>> {
        Client::scan(self)
            .table_name(table_name)
            .set_filter_expression(filter_expression.map(str::to_string))
            .set_expression_attribute_values(attribute_values)
            .send()
            .await
    }
}
