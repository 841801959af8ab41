#![allow(dead_code)]

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::http::{HttpRequest, HttpResponse},
    error::{ErrorMetadata, SdkError},
    operation::{
        delete_item::{DeleteItemError, DeleteItemOutput},
        get_item::{GetItemError, GetItemOutput},
        put_item::{PutItemError, PutItemOutput},
        query::{QueryError, QueryOutput},
        scan::{ScanError, ScanOutput},
        update_item::{UpdateItemError, UpdateItemOutput},
    },
    types::{
        AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
        ScalarAttributeType,
    },
    Client,
};
use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_runtime_api::http::StatusCode;
use aws_smithy_types::body::SdkBody;
use dynamo_lite::DynamoBackend;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

pub type AttributeMap = HashMap<String, AttributeValue>;

type Table = BTreeMap<(String, String), AttributeMap>;

/// An in-memory stand-in for a DynamoDB table keyed on `PK` (and `SK` when composite).
///
/// It validates keys against the schema the way DynamoDB does and understands just enough
/// expression syntax for the tests: `SET a = :a, ...` updates, `PK = :pk` with an optional
/// `AND begins_with(SK, :prefix)` key condition, and `name = :value` scan filters.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    composite: bool,
    page_size: Option<usize>,
    tables: Mutex<HashMap<String, Table>>,
    requests: Mutex<Vec<(&'static str, String)>>,
    fail_with: Mutex<Option<&'static str>>,
}

impl MemoryBackend {
    pub fn hash_only() -> Self {
        Self::default()
    }

    pub fn composite() -> Self {
        Self::with(true, None)
    }

    pub fn with(composite: bool, page_size: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Inner {
                composite,
                page_size,
                ..Default::default()
            }),
        }
    }

    /// Make every following request fail with the given service error code.
    pub fn fail_with(&self, code: &'static str) {
        *self.inner.fail_with.lock().unwrap() = Some(code);
    }

    /// `(operation, table name)` for every request received so far.
    pub fn requests(&self) -> Vec<(&'static str, String)> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// The raw stored item, bypassing the codec.
    pub fn raw_item(&self, table_name: &str, pk: &str, sk: Option<&str>) -> Option<AttributeMap> {
        self.inner
            .tables
            .lock()
            .unwrap()
            .get(table_name)
            .and_then(|table| table.get(&(pk.to_string(), sk.unwrap_or_default().to_string())))
            .cloned()
    }

    pub fn insert_raw(&self, table_name: &str, item: AttributeMap) {
        let key = self.storage_key(&item).expect("raw item must match the key schema");
        self.inner
            .tables
            .lock()
            .unwrap()
            .entry(table_name.to_string())
            .or_default()
            .insert(key, item);
    }

    fn record(&self, operation: &'static str, table_name: &str) -> Result<(), &'static str> {
        self.inner
            .requests
            .lock()
            .unwrap()
            .push((operation, table_name.to_string()));

        match *self.inner.fail_with.lock().unwrap() {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    fn storage_key(&self, attributes: &AttributeMap) -> Result<(String, String), &'static str> {
        let pk = attributes
            .get("PK")
            .and_then(scalar)
            .ok_or("One of the required keys was not given a value")?;

        let sk = match (self.inner.composite, attributes.get("SK")) {
            (true, Some(sk)) => scalar(sk).ok_or("Invalid sort key type")?,
            (true, None) => return Err("The provided key element does not match the schema"),
            (false, _) => String::new(),
        };

        Ok((pk, sk))
    }

    fn check_key(&self, key: &AttributeMap) -> Result<(String, String), &'static str> {
        let expected = if self.inner.composite { 2 } else { 1 };
        if key.len() != expected {
            return Err("The provided key element does not match the schema");
        }
        self.storage_key(key)
    }

    fn page(&self, mut items: Vec<AttributeMap>) -> (Vec<AttributeMap>, Option<AttributeMap>) {
        match self.inner.page_size {
            Some(size) if items.len() > size => {
                items.truncate(size);
                let last = items.last().map(|item| {
                    item.iter()
                        .filter(|(name, _)| *name == "PK" || *name == "SK")
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect()
                });
                (items, last)
            }
            _ => (items, None),
        }
    }
}

fn scalar(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::S(s) => Some(s.clone()),
        AttributeValue::N(n) => Some(n.clone()),
        _ => None,
    }
}

fn value_of<'a>(
    values: &'a Option<AttributeMap>,
    placeholder: &str,
) -> Result<&'a AttributeValue, &'static str> {
    values
        .as_ref()
        .and_then(|values| values.get(placeholder))
        .ok_or("An expression attribute value used in expression is not defined")
}

fn service_error<E>(
    code: &str,
    message: &str,
    generic: impl FnOnce(ErrorMetadata) -> E,
) -> SdkError<E> {
    let meta = ErrorMetadata::builder().code(code).message(message).build();
    let status: u16 = if code == "ValidationException" { 400 } else { 500 };
    let raw = HttpResponse::new(
        StatusCode::try_from(status).expect("valid status code"),
        SdkBody::empty(),
    );
    SdkError::service_error(generic(meta), raw)
}

fn validation<E>(message: &str, generic: impl FnOnce(ErrorMetadata) -> E) -> SdkError<E> {
    service_error("ValidationException", message, generic)
}

#[async_trait]
impl DynamoBackend for MemoryBackend {
    async fn get_item(
        &self,
        table_name: &str,
        key: AttributeMap,
    ) -> Result<GetItemOutput, SdkError<GetItemError>> {
        self.record("GetItem", table_name)
            .map_err(|code| service_error(code, "injected", GetItemError::generic))?;
        let key = self
            .check_key(&key)
            .map_err(|message| validation(message, GetItemError::generic))?;

        let item = self
            .inner
            .tables
            .lock()
            .unwrap()
            .get(table_name)
            .and_then(|table| table.get(&key))
            .cloned();

        Ok(GetItemOutput::builder().set_item(item).build())
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: AttributeMap,
    ) -> Result<PutItemOutput, SdkError<PutItemError>> {
        self.record("PutItem", table_name)
            .map_err(|code| service_error(code, "injected", PutItemError::generic))?;
        let key = self
            .storage_key(&item)
            .map_err(|message| validation(message, PutItemError::generic))?;

        self.inner
            .tables
            .lock()
            .unwrap()
            .entry(table_name.to_string())
            .or_default()
            .insert(key, item);

        Ok(PutItemOutput::builder().build())
    }

    async fn update_item(
        &self,
        table_name: &str,
        key: AttributeMap,
        update_expression: &str,
        attribute_values: Option<AttributeMap>,
    ) -> Result<UpdateItemOutput, SdkError<UpdateItemError>> {
        self.record("UpdateItem", table_name)
            .map_err(|code| service_error(code, "injected", UpdateItemError::generic))?;
        let storage_key = self
            .check_key(&key)
            .map_err(|message| validation(message, UpdateItemError::generic))?;

        let assignments = update_expression
            .strip_prefix("SET ")
            .ok_or_else(|| validation("Invalid UpdateExpression", UpdateItemError::generic))?;

        let mut updates = Vec::new();
        for assignment in assignments.split(',') {
            let (name, placeholder) = assignment
                .split_once('=')
                .ok_or_else(|| validation("Invalid UpdateExpression", UpdateItemError::generic))?;
            let value = value_of(&attribute_values, placeholder.trim())
                .map_err(|message| validation(message, UpdateItemError::generic))?;
            updates.push((name.trim().to_string(), value.clone()));
        }

        let mut tables = self.inner.tables.lock().unwrap();
        let item = tables
            .entry(table_name.to_string())
            .or_default()
            .entry(storage_key)
            .or_insert(key);
        item.extend(updates);

        Ok(UpdateItemOutput::builder().build())
    }

    async fn delete_item(
        &self,
        table_name: &str,
        key: AttributeMap,
    ) -> Result<DeleteItemOutput, SdkError<DeleteItemError>> {
        self.record("DeleteItem", table_name)
            .map_err(|code| service_error(code, "injected", DeleteItemError::generic))?;
        let key = self
            .check_key(&key)
            .map_err(|message| validation(message, DeleteItemError::generic))?;

        if let Some(table) = self.inner.tables.lock().unwrap().get_mut(table_name) {
            table.remove(&key);
        }

        Ok(DeleteItemOutput::builder().build())
    }

    async fn query(
        &self,
        table_name: &str,
        key_condition_expression: &str,
        attribute_values: Option<AttributeMap>,
    ) -> Result<QueryOutput, SdkError<QueryError>> {
        self.record("Query", table_name)
            .map_err(|code| service_error(code, "injected", QueryError::generic))?;

        let (pk_condition, sk_condition) = match key_condition_expression.split_once(" AND ") {
            Some((pk, sk)) => (pk, Some(sk)),
            None => (key_condition_expression, None),
        };

        let pk_placeholder = pk_condition.strip_prefix("PK = ").ok_or_else(|| {
            validation(
                "Query condition missed key schema element",
                QueryError::generic,
            )
        })?;
        let pk = value_of(&attribute_values, pk_placeholder.trim())
            .ok()
            .and_then(scalar)
            .ok_or_else(|| validation("Invalid KeyConditionExpression", QueryError::generic))?;

        let prefix = match sk_condition {
            Some(condition) => {
                let placeholder = condition
                    .strip_prefix("begins_with(SK, ")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| {
                        validation("Unsupported KeyConditionExpression", QueryError::generic)
                    })?;
                value_of(&attribute_values, placeholder.trim())
                    .ok()
                    .and_then(scalar)
            }
            None => None,
        };

        let items: Vec<AttributeMap> = self
            .inner
            .tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|table| {
                table
                    .iter()
                    .filter(|((item_pk, item_sk), _)| {
                        *item_pk == pk
                            && prefix.as_ref().map_or(true, |p| item_sk.starts_with(p.as_str()))
                    })
                    .map(|(_, item)| item.clone())
                    .collect()
            })
            .unwrap_or_default();

        let (items, last_evaluated_key) = self.page(items);

        Ok(QueryOutput::builder()
            .count(items.len() as i32)
            .set_items(Some(items))
            .set_last_evaluated_key(last_evaluated_key)
            .build())
    }

    async fn scan(
        &self,
        table_name: &str,
        filter_expression: Option<&str>,
        attribute_values: Option<AttributeMap>,
    ) -> Result<ScanOutput, SdkError<ScanError>> {
        self.record("Scan", table_name)
            .map_err(|code| service_error(code, "injected", ScanError::generic))?;

        let filter = match filter_expression {
            Some(expression) => {
                let (name, placeholder) = expression
                    .split_once('=')
                    .ok_or_else(|| validation("Invalid FilterExpression", ScanError::generic))?;
                let value = value_of(&attribute_values, placeholder.trim())
                    .map_err(|message| validation(message, ScanError::generic))?;
                Some((name.trim().to_string(), value.clone()))
            }
            None => None,
        };

        let items: Vec<AttributeMap> = self
            .inner
            .tables
            .lock()
            .unwrap()
            .get(table_name)
            .map(|table| {
                table
                    .values()
                    .filter(|item| match &filter {
                        Some((name, value)) => item.get(name) == Some(value),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let (items, last_evaluated_key) = self.page(items);

        Ok(ScanOutput::builder()
            .count(items.len() as i32)
            .set_items(Some(items))
            .set_last_evaluated_key(last_evaluated_key)
            .build())
    }
}

/// An HTTP client answering each request with the next `(status, body)` pair.
pub fn replay_client(responses: &[(u16, &str)]) -> StaticReplayClient {
    StaticReplayClient::new(
        responses
            .iter()
            .map(|(status, body)| {
                ReplayEvent::new(
                    HttpRequest::new(SdkBody::empty()),
                    HttpResponse::new(
                        StatusCode::try_from(*status).expect("valid status code"),
                        SdkBody::from(body.to_string()),
                    ),
                )
            })
            .collect(),
    )
}

/// The `X-Amz-Target` operation name of every request sent through `http_client`.
pub fn targets(http_client: &StaticReplayClient) -> Vec<String> {
    http_client
        .actual_requests()
        .map(|request| {
            let target = request.headers().get("x-amz-target").unwrap_or_default();
            target.rsplit('.').next().unwrap_or_default().to_string()
        })
        .collect()
}

/// The JSON bodies of every request sent through `http_client`.
pub fn request_bodies(http_client: &StaticReplayClient) -> Vec<serde_json::Value> {
    http_client
        .actual_requests()
        .map(|request| {
            serde_json::from_slice(request.body().bytes().expect("in-memory body"))
                .expect("request body is JSON")
        })
        .collect()
}

/// Create a table with the PK/SK/JSON key schema on DynamoDB Local, replacing any existing one.
pub async fn create_table(client: &Client, table_name: &str, composite: bool) {
    let _ = client.delete_table().table_name(table_name).send().await;

    let mut request = client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("PK")
                .attribute_type(ScalarAttributeType::S)
                .build()
                .expect("Failed to build attribute definition"),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("PK")
                .key_type(KeyType::Hash)
                .build()
                .expect("Failed to build key schema element"),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(5)
                .write_capacity_units(5)
                .build()
                .expect("Failed to build provisioned throughput"),
        );

    if composite {
        request = request
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("SK")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .expect("Failed to build attribute definition"),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("SK")
                    .key_type(KeyType::Range)
                    .build()
                    .expect("Failed to build key schema element"),
            );
    }

    request.send().await.expect("Failed to create table");
}

#[macro_export]
macro_rules! assert_err {
    ($cond:expr,) => {
        $crate::assert_err!($cond);
    };
    ($cond:expr) => {
        match $cond {
            Ok(t) => {
                panic!("assertion failed, expected Err(..), got Ok({:?})", t);
            },
            Err(e) => e,
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        match $cond {
            Ok(t) => {
                panic!("assertion failed, expected Err(..), got Ok({:?}): {}", t, format_args!($($arg)+));
            },
            Err(e) => e,
        }
    };
}

#[macro_export]
macro_rules! assert_none {
    ($cond:expr,) => {
        $crate::assert_none!($cond);
    };
    ($cond:expr) => {
        match $cond {
            Some(t) => {
                panic!("assertion failed, expected None, got Some({:?})", t);
            },
            None => (),
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        match $cond {
            Some(t) => {
                panic!("assertion failed, expected None, got Some({:?}): {}", t, format_args!($($arg)+));
            },
            None => (),
        }
    };
}
