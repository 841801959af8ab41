mod dynamo;
pub mod global;
pub mod item;
mod page;

pub use self::{
    item::{decode, decode_all, encode, Item, JSON_ATTRIBUTE},
    page::Page,
};
use crate::{
    config::{StoreConfig, TableName},
    credentials::{resolve_credentials, CognitoIdentity, FederatedIdentity},
    errors::{
        AwsError, ConfigError, DeleteError, GetError, PutError, QueryError, ScanError, UpdateError,
    },
    traits::{AttributeMap, DynamoBackend, Key},
};
use aws_sdk_dynamodb::{
    config::{BehaviorVersion, Region},
    operation::{
        delete_item::DeleteItemOutput, put_item::PutItemOutput, update_item::UpdateItemOutput,
    },
    Client,
};
use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// A handle to one DynamoDB table following the PK/SK/JSON item convention.
///
/// A `Store` starts out uninitialized; every operation fails with `NotInitialized` until one of
/// the `init` methods has run. Initializing again swaps the client: requests already in flight
/// finish on the old one, later requests use the new one.
///
/// ```no_run
/// # async fn example() -> Result<(), dynamo_lite::Error> {
/// use dynamo_lite::{Store, StoreConfig};
/// use serde_json::json;
///
/// let store = Store::new();
/// store.init(StoreConfig::builder().with_env().build()?)?;
///
/// store.put(&json!({"name": "A", "age": 1}), "K1").await?;
/// let item = store.get::<serde_json::Value>("K1").await?;
/// assert_eq!(item.and_then(|item| item.json), Some(json!({"name": "A", "age": 1})));
/// # Ok(())
/// # }
/// ```
pub struct Store {
    handle: RwLock<Option<Handle>>,
}

#[derive(Clone)]
struct Handle {
    backend: Arc<dyn DynamoBackend>,
    table_name: TableName,
}

impl Store {
    pub const fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Build a DynamoDB client from `config`, using Cognito for identity pool credentials.
    pub fn init(&self, config: StoreConfig) -> Result<(), ConfigError> {
        self.init_with(config, &CognitoIdentity)
    }

    pub fn init_with(
        &self,
        config: StoreConfig,
        federated: &dyn FederatedIdentity,
    ) -> Result<(), ConfigError> {
        if config.region.is_empty() {
            return Err(ConfigError::MissingRegion);
        }

        info!("Initializing client for region {}...", config.region);
        let credentials = resolve_credentials(&config, federated)?;

        let mut builder = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials.into_provider());

        if let Some(endpoint_url) = &config.endpoint_url {
            info!("Using endpoint {endpoint_url}");
            builder = builder.endpoint_url(endpoint_url);
        }

        let client = Client::from_conf(builder.build());
        self.init_with_backend(client, config.table_name);

        info!("Ready!");
        Ok(())
    }

    /// Install an already built backend, such as a preconfigured [`Client`].
    pub fn init_with_backend(&self, backend: impl DynamoBackend + 'static, table_name: TableName) {
        let handle = Handle {
            backend: Arc::new(backend),
            table_name,
        };

        *self.handle.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // Clone out of the lock so that no guard is held across an await point
    fn handle(&self) -> Option<Handle> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch and decode the item stored under `key`.
    ///
    /// A missing item is `Ok(None)`. On a table with a sort key, leaving it out of `key` makes
    /// DynamoDB reject the request, which surfaces as [`GetError::Aws`].
    pub async fn get<T>(&self, key: impl Into<Key>) -> Result<Option<Item<T>>, GetError>
    where
        T: DeserializeOwned,
    {
        let Handle {
            backend,
            table_name,
        } = self.handle().ok_or(GetError::NotInitialized)?;
        let table_name = table_name.resolve()?;
        let key: Key = key.into();

        debug!("GetItem {key} from {table_name}");
        let output = backend
            .get_item(&table_name, key.into_attributes())
            .await
            .map_err(AwsError::from)?;

        Ok(decode(output.item)?)
    }

    /// Store `value` as JSON under `key`, replacing any existing item.
    pub async fn put<T>(&self, value: &T, key: impl Into<Key>) -> Result<PutItemOutput, PutError>
    where
        T: Serialize + ?Sized,
    {
        let Handle {
            backend,
            table_name,
        } = self.handle().ok_or(PutError::NotInitialized)?;
        let table_name = table_name.resolve()?;
        let key: Key = key.into();

        debug!("PutItem {key} into {table_name}");
        let item = encode(value, key)?;

        Ok(backend
            .put_item(&table_name, item)
            .await
            .map_err(AwsError::from)?)
    }

    /// Apply `update_expression` to the item under `key`.
    ///
    /// The expression and values go to DynamoDB as given; this bypasses the `JSON` attribute
    /// convention.
    pub async fn update_item(
        &self,
        key: impl Into<Key>,
        update_expression: &str,
        attribute_values: AttributeMap,
    ) -> Result<UpdateItemOutput, UpdateError> {
        let Handle {
            backend,
            table_name,
        } = self.handle().ok_or(UpdateError::NotInitialized)?;
        let table_name = table_name.resolve()?;
        let key: Key = key.into();

        debug!("UpdateItem {key} in {table_name}: {update_expression}");
        Ok(backend
            .update_item(
                &table_name,
                key.into_attributes(),
                update_expression,
                non_empty(attribute_values),
            )
            .await
            .map_err(AwsError::from)?)
    }

    pub async fn delete_item(&self, key: impl Into<Key>) -> Result<DeleteItemOutput, DeleteError> {
        let Handle {
            backend,
            table_name,
        } = self.handle().ok_or(DeleteError::NotInitialized)?;
        let table_name = table_name.resolve()?;
        let key: Key = key.into();

        debug!("DeleteItem {key} from {table_name}");
        Ok(backend
            .delete_item(&table_name, key.into_attributes())
            .await
            .map_err(AwsError::from)?)
    }

    /// Run a key condition query, e.g. `"PK = :pk AND begins_with(SK, :prefix)"`.
    ///
    /// Items come back in sort key order. Only the first page is fetched.
    pub async fn query_items<T>(
        &self,
        key_condition_expression: &str,
        attribute_values: AttributeMap,
    ) -> Result<Page<T>, QueryError>
    where
        T: DeserializeOwned,
    {
        let Handle {
            backend,
            table_name,
        } = self.handle().ok_or(QueryError::NotInitialized)?;
        let table_name = table_name.resolve()?;

        debug!("Query {table_name}: {key_condition_expression}");
        let output = backend
            .query(
                &table_name,
                key_condition_expression,
                non_empty(attribute_values),
            )
            .await
            .map_err(AwsError::from)?;

        Ok(Page {
            items: decode_all(output.items.unwrap_or_default())?,
            count: output.count,
            last_evaluated_key: output.last_evaluated_key,
        })
    }

    /// Scan the whole table, optionally filtered. Only the first page is fetched.
    pub async fn scan_table<T>(
        &self,
        filter_expression: Option<&str>,
        attribute_values: Option<AttributeMap>,
    ) -> Result<Page<T>, ScanError>
    where
        T: DeserializeOwned,
    {
        let Handle {
            backend,
            table_name,
        } = self.handle().ok_or(ScanError::NotInitialized)?;
        let table_name = table_name.resolve()?;

        debug!("Scan {table_name} (filter: {filter_expression:?})");
        let output = backend
            .scan(
                &table_name,
                filter_expression,
                attribute_values.and_then(non_empty),
            )
            .await
            .map_err(AwsError::from)?;

        Ok(Page {
            items: decode_all(output.items.unwrap_or_default())?,
            count: output.count,
            last_evaluated_key: output.last_evaluated_key,
        })
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

// DynamoDB rejects an empty ExpressionAttributeValues map
fn non_empty(values: AttributeMap) -> Option<AttributeMap> {
    (!values.is_empty()).then_some(values)
}
