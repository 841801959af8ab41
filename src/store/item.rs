use crate::{
    errors::{DecodeError, EncodeError},
    traits::{AttributeMap, Key, KeyValue, PARTITION_KEY, SORT_KEY},
};
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{de::DeserializeOwned, Serialize};

pub const JSON_ATTRIBUTE: &str = "JSON";

/// A stored item with its `JSON` payload decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<T = serde_json::Value> {
    /// `None` only for items written outside this crate without a scalar `PK`.
    pub pk: Option<KeyValue>,
    pub sk: Option<KeyValue>,
    /// `None` when the item has no `JSON` attribute, e.g. when it was only ever written by
    /// [`Store::update_item`](crate::Store::update_item).
    pub json: Option<T>,
    /// Attributes outside the PK/SK/JSON convention, returned untouched. A `PK` or `SK` that is
    /// not a string, number or binary value is kept here as well.
    pub attributes: AttributeMap,
}

impl<T> Item<T> {
    pub fn key(&self) -> Option<Key> {
        self.pk.clone().map(|pk| Key {
            pk,
            sk: self.sk.clone(),
        })
    }

    pub fn into_json(self) -> Option<T> {
        self.json
    }
}

/// Build the attributes written by [`Store::put`](crate::Store::put).
///
/// The result has `PK`, `JSON` and, only when the key has one, `SK`.
pub fn encode<T>(value: &T, key: impl Into<Key>) -> Result<AttributeMap, EncodeError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;

    let key: Key = key.into();
    let mut item = key.into_attributes();
    item.insert(JSON_ATTRIBUTE.to_string(), AttributeValue::S(json));
    Ok(item)
}

/// Decode a raw item. A missing item is `Ok(None)`, never an error.
///
/// Only the `JSON` attribute can fail to decode; every other attribute is passed through.
pub fn decode<T>(item: Option<AttributeMap>) -> Result<Option<Item<T>>, DecodeError>
where
    T: DeserializeOwned,
{
    item.map(decode_item).transpose()
}

/// Decode every item of a page; the first malformed payload fails the whole batch.
pub fn decode_all<T>(items: Vec<AttributeMap>) -> Result<Vec<Item<T>>, DecodeError>
where
    T: DeserializeOwned,
{
    items.into_iter().map(decode_item).collect()
}

fn decode_item<T>(mut attributes: AttributeMap) -> Result<Item<T>, DecodeError>
where
    T: DeserializeOwned,
{
    let pk = take_key(&mut attributes, PARTITION_KEY);
    let sk = take_key(&mut attributes, SORT_KEY);

    let json = match attributes.remove(JSON_ATTRIBUTE) {
        None => None,
        Some(AttributeValue::S(payload)) => Some(serde_json::from_str(&payload)?),
        Some(_) => {
            return Err(DecodeError::InvalidAttribute {
                name: JSON_ATTRIBUTE.to_string(),
                expected: "a string",
            })
        }
    };

    Ok(Item {
        pk,
        sk,
        json,
        attributes,
    })
}

fn take_key(attributes: &mut AttributeMap, name: &str) -> Option<KeyValue> {
    let value = attributes.remove(name)?;
    match KeyValue::try_from_attribute(value) {
        Ok(key) => Some(key),
        Err(value) => {
            attributes.insert(name.to_string(), value);
            None
        }
    }
}
