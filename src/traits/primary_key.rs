use aws_sdk_dynamodb::{primitives::Blob, types::AttributeValue};
use std::{collections::HashMap, fmt};

pub const PARTITION_KEY: &str = "PK";
pub const SORT_KEY: &str = "SK";

/// A scalar key attribute: a DynamoDB string, number or binary value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    S(String),
    /// Numbers travel as their decimal representation, as DynamoDB does on the wire.
    N(String),
    B(Blob),
}

impl KeyValue {
    /// The textual form of a string or number key. `None` for binary keys.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::S(s) | Self::N(s) => Some(s),
            Self::B(_) => None,
        }
    }

    /// Read a key attribute, handing the value back when it is not a scalar key type.
    pub(crate) fn try_from_attribute(value: AttributeValue) -> Result<Self, AttributeValue> {
        match value {
            AttributeValue::S(s) => Ok(Self::S(s)),
            AttributeValue::N(n) => Ok(Self::N(n)),
            AttributeValue::B(b) => Ok(Self::B(b)),
            other => Err(other),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) | Self::N(s) => f.write_str(s),
            Self::B(b) => b
                .as_ref()
                .iter()
                .try_for_each(|byte| write!(f, "{byte:02x}")),
        }
    }
}

impl From<KeyValue> for AttributeValue {
    fn from(value: KeyValue) -> Self {
        match value {
            KeyValue::S(s) => AttributeValue::S(s),
            KeyValue::N(n) => AttributeValue::N(n),
            KeyValue::B(b) => AttributeValue::B(b),
        }
    }
}

impl From<Blob> for KeyValue {
    fn from(value: Blob) -> Self {
        KeyValue::B(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::S(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::S(value)
    }
}

impl From<&String> for KeyValue {
    fn from(value: &String) -> Self {
        KeyValue::S(value.clone())
    }
}

macro_rules! impl_number_key_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for KeyValue {
                fn from(value: $ty) -> Self {
                    KeyValue::N(value.to_string())
                }
            }
        )*
    };
}

impl_number_key_value!(i16, i32, i64, u16, u32, u64, usize);

/// The primary key of an item: a partition key and, for composite tables, a sort key.
///
/// ```
/// use dynamo_lite::Key;
///
/// let hash_only: Key = "user#1".into();
/// assert!(hash_only.sk.is_none());
///
/// let composite: Key = ("user#1", 0).into();
/// assert_eq!(composite.sk.unwrap().as_str(), Some("0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub pk: KeyValue,
    pub sk: Option<KeyValue>,
}

impl Key {
    pub fn new(pk: impl Into<KeyValue>) -> Self {
        Self {
            pk: pk.into(),
            sk: None,
        }
    }

    pub fn with_sort_key(pk: impl Into<KeyValue>, sk: impl Into<KeyValue>) -> Self {
        Self {
            pk: pk.into(),
            sk: Some(sk.into()),
        }
    }

    /// The key attributes as sent to DynamoDB. `SK` is present only when a sort key was given.
    pub fn into_attributes(self) -> HashMap<String, AttributeValue> {
        let mut attributes = HashMap::with_capacity(2);
        attributes.insert(PARTITION_KEY.to_string(), self.pk.into());
        if let Some(sk) = self.sk {
            attributes.insert(SORT_KEY.to_string(), sk.into());
        }
        attributes
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sk {
            Some(sk) => write!(f, "{}/{}", self.pk, sk),
            None => fmt::Display::fmt(&self.pk, f),
        }
    }
}

macro_rules! impl_hash_only_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Key {
                fn from(value: $ty) -> Self {
                    Self::new(value)
                }
            }
        )*
    };
}

impl_hash_only_key!(KeyValue, Blob, &str, String, &String, i16, i32, i64, u16, u32, u64, usize);

impl<P: Into<KeyValue>, S: Into<KeyValue>> From<(P, S)> for Key {
    fn from(value: (P, S)) -> Self {
        Self::with_sort_key(value.0, value.1)
    }
}
