use super::item::Item;
use crate::traits::AttributeMap;

/// One response of a query or scan.
///
/// DynamoDB stops after 1 MB of data; when it does, `last_evaluated_key` is set and the page is
/// [truncated](Page::is_truncated). Fetching the following pages is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T = serde_json::Value> {
    pub items: Vec<Item<T>>,
    pub count: i32,
    pub last_evaluated_key: Option<AttributeMap>,
}

impl<T> Page<T> {
    pub fn is_truncated(&self) -> bool {
        self.last_evaluated_key
            .as_ref()
            .is_some_and(|key| !key.is_empty())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = Item<T>;
    type IntoIter = std::vec::IntoIter<Item<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
