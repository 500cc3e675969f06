//! OData page parsing
//!
//! A Graph collection response carries its items under `value` and, when
//! more data exists, an opaque `@odata.nextLink` URL for the next page.

use serde_json::Value;

/// Key of the continuation link in a collection response
pub const NEXT_LINK_KEY: &str = "@odata.nextLink";

/// Key of the item array in a collection response
const ITEMS_KEY: &str = "value";

/// One page of a collection response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in server order
    pub items: Vec<Value>,
    /// Next page URL, to be requested verbatim
    pub next_link: Option<String>,
}

impl Page {
    /// Split a response body into items and continuation link
    ///
    /// A missing or non-array `value` is an empty page; an empty link means
    /// there is no next page.
    pub fn from_json(mut body: Value) -> Self {
        let items = match body.get_mut(ITEMS_KEY).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        let next_link = body
            .get(NEXT_LINK_KEY)
            .and_then(Value::as_str)
            .filter(|link| !link.is_empty())
            .map(String::from);

        Self { items, next_link }
    }

    /// True when this is the last page
    pub fn is_last(&self) -> bool {
        self.next_link.is_none()
    }
}
