// Response envelopes returned by every backend endpoint

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// `{status, success, message, data?}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn from_body(body: Value) -> ApiResult<Self> {
        Ok(serde_json::from_value(body)?)
    }

    // Fails with the fixed `missing` message when `data` is absent or null
    pub fn into_data(self, missing: &str) -> ApiResult<T> {
        self.data
            .ok_or_else(|| ApiError::MissingData(missing.to_string()))
    }
}

// Read `data` out of a raw body in one step
pub fn unwrap_data<T: DeserializeOwned>(body: Value, missing: &str) -> ApiResult<T> {
    let envelope: Envelope<Value> = Envelope::from_body(body)?;
    match envelope.data {
        None | Some(Value::Null) => Err(ApiError::MissingData(missing.to_string())),
        Some(data) => Ok(serde_json::from_value(data)?),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PageLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub path: Option<String>,
}

// Laravel paginator: `data[]`, `links{}`, `meta{current_page, ...}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub links: PageLinks,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.links.next.is_some() || self.meta.current_page < self.meta.last_page
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: DeserializeOwned> Paginated<T> {
    // Every list endpoint goes through here. Accepted shapes:
    // - a flat paginator `{data: [...], links, meta}` or `{current_page, data: [...], ...}`
    // - either paginator wrapped in the common envelope `{success, data: {...}}`
    // - an envelope whose `data` is a bare array (one synthetic page)
    pub fn from_body(body: Value, missing: &str) -> ApiResult<Self> {
        let missing_data = || ApiError::MissingData(missing.to_string());
        let Value::Object(mut outer) = body else {
            return Err(missing_data());
        };

        let data = outer.remove("data").ok_or_else(missing_data)?;
        match data {
            Value::Array(items) if is_paginator(&outer) => Self::from_paginator(items, outer),
            Value::Array(items) => {
                let data = decode_items(items)?;
                let mut meta = PageMeta::default();
                fill_single_page_meta(&mut meta, data.len());
                Ok(Self {
                    data,
                    links: PageLinks::default(),
                    meta,
                })
            }
            Value::Object(mut inner) => match inner.remove("data") {
                Some(Value::Array(items)) => Self::from_paginator(items, inner),
                _ => Err(missing_data()),
            },
            _ => Err(missing_data()),
        }
    }

    fn from_paginator(items: Vec<Value>, mut fields: Map<String, Value>) -> ApiResult<Self> {
        let data = decode_items(items)?;
        let links = take_links(&mut fields)?;
        let mut meta: PageMeta = take_field(&mut fields, "meta")?;
        // Non-resource paginators keep meta at the top level
        if meta == PageMeta::default() {
            meta = serde_json::from_value(Value::Object(fields))?;
        }
        fill_single_page_meta(&mut meta, data.len());
        Ok(Self { data, links, meta })
    }
}

fn is_paginator(fields: &Map<String, Value>) -> bool {
    ["meta", "links", "current_page"]
        .iter()
        .any(|key| fields.contains_key(*key))
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> ApiResult<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

fn take_field<T: DeserializeOwned + Default>(map: &mut Map<String, Value>, key: &str) -> ApiResult<T> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

// Resource collections send `links` as an object. Plain paginators send a
// list of page buttons and carry the URLs as `*_page_url` fields.
fn take_links(map: &mut Map<String, Value>) -> ApiResult<PageLinks> {
    match map.remove("links") {
        Some(value @ Value::Object(_)) => Ok(serde_json::from_value(value)?),
        _ => Ok(PageLinks {
            first: page_url(map, "first_page_url"),
            last: page_url(map, "last_page_url"),
            prev: page_url(map, "prev_page_url"),
            next: page_url(map, "next_page_url"),
        }),
    }
}

fn page_url(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn fill_single_page_meta(meta: &mut PageMeta, count: usize) {
    if meta.current_page == 0 {
        meta.current_page = 1;
        meta.last_page = meta.last_page.max(1);
        if meta.per_page == 0 {
            meta.per_page = count as u32;
        }
        if meta.total == 0 {
            meta.total = count as u64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
    }

    #[test]
    fn test_into_data_reports_missing() {
        let envelope: Envelope<Item> =
            Envelope::from_body(json!({"success": true, "data": null})).unwrap();
        let err = envelope.into_data("User not found").unwrap_err();
        assert_eq!(err.to_string(), "User not found");

        let absent = unwrap_data::<Item>(json!({"success": true, "message": "ok"}), "Hotel not found");
        assert_eq!(absent.unwrap_err(), ApiError::MissingData("Hotel not found".to_string()));
    }

    #[test]
    fn test_unwrap_data_decodes_payload() {
        let item: Item = unwrap_data(
            json!({"status": 200, "success": true, "message": "ok", "data": {"id": 4}}),
            "missing",
        )
        .unwrap();
        assert_eq!(item, Item { id: 4 });
    }

    #[test]
    fn test_flat_paginator() {
        let body = json!({
            "data": [{"id": 1}, {"id": 2}],
            "links": {"first": "/users?page=1", "next": "/users?page=2"},
            "meta": {"current_page": 1, "last_page": 3, "per_page": 2, "total": 6}
        });

        let page: Paginated<Item> = Paginated::from_body(body, "Failed to fetch users").unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.total, 6);
        assert!(page.has_next());
    }

    #[test]
    fn test_paginator_inside_envelope() {
        let body = json!({
            "success": true,
            "message": "ok",
            "data": {
                "data": [{"id": 9}],
                "links": {"next": null},
                "meta": {"current_page": 2, "last_page": 2, "per_page": 15, "total": 16}
            }
        });

        let page: Paginated<Item> = Paginated::from_body(body, "missing").unwrap();
        assert_eq!(page.data, vec![Item { id: 9 }]);
        assert_eq!(page.meta.current_page, 2);
        assert!(!page.has_next());
    }

    #[test]
    fn test_plain_paginator_inside_envelope_keeps_top_level_meta() {
        let body = json!({
            "success": true,
            "data": {"current_page": 1, "data": [{"id": 3}], "last_page": 4, "per_page": 1, "total": 4}
        });

        let page: Paginated<Item> = Paginated::from_body(body, "missing").unwrap();
        assert_eq!(page.meta.last_page, 4);
        assert_eq!(page.meta.total, 4);
    }

    #[test]
    fn test_laravel_paginator_with_link_buttons() {
        let body = json!({
            "success": true,
            "data": {
                "current_page": 1,
                "data": [{"id": 3}, {"id": 4}],
                "first_page_url": "http://api.test/hotels?page=1",
                "from": 1,
                "last_page": 3,
                "last_page_url": "http://api.test/hotels?page=3",
                "links": [
                    {"url": null, "label": "&laquo; Previous", "active": false},
                    {"url": "http://api.test/hotels?page=1", "label": "1", "active": true},
                    {"url": "http://api.test/hotels?page=2", "label": "Next &raquo;", "active": false}
                ],
                "next_page_url": "http://api.test/hotels?page=2",
                "path": "http://api.test/hotels",
                "per_page": 2,
                "prev_page_url": null,
                "to": 2,
                "total": 6
            }
        });

        let page: Paginated<Item> = Paginated::from_body(body, "Failed to fetch hotels").unwrap();
        assert_eq!(page.data, vec![Item { id: 3 }, Item { id: 4 }]);
        assert_eq!(page.meta.total, 6);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.path.as_deref(), Some("http://api.test/hotels"));
        assert_eq!(page.links.next.as_deref(), Some("http://api.test/hotels?page=2"));
        assert_eq!(page.links.prev, None);
        assert!(page.has_next());
    }

    #[test]
    fn test_unwrapped_laravel_paginator() {
        let body = json!({
            "current_page": 2,
            "data": [{"id": 7}],
            "links": [{"url": null, "label": "1", "active": false}],
            "last_page": 2,
            "per_page": 1,
            "total": 2
        });

        let page: Paginated<Item> = Paginated::from_body(body, "missing").unwrap();
        assert_eq!(page.meta.current_page, 2);
        assert_eq!(page.meta.total, 2);
        assert!(!page.has_next());
    }

    #[test]
    fn test_bare_array_becomes_single_page() {
        let body = json!({"success": true, "data": [{"id": 1}, {"id": 2}, {"id": 3}]});
        let page: Paginated<Item> = Paginated::from_body(body, "missing").unwrap();
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.last_page, 1);
        assert_eq!(page.meta.total, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn test_missing_list_data() {
        let err = Paginated::<Item>::from_body(json!({"success": false}), "Failed to fetch hotels")
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch hotels");

        let null_data = Paginated::<Item>::from_body(json!({"data": null}), "Failed to fetch hotels");
        assert!(null_data.is_err());
    }
}
