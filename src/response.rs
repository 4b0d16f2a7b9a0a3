use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Meta {
    #[serde(default, alias = "page")]
    pub current_page: Option<i64>,
    #[serde(default)]
    pub last_page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, last_page: i64, per_page: i64, total: i64) -> Self {
        Self {
            current_page: Some(page),
            last_page: Some(last_page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_more(&self) -> bool {
        match (self.current_page, self.last_page) {
            (Some(current), Some(last)) => current < last,
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<Vec<T>> {
    /// A missing `data` member on a list endpoint means an empty page.
    pub fn into_page(self) -> Paginated<T> {
        Paginated {
            items: self.data.unwrap_or_default(),
            meta: self.meta.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

impl<T> Paginated<T> {
    pub fn has_more(&self) -> bool {
        self.meta.has_more()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorsPayload {
    Text(String),
    Fields(BTreeMap<String, FieldMessages>),
}

/// Body of a non-2xx response. `errors` arrives either as a bare string or
/// as a map of field name to one or many messages.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    errors: Option<ErrorsPayload>,
}

impl ApiErrorBody {
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        match &self.errors {
            None => BTreeMap::new(),
            Some(ErrorsPayload::Text(text)) => {
                BTreeMap::from([("error".to_string(), vec![text.clone()])])
            }
            Some(ErrorsPayload::Fields(fields)) => fields
                .iter()
                .map(|(field, messages)| {
                    let messages = match messages {
                        FieldMessages::One(m) => vec![m.clone()],
                        FieldMessages::Many(ms) => ms.clone(),
                    };
                    (field.clone(), messages)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_reports_more_pages() {
        let meta: Meta =
            serde_json::from_str(r#"{"current_page":1,"last_page":3,"per_page":10,"total":25}"#)
                .unwrap();
        assert!(meta.has_more());
        assert!(!Meta::new(3, 3, 10, 25).has_more());
        assert!(!Meta::empty().has_more());
    }

    #[test]
    fn error_body_accepts_plain_string_errors() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"message":null,"errors":"Invalid OTP"}"#).unwrap();
        assert_eq!(body.field_errors()["error"], vec!["Invalid OTP"]);
    }
}
