// Multipart body assembly for writes that carry images

use crate::error::{ApiError, ApiResult};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

pub const IMAGES_FIELD: &str = "images[]";
pub const METHOD_OVERRIDE_FIELD: &str = "_method";

#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File(UploadFile),
}

// Ordered list of parts; kept independent of reqwest so it can be inspected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<(String, PartValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    // Flatten a serializable payload:
    // - null and empty-string fields are left out
    // - scalars appear once, stringified (booleans as 1/0)
    // - arrays become repeated `field[]` entries
    // - nested objects are sent as JSON text
    // Files are appended under `images[]`.
    pub fn from_payload<T: Serialize + ?Sized>(payload: &T, files: &[UploadFile]) -> ApiResult<Self> {
        let value = serde_json::to_value(payload)?;
        let Value::Object(fields) = value else {
            return Err(ApiError::Other(
                "multipart payload must serialize to an object".to_string(),
            ));
        };

        let mut form = Self::new();
        for (name, value) in fields {
            match value {
                Value::Array(items) => {
                    let key = format!("{name}[]");
                    for item in items {
                        if let Some(text) = scalar_text(&item) {
                            form.parts.push((key.clone(), PartValue::Text(text)));
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar_text(&other) {
                        form.parts.push((name, PartValue::Text(text)));
                    }
                }
            }
        }

        for file in files {
            form = form.file(IMAGES_FIELD, file.clone());
        }
        Ok(form)
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), PartValue::Text(value.into())));
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: UploadFile) -> Self {
        self.parts.push((name.into(), PartValue::File(file)));
        self
    }

    // Multipart bodies go out as POST; the backend reads the real verb here
    pub fn with_method_override(self, method: &str) -> Self {
        self.text(METHOD_OVERRIDE_FIELD, method)
    }

    pub fn parts(&self) -> &[(String, PartValue)] {
        &self.parts
    }

    pub fn text_values(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|(key, _)| key == name)
            .filter_map(|(_, value)| match value {
                PartValue::Text(text) => Some(text.as_str()),
                PartValue::File(_) => None,
            })
            .collect()
    }

    pub fn files(&self, name: &str) -> Vec<&UploadFile> {
        self.parts
            .iter()
            .filter(|(key, _)| key == name)
            .filter_map(|(_, value)| match value {
                PartValue::File(file) => Some(file),
                PartValue::Text(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_reqwest(self) -> ApiResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.parts {
            form = match value {
                PartValue::Text(text) => form.text(name, text),
                PartValue::File(file) => {
                    let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|e| ApiError::Other(format!("invalid content type: {e}")))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(if *flag { "1" } else { "0" }.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested => Some(nested.to_string()),
    }
}
