use serde_json::Value;

use crate::{HarnessError, HarnessResult};

/// Read-only accessors over a JSON response body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath(Value);

impl JsonPath {
    pub fn parse(body: &str) -> HarnessResult<Self> {
        Ok(Self(serde_json::from_str(body)?))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn get_str(&self, field: &str) -> HarnessResult<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| HarnessError::MissingField(field.to_string()))
    }

    /// Collects `field` from every element of a top-level array, in order.
    pub fn get_list(&self, field: &str) -> HarnessResult<Vec<String>> {
        let items = self
            .0
            .as_array()
            .ok_or_else(|| HarnessError::MissingField(format!("[].{}", field)))?;

        items
            .iter()
            .map(|item| {
                item.get(field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| HarnessError::MissingField(format!("[].{}", field)))
            })
            .collect()
    }

    /// Number of elements when the body is an array, 0 otherwise.
    pub fn len(&self) -> usize {
        self.0.as_array().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn expect_str(&self, field: &str, expected: &str) -> HarnessResult<()> {
        let actual = self.get_str(field)?;
        if actual == expected {
            Ok(())
        } else {
            Err(HarnessError::FieldMismatch {
                field: field.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }
}
