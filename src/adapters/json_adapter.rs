//! JSON file source adapter.
//!
//! IB's JSON exports (and JSON re-serializations of the XML report) map
//! directly onto the document tree. Non-string leaves are stringified —
//! the domain works on decimal strings throughout. `null` entries are
//! dropped so the field is absent, not empty.

use crate::domain::document::DocNode;
use crate::domain::error::ConvertError;
use crate::ports::source_port::SourcePort;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

pub struct JsonSourceAdapter {
    path: PathBuf,
}

impl JsonSourceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SourcePort for JsonSourceAdapter {
    fn load(&self) -> Result<DocNode, ConvertError> {
        let content = fs::read_to_string(&self.path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| ConvertError::DocumentParse {
                format: "json".to_string(),
                file: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(value_to_node(&value))
    }
}

fn value_to_node(value: &Value) -> DocNode {
    match value {
        Value::Object(map) => DocNode::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), value_to_node(v)))
                .collect(),
        ),
        Value::Array(items) => DocNode::Seq(items.iter().map(value_to_node).collect()),
        Value::String(s) => DocNode::Scalar(s.clone()),
        Value::Null => DocNode::Scalar(String::new()),
        other => DocNode::Scalar(other.to_string()),
    }
}
