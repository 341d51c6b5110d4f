//! Generic tagged tree for a parsed Flex export.
//!
//! The upstream exporter collapses singleton and multi-element collections
//! inconsistently, so the document is not modeled with a schema type.
//! Every parsed input becomes a [`DocNode`] and the extractor walks it
//! positionally.

/// One node of a parsed document: a keyed object, a sequence, or a leaf
/// string. Object entries keep document order; repeated keys are collapsed
/// into a sequence by the source adapters, never stored twice.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    Object(Vec<(String, DocNode)>),
    Seq(Vec<DocNode>),
    Scalar(String),
}

impl DocNode {
    pub fn object(entries: Vec<(String, DocNode)>) -> Self {
        DocNode::Object(entries)
    }

    pub fn scalar<S: Into<String>>(value: S) -> Self {
        DocNode::Scalar(value.into())
    }

    /// Entry lookup on an object node. `None` for non-objects and missing
    /// keys alike.
    pub fn get(&self, key: &str) -> Option<&DocNode> {
        match self {
            DocNode::Object(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, DocNode)]> {
        match self {
            DocNode::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[DocNode]> {
        match self {
            DocNode::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocNode::Scalar(value) => Some(value),
            _ => None,
        }
    }
}
