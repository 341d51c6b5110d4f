//! Trade set extraction from the parsed export.
//!
//! The `FlexQueryResponse` / `FlexStatements` / `FlexStatement` chain may
//! arrive as plain objects or as sequences carrying a stray attributes
//! entry at position 0, depending on which serializer produced the file.
//! When the root is a sequence, the real payload sits at index 1 of each
//! ambiguous level. A `Trade` element may additionally be wrapped in a
//! one-deeper sequence; it is unwrapped to the innermost object.

use crate::domain::document::DocNode;
use crate::domain::error::ConvertError;

fn shape(reason: &str) -> ConvertError {
    ConvertError::DocumentShape {
        reason: reason.to_string(),
    }
}

fn payload<'a>(node: &'a DocNode, name: &str) -> Result<&'a DocNode, ConvertError> {
    node.as_seq()
        .and_then(|items| items.get(1))
        .ok_or_else(|| shape(&format!("{name} sequence has no payload at index 1")))
}

fn child<'a>(node: &'a DocNode, name: &str) -> Result<&'a DocNode, ConvertError> {
    node.get(name)
        .ok_or_else(|| shape(&format!("missing {name} node")))
}

/// Walk the document to the ordered list of trade record objects. A
/// document without a `Trades.Trade` node has zero trades, which is valid.
pub fn extract_trades(document: &DocNode) -> Result<Vec<&DocNode>, ConvertError> {
    let response = child(document, "FlexQueryResponse")?;
    let sequenced = response.as_seq().is_some();

    let mut node = response;
    if sequenced {
        node = payload(node, "FlexQueryResponse")?;
    }
    node = child(node, "FlexStatements")?;
    if sequenced {
        node = payload(node, "FlexStatements")?;
    }
    node = child(node, "FlexStatement")?;
    if sequenced {
        node = payload(node, "FlexStatement")?;
    }

    let trade = match node.get("Trades").and_then(|t| t.get("Trade")) {
        Some(trade) => trade,
        None => return Ok(Vec::new()),
    };

    match trade {
        DocNode::Object(_) => Ok(vec![trade]),
        DocNode::Seq(items) => items.iter().map(unwrap_trade).collect(),
        DocNode::Scalar(_) => Err(shape("Trade node is a scalar")),
    }
}

fn unwrap_trade(node: &DocNode) -> Result<&DocNode, ConvertError> {
    match node {
        DocNode::Object(_) => Ok(node),
        // singleton indirection: the trade object nested one level deeper
        DocNode::Seq(items) => match items.first() {
            Some(inner @ DocNode::Object(_)) => Ok(inner),
            _ => Err(shape("Trade sequence does not wrap a record")),
        },
        DocNode::Scalar(_) => Err(shape("Trade entry is a scalar")),
    }
}
