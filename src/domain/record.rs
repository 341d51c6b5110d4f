//! Key-indifferent view over one raw trade record.
//!
//! The two serializations disagree on key spelling: the XML reader stores
//! attributes under `@`-prefixed keys while JSON exports use bare names.
//! [`TradeView::get`] resolves a canonical field name against either
//! encoding so the derivation rules and extra-column passthrough never
//! care which source produced the record.

use crate::domain::document::DocNode;
use crate::domain::error::ConvertError;

/// Read-only accessor over a single trade record object.
#[derive(Debug, Clone, Copy)]
pub struct TradeView<'a> {
    record: &'a DocNode,
}

impl<'a> TradeView<'a> {
    pub fn new(record: &'a DocNode) -> Self {
        Self { record }
    }

    /// Two-attempt resolution: the key as given, then the alternate
    /// encoding (`symbol` ↔ `@symbol`). Absent on both misses; never an
    /// error. Only leaf values resolve — a nested node is not a field.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        if let Some(value) = self.record.get(field).and_then(DocNode::as_str) {
            return Some(value);
        }
        let alternate = match field.strip_prefix('@') {
            Some(bare) => bare.to_string(),
            None => format!("@{field}"),
        };
        self.record.get(&alternate).and_then(DocNode::as_str)
    }

    /// Like [`get`](Self::get), but absence of the field is fatal. Used by
    /// the fixed-column derivations, never by extra-column passthrough.
    pub fn required(&self, field: &str) -> Result<&'a str, ConvertError> {
        self.get(field).ok_or_else(|| ConvertError::MissingField {
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, &str)]) -> DocNode {
        DocNode::object(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), DocNode::scalar(*v)))
                .collect(),
        )
    }

    #[test]
    fn get_exact_key() {
        let rec = record(&[("symbol", "IAG")]);
        assert_eq!(TradeView::new(&rec).get("symbol"), Some("IAG"));
    }

    #[test]
    fn get_falls_back_to_attribute_key() {
        let rec = record(&[("@symbol", "IAG"), ("@tradePrice", "46")]);
        let view = TradeView::new(&rec);
        assert_eq!(view.get("symbol"), Some("IAG"));
        assert_eq!(view.get("tradePrice"), Some("46"));
    }

    #[test]
    fn get_falls_back_to_bare_key() {
        let rec = record(&[("ibExecID", "0000d323")]);
        assert_eq!(TradeView::new(&rec).get("@ibExecID"), Some("0000d323"));
    }

    #[test]
    fn get_absent_is_none() {
        let rec = record(&[("symbol", "IAG")]);
        assert_eq!(TradeView::new(&rec).get("strike"), None);
    }

    #[test]
    fn get_prefers_exact_over_alternate() {
        let rec = DocNode::object(vec![
            ("symbol".into(), DocNode::scalar("bare")),
            ("@symbol".into(), DocNode::scalar("attr")),
        ]);
        assert_eq!(TradeView::new(&rec).get("symbol"), Some("bare"));
        assert_eq!(TradeView::new(&rec).get("@symbol"), Some("attr"));
    }

    #[test]
    fn get_ignores_nested_nodes() {
        let rec = DocNode::object(vec![(
            "symbol".into(),
            DocNode::Seq(vec![DocNode::scalar("IAG")]),
        )]);
        assert_eq!(TradeView::new(&rec).get("symbol"), None);
    }

    #[test]
    fn required_errors_on_absent() {
        let rec = record(&[("symbol", "IAG")]);
        let err = TradeView::new(&rec).required("tradeDate").unwrap_err();
        assert!(matches!(err, ConvertError::MissingField { field } if field == "tradeDate"));
    }

    #[test]
    fn empty_string_is_present() {
        // absence and empty string are distinct
        let rec = record(&[("notes", "")]);
        assert_eq!(TradeView::new(&rec).get("notes"), Some(""));
    }
}
