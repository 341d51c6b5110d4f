//! XML file source adapter.
//!
//! Flex XML is attribute-heavy: a `<Trade symbol="IAG" .../>` element
//! carries every field as an attribute. Attributes land in the document
//! tree under `@`-prefixed keys, child elements under their names, and
//! repeated sibling elements collapse into a sequence. Text-only elements
//! become scalars.

use crate::domain::document::DocNode;
use crate::domain::error::ConvertError;
use crate::ports::source_port::SourcePort;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::PathBuf;

pub struct XmlSourceAdapter {
    path: PathBuf,
}

impl XmlSourceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SourcePort for XmlSourceAdapter {
    fn load(&self) -> Result<DocNode, ConvertError> {
        let content = fs::read_to_string(&self.path)?;
        parse_document(&content).map_err(|reason| ConvertError::DocumentParse {
            format: "xml".to_string(),
            file: self.path.display().to_string(),
            reason,
        })
    }
}

struct Frame {
    name: String,
    entries: Vec<(String, DocNode)>,
    text: String,
}

impl Frame {
    fn new(name: String, entries: Vec<(String, DocNode)>) -> Self {
        Self {
            name,
            entries,
            text: String::new(),
        }
    }
}

fn parse_document(text: &str) -> Result<DocNode, String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    // bottom frame collects the root element(s)
    let mut stack = vec![Frame::new(String::new(), Vec::new())];

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                stack.push(Frame::new(element_name(&e), attr_entries(&e)?));
            }
            Event::Empty(e) => {
                let node = DocNode::Object(attr_entries(&e)?);
                insert_child(stack.last_mut().unwrap(), element_name(&e), node);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                stack.last_mut().unwrap().text.push_str(&text);
            }
            Event::CData(t) => {
                stack
                    .last_mut()
                    .unwrap()
                    .text
                    .push_str(&String::from_utf8_lossy(&t));
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or("unbalanced closing tag")?;
                if stack.is_empty() {
                    return Err("unbalanced closing tag".to_string());
                }
                let node = if frame.entries.is_empty() {
                    DocNode::Scalar(frame.text)
                } else {
                    DocNode::Object(frame.entries)
                };
                insert_child(stack.last_mut().unwrap(), frame.name, node);
            }
            Event::Eof => break,
            // declaration, processing instructions, comments, doctype
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err("unclosed element at end of document".to_string());
    }
    Ok(DocNode::Object(stack.pop().unwrap().entries))
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attr_entries(e: &BytesStart) -> Result<Vec<(String, DocNode)>, String> {
    let mut entries = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        entries.push((key, DocNode::Scalar(value.into_owned())));
    }
    Ok(entries)
}

fn insert_child(parent: &mut Frame, name: String, node: DocNode) {
    match parent.entries.iter_mut().find(|(k, _)| *k == name) {
        // repeated sibling elements collapse into a sequence
        Some((_, DocNode::Seq(items))) => items.push(node),
        Some((_, existing)) => {
            let first = std::mem::replace(existing, DocNode::Scalar(String::new()));
            *existing = DocNode::Seq(vec![first, node]);
        }
        None => parent.entries.push((name, node)),
    }
}
