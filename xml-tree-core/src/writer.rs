use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::tree::XmlNode;

/// Errors that can occur while writing XML from an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Serialized output was not valid UTF-8.
    #[error("serialized XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize an [`XmlNode`] tree as indented XML.
///
/// Indentation is only inserted between elements, so the text of every leaf
/// comes back unchanged from [`crate::parse`]. A node without text or children
/// is written self-closing; `Some("")` is written as an open/close pair.
pub fn write(node: &XmlNode) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, node)?;
    Ok(writer.into_inner())
}

/// [`write`] into a `String`, the form request bodies are sent in.
pub fn write_string(node: &XmlNode) -> Result<String, WriteError> {
    Ok(String::from_utf8(write(node)?)?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(node.tag.as_str());
    start.extend_attributes(
        node.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );

    match (&node.text, node.children.is_empty()) {
        (None, true) => {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        (Some(text), true) => {
            writer.write_event(Event::Start(start))?;
            // Even an empty text event keeps the end tag off a fresh indented
            // line, which would otherwise read back as whitespace content.
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        (text, false) => {
            writer.write_event(Event::Start(start))?;
            if let Some(text) = text {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            for child in &node.children {
                write_element(writer, child)?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
    Ok(())
}
