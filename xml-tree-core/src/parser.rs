use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::XmlNode;

/// Errors that can occur while parsing XML into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Tag, attribute or CDATA bytes were not valid UTF-8.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to decode text entity or bytes.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Structural issue in XML document.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// Parse an XML document into an [`XmlNode`] tree.
///
/// Text of leaf elements is kept verbatim, including whitespace-only values,
/// and `<a></a>` yields `Some("")` while `<a/>` yields `None`. Whitespace
/// between child elements is indentation and is dropped. Declarations,
/// comments, processing instructions and doctypes are skipped.
pub fn parse(xml: &str) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => builder.open(start_node(&e, &reader)?),
            Event::Empty(e) => builder.attach(start_node(&e, &reader)?)?,
            Event::Text(e) => builder.append_text(&e.unescape()?),
            Event::CData(e) => builder.append_text(std::str::from_utf8(e.as_ref())?),
            Event::End(_) => builder.close()?,
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
    }

    builder.finish()
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    node: XmlNode,
    /// Whitespace-only text not yet known to be content or indentation.
    whitespace: String,
}

/// Stack of open elements plus the finished root, if any.
#[derive(Default)]
struct TreeBuilder {
    open: Vec<OpenElement>,
    root: Option<XmlNode>,
}

impl TreeBuilder {
    fn open(&mut self, node: XmlNode) {
        self.open.push(OpenElement {
            node,
            whitespace: String::new(),
        });
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let OpenElement {
            mut node,
            whitespace,
        } = self.open.pop().ok_or_else(|| {
            ParseError::Malformed("encountered closing tag without open tag".to_string())
        })?;
        if node.children.is_empty() {
            node.text.get_or_insert_with(String::new).push_str(&whitespace);
        }
        self.attach(node)
    }

    /// Attach a complete element to the innermost open element, or make it the root.
    fn attach(&mut self, node: XmlNode) -> Result<(), ParseError> {
        if let Some(parent) = self.open.last_mut() {
            parent.node.children.push(node);
            return Ok(());
        }
        if self.root.is_some() {
            return Err(ParseError::Malformed(
                "multiple top-level elements found".to_string(),
            ));
        }
        self.root = Some(node);
        Ok(())
    }

    fn append_text(&mut self, text: &str) {
        let Some(current) = self.open.last_mut() else {
            return;
        };
        if text.trim().is_empty() {
            current.whitespace.push_str(text);
            return;
        }
        let content = current.node.text.get_or_insert_with(String::new);
        content.push_str(&std::mem::take(&mut current.whitespace));
        content.push_str(text);
    }

    fn finish(self) -> Result<XmlNode, ParseError> {
        if !self.open.is_empty() {
            return Err(ParseError::Malformed(
                "unclosed element(s) at end of document".to_string(),
            ));
        }
        self.root
            .ok_or_else(|| ParseError::Malformed("no root element found".to_string()))
    }
}

fn start_node(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlNode, ParseError> {
    let mut node = XmlNode::new(qname_to_string(e.name())?);

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        node.attributes.insert(key, value);
    }

    Ok(node)
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};

    #[test]
    fn rejects_multiple_roots() {
        let err = parse("<a/><b/>").expect_err("two roots");
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse("").expect_err("no root");
        assert!(matches!(err, ParseError::Malformed(msg) if msg.contains("no root")));
    }

    #[test]
    fn unescapes_entities_and_keeps_cdata() {
        let node =
            parse(r#"<script><name>a &amp; b</name><code><![CDATA[echo "<hi>"]]></code></script>"#)
                .expect("parse");
        assert_eq!(node.get_text(&["name"]), Some("a & b"));
        assert_eq!(node.get_text(&["code"]), Some(r#"echo "<hi>""#));
    }

    #[test]
    fn keeps_whitespace_of_leaves_only() {
        let node = parse(
            "<script>\n  <parameters>\n    <parameter4> </parameter4>\n  </parameters>\n  <notes>\n</notes>\n  <info></info>\n  <os_requirements/>\n</script>",
        )
        .expect("parse");
        assert_eq!(node.text, None);
        assert_eq!(node.get_child("parameters").map(|p| p.text.clone()), Some(None));
        assert_eq!(node.get_text(&["parameters", "parameter4"]), Some(" "));
        assert_eq!(node.get_text(&["notes"]), Some("\n"));
        assert_eq!(node.get_text(&["info"]), Some(""));
        assert_eq!(node.get_text(&["os_requirements"]), None);
    }

    #[test]
    fn whitespace_next_to_cdata_is_content() {
        let node = parse("<script><code> <![CDATA[x]]> </code></script>").expect("parse");
        assert_eq!(node.get_text(&["code"]), Some(" x "));
    }
}
