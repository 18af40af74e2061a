//! Writing an [`SvgDocument`] back out as SVG text.

use std::fmt;

use super::{
    NodeKind, SvgDocument,
    parse::{CDATA_END, CDATA_START},
};
use crate::surface::NodeId;

const INDENT: &str = "  ";

fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

fn escape_text(text: &str) -> String {
    text.replace('<', "&lt;")
}

impl SvgDocument {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let Some(node) = self.node(id) else {
            return Ok(());
        };
        let indent = INDENT.repeat(depth);

        match &node.kind {
            NodeKind::Text(text) => writeln!(f, "{indent}{}", escape_text(text.trim())),
            NodeKind::Cdata(body) => writeln!(f, "{indent}{CDATA_START}{body}{CDATA_END}"),
            NodeKind::Markup(raw) => writeln!(f, "{indent}{raw}"),
            NodeKind::Element { name, attributes } => {
                write!(f, "{indent}<{name}")?;
                for (key, value) in attributes {
                    write!(f, r#" {key}="{}""#, escape_attribute(value))?;
                }

                let inline = match node.children.as_slice() {
                    [only] => self.node(*only).map(|child| &child.kind),
                    _ => None,
                };
                match inline {
                    Some(NodeKind::Text(text)) => {
                        return writeln!(f, ">{}</{name}>", escape_text(text.trim()));
                    }
                    Some(NodeKind::Cdata(body)) => {
                        return writeln!(f, ">{CDATA_START}{body}{CDATA_END}</{name}>");
                    }
                    _ => {}
                }

                if node.children.is_empty() {
                    return writeln!(f, "/>");
                }
                writeln!(f, ">")?;
                for &child in &node.children {
                    self.write_node(f, child, depth + 1)?;
                }
                writeln!(f, "{indent}</{name}>")
            }
        }
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.prolog {
            writeln!(f, "{line}")?;
        }
        self.write_node(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{document::SvgDocument, surface::Surface};

    #[test]
    fn test_write_nested() {
        let doc =
            SvgDocument::parse(r#"<svg><g id="v"><rect x="1"/><text>A &amp; B</text></g></svg>"#)
                .unwrap();
        assert_eq!(
            doc.to_string(),
            "<svg>\n  <g id=\"v\">\n    <rect x=\"1\"/>\n    <text>A &amp; B</text>\n  </g>\n</svg>\n"
        );
    }

    #[test]
    fn test_write_reparses_to_same_tree() {
        let source = r#"<svg><defs><marker id="m"><path d="M0 0L1 1"/></marker></defs><g id="v"/></svg>"#;
        let doc = SvgDocument::parse(source).unwrap();
        let again = SvgDocument::parse(&doc.to_string()).unwrap();
        assert_eq!(doc.to_string(), again.to_string());
        assert_eq!(again.element_count(), 5);
    }

    #[test]
    fn test_write_keeps_stylesheet_and_comments() {
        let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg><style type="text/css"><![CDATA[
  .Label > text { fill: red; }
  a < b
]]></style><defs><!-- markers --><marker id="m"/></defs></svg>"#;
        let doc = SvgDocument::parse(source).unwrap();
        let written = doc.to_string();

        assert!(written.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(written.contains(
            "<style type=\"text/css\"><![CDATA[\n  .Label > text { fill: red; }\n  a < b\n]]></style>"
        ));
        assert!(written.contains("<!-- markers -->"));

        let again = SvgDocument::parse(&written).unwrap();
        assert_eq!(again.to_string(), written);
        let style = again.select_first("style").unwrap();
        assert!(again.text_content(style).contains("fill: red;"));
    }

    #[test]
    fn test_write_escapes_quotes() {
        let mut doc = SvgDocument::new("svg");
        let root = doc.root();
        doc.set_attribute(root, "data-label", r#"say "hi""#);
        assert_eq!(doc.to_string(), "<svg data-label=\"say &quot;hi&quot;\"/>\n");
    }
}
