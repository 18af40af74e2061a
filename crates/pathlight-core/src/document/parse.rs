//! Loading SVG text into an [`SvgDocument`].

use indexmap::IndexMap;
use log::trace;
use svg::{
    node::{Attributes, element::tag::Type},
    parser::Event,
};

use super::{DocumentError, NodeKind, SvgDocument};
use crate::surface::NodeId;

pub(super) const CDATA_START: &str = "<![CDATA[";
pub(super) const CDATA_END: &str = "]]>";

/// A stretch of source text: markup for the tokenizer, or the body of a
/// CDATA section kept verbatim.
#[derive(Debug, PartialEq)]
enum Section<'a> {
    Markup(&'a str),
    Cdata(&'a str),
}

/// Cuts CDATA sections out of the source. The tokenizer ends a `<!...>`
/// declaration at the first `>`, which would split stylesheets apart.
fn split_cdata(source: &str) -> Result<Vec<Section<'_>>, DocumentError> {
    let mut sections = Vec::new();
    let mut rest = source;
    while let Some(start) = rest.find(CDATA_START) {
        let (markup, tail) = rest.split_at(start);
        let body = &tail[CDATA_START.len()..];
        let end = body
            .find(CDATA_END)
            .ok_or_else(|| DocumentError::Parse("unterminated CDATA section".to_string()))?;
        if !markup.is_empty() {
            sections.push(Section::Markup(markup));
        }
        sections.push(Section::Cdata(&body[..end]));
        rest = &body[end + CDATA_END.len()..];
    }
    if !rest.is_empty() {
        sections.push(Section::Markup(rest));
    }
    Ok(sections)
}

/// Tree under construction.
struct Builder {
    doc: SvgDocument,
    open: Vec<(NodeId, String)>,
    root: Option<NodeId>,
}

impl Builder {
    fn new() -> Self {
        Self {
            doc: SvgDocument {
                slots: Vec::new(),
                free: Vec::new(),
                root: NodeId::new(0),
                prolog: Vec::new(),
            },
            open: Vec::new(),
            root: None,
        }
    }

    fn after_root(&self) -> bool {
        self.root.is_some() && self.open.is_empty()
    }

    fn attach(&mut self, kind: NodeKind) -> NodeId {
        let id = self.doc.push_node(kind);
        if let Some(&(parent, _)) = self.open.last() {
            self.doc.adopt(parent, id, None);
        }
        id
    }

    fn open_element(&mut self, name: &str, attributes: &Attributes, empty: bool) {
        if self.after_root() {
            trace!(name; "Skipping element after document root");
            return;
        }
        let id = self.attach(element(name, attributes));
        self.root.get_or_insert(id);
        if !empty {
            self.open.push((id, name.to_string()));
        }
    }

    fn close_element(&mut self, name: &str) -> Result<(), DocumentError> {
        if self.after_root() {
            return Ok(());
        }
        match self.open.pop() {
            Some((_, expected)) if expected == name => Ok(()),
            _ => Err(DocumentError::UnexpectedClose {
                found: name.to_string(),
            }),
        }
    }

    /// Comments, declarations and instructions: kept in the prolog before
    /// the root, as nodes inside it, dropped after it.
    fn markup(&mut self, raw: &str) {
        if self.root.is_none() {
            self.doc.prolog.push(raw.to_string());
        } else if !self.open.is_empty() {
            self.attach(NodeKind::Markup(raw.to_string()));
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), DocumentError> {
        match event {
            Event::Tag(name, Type::Start, attributes) => self.open_element(name, &attributes, false),
            Event::Tag(name, Type::Empty, attributes) => self.open_element(name, &attributes, true),
            Event::Tag(name, Type::End, _) => self.close_element(name)?,
            Event::Text(text) => {
                if !self.open.is_empty() && !text.trim().is_empty() {
                    self.attach(NodeKind::Text(text.to_string()));
                }
            }
            Event::Comment(raw) | Event::Declaration(raw) | Event::Instruction(raw) => {
                self.markup(raw);
            }
            Event::Error(err) => return Err(DocumentError::Parse(err.to_string())),
        }
        Ok(())
    }

    fn cdata(&mut self, body: &str) {
        if self.open.is_empty() {
            trace!("Skipping CDATA section outside the root element");
            return;
        }
        self.attach(NodeKind::Cdata(body.to_string()));
    }

    fn finish(mut self) -> Result<SvgDocument, DocumentError> {
        if let Some((_, name)) = self.open.pop() {
            return Err(DocumentError::Unclosed(name));
        }
        self.doc.root = self.root.ok_or(DocumentError::NoRoot)?;
        Ok(self.doc)
    }
}

impl SvgDocument {
    /// Parses SVG source text.
    ///
    /// Comments, declarations, processing instructions and CDATA sections
    /// are kept and written back unchanged; whitespace-only text is
    /// dropped. Anything after the root element closes is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the markup is malformed, tags are
    /// unbalanced, or there is no root element.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let mut builder = Builder::new();
        for section in split_cdata(source)? {
            match section {
                Section::Markup(markup) => {
                    for event in svg::read(markup)? {
                        builder.event(event)?;
                    }
                }
                Section::Cdata(body) => builder.cdata(body),
            }
        }
        builder.finish()
    }
}

fn element(name: &str, attributes: &Attributes) -> NodeKind {
    // The parser hands attributes over unordered
    let mut sorted: Vec<(String, String)> = attributes
        .iter()
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    NodeKind::Element {
        name: name.to_string(),
        attributes: sorted.into_iter().collect::<IndexMap<_, _>>(),
    }
}
