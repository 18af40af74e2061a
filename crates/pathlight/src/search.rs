//! Text and cross-reference search over semantic elements.
//!
//! The [`SearchIndex`] is built once per rendered diagram from the DataNode
//! and Label elements that carry text, and is read-only afterwards.

use log::debug;

use pathlight_core::semantic::SemanticElement;

/// One searchable DataNode or Label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    display_text: String,
    lowercased_text: String,
    xref_id: String,
    element: usize,
}

impl SearchEntry {
    /// The element text with line breaks collapsed to spaces.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// [`display_text`](Self::display_text) case-folded, used for matching.
    pub fn lowercased_text(&self) -> &str {
        &self.lowercased_text
    }

    /// The cross-reference id, or the empty string.
    pub fn xref_id(&self) -> &str {
        &self.xref_id
    }

    /// Index of the entry's element in the element list it was built from.
    pub fn element(&self) -> usize {
        self.element
    }
}

/// Collapses `\r\n` and `\n` to single spaces.
fn normalize_text(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ")
}

/// Searchable entries in element order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Builds the index from a pathway's element list.
    pub fn build(elements: &[SemanticElement]) -> Self {
        let entries: Vec<SearchEntry> = elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.kind().is_searchable() && element.has_text())
            .filter_map(|(index, element)| {
                let display_text = normalize_text(element.text_content()?);
                Some(SearchEntry {
                    lowercased_text: display_text.to_lowercase(),
                    display_text,
                    xref_id: element.xref_id().unwrap_or_default().to_string(),
                    element: index,
                })
            })
            .collect();

        debug!(entries = entries.len(), elements = elements.len(); "Search index built");
        Self { entries }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose text equals `text`, ignoring case.
    pub fn matching_text<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a SearchEntry> {
        let wanted = normalize_text(text).to_lowercase();
        self.entries
            .iter()
            .filter(move |entry| entry.lowercased_text == wanted)
    }

    /// Entries whose cross-reference id is exactly `xref_id`.
    pub fn matching_xref<'a>(&'a self, xref_id: &'a str) -> impl Iterator<Item = &'a SearchEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.xref_id == xref_id)
    }

    /// Typeahead suggestions for `query`.
    ///
    /// Entries starting with the query come first, then entries containing
    /// it further in; both in element order. Entries whose lowercased text
    /// was already suggested are skipped. At most `limit` entries are
    /// returned, and an empty query suggests nothing.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&SearchEntry> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let prefixed = self
            .entries
            .iter()
            .filter(|entry| entry.lowercased_text.starts_with(&query));
        let infixed = self
            .entries
            .iter()
            .filter(|entry| entry.lowercased_text.find(&query).is_some_and(|pos| pos > 0));

        let mut suggestions: Vec<&SearchEntry> = Vec::new();
        for entry in prefixed.chain(infixed) {
            if suggestions.len() >= limit {
                break;
            }
            if suggestions
                .iter()
                .all(|seen| seen.lowercased_text != entry.lowercased_text)
            {
                suggestions.push(entry);
            }
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use pathlight_core::semantic::ElementKind;

    use super::*;

    fn elements() -> Vec<SemanticElement> {
        vec![
            SemanticElement::new(ElementKind::DataNode)
                .with_id("eb5")
                .with_text("GCN-2")
                .with_xref("ENSG1"),
            SemanticElement::new(ElementKind::Interaction)
                .with_id("i1")
                .with_text("binds"),
            SemanticElement::new(ElementKind::Label)
                .with_id("l1")
                .with_text("Amino acid\nstarvation"),
            SemanticElement::new(ElementKind::DataNode).with_id("empty").with_text(""),
            SemanticElement::new(ElementKind::DataNode).with_id("silent"),
            SemanticElement::new(ElementKind::DataNode)
                .with_text("eIF2\r\nalpha")
                .with_xref("ENSG1"),
        ]
    }

    #[test]
    fn test_build_keeps_text_bearing_nodes_and_labels() {
        let index = SearchIndex::build(&elements());
        let indices: Vec<usize> = index.entries().iter().map(SearchEntry::element).collect();
        assert_eq!(indices, vec![0, 2, 5]);
    }

    #[test]
    fn test_build_normalizes_text() {
        let index = SearchIndex::build(&elements());
        let label = &index.entries()[1];
        assert_eq!(label.display_text(), "Amino acid starvation");
        assert_eq!(label.lowercased_text(), "amino acid starvation");
        assert_eq!(label.xref_id(), "");

        assert_eq!(index.entries()[2].display_text(), "eIF2 alpha");
    }

    #[test]
    fn test_matching_text_ignores_case() {
        let index = SearchIndex::build(&elements());
        let found: Vec<usize> = index.matching_text("gcn-2").map(SearchEntry::element).collect();
        assert_eq!(found, vec![0]);
        assert_eq!(index.matching_text("GCN").count(), 0);
    }

    #[test]
    fn test_matching_xref_is_exact() {
        let index = SearchIndex::build(&elements());
        assert_eq!(index.matching_xref("ENSG1").count(), 2);
        assert_eq!(index.matching_xref("ensg1").count(), 0);
        assert_eq!(index.matching_xref("").count(), 1);
    }

    fn index_of(texts: &[&str]) -> SearchIndex {
        let elements: Vec<SemanticElement> = texts
            .iter()
            .map(|text| SemanticElement::new(ElementKind::DataNode).with_text(*text))
            .collect();
        SearchIndex::build(&elements)
    }

    fn suggested<'a>(index: &'a SearchIndex, query: &str, limit: usize) -> Vec<&'a str> {
        index
            .suggest(query, limit)
            .into_iter()
            .map(SearchEntry::display_text)
            .collect()
    }

    #[test]
    fn test_suggest_prefix_before_infix() {
        let index = index_of(&["p-ATF4", "ATF4", "atf5", "ATF4"]);
        assert_eq!(suggested(&index, "atf", 10), vec!["ATF4", "atf5", "p-ATF4"]);
    }

    #[test]
    fn test_suggest_limit() {
        let index = index_of(&["a1", "a2", "a3", "ba"]);
        assert_eq!(suggested(&index, "A", 2), vec!["a1", "a2"]);
    }

    #[test]
    fn test_suggest_empty_query() {
        let index = index_of(&["a1"]);
        assert!(index.suggest("", 10).is_empty());
    }
}
