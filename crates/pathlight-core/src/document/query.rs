//! The selector subset understood by [`SvgDocument`](super::SvgDocument).

use log::debug;

/// One comma-separated part of a selector list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SimpleSelector<'a> {
    Id(&'a str),
    Tag(&'a str),
}

impl SimpleSelector<'_> {
    pub(super) fn matches(&self, tag_name: &str, id: Option<&str>) -> bool {
        match self {
            Self::Id(wanted) => id == Some(*wanted),
            Self::Tag(wanted) => tag_name == *wanted,
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')
}

/// A tag name: a letter followed by name characters.
fn is_tag_name(part: &str) -> bool {
    let mut chars = part.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(is_name_char)
}

fn parse_simple(part: &str) -> Option<SimpleSelector<'_>> {
    if let Some(id) = part.strip_prefix('#') {
        if !id.is_empty() && !id.contains(char::is_whitespace) {
            return Some(SimpleSelector::Id(id));
        }
        return None;
    }
    if is_tag_name(part) {
        return Some(SimpleSelector::Tag(part));
    }
    None
}

/// Splits a selector list on commas. Parts outside the supported subset are
/// dropped, so a list made only of them matches nothing.
pub(super) fn parse_selector_list(selector: &str) -> Vec<SimpleSelector<'_>> {
    selector
        .split(',')
        .map(str::trim)
        .filter_map(|part| {
            let simple = parse_simple(part);
            if simple.is_none() && !part.is_empty() {
                debug!(part; "Ignoring unsupported selector");
            }
            simple
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_selector_list("#eb5, rect ,#viewport"),
            vec![
                SimpleSelector::Id("eb5"),
                SimpleSelector::Tag("rect"),
                SimpleSelector::Id("viewport")
            ]
        );
    }

    #[test]
    fn test_parse_drops_unsupported_parts() {
        assert_eq!(
            parse_selector_list("g > rect, #a, .class, #"),
            vec![SimpleSelector::Id("a")]
        );
        assert!(parse_selector_list("").is_empty());
    }

    #[test]
    fn test_parse_rejects_non_tag_names() {
        assert!(parse_selector_list(".highlighted-node").is_empty());
        assert!(parse_selector_list("rect.outline").is_empty());
        assert!(parse_selector_list("-rect, 2d").is_empty());
        assert_eq!(
            parse_selector_list("svg:rect"),
            vec![SimpleSelector::Tag("svg:rect")]
        );
    }

    #[test]
    fn test_matches() {
        assert!(SimpleSelector::Id("a").matches("g", Some("a")));
        assert!(!SimpleSelector::Id("a").matches("g", None));
        assert!(SimpleSelector::Tag("g").matches("g", None));
        assert!(!SimpleSelector::Tag("g").matches("rect", Some("g")));
    }
}
