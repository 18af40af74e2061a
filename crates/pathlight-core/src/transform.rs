//! Parsers for the few SVG attribute micro-syntaxes the highlighter reads.
//!
//! - [`parse_translate`]: the `translate(x y)` part of a `transform` attribute
//! - [`parse_url_reference`]: the id inside a `url(#id)` paint/marker reference
//! - [`parse_length`]: the leading number of a length such as `3px`
//!
//! All of them are lenient: anything they cannot understand yields a default
//! or `None` rather than an error, since a malformed attribute only means
//! "nothing to offset" or "nothing to recolor".

use winnow::{
    Parser as _,
    ascii::{float, multispace0},
    combinator::{delimited, opt, preceded},
    error::{ContextError, ModalResult},
    token::{literal, take_till},
};

use crate::geometry::Point;

type IResult<O> = ModalResult<O, ContextError>;

/// A number with optional leading whitespace
fn number(input: &mut &str) -> IResult<f32> {
    preceded(multispace0, float).parse_next(input)
}

/// Whitespace and at most one comma between two numbers
fn separator(input: &mut &str) -> IResult<()> {
    (multispace0, opt(literal(",")), multispace0)
        .void()
        .parse_next(input)
}

/// `translate(x[ ,]y)` with `y` optional
fn translate_args(input: &mut &str) -> IResult<Point> {
    preceded(
        (literal("translate"), multispace0, literal("(")),
        (number, opt(preceded(separator, number)), multispace0, literal(")")),
    )
    .map(|(x, y, _, _)| Point::new(x, y.unwrap_or(0.0)))
    .parse_next(input)
}

/// `url(#id)`
fn url_reference<'a>(input: &mut &'a str) -> IResult<&'a str> {
    delimited(
        (multispace0, literal("url("), multispace0, literal("#")),
        take_till(1.., |c: char| c == ')' || c.is_whitespace()),
        (multispace0, literal(")"), multispace0),
    )
    .parse_next(input)
}

/// Extracts the translation from a `transform` attribute value.
///
/// The first well-formed `translate(...)` wins; other transform functions are
/// ignored. A missing or malformed translation is the zero offset.
///
/// # Examples
///
/// ```
/// use pathlight_core::{geometry::Point, transform::parse_translate};
///
/// assert_eq!(parse_translate("translate(10 20)"), Point::new(10.0, 20.0));
/// assert_eq!(parse_translate("translate(10,20)"), Point::new(10.0, 20.0));
/// assert_eq!(parse_translate("translate(7)"), Point::new(7.0, 0.0));
/// assert_eq!(parse_translate("scale(2)"), Point::default());
/// assert_eq!(parse_translate("translate(abc)"), Point::default());
/// ```
pub fn parse_translate(transform: &str) -> Point {
    transform
        .match_indices("translate")
        .find_map(|(idx, _)| {
            let mut input = &transform[idx..];
            translate_args.parse_next(&mut input).ok()
        })
        .unwrap_or_default()
}

/// Returns the referenced id of a `url(#id)` value.
///
/// # Examples
///
/// ```
/// use pathlight_core::transform::parse_url_reference;
///
/// assert_eq!(parse_url_reference("url(#arrow-black)"), Some("arrow-black"));
/// assert_eq!(parse_url_reference("none"), None);
/// ```
pub fn parse_url_reference(value: &str) -> Option<&str> {
    url_reference.parse(value).ok()
}

/// Returns the leading number of a length or plain number, ignoring any unit.
///
/// # Examples
///
/// ```
/// use pathlight_core::transform::parse_length;
///
/// assert_eq!(parse_length("3px"), Some(3.0));
/// assert_eq!(parse_length(" 1.5"), Some(1.5));
/// assert_eq!(parse_length("wide"), None);
/// ```
pub fn parse_length(value: &str) -> Option<f32> {
    let mut input = value;
    number.parse_next(&mut input).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_space_separated() {
        assert_eq!(parse_translate("translate(10 20)"), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_translate_comma_separated_with_spaces() {
        assert_eq!(
            parse_translate("translate( 10.5 , 20.25 )"),
            Point::new(10.5, 20.25)
        );
    }

    #[test]
    fn test_translate_negative_values() {
        assert_eq!(parse_translate("translate(-4,-8)"), Point::new(-4.0, -8.0));
    }

    #[test]
    fn test_translate_single_component() {
        assert_eq!(parse_translate("translate(12)"), Point::new(12.0, 0.0));
    }

    #[test]
    fn test_translate_among_other_functions() {
        assert_eq!(
            parse_translate("rotate(45) translate(3 4) scale(2)"),
            Point::new(3.0, 4.0)
        );
    }

    #[test]
    fn test_translate_malformed_defaults_to_zero() {
        assert_eq!(parse_translate(""), Point::default());
        assert_eq!(parse_translate("translate("), Point::default());
        assert_eq!(parse_translate("translate(x y)"), Point::default());
        assert_eq!(parse_translate("matrix(1 0 0 1 5 5)"), Point::default());
    }

    #[test]
    fn test_translate_skips_malformed_occurrence() {
        assert_eq!(
            parse_translate("translate(oops) translate(1 2)"),
            Point::new(1.0, 2.0)
        );
    }

    #[test]
    fn test_url_reference() {
        assert_eq!(
            parse_url_reference("url(#mim-conversion-end-black)"),
            Some("mim-conversion-end-black")
        );
        assert_eq!(parse_url_reference(" url( #a ) "), Some("a"));
    }

    #[test]
    fn test_url_reference_rejects_other_values() {
        assert_eq!(parse_url_reference(""), None);
        assert_eq!(parse_url_reference("url(#)"), None);
        assert_eq!(parse_url_reference("url(arrow)"), None);
        assert_eq!(parse_url_reference("url(#a) trailing"), None);
    }

    #[test]
    fn test_length() {
        assert_eq!(parse_length("0"), Some(0.0));
        assert_eq!(parse_length("2.5px"), Some(2.5));
        assert_eq!(parse_length(""), None);
        assert_eq!(parse_length("px"), None);
    }
}
