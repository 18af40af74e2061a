//! Command-line argument definitions for the Pathlight CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments name the rendered diagram and its pathway data,
//! the selectors to highlight, and the output, configuration and logging
//! settings.

use clap::Parser;

/// Command-line arguments for the Pathlight highlighter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the rendered pathway SVG
    #[arg(help = "Path to the rendered SVG")]
    pub input: String,

    /// Path to the pathway data (pvjson) the SVG was rendered from
    #[arg(short, long)]
    pub pvjson: String,

    /// Selector to highlight: `#id`, `xref:<id>` or display text (repeatable)
    #[arg(short = 'H', long = "highlight")]
    pub highlight: Vec<String>,

    /// Highlight group the selectors are added to
    #[arg(short, long)]
    pub group: Option<String>,

    /// Style override as `name=value`, e.g. `stroke=red` (repeatable)
    #[arg(short, long = "style", value_parser = parse_style)]
    pub styles: Vec<(String, String)>,

    /// Print typeahead suggestions for this query
    #[arg(long)]
    pub suggest: Option<String>,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_style(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected `name=value`, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = Args::parse_from([
            "pathlight",
            "diagram.svg",
            "--pvjson",
            "diagram.json",
            "-H",
            "GCN-2",
            "-H",
            "xref:ENSG1",
            "-g",
            "search",
            "-s",
            "stroke=red",
        ]);

        assert_eq!(args.input, "diagram.svg");
        assert_eq!(args.pvjson, "diagram.json");
        assert_eq!(args.highlight, vec!["GCN-2", "xref:ENSG1"]);
        assert_eq!(args.group.as_deref(), Some("search"));
        assert_eq!(args.styles, vec![("stroke".to_string(), "red".to_string())]);
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(
            parse_style("fill-opacity = 0.5"),
            Ok(("fill-opacity".to_string(), "0.5".to_string()))
        );
        assert!(parse_style("stroke").is_err());
        assert!(parse_style("=red").is_err());
    }
}
