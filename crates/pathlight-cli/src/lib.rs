//! CLI logic for the Pathlight highlighter.
//!
//! Loads a rendered pathway SVG and its pvjson data, applies the requested
//! highlights and writes the highlighted SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use pathlight::{Diagram, DiagramSource, PathlightError, style::StyleSet};

/// Run the Pathlight CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PathlightError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Invalid pathway data
/// - Invalid SVG
pub fn run(args: &Args) -> Result<(), PathlightError> {
    info!(
        input_path = args.input,
        pvjson_path = args.pvjson,
        output_path = args.output;
        "Processing pathway"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let styles = style_overrides(args)?;

    let svg = fs::read_to_string(&args.input)?;
    let pvjson = fs::read_to_string(&args.pvjson)?;

    let mut diagram = Diagram::new(vec![DiagramSource::new(svg, pvjson)], app_config);
    diagram.on("error", |event| {
        warn!(event:% = event, message = event.message().unwrap_or_default(); "Source rejected");
    });

    let rendered = diagram.render();
    diagram.flush_events();
    // With a single source, its own failure says more than "no source left"
    rendered.map_err(|err| diagram.take_failures().pop().unwrap_or(err))?;

    for selector in &args.highlight {
        if diagram.highlight(selector, args.group.as_deref(), styles.as_ref()) {
            info!(selector; "Highlighted");
        } else {
            warn!(selector; "Selector matched nothing");
        }
    }

    if let Some(query) = &args.suggest {
        for entry in diagram.suggest(query) {
            println!("{}", entry.display_text());
        }
    }

    let Some(svg) = diagram.to_svg() else {
        return Err(PathlightError::NoRenderableSource(
            "Diagram was not rendered".to_string(),
        ));
    };
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

/// The `--style` overrides as a style set, or `None` when there are none.
fn style_overrides(args: &Args) -> Result<Option<StyleSet>, PathlightError> {
    if args.styles.is_empty() {
        return Ok(None);
    }
    let styles: StyleSet = args.styles.iter().cloned().collect();
    styles.validate().map_err(PathlightError::Config)?;
    Ok(Some(styles))
}
