//! Pathlight Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Pathlight
//! highlighter and its hosts. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: CSS color validation and id-safe color fragments ([`color::Color`])
//! - **Styles**: Ordered highlight style sets ([`style::StyleSet`])
//! - **Transforms**: Parsers for `translate(...)`, `url(#...)` and lengths ([`transform`] module)
//! - **Semantic**: The pvjson pathway data model ([`semantic`] module)
//! - **Surface**: The visual-tree capability the highlighter works against ([`surface::Surface`])
//! - **Document**: An in-memory SVG surface ([`document::SvgDocument`])

pub mod color;
pub mod document;
pub mod geometry;
pub mod semantic;
pub mod style;
pub mod surface;
pub mod transform;
