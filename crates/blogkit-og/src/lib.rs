//! blogkit Open Graph Library
//!
//! Renders social preview cards: a declarative layout tree is laid out with a
//! small flexbox-like box model, emitted as SVG, and rasterized to PNG.
//!
//! # Modules
//!
//! - [`style`] - Box and text styling for layout nodes
//! - [`layout`] - Layout tree and box model
//! - [`measure`] - Text width measurement
//! - [`svg`] - Layout to SVG markup
//! - [`raster`] - SVG to PNG rasterization
//! - [`font`] - Font resolution
//! - [`card`] - The preview card template
//! - [`renderer`] - End-to-end preview image rendering

pub mod card;
pub mod error;
pub mod font;
pub mod layout;
pub mod measure;
pub mod raster;
pub mod renderer;
pub mod style;
pub mod svg;

pub use card::{CardTemplate, MAX_TAGS, OG_HEIGHT, OG_WIDTH};
pub use error::{OgError, Result};
pub use font::{
    CachedFontProvider, FontError, FontProvider, FontSet, HttpFontProvider, StaticFontProvider,
};
pub use layout::{LayoutBox, Node};
pub use measure::{EstimatedMeasure, FontMeasure, TextMeasure};
pub use raster::Rasterizer;
pub use renderer::OgImageRenderer;
pub use style::{Align, Color, Edges, FlexDirection, FontWeight, Justify, Style};
