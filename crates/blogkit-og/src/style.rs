//! Box and text styling for layout nodes.
//!
//! A deliberately small subset of CSS flexbox: direction, justification,
//! cross-axis alignment, gap, padding, fixed or maximum sizes, background,
//! a top border, and inherited text properties.

use std::fmt;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Opaque color from `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Same color with a different opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Whether the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}

impl fmt::Display for Color {
    /// Formats as `#rrggbb`; opacity is emitted separately.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Main axis of a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Main-axis distribution of children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Cross-axis placement of children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    /// Element children fill the cross axis; text keeps its measured size.
    #[default]
    Stretch,
    Start,
    Center,
    End,
}

/// Font weight variants available to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn value(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Bold => 700,
        }
    }
}

/// Per-side lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    /// Same length on all sides.
    pub const fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Vertical and horizontal lengths.
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Style of a layout node.
///
/// `color`, `font_size` and `font_weight` are inherited by descendants when
/// unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub direction: FlexDirection,
    pub justify: Justify,
    pub align: Align,
    pub gap: f32,
    pub padding: Edges,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_width: Option<f32>,
    pub background: Option<Color>,
    pub border_radius: f32,
    /// Top border as `(width, color)`.
    pub border_top: Option<(f32, Color)>,
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    /// Line height as a multiple of the font size.
    pub line_height: Option<f32>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn column(mut self) -> Self {
        self.direction = FlexDirection::Column;
        self
    }

    #[must_use]
    pub fn row(mut self) -> Self {
        self.direction = FlexDirection::Row;
        self
    }

    #[must_use]
    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    #[must_use]
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn border_radius(mut self, radius: f32) -> Self {
        self.border_radius = radius;
        self
    }

    #[must_use]
    pub fn border_top(mut self, width: f32, color: Color) -> Self {
        self.border_top = Some((width, color));
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    #[must_use]
    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }
}

/// Text properties after inheritance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextProps {
    pub color: Color,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub line_height: f32,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            color: Color::rgb(0, 0, 0),
            font_size: 16.0,
            font_weight: FontWeight::Regular,
            line_height: 1.2,
        }
    }
}

impl TextProps {
    /// Apply a node's overrides on top of inherited properties.
    pub fn inherit(self, style: &Style) -> Self {
        Self {
            color: style.color.unwrap_or(self.color),
            font_size: style.font_size.unwrap_or(self.font_size),
            font_weight: style.font_weight.unwrap_or(self.font_weight),
            line_height: style.line_height.unwrap_or(self.line_height),
        }
    }

    /// Height of one line box in pixels.
    pub fn line_px(&self) -> f32 {
        self.font_size * self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_display() {
        assert_eq!(Color::hex(0x1e1e1e).to_string(), "#1e1e1e");
        assert_eq!(Color::hex(0x9cdcfe).to_string(), "#9cdcfe");
        assert!(Color::hex(0x9cdcfe).is_opaque());
        assert!(!Color::hex(0x9cdcfe).with_alpha(0.15).is_opaque());
    }

    #[test]
    fn test_text_props_inherit() {
        let parent = TextProps::default().inherit(&Style::new().color(Color::WHITE).font_size(32.0));
        let child = parent.inherit(&Style::new().font_weight(FontWeight::Bold));

        assert_eq!(child.color, Color::WHITE);
        assert_eq!(child.font_size, 32.0);
        assert_eq!(child.font_weight, FontWeight::Bold);
        assert!((child.line_px() - 38.4).abs() < 1e-3);
    }

    #[test]
    fn test_edges() {
        let e = Edges::symmetric(8.0, 20.0);
        assert_eq!(e.horizontal(), 40.0);
        assert_eq!(e.vertical(), 16.0);
        assert_eq!(Edges::all(60.0).horizontal(), 120.0);
    }
}
