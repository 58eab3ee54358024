//! Text width measurement and line wrapping.

use std::sync::Arc;

use ttf_parser::{Face, GlyphId};

use crate::{font::FontSet, style::FontWeight};

/// Measures the advance width of a run of text.
pub trait TextMeasure: Send + Sync {
    /// Width in pixels of `text` set at `font_size` with `weight`.
    fn width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32;
}

/// Advance widths read from the faces the card is rendered with.
///
/// Kerning is ignored, so measured runs are never narrower than the shaped
/// text.
#[derive(Debug, Clone)]
pub struct FontMeasure {
    regular: Arc<[u8]>,
    bold: Arc<[u8]>,
}

impl FontMeasure {
    /// Metrics for `fonts`, or `None` when the regular face does not parse.
    ///
    /// An unparseable bold face is measured with the regular one.
    pub fn new(fonts: &FontSet) -> Option<Self> {
        Face::parse(&fonts.regular, 0).ok()?;
        let bold = if Face::parse(&fonts.bold, 0).is_ok() {
            Arc::clone(&fonts.bold)
        } else {
            Arc::clone(&fonts.regular)
        };
        Some(Self {
            regular: Arc::clone(&fonts.regular),
            bold,
        })
    }
}

impl TextMeasure for FontMeasure {
    fn width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32 {
        let data = match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        };
        let Ok(face) = Face::parse(data, 0) else {
            return EstimatedMeasure.width(text, font_size, weight);
        };

        // missing glyphs render as .notdef
        let notdef = face.glyph_hor_advance(GlyphId(0)).unwrap_or(0);
        let units: u32 = text
            .chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|id| face.glyph_hor_advance(id))
                    .unwrap_or(notdef) as u32
            })
            .sum();

        units as f32 / f32::from(face.units_per_em()) * font_size
    }
}

/// Approximate proportional-font metrics.
///
/// Advances are bucketed by character class, tuned for humanist sans-serif
/// faces. Only used when the supplied fonts cannot be parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMeasure;

impl EstimatedMeasure {
    fn advance(c: char) -> f32 {
        match c {
            ' ' => 0.28,
            'i' | 'j' | 'l' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' => 0.26,
            'f' | 'r' | 't' | 'I' | '(' | ')' | '[' | ']' | '-' | '"' => 0.36,
            'm' | 'w' => 0.85,
            'M' | 'W' => 0.92,
            '0'..='9' => 0.58,
            'A'..='Z' => 0.68,
            'a'..='z' => 0.55,
            c if c.is_ascii() => 0.6,
            // CJK and other full-width scripts
            c if c >= '\u{2e80}' => 1.0,
            _ => 0.62,
        }
    }
}

impl TextMeasure for EstimatedMeasure {
    fn width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32 {
        let em: f32 = text.chars().map(Self::advance).sum();
        let weight_factor = match weight {
            FontWeight::Regular => 1.0,
            FontWeight::Bold => 1.06,
        };
        em * font_size * weight_factor
    }
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Words wider than a whole line are broken between characters. Runs of
/// whitespace collapse to a single space. Empty input yields no lines.
pub fn wrap_text(
    measure: &dyn TextMeasure,
    text: &str,
    font_size: f32,
    weight: FontWeight,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure.width(&candidate, font_size, weight) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure.width(word, font_size, weight) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                let mut next = current.clone();
                next.push(c);
                if !current.is_empty() && measure.width(&next, font_size, weight) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                } else {
                    current = next;
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
