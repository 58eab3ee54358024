//! SVG to PNG rasterization.

use std::sync::Arc;

use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{self, fontdb},
};
use tracing::{debug, warn};

use crate::{
    error::{OgError, Result},
    font::FontSet,
};

/// Rasterizes SVG documents with a fixed set of fonts.
///
/// The font database is built once and shared by every render.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Rasterizer {
    /// Create a rasterizer that shapes text with `fonts` only.
    ///
    /// The generic `sans-serif` family is mapped to the first loaded face so
    /// a family name mismatch still renders with the supplied fonts.
    pub fn new(fonts: &FontSet) -> Self {
        let mut db = fontdb::Database::new();
        db.load_font_data(fonts.regular.to_vec());
        db.load_font_data(fonts.bold.to_vec());

        let family = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
        match family {
            Some(name) => {
                debug!(family = %name, faces = db.len(), "loaded preview fonts");
                db.set_sans_serif_family(name);
            }
            None => warn!("no usable font faces in supplied font data, text will not render"),
        }

        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Number of font faces available for shaping.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Parse `svg` and rasterize it into a `width` × `height` PNG.
    pub fn render_png(&self, svg: &str, width: u32, height: u32) -> Result<Vec<u8>> {
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)?;

        let mut pixmap = Pixmap::new(width, height).ok_or(OgError::Pixmap { width, height })?;

        let size = tree.size();
        let transform = Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| OgError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fonts() -> FontSet {
        FontSet::new(b"not a font".to_vec(), b"still not a font".to_vec())
    }

    #[test]
    fn test_render_png_has_requested_size() {
        let rasterizer = Rasterizer::new(&fonts());
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="63" viewBox="0 0 120 63"><rect width="120" height="63" fill="#1e1e1e"/></svg>"##;

        let png = rasterizer.render_png(svg, 120, 63).unwrap();
        let decoded = Pixmap::decode_png(&png).unwrap();

        assert_eq!(decoded.width(), 120);
        assert_eq!(decoded.height(), 63);
        let pixel = decoded.pixel(10, 10).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0x1e, 0x1e, 0x1e));
    }

    fn fixture_fonts() -> FontSet {
        FontSet::new(
            include_bytes!("../tests/fixtures/DejaVuSerif.ttf").to_vec(),
            include_bytes!("../tests/fixtures/DejaVuSerif-Bold.ttf").to_vec(),
        )
    }

    /// Render one white text run on black and count the lit pixels.
    fn ink(rasterizer: &Rasterizer, family: &str, weight: u16) -> usize {
        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="100" viewBox="0 0 400 100" font-family="{family}"><rect width="400" height="100" fill="#000000"/><text x="10" y="60" font-size="36" font-weight="{weight}" fill="#ffffff">Hamburgefonts</text></svg>"##
        );
        let png = rasterizer.render_png(&svg, 400, 100).unwrap();
        let pixmap = Pixmap::decode_png(&png).unwrap();
        pixmap.pixels().iter().filter(|p| p.red() > 0x80).count()
    }

    #[test]
    fn test_fixture_fonts_load_both_faces() {
        assert_eq!(Rasterizer::new(&fixture_fonts()).face_count(), 2);
    }

    #[test]
    fn test_unknown_family_renders_with_supplied_fonts() {
        let rasterizer = Rasterizer::new(&fixture_fonts());
        assert!(ink(&rasterizer, "Inter, sans-serif", 400) > 500);
    }

    #[test]
    fn test_bold_weight_selects_bold_face() {
        let rasterizer = Rasterizer::new(&fixture_fonts());
        let regular = ink(&rasterizer, "Inter, sans-serif", 400);
        let bold = ink(&rasterizer, "Inter, sans-serif", 700);
        assert!(bold > regular + regular / 10, "regular {regular}, bold {bold}");
    }

    #[test]
    fn test_invalid_fonts_draw_no_text() {
        let rasterizer = Rasterizer::new(&fonts());
        assert_eq!(ink(&rasterizer, "Inter, sans-serif", 400), 0);
    }

    #[test]
    fn test_invalid_font_data_loads_no_faces() {
        assert_eq!(Rasterizer::new(&fonts()).face_count(), 0);
    }

    #[test]
    fn test_invalid_svg_is_error() {
        let rasterizer = Rasterizer::new(&fonts());
        let err = rasterizer.render_png("<not-svg", 10, 10).unwrap_err();
        assert!(matches!(err, OgError::Svg(_)));
    }

    #[test]
    fn test_zero_size_pixmap_is_error() {
        let rasterizer = Rasterizer::new(&fonts());
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;
        let err = rasterizer.render_png(svg, 0, 10).unwrap_err();
        assert!(matches!(err, OgError::Pixmap { .. }));
    }
}
