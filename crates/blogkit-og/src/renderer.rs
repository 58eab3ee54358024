//! End-to-end preview image rendering.

use std::sync::Arc;

use tracing::debug;

use crate::{
    card::{CardTemplate, OG_HEIGHT, OG_WIDTH},
    error::Result,
    font::{FontProvider, FontSet},
    measure::{EstimatedMeasure, FontMeasure, TextMeasure},
    raster::Rasterizer,
    svg::render_svg,
};

/// Renders 1200×630 PNG preview cards.
///
/// Cheap to clone and safe to share across threads; the font database is
/// built once in the constructor.
#[derive(Clone)]
pub struct OgImageRenderer {
    template: CardTemplate,
    rasterizer: Rasterizer,
    measure: Arc<dyn TextMeasure>,
}

impl std::fmt::Debug for OgImageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OgImageRenderer")
            .field("template", &self.template)
            .field("rasterizer", &self.rasterizer)
            .finish_non_exhaustive()
    }
}

impl OgImageRenderer {
    /// Lines are broken with the advances of `fonts`, falling back to
    /// [`EstimatedMeasure`] when they cannot be parsed.
    pub fn new(template: CardTemplate, fonts: &FontSet) -> Self {
        let measure: Arc<dyn TextMeasure> = match FontMeasure::new(fonts) {
            Some(measure) => Arc::new(measure),
            None => {
                debug!("font metrics unavailable, estimating text widths");
                Arc::new(EstimatedMeasure)
            }
        };
        Self {
            template,
            rasterizer: Rasterizer::new(fonts),
            measure,
        }
    }

    /// Resolve fonts from `provider` and build a renderer.
    pub fn from_provider(template: CardTemplate, provider: &dyn FontProvider) -> Result<Self> {
        let fonts = provider.load()?;
        Ok(Self::new(template, &fonts))
    }

    /// Replace the text metrics used for line breaking.
    #[must_use]
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Arc::new(measure);
        self
    }

    pub fn template(&self) -> &CardTemplate {
        &self.template
    }

    /// The card for `title` and `tags` as an SVG document.
    pub fn render_svg(&self, title: &str, tags: &[String]) -> String {
        let tree = self.template.build_tree(title, tags);
        let layout = tree.layout(self.measure.as_ref(), OG_WIDTH as f32, OG_HEIGHT as f32);
        render_svg(&layout, OG_WIDTH, OG_HEIGHT, &self.template.font_family)
    }

    /// The card for `title` and `tags` as PNG bytes.
    pub fn render(&self, title: &str, tags: &[String]) -> Result<Vec<u8>> {
        let svg = self.render_svg(title, tags);
        let png = self.rasterizer.render_png(&svg, OG_WIDTH, OG_HEIGHT)?;
        debug!(title, tags = tags.len(), bytes = png.len(), "rendered preview image");
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use resvg::tiny_skia::Pixmap;

    use super::*;
    use crate::font::{FontError, StaticFontProvider};

    fn renderer() -> OgImageRenderer {
        OgImageRenderer::new(
            CardTemplate::new("example.com", "Jane Doe", "Inter"),
            &FontSet::new(Vec::<u8>::new(), Vec::<u8>::new()),
        )
    }

    fn png_size(png: &[u8]) -> (u32, u32) {
        let pixmap = Pixmap::decode_png(png).unwrap();
        (pixmap.width(), pixmap.height())
    }

    #[test]
    fn test_render_is_always_1200_by_630() {
        let r = renderer();
        let many_tags: Vec<String> = (0..10).map(|i| format!("tag{i}")).collect();
        let long_title = "word ".repeat(200);

        for (title, tags) in [
            ("Hi", Vec::new()),
            (long_title.as_str(), many_tags.clone()),
            ("", many_tags),
        ] {
            let png = r.render(title, &tags).unwrap();
            assert_eq!(png_size(&png), (OG_WIDTH, OG_HEIGHT));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = renderer();
        let tags = vec!["rust".to_string()];
        assert_eq!(r.render("Same", &tags).unwrap(), r.render("Same", &tags).unwrap());
        assert_eq!(r.render_svg("Same", &tags), r.render_svg("Same", &tags));
    }

    #[test]
    fn test_svg_escapes_title_and_limits_tags() {
        let r = renderer();
        let tags: Vec<String> = ["a1", "b2", "c3", "d4"].iter().map(|s| s.to_string()).collect();
        let svg = r.render_svg("Tom & Jerry <3", &tags);

        assert!(svg.contains("Tom &amp; Jerry &lt;3"));
        assert!(svg.contains(">c3<"));
        assert!(!svg.contains(">d4<"));
        assert!(svg.contains(r#"width="1200" height="630""#));
    }

    #[test]
    fn test_from_provider_propagates_font_errors() {
        struct Failing;
        impl FontProvider for Failing {
            fn load(&self) -> std::result::Result<FontSet, FontError> {
                Err(FontError::Empty {
                    url: "https://fonts.test/x.ttf".to_string(),
                })
            }
        }

        let template = CardTemplate::new("s", "a", "Inter");
        assert!(OgImageRenderer::from_provider(template.clone(), &Failing).is_err());

        let provider = StaticFontProvider::new(FontSet::new(Vec::<u8>::new(), Vec::<u8>::new()));
        let r = OgImageRenderer::from_provider(template, &provider).unwrap();
        assert_eq!(r.template().site_name, "s");
    }
}
