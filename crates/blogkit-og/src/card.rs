//! The preview card template.
//!
//! A dark 1200×630 card: the post title set large in the upper area, up to
//! three tag chips beneath it, and a footer row with the site name on the
//! left and the author on the right, separated from the body by a hairline.

use blogkit_core::Config;

use crate::{
    layout::Node,
    style::{Align, Color, Edges, FontWeight, Justify, Style},
};

/// Output width in pixels.
pub const OG_WIDTH: u32 = 1200;
/// Output height in pixels.
pub const OG_HEIGHT: u32 = 630;
/// Tags beyond this count are not drawn.
pub const MAX_TAGS: usize = 3;

const BACKGROUND: Color = Color::hex(0x1e1e1e);
const FOREGROUND: Color = Color::hex(0xd4d4d4);
const ACCENT: Color = Color::hex(0x9cdcfe);
const RULE: Color = Color::hex(0x3c3c3c);
const MUTED: Color = Color::hex(0x858585);

const PADDING: f32 = 60.0;
const TITLE_SIZE: f32 = 64.0;
const TITLE_MAX_WIDTH: f32 = 900.0;

/// Site-wide values printed on every card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    pub site_name: String,
    pub author: String,
    pub font_family: String,
}

impl CardTemplate {
    pub fn new(
        site_name: impl Into<String>,
        author: impl Into<String>,
        font_family: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            author: author.into(),
            font_family: font_family.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.site_name(),
            &config.site.author,
            &config.og.font_family,
        )
    }

    /// Build the layout tree for one post.
    pub fn build_tree(&self, title: &str, tags: &[String]) -> Node {
        let mut header = Node::element(Style::new().column().gap(32.0)).child(Node::text(
            Style::new()
                .font_size(TITLE_SIZE)
                .font_weight(FontWeight::Bold)
                .line_height(1.2)
                .color(Color::WHITE)
                .max_width(TITLE_MAX_WIDTH),
            title,
        ));

        if !tags.is_empty() {
            header = header.child(
                Node::element(Style::new().row().gap(12.0).align(Align::Start))
                    .children(tags.iter().take(MAX_TAGS).map(|tag| tag_chip(tag))),
            );
        }

        let footer = Node::element(
            Style::new()
                .row()
                .justify(Justify::SpaceBetween)
                .align(Align::Center)
                .border_top(1.0, RULE)
                .padding(Edges {
                    top: 24.0,
                    ..Edges::default()
                }),
        )
        .child(Node::text(
            Style::new().font_size(28.0).font_weight(FontWeight::Bold),
            &self.site_name,
        ))
        .child(Node::text(
            Style::new().font_size(24.0).color(MUTED),
            &self.author,
        ));

        Node::element(
            Style::new()
                .column()
                .justify(Justify::SpaceBetween)
                .size(OG_WIDTH as f32, OG_HEIGHT as f32)
                .padding(Edges::all(PADDING))
                .background(BACKGROUND)
                .color(FOREGROUND),
        )
        .child(header)
        .child(footer)
    }
}

fn tag_chip(tag: &str) -> Node {
    Node::element(
        Style::new()
            .padding(Edges::symmetric(8.0, 20.0))
            .background(ACCENT.with_alpha(0.15))
            .border_radius(999.0),
    )
    .child(Node::text(
        Style::new().font_size(24.0).color(ACCENT).line_height(1.2),
        tag,
    ))
}
