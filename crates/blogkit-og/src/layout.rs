//! Layout tree and box model.
//!
//! Layout runs in two passes. The measure pass walks the tree top-down with
//! the width available to each node, wraps text, and computes every node's
//! size bottom-up. The place pass then assigns absolute rectangles,
//! distributing free main-axis space according to [`Justify`] and placing
//! children on the cross axis according to [`Align`].

use crate::{
    measure::{TextMeasure, wrap_text},
    style::{Align, Edges, FlexDirection, Justify, Style, TextProps},
};

/// A node of the declarative layout tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A flex container.
    Element { style: Style, children: Vec<Node> },
    /// A run of text, wrapped to the available width.
    Text { style: Style, content: String },
}

impl Node {
    /// An empty container.
    pub fn element(style: Style) -> Self {
        Self::Element {
            style,
            children: Vec::new(),
        }
    }

    /// A text leaf.
    pub fn text(style: Style, content: impl Into<String>) -> Self {
        Self::Text {
            style,
            content: content.into(),
        }
    }

    /// Append a child. Text nodes cannot have children; the call is a no-op on them.
    #[must_use]
    pub fn child(mut self, node: Node) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children(self, nodes: impl IntoIterator<Item = Node>) -> Self {
        nodes.into_iter().fold(self, Self::child)
    }

    pub fn style(&self) -> &Style {
        match self {
            Self::Element { style, .. } | Self::Text { style, .. } => style,
        }
    }

    /// Lay out this node as the root of a `width` × `height` canvas.
    pub fn layout(&self, measure: &dyn TextMeasure, width: f32, height: f32) -> LayoutBox {
        let measured = measure_node(self, width, TextProps::default(), measure);
        place(measured, 0.0, 0.0, width, height)
    }
}

/// An absolute rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A laid-out node.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub rect: Rect,
    pub style: Style,
    pub content: BoxContent,
}

/// What a laid-out node contains.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxContent {
    Children(Vec<LayoutBox>),
    Text { lines: Vec<String>, props: TextProps },
}

impl LayoutBox {
    /// Child boxes; empty for text.
    pub fn children(&self) -> &[LayoutBox] {
        match &self.content {
            BoxContent::Children(children) => children,
            BoxContent::Text { .. } => &[],
        }
    }

    /// This box and all its descendants, depth first.
    pub fn descendants(&self) -> Vec<&LayoutBox> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }

    /// Lines of text, if this is a text box.
    pub fn lines(&self) -> Option<&[String]> {
        match &self.content {
            BoxContent::Text { lines, .. } => Some(lines),
            BoxContent::Children(_) => None,
        }
    }

    /// Inner content area after padding and border.
    pub fn content_rect(&self) -> Rect {
        inner_rect(self.rect, &insets(&self.style))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Size {
    width: f32,
    height: f32,
}

impl Size {
    fn main(&self, direction: FlexDirection) -> f32 {
        match direction {
            FlexDirection::Row => self.width,
            FlexDirection::Column => self.height,
        }
    }

    fn cross(&self, direction: FlexDirection) -> f32 {
        match direction {
            FlexDirection::Row => self.height,
            FlexDirection::Column => self.width,
        }
    }
}

struct Measured<'a> {
    node: &'a Node,
    props: TextProps,
    size: Size,
    lines: Vec<String>,
    children: Vec<Measured<'a>>,
}

/// Padding plus the top border.
fn insets(style: &Style) -> Edges {
    let mut edges = style.padding;
    if let Some((width, _)) = style.border_top {
        edges.top += width;
    }
    edges
}

fn inner_rect(rect: Rect, insets: &Edges) -> Rect {
    Rect {
        x: rect.x + insets.left,
        y: rect.y + insets.top,
        width: (rect.width - insets.horizontal()).max(0.0),
        height: (rect.height - insets.vertical()).max(0.0),
    }
}

fn measure_node<'a>(
    node: &'a Node,
    available: f32,
    inherited: TextProps,
    measure: &dyn TextMeasure,
) -> Measured<'a> {
    let style = node.style();
    let props = inherited.inherit(style);
    let insets = insets(style);
    let max_width = style.max_width.unwrap_or(f32::INFINITY);
    let outer_limit = style.width.unwrap_or(available).min(max_width);
    let inner_limit = (outer_limit - insets.horizontal()).max(0.0);

    match node {
        Node::Text { content, .. } => {
            let lines = wrap_text(
                measure,
                content,
                props.font_size,
                props.font_weight,
                inner_limit,
            );
            let text_width = lines
                .iter()
                .map(|line| measure.width(line, props.font_size, props.font_weight))
                .fold(0.0_f32, f32::max)
                .min(inner_limit);
            let text_height = lines.len() as f32 * props.line_px();

            Measured {
                node,
                props,
                size: Size {
                    width: style.width.unwrap_or(text_width + insets.horizontal()),
                    height: style.height.unwrap_or(text_height + insets.vertical()),
                },
                lines,
                children: Vec::new(),
            }
        }
        Node::Element { children, .. } => {
            let direction = style.direction;
            let mut measured = Vec::with_capacity(children.len());
            let mut remaining = inner_limit;

            for child in children {
                let child_available = match direction {
                    FlexDirection::Column => inner_limit,
                    FlexDirection::Row => remaining,
                };
                let m = measure_node(child, child_available, props, measure);
                if direction == FlexDirection::Row {
                    remaining = (remaining - m.size.width - style.gap).max(0.0);
                }
                measured.push(m);
            }

            let gaps = style.gap * measured.len().saturating_sub(1) as f32;
            let main: f32 = measured.iter().map(|m| m.size.main(direction)).sum::<f32>() + gaps;
            let cross = measured
                .iter()
                .map(|m| m.size.cross(direction))
                .fold(0.0_f32, f32::max);
            let (content_width, content_height) = match direction {
                FlexDirection::Row => (main, cross),
                FlexDirection::Column => (cross, main),
            };

            Measured {
                node,
                props,
                size: Size {
                    width: style
                        .width
                        .unwrap_or(content_width + insets.horizontal())
                        .min(max_width),
                    height: style
                        .height
                        .unwrap_or(content_height + insets.vertical()),
                },
                lines: Vec::new(),
                children: measured,
            }
        }
    }
}

fn place(measured: Measured<'_>, x: f32, y: f32, width: f32, height: f32) -> LayoutBox {
    let style = measured.node.style().clone();
    let rect = Rect {
        x,
        y,
        width,
        height,
    };

    if let Node::Text { .. } = measured.node {
        return LayoutBox {
            rect,
            style,
            content: BoxContent::Text {
                lines: measured.lines,
                props: measured.props,
            },
        };
    }

    let inner = inner_rect(rect, &insets(&style));
    let direction = style.direction;
    let (inner_main, inner_cross) = match direction {
        FlexDirection::Row => (inner.width, inner.height),
        FlexDirection::Column => (inner.height, inner.width),
    };

    let count = measured.children.len();
    let gaps = style.gap * count.saturating_sub(1) as f32;
    let used: f32 = measured
        .children
        .iter()
        .map(|m| m.size.main(direction))
        .sum::<f32>()
        + gaps;
    let free = (inner_main - used).max(0.0);

    let (mut cursor, spacing) = match style.justify {
        Justify::Start => (0.0, 0.0),
        Justify::Center => (free / 2.0, 0.0),
        Justify::End => (free, 0.0),
        Justify::SpaceBetween if count > 1 => (0.0, free / (count - 1) as f32),
        Justify::SpaceBetween => (0.0, 0.0),
    };

    let mut children = Vec::with_capacity(count);
    for child in measured.children {
        let child_style = child.node.style();
        let fixed_cross = match direction {
            FlexDirection::Row => child_style.height,
            FlexDirection::Column => child_style.width,
        };
        let stretches = style.align == Align::Stretch
            && matches!(child.node, Node::Element { .. })
            && fixed_cross.is_none();

        let main_size = child.size.main(direction);
        let cross_size = if stretches {
            let limit = match direction {
                FlexDirection::Row => f32::INFINITY,
                FlexDirection::Column => child_style.max_width.unwrap_or(f32::INFINITY),
            };
            inner_cross.min(limit)
        } else {
            child.size.cross(direction)
        };
        let cross_offset = match style.align {
            Align::Stretch | Align::Start => 0.0,
            Align::Center => (inner_cross - cross_size) / 2.0,
            Align::End => inner_cross - cross_size,
        };

        let placed = match direction {
            FlexDirection::Row => place(
                child,
                inner.x + cursor,
                inner.y + cross_offset,
                main_size,
                cross_size,
            ),
            FlexDirection::Column => place(
                child,
                inner.x + cross_offset,
                inner.y + cursor,
                cross_size,
                main_size,
            ),
        };
        children.push(placed);
        cursor += main_size + style.gap + spacing;
    }

    LayoutBox {
        rect,
        style,
        content: BoxContent::Children(children),
    }
}
