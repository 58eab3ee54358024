//! Layout to SVG markup.

use std::fmt::Write;

use crate::{
    layout::{BoxContent, LayoutBox},
    style::{Color, TextProps},
};

/// Render a laid-out tree as a standalone SVG document.
///
/// `font_family` is emitted on the root so every text run uses the fonts
/// supplied to the rasterizer, with `sans-serif` as the generic fallback.
pub fn render_svg(root: &LayoutBox, width: u32, height: u32, font_family: &str) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{}, sans-serif">"#,
        escape_xml(font_family)
    );
    svg.push('\n');
    write_box(&mut svg, root);
    svg.push_str("</svg>\n");
    svg
}

fn write_box(svg: &mut String, node: &LayoutBox) {
    let rect = node.rect;

    if let Some(background) = node.style.background {
        let radius = node
            .style
            .border_radius
            .min(rect.width / 2.0)
            .min(rect.height / 2.0);
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height)
        );
        if radius > 0.0 {
            let _ = write!(svg, r#" rx="{}""#, num(radius));
        }
        write_fill(svg, background);
        svg.push_str("/>\n");
    }

    if let Some((border, color)) = node.style.border_top {
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(border)
        );
        write_fill(svg, color);
        svg.push_str("/>\n");
    }

    match &node.content {
        BoxContent::Children(children) => {
            for child in children {
                write_box(svg, child);
            }
        }
        BoxContent::Text { lines, props } => write_text(svg, node, lines, props),
    }
}

fn write_text(svg: &mut String, node: &LayoutBox, lines: &[String], props: &TextProps) {
    if lines.is_empty() {
        return;
    }

    let content = node.content_rect();
    let line_px = props.line_px();
    let _ = write!(
        svg,
        r#"<text font-size="{}" font-weight="{}""#,
        num(props.font_size),
        props.font_weight.value()
    );
    write_fill(svg, props.color);
    svg.push('>');

    for (i, line) in lines.iter().enumerate() {
        // Baseline sits a little below the middle of each line box.
        let baseline = content.y + line_px * i as f32 + line_px / 2.0 + props.font_size * 0.35;
        let _ = write!(
            svg,
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            num(content.x),
            num(baseline),
            escape_xml(line)
        );
    }

    svg.push_str("</text>\n");
}

fn write_fill(svg: &mut String, color: Color) {
    let _ = write!(svg, r#" fill="{color}""#);
    if !color.is_opaque() {
        let _ = write!(svg, r#" fill-opacity="{}""#, num(color.alpha));
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
