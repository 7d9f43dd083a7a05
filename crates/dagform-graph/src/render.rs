//! Graph → embeddable image.
//!
//! `GraphRenderer` is the replaceable capability the web layer calls after
//! every mutation. `SpringRenderer` lays the graph out with a spring model and
//! draws an SVG: light-blue labelled nodes, directed edges with arrowheads.
//! Layouts are randomized per call and must not be relied on to be stable.

use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dagform_common::RenderConfig;
use quick_xml::escape::escape;
use serde::{Serialize, Serializer};

use crate::engine::DependencyGraph;
use crate::layout::{spring_layout, LayoutParams, Point};

pub const SVG_MIME: &str = "image/svg+xml";

/// Self-contained image artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    pub fn new(mime: &'static str, bytes: Vec<u8>) -> Self {
        Self { mime, bytes }
    }

    /// `data:<mime>;base64,<payload>` for direct use as an `<img src>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

impl Serialize for RenderedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

pub trait GraphRenderer: Send + Sync {
    fn render(&self, graph: &DependencyGraph) -> RenderedImage;
}

#[derive(Debug, Clone)]
pub struct SpringRenderer {
    width: u32,
    height: u32,
    iterations: u32,
    node_radius: f64,
}

impl Default for SpringRenderer {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl SpringRenderer {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            iterations: config.iterations,
            node_radius: config.node_radius,
        }
    }

    fn layout(&self, graph: &DependencyGraph) -> Vec<Point> {
        let params = LayoutParams {
            width: self.width as f64,
            height: self.height as f64,
            iterations: self.iterations,
            margin: self.node_radius + 4.0,
        };
        let mut rng = rand::thread_rng();
        spring_layout(graph.node_count(), &graph.edge_positions(), &params, &mut rng)
    }

    pub fn render_svg(&self, graph: &DependencyGraph) -> String {
        let positions = self.layout(graph);
        let r = self.node_radius;
        let mut svg = String::with_capacity(1024 + graph.node_count() * 256);

        let _ = write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
            w = self.width,
            h = self.height,
        );
        svg.push_str(
            r##"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="#333333"/></marker></defs>"##,
        );
        svg.push_str(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);

        svg.push_str(r#"<g class="edges">"#);
        for (s, t) in graph.edge_positions() {
            let (Some(a), Some(b)) = (positions.get(s), positions.get(t)) else {
                continue;
            };
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let len = (dx * dx + dy * dy).sqrt();
            // overlapping circles: draw centre to centre
            let (ux, uy) = if len > 2.0 * r { (dx / len, dy / len) } else { (0.0, 0.0) };
            let _ = write!(
                svg,
                r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333333" stroke-width="1.5" marker-end="url(#arrow)"/>"##,
                a.x + ux * r,
                a.y + uy * r,
                b.x - ux * r,
                b.y - uy * r,
            );
        }
        svg.push_str("</g>");

        svg.push_str(r#"<g class="nodes">"#);
        for (name, p) in graph.variables().iter().zip(&positions) {
            let _ = write!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="lightblue"/><text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-size="10" font-weight="bold">{}</text>"#,
                p.x, p.y, r, p.x, p.y, escape(name.as_str()),
            );
        }
        svg.push_str("</g></svg>");
        svg
    }
}

impl GraphRenderer for SpringRenderer {
    fn render(&self, graph: &DependencyGraph) -> RenderedImage {
        RenderedImage::new(SVG_MIME, self.render_svg(graph).into_bytes())
    }
}
