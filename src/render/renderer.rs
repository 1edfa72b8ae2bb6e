//! Draw pass and hit-testing over a settled layout.

use crate::config::LayoutConfig;
use crate::graph::{Graph, LinkKind, Node, NodeKind};
use crate::render::{Color, DrawBackend, LayoutEngine};

/// Base label font size in surface pixels at zoom 1.0.
const LABEL_FONT_SIZE: f32 = 12.0;

/// Fixed padding around a label, scaled inversely with zoom like the font.
const LABEL_PADDING: f32 = 4.0;

/// Minimum clickable radius around a node center, in surface pixels.
const HIT_RADIUS: f32 = 12.0;

/// Display theme: background, link stroke and node fills.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    /// Stroke color for section links; the active theme decides it.
    pub link: Color,
    /// Related links render dimmer than structural ones.
    pub link_related: Color,
    pub node_main: Color,
    pub node_section: Color,
    pub node_topic: Color,
    pub label_background: Color,
    pub label_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x1a, 0x1a, 0x2e),
            link: Color::rgba(100, 180, 255, 200),
            link_related: Color::rgba(100, 180, 255, 110),
            node_main: Color::rgb(0xff, 0x7f, 0x0e),
            node_section: Color::rgb(0x1f, 0x77, 0xb4),
            node_topic: Color::rgb(0x2c, 0xa0, 0x2c),
            label_background: Color::rgba(0, 0, 0, 160),
            label_text: Color::rgb(0xff, 0xff, 0xff),
        }
    }
}

/// Click event emitted when a pointer press hits a node circle. The
/// controller decides what, if anything, happens next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeClick {
    pub node_id: String,
    pub kind: NodeKind,
}

/// Draws one graph on any [`DrawBackend`] and hit-tests pointer clicks.
///
/// A renderer is built per graph, mirroring the graph's replace-not-merge
/// lifecycle: selecting a new topic builds a fresh renderer.
pub struct GraphRenderer {
    graph: Graph,
    layout: LayoutEngine,
    zoom: f32,
}

impl GraphRenderer {
    /// Lay out `graph` and run the simulation to stability.
    pub fn new(graph: Graph, config: &LayoutConfig) -> Self {
        let mut layout = LayoutEngine::new(&graph, config);
        layout.run_to_stability(|| log::debug!("Layout stabilized"));
        Self {
            graph,
            layout,
            zoom: 1.0,
        }
    }

    /// Current zoom factor. Markers, labels and padding scale inversely with
    /// it so they keep a constant on-screen size.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(0.1);
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Draw the full graph: links first, then per-node label background,
    /// circular marker and centered label text.
    pub fn render(&self, backend: &mut impl DrawBackend, theme: &Theme) {
        backend.clear(theme.background);

        for link in &self.graph.links {
            let (Some((x1, y1)), Some((x2, y2))) = (
                self.layout.position_of(&link.source_id),
                self.layout.position_of(&link.target_id),
            ) else {
                continue;
            };
            let color = match link.kind {
                LinkKind::Section => theme.link,
                LinkKind::Related => theme.link_related,
            };
            backend.stroke_line(x1, y1, x2, y2, link.weight.max(1.0) / self.zoom, color);
        }

        for node in &self.graph.nodes {
            let Some((x, y)) = self.layout.position_of(&node.id) else {
                continue;
            };
            self.draw_node(node, x, y, backend, theme);
        }
    }

    /// Draw a single node: rounded label background sized from the font
    /// metrics plus fixed padding, circular marker, then the label text.
    fn draw_node(&self, node: &Node, x: f32, y: f32, backend: &mut impl DrawBackend, theme: &Theme) {
        let font_size = LABEL_FONT_SIZE / self.zoom;
        let padding = LABEL_PADDING / self.zoom;
        let radius = self.marker_radius(node);

        let metrics = backend.measure_text(&node.label, font_size);
        let (bg_w, bg_h) = (metrics.width + padding * 2.0, metrics.height + padding * 2.0);
        // Label box hangs centered below the marker.
        let (bg_x, bg_y) = (x - bg_w / 2.0, y + radius + padding);

        backend.fill_round_rect(bg_x, bg_y, bg_w, bg_h, padding, theme.label_background);

        let fill = match node.kind {
            NodeKind::Main => theme.node_main,
            NodeKind::Section => theme.node_section,
            NodeKind::Topic => theme.node_topic,
        };
        backend.fill_circle(x, y, radius, fill);

        backend.draw_text(
            bg_x + padding,
            bg_y + padding,
            &node.label,
            font_size,
            theme.label_text,
        );
    }

    /// Marker radius in surface pixels: node weight scaled inversely with
    /// zoom.
    fn marker_radius(&self, node: &Node) -> f32 {
        node.weight / self.zoom
    }

    /// Hit-test a pointer position against the node circles. Returns the
    /// topmost hit as a plain event for the controller; never navigates.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<NodeClick> {
        let mut hit = None;
        for node in &self.graph.nodes {
            let Some((x, y)) = self.layout.position_of(&node.id) else {
                continue;
            };
            let reach = self.marker_radius(node).max(HIT_RADIUS / self.zoom);
            let (dx, dy) = (px - x, py - y);
            if (dx * dx + dy * dy).sqrt() <= reach {
                hit = Some(NodeClick {
                    node_id: node.id.clone(),
                    kind: node.kind,
                });
            }
        }
        hit
    }
}
