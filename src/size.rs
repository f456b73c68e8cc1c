//! Bounding-box estimation for diagram nodes.
//!
//! The layout engine only needs a box per node; how that box is derived is
//! pluggable through [`SizeEstimator`]. The default heuristic reserves a fixed
//! glyph for events and gateways and grows task-like boxes with label length.

use crate::ir::{DiagramNode, NodeKind, Size};

pub const EVENT_DIAMETER: f32 = 60.0;
pub const GATEWAY_SIDE: f32 = 80.0;
pub const MIN_BOX_WIDTH: f32 = 180.0;
pub const BOX_BASE_HEIGHT: f32 = 60.0;
pub const BOX_PADDING_X: f32 = 40.0;
pub const CHAR_WIDTH: f32 = 8.0;
pub const CHARS_PER_LINE: usize = 20;
pub const LINE_HEIGHT: f32 = 20.0;

pub trait SizeEstimator {
    fn estimate(&self, node: &DiagramNode) -> Size;
}

/// Character-count heuristic: 8 units per character, a new 20-unit line for
/// every 20 characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSizer;

impl SizeEstimator for HeuristicSizer {
    fn estimate(&self, node: &DiagramNode) -> Size {
        estimate_size(node.kind, &node.label)
    }
}

pub fn estimate_size(kind: NodeKind, label: &str) -> Size {
    if let Some(size) = fixed_glyph_size(kind) {
        return size;
    }
    let chars = label.chars().count();
    let width = MIN_BOX_WIDTH.max(chars as f32 * CHAR_WIDTH + BOX_PADDING_X);
    let lines = chars.div_ceil(CHARS_PER_LINE).max(1);
    box_size(width, lines)
}

/// Events and gateways render as fixed glyphs regardless of their label.
pub fn fixed_glyph_size(kind: NodeKind) -> Option<Size> {
    if kind.is_event() {
        return Some(Size::new(EVENT_DIAMETER, EVENT_DIAMETER));
    }
    if kind == NodeKind::Gateway {
        return Some(Size::new(GATEWAY_SIDE, GATEWAY_SIDE));
    }
    None
}

pub(crate) fn box_size(width: f32, lines: usize) -> Size {
    let extra_lines = lines.saturating_sub(1) as f32;
    Size::new(width, BOX_BASE_HEIGHT + extra_lines * LINE_HEIGHT)
}

/// Caller-supplied sizes win when they are usable; anything else is estimated.
pub fn resolve_size(sizer: &dyn SizeEstimator, node: &DiagramNode) -> Size {
    match node.size {
        Some(size) if size.is_usable() => size,
        _ => sizer.estimate(node),
    }
}
