//! Font-backed label measurement.
//!
//! Replaces the 8-units-per-character estimate with real advance widths from
//! a system font. The wrap model stays the same as the heuristic: a label is
//! one line per `wrap_width` units of measured text.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::OnceCell;
use ttf_parser::Face;

use crate::ir::{DiagramNode, Size};
use crate::size::{
    BOX_PADDING_X, CHAR_WIDTH, CHARS_PER_LINE, MIN_BOX_WIDTH, SizeEstimator, box_size,
    estimate_size, fixed_glyph_size,
};

#[derive(Debug)]
pub struct FontMetricsSizer {
    pub font_family: String,
    pub font_size: f32,
    pub wrap_width: f32,
    face: OnceCell<Option<FontFace>>,
}

impl FontMetricsSizer {
    pub fn new(font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            wrap_width: CHARS_PER_LINE as f32 * CHAR_WIDTH,
            face: OnceCell::new(),
        }
    }

    pub fn with_wrap_width(mut self, wrap_width: f32) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    /// Measured advance width of `text`, or `None` when no font resolved.
    pub fn measure_text_width(&self, text: &str) -> Option<f32> {
        if text.is_empty() || self.font_size <= 0.0 {
            return Some(0.0);
        }
        let face = self
            .face
            .get_or_init(|| load_face(&self.font_family))
            .as_ref()?;
        Some(face.measure_width(text, self.font_size))
    }
}

impl Default for FontMetricsSizer {
    fn default() -> Self {
        Self::new("sans-serif", 14.0)
    }
}

impl SizeEstimator for FontMetricsSizer {
    fn estimate(&self, node: &DiagramNode) -> Size {
        if let Some(size) = fixed_glyph_size(node.kind) {
            return size;
        }
        let Some(text_width) = self.measure_text_width(&node.label) else {
            return estimate_size(node.kind, &node.label);
        };
        let width = MIN_BOX_WIDTH.max(text_width + BOX_PADDING_X);
        let wrap = self.wrap_width.max(1.0);
        let lines = ((text_width / wrap).ceil() as usize).max(1);
        box_size(width, lines)
    }
}

#[derive(Debug)]
struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;
        let normalized = text.replace('\t', "    ");

        if normalized.is_ascii() {
            return normalized
                .bytes()
                .filter(|byte| *byte != b'\n')
                .map(|byte| match self.ascii_advances[byte as usize] {
                    0 => fallback,
                    advance => advance as f32 * scale,
                })
                .sum();
        }

        let Ok(face) = Face::parse(&self.data, self.index) else {
            return normalized.chars().count() as f32 * fallback;
        };
        normalized
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map_or(fallback, |advance| advance as f32 * scale)
            })
            .sum()
    }
}

fn load_face(font_family: &str) -> Option<FontFace> {
    let names: Vec<String> = font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|part| !part.is_empty())
        .collect();
    let mut families: Vec<Family<'_>> = names
        .iter()
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "serif" => Family::Serif,
            "monospace" | "ui-monospace" => Family::Monospace,
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
            _ => Family::Name(name.as_str()),
        })
        .collect();
    if families.is_empty() {
        families.push(Family::SansSerif);
    }

    let mut db = Database::new();
    db.load_system_fonts();
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let Some(id) = db.query(&query) else {
        log::warn!("no system font matches `{font_family}`, falling back to heuristic sizing");
        return None;
    };
    db.with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
        .flatten()
}
