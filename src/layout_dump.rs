use crate::layout::{Layout, LayoutDiagnostics};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub direction: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub diagnostics: LayoutDiagnostics,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub rank: usize,
    pub order: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| {
                let slot = layout.ranks.get(&node.id);
                let position = node.position.unwrap_or(crate::ir::Point::new(0.0, 0.0));
                let size = node.size.unwrap_or(crate::ir::Size::new(0.0, 0.0));
                NodeDump {
                    id: node.id.clone(),
                    kind: node.kind.as_token().to_string(),
                    label: node.label.clone(),
                    rank: slot.map(|slot| slot.rank).unwrap_or(0),
                    order: slot.map(|slot| slot.order).unwrap_or(0),
                    x: position.x,
                    y: position.y,
                    width: size.width,
                    height: size.height,
                }
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
                label: edge.label.clone(),
                points: layout
                    .route(idx)
                    .map(|route| route.points.iter().map(|p| [p.x, p.y]).collect())
                    .unwrap_or_default(),
            })
            .collect();

        LayoutDump {
            direction: layout.direction.as_token().to_string(),
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
            diagnostics: layout.diagnostics.clone(),
        }
    }

    /// One tab-separated line per node: id, rank, order, x, y, width, height.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                node.id, node.rank, node.order, node.x, node.y, node.width, node.height
            ));
        }
        out
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
