#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod size;
#[cfg(feature = "font-metrics")]
pub mod text_metrics;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutOptions, load_config, load_diagram};
pub use error::LoadError;
pub use ir::{Diagram, DiagramEdge, DiagramNode, Direction, NodeKind, Point, Size};
pub use layout::{Layout, LayoutDiagnostics, compute_layout, compute_layout_with};
pub use layout_dump::LayoutDump;
pub use size::{HeuristicSizer, SizeEstimator, estimate_size};
