use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    #[default]
    TopDown,
    LeftRight,
    BottomTop,
    RightLeft,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "td" | "tb" | "top-to-bottom" | "top-down" => Some(Self::TopDown),
            "lr" | "left-to-right" => Some(Self::LeftRight),
            "bt" | "bottom-to-top" => Some(Self::BottomTop),
            "rl" | "right-to-left" => Some(Self::RightLeft),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::TopDown => "TB",
            Self::LeftRight => "LR",
            Self::BottomTop => "BT",
            Self::RightLeft => "RL",
        }
    }

    /// Ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// Ranks advance toward decreasing coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomTop | Self::RightLeft)
    }
}

impl TryFrom<String> for Direction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_token(&value).ok_or_else(|| format!("unknown layout direction `{value}`"))
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        value.as_token().to_string()
    }
}

/// Semantic node type. Determines the glyph the canvas draws and therefore
/// the box the layout reserves for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Task,
    Gateway,
    StartEvent,
    EndEvent,
    IntermediateEvent,
    Api,
    Service,
    Database,
    #[default]
    Default,
}

impl NodeKind {
    /// Unknown tokens fall back to [`NodeKind::Default`].
    pub fn from_token(token: &str) -> Self {
        let normalized: String = token
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "task" => Self::Task,
            "gateway" | "decision" => Self::Gateway,
            "startevent" | "start" => Self::StartEvent,
            "endevent" | "end" => Self::EndEvent,
            "intermediateevent" | "intermediate" => Self::IntermediateEvent,
            "api" => Self::Api,
            "service" => Self::Service,
            "database" | "db" => Self::Database,
            _ => Self::Default,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Gateway => "gateway",
            Self::StartEvent => "start-event",
            Self::EndEvent => "end-event",
            Self::IntermediateEvent => "intermediate-event",
            Self::Api => "api",
            Self::Service => "service",
            Self::Database => "database",
            Self::Default => "default",
        }
    }

    /// Circular glyphs with a fixed diameter.
    pub fn is_event(self) -> bool {
        matches!(
            self,
            Self::StartEvent | Self::EndEvent | Self::IntermediateEvent
        )
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        Self::from_token(&value)
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.as_token().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl DiagramNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            size: None,
            position: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Center of the laid-out box, if the node has both a size and a position.
    pub fn center(&self) -> Option<Point> {
        let size = self.size?;
        let pos = self.position?;
        Some(Point::new(pos.x + size.width / 2.0, pos.y + size.height / 2.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEdge {
    #[serde(alias = "source")]
    pub from: String,
    #[serde(alias = "target")]
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DiagramEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Snapshot of the editable diagram handed to the layout engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub nodes: Vec<DiagramNode>,
    #[serde(default)]
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str, kind: NodeKind, label: &str) -> &mut Self {
        self.nodes.push(DiagramNode::new(id, kind, label));
        self
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> &mut Self {
        self.edges.push(DiagramEdge::new(from, to));
        self
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
