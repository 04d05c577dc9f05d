//! Core type definitions for architecture diagrams
//!
//! This module contains the fundamental types used throughout archdiagram:
//! handles, icons, edge styles, layout direction and node/edge/cluster data.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Handle to a node declared in a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Handle to a cluster declared in a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub(crate) usize);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Graphviz only draws subgraphs whose name starts with "cluster"
        write!(f, "cluster_{}", self.0)
    }
}

impl Serialize for ClusterId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Flow direction for the diagram layout (Graphviz `rankdir`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub enum Direction {
    /// Top to bottom (TB)
    TopBottom,
    /// Bottom to top (BT)
    BottomTop,
    /// Left to right (LR)
    #[default]
    LeftRight,
    /// Right to left (RL)
    RightLeft,
}

impl Direction {
    /// Parse direction from its two-letter form (TB, BT, LR, RL)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TB" | "TD" => Some(Direction::TopBottom),
            "BT" => Some(Direction::BottomTop),
            "LR" => Some(Direction::LeftRight),
            "RL" => Some(Direction::RightLeft),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopBottom => write!(f, "TB"),
            Direction::BottomTop => write!(f, "BT"),
            Direction::LeftRight => write!(f, "LR"),
            Direction::RightLeft => write!(f, "RL"),
        }
    }
}

/// Edge routing style (Graphviz `splines`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub enum EdgeRouting {
    /// Axis-aligned segments
    #[default]
    Ortho,
    /// Smooth splines around nodes
    Spline,
    /// Polylines around nodes
    Polyline,
    /// Curved arcs
    Curved,
    /// Straight lines
    Line,
}

impl EdgeRouting {
    /// Parse a Graphviz `splines` value
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ortho" => Some(EdgeRouting::Ortho),
            "spline" | "true" => Some(EdgeRouting::Spline),
            "polyline" => Some(EdgeRouting::Polyline),
            "curved" => Some(EdgeRouting::Curved),
            "line" | "false" => Some(EdgeRouting::Line),
            _ => None,
        }
    }
}

impl fmt::Display for EdgeRouting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeRouting::Ortho => write!(f, "ortho"),
            EdgeRouting::Spline => write!(f, "spline"),
            EdgeRouting::Polyline => write!(f, "polyline"),
            EdgeRouting::Curved => write!(f, "curved"),
            EdgeRouting::Line => write!(f, "line"),
        }
    }
}

/// Line style of an edge
///
/// Styles separate relationship categories in the picture: data flow is
/// solid, control signaling dashed, annotations dotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Bold,
}

impl EdgeStyle {
    /// Returns true for the default solid line
    pub fn is_solid(&self) -> bool {
        matches!(self, EdgeStyle::Solid)
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeStyle::Solid => write!(f, "solid"),
            EdgeStyle::Dashed => write!(f, "dashed"),
            EdgeStyle::Dotted => write!(f, "dotted"),
            EdgeStyle::Bold => write!(f, "bold"),
        }
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    /// Graphviz source, written without invoking the layout engine
    Dot,
}

impl OutputFormat {
    /// File extension and Graphviz `-T` argument for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
        }
    }

    /// Returns true if producing this format requires the layout engine
    pub fn needs_engine(&self) -> bool {
        !matches!(self, OutputFormat::Dot)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Icons bundled with the library
///
/// No raster assets ship with the crate; each built-in icon is drawn as a
/// Graphviz shape filled with its provider color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BuiltinIcon {
    AwsS3,
    AwsIam,
    AwsCloudwatch,
    Airflow,
    Spark,
    Python,
}

impl BuiltinIcon {
    /// Every icon in the catalog
    pub fn all() -> &'static [BuiltinIcon] {
        &[
            BuiltinIcon::AwsS3,
            BuiltinIcon::AwsIam,
            BuiltinIcon::AwsCloudwatch,
            BuiltinIcon::Airflow,
            BuiltinIcon::Spark,
            BuiltinIcon::Python,
        ]
    }

    /// Provider the icon belongs to
    pub fn provider(&self) -> &'static str {
        match self {
            BuiltinIcon::AwsS3 | BuiltinIcon::AwsIam | BuiltinIcon::AwsCloudwatch => "aws",
            BuiltinIcon::Airflow | BuiltinIcon::Spark => "onprem",
            BuiltinIcon::Python => "programming",
        }
    }

    /// Category within the provider
    pub fn category(&self) -> &'static str {
        match self {
            BuiltinIcon::AwsS3 => "storage",
            BuiltinIcon::AwsIam => "security",
            BuiltinIcon::AwsCloudwatch => "management",
            BuiltinIcon::Airflow => "workflow",
            BuiltinIcon::Spark => "analytics",
            BuiltinIcon::Python => "language",
        }
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinIcon::AwsS3 => "s3",
            BuiltinIcon::AwsIam => "iam",
            BuiltinIcon::AwsCloudwatch => "cloudwatch",
            BuiltinIcon::Airflow => "airflow",
            BuiltinIcon::Spark => "spark",
            BuiltinIcon::Python => "python",
        }
    }

    /// Graphviz shape used to draw the icon
    pub fn shape(&self) -> &'static str {
        match self {
            BuiltinIcon::AwsS3 => "cylinder",
            BuiltinIcon::AwsIam => "house",
            BuiltinIcon::AwsCloudwatch => "tab",
            BuiltinIcon::Airflow => "component",
            BuiltinIcon::Spark => "hexagon",
            BuiltinIcon::Python => "box",
        }
    }

    /// Fill color used to draw the icon
    pub fn fill_color(&self) -> &'static str {
        match self {
            BuiltinIcon::AwsS3 => "#7AA116",
            BuiltinIcon::AwsIam => "#DD344C",
            BuiltinIcon::AwsCloudwatch => "#E7157B",
            BuiltinIcon::Airflow => "#017CEE",
            BuiltinIcon::Spark => "#E25A1C",
            BuiltinIcon::Python => "#FFD43B",
        }
    }
}

impl fmt::Display for BuiltinIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.provider(), self.category(), self.name())
    }
}

/// Icon reference of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Icon {
    /// An icon from the bundled catalog
    Builtin(BuiltinIcon),
    /// A path to an image asset on disk
    Custom(PathBuf),
}

impl Icon {
    /// Create a custom icon from a path
    pub fn custom(path: impl Into<PathBuf>) -> Self {
        Icon::Custom(path.into())
    }

    /// Path of the image asset, if this is a custom icon
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Icon::Custom(path) => Some(path),
            Icon::Builtin(_) => None,
        }
    }
}

impl From<BuiltinIcon> for Icon {
    fn from(icon: BuiltinIcon) -> Self {
        Icon::Builtin(icon)
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Icon::Builtin(icon) => write!(f, "{}", icon),
            Icon::Custom(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Ordered set of Graphviz attributes
///
/// Setting a key that already exists replaces its value in place, so the
/// emitted order stays the order in which keys were first declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style variant of [`Attributes::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Apply every entry of `other` on top of this set
    pub fn merge(&mut self, other: &Attributes) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A node in the diagram with all its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    /// Unique identifier for the node
    pub id: NodeId,
    /// Display label, may contain line breaks
    pub label: String,
    /// Icon drawn for the node
    pub icon: Icon,
    /// Innermost cluster containing the node
    pub cluster: Option<ClusterId>,
}

/// A cluster grouping nodes and sub-clusters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterData {
    /// Unique identifier for the cluster
    pub id: ClusterId,
    /// Title drawn on the cluster border
    pub label: String,
    /// Enclosing cluster, `None` at top level
    pub parent: Option<ClusterId>,
    /// Nesting depth, 0 at top level
    pub depth: usize,
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeData {
    /// Source node
    pub from: NodeId,
    /// Target node
    pub to: NodeId,
    /// Optional label on the edge
    pub label: Option<String>,
    /// Line style
    pub style: EdgeStyle,
    /// Optional line color overriding the diagram default
    pub color: Option<String>,
}

/// Edge description passed to the builder
///
/// ```rust
/// use archdiagram::{Edge, EdgeStyle};
///
/// let trigger = Edge::labeled("trigger").style(EdgeStyle::Dashed);
/// assert_eq!(trigger.label.as_deref(), Some("trigger"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edge {
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub color: Option<String>,
}

impl Edge {
    /// Create an unlabeled solid edge
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solid edge with a label
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
