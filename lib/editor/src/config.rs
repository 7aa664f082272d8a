//! Editor session configuration.

use flowcanvas_workflow::Position;
use serde::Deserialize;

/// Tunables for one editor session.
///
/// Every field has a default, so an empty source deserializes to
/// [`EditorConfig::default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditorConfig {
    /// Maximum number of undo entries kept. The oldest entry is evicted first.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Shift applied to pasted and duplicated nodes.
    #[serde(default = "default_paste_offset")]
    pub paste_offset: Position,

    #[serde(default)]
    pub group: GroupConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Group frame metrics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupConfig {
    /// Space between the member bounding box and the frame.
    #[serde(default = "default_group_padding")]
    pub padding: f64,

    /// Extra room above the members for the group title.
    #[serde(default = "default_title_band")]
    pub title_band: f64,
}

/// Auto-layout spacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// Distance between consecutive layers.
    #[serde(default = "default_layer_spacing")]
    pub layer_spacing: f64,

    /// Distance between nodes within one layer.
    #[serde(default = "default_node_spacing")]
    pub node_spacing: f64,

    /// Where the first layer starts.
    #[serde(default = "default_layout_origin")]
    pub origin: Position,
}

fn default_history_limit() -> usize {
    50
}

fn default_paste_offset() -> Position {
    Position::new(50.0, 50.0)
}

fn default_group_padding() -> f64 {
    40.0
}

fn default_title_band() -> f64 {
    40.0
}

fn default_layer_spacing() -> f64 {
    360.0
}

fn default_node_spacing() -> f64 {
    180.0
}

fn default_layout_origin() -> Position {
    Position::new(100.0, 100.0)
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            paste_offset: default_paste_offset(),
            group: GroupConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            padding: default_group_padding(),
            title_band: default_title_band(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_spacing: default_layer_spacing(),
            node_spacing: default_node_spacing(),
            origin: default_layout_origin(),
        }
    }
}
