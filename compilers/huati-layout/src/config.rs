use serde::Deserialize;

/// Geometry constants for a layout pass. All distances are in pixels.
///
/// Deserializable with every field optional, so a host can override a
/// single value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Vertical distance between consecutive depths.
    pub rank_separation: f64,
    /// Horizontal gap between neighbouring leaves.
    pub leaf_gap: f64,
    pub min_node_width: f64,
    pub max_node_width: f64,
    pub label_char_width: f64,
    pub hanzi_char_width: f64,
    pub pinyin_char_width: f64,
    pub horizontal_padding: f64,
    pub base_node_height: f64,
    pub text_block_height: f64,
    /// Sideways bow of a co-reference arc per pixel of vertical distance.
    pub coref_swing_factor: f64,
    pub coref_min_swing: f64,
    /// Height of the control points above the anchors.
    pub coref_lift: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_separation: 110.0,
            leaf_gap: 24.0,
            min_node_width: 96.0,
            max_node_width: 280.0,
            label_char_width: 7.0,
            hanzi_char_width: 18.0,
            pinyin_char_width: 7.0,
            horizontal_padding: 28.0,
            base_node_height: 44.0,
            text_block_height: 46.0,
            coref_swing_factor: 0.5,
            coref_min_swing: 60.0,
            coref_lift: 40.0,
        }
    }
}
