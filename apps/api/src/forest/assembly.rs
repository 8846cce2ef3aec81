//! Result Assembly — projects placed markers into what the renderer consumes.

use serde::{Deserialize, Serialize};

use crate::forest::canvas::CanvasState;
use crate::forest::placement::Marker;
use crate::forest::tuning::ForestConfig;
use crate::models::creator::Creator;

/// One renderable marker, anchored at its bottom-center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMarker {
    pub creator: Creator,
    /// Y of the anchor (bottom edge of the label).
    pub top: f64,
    /// X of the anchor (horizontal center).
    pub left: f64,
    pub scale: f64,
    /// Degrees, positive is clockwise.
    pub rotation: f64,
    pub image: String,
    pub width: f64,
    pub total_height: f64,
}

/// A complete forest layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestLayout {
    pub markers: Vec<PublicMarker>,
    pub container_width: f64,
    pub container_height: f64,
}

/// Drops collision-only fields and derives the anchor coordinates.
pub fn assemble(markers: &[Marker], canvas: &CanvasState, config: &ForestConfig) -> ForestLayout {
    let public: Vec<PublicMarker> = markers.iter().map(|m| to_public(m, config)).collect();

    let container_height = public
        .iter()
        .map(|m| m.top + config.margin_y)
        .fold(canvas.height, f64::max);

    ForestLayout {
        markers: public,
        container_width: canvas.width,
        container_height,
    }
}

fn to_public(marker: &Marker, config: &ForestConfig) -> PublicMarker {
    PublicMarker {
        creator: marker.creator.clone(),
        top: marker.center_y + marker.visual_height / 2.0,
        left: marker.center_x,
        scale: marker.scale,
        rotation: marker.rotation_degrees,
        image: config
            .image_variants
            .get(marker.image_variant)
            .cloned()
            .unwrap_or_default(),
        width: marker.visual_width,
        total_height: marker.visual_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_marker(id: &str, x: f64, y: f64) -> Marker {
        Marker {
            creator: Creator::new(id, format!("Name of {id}")),
            center_x: x,
            center_y: y,
            collision_radius: 90.0,
            local_density_multiplier: 0.9,
            visual_width: 96.0,
            visual_height: 144.0,
            scale: 1.0,
            rotation_degrees: -1.5,
            image_variant: 2,
            spacing_factor: 1.0,
            best_effort: false,
        }
    }

    #[test]
    fn test_anchor_is_bottom_center() {
        let config = ForestConfig::default();
        let canvas = CanvasState::estimate_initial_size(1, &config);
        let layout = assemble(&[make_marker("a", 300.0, 200.0)], &canvas, &config);
        let m = &layout.markers[0];
        assert_eq!(m.left, 300.0);
        assert_eq!(m.top, 272.0);
        assert_eq!(m.image, "tree-birch");
        assert_eq!(m.rotation, -1.5);
        assert_eq!(m.total_height, 144.0);
    }

    #[test]
    fn test_container_height_never_below_canvas() {
        let config = ForestConfig::default();
        let canvas = CanvasState::estimate_initial_size(0, &config);
        let layout = assemble(&[], &canvas, &config);
        assert!(layout.markers.is_empty());
        assert_eq!(layout.container_height, 900.0);
        assert_eq!(layout.container_width, 1200.0);
    }

    #[test]
    fn test_container_height_covers_lowest_marker() {
        let config = ForestConfig::default();
        let canvas = CanvasState::estimate_initial_size(1, &config);
        // Deliberately outside the canvas to exercise the max().
        let layout = assemble(&[make_marker("deep", 300.0, 1000.0)], &canvas, &config);
        assert_eq!(layout.container_height, 1000.0 + 72.0 + config.margin_y);
    }

    #[test]
    fn test_serializes_camel_case_without_collision_fields() {
        let config = ForestConfig::default();
        let canvas = CanvasState::estimate_initial_size(1, &config);
        let layout = assemble(&[make_marker("a", 300.0, 200.0)], &canvas, &config);
        let json = serde_json::to_value(&layout).unwrap();
        assert!(json.get("containerHeight").is_some());
        let marker = &json["markers"][0];
        assert!(marker.get("totalHeight").is_some());
        assert!(marker.get("collisionRadius").is_none());
        assert!(marker.get("localDensityMultiplier").is_none());
        assert_eq!(marker["creator"]["id"], "a");
    }
}
