//! Tuning parameters for the forest layout.
//!
//! Every constant the generator depends on lives in [`ForestConfig`], so that
//! different densities can be exercised without touching the algorithm.
//! Distances are in CSS pixels of the rendered canvas.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum ForestConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must lie in {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("image palette must contain at least one variant")]
    EmptyPalette,
}

// ────────────────────────────────────────────────────────────────────────────
// Config
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters for a forest of creator markers.
///
/// A marker is a tree image scaled by a per-item factor with a fixed-height
/// label underneath: `width = tree_width * scale`,
/// `total_height = tree_height * scale + label_height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub tree_width: f64,
    pub tree_height: f64,
    pub label_height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Rotation is drawn from `-max_rotation_degrees..max_rotation_degrees`.
    pub max_rotation_degrees: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    /// Extra clearance drawn per item from `base..2 * base`.
    pub base_separation: f64,

    /// Canvas coordinates are multiplied by this before sampling noise.
    pub noise_scale: f64,
    pub min_density: f64,
    pub max_density: f64,

    /// Candidate draws per marker before the best-effort fallback.
    pub max_attempts: u32,
    pub relax_every: u32,
    pub relax_step: f64,
    pub min_spacing_factor: f64,

    pub expand_every: u32,
    pub expansion_factor: f64,
    /// Total expansions allowed in one generation run.
    pub max_canvas_expansions: u32,
    pub min_canvas_width: f64,
    pub min_canvas_height: f64,

    pub jitter_radius: f64,
    pub jitter_attempts: u32,
    /// Applied to the required distance during jitter; below 1 lets markers
    /// cluster slightly tighter than placement allowed.
    pub jitter_tightening: f64,

    /// Asset keys handed to the renderer, indexed by the drawn variant.
    pub image_variants: Vec<String>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig {
            tree_width: 96.0,
            tree_height: 120.0,
            label_height: 24.0,
            min_scale: 0.85,
            max_scale: 1.15,
            max_rotation_degrees: 3.0,
            margin_x: 48.0,
            margin_y: 48.0,
            base_separation: 10.0,
            noise_scale: 0.0035,
            min_density: 0.8,
            max_density: 1.0,
            max_attempts: 2000,
            relax_every: 160,
            relax_step: 0.05,
            min_spacing_factor: 0.4,
            expand_every: 280,
            expansion_factor: 1.04,
            max_canvas_expansions: 64,
            min_canvas_width: 1200.0,
            min_canvas_height: 900.0,
            jitter_radius: 14.0,
            jitter_attempts: 16,
            jitter_tightening: 0.95,
            image_variants: [
                "tree-oak",
                "tree-pine",
                "tree-birch",
                "tree-maple",
                "tree-willow",
                "tree-cypress",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl ForestConfig {
    /// Width and total height of a marker drawn at `scale`.
    pub fn visual_size(&self, scale: f64) -> (f64, f64) {
        (
            self.tree_width * scale,
            self.tree_height * scale + self.label_height,
        )
    }

    /// Rejects parameter sets the generator cannot honor.
    pub fn validate(&self) -> Result<(), ForestConfigError> {
        positive("tree_width", self.tree_width)?;
        positive("tree_height", self.tree_height)?;
        non_negative("label_height", self.label_height)?;
        positive("min_scale", self.min_scale)?;
        ordered("scale", self.min_scale, self.max_scale)?;
        non_negative("max_rotation_degrees", self.max_rotation_degrees)?;
        non_negative("margin_x", self.margin_x)?;
        non_negative("margin_y", self.margin_y)?;
        non_negative("base_separation", self.base_separation)?;
        positive("noise_scale", self.noise_scale)?;
        positive("min_density", self.min_density)?;
        ordered("density", self.min_density, self.max_density)?;
        within("max_density", self.max_density, 0.0, 1.0)?;
        count("max_attempts", self.max_attempts)?;
        count("relax_every", self.relax_every)?;
        count("expand_every", self.expand_every)?;
        non_negative("relax_step", self.relax_step)?;
        within("min_spacing_factor", self.min_spacing_factor, 0.0, 1.0)?;
        positive("min_spacing_factor", self.min_spacing_factor)?;
        if !(self.expansion_factor > 1.0 && self.expansion_factor.is_finite()) {
            return Err(ForestConfigError::OutOfRange {
                field: "expansion_factor",
                value: self.expansion_factor,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        positive("min_canvas_width", self.min_canvas_width)?;
        positive("min_canvas_height", self.min_canvas_height)?;
        non_negative("jitter_radius", self.jitter_radius)?;
        within("jitter_tightening", self.jitter_tightening, 0.0, 1.0)?;
        if self.image_variants.is_empty() {
            return Err(ForestConfigError::EmptyPalette);
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ForestConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ForestConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ForestConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ForestConfigError::Negative { field, value })
    }
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), ForestConfigError> {
    if min <= max && min.is_finite() && max.is_finite() {
        Ok(())
    } else {
        Err(ForestConfigError::InvertedRange { field, min, max })
    }
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ForestConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ForestConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn count(field: &'static str, value: u32) -> Result<(), ForestConfigError> {
    if value == 0 {
        Err(ForestConfigError::ZeroCount { field })
    } else {
        Ok(())
    }
}
