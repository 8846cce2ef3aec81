//! Layout Engine — the single entry point for generating a forest.
//!
//! `generate` runs the three passes in order: placement, jitter, assembly.
//! A run owns its canvas and marker list; nothing survives between calls, so
//! one engine can serve any number of threads.
//!
//! Generation is CPU-bound. Async callers must run it inside
//! `tokio::task::spawn_blocking`.

use serde::Serialize;
use tracing::{debug, warn};

use crate::forest::assembly::{assemble, ForestLayout};
use crate::forest::canvas::CanvasState;
use crate::forest::jitter::jitter;
use crate::forest::placement::{place_all, Marker, PlacementStats};
use crate::forest::tuning::{ForestConfig, ForestConfigError};
use crate::models::creator::Creator;

/// Everything one run produced, including the internal markers.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    pub layout: ForestLayout,
    /// Final internal markers, in processing order (same order as `layout.markers`).
    pub markers: Vec<Marker>,
    pub canvas: CanvasState,
    pub stats: PlacementStats,
    pub jittered: usize,
}

/// Counters for one run, served by the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub creators: usize,
    pub attempts: u64,
    pub relaxations: u32,
    pub expansions: u32,
    pub best_effort: u32,
    pub jittered: usize,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Loosest spacing factor any marker was accepted with.
    pub min_spacing_factor: f64,
}

impl LayoutReport {
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            creators: self.markers.len(),
            attempts: self.stats.total_attempts,
            relaxations: self.stats.relaxations,
            expansions: self.canvas.expansions,
            best_effort: self.stats.best_effort,
            jittered: self.jittered,
            canvas_width: self.canvas.width,
            canvas_height: self.layout.container_height,
            min_spacing_factor: self
                .markers
                .iter()
                .map(|m| m.spacing_factor)
                .fold(1.0, f64::min),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: ForestConfig,
}

impl LayoutEngine {
    /// Builds an engine after validating `config`.
    pub fn new(config: ForestConfig) -> Result<Self, ForestConfigError> {
        config.validate()?;
        Ok(LayoutEngine { config })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Generates the public layout for `creators`.
    pub fn generate(&self, creators: &[Creator]) -> ForestLayout {
        self.generate_report(creators).layout
    }

    /// Generates a layout and keeps the internal markers and counters.
    pub fn generate_report(&self, creators: &[Creator]) -> LayoutReport {
        let config = &self.config;
        let mut canvas = CanvasState::estimate_initial_size(creators.len(), config);

        let (mut markers, stats) = place_all(creators, &mut canvas, config);
        let jittered = jitter(&mut markers, &canvas, config);
        let layout = assemble(&markers, &canvas, config);

        debug!(
            creators = creators.len(),
            attempts = stats.total_attempts,
            relaxations = stats.relaxations,
            expansions = canvas.expansions,
            jittered,
            width = canvas.width,
            height = layout.container_height,
            "Forest layout generated"
        );
        if stats.best_effort > 0 {
            let sample: Vec<&str> = markers
                .iter()
                .filter(|m| m.best_effort)
                .map(|m| m.creator.id.as_str())
                .take(10)
                .collect();
            warn!(
                best_effort = stats.best_effort,
                creators = creators.len(),
                capped = canvas.is_capped(),
                ?sample,
                "Forest layout: attempt budget exhausted, markers may overlap"
            );
        }

        LayoutReport {
            layout,
            markers,
            canvas,
            stats,
            jittered,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
