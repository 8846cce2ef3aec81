//! Canvas sizing: the initial estimate and on-demand growth.

use crate::forest::tuning::ForestConfig;

/// The valid range for a marker center on the current canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl CenterBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(self.min_x, self.max_x), y.clamp(self.min_y, self.max_y))
    }
}

/// Canvas dimensions for one generation run. Only ever grows.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub width: f64,
    pub height: f64,
    pub expansions: u32,
    margin_x: f64,
    margin_y: f64,
    expansion_factor: f64,
    max_expansions: u32,
}

impl CanvasState {
    /// Sizes a canvas for `item_count` markers on a rough square grid.
    ///
    /// Each grid cell is the largest marker footprint plus separation on both
    /// sides; the result never falls below the configured minimum canvas.
    pub fn estimate_initial_size(item_count: usize, config: &ForestConfig) -> Self {
        let (width, height) = if item_count == 0 {
            (config.min_canvas_width, config.min_canvas_height)
        } else {
            let columns = (item_count as f64).sqrt().ceil() as usize;
            let rows = item_count.div_ceil(columns);
            let (max_w, max_h) = config.visual_size(config.max_scale);
            let cell_w = max_w + 2.0 * config.base_separation;
            let cell_h = max_h + 2.0 * config.base_separation;
            (
                (columns as f64 * cell_w + 2.0 * config.margin_x).max(config.min_canvas_width),
                (rows as f64 * cell_h + 2.0 * config.margin_y).max(config.min_canvas_height),
            )
        };

        CanvasState {
            width,
            height,
            expansions: 0,
            margin_x: config.margin_x,
            margin_y: config.margin_y,
            expansion_factor: config.expansion_factor,
            max_expansions: config.max_canvas_expansions,
        }
    }

    /// Grows both dimensions by the expansion factor.
    ///
    /// Returns `false` without changing anything once the per-run expansion
    /// cap is reached.
    pub fn expand(&mut self) -> bool {
        if self.expansions >= self.max_expansions {
            return false;
        }
        self.width *= self.expansion_factor;
        self.height *= self.expansion_factor;
        self.expansions += 1;
        true
    }

    pub fn is_capped(&self) -> bool {
        self.expansions >= self.max_expansions
    }

    /// Valid center range for a marker with the given half extents.
    ///
    /// When the canvas is too small for the marker on an axis, that axis
    /// collapses to the canvas midpoint.
    pub fn bounds_for(&self, half_width: f64, half_height: f64) -> CenterBounds {
        let (min_x, max_x) = axis_bounds(self.width, self.margin_x, half_width);
        let (min_y, max_y) = axis_bounds(self.height, self.margin_y, half_height);
        CenterBounds {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

fn axis_bounds(extent: f64, margin: f64, half: f64) -> (f64, f64) {
    let low = margin + half;
    let high = extent - margin - half;
    if high < low {
        let mid = extent / 2.0;
        (mid, mid)
    } else {
        (low, high)
    }
}
