//! Placement Loop — collision-avoiding sequential placement of markers.
//!
//! # Algorithm
//! Creators are processed in an order derived from hashes of their ids, not
//! the caller's order. For each creator:
//! 1. A private `SeededRandom` keyed by `id + processing_index` draws the
//!    marker's scale, rotation, image variant and separation margin.
//! 2. Candidate centers are drawn uniformly inside the current canvas bounds.
//!    Each candidate's density multiplier comes from the noise field.
//! 3. A candidate is accepted when it keeps the required distance to every
//!    marker already placed.
//! 4. Rejections relax `spacing_factor` every `relax_every` attempts and grow
//!    the canvas every `expand_every` attempts.
//! 5. If the attempt budget runs out, the last candidate is accepted anyway
//!    and the marker is flagged `best_effort`.

use crate::forest::canvas::CanvasState;
use crate::forest::noise::ValueNoiseField;
use crate::forest::random::{seed_hash, SeededRandom};
use crate::forest::tuning::ForestConfig;
use crate::models::creator::Creator;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// A placed marker with its collision data.
///
/// `spacing_factor` is the factor in force when the marker was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub creator: Creator,
    pub center_x: f64,
    pub center_y: f64,
    pub collision_radius: f64,
    pub local_density_multiplier: f64,
    pub visual_width: f64,
    /// Tree plus label.
    pub visual_height: f64,
    pub scale: f64,
    pub rotation_degrees: f64,
    pub image_variant: usize,
    pub spacing_factor: f64,
    pub best_effort: bool,
}

impl Marker {
    /// Collision radius scaled by the local density at the marker's position.
    pub fn effective_radius(&self) -> f64 {
        self.collision_radius * self.local_density_multiplier
    }

    pub fn half_extents(&self) -> (f64, f64) {
        (self.visual_width / 2.0, self.visual_height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlacementCandidate {
    x: f64,
    y: f64,
}

/// Counters describing how hard one run had to work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementStats {
    pub total_attempts: u64,
    pub relaxations: u32,
    pub best_effort: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Ordering
// ────────────────────────────────────────────────────────────────────────────

/// Returns the creators in processing order: by id hash, then id, then name.
pub fn processing_order(creators: &[Creator]) -> Vec<&Creator> {
    let mut keyed: Vec<(u32, &Creator)> = creators.iter().map(|c| (seed_hash(&c.id), c)).collect();
    keyed.sort_by(|(ha, a), (hb, b)| {
        ha.cmp(hb)
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.name.cmp(&b.name))
    });
    keyed.into_iter().map(|(_, c)| c).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

/// Distance between two points. Uses `sqrt` rather than `hypot`, which is not
/// correctly rounded on every platform.
#[inline]
pub(crate) fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}

/// Places every creator on `canvas`, growing it as needed.
///
/// Always returns exactly one marker per input creator.
pub fn place_all(
    creators: &[Creator],
    canvas: &mut CanvasState,
    config: &ForestConfig,
) -> (Vec<Marker>, PlacementStats) {
    let noise = ValueNoiseField;
    let mut placed: Vec<Marker> = Vec::with_capacity(creators.len());
    let mut stats = PlacementStats::default();

    for (index, creator) in processing_order(creators).into_iter().enumerate() {
        let marker = place_one(creator, index, &placed, canvas, &noise, config, &mut stats);
        placed.push(marker);
    }

    (placed, stats)
}

fn place_one(
    creator: &Creator,
    index: usize,
    placed: &[Marker],
    canvas: &mut CanvasState,
    noise: &ValueNoiseField,
    config: &ForestConfig,
    stats: &mut PlacementStats,
) -> Marker {
    let mut rng = SeededRandom::seed(&format!("{}{}", creator.id, index));

    let scale = rng.range(config.min_scale, config.max_scale);
    let rotation_degrees = rng.range(-config.max_rotation_degrees, config.max_rotation_degrees);
    let image_variant = rng.index(config.image_variants.len());
    let separation = rng.range(config.base_separation, 2.0 * config.base_separation);

    let (visual_width, visual_height) = config.visual_size(scale);
    let half_w = visual_width / 2.0;
    let half_h = visual_height / 2.0;
    let collision_radius = (half_w * half_w + half_h * half_h).sqrt() + separation;

    let mut spacing_factor = 1.0_f64;
    let mut bounds = canvas.bounds_for(half_w, half_h);
    let mut last = PlacementCandidate {
        x: (bounds.min_x + bounds.max_x) / 2.0,
        y: (bounds.min_y + bounds.max_y) / 2.0,
    };
    let mut last_density = config.max_density;

    for attempt in 1..=config.max_attempts {
        stats.total_attempts += 1;

        let candidate = PlacementCandidate {
            x: rng.range(bounds.min_x, bounds.max_x),
            y: rng.range(bounds.min_y, bounds.max_y),
        };
        let density = noise.density_at(
            candidate.x,
            candidate.y,
            config.noise_scale,
            config.min_density,
            config.max_density,
        );

        let radius = collision_radius * density;
        if !collides(candidate, radius, spacing_factor, placed) {
            return Marker {
                creator: creator.clone(),
                center_x: candidate.x,
                center_y: candidate.y,
                collision_radius,
                local_density_multiplier: density,
                visual_width,
                visual_height,
                scale,
                rotation_degrees,
                image_variant,
                spacing_factor,
                best_effort: false,
            };
        }

        last = candidate;
        last_density = density;

        if attempt % config.relax_every == 0 {
            let relaxed = (spacing_factor - config.relax_step).max(config.min_spacing_factor);
            if relaxed < spacing_factor {
                stats.relaxations += 1;
            }
            spacing_factor = relaxed;
        }
        if attempt % config.expand_every == 0 && canvas.expand() {
            bounds = canvas.bounds_for(half_w, half_h);
        }
    }

    stats.best_effort += 1;
    Marker {
        creator: creator.clone(),
        center_x: last.x,
        center_y: last.y,
        collision_radius,
        local_density_multiplier: last_density,
        visual_width,
        visual_height,
        scale,
        rotation_degrees,
        image_variant,
        spacing_factor,
        best_effort: true,
    }
}

fn collides(
    candidate: PlacementCandidate,
    radius: f64,
    spacing_factor: f64,
    placed: &[Marker],
) -> bool {
    placed.iter().any(|other| {
        let required = (radius + other.effective_radius()) * spacing_factor;
        distance(candidate.x, candidate.y, other.center_x, other.center_y) < required
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
