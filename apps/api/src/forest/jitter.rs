//! Jitter Pass — small cosmetic nudges after placement.
//!
//! Each marker gets a fresh stream keyed by `id + ":jitter:" + index` and a
//! handful of tries to move within a small disc. A move is taken only if the
//! new position clears every other marker's current position at the
//! tightened distance; otherwise the marker stays where placement put it.
//! Markers are visited in placement order, so later checks see earlier moves.

use std::f64::consts::TAU;

use crate::forest::canvas::CanvasState;
use crate::forest::placement::{distance, Marker};
use crate::forest::random::SeededRandom;
use crate::forest::tuning::ForestConfig;

/// Moves markers in place. Returns how many were moved.
pub fn jitter(markers: &mut [Marker], canvas: &CanvasState, config: &ForestConfig) -> usize {
    let mut moved = 0;

    for index in 0..markers.len() {
        let (half_w, half_h) = markers[index].half_extents();
        let bounds = canvas.bounds_for(half_w, half_h);
        let radius = config
            .jitter_radius
            .min(0.5 * bounds.width().min(bounds.height()));
        if radius <= 0.0 {
            continue;
        }

        let mut rng = SeededRandom::seed(&format!("{}:jitter:{}", markers[index].creator.id, index));
        let own_radius = markers[index].effective_radius();
        let (origin_x, origin_y) = (markers[index].center_x, markers[index].center_y);

        for _ in 0..config.jitter_attempts {
            let angle = rng.next_f64() * TAU;
            let offset = rng.next_f64() * radius;
            let (x, y) = bounds.clamp(
                origin_x + libm::cos(angle) * offset,
                origin_y + libm::sin(angle) * offset,
            );

            let clear = markers.iter().enumerate().all(|(other_index, other)| {
                other_index == index
                    || distance(x, y, other.center_x, other.center_y)
                        >= (own_radius + other.effective_radius()) * config.jitter_tightening
            });

            if clear {
                debug_assert!(bounds.contains(x, y));
                let marker = &mut markers[index];
                marker.center_x = x;
                marker.center_y = y;
                moved += 1;
                break;
            }
        }
    }

    moved
}
