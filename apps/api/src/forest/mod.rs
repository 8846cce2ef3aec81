// Forest layout: deterministic placement of creator tree markers.
// Pipeline: placement → jitter → assembly, driven by `LayoutEngine`.
// Generation is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod assembly;
pub mod cache;
pub mod canvas;
pub mod engine;
pub mod handlers;
pub mod jitter;
pub mod noise;
pub mod placement;
pub mod random;
pub mod tuning;

// Re-export the public API consumed by main and the routes.
pub use cache::{LayoutStore, MemoryLayoutStore, RedisLayoutStore};
pub use engine::LayoutEngine;
pub use tuning::ForestConfig;
