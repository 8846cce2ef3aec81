//! Layout cache — memoizes generated forests by their input.
//!
//! Generation is deterministic, so a layout only needs recomputing when the
//! creator list (or the engine's tuning) changes. Keys are a stable 64-bit
//! FNV-1a hash over the canonical creator list plus the tuning, so they are
//! identical across processes and safe to share through Redis.
//!
//! Default: `MemoryLayoutStore` (bounded, in-process).
//! `RedisLayoutStore` is used when `REDIS_URL` is configured.
//! `AppState` holds an `Arc<dyn LayoutStore>`.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::forest::assembly::ForestLayout;
use crate::forest::tuning::ForestConfig;
use crate::models::creator::Creator;

const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
const REDIS_KEY_PREFIX: &str = "forest:layout:";

// ────────────────────────────────────────────────────────────────────────────
// Keys
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Fnv1a(u64);

impl Fnv1a {
    fn new() -> Self {
        Fnv1a(FNV_OFFSET)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(self) -> u64 {
        self.0
    }
}

/// Stable cache key for a creator list under a given tuning.
///
/// Insensitive to the order of `creators`, matching the layout itself.
pub fn layout_key(creators: &[Creator], config: &ForestConfig) -> String {
    let mut canonical: Vec<&Creator> = creators.iter().collect();
    canonical.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.name.cmp(&b.name)));

    let mut hasher = Fnv1a::new();
    hasher.write(&(canonical.len() as u64).to_le_bytes());
    for creator in canonical {
        // Length prefixes keep ("ab", "c") and ("a", "bc") apart.
        hasher.write(&(creator.id.len() as u64).to_le_bytes());
        hasher.write(creator.id.as_bytes());
        hasher.write(&(creator.name.len() as u64).to_le_bytes());
        hasher.write(creator.name.as_bytes());
    }
    // ForestConfig always serializes.
    hasher.write(&serde_json::to_vec(config).unwrap_or_default());

    format!("{:016x}", hasher.finish())
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Storage for generated layouts. Failures are reported, never fatal to the
/// caller: a layout can always be regenerated.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ForestLayout>, AppError>;

    async fn put(&self, key: &str, layout: &ForestLayout) -> Result<(), AppError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryLayoutStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryEntries {
    layouts: HashMap<String, ForestLayout>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// In-process store holding at most `capacity` layouts, evicting the oldest.
#[derive(Debug)]
pub struct MemoryLayoutStore {
    capacity: usize,
    entries: RwLock<MemoryEntries>,
}

impl MemoryLayoutStore {
    pub fn new(capacity: usize) -> Self {
        MemoryLayoutStore {
            capacity,
            entries: RwLock::new(MemoryEntries::default()),
        }
    }
}

#[async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn get(&self, key: &str) -> Result<Option<ForestLayout>, AppError> {
        Ok(self.entries.read().await.layouts.get(key).cloned())
    }

    async fn put(&self, key: &str, layout: &ForestLayout) -> Result<(), AppError> {
        if self.capacity == 0 {
            return Ok(());
        }

        let mut entries = self.entries.write().await;
        if entries
            .layouts
            .insert(key.to_string(), layout.clone())
            .is_none()
        {
            entries.order.push_back(key.to_string());
        }
        while entries.layouts.len() > self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.layouts.remove(&oldest);
                }
                None => break,
            }
        }
        debug!(entries = entries.layouts.len(), "Layout stored in memory cache");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RedisLayoutStore
// ────────────────────────────────────────────────────────────────────────────

/// Shared store backed by Redis. Layouts are stored as JSON with a TTL.
#[derive(Clone)]
pub struct RedisLayoutStore {
    conn: redis::aio::MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisLayoutStore {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> anyhow::Result<Self> {
        info!("Connecting to Redis layout cache...");
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis layout cache connected");
        Ok(RedisLayoutStore { conn, ttl_secs })
    }
}

#[async_trait]
impl LayoutStore for RedisLayoutStore {
    async fn get(&self, key: &str) -> Result<Option<ForestLayout>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(format!("{REDIS_KEY_PREFIX}{key}"))
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("Redis GET failed: {e}")))?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| AppError::Cache(format!("Cached layout is corrupt: {e}")))
        })
        .transpose()
    }

    async fn put(&self, key: &str, layout: &ForestLayout) -> Result<(), AppError> {
        let json = serde_json::to_string(layout)
            .map_err(|e| AppError::Cache(format!("Layout serialization failed: {e}")))?;

        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(format!("{REDIS_KEY_PREFIX}{key}"))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("Redis SET failed: {e}")))
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
