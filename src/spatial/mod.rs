use std::collections::HashMap;

use glam::Vec3;

use crate::ai::body::{CharacterInfo, Roster};
use crate::ecs::components::Team;

/// Snapshot of a character's state for detection and targeting queries.
/// Stored alongside the spatial hash to avoid ECS lookups in hot path.
#[derive(Debug, Clone, Copy)]
pub struct CharacterSnapshot {
    pub entity: hecs::Entity,
    pub position: Vec3,
    pub team: Team,
    pub dead: bool,
    pub human: bool,
}

/// Per-tick registry of every character, indexed by entity.
#[derive(Default)]
pub struct Characters {
    pub snapshots: Vec<CharacterSnapshot>,
    index: HashMap<hecs::Entity, u32>,
}

impl Characters {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index.clear();
    }

    /// Append a snapshot and return its index.
    pub fn push(&mut self, snapshot: CharacterSnapshot) -> u32 {
        let idx = self.snapshots.len() as u32;
        self.index.insert(snapshot.entity, idx);
        self.snapshots.push(snapshot);
        idx
    }

    pub fn get(&self, entity: hecs::Entity) -> Option<&CharacterSnapshot> {
        let idx = *self.index.get(&entity)?;
        self.snapshots.get(idx as usize)
    }
}

impl Roster for Characters {
    fn lookup(&self, entity: hecs::Entity) -> Option<CharacterInfo> {
        self.get(entity).map(|s| CharacterInfo {
            position: s.position,
            dead: s.dead,
            human: s.human,
        })
    }
}

/// Spatial hash grid over the ground (XZ) plane.
///
/// Uses multiplicative hash for even distribution. Radius queries visit every
/// cell the radius touches, so large radii cost more than small ones.
pub struct SpatialHash {
    inv_cell_size: f32,
    table_size: usize,
    /// Each bucket holds snapshot indices. Pre-allocated, cleared each tick.
    buckets: Vec<Vec<u32>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32, table_size: usize) -> Self {
        let mut buckets = Vec::with_capacity(table_size);
        for _ in 0..table_size {
            // Pre-allocate each bucket to avoid allocs during rebuild.
            buckets.push(Vec::with_capacity(8));
        }
        Self {
            inv_cell_size: 1.0 / cell_size,
            table_size,
            buckets,
        }
    }

    /// Clear all buckets. Call at start of each rebuild.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear(); // Keeps allocation.
        }
    }

    pub fn insert(&mut self, pos: Vec3, index: u32) {
        let (cx, cz) = self.cell_coords(pos);
        let hash = self.hash_cell(cx, cz);
        self.buckets[hash].push(index);
    }

    /// Visit every index stored in cells within `radius` of `pos`.
    ///
    /// Candidates only: callers do the exact distance test. Distinct cells can
    /// share a bucket, so an index may be reported more than once.
    pub fn query_radius(&self, pos: Vec3, radius: f32, mut callback: impl FnMut(u32)) {
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        let (min_x, min_z) = self.cell_coords(pos - Vec3::new(radius, 0.0, radius));
        let (max_x, max_z) = self.cell_coords(pos + Vec3::new(radius, 0.0, radius));
        // Cell coords saturate for huge radii, so span in i64.
        let span_x = (i64::from(max_x) - i64::from(min_x) + 1) as u64;
        let span_z = (i64::from(max_z) - i64::from(min_z) + 1) as u64;
        if span_x.saturating_mul(span_z) >= self.table_size as u64 {
            // Radius covers the whole table anyway.
            for bucket in &self.buckets {
                bucket.iter().for_each(|&i| callback(i));
            }
            return;
        }
        for cz in min_z..=max_z {
            for cx in min_x..=max_x {
                let hash = self.hash_cell(cx, cz);
                for &index in &self.buckets[hash] {
                    callback(index);
                }
            }
        }
    }

    fn cell_coords(&self, pos: Vec3) -> (i32, i32) {
        let cx = (pos.x * self.inv_cell_size).floor() as i32;
        let cz = (pos.z * self.inv_cell_size).floor() as i32;
        (cx, cz)
    }

    fn hash_cell(&self, cx: i32, cz: i32) -> usize {
        // Multiplicative spatial hash, good distribution for grid data.
        let h = (cx as u32).wrapping_mul(73856093) ^ (cz as u32).wrapping_mul(19349663);
        (h as usize) % self.table_size
    }
}
