//! Sparse per-object time series with last-known-value queries.
//!
//! Samples are bucketed by whole-second timestamp. The `BTreeMap` is the
//! sorted timestamp index; input row order is never assumed.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use glam::DVec3;
use tracing::info;

use crate::error::DataError;
use crate::timestamp::{parse_timestamp, truncate_to_second};

/// One trajectory record as it appears in the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRow {
    pub timestamp: String,
    pub objid: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// In-memory trajectory data: timestamp buckets of per-object positions,
/// plus the object-to-scene-handle mapping used by the rendering side.
#[derive(Debug, Default)]
pub struct TrajectoryStore {
    samples: BTreeMap<NaiveDateTime, HashMap<String, DVec3>>,
    handles: HashMap<String, String>,
}

impl TrajectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sample map from source rows.
    ///
    /// The whole load is rejected on the first row with an unparsable
    /// timestamp, leaving the store empty. A duplicate (timestamp, object)
    /// pair keeps the later row.
    pub fn load(&mut self, rows: &[TrajectoryRow]) -> Result<(), DataError> {
        self.samples.clear();

        let mut samples: BTreeMap<NaiveDateTime, HashMap<String, DVec3>> = BTreeMap::new();
        for row in rows {
            let ts = truncate_to_second(parse_timestamp(&row.timestamp)?);
            samples
                .entry(ts)
                .or_default()
                .insert(row.objid.clone(), DVec3::new(row.x, row.y, row.z));
        }

        info!(
            "Trajectory data loaded: {} rows into {} timestamps",
            rows.len(),
            samples.len()
        );
        self.samples = samples;
        Ok(())
    }

    /// Replace the object-to-handle mapping.
    pub fn set_object_mapping(&mut self, mapping: HashMap<String, String>) {
        self.handles = mapping;
    }

    /// Object-to-handle mapping for the rendering collaborator.
    pub fn object_handles(&self) -> &HashMap<String, String> {
        &self.handles
    }

    /// Earliest and latest sample timestamps.
    pub fn bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime), DataError> {
        let first = self.samples.keys().next();
        let last = self.samples.keys().next_back();
        match (first, last) {
            (Some(&start), Some(&end)) => Ok((start, end)),
            _ => Err(DataError::EmptyDataset),
        }
    }

    /// Resolve object positions at a point in time.
    ///
    /// The query is truncated to whole seconds. An exact bucket wins;
    /// otherwise the greatest bucket at or before the query time is
    /// returned (last known value). A query before all data clamps to the
    /// earliest bucket. An empty store yields an empty map.
    pub fn positions_at(&self, t: NaiveDateTime) -> HashMap<String, DVec3> {
        let key = truncate_to_second(t);
        if let Some((_, bucket)) = self.samples.range(..=key).next_back() {
            bucket.clone()
        } else if let Some((_, bucket)) = self.samples.iter().next() {
            bucket.clone()
        } else {
            HashMap::new()
        }
    }

    /// Number of distinct timestamp buckets.
    pub fn timestamp_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
