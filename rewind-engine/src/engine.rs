//! Composition root for trajectory replay.
//!
//! [`ReplayEngine`] owns the trajectory store, the event summary and the
//! playback clock, and keeps the resolved per-object positions for the
//! current time. Collaborators pull state once per frame after [`tick`]:
//! never read positions for a frame before ticking it.
//!
//! [`tick`]: ReplayEngine::tick

use std::collections::HashMap;

use chrono::NaiveDateTime;
use glam::DVec3;
use tracing::{info, warn};

use rewind_data::{
    ReplayConfig, TrajectoryRow, TrajectoryStore, format_display, format_stage, parse_timestamp,
};

use crate::clock::{PlaybackClock, Tick};
use crate::error::EngineError;
use crate::events::EventSummary;
use crate::overlay::{ObjectLabel, OverlayFrame};

/// The replay engine: one store, one event summary, one clock.
///
/// Constructed empty; [`load`](Self::load) populates it. A failed load
/// leaves the engine in the no-data state rather than partially populated,
/// and a corrected load may be retried.
#[derive(Debug, Default)]
pub struct ReplayEngine {
    store: TrajectoryStore,
    events: EventSummary,
    clock: Option<PlaybackClock>,
    current_positions: HashMap<String, DVec3>,
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration and trajectory rows.
    ///
    /// With data present, seeds the playable range to the data bounds,
    /// the current time to the data start, and resolves positions once.
    /// An empty row set is a successful load with no data.
    pub fn load(
        &mut self,
        config: &ReplayConfig,
        rows: &[TrajectoryRow],
    ) -> Result<(), EngineError> {
        self.clock = None;
        self.current_positions.clear();

        self.events.load(config.event_summary.clone());
        if self.events.is_empty() {
            info!("No events defined in config");
        }
        self.store.set_object_mapping(config.prim_map.clone());
        self.store.load(rows)?;

        if let Ok((start, end)) = self.store.bounds() {
            info!(
                "Data loaded: {} timestamps, {} to {}",
                self.store.timestamp_count(),
                start,
                end
            );
            self.clock = Some(PlaybackClock::new(start, end));
            self.resolve();
        }
        Ok(())
    }

    /// Advance playback by a frame's delta time and re-resolve positions
    /// if the current time moved.
    pub fn tick(&mut self, dt: f64) {
        let outcome = match &mut self.clock {
            Some(clock) => clock.tick(dt, &mut self.events),
            None => return,
        };
        if outcome.needs_apply() {
            self.resolve();
        } else if let Tick::BadEvent(text) = outcome {
            warn!("Failed to parse event timestamp: {text:?}");
        }
    }

    pub fn toggle_playback(&mut self) {
        if let Some(clock) = &mut self.clock {
            clock.toggle_playback();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.clock.as_ref().is_some_and(PlaybackClock::is_playing)
    }

    /// Set the playable range. `end <= start` is rejected; out-of-data
    /// bounds are clamped.
    pub fn set_range(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), EngineError> {
        let Some(clock) = &mut self.clock else {
            if end <= start {
                return Err(EngineError::InvalidRange);
            }
            return Ok(());
        };
        if clock.set_range(start, end)? {
            self.resolve();
        }
        Ok(())
    }

    pub fn scrub_to_time(&mut self, t: NaiveDateTime) {
        if let Some(clock) = &mut self.clock {
            clock.scrub_to_time(t);
            self.resolve();
        }
    }

    pub fn scrub_to_progress(&mut self, progress: f64) {
        if let Some(clock) = &mut self.clock {
            clock.scrub_to_progress(progress);
            self.resolve();
        }
    }

    /// Jump back to the start of the playable range.
    pub fn jump_to_start(&mut self) {
        if let Some(clock) = &mut self.clock {
            let (start, _) = clock.range();
            clock.scrub_to_time(start);
            self.resolve();
        }
    }

    /// Manually jump to the next event in the summary.
    pub fn jump_to_next_event(&mut self) -> Result<(), EngineError> {
        let text = self.events.advance_cursor()?.to_string();
        let t = parse_timestamp(&text)?;
        if let Some(clock) = &mut self.clock {
            clock.scrub_to_time(t);
            self.resolve();
        }
        Ok(())
    }

    pub fn progress(&self) -> f64 {
        self.clock.as_ref().map_or(0.0, PlaybackClock::progress)
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        if let Some(clock) = &mut self.clock {
            clock.set_speed(multiplier);
        }
    }

    pub fn speed(&self) -> f64 {
        self.clock.as_ref().map_or(1.0, PlaybackClock::speed)
    }

    /// Enable or disable event-jump mode. The event cursor rewinds either
    /// way.
    pub fn set_event_mode(&mut self, enabled: bool) {
        self.events.reset_cursor();
        if let Some(clock) = &mut self.clock {
            clock.set_event_mode(enabled);
        }
    }

    pub fn event_mode(&self) -> bool {
        self.clock.as_ref().is_some_and(PlaybackClock::event_mode)
    }

    /// Positions resolved for the current time, keyed by object id.
    pub fn current_positions(&self) -> &HashMap<String, DVec3> {
        &self.current_positions
    }

    pub fn current_time(&self) -> Option<NaiveDateTime> {
        self.clock.as_ref().map(PlaybackClock::current_time)
    }

    /// Date and time texts for the heads-up display.
    pub fn current_display_time(&self) -> Option<(String, String)> {
        self.current_time().map(format_display)
    }

    /// Millisecond-precision readout of the current time.
    pub fn current_stage_time(&self) -> Option<String> {
        self.current_time().map(format_stage)
    }

    pub fn data_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.clock.as_ref().map(PlaybackClock::data_bounds)
    }

    pub fn range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.clock.as_ref().map(PlaybackClock::range)
    }

    pub fn has_data(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// The loaded event timestamps.
    pub fn events(&self) -> &[String] {
        self.events.events()
    }

    /// Object-to-handle mapping for the rendering collaborator.
    pub fn object_handles(&self) -> &HashMap<String, String> {
        self.store.object_handles()
    }

    /// Snapshot of the overlay state for this frame.
    pub fn overlay_frame(&self) -> OverlayFrame {
        let (date_text, time_text) = self.current_display_time().unwrap_or_default();
        let labels = self
            .current_positions
            .iter()
            .map(|(objid, &position)| ObjectLabel {
                objid: objid.clone(),
                position,
            })
            .collect();
        OverlayFrame {
            date_text,
            time_text,
            labels,
        }
    }

    fn resolve(&mut self) {
        if let Some(clock) = &self.clock {
            self.current_positions = self.store.positions_at(clock.current_time());
        }
    }
}
