//! Playback state machine.
//!
//! The clock advances in whole seconds: per-frame `tick(dt)` calls
//! accumulate `dt * speed` and only act once a full second has been
//! gathered. In event mode a qualifying tick jumps to the next event in
//! the summary instead of advancing by the elapsed seconds — one tick is
//! exactly one event, regardless of how many seconds were accumulated.

use chrono::{Duration, NaiveDateTime};
use tracing::info;

use rewind_data::parse_timestamp;

use crate::error::EngineError;
use crate::events::EventSummary;

/// Outcome of a single clock tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// No qualifying advance; current time unchanged.
    Idle,
    /// Current time moved; positions must be re-resolved.
    Advanced,
    /// The range end was reached and playback stopped.
    Finished,
    /// The next event's timestamp failed to parse; the tick was aborted.
    BadEvent(String),
}

impl Tick {
    /// Whether this outcome moved the current time.
    pub fn needs_apply(&self) -> bool {
        matches!(self, Tick::Advanced | Tick::Finished)
    }
}

/// Playback state: current time, play/pause, speed, range and the
/// per-tick advancement logic.
#[derive(Debug)]
pub struct PlaybackClock {
    data_start: NaiveDateTime,
    data_end: NaiveDateTime,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    current: NaiveDateTime,
    playing: bool,
    speed: f64,
    accumulated: f64,
    event_mode: bool,
}

impl PlaybackClock {
    /// Create a clock over the given data bounds. The playable range is
    /// seeded to the full data range and the current time to its start.
    pub fn new(data_start: NaiveDateTime, data_end: NaiveDateTime) -> Self {
        Self {
            data_start,
            data_end,
            range_start: data_start,
            range_end: data_end,
            current: data_start,
            playing: false,
            speed: 1.0,
            accumulated: 0.0,
            event_mode: false,
        }
    }

    /// Flip between playing and stopped. The accumulated fraction is
    /// always zeroed so a stale carry cannot cause an immediate jump
    /// after resume.
    pub fn toggle_playback(&mut self) {
        self.playing = !self.playing;
        self.accumulated = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Set the playback speed multiplier, floored at 0.1.
    pub fn set_speed(&mut self, multiplier: f64) {
        self.speed = multiplier.max(0.1);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_event_mode(&mut self, enabled: bool) {
        self.event_mode = enabled;
    }

    pub fn event_mode(&self) -> bool {
        self.event_mode
    }

    /// Set the user-facing playable range.
    ///
    /// Rejects `end <= start`, leaving the prior range untouched. Both
    /// bounds are clamped into the data range; the current time is clamped
    /// into the new range. Returns whether the current time moved.
    pub fn set_range(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<bool, EngineError> {
        if end <= start {
            return Err(EngineError::InvalidRange);
        }

        let adjusted_start = start.max(self.data_start);
        let adjusted_end = end.min(self.data_end);
        if adjusted_start != start {
            info!("Range start adjusted to data minimum: {}", adjusted_start);
        }
        if adjusted_end != end {
            info!("Range end adjusted to data maximum: {}", adjusted_end);
        }
        self.range_start = adjusted_start;
        self.range_end = adjusted_end;

        let clamped = self.clamp_to_range(self.current);
        let moved = clamped != self.current;
        self.current = clamped;
        Ok(moved)
    }

    /// Jump to a specific time, clamped into the playable range.
    pub fn scrub_to_time(&mut self, t: NaiveDateTime) {
        self.current = self.clamp_to_range(t);
    }

    /// Jump to a normalized position within the playable range.
    pub fn scrub_to_progress(&mut self, progress: f64) {
        let progress = progress.clamp(0.0, 1.0);
        let total_ms = (self.range_end - self.range_start).num_milliseconds();
        let offset_ms = (total_ms as f64 * progress).round() as i64;
        self.current = self.range_start + Duration::milliseconds(offset_ms);
    }

    /// Position within the playable range, normalized to [0, 1].
    /// A zero-duration range reports 0.
    pub fn progress(&self) -> f64 {
        let total_ms = (self.range_end - self.range_start).num_milliseconds();
        if total_ms <= 0 {
            return 0.0;
        }
        let elapsed_ms = (self.current - self.range_start).num_milliseconds();
        (elapsed_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
    }

    /// Advance playback by a frame's delta time.
    ///
    /// Sub-second ticks accumulate silently. Once a whole second is
    /// available, either the next event is jumped to (event mode, list
    /// non-empty) or the accumulated whole seconds are added to the
    /// current time, stopping at the range end.
    pub fn tick(&mut self, dt: f64, events: &mut EventSummary) -> Tick {
        if !self.playing {
            return Tick::Idle;
        }

        self.accumulated += dt * self.speed;
        if self.accumulated < 1.0 {
            return Tick::Idle;
        }
        let whole_seconds = self.accumulated.floor();
        self.accumulated -= whole_seconds;

        if self.event_mode && !events.is_empty() {
            // One tick, one event. The cursor moves before the parse, so a
            // malformed entry is skipped rather than retried forever.
            let text = match events.advance_cursor() {
                Ok(text) => text.to_string(),
                Err(_) => return Tick::Idle,
            };
            match parse_timestamp(&text) {
                Ok(t) => {
                    self.scrub_to_time(t);
                    Tick::Advanced
                }
                Err(_) => Tick::BadEvent(text),
            }
        } else {
            let candidate = self.current + Duration::seconds(whole_seconds as i64);
            if candidate >= self.range_end {
                self.current = self.range_end;
                self.playing = false;
                Tick::Finished
            } else {
                self.current = candidate;
                Tick::Advanced
            }
        }
    }

    pub fn current_time(&self) -> NaiveDateTime {
        self.current
    }

    pub fn range(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.range_start, self.range_end)
    }

    pub fn data_bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.data_start, self.data_end)
    }

    pub fn accumulated_fraction(&self) -> f64 {
        self.accumulated
    }

    fn clamp_to_range(&self, t: NaiveDateTime) -> NaiveDateTime {
        t.max(self.range_start).min(self.range_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> NaiveDateTime {
        parse_timestamp(text).unwrap()
    }

    fn clock() -> PlaybackClock {
        PlaybackClock::new(ts("2024-01-01T00:00:00"), ts("2024-01-01T01:00:00"))
    }

    fn no_events() -> EventSummary {
        EventSummary::new()
    }

    #[test]
    fn test_new_clock_seeds_range_and_current() {
        let c = clock();
        assert_eq!(c.range(), c.data_bounds());
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:00"));
        assert!(!c.is_playing());
    }

    #[test]
    fn test_toggle_resets_accumulated_fraction() {
        let mut c = clock();
        c.toggle_playback();
        c.tick(0.7, &mut no_events());
        assert!(c.accumulated_fraction() > 0.0);
        c.toggle_playback();
        assert_eq!(c.accumulated_fraction(), 0.0);
        c.toggle_playback();
        assert_eq!(c.accumulated_fraction(), 0.0);
    }

    #[test]
    fn test_zero_dt_tick_is_idempotent() {
        let mut c = clock();
        c.toggle_playback();
        let before = (c.current_time(), c.accumulated_fraction());
        assert_eq!(c.tick(0.0, &mut no_events()), Tick::Idle);
        assert_eq!((c.current_time(), c.accumulated_fraction()), before);
    }

    #[test]
    fn test_subsecond_ticks_accumulate_silently() {
        let mut c = clock();
        c.toggle_playback();
        assert_eq!(c.tick(0.4, &mut no_events()), Tick::Idle);
        assert_eq!(c.tick(0.4, &mut no_events()), Tick::Idle);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:00"));
        // Third 0.4s tick crosses 1.0 accumulated.
        assert_eq!(c.tick(0.4, &mut no_events()), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:01"));
    }

    #[test]
    fn test_speed_scales_accumulation() {
        // Three 0.5s ticks at 2x speed gather exactly 3.0 seconds: the
        // first two stay below 1.0 only for the very first, so walk it
        // through tick by tick.
        let mut c = clock();
        c.set_speed(2.0);
        c.toggle_playback();
        assert_eq!(c.tick(0.5, &mut no_events()), Tick::Advanced); // 1.0 -> +1s
        assert_eq!(c.tick(0.5, &mut no_events()), Tick::Advanced); // 1.0 -> +1s
        assert_eq!(c.tick(0.5, &mut no_events()), Tick::Advanced); // 1.0 -> +1s
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:03"));
        assert_eq!(c.accumulated_fraction(), 0.0);
    }

    #[test]
    fn test_single_large_tick_advances_whole_seconds_at_once() {
        let mut c = clock();
        c.set_speed(2.0);
        c.toggle_playback();
        assert_eq!(c.tick(1.5, &mut no_events()), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:03"));
        assert_eq!(c.accumulated_fraction(), 0.0);
    }

    #[test]
    fn test_speed_floor() {
        let mut c = clock();
        c.set_speed(0.05);
        assert_eq!(c.speed(), 0.1);
        c.set_speed(8.0);
        assert_eq!(c.speed(), 8.0);
    }

    #[test]
    fn test_stops_at_range_end() {
        let mut c = PlaybackClock::new(ts("2024-01-01T00:00:00"), ts("2024-01-01T00:00:02"));
        c.toggle_playback();
        assert_eq!(c.tick(1.0, &mut no_events()), Tick::Advanced);
        assert_eq!(c.tick(1.0, &mut no_events()), Tick::Finished);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:02"));
        assert!(!c.is_playing());
    }

    #[test]
    fn test_overshoot_clamps_to_range_end() {
        let mut c = PlaybackClock::new(ts("2024-01-01T00:00:00"), ts("2024-01-01T00:00:02"));
        c.toggle_playback();
        assert_eq!(c.tick(10.0, &mut no_events()), Tick::Finished);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:02"));
    }

    #[test]
    fn test_set_range_rejects_inverted() {
        let mut c = clock();
        let before = c.range();
        let result = c.set_range(ts("2024-01-01T00:30:00"), ts("2024-01-01T00:10:00"));
        assert!(matches!(result, Err(EngineError::InvalidRange)));
        assert_eq!(c.range(), before);
    }

    #[test]
    fn test_set_range_clamps_into_data_bounds() {
        let mut c = clock();
        c.set_range(ts("2023-12-31T00:00:00"), ts("2024-01-02T00:00:00"))
            .unwrap();
        assert_eq!(c.range(), c.data_bounds());
    }

    #[test]
    fn test_set_range_clamps_current_and_reports_move() {
        let mut c = clock();
        c.scrub_to_time(ts("2024-01-01T00:05:00"));
        let moved = c
            .set_range(ts("2024-01-01T00:10:00"), ts("2024-01-01T00:20:00"))
            .unwrap();
        assert!(moved);
        assert_eq!(c.current_time(), ts("2024-01-01T00:10:00"));

        let moved = c
            .set_range(ts("2024-01-01T00:05:00"), ts("2024-01-01T00:20:00"))
            .unwrap();
        assert!(!moved);
    }

    #[test]
    fn test_scrub_clamps_into_range() {
        let mut c = clock();
        c.scrub_to_time(ts("2025-06-01T00:00:00"));
        assert_eq!(c.current_time(), ts("2024-01-01T01:00:00"));
        c.scrub_to_time(ts("2020-01-01T00:00:00"));
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:00"));
    }

    #[test]
    fn test_progress_endpoints_and_inverse() {
        let mut c = clock();
        c.scrub_to_progress(0.0);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:00"));
        assert_eq!(c.progress(), 0.0);

        c.scrub_to_progress(1.0);
        assert_eq!(c.current_time(), ts("2024-01-01T01:00:00"));
        assert_eq!(c.progress(), 1.0);

        c.scrub_to_progress(0.5);
        assert_eq!(c.current_time(), ts("2024-01-01T00:30:00"));
        assert!((c.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_clamps_input() {
        let mut c = clock();
        c.scrub_to_progress(2.5);
        assert_eq!(c.current_time(), ts("2024-01-01T01:00:00"));
        c.scrub_to_progress(-1.0);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:00"));
    }

    #[test]
    fn test_zero_duration_range_progress_is_zero() {
        let t = ts("2024-01-01T00:00:00");
        let c = PlaybackClock::new(t, t);
        assert_eq!(c.progress(), 0.0);
    }

    #[test]
    fn test_event_mode_jumps_one_event_per_tick() {
        let mut events = EventSummary::new();
        events.load(vec![
            "2024-01-01T00:10:00".to_string(),
            "2024-01-01T00:20:00".to_string(),
            "2024-01-01T00:30:00".to_string(),
        ]);
        let mut c = clock();
        c.set_event_mode(true);
        c.set_speed(5.0);
        c.toggle_playback();

        // Each qualifying tick consumes its seconds but jumps exactly one
        // event, starting from cursor 0 -> 1.
        assert_eq!(c.tick(1.0, &mut events), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T00:20:00"));
        assert_eq!(c.tick(1.0, &mut events), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T00:30:00"));
        assert_eq!(c.tick(1.0, &mut events), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T00:10:00")); // wrapped
        assert!(c.is_playing());
    }

    #[test]
    fn test_event_mode_with_empty_list_advances_normally() {
        let mut c = clock();
        c.set_event_mode(true);
        c.toggle_playback();
        assert_eq!(c.tick(2.0, &mut no_events()), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:02"));
    }

    #[test]
    fn test_malformed_event_aborts_tick_softly() {
        let mut events = EventSummary::new();
        events.load(vec![
            "2024-01-01T00:10:00".to_string(),
            "bogus".to_string(),
            "2024-01-01T00:30:00".to_string(),
        ]);
        let mut c = clock();
        c.set_event_mode(true);
        c.toggle_playback();

        assert_eq!(
            c.tick(1.0, &mut events),
            Tick::BadEvent("bogus".to_string())
        );
        // Time unchanged, playback still running, cursor moved past the
        // bad entry.
        assert_eq!(c.current_time(), ts("2024-01-01T00:00:00"));
        assert!(c.is_playing());
        assert_eq!(c.tick(1.0, &mut events), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T00:30:00"));
    }

    #[test]
    fn test_event_jump_is_clamped_into_range() {
        let mut events = EventSummary::new();
        events.load(vec![
            "2024-01-01T00:10:00".to_string(),
            "2030-01-01T00:00:00".to_string(),
        ]);
        let mut c = clock();
        c.set_event_mode(true);
        c.toggle_playback();
        assert_eq!(c.tick(1.0, &mut events), Tick::Advanced);
        assert_eq!(c.current_time(), ts("2024-01-01T01:00:00"));
        // Event jumps never stop playback, even at the range end.
        assert!(c.is_playing());
    }
}
