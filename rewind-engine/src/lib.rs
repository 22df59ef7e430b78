//! Rewind Engine Crate
//!
//! The temporal engine for replaying recorded object trajectories: a
//! deterministic playback clock, the notable-event cursor, and the
//! composition root that resolves per-object positions for the host's
//! rendering and display collaborators.
//!
//! ## Modules
//!
//! - [`clock`]: playback state machine (play/pause, speed, range, ticks)
//! - [`events`]: ordered event timestamps with a wrapping cursor
//! - [`engine`]: composition root owning store, events and clock
//! - [`overlay`]: collaborator seam for optional viewport overlays

pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod overlay;

pub use clock::{PlaybackClock, Tick};
pub use engine::ReplayEngine;
pub use error::EngineError;
pub use events::EventSummary;
pub use overlay::{NullOverlay, ObjectLabel, OverlayFrame, OverlaySurface};
