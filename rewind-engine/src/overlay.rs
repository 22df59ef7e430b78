//! Collaborator seam for optional viewport overlays.
//!
//! Hosts that can draw into a viewport implement [`OverlaySurface`] and
//! feed it one [`OverlayFrame`] per frame after ticking the engine. Hosts
//! without a viewport plug in [`NullOverlay`]; the engine never checks at
//! runtime whether overlay support could be imported.

use glam::DVec3;

/// A floating per-object ID label at the object's resolved position.
/// Offsetting the label above the object is the host's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLabel {
    pub objid: String,
    pub position: DVec3,
}

/// Everything an overlay draws for one frame: the heads-up date/time texts
/// and the current object labels.
#[derive(Debug, Clone, Default)]
pub struct OverlayFrame {
    pub date_text: String,
    pub time_text: String,
    pub labels: Vec<ObjectLabel>,
}

/// Capability interface for a host-side overlay.
pub trait OverlaySurface {
    fn set_visible(&mut self, visible: bool);
    fn update(&mut self, frame: &OverlayFrame);
}

/// Overlay used when the host has no viewport to draw into.
#[derive(Debug, Default)]
pub struct NullOverlay;

impl OverlaySurface for NullOverlay {
    fn set_visible(&mut self, _visible: bool) {}

    fn update(&mut self, _frame: &OverlayFrame) {}
}
