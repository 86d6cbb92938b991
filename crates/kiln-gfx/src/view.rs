//! Per-view render-pass state.
//!
//! A view is an independently configured pass: clear settings, draw sort
//! mode, viewport rect and view/projection transforms. Configuration
//! persists across frames until changed; `touch` marks a view active for
//! the current frame even when nothing is submitted to it, so its clear
//! still executes.

use crate::flags::{ClearFlags, ViewMode};

/// Highest usable view id.
pub const MAX_VIEW_ID: u16 = 255;

/// Identifier of a render pass, in `0..=255`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ViewId(u16);

impl ViewId {
    /// # Panics
    /// Panics if `id` exceeds [`MAX_VIEW_ID`].
    pub const fn new(id: u16) -> Self {
        assert!(id <= MAX_VIEW_ID, "view id out of range");
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

/// Viewport rectangle in pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ViewRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Everything the backend needs to set up one view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub clear_flags: ClearFlags,
    /// Clear color, 0xRRGGBBAA.
    pub clear_color: u32,
    pub clear_depth: f32,
    pub clear_stencil: u8,
    pub mode: ViewMode,
    /// `None` = backend default (full backbuffer).
    pub rect: Option<ViewRect>,
    /// View matrix, column-major 4×4. `None` = unchanged/identity.
    pub view: Option<[f32; 16]>,
    /// Projection matrix, column-major 4×4. `None` = unchanged/identity.
    pub proj: Option<[f32; 16]>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            clear_flags: ClearFlags::NONE,
            clear_color: 0x0000_00ff,
            clear_depth: 1.0,
            clear_stencil: 0,
            mode: ViewMode::Default,
            rect: None,
            view: None,
            proj: None,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct ViewEntry {
    state: ViewState,
    /// Configuration changed since the last flush.
    dirty: bool,
    /// Marked active this frame regardless of submissions.
    touched: bool,
}

/// All 256 views plus their per-frame activity flags.
#[derive(Debug)]
pub(crate) struct ViewSet {
    entries: Vec<ViewEntry>,
}

impl ViewSet {
    pub(crate) fn new() -> Self {
        Self {
            entries: vec![ViewEntry::default(); MAX_VIEW_ID as usize + 1],
        }
    }

    pub(crate) fn state(&self, id: ViewId) -> &ViewState {
        &self.entries[id.index() as usize].state
    }

    /// Mutable state access; marks the view dirty.
    pub(crate) fn state_mut(&mut self, id: ViewId) -> &mut ViewState {
        let entry = &mut self.entries[id.index() as usize];
        entry.dirty = true;
        &mut entry.state
    }

    pub(crate) fn touch(&mut self, id: ViewId) {
        self.entries[id.index() as usize].touched = true;
    }

    pub(crate) fn mode(&self, id: ViewId) -> ViewMode {
        self.entries[id.index() as usize].state.mode
    }

    /// Views to flush this frame, ascending: dirty or touched ones, plus
    /// any in `submitted_to`.
    pub(crate) fn active_ids(&self, submitted_to: &[bool]) -> Vec<ViewId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(id, entry)| {
                entry.dirty || entry.touched || submitted_to.get(*id).copied().unwrap_or(false)
            })
            .map(|(id, _)| ViewId::new(id as u16))
            .collect()
    }

    /// Clears per-frame flags after a flush. Configuration persists.
    pub(crate) fn end_frame(&mut self) {
        for entry in &mut self.entries {
            entry.dirty = false;
            entry.touched = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_marks_active_without_submissions() {
        let mut views = ViewSet::new();
        views.touch(ViewId::new(3));
        let active = views.active_ids(&[]);
        assert_eq!(active, vec![ViewId::new(3)]);
    }

    #[test]
    fn config_change_marks_active() {
        let mut views = ViewSet::new();
        views.state_mut(ViewId::new(7)).clear_color = 0x6495_edff;
        assert_eq!(views.active_ids(&[]), vec![ViewId::new(7)]);
    }

    #[test]
    fn active_ids_are_ascending() {
        let mut views = ViewSet::new();
        views.touch(ViewId::new(200));
        views.touch(ViewId::new(5));
        views.touch(ViewId::new(42));
        let ids: Vec<u16> = views.active_ids(&[]).iter().map(|v| v.index()).collect();
        assert_eq!(ids, vec![5, 42, 200]);
    }

    #[test]
    fn end_frame_clears_activity_but_keeps_config() {
        let mut views = ViewSet::new();
        views.state_mut(ViewId::new(1)).mode = ViewMode::Sequential;
        views.touch(ViewId::new(1));
        views.end_frame();
        assert!(views.active_ids(&[]).is_empty());
        assert_eq!(views.mode(ViewId::new(1)), ViewMode::Sequential);
    }

    #[test]
    #[should_panic(expected = "view id out of range")]
    fn view_id_range_is_enforced() {
        let _ = ViewId::new(256);
    }
}
