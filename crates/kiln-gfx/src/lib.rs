//! Kiln graphics wrapper crate.
//!
//! A safe, handle-based layer over a multi-backend GPU submission API:
//! resource registry, per-view pass state, 64-bit render-state packing,
//! frame-scoped transient buffers and a GUI draw-list translator. All work
//! queues between calls to [`context::Context::frame`], the single
//! synchronization point per frame.

pub mod backend;
pub mod context;
pub mod draw_list;
pub mod error;
pub mod flags;
pub mod frame;
pub mod handle;
pub mod layout;
pub mod logging;
pub mod state;
pub mod transform;
pub mod transient;
pub mod translate;
pub mod view;
