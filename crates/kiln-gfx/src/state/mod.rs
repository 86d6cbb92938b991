//! Pipeline-state bit packing.
//!
//! The backend consumes a single 64-bit render-state word and a 32-bit
//! stencil word. Both are composed from disjoint bit fields, so combining
//! settings is always plain bitwise OR and every field decodes back to the
//! exact value that was encoded.

mod render;
mod stencil;

pub use render::{BlendEquation, BlendFactor, CullMode, DepthTest, RenderState, Topology};
pub use stencil::{StencilOp, StencilState, StencilTest};
