//! Vertex layout description.
//!
//! Layouts are plain values: the backend only ever sees them attached to a
//! transient vertex allocation, so there is no registry slot for them.

use crate::flags::{Attrib, AttribType};

/// One attribute within a [`VertexLayout`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttr {
    pub attrib: Attrib,
    /// Component count, 1–4.
    pub count: u8,
    pub ty: AttribType,
    /// Integer data is normalized to [0,1] when sampled.
    pub normalized: bool,
    /// Byte offset from the start of a vertex.
    pub offset: u16,
}

/// Ordered attribute list with a computed stride.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct VertexLayout {
    attrs: Vec<VertexAttr>,
    stride: u16,
}

impl VertexLayout {
    pub fn builder() -> VertexLayoutBuilder {
        VertexLayoutBuilder::default()
    }

    /// Bytes per vertex.
    #[inline]
    pub fn stride(&self) -> u16 {
        self.stride
    }

    #[inline]
    pub fn attrs(&self) -> &[VertexAttr] {
        &self.attrs
    }

    /// Looks up an attribute by semantic.
    pub fn attr(&self, attrib: Attrib) -> Option<&VertexAttr> {
        self.attrs.iter().find(|a| a.attrib == attrib)
    }
}

/// Builds a [`VertexLayout`] attribute by attribute; offsets are packed
/// tightly in declaration order.
#[derive(Debug, Default)]
pub struct VertexLayoutBuilder {
    attrs: Vec<VertexAttr>,
    offset: u16,
}

impl VertexLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, attrib: Attrib, count: u8, ty: AttribType, normalized: bool) -> Self {
        debug_assert!((1..=4).contains(&count), "attribute component count must be 1-4");
        self.attrs.push(VertexAttr {
            attrib,
            count,
            ty,
            normalized,
            offset: self.offset,
        });
        self.offset += count as u16 * ty.size();
        self
    }

    pub fn build(self) -> VertexLayout {
        VertexLayout {
            attrs: self.attrs,
            stride: self.offset,
        }
    }
}
