//! Per-frame transient buffer arena.
//!
//! All transient vertex and index buffers in a frame share one byte budget.
//! Allocation is bump-only; the whole arena is reclaimed at the frame
//! boundary. Each buffer carries the generation it was allocated in, and
//! every access checks it against the arena's current generation, so stale
//! (use-after-frame) access fails deterministically instead of reading
//! reclaimed memory.

use crate::error::TransientError;
use crate::layout::VertexLayout;

/// Allocation alignment within the arena.
const ALIGN: usize = 16;

/// Bytes per index (indices are 16-bit).
pub const INDEX_STRIDE: u16 = 2;

/// Frame-scoped vertex buffer: a range of the arena plus its layout stride.
///
/// A zero-capacity buffer (`is_empty()`) means the per-frame budget was
/// exhausted; check before writing and skip the draw if empty.
#[derive(Debug, Copy, Clone)]
pub struct TransientVertexBuffer {
    pub(crate) offset: usize,
    num: u32,
    stride: u16,
    generation: u64,
}

impl TransientVertexBuffer {
    /// Number of vertices this buffer holds.
    #[inline]
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Bytes per vertex.
    #[inline]
    pub fn stride(&self) -> u16 {
        self.stride
    }

    /// Allocated size in bytes.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.num as usize * self.stride as usize
    }

    /// True if the allocation failed for lack of frame budget.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num == 0
    }

    /// Frame generation this buffer belongs to.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Frame-scoped index buffer (16-bit indices).
#[derive(Debug, Copy, Clone)]
pub struct TransientIndexBuffer {
    pub(crate) offset: usize,
    num: u32,
    generation: u64,
}

impl TransientIndexBuffer {
    /// Number of indices this buffer holds.
    #[inline]
    pub fn num(&self) -> u32 {
        self.num
    }

    /// Allocated size in bytes.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.num as usize * INDEX_STRIDE as usize
    }

    /// True if the allocation failed for lack of frame budget.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num == 0
    }

    /// Frame generation this buffer belongs to.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The shared per-frame arena.
#[derive(Debug)]
pub struct TransientArena {
    bytes: Vec<u8>,
    used: usize,
    generation: u64,
}

impl TransientArena {
    pub(crate) fn new(budget: usize) -> Self {
        Self {
            bytes: vec![0; budget],
            used: 0,
            generation: 0,
        }
    }

    /// Bytes still available this frame.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.used
    }

    /// Current frame generation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Allocates vertex space from the frame budget.
    ///
    /// Returns a zero-capacity buffer when `num * stride` does not fit in
    /// the remaining budget. This is not an error; callers must check
    /// [`TransientVertexBuffer::is_empty`] and skip the draw.
    pub fn alloc_vertex(&mut self, num: u32, layout: &VertexLayout) -> TransientVertexBuffer {
        let stride = layout.stride();
        let (offset, num) = self.bump(num, stride as usize);
        TransientVertexBuffer {
            offset,
            num,
            stride,
            generation: self.generation,
        }
    }

    /// Allocates index space from the frame budget.
    ///
    /// Same zero-capacity contract as [`alloc_vertex`](Self::alloc_vertex).
    pub fn alloc_index(&mut self, num: u32) -> TransientIndexBuffer {
        let (offset, num) = self.bump(num, INDEX_STRIDE as usize);
        TransientIndexBuffer {
            offset,
            num,
            generation: self.generation,
        }
    }

    fn bump(&mut self, num: u32, stride: usize) -> (usize, u32) {
        let offset = self.used.next_multiple_of(ALIGN);
        let size = num as usize * stride;
        if size == 0 || offset + size > self.bytes.len() {
            if size > 0 {
                log::warn!(
                    "transient allocation of {size} bytes exceeds remaining frame budget ({} bytes)",
                    self.remaining()
                );
            }
            return (self.used, 0);
        }
        self.used = offset + size;
        (offset, num)
    }

    /// Copies vertex bytes into `buffer`, starting at offset 0.
    pub fn copy_into_vertices(
        &mut self,
        buffer: &TransientVertexBuffer,
        data: &[u8],
    ) -> Result<(), TransientError> {
        self.copy_into(buffer.offset, buffer.capacity_bytes(), buffer.generation, data)
    }

    /// Copies indices into `buffer`, starting at offset 0.
    pub fn copy_into_indices(
        &mut self,
        buffer: &TransientIndexBuffer,
        data: &[u16],
    ) -> Result<(), TransientError> {
        self.copy_into(
            buffer.offset,
            buffer.capacity_bytes(),
            buffer.generation,
            bytemuck::cast_slice(data),
        )
    }

    fn copy_into(
        &mut self,
        offset: usize,
        capacity: usize,
        allocated: u64,
        data: &[u8],
    ) -> Result<(), TransientError> {
        if allocated != self.generation {
            return Err(TransientError::StaleFrame {
                allocated,
                current: self.generation,
            });
        }
        if data.len() > capacity {
            return Err(TransientError::OutOfBounds {
                requested: data.len(),
                capacity,
            });
        }
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Read-back of a buffer's bytes, for the frame flush.
    pub(crate) fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    /// Reclaims the whole arena and starts the next generation. Every
    /// buffer allocated before this call is void afterwards.
    pub(crate) fn reset(&mut self) {
        self.used = 0;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{Attrib, AttribType};

    fn small_layout() -> VertexLayout {
        // 8-byte stride keeps the arithmetic readable.
        VertexLayout::builder()
            .add(Attrib::Position, 2, AttribType::Float, false)
            .build()
    }

    #[test]
    fn alloc_within_budget_succeeds() {
        let mut arena = TransientArena::new(1024);
        let tvb = arena.alloc_vertex(4, &small_layout());
        assert!(!tvb.is_empty());
        assert_eq!(tvb.num(), 4);
        assert_eq!(tvb.capacity_bytes(), 32);
    }

    #[test]
    fn exhaustion_returns_zero_capacity() {
        let mut arena = TransientArena::new(64);
        let tvb = arena.alloc_vertex(100, &small_layout());
        assert!(tvb.is_empty());
        assert_eq!(tvb.capacity_bytes(), 0);
        // The failed allocation consumed nothing.
        assert_eq!(arena.remaining(), 64);
    }

    #[test]
    fn copy_into_zero_capacity_is_rejected() {
        let mut arena = TransientArena::new(16);
        let tib = arena.alloc_index(100);
        assert!(tib.is_empty());
        let err = arena.copy_into_indices(&tib, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            TransientError::OutOfBounds {
                requested: 6,
                capacity: 0
            }
        );
    }

    #[test]
    fn oversized_copy_is_rejected_before_writing() {
        let mut arena = TransientArena::new(1024);
        let tib = arena.alloc_index(2);
        let err = arena.copy_into_indices(&tib, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            TransientError::OutOfBounds {
                requested: 6,
                capacity: 4
            }
        );
        // Nothing was written.
        assert_eq!(arena.slice(tib.offset, 4), &[0, 0, 0, 0]);
    }

    #[test]
    fn stale_buffer_is_rejected_after_reset() {
        let mut arena = TransientArena::new(1024);
        let tib = arena.alloc_index(3);
        arena.copy_into_indices(&tib, &[7, 8, 9]).unwrap();

        arena.reset();
        let err = arena.copy_into_indices(&tib, &[1]).unwrap_err();
        assert_eq!(
            err,
            TransientError::StaleFrame {
                allocated: 0,
                current: 1
            }
        );
    }

    #[test]
    fn reset_reclaims_the_whole_budget() {
        let mut arena = TransientArena::new(128);
        arena.alloc_index(32); // 64 bytes
        assert!(arena.remaining() < 128);
        arena.reset();
        assert_eq!(arena.remaining(), 128);
        let tib = arena.alloc_index(32);
        assert!(!tib.is_empty());
    }

    #[test]
    fn allocations_are_aligned() {
        let mut arena = TransientArena::new(1024);
        arena.alloc_index(3); // 6 bytes
        let tvb = arena.alloc_vertex(1, &small_layout());
        assert_eq!(tvb.offset % ALIGN, 0);
    }

    #[test]
    fn vertex_copy_round_trips_bytes() {
        let mut arena = TransientArena::new(256);
        let tvb = arena.alloc_vertex(2, &small_layout());
        let data: Vec<u8> = (0..16).collect();
        arena.copy_into_vertices(&tvb, &data).unwrap();
        assert_eq!(arena.slice(tvb.offset, 16), &data[..]);
    }
}
