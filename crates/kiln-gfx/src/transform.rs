//! Blocks of 4×4 transform matrices.
//!
//! Replaces the native API's raw matrix memory with a bounds-checked
//! container. Every slot starts as identity; index 0 is the conventional
//! default write target.

/// Column-major identity matrix.
pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// A contiguous array of 4×4 matrices (16 floats each).
#[derive(Debug, Clone, PartialEq)]
pub struct TransformBlock {
    matrices: Vec<[f32; 16]>,
}

impl TransformBlock {
    /// Allocates `count` matrices, all identity.
    pub fn new(count: u16) -> Self {
        Self {
            matrices: vec![IDENTITY; count as usize],
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.matrices.len()
    }

    /// Bounds-checked read access.
    pub fn matrix(&self, index: usize) -> Option<&[f32; 16]> {
        self.matrices.get(index)
    }

    /// Bounds-checked write access.
    pub fn matrix_mut(&mut self, index: usize) -> Option<&mut [f32; 16]> {
        self.matrices.get_mut(index)
    }

    /// All matrices as one flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.matrices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_as_identity() {
        let block = TransformBlock::new(3);
        assert_eq!(block.count(), 3);
        assert_eq!(block.matrix(0), Some(&IDENTITY));
        assert_eq!(block.matrix(2), Some(&IDENTITY));
    }

    #[test]
    fn out_of_range_access_is_none() {
        let mut block = TransformBlock::new(2);
        assert!(block.matrix(2).is_none());
        assert!(block.matrix_mut(5).is_none());
    }

    #[test]
    fn writes_land_in_the_flat_view() {
        let mut block = TransformBlock::new(2);
        block.matrix_mut(1).unwrap()[12] = 4.5;
        assert_eq!(block.as_floats()[16 + 12], 4.5);
        assert_eq!(block.as_floats().len(), 32);
    }
}
