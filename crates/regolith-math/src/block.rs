//! Dense block matrix backed by `faer`.
//!
//! The contact-impulse solver assembles a `3k x 3k` inverse-mass matrix for
//! `k` simultaneous contacts and applies it repeatedly inside an RK4 loop.
//! `faer` provides the dense storage and the matrix-vector product; this
//! wrapper keeps the 3x3-block view the solver thinks in.

use faer::Mat;

use crate::{Mat3, Vec3};

/// A square matrix of 3x3 blocks.
pub struct BlockMat3 {
    inner: Mat<f64>,
    blocks: usize,
}

impl BlockMat3 {
    /// Creates a zero matrix of `blocks x blocks` 3x3 blocks.
    pub fn zeros(blocks: usize) -> Self {
        Self {
            inner: Mat::zeros(3 * blocks, 3 * blocks),
            blocks,
        }
    }

    /// Number of 3x3 blocks per side.
    #[inline]
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Scalar dimension (`3 * blocks`).
    #[inline]
    pub fn dim(&self) -> usize {
        3 * self.blocks
    }

    /// Writes the 3x3 block at block-row `bi`, block-column `bj`.
    pub fn set_block(&mut self, bi: usize, bj: usize, block: Mat3) {
        debug_assert!(bi < self.blocks && bj < self.blocks);
        for c in 0..3 {
            let col = block.col(c);
            for r in 0..3 {
                self.inner[(3 * bi + r, 3 * bj + c)] = col[r];
            }
        }
    }

    /// Reads back the 3x3 block at block-row `bi`, block-column `bj`.
    pub fn block(&self, bi: usize, bj: usize) -> Mat3 {
        debug_assert!(bi < self.blocks && bj < self.blocks);
        let col = |c: usize| {
            Vec3::new(
                self.inner[(3 * bi, 3 * bj + c)],
                self.inner[(3 * bi + 1, 3 * bj + c)],
                self.inner[(3 * bi + 2, 3 * bj + c)],
            )
        };
        Mat3::from_cols(col(0), col(1), col(2))
    }

    /// Dense matrix-vector product `self * rhs`.
    ///
    /// `rhs` must have length `dim()`.
    pub fn mul_vec(&self, rhs: &[f64]) -> Vec<f64> {
        debug_assert_eq!(rhs.len(), self.dim());
        let x: Mat<f64> = Mat::from_fn(self.dim(), 1, |i, _| rhs[i]);
        let y = &self.inner * &x;
        (0..self.dim()).map(|i| y[(i, 0)]).collect()
    }
}
