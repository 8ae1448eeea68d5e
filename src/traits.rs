//! Trait definitions
use crate::types::{EvalType, RealScalar};

/// Interface to evaluating compactly supported smoothing kernels.
pub trait SmoothingKernel {
    /// Scalar type
    type T: RealScalar;

    /// The smoothing length `h`.
    fn smoothing_length(&self) -> Self::T;

    /// Radius beyond which the kernel vanishes.
    fn support_radius(&self) -> Self::T;

    /// Return the space dimension.
    fn space_dimension(&self) -> usize;

    /// Kernel value at distance `r`.
    fn value(&self, r: Self::T) -> Self::T;

    /// Kernel gradient with respect to the displacement `(x, y)`.
    fn gradient(&self, displacement: [Self::T; 2]) -> [Self::T; 2];

    /// Kernel Laplacian at distance `r`.
    fn laplacian(&self, r: Self::T) -> Self::T;

    /// Return the range component count of the kernel.
    ///
    /// This is `1` for [EvalType::Value] and [EvalType::Laplacian], and
    /// `1 + space_dimension` for [EvalType::ValueDeriv].
    fn range_component_count(&self, eval_type: EvalType) -> usize;

    /// Single threaded evaluation of kernel sums.
    ///
    /// - `eval_type`: What to compute per target, see [EvalType].
    /// - `sources`: A slice defining the source points. The points must be given in the form
    ///            `[x_1, x_2, ... x_N, y_1, y_2, ..., y_N]`, that is
    ///            the value for each dimension must be continuously contained in the slice.
    /// - `targets`: A slice defining the targets. The memory layout is the same as for sources.
    /// - `charges`: A slice defining the charges. For each source point there needs to be one charge.
    /// - `result`: The result array. For each target it contains
    ///           [SmoothingKernel::range_component_count] consecutive values. Gradients
    ///           are taken with respect to the target position.
    ///
    /// ```
    /// use sph_kernels::kernel::WendlandKernel2d;
    /// use sph_kernels::traits::SmoothingKernel;
    /// use sph_kernels::types::EvalType;
    ///
    /// let kernel = WendlandKernel2d::<f64>::new(1.0);
    /// let sources = [0.0, 0.5, 0.0, 0.0];
    /// let targets = [0.0, 0.0];
    /// let charges = [1.0, 1.0];
    /// let mut result = [0.0; 3];
    ///
    /// kernel.evaluate_st(EvalType::ValueDeriv, &sources, &targets, &charges, &mut result);
    /// println!("Value {} and gradient ({}, {})", result[0], result[1], result[2]);
    /// ```
    fn evaluate_st(
        &self,
        eval_type: EvalType,
        sources: &[Self::T],
        targets: &[Self::T],
        charges: &[Self::T],
        result: &mut [Self::T],
    );

    /// Multi-threaded evaluation of kernel sums.
    ///
    /// The method parallelizes over the given targets on the global Rayon pool.
    fn evaluate_mt(
        &self,
        eval_type: EvalType,
        sources: &[Self::T],
        targets: &[Self::T],
        charges: &[Self::T],
        result: &mut [Self::T],
    );
}
