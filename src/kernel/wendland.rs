//! Implementation of the Wendland C2 kernel in two dimensions
use crate::kernel::{check_dimensions_evaluate, evaluate_one_target};
use crate::traits::SmoothingKernel;
use crate::types::{EvalType, RealScalar};
use log::warn;
use rayon::prelude::*;

/// The Wendland C2 kernel in two dimensions.
///
/// `W(r) = 7/(4 pi h^2) * (1 - q/2)^4 * (2q + 1)` with `q = r/h`, and zero
/// for `q > 2`. Gradient and Laplacian use the derived closed forms
/// `5 (q - 2)^3 / (8 h^2) * (x, y)` and `5 (q - 2)^2 (5q - 4) / (8 h^2)`,
/// both scaled by the normalization constant.
#[derive(Clone, Copy, Debug)]
pub struct WendlandKernel2d<T: RealScalar> {
    smoothing_length: T,
    alpha: T,
}

impl<T: RealScalar> WendlandKernel2d<T> {
    /// Create a new kernel with smoothing length `h`.
    pub fn new(smoothing_length: T) -> Self {
        if smoothing_length <= T::zero() {
            warn!(
                "Wendland kernel created with non-positive smoothing length {:?}",
                smoothing_length
            );
        }
        let alpha = T::from(7.0).unwrap()
            / (T::from(4.0).unwrap() * T::PI() * smoothing_length * smoothing_length);
        Self {
            smoothing_length,
            alpha,
        }
    }

    /// The normalization constant `7/(4 pi h^2)`.
    pub fn alpha(&self) -> T {
        self.alpha
    }

    fn normalized_radius(&self, r: T) -> T {
        r / self.smoothing_length
    }

    /// Common factor `alpha * 5 / (8 h^2)` of the derivatives.
    fn derivative_scale(&self) -> T {
        self.alpha * T::from(5.0).unwrap()
            / (T::from(8.0).unwrap() * self.smoothing_length * self.smoothing_length)
    }
}

impl<T: RealScalar> SmoothingKernel for WendlandKernel2d<T> {
    type T = T;

    fn smoothing_length(&self) -> T {
        self.smoothing_length
    }

    fn support_radius(&self) -> T {
        T::from(2.0).unwrap() * self.smoothing_length
    }

    fn space_dimension(&self) -> usize {
        2
    }

    fn value(&self, r: T) -> T {
        let two = T::from(2.0).unwrap();
        let q = self.normalized_radius(r);
        if q > two {
            return T::zero();
        }
        self.alpha * (T::one() - q / two).powi(4) * (two * q + T::one())
    }

    fn gradient(&self, displacement: [T; 2]) -> [T; 2] {
        let two = T::from(2.0).unwrap();
        let q = self.normalized_radius(displacement[0].hypot(displacement[1]));
        if q > two {
            return [T::zero(), T::zero()];
        }
        let factor = self.derivative_scale() * (q - two).powi(3);
        [factor * displacement[0], factor * displacement[1]]
    }

    fn laplacian(&self, r: T) -> T {
        let two = T::from(2.0).unwrap();
        let q = self.normalized_radius(r);
        if q > two {
            return T::zero();
        }
        let five = T::from(5.0).unwrap();
        let four = T::from(4.0).unwrap();
        self.derivative_scale() * (q - two).powi(2) * (five * q - four)
    }

    fn range_component_count(&self, eval_type: EvalType) -> usize {
        match eval_type {
            EvalType::Value => 1,
            EvalType::ValueDeriv => 1 + self.space_dimension(),
            EvalType::Laplacian => 1,
        }
    }

    fn evaluate_st(
        &self,
        eval_type: EvalType,
        sources: &[T],
        targets: &[T],
        charges: &[T],
        result: &mut [T],
    ) {
        check_dimensions_evaluate(self, eval_type, sources, targets, charges, result);
        let ntargets = targets.len() / self.space_dimension();
        let range_dim = self.range_component_count(eval_type);

        result
            .chunks_exact_mut(range_dim)
            .enumerate()
            .for_each(|(target_index, my_chunk)| {
                let target = [targets[target_index], targets[ntargets + target_index]];
                evaluate_one_target(self, eval_type, target, sources, charges, my_chunk)
            });
    }

    fn evaluate_mt(
        &self,
        eval_type: EvalType,
        sources: &[T],
        targets: &[T],
        charges: &[T],
        result: &mut [T],
    ) {
        check_dimensions_evaluate(self, eval_type, sources, targets, charges, result);
        let ntargets = targets.len() / self.space_dimension();
        let range_dim = self.range_component_count(eval_type);

        result
            .par_chunks_exact_mut(range_dim)
            .enumerate()
            .for_each(|(target_index, my_chunk)| {
                let target = [targets[target_index], targets[ntargets + target_index]];
                evaluate_one_target(self, eval_type, target, sources, charges, my_chunk)
            });
    }
}
