//! Shared evaluation helpers for smoothing kernels
use crate::traits::SmoothingKernel;
use crate::types::EvalType;
use num::{Float, Zero};

/// Panic unless sources, targets, charges and result have consistent lengths.
pub(crate) fn check_dimensions_evaluate<K: SmoothingKernel>(
    kernel: &K,
    eval_type: EvalType,
    sources: &[K::T],
    targets: &[K::T],
    charges: &[K::T],
    result: &[K::T],
) {
    assert!(
        sources.len() % kernel.space_dimension() == 0,
        "Length of sources {} is not a multiple of space dimension {}.",
        sources.len(),
        kernel.space_dimension()
    );

    assert!(
        targets.len() % kernel.space_dimension() == 0,
        "Length of targets {} is not a multiple of space dimension {}.",
        targets.len(),
        kernel.space_dimension()
    );

    let nsources = sources.len() / kernel.space_dimension();
    let ntargets = targets.len() / kernel.space_dimension();

    assert_eq!(
        charges.len(),
        nsources,
        "Wrong dimension for `charges`. {} != {} ",
        charges.len(),
        nsources,
    );

    assert_eq!(
        result.len(),
        kernel.range_component_count(eval_type) * ntargets,
        "Wrong dimension for `result`. {} != {} ",
        result.len(),
        ntargets * kernel.range_component_count(eval_type),
    );
}

/// Sum the interactions of all sources with one target into `result`.
pub(crate) fn evaluate_one_target<K: SmoothingKernel>(
    kernel: &K,
    eval_type: EvalType,
    target: [K::T; 2],
    sources: &[K::T],
    charges: &[K::T],
    result: &mut [K::T],
) {
    let nsources = charges.len();
    let support = kernel.support_radius();

    match eval_type {
        EvalType::Value => {
            let mut my_result = K::T::zero();
            for (index, charge) in charges.iter().enumerate() {
                let diff0 = target[0] - sources[index];
                let diff1 = target[1] - sources[nsources + index];
                let r = diff0.hypot(diff1);
                if r <= support {
                    my_result = my_result + *charge * kernel.value(r);
                }
            }
            result[0] = my_result;
        }
        EvalType::ValueDeriv => {
            let mut my_result0 = K::T::zero();
            let mut my_result1 = K::T::zero();
            let mut my_result2 = K::T::zero();

            for (index, charge) in charges.iter().enumerate() {
                let diff0 = target[0] - sources[index];
                let diff1 = target[1] - sources[nsources + index];
                let r = diff0.hypot(diff1);
                if r > support {
                    continue;
                }
                let [grad0, grad1] = kernel.gradient([diff0, diff1]);

                my_result0 = my_result0 + *charge * kernel.value(r);
                my_result1 = my_result1 + *charge * grad0;
                my_result2 = my_result2 + *charge * grad1;
            }

            result[0] = my_result0;
            result[1] = my_result1;
            result[2] = my_result2;
        }
        EvalType::Laplacian => {
            let mut my_result = K::T::zero();
            for (index, charge) in charges.iter().enumerate() {
                let diff0 = target[0] - sources[index];
                let diff1 = target[1] - sources[nsources + index];
                let r = diff0.hypot(diff1);
                if r <= support {
                    my_result = my_result + *charge * kernel.laplacian(r);
                }
            }
            result[0] = my_result;
        }
    }
}
