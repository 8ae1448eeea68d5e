use approx::assert_relative_eq;
use rand::prelude::*;
use sph_kernels::derivation::KernelDerivation;
use sph_kernels::kernel::WendlandKernel2d;
use sph_kernels::quadrature::{gauss_legendre_rule, radial_integral};
use sph_kernels::symbolic::{EvaluationPoint, Expr};
use sph_kernels::traits::SmoothingKernel;
use std::collections::BTreeMap;

fn cartesian_point(derivation: &KernelDerivation, x: Expr, y: Expr, h: Expr) -> EvaluationPoint {
    let symbols = derivation.definition().symbols();
    EvaluationPoint::new()
        .with(&symbols.x, x)
        .with(&symbols.y, y)
        .with(&symbols.h, h)
}

#[test]
fn test_closed_forms_reproduce_cartesian_derivatives() {
    let derivation = KernelDerivation::default();
    let symbols = derivation.definition().symbols();

    let point = derivation
        .default_point()
        .with(&symbols.big_q, Expr::integer(5).sqrt() / 10);
    let alpha = point.evaluate(derivation.alpha()).unwrap();

    for expr in [
        derivation.grad_x(),
        derivation.grad_y(),
        derivation.laplacian(),
    ] {
        let closed_form = derivation.normalized(expr).unwrap();
        assert_relative_eq!(
            alpha * point.evaluate(&closed_form).unwrap(),
            point.evaluate(expr).unwrap(),
            max_relative = 1e-9
        );
    }
}

#[test]
fn test_gradient_symmetry() {
    let derivation = KernelDerivation::default();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..10 {
        let a = Expr::rational(rng.gen_range(1..40), 7);
        let b = Expr::rational(rng.gen_range(1..40), 11);
        let h = Expr::integer(5);

        let forward = cartesian_point(&derivation, a.clone(), b.clone(), h.clone());
        let swapped = cartesian_point(&derivation, b, a, h);

        assert_relative_eq!(
            forward.evaluate(derivation.grad_x()).unwrap(),
            swapped.evaluate(derivation.grad_y()).unwrap(),
            max_relative = 1e-12
        );
    }
}

#[test]
fn test_laplacian_matches_second_differences() {
    let derivation = KernelDerivation::default();
    let symbols = derivation.definition().symbols();
    let kernel = WendlandKernel2d::<f64>::new(1.0);
    let delta = 1e-3;

    let cartesian = |x: f64, y: f64| {
        let values = BTreeMap::from([
            (symbols.x.clone(), x),
            (symbols.y.clone(), y),
            (symbols.h.clone(), 1.0),
        ]);
        derivation.cartesian().evalf(&values).unwrap()
    };

    for (x, y) in [(0.3, 0.4), (0.9, 0.2), (0.5, 1.1), (1.2, 0.7)] {
        let center = cartesian(x, y);
        let finite_difference = (cartesian(x + delta, y) + cartesian(x - delta, y)
            + cartesian(x, y + delta)
            + cartesian(x, y - delta)
            - 4.0 * center)
            / (delta * delta);

        let point = cartesian_point(
            &derivation,
            Expr::rational((x * 10.0) as i64, 10),
            Expr::rational((y * 10.0) as i64, 10),
            Expr::one(),
        );
        let laplacian = point.evaluate(derivation.laplacian()).unwrap();

        assert_relative_eq!(finite_difference, laplacian, epsilon = 1e-4);
        assert_relative_eq!(
            kernel.laplacian(f64::hypot(x, y)),
            laplacian,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_laplacian_is_divergence_of_gradient_field() {
    let derivation = KernelDerivation::default();
    let symbols = derivation.definition().symbols();
    let delta = 1e-4;

    let evaluate = |expr: &Expr, x: f64, y: f64| {
        let values = BTreeMap::from([
            (symbols.x.clone(), x),
            (symbols.y.clone(), y),
            (symbols.h.clone(), 1.0),
        ]);
        expr.evalf(&values).unwrap()
    };

    for (x, y) in [(0.3, 0.4), (0.9, 0.2), (0.5, 1.1), (1.2, 0.7)] {
        let d_grad_x = (evaluate(derivation.grad_x(), x + delta, y)
            - evaluate(derivation.grad_x(), x - delta, y))
            / (2.0 * delta);
        let d_grad_y = (evaluate(derivation.grad_y(), x, y + delta)
            - evaluate(derivation.grad_y(), x, y - delta))
            / (2.0 * delta);

        assert_relative_eq!(
            d_grad_x + d_grad_y,
            evaluate(derivation.laplacian(), x, y),
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_boundary_of_support() {
    let derivation = KernelDerivation::default();
    let symbols = derivation.definition().symbols();

    let point = EvaluationPoint::new()
        .with(&symbols.r, Expr::integer(20))
        .with(&symbols.h, Expr::integer(10));
    assert_relative_eq!(derivation.kernel_value(&point).unwrap(), 0.0, epsilon = 1e-15);

    // (6, 8) lies at r = 2h for h = 5.
    let point = cartesian_point(&derivation, Expr::integer(6), Expr::integer(8), Expr::integer(5));
    assert_relative_eq!(
        point.evaluate(derivation.grad_x()).unwrap(),
        0.0,
        epsilon = 1e-15
    );
    assert_relative_eq!(
        point.evaluate(derivation.grad_y()).unwrap(),
        0.0,
        epsilon = 1e-15
    );
}

#[test]
fn test_normalization_by_quadrature() {
    let derivation = KernelDerivation::default();
    let symbols = derivation.definition().symbols();
    let rule = gauss_legendre_rule(6).unwrap();

    for h in [0.1, 1.0, 3.5] {
        let symbolic = radial_integral(
            |r| {
                let values = BTreeMap::from([(symbols.r.clone(), r), (symbols.h.clone(), h)]);
                derivation.kernel().evalf(&values).unwrap()
            },
            2.0 * h,
            &rule,
        );
        assert_relative_eq!(symbolic, 1.0, max_relative = 1e-13);

        let kernel = WendlandKernel2d::<f64>::new(h);
        let compiled = radial_integral(|r| kernel.value(r), kernel.support_radius(), &rule);
        assert_relative_eq!(compiled, 1.0, max_relative = 1e-13);
    }
}

#[test]
fn test_report_order() {
    let derivation = KernelDerivation::default();
    let report = derivation.report(&derivation.default_point()).unwrap();

    assert_relative_eq!(report.grad_x_value, -0.000195157614586787, max_relative = 1e-12);
    assert_relative_eq!(report.grad_y_value, -0.000390315229173573, max_relative = 1e-12);
    assert_relative_eq!(report.laplacian_value, -0.000316617746208086, max_relative = 1e-12);

    let text = report.to_string();
    let grad_x = text.find("Grad x:").unwrap();
    let grad_y = text.find("Grad y:").unwrap();
    let laplacian = text.find("laplacian_1 =").unwrap();
    assert!(grad_x < grad_y && grad_y < laplacian);
}
