//! Ishigami function.
//!
//! ```text
//! f(x) = sin(x1) + a sin²(x2) + b x3⁴ sin(x1),    x_i ~ U(−π, π)
//! ```
//!
//! Highly non-linear and non-monotonic; a standard benchmark for global
//! sensitivity analysis because its variance decomposition is known in
//! closed form.
//!
//! References:
//! - Ishigami & Homma (1991), "An importance quantification technique in
//!   uncertainty analysis for computer models", *ISUMA '90*, pp. 398–403.
//! - Sobol' & Levitan (1999), "On the use of variance reducing multipliers
//!   in Monte Carlo computations of a global sensitivity index",
//!   *Computer Physics Communications* 117(1), pp. 52–61.

use std::f64::consts::PI;

use ndarray::{Array2, ArrayView2};

use super::{require_columns, scalar_output, unknown_selection};
use crate::distributions::DistributionKind;
use crate::error::Result;
use crate::input_spec::{MarginalSpec, ProbInputSpec};
use crate::parameters::FunParams;
use crate::prob_input::ProbabilisticInput;
use crate::test_function::{Formula, TestFunction};

pub const FUNCTION_ID: &str = "Ishigami";
pub const SPATIAL_DIMENSION: usize = 3;
pub const TAGS: [&str; 2] = ["metamodeling", "sensitivity"];
pub const PARAMETER_SETS: [&str; 2] = ["ishigami-1991", "sobol-levitan-1999"];
pub const DEFAULT_PARAMETER_SET: &str = "ishigami-1991";

pub fn prob_input_spec() -> ProbInputSpec {
    ProbInputSpec::replicated(
        FUNCTION_ID,
        "Probabilistic input model for the Ishigami function from Ishigami and Homma (1991).",
        MarginalSpec::new(DistributionKind::Uniform, [-PI, PI]),
        SPATIAL_DIMENSION,
    )
}

/// Parameters `a` and `b` of a published set.
pub fn parameters(set: &str) -> Result<FunParams> {
    let (a, b) = match set {
        "ishigami-1991" => (7.0, 0.05),
        "sobol-levitan-1999" => (7.0, 0.1),
        _ => return Err(unknown_selection(FUNCTION_ID, "parameter set", set, &PARAMETER_SETS)),
    };
    Ok(FunParams::new()
        .declare("a", a, Some("coefficient of the sin²(x2) term"))
        .declare("b", b, Some("coefficient of the x3⁴ sin(x1) term")))
}

pub fn evaluate(xx: ArrayView2<'_, f64>, params: &FunParams) -> Result<Array2<f64>> {
    require_columns(&xx, SPATIAL_DIMENSION)?;
    let a = params.number("a")?;
    let b = params.number("b")?;
    Ok(scalar_output(xx.rows().into_iter().map(|x| {
        let sin_x1 = x[0].sin();
        sin_x1 + a * x[1].sin().powi(2) + b * x[2].powi(4) * sin_x1
    })))
}

/// Builds the function with a parameter set (default `ishigami-1991`) and
/// input streams reset from `seed`.
pub fn build(parameter_set: Option<&str>, seed: Option<u64>) -> Result<TestFunction> {
    let params = parameters(parameter_set.unwrap_or(DEFAULT_PARAMETER_SET))?;
    let input = ProbabilisticInput::from_spec(&prob_input_spec(), seed)?;
    Ok(TestFunction::new(FUNCTION_ID, input, params, evaluate.with_dimension(SPATIAL_DIMENSION))?
        .with_description("Ishigami function from Ishigami and Homma (1991)"))
}

/// E[f] = a / 2.
pub fn mean(a: f64) -> f64 {
    0.5 * a
}

/// Var[f] = a²/8 + bπ⁴/5 + b²π⁸/18 + 1/2.
pub fn variance(a: f64, b: f64) -> f64 {
    a * a / 8.0 + b * PI.powi(4) / 5.0 + b * b * PI.powi(8) / 18.0 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;
    use ndarray::array;

    #[test]
    fn test_known_values() {
        let f = build(None, Some(1)).unwrap();
        let yy = f
            .evaluate(&array![[0.0, 0.0, 0.0], [PI / 2.0, PI / 2.0, 1.0]])
            .unwrap();
        assert_eq!(yy[[0, 0]], 0.0);
        assert!((yy[[1, 0]] - (1.0 + 7.0 + 0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_parameter_sets() {
        for set in PARAMETER_SETS {
            assert!(parameters(set).is_ok());
        }
        assert_eq!(parameters("sobol-levitan-1999").unwrap().number("b").unwrap(), 0.1);
        assert!(build(Some("marrel-2009"), None).is_err());
    }

    #[test]
    fn test_out_of_domain_rejected() {
        let f = build(None, None).unwrap();
        assert!(f.evaluate(&array![[0.0, 4.0, 0.0]]).is_err());
    }

    #[test]
    fn test_sample_moments() {
        let mut f = build(Some("sobol-levitan-1999"), Some(42)).unwrap();
        let xx = f.get_sample(20_000);
        let yy = f.evaluate(&xx).unwrap().column(0).to_vec();
        let m = stats::mean(&yy).unwrap();
        let v = stats::variance(&yy).unwrap();
        assert!((m - mean(7.0)).abs() < 0.15, "mean {m}");
        assert!((v - variance(7.0, 0.1)).abs() / variance(7.0, 0.1) < 0.05, "variance {v}");
    }

    #[test]
    fn test_analytical_variance() {
        assert!((variance(7.0, 0.05) - 8.916942440349827).abs() < 1e-12);
    }
}
