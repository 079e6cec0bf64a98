//! Sobol'-G function.
//!
//! ```text
//! f(x) = ∏ (|4 x_i − 2| + a_i) / (1 + a_i),    x_i ~ U(0, 1)
//! ```
//!
//! The coefficients `a_i ≥ 0` set the importance of each input: small
//! values make an input important, large values make it negligible.
//! Every factor has unit mean, so E[f] = 1 for any choice of `a`.
//!
//! References:
//! - Sobol' (1998), "On quasi-Monte Carlo integrations", *Mathematics and
//!   Computers in Simulation* 47(2–5), pp. 103–112.
//! - Kucherenko et al. (2011), "The identification of model effective
//!   dimensions using global sensitivity analysis", *RESS* 96(4).
//! - Crestaux et al. (2007), "Polynomial chaos expansion for uncertainties
//!   quantification and sensitivity analysis", SAMO 2007.

use ndarray::{Array2, ArrayView2};

use super::{require_dimension, scalar_output, unknown_selection};
use crate::distributions::DistributionKind;
use crate::error::{Error, Result};
use crate::input_spec::{MarginalSpec, ProbInputSpec};
use crate::parameters::FunParams;
use crate::prob_input::ProbabilisticInput;
use crate::test_function::{Formula, TestFunction};

pub const FUNCTION_ID: &str = "Sobol-G";
pub const TAGS: [&str; 2] = ["integration", "sensitivity"];
/// Dimension used when the caller has no preference.
pub const DEFAULT_DIMENSION: usize = 2;
pub const PARAMETER_SETS: [&str; 7] = [
    "sobol-1",
    "sobol-2",
    "sobol-3",
    "sobol-4",
    "kucherenko-2a",
    "kucherenko-3b",
    "crestaux-2007",
];
pub const DEFAULT_PARAMETER_SET: &str = "crestaux-2007";

pub fn prob_input_spec(dimension: usize) -> ProbInputSpec {
    ProbInputSpec::replicated(
        FUNCTION_ID,
        "Probabilistic input model for the Sobol'-G function from Sobol' (1998).",
        MarginalSpec::new(DistributionKind::Uniform, [0.0, 1.0]),
        dimension,
    )
}

/// Coefficients `a` of a published set for `dimension` inputs.
pub fn coefficients(set: &str, dimension: usize) -> Result<Vec<f64>> {
    let index = |i: usize| (i + 1) as f64;
    let a = match set {
        "sobol-1" => vec![0.01; dimension],
        "sobol-2" => vec![1.0; dimension],
        "sobol-3" => (0..dimension).map(index).collect(),
        "sobol-4" => (0..dimension).map(|i| index(i).powi(2)).collect(),
        "kucherenko-2a" => (0..dimension)
            .map(|i| if i < 2 { 0.0 } else { 6.52 })
            .collect(),
        "kucherenko-3b" => vec![6.52; dimension],
        "crestaux-2007" => (0..dimension).map(|i| i as f64 / 2.0).collect(),
        _ => return Err(unknown_selection(FUNCTION_ID, "parameter set", set, &PARAMETER_SETS)),
    };
    Ok(a)
}

pub fn parameters(set: &str, dimension: usize) -> Result<FunParams> {
    Ok(FunParams::new().declare(
        "a",
        coefficients(set, dimension)?,
        Some("importance coefficients, one per input"),
    ))
}

pub fn evaluate(xx: ArrayView2<'_, f64>, params: &FunParams) -> Result<Array2<f64>> {
    let a = params.vector("a")?;
    if a.len() != xx.ncols() {
        return Err(Error::InvalidParameter(format!(
            "{FUNCTION_ID}: {} coefficients for {} inputs",
            a.len(),
            xx.ncols()
        )));
    }
    Ok(scalar_output(xx.rows().into_iter().map(|x| {
        x.iter()
            .zip(a)
            .map(|(&xi, &ai)| ((4.0 * xi - 2.0).abs() + ai) / (1.0 + ai))
            .product::<f64>()
    })))
}

/// Builds an M-dimensional Sobol'-G function.
///
/// # Errors
/// [`Error::InvalidParameter`] for `dimension == 0` or an unknown set.
pub fn build(
    dimension: usize,
    parameter_set: Option<&str>,
    seed: Option<u64>,
) -> Result<TestFunction> {
    require_dimension(FUNCTION_ID, dimension)?;
    let params = parameters(parameter_set.unwrap_or(DEFAULT_PARAMETER_SET), dimension)?;
    let input = ProbabilisticInput::from_spec(&prob_input_spec(dimension), seed)?;
    Ok(TestFunction::new(FUNCTION_ID, input, params, evaluate.with_dimension(dimension))?
        .with_description("Sobol'-G function from Sobol' (1998)"))
}

/// E[f] = 1.
pub fn mean(_a: &[f64]) -> f64 {
    1.0
}

/// Var[f] = ∏ (1 + V_i) − 1 with V_i = 1 / (3 (1 + a_i)²).
pub fn variance(a: &[f64]) -> f64 {
    a.iter()
        .map(|ai| 1.0 + 1.0 / (3.0 * (1.0 + ai).powi(2)))
        .product::<f64>()
        - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;
    use ndarray::array;

    #[test]
    fn test_coefficient_sets() {
        assert_eq!(coefficients("sobol-3", 3).unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(coefficients("sobol-4", 3).unwrap(), [1.0, 4.0, 9.0]);
        assert_eq!(
            coefficients("kucherenko-2a", 4).unwrap(),
            [0.0, 0.0, 6.52, 6.52]
        );
        assert_eq!(coefficients("crestaux-2007", 3).unwrap(), [0.0, 0.5, 1.0]);
        assert_eq!(coefficients("kucherenko-2a", 1).unwrap(), [0.0]);
        assert!(coefficients("sobol-9", 3).is_err());
    }

    #[test]
    fn test_center_and_corner() {
        let f = build(2, Some("sobol-2"), Some(0)).unwrap();
        // |4x - 2| = 0 at the centre and 2 at the corners
        let yy = f.evaluate(&array![[0.5, 0.5], [0.0, 1.0]]).unwrap();
        assert!((yy[[0, 0]] - 0.25).abs() < 1e-15);
        assert!((yy[[1, 0]] - 2.25).abs() < 1e-15);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(build(0, None, None).is_err());
    }

    #[test]
    fn test_coefficient_length_checked() {
        let mut f = build(3, None, None).unwrap();
        f.set_parameter("a", vec![1.0, 2.0]).unwrap();
        assert!(f.evaluate(&array![[0.1, 0.2, 0.3]]).is_err());
    }

    #[test]
    fn test_analytical_variance() {
        assert!((variance(&[0.0, 0.5, 1.0]) - 0.6584362139917694).abs() < 1e-14);
    }

    #[test]
    fn test_sample_moments() {
        let mut f = build(3, None, Some(2023)).unwrap();
        let xx = f.get_sample(20_000);
        let yy = f.evaluate(&xx).unwrap().column(0).to_vec();
        let a = f.parameters().vector("a").unwrap().to_vec();
        let m = stats::mean(&yy).unwrap();
        let v = stats::variance(&yy).unwrap();
        assert!((m - mean(&a)).abs() < 0.03, "mean {m}");
        assert!((v - variance(&a)).abs() / variance(&a) < 0.08, "variance {v}");
    }
}
