//! Ackley function.
//!
//! ```text
//! f(x) = −a exp(−b √(Σ x_i² / M)) − exp(Σ cos(c x_i) / M) + a + e
//! ```
//!
//! Multimodal with a single global minimum f(0) = 0; used for metamodeling
//! and optimization benchmarks in any dimension M.
//!
//! Reference: Ackley (1987), *A Connectionist Machine for Genetic
//! Hillclimbing*, Kluwer.

use std::f64::consts::{E, PI};

use ndarray::{Array2, ArrayView2};

use super::{require_dimension, scalar_output, unknown_selection};
use crate::distributions::DistributionKind;
use crate::error::Result;
use crate::input_spec::{MarginalSpec, ProbInputSpec};
use crate::parameters::FunParams;
use crate::prob_input::ProbabilisticInput;
use crate::test_function::{Formula, TestFunction};

pub const FUNCTION_ID: &str = "Ackley";
pub const TAGS: [&str; 2] = ["metamodeling", "optimization"];
pub const DEFAULT_DIMENSION: usize = 2;
pub const PARAMETER_SETS: [&str; 1] = ["ackley"];

pub fn prob_input_spec(dimension: usize) -> ProbInputSpec {
    ProbInputSpec::replicated(
        FUNCTION_ID,
        "Probabilistic input model for the Ackley function from Ackley (1987).",
        MarginalSpec::new(DistributionKind::Uniform, [-32.768, 32.768]),
        dimension,
    )
}

pub fn parameters(set: &str) -> Result<FunParams> {
    if set != PARAMETER_SETS[0] {
        return Err(unknown_selection(FUNCTION_ID, "parameter set", set, &PARAMETER_SETS));
    }
    Ok(FunParams::new()
        .declare("a", 20.0, None)
        .declare("b", 0.2, None)
        .declare("c", 2.0 * PI, None))
}

pub fn evaluate(xx: ArrayView2<'_, f64>, params: &FunParams) -> Result<Array2<f64>> {
    let a = params.number("a")?;
    let b = params.number("b")?;
    let c = params.number("c")?;
    let m = xx.ncols() as f64;
    Ok(scalar_output(xx.rows().into_iter().map(|x| {
        let mean_square = x.iter().map(|v| v * v).sum::<f64>() / m;
        let mean_cos = x.iter().map(|v| (c * v).cos()).sum::<f64>() / m;
        -a * (-b * mean_square.sqrt()).exp() - mean_cos.exp() + a + E
    })))
}

pub fn build(dimension: usize, seed: Option<u64>) -> Result<TestFunction> {
    require_dimension(FUNCTION_ID, dimension)?;
    let params = parameters(PARAMETER_SETS[0])?;
    let input = ProbabilisticInput::from_spec(&prob_input_spec(dimension), seed)?;
    Ok(TestFunction::new(FUNCTION_ID, input, params, evaluate.with_dimension(dimension))?
        .with_description("Ackley function from Ackley (1987)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_global_minimum() {
        for dimension in [1, 2, 10] {
            let f = build(dimension, Some(0)).unwrap();
            let y = f.evaluate(&Array2::zeros((1, dimension))).unwrap();
            assert!(y[[0, 0]].abs() < 1e-12, "M={dimension}: {}", y[[0, 0]]);
        }
    }

    #[test]
    fn test_positive_away_from_origin() {
        let mut f = build(4, Some(12)).unwrap();
        let xx = f.get_sample(200);
        assert!(f.evaluate(&xx).unwrap().iter().all(|&y| y > 0.0));
    }

    #[test]
    fn test_parameter_update() {
        let mut f = build(2, None).unwrap();
        let x = array![[1.0, -1.0]];
        let before = f.evaluate(&x).unwrap()[[0, 0]];
        f.set_parameter("a", 10.0).unwrap();
        let after = f.evaluate(&x).unwrap()[[0, 0]];
        assert!((before - after).abs() > 1e-3);
        assert!(parameters("rastrigin").is_err());
    }
}
