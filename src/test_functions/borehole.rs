//! Borehole function: water flow rate through a borehole between two
//! aquifers.
//!
//! ```text
//!                   2π Tu (Hu − Hl)
//! f(x) = ─────────────────────────────────────────────
//!        ln(r/rw) (1 + 2 L Tu / (ln(r/rw) rw² Kw) + Tu/Tl)
//! ```
//!
//! Two input models are published: the original one of Harper & Gupta
//! (1983), with a normal borehole radius and a lognormal radius of
//! influence, and the all-uniform variant of Morris et al. (1993).

use std::f64::consts::PI;

use ndarray::{Array2, ArrayView2};

use super::{require_columns, scalar_output, unknown_selection};
use crate::distributions::DistributionKind;
use crate::error::Result;
use crate::input_spec::{MarginalSpec, ProbInputSpec};
use crate::parameters::FunParams;
use crate::prob_input::ProbabilisticInput;
use crate::test_function::{Formula, TestFunction};

pub const FUNCTION_ID: &str = "Borehole";
pub const SPATIAL_DIMENSION: usize = 8;
pub const TAGS: [&str; 2] = ["metamodeling", "sensitivity"];
pub const INPUTS: [&str; 2] = ["harper-1983", "morris-1993"];
pub const DEFAULT_INPUT: &str = "harper-1983";

/// Input model by name.
pub fn prob_input_spec(input: &str) -> Result<ProbInputSpec> {
    use DistributionKind::{Lognormal, Normal, Uniform};

    let (rw, r, description) = match input {
        "harper-1983" => (
            MarginalSpec::new(Normal, [0.10, 0.0161812]),
            MarginalSpec::new(Lognormal, [7.71, 1.0056]),
            "Borehole input model from Harper and Gupta (1983)",
        ),
        "morris-1993" => (
            MarginalSpec::new(Uniform, [0.05, 0.15]),
            MarginalSpec::new(Uniform, [100.0, 50_000.0]),
            "Borehole input model from Morris et al. (1993)",
        ),
        _ => return Err(unknown_selection(FUNCTION_ID, "input", input, &INPUTS)),
    };

    let marginals = vec![
        rw.named("rw").described("radius of the borehole [m]"),
        r.named("r").described("radius of influence [m]"),
        MarginalSpec::new(Uniform, [63_070.0, 115_600.0])
            .named("Tu")
            .described("transmissivity of upper aquifer [m^2/year]"),
        MarginalSpec::new(Uniform, [990.0, 1100.0])
            .named("Hu")
            .described("potentiometric head of upper aquifer [m]"),
        MarginalSpec::new(Uniform, [63.1, 116.0])
            .named("Tl")
            .described("transmissivity of lower aquifer [m^2/year]"),
        MarginalSpec::new(Uniform, [700.0, 820.0])
            .named("Hl")
            .described("potentiometric head of lower aquifer [m]"),
        MarginalSpec::new(Uniform, [1120.0, 1680.0])
            .named("L")
            .described("length of the borehole [m]"),
        MarginalSpec::new(Uniform, [9985.0, 12_045.0])
            .named("Kw")
            .described("hydraulic conductivity of the borehole [m/year]"),
    ];
    Ok(ProbInputSpec::new(marginals)
        .named(input)
        .described(description))
}

pub fn evaluate(xx: ArrayView2<'_, f64>, _params: &FunParams) -> Result<Array2<f64>> {
    require_columns(&xx, SPATIAL_DIMENSION)?;
    Ok(scalar_output(xx.rows().into_iter().map(|x| {
        let (rw, r, tu, hu, tl, hl, l, kw) = (x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7]);
        let log_ratio = (r / rw).ln();
        2.0 * PI * tu * (hu - hl)
            / (log_ratio * (1.0 + 2.0 * l * tu / (log_ratio * rw * rw * kw) + tu / tl))
    })))
}

/// Builds the function on one of [`INPUTS`] (default `harper-1983`).
pub fn build(input: Option<&str>, seed: Option<u64>) -> Result<TestFunction> {
    let spec = prob_input_spec(input.unwrap_or(DEFAULT_INPUT))?;
    let prob_input = ProbabilisticInput::from_spec(&spec, seed)?;
    Ok(TestFunction::new(
        FUNCTION_ID,
        prob_input,
        FunParams::new(),
        evaluate.with_dimension(SPATIAL_DIMENSION),
    )?
        .with_description("Borehole function from Harper and Gupta (1983)"))
}
