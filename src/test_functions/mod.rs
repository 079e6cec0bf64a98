//! Built-in analytic test functions.
//!
//! Each module exposes the formula itself (`evaluate`), the default input
//! model (`prob_input_spec`), the published parameter sets, and a `build`
//! constructor that assembles a ready-to-use [`TestFunction`](crate::TestFunction).
//!
//! Modules also carry the catalog metadata: `TAGS` (the applications a
//! function is used to benchmark) and, for variable-dimension functions,
//! `DEFAULT_DIMENSION`.
//!
//! | Function | Dimension | Input | Parameter sets | Tags |
//! |---|---|---|---|---|
//! | [`ishigami`] | 3 | U(−π, π) | `ishigami-1991`, `sobol-levitan-1999` | metamodeling, sensitivity |
//! | [`borehole`] | 8 | mixed | none (inputs `harper-1983`, `morris-1993`) | metamodeling, sensitivity |
//! | [`sobol_g`] | M (default 2) | U(0, 1) | `sobol-1`..`sobol-4`, `kucherenko-2a`, `kucherenko-3b`, `crestaux-2007` | integration, sensitivity |
//! | [`ackley`] | M (default 2) | U(−32.768, 32.768) | `ackley` | metamodeling, optimization |

pub mod ackley;
pub mod borehole;
pub mod ishigami;
pub mod sobol_g;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{Error, Result};

/// Collects one value per row into an `N × 1` output.
fn scalar_output(values: impl IntoIterator<Item = f64>) -> Array2<f64> {
    values
        .into_iter()
        .collect::<Array1<f64>>()
        .insert_axis(Axis(1))
}

fn require_columns(xx: &ArrayView2<'_, f64>, expected: usize) -> Result<()> {
    if xx.ncols() == expected {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected,
            got: xx.ncols(),
        })
    }
}

fn unknown_selection(function_id: &str, what: &str, name: &str, available: &[&str]) -> Error {
    Error::InvalidParameter(format!(
        "{function_id}: unknown {what} '{name}', available: {}",
        available.join(", ")
    ))
}

fn require_dimension(function_id: &str, dimension: usize) -> Result<()> {
    if dimension == 0 {
        Err(Error::InvalidParameter(format!(
            "{function_id}: dimension must be at least 1"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_TAGS: [&str; 4] = ["integration", "metamodeling", "optimization", "sensitivity"];

    #[test]
    fn test_tags_are_known() {
        for tags in [ishigami::TAGS, borehole::TAGS, sobol_g::TAGS, ackley::TAGS] {
            assert!(tags.iter().all(|t| KNOWN_TAGS.contains(t)), "{tags:?}");
        }
        assert!(ackley::TAGS.contains(&"optimization"));
    }

    #[test]
    fn test_default_dimensions_build() {
        let g = sobol_g::build(sobol_g::DEFAULT_DIMENSION, None, Some(0)).unwrap();
        assert_eq!(g.spatial_dimension(), 2);
        let a = ackley::build(ackley::DEFAULT_DIMENSION, Some(0)).unwrap();
        assert_eq!(a.spatial_dimension(), 2);
    }
}
