//! # uqtestfuns
//!
//! Analytic test functions for uncertainty quantification, paired with
//! the probabilistic input models that define their domains.
//!
//! The core is the probabilistic input model: independent univariate
//! [`Marginal`]s, each with a validated parameter vector and its own
//! reproducible random stream, composed into a [`ProbabilisticInput`] that
//! samples, evaluates joint densities, and maps canonical uniform samples
//! onto the joint support. A [`TestFunction`] binds such a model to a
//! [`Formula`] and checks every evaluation against the input domain.
//!
//! ## Modules
//!
//! - [`distributions`]: the closed set of supported distribution kinds
//! - [`marginal`], [`prob_input`]: univariate and multivariate input models
//! - [`input_spec`]: serde-friendly descriptions of input models
//! - [`parameters`], [`test_function`]: typed function parameters and the
//!   function wrapper
//! - [`test_functions`]: Ishigami, Borehole, Sobol'-G, Ackley
//! - [`special`], [`random`], [`stats`]: numerical building blocks
//!
//! ## Example
//!
//! ```
//! use uqtestfuns::test_functions::ishigami;
//!
//! let mut f = ishigami::build(None, Some(42)).unwrap();
//! let xx = f.get_sample(1000);
//! let yy = f.evaluate(&xx).unwrap();
//! assert_eq!(yy.dim(), (1000, 1));
//! ```

pub mod distributions;
pub mod error;
pub mod input_spec;
pub mod marginal;
pub mod parameters;
pub mod prob_input;
pub mod random;
pub mod special;
pub mod stats;
pub mod test_function;
pub mod test_functions;

pub use distributions::{DistributionKind, Support};
pub use error::{Error, ErrorKind, Result};
pub use input_spec::{MarginalSpec, ProbInputSpec};
pub use marginal::Marginal;
pub use parameters::{FunParam, FunParams, ParamValue};
pub use prob_input::ProbabilisticInput;
pub use test_function::{Dimensioned, Formula, TestFunction};
