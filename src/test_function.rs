//! Binding of a formula to its probabilistic input model.

use std::fmt;

use ndarray::{Array2, ArrayBase, ArrayView2, Axis, Data, Ix2};

use crate::error::{Error, Result};
use crate::parameters::{FunParams, ParamValue};
use crate::prob_input::ProbabilisticInput;

/// An analytic mapping from an `N × M` input matrix to an `N × K` output.
///
/// Implementations must be free of side effects. Any closure with the
/// matching signature is a formula; [`Formula::with_dimension`] pins the
/// number of input columns it accepts.
pub trait Formula {
    fn evaluate(&self, xx: ArrayView2<'_, f64>, params: &FunParams) -> Result<Array2<f64>>;

    /// Number of input columns the formula requires, `None` if any.
    fn spatial_dimension(&self) -> Option<usize> {
        None
    }

    fn with_dimension(self, dimension: usize) -> Dimensioned<Self>
    where
        Self: Sized,
    {
        Dimensioned {
            formula: self,
            dimension,
        }
    }
}

impl<F> Formula for F
where
    F: Fn(ArrayView2<'_, f64>, &FunParams) -> Result<Array2<f64>>,
{
    fn evaluate(&self, xx: ArrayView2<'_, f64>, params: &FunParams) -> Result<Array2<f64>> {
        self(xx, params)
    }
}

/// A formula with a declared input dimension. See [`Formula::with_dimension`].
#[derive(Debug, Clone, Copy)]
pub struct Dimensioned<F> {
    formula: F,
    dimension: usize,
}

impl<F: Formula> Formula for Dimensioned<F> {
    fn evaluate(&self, xx: ArrayView2<'_, f64>, params: &FunParams) -> Result<Array2<f64>> {
        self.formula.evaluate(xx, params)
    }

    fn spatial_dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

/// A test function: a formula, its parameters, and the probabilistic input
/// model that defines its domain.
///
/// The dimension and the marginal list are fixed once constructed;
/// parameter values and marginal parameters may change between calls.
///
/// # Examples
/// ```
/// use ndarray::{array, Array2, ArrayView2, Axis};
/// use uqtestfuns::{
///     DistributionKind, FunParams, Marginal, ProbabilisticInput, Result, TestFunction,
/// };
///
/// let input = ProbabilisticInput::new(vec![
///     Marginal::new(DistributionKind::Uniform, &[0.0, 1.0]).unwrap(),
///     Marginal::new(DistributionKind::Uniform, &[0.0, 1.0]).unwrap(),
/// ])
/// .unwrap();
/// let params = FunParams::new().declare("scale", 2.0, None);
/// let formula = |xx: ArrayView2<'_, f64>, p: &FunParams| -> Result<Array2<f64>> {
///     let scale = p.number("scale")?;
///     Ok(xx.sum_axis(Axis(1)).mapv(|s| scale * s).insert_axis(Axis(1)))
/// };
/// let f = TestFunction::new("scaled-sum", input, params, formula).unwrap();
///
/// let yy = f.evaluate(&array![[0.25, 0.5]]).unwrap();
/// assert_eq!(yy[[0, 0]], 1.5);
/// assert!(f.evaluate(&array![[0.25, 1.5]]).is_err());
/// ```
pub struct TestFunction {
    function_id: String,
    description: Option<String>,
    formula: Box<dyn Formula>,
    prob_input: ProbabilisticInput,
    parameters: FunParams,
}

impl TestFunction {
    /// Binds `formula` to its input model.
    ///
    /// # Errors
    /// [`Error::DimensionMismatch`] if the formula declares a
    /// [`Formula::spatial_dimension`] other than the number of marginals.
    pub fn new(
        function_id: impl Into<String>,
        prob_input: ProbabilisticInput,
        parameters: FunParams,
        formula: impl Formula + 'static,
    ) -> Result<Self> {
        let function_id = function_id.into();
        if let Some(expected) = formula.spatial_dimension() {
            if expected != prob_input.spatial_dimension() {
                return Err(Error::DimensionMismatch {
                    expected,
                    got: prob_input.spatial_dimension(),
                });
            }
        }
        log::debug!(
            "test function {function_id}: {} inputs, {} parameters",
            prob_input.spatial_dimension(),
            parameters.len()
        );
        Ok(Self {
            function_id,
            description: None,
            formula: Box::new(formula),
            prob_input,
            parameters,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn spatial_dimension(&self) -> usize {
        self.prob_input.spatial_dimension()
    }

    pub fn prob_input(&self) -> &ProbabilisticInput {
        &self.prob_input
    }

    /// Mutable access to the input model (parameter updates, stream resets).
    pub fn prob_input_mut(&mut self) -> &mut ProbabilisticInput {
        &mut self.prob_input
    }

    pub fn parameters(&self) -> &FunParams {
        &self.parameters
    }

    /// Replaces a declared parameter; takes effect on the next evaluation.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] for an undeclared keyword or a value of
    /// a different type.
    pub fn set_parameter(&mut self, keyword: &str, value: impl Into<ParamValue>) -> Result<()> {
        self.parameters.set(keyword, value)
    }

    /// Evaluates the formula on every row of `xx`.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if `xx` does not have
    ///   [`Self::spatial_dimension`] columns.
    /// - [`Error::OutOfDomain`] for the first value outside the joint
    ///   support, with its row and column.
    /// - Any error raised by the formula itself.
    pub fn evaluate<S>(&self, xx: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.prob_input.validate_sample(xx)?;
        let yy = self.formula.evaluate(xx.view(), &self.parameters)?;
        if yy.nrows() != xx.nrows() {
            return Err(Error::DimensionMismatch {
                expected: xx.nrows(),
                got: yy.nrows(),
            });
        }
        Ok(yy)
    }

    /// Number of output columns `K`, found by evaluating the formula once
    /// at the vector of marginal medians.
    pub fn output_dimension(&self) -> Result<usize> {
        let median = self.prob_input.median().insert_axis(Axis(0));
        Ok(self.formula.evaluate(median.view(), &self.parameters)?.ncols())
    }

    /// Draws an `n × M` sample from the input model.
    pub fn get_sample(&mut self, n: usize) -> Array2<f64> {
        self.prob_input.get_sample(n)
    }

    /// Maps a sample uniform on `[lower, upper]^M` onto the input model.
    /// See [`ProbabilisticInput::transform_sample`].
    pub fn transform_sample<S>(
        &self,
        xx: &ArrayBase<S, Ix2>,
        lower: f64,
        upper: f64,
    ) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.prob_input.transform_sample(xx, lower, upper)
    }

    /// [`Self::transform_sample`] from `[-1, 1]^M`.
    pub fn transform_sample_default<S>(&self, xx: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.prob_input.transform_sample_default(xx)
    }
}

impl fmt::Debug for TestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestFunction")
            .field("function_id", &self.function_id)
            .field("description", &self.description)
            .field("prob_input", &self.prob_input)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Function ID      : {}", self.function_id)?;
        writeln!(f, "Input Dimension  : {}", self.spatial_dimension())?;
        writeln!(f, "Parameterized    : {}", !self.parameters.is_empty())?;
        writeln!(f, "Description      : {}", self.description().unwrap_or("-"))
    }
}
