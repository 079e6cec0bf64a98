//! A single univariate random variable with its own random stream.

use std::fmt;

use ndarray::{Array, Array1, ArrayBase, Data, Dimension};
use rand::rngs::SmallRng;

use crate::distributions::{Distribution, DistributionKind, Support};
use crate::error::{Error, Result};
use crate::input_spec::MarginalSpec;
use crate::random;

/// One input dimension: a distribution kind, its validated parameters,
/// and an exclusively owned pseudo-random generator.
///
/// Not `Clone`: a copy would replay the same stream.
///
/// # Examples
/// ```
/// use uqtestfuns::{DistributionKind, Marginal};
///
/// let mut m = Marginal::new(DistributionKind::Normal, &[0.0, 1.0])
///     .unwrap()
///     .with_seed(42);
/// assert_eq!(m.cdf(0.0), 0.5);
/// assert_eq!(m.sample(100).len(), 100);
/// assert!(m.set_parameter_by_name("sigma", -1.0).is_err());
/// assert_eq!(m.parameters(), &[0.0, 1.0]);
/// ```
pub struct Marginal {
    name: Option<String>,
    description: Option<String>,
    kind: DistributionKind,
    parameters: Vec<f64>,
    distribution: Distribution,
    rng: SmallRng,
    seed: Option<u64>,
}

impl Marginal {
    /// Creates a marginal with an entropy-seeded stream.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if `parameters` does not satisfy the
    /// constraints of `kind`.
    pub fn new(kind: DistributionKind, parameters: &[f64]) -> Result<Self> {
        let distribution = Distribution::new(kind, parameters)?;
        let (rng, entropy) = random::create_entropy_rng();
        log::trace!("{kind} marginal seeded from entropy ({entropy})");
        Ok(Self {
            name: None,
            description: None,
            kind,
            parameters: parameters.to_vec(),
            distribution,
            rng,
            seed: None,
        })
    }

    /// Creates a marginal with the standard parameters of `kind`.
    pub fn standard(kind: DistributionKind) -> Self {
        let (rng, _) = random::create_entropy_rng();
        Self {
            name: None,
            description: None,
            kind,
            parameters: kind.default_parameters(),
            distribution: Distribution::standard(kind),
            rng,
            seed: None,
        }
    }

    /// Builds a marginal from a configuration record.
    pub fn from_spec(spec: &MarginalSpec, seed: Option<u64>) -> Result<Self> {
        let mut marginal = Self::new(spec.distribution, &spec.parameters)?;
        marginal.name = spec.name.clone();
        marginal.description = spec.description.clone();
        if seed.is_some() {
            marginal.reset_stream(seed);
        }
        Ok(marginal)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the stream with one seeded by `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reset_stream(Some(seed));
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> DistributionKind {
        self.kind
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn parameter_names(&self) -> &'static [&'static str] {
        self.kind.parameter_names()
    }

    pub fn support(&self) -> Support {
        self.distribution.support()
    }

    /// Seed of the current stream; `None` when it was seeded from entropy.
    pub fn rng_seed(&self) -> Option<u64> {
        self.seed
    }

    // ------------------------------------------------------------------
    // Parameter mutation
    // ------------------------------------------------------------------

    /// Replaces the whole parameter vector.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if the new vector is invalid; the
    /// marginal is left unchanged.
    pub fn set_parameters(&mut self, parameters: &[f64]) -> Result<()> {
        let distribution = Distribution::new(self.kind, parameters)?;
        self.parameters = parameters.to_vec();
        self.distribution = distribution;
        Ok(())
    }

    /// Replaces the parameter at `index`.
    pub fn set_parameter(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= self.parameters.len() {
            return Err(Error::InvalidParameter(format!(
                "{}: parameter index {index} out of range (arity {})",
                self.kind,
                self.parameters.len()
            )));
        }
        let mut candidate = self.parameters.clone();
        candidate[index] = value;
        self.set_parameters(&candidate)
    }

    /// Replaces the parameter called `name` (see [`Self::parameter_names`]).
    pub fn set_parameter_by_name(&mut self, name: &str, value: f64) -> Result<()> {
        let index = self.kind.parameter_index(name).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "{}: unknown parameter '{name}', expected one of {}",
                self.kind,
                self.kind.parameter_names().join(", ")
            ))
        })?;
        self.set_parameter(index, value)
    }

    // ------------------------------------------------------------------
    // Scalar evaluation
    // ------------------------------------------------------------------

    /// Density at `x`; 0 outside the support.
    pub fn pdf(&self, x: f64) -> f64 {
        self.distribution.pdf(x)
    }

    /// P(X ≤ x).
    pub fn cdf(&self, x: f64) -> f64 {
        self.distribution.cdf(x)
    }

    /// Quantile of `p`.
    ///
    /// # Errors
    /// [`Error::ProbabilityOutOfRange`] if `p` is not in `[0, 1]`.
    pub fn icdf(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::ProbabilityOutOfRange(p));
        }
        Ok(self.distribution.icdf(p))
    }

    pub fn median(&self) -> f64 {
        self.distribution.icdf(0.5)
    }

    // ------------------------------------------------------------------
    // Vectorized evaluation
    // ------------------------------------------------------------------

    /// Elementwise density; the output has the shape of `x`.
    pub fn density<S, D>(&self, x: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        x.mapv(|v| self.distribution.pdf(v))
    }

    /// Elementwise CDF; the output has the shape of `x`.
    pub fn cumulative<S, D>(&self, x: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        x.mapv(|v| self.distribution.cdf(v))
    }

    /// Elementwise quantile function.
    ///
    /// `0` and `1` map to the support bounds, which may be infinite.
    ///
    /// # Errors
    /// [`Error::ProbabilityOutOfRange`] for the first element outside
    /// `[0, 1]`; nothing is computed in that case.
    pub fn inverse_cumulative<S, D>(&self, p: &ArrayBase<S, D>) -> Result<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if let Some(&bad) = p.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(Error::ProbabilityOutOfRange(bad));
        }
        Ok(p.mapv(|v| self.distribution.icdf(v)))
    }

    /// Maps values distributed as `self` onto the distribution of `other`
    /// through `other.icdf(self.cdf(x))`.
    pub fn transform_sample<S, D>(&self, xx: &ArrayBase<S, D>, other: &Marginal) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        xx.mapv(|x| other.distribution.icdf(self.distribution.cdf(x)))
    }

    // ------------------------------------------------------------------
    // Sampling
    // ------------------------------------------------------------------

    /// Draws `n` values by inverse-transform sampling from the own stream.
    pub fn sample(&mut self, n: usize) -> Array1<f64> {
        let rng = &mut self.rng;
        let distribution = &self.distribution;
        Array1::from_shape_fn(n, |_| distribution.icdf(random::open_unit(rng)))
    }

    /// Replaces the stream. `Some(seed)` makes subsequent draws
    /// reproducible; `None` reseeds from operating-system entropy.
    pub fn reset_stream(&mut self, seed: Option<u64>) {
        match seed {
            Some(seed) => {
                self.rng = random::create_rng(seed);
                self.seed = Some(seed);
            }
            None => {
                let (rng, entropy) = random::create_entropy_rng();
                log::debug!("{} marginal reseeded from entropy ({entropy})", self.kind);
                self.rng = rng;
                self.seed = None;
            }
        }
    }
}

impl fmt::Debug for Marginal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marginal")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("support", &self.support())
            .field("seed", &self.seed)
            .finish()
    }
}
