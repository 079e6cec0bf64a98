//! Multivariate input models built from independent marginals.
//!
//! A [`ProbabilisticInput`] is an ordered list of [`Marginal`]s, one per
//! input dimension. Dependence between dimensions is not modelled: the
//! joint density is the product of the marginal densities and the joint
//! support is the Cartesian product of the marginal supports.
//!
//! # Random streams
//!
//! Each marginal samples from its own generator. [`ProbabilisticInput::reset_rng`]
//! derives one sub-seed per dimension from a single master seed with
//! [`random::derive_seed`], so two models reset with the same seed draw
//! identical matrices while the columns of one model never share a stream.

use std::fmt;

use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

use crate::distributions::Support;
use crate::error::{Error, Result};
use crate::input_spec::ProbInputSpec;
use crate::marginal::Marginal;
use crate::random;

/// Default bounds of the canonical uniform source used by
/// [`ProbabilisticInput::transform_sample_default`].
pub const DEFAULT_SOURCE_BOUNDS: (f64, f64) = (-1.0, 1.0);

/// An independent joint distribution over `M` input dimensions.
///
/// # Examples
/// ```
/// use uqtestfuns::{DistributionKind, Marginal, ProbabilisticInput};
///
/// let mut input = ProbabilisticInput::new(vec![
///     Marginal::new(DistributionKind::Uniform, &[0.0, 1.0]).unwrap(),
///     Marginal::new(DistributionKind::Normal, &[0.0, 1.0]).unwrap(),
/// ])
/// .unwrap();
/// input.reset_rng(Some(42));
///
/// let xx = input.get_sample(100);
/// assert_eq!(xx.dim(), (100, 2));
/// assert!(input.contains(&xx));
/// ```
#[derive(Debug)]
pub struct ProbabilisticInput {
    name: Option<String>,
    description: Option<String>,
    marginals: Vec<Marginal>,
}

impl ProbabilisticInput {
    /// Creates a model from its marginals, in dimension order.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if `marginals` is empty.
    pub fn new(marginals: Vec<Marginal>) -> Result<Self> {
        if marginals.is_empty() {
            return Err(Error::InvalidParameter(
                "a probabilistic input needs at least one marginal".into(),
            ));
        }
        log::debug!("probabilistic input with {} marginals", marginals.len());
        Ok(Self {
            name: None,
            description: None,
            marginals,
        })
    }

    /// Builds a model from a configuration record and resets its streams
    /// with `seed` (see [`Self::reset_rng`]).
    pub fn from_spec(spec: &ProbInputSpec, seed: Option<u64>) -> Result<Self> {
        let marginals = spec
            .marginals
            .iter()
            .map(|m| Marginal::from_spec(m, None))
            .collect::<Result<Vec<_>>>()?;
        let mut input = Self::new(marginals)?;
        input.name = spec.name.clone();
        input.description = spec.description.clone();
        input.reset_rng(seed);
        Ok(input)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of input dimensions `M`.
    pub fn spatial_dimension(&self) -> usize {
        self.marginals.len()
    }

    pub fn marginals(&self) -> &[Marginal] {
        &self.marginals
    }

    pub fn marginal(&self, index: usize) -> Option<&Marginal> {
        self.marginals.get(index)
    }

    /// Mutable access to one dimension, for parameter updates or a
    /// single-stream reset. The number of dimensions cannot change.
    pub fn marginal_mut(&mut self, index: usize) -> Option<&mut Marginal> {
        self.marginals.get_mut(index)
    }

    /// Per-dimension supports; their Cartesian product is the joint support.
    pub fn support(&self) -> Vec<Support> {
        self.marginals.iter().map(Marginal::support).collect()
    }

    /// Vector of marginal medians.
    pub fn median(&self) -> Array1<f64> {
        self.marginals.iter().map(Marginal::median).collect()
    }

    // ------------------------------------------------------------------
    // Sampling
    // ------------------------------------------------------------------

    /// Draws an `n × M` sample; column `m` comes from marginal `m`'s stream.
    pub fn get_sample(&mut self, n: usize) -> Array2<f64> {
        let mut xx = Array2::zeros((n, self.marginals.len()));
        for (mut column, marginal) in xx.columns_mut().into_iter().zip(&mut self.marginals) {
            column.assign(&marginal.sample(n));
        }
        xx
    }

    /// Reseeds every marginal from one master seed.
    ///
    /// Dimension `m` receives `derive_seed(seed, m)`. Without a seed the
    /// master seed is drawn from entropy and logged at debug level so the
    /// run can be replayed.
    pub fn reset_rng(&mut self, seed: Option<u64>) {
        let master = seed.unwrap_or_else(|| {
            let drawn = random::entropy_seed();
            log::debug!("probabilistic input reseeded from entropy, master seed {drawn}");
            drawn
        });
        for (index, marginal) in self.marginals.iter_mut().enumerate() {
            marginal.reset_stream(Some(random::derive_seed(master, index as u64)));
        }
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Joint density of each row: the product of the marginal densities.
    ///
    /// # Errors
    /// [`Error::DimensionMismatch`] if `xx` does not have `M` columns.
    pub fn density<S>(&self, xx: &ArrayBase<S, Ix2>) -> Result<Array1<f64>>
    where
        S: Data<Elem = f64>,
    {
        self.check_columns(xx.ncols())?;
        Ok(xx
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .zip(&self.marginals)
                    .map(|(&x, m)| m.pdf(x))
                    .product()
            })
            .collect())
    }

    /// Checks that every value lies in the support of its marginal.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] for a wrong column count.
    /// - [`Error::OutOfDomain`] naming the first offending row and column.
    pub fn validate_sample<S>(&self, xx: &ArrayBase<S, Ix2>) -> Result<()>
    where
        S: Data<Elem = f64>,
    {
        self.check_columns(xx.ncols())?;
        let supports = self.support();
        for ((row, column), &value) in xx.indexed_iter() {
            let support = supports[column];
            if !support.contains(value) {
                return Err(Error::OutOfDomain {
                    row,
                    column,
                    value,
                    lower: support.lower,
                    upper: support.upper,
                });
            }
        }
        Ok(())
    }

    /// Whether `xx` has `M` columns and lies in the joint support.
    pub fn contains<S>(&self, xx: &ArrayBase<S, Ix2>) -> bool
    where
        S: Data<Elem = f64>,
    {
        self.validate_sample(xx).is_ok()
    }

    // ------------------------------------------------------------------
    // Isoprobabilistic transformations
    // ------------------------------------------------------------------

    /// Maps a sample uniform on `[lower, upper]^M` onto this model.
    ///
    /// Every value is rescaled to `u = (x − lower) / (upper − lower)` and
    /// passed through the quantile function of its column's marginal.
    /// The same bounds apply to every dimension.
    ///
    /// # Errors
    /// - [`Error::InvalidBounds`] unless `lower < upper` (both finite).
    /// - [`Error::DimensionMismatch`] for a wrong column count.
    /// - [`Error::OutOfDomain`] for a value outside `[lower, upper]`.
    pub fn transform_sample<S>(
        &self,
        xx: &ArrayBase<S, Ix2>,
        lower: f64,
        upper: f64,
    ) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        if !(lower < upper && lower.is_finite() && upper.is_finite()) {
            return Err(Error::InvalidBounds { lower, upper });
        }
        self.check_columns(xx.ncols())?;
        if let Some(((row, column), &value)) = xx
            .indexed_iter()
            .find(|(_, v)| !(lower..=upper).contains(*v))
        {
            return Err(Error::OutOfDomain {
                row,
                column,
                value,
                lower,
                upper,
            });
        }

        let width = upper - lower;
        let mut out = Array2::zeros(xx.raw_dim());
        for (((_, column), target), &x) in out.indexed_iter_mut().zip(xx.iter()) {
            let u = ((x - lower) / width).clamp(0.0, 1.0);
            *target = self.marginals[column].icdf(u)?;
        }
        Ok(out)
    }

    /// [`Self::transform_sample`] from `[-1, 1]^M`.
    pub fn transform_sample_default<S>(&self, xx: &ArrayBase<S, Ix2>) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        let (lower, upper) = DEFAULT_SOURCE_BOUNDS;
        self.transform_sample(xx, lower, upper)
    }

    /// Maps a sample of this model onto `other`, column by column, through
    /// `other.icdf(self.cdf(x))`.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if the models differ in dimension or
    ///   `xx` has the wrong column count.
    /// - [`Error::OutOfDomain`] if `xx` leaves this model's support.
    pub fn transform_to<S>(
        &self,
        xx: &ArrayBase<S, Ix2>,
        other: &ProbabilisticInput,
    ) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        if other.spatial_dimension() != self.spatial_dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.spatial_dimension(),
                got: other.spatial_dimension(),
            });
        }
        self.validate_sample(xx)?;
        let mut out = Array2::zeros(xx.raw_dim());
        for (j, (source, target)) in self.marginals.iter().zip(&other.marginals).enumerate() {
            out.column_mut(j)
                .assign(&source.transform_sample(&xx.column(j), target));
        }
        Ok(out)
    }

    fn check_columns(&self, got: usize) -> Result<()> {
        let expected = self.marginals.len();
        if got == expected {
            Ok(())
        } else {
            Err(Error::DimensionMismatch { expected, got })
        }
    }
}

impl fmt::Display for ProbabilisticInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name         : {}", self.name().unwrap_or("-"))?;
        writeln!(f, "Spatial Dim. : {}", self.spatial_dimension())?;
        writeln!(f, "Description  : {}", self.description().unwrap_or("-"))?;
        writeln!(f, "Marginals    :")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>4}  {:<8}  {:<13}  {:<32}  {:<28}  Description",
            "No.", "Name", "Distribution", "Parameters", "Support"
        )?;
        for (i, m) in self.marginals.iter().enumerate() {
            let parameters = m
                .parameters()
                .iter()
                .map(|p| format!("{p:.4}"))
                .collect::<Vec<_>>()
                .join(", ");
            let support = m.support();
            writeln!(
                f,
                "{:>4}  {:<8}  {:<13}  {:<32}  {:<28}  {}",
                i + 1,
                m.name().unwrap_or("-"),
                m.kind().name(),
                format!("[{parameters}]"),
                format!("[{:.4}, {:.4}]", support.lower, support.upper),
                m.description().unwrap_or("-")
            )?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::distributions::DistributionKind;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn transform_is_deterministic(seed in any::<u64>(), n in 1_usize..50) {
            let kinds = [DistributionKind::Gumbel, DistributionKind::Triangular];
            let build = || {
                ProbabilisticInput::new(kinds.iter().map(|&k| Marginal::standard(k)).collect())
                    .unwrap()
            };
            let mut source_a = build();
            let mut source_b = build();
            source_a.reset_rng(Some(seed));
            source_b.reset_rng(Some(seed));
            let target = build();

            let ua = source_a.get_sample(n).mapv(|x| x.clamp(-1.0, 1.0));
            let ub = source_b.get_sample(n).mapv(|x| x.clamp(-1.0, 1.0));
            prop_assert_eq!(
                target.transform_sample_default(&ua).unwrap(),
                target.transform_sample_default(&ub).unwrap()
            );
        }

        #[test]
        fn transformed_sample_in_support(seed in any::<u64>()) {
            let mut canonical = ProbabilisticInput::new(vec![
                Marginal::new(DistributionKind::Uniform, &[-1.0, 1.0]).unwrap(),
                Marginal::new(DistributionKind::Uniform, &[-1.0, 1.0]).unwrap(),
            ]).unwrap();
            canonical.reset_rng(Some(seed));
            let target = ProbabilisticInput::new(vec![
                Marginal::new(DistributionKind::Beta, &[0.5, 3.0, 1.0, 2.0]).unwrap(),
                Marginal::new(DistributionKind::TruncNormal, &[0.0, 1.0, -0.5, 3.0]).unwrap(),
            ]).unwrap();
            let out = target.transform_sample_default(&canonical.get_sample(64)).unwrap();
            prop_assert!(target.contains(&out));
        }
    }
}
