//! Univariate probability distributions.
//!
//! Each supported distribution is one case of the closed enumeration
//! [`DistributionKind`]. A parameter vector is validated into a
//! [`Distribution`], which carries the derived [`Support`] and any
//! normalizing constants, and evaluates PDF, CDF, and inverse CDF in
//! closed form with a single `match` per operation.
//!
//! # Supported Distributions
//!
//! | Kind | Parameters | Support |
//! |---|---|---|
//! | `uniform` | lower, upper | [lower, upper] |
//! | `normal` | μ, σ | (−∞, ∞) |
//! | `lognormal` | μ, σ (of ln X) | [0, ∞) |
//! | `beta` | r, s, a, b | [a, b] |
//! | `gumbel` | μ, β | (−∞, ∞) |
//! | `logitnormal` | μ, σ (of logit X) | [0, 1] |
//! | `triangular` | a, b, c (mode) | [a, b] |
//! | `trunc-gumbel` | μ, β, lb, ub | [lb, ub] |
//! | `trunc-normal` | μ, σ, lb, ub | [lb, ub] |
//! | `exponential` | λ (rate) | [0, ∞) |
//!
//! Truncated kinds rescale the parent density and CDF by the probability
//! mass of the truncation interval; their bounds may be infinite.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::special;

// ============================================================================
// Distribution Kind
// ============================================================================

/// The closed set of supported univariate distribution families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionKind {
    Uniform,
    Normal,
    #[serde(alias = "log-normal")]
    Lognormal,
    Beta,
    #[serde(alias = "gumbel-max")]
    Gumbel,
    #[serde(alias = "logit-normal")]
    Logitnormal,
    Triangular,
    #[serde(alias = "truncated-gumbel-max", alias = "truncated-gumbel")]
    TruncGumbel,
    #[serde(alias = "truncnormal", alias = "truncated-normal")]
    TruncNormal,
    Exponential,
}

impl DistributionKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [DistributionKind; 10] = [
        DistributionKind::Uniform,
        DistributionKind::Normal,
        DistributionKind::Lognormal,
        DistributionKind::Beta,
        DistributionKind::Gumbel,
        DistributionKind::Logitnormal,
        DistributionKind::Triangular,
        DistributionKind::TruncGumbel,
        DistributionKind::TruncNormal,
        DistributionKind::Exponential,
    ];

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            DistributionKind::Uniform => "uniform",
            DistributionKind::Normal => "normal",
            DistributionKind::Lognormal => "lognormal",
            DistributionKind::Beta => "beta",
            DistributionKind::Gumbel => "gumbel",
            DistributionKind::Logitnormal => "logitnormal",
            DistributionKind::Triangular => "triangular",
            DistributionKind::TruncGumbel => "trunc-gumbel",
            DistributionKind::TruncNormal => "trunc-normal",
            DistributionKind::Exponential => "exponential",
        }
    }

    /// Names of the parameters, in the order they appear in a parameter vector.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            DistributionKind::Uniform => &["lower", "upper"],
            DistributionKind::Normal | DistributionKind::Lognormal => &["mu", "sigma"],
            DistributionKind::Beta => &["r", "s", "a", "b"],
            DistributionKind::Gumbel => &["mu", "beta"],
            DistributionKind::Logitnormal => &["mu", "sigma"],
            DistributionKind::Triangular => &["a", "b", "c"],
            DistributionKind::TruncGumbel => &["mu", "beta", "lower", "upper"],
            DistributionKind::TruncNormal => &["mu", "sigma", "lower", "upper"],
            DistributionKind::Exponential => &["lambda"],
        }
    }

    /// Number of parameters the kind expects.
    pub fn arity(self) -> usize {
        self.parameter_names().len()
    }

    /// Position of a named parameter, if the kind has one by that name.
    pub fn parameter_index(self, name: &str) -> Option<usize> {
        self.parameter_names().iter().position(|n| *n == name)
    }

    /// The standard (named default) parameter set of the kind.
    pub fn default_parameters(self) -> Vec<f64> {
        match self {
            DistributionKind::Uniform => vec![0.0, 1.0],
            DistributionKind::Normal
            | DistributionKind::Lognormal
            | DistributionKind::Gumbel
            | DistributionKind::Logitnormal => vec![0.0, 1.0],
            DistributionKind::Beta => vec![1.0, 1.0, 0.0, 1.0],
            DistributionKind::Triangular => vec![0.0, 1.0, 0.5],
            DistributionKind::TruncGumbel | DistributionKind::TruncNormal => {
                vec![0.0, 1.0, -1.0, 1.0]
            }
            DistributionKind::Exponential => vec![1.0],
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => DistributionKind::Uniform,
            "normal" | "gaussian" => DistributionKind::Normal,
            "lognormal" | "log-normal" => DistributionKind::Lognormal,
            "beta" => DistributionKind::Beta,
            "gumbel" | "gumbel-max" => DistributionKind::Gumbel,
            "logitnormal" | "logit-normal" => DistributionKind::Logitnormal,
            "triangular" => DistributionKind::Triangular,
            "trunc-gumbel" | "truncated-gumbel" | "truncated-gumbel-max" => {
                DistributionKind::TruncGumbel
            }
            "trunc-normal" | "truncnormal" | "truncated-normal" => DistributionKind::TruncNormal,
            "exponential" => DistributionKind::Exponential,
            _ => return Err(Error::UnsupportedDistribution(s.to_string())),
        };
        Ok(kind)
    }
}

// ============================================================================
// Support
// ============================================================================

/// A closed interval of the extended real line, `[lower, upper]`.
///
/// Unbounded ends are represented by `±∞`. Densities at an open end
/// (an infinite bound, or 0 for the lognormal) evaluate to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    pub lower: f64,
    pub upper: f64,
}

impl Support {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The whole real line.
    pub fn real_line() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Clamps `x` into the interval.
    pub fn clip(&self, x: f64) -> f64 {
        x.clamp(self.lower, self.upper)
    }
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

// ============================================================================
// Truncation of a parent location-scale family
// ============================================================================

/// Standardized parent family of a truncated kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Parent {
    Normal,
    Gumbel,
}

impl Parent {
    fn pdf(self, z: f64) -> f64 {
        match self {
            Parent::Normal => special::standard_normal_pdf(z),
            Parent::Gumbel => gumbel_pdf(z),
        }
    }

    fn cdf(self, z: f64) -> f64 {
        match self {
            Parent::Normal => special::standard_normal_cdf(z),
            Parent::Gumbel => gumbel_cdf(z),
        }
    }

    fn sf(self, z: f64) -> f64 {
        match self {
            Parent::Normal => special::standard_normal_sf(z),
            Parent::Gumbel => gumbel_sf(z),
        }
    }

    fn quantile(self, q: f64) -> f64 {
        match self {
            Parent::Normal => special::inverse_normal_cdf(q),
            Parent::Gumbel => gumbel_quantile(q),
        }
    }

    /// Inverse of the survival function.
    fn isf(self, q: f64) -> f64 {
        match self {
            Parent::Normal => -special::inverse_normal_cdf(q),
            Parent::Gumbel => gumbel_isf(q),
        }
    }
}

/// Truncation interval of a location-scale parent, with its probability mass.
///
/// When the lower bound sits in the parent's upper half the tail
/// probabilities are tracked through the survival function instead of
/// the CDF, which keeps the mass free of cancellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Truncation {
    parent: Parent,
    loc: f64,
    scale: f64,
    lower: f64,
    upper: f64,
    use_sf: bool,
    tail_lower: f64,
    mass: f64,
}

impl Truncation {
    fn new(parent: Parent, loc: f64, scale: f64, lower: f64, upper: f64) -> Self {
        let z_lower = (lower - loc) / scale;
        let z_upper = (upper - loc) / scale;
        let use_sf = parent.cdf(z_lower) > 0.5;
        let (tail_lower, mass) = if use_sf {
            let s_lower = parent.sf(z_lower);
            (s_lower, s_lower - parent.sf(z_upper))
        } else {
            let f_lower = parent.cdf(z_lower);
            (f_lower, parent.cdf(z_upper) - f_lower)
        };
        Self {
            parent,
            loc,
            scale,
            lower,
            upper,
            use_sf,
            tail_lower,
            mass,
        }
    }

    fn support(&self) -> Support {
        Support::new(self.lower, self.upper)
    }

    fn pdf(&self, x: f64) -> f64 {
        if x < self.lower || x > self.upper || x.is_infinite() {
            return 0.0;
        }
        self.parent.pdf((x - self.loc) / self.scale) / (self.scale * self.mass)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= self.lower {
            return 0.0;
        }
        if x >= self.upper {
            return 1.0;
        }
        let z = (x - self.loc) / self.scale;
        let covered = if self.use_sf {
            self.tail_lower - self.parent.sf(z)
        } else {
            self.parent.cdf(z) - self.tail_lower
        };
        (covered / self.mass).clamp(0.0, 1.0)
    }

    fn icdf(&self, p: f64) -> f64 {
        let z = if self.use_sf {
            self.parent.isf(self.tail_lower - p * self.mass)
        } else {
            self.parent.quantile(self.tail_lower + p * self.mass)
        };
        self.loc + self.scale * z
    }
}

// ============================================================================
// Gumbel (max.) helpers, standardized
// ============================================================================

fn gumbel_pdf(z: f64) -> f64 {
    if !z.is_finite() {
        return 0.0;
    }
    (-(z + (-z).exp())).exp()
}

fn gumbel_cdf(z: f64) -> f64 {
    (-(-z).exp()).exp()
}

fn gumbel_sf(z: f64) -> f64 {
    -(-(-z).exp()).exp_m1()
}

/// z = −ln(−ln q), with −ln q evaluated through `ln_1p` near q = 1.
fn gumbel_quantile(q: f64) -> f64 {
    let neg_ln_q = if q < 0.5 { -q.ln() } else { -(q - 1.0).ln_1p() };
    -neg_ln_q.ln()
}

/// Inverse survival: S(z) = q ⇔ exp(−e^{−z}) = 1 − q.
fn gumbel_isf(q: f64) -> f64 {
    -(-(-q).ln_1p()).ln()
}

// ============================================================================
// Validated Distribution
// ============================================================================

/// A distribution kind together with validated parameters and cached
/// constants.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Distribution {
    Uniform {
        lower: f64,
        upper: f64,
    },
    Normal {
        mu: f64,
        sigma: f64,
    },
    Lognormal {
        mu: f64,
        sigma: f64,
    },
    Beta {
        r: f64,
        s: f64,
        lower: f64,
        upper: f64,
        ln_beta: f64,
    },
    Gumbel {
        mu: f64,
        beta: f64,
    },
    Logitnormal {
        mu: f64,
        sigma: f64,
    },
    Triangular {
        a: f64,
        b: f64,
        c: f64,
    },
    TruncGumbel(Truncation),
    TruncNormal(Truncation),
    Exponential {
        lambda: f64,
    },
}

fn invalid(kind: DistributionKind, msg: impl fmt::Display) -> Error {
    Error::InvalidParameter(format!("{kind}: {msg}"))
}

fn require_positive(kind: DistributionKind, name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(kind, format!("{name} must be positive and finite, got {value}")))
    }
}

fn require_ordered(kind: DistributionKind, lower: f64, upper: f64) -> Result<()> {
    if lower < upper {
        Ok(())
    } else {
        Err(invalid(
            kind,
            format!("lower bound {lower} must be smaller than upper bound {upper}"),
        ))
    }
}

/// Checks arity, finiteness, and the per-kind constraints.
fn validate(kind: DistributionKind, p: &[f64]) -> Result<()> {
    if p.len() != kind.arity() {
        return Err(invalid(
            kind,
            format!(
                "expected {} parameters ({}), got {}",
                kind.arity(),
                kind.parameter_names().join(", "),
                p.len()
            ),
        ));
    }
    let truncated = matches!(
        kind,
        DistributionKind::TruncGumbel | DistributionKind::TruncNormal
    );
    for (i, &v) in p.iter().enumerate() {
        // Only truncation bounds may be infinite
        if v.is_nan() || (v.is_infinite() && !(truncated && i >= 2)) {
            return Err(invalid(
                kind,
                format!("parameter '{}' must be finite, got {v}", kind.parameter_names()[i]),
            ));
        }
    }

    match kind {
        DistributionKind::Uniform => require_ordered(kind, p[0], p[1]),
        DistributionKind::Normal | DistributionKind::Lognormal | DistributionKind::Logitnormal => {
            require_positive(kind, "sigma", p[1])
        }
        DistributionKind::Beta => {
            require_positive(kind, "r", p[0])?;
            require_positive(kind, "s", p[1])?;
            require_ordered(kind, p[2], p[3])
        }
        DistributionKind::Gumbel => require_positive(kind, "beta", p[1]),
        DistributionKind::Triangular => {
            let (a, b, c) = (p[0], p[1], p[2]);
            require_ordered(kind, a, b)?;
            if c < a || c > b {
                return Err(invalid(kind, format!("mode {c} must lie within [{a}, {b}]")));
            }
            Ok(())
        }
        DistributionKind::TruncGumbel => {
            require_positive(kind, "beta", p[1])?;
            require_ordered(kind, p[2], p[3])
        }
        DistributionKind::TruncNormal => {
            require_positive(kind, "sigma", p[1])?;
            require_ordered(kind, p[2], p[3])?;
            if p[0] <= p[2] || p[0] >= p[3] {
                return Err(invalid(
                    kind,
                    format!("mean {} must lie strictly within ({}, {})", p[0], p[2], p[3]),
                ));
            }
            Ok(())
        }
        DistributionKind::Exponential => require_positive(kind, "lambda", p[0]),
    }
}

impl Distribution {
    /// Validates `parameters` against the constraints of `kind`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] on wrong arity, NaN, infinite
    /// values (other than truncation bounds), or violated constraints.
    pub(crate) fn new(kind: DistributionKind, parameters: &[f64]) -> Result<Self> {
        validate(kind, parameters)?;
        let dist = Self::build(kind, parameters);
        if let Distribution::TruncGumbel(t) | Distribution::TruncNormal(t) = &dist {
            if t.mass.is_nan() || t.mass <= 0.0 {
                return Err(invalid(
                    kind,
                    format!(
                        "truncation interval [{}, {}] carries no probability mass",
                        t.lower, t.upper
                    ),
                ));
            }
        }
        Ok(dist)
    }

    /// The distribution with the standard parameters of `kind`.
    pub(crate) fn standard(kind: DistributionKind) -> Self {
        Self::build(kind, &kind.default_parameters())
    }

    /// Assembles a validated parameter vector into its variant.
    fn build(kind: DistributionKind, p: &[f64]) -> Self {
        match kind {
            DistributionKind::Uniform => Distribution::Uniform {
                lower: p[0],
                upper: p[1],
            },
            DistributionKind::Normal => Distribution::Normal {
                mu: p[0],
                sigma: p[1],
            },
            DistributionKind::Lognormal => Distribution::Lognormal {
                mu: p[0],
                sigma: p[1],
            },
            DistributionKind::Beta => Distribution::Beta {
                r: p[0],
                s: p[1],
                lower: p[2],
                upper: p[3],
                ln_beta: special::ln_beta(p[0], p[1]),
            },
            DistributionKind::Gumbel => Distribution::Gumbel {
                mu: p[0],
                beta: p[1],
            },
            DistributionKind::Logitnormal => Distribution::Logitnormal {
                mu: p[0],
                sigma: p[1],
            },
            DistributionKind::Triangular => Distribution::Triangular {
                a: p[0],
                b: p[1],
                c: p[2],
            },
            DistributionKind::TruncGumbel => Distribution::TruncGumbel(Truncation::new(
                Parent::Gumbel,
                p[0],
                p[1],
                p[2],
                p[3],
            )),
            DistributionKind::TruncNormal => Distribution::TruncNormal(Truncation::new(
                Parent::Normal,
                p[0],
                p[1],
                p[2],
                p[3],
            )),
            DistributionKind::Exponential => Distribution::Exponential { lambda: p[0] },
        }
    }

    pub(crate) fn support(&self) -> Support {
        match self {
            Distribution::Uniform { lower, upper } | Distribution::Beta { lower, upper, .. } => {
                Support::new(*lower, *upper)
            }
            Distribution::Normal { .. } | Distribution::Gumbel { .. } => Support::real_line(),
            Distribution::Lognormal { .. } | Distribution::Exponential { .. } => {
                Support::new(0.0, f64::INFINITY)
            }
            Distribution::Logitnormal { .. } => Support::new(0.0, 1.0),
            Distribution::Triangular { a, b, .. } => Support::new(*a, *b),
            Distribution::TruncGumbel(t) | Distribution::TruncNormal(t) => t.support(),
        }
    }

    /// Probability density at `x`; 0 outside the support.
    pub(crate) fn pdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        match *self {
            Distribution::Uniform { lower, upper } => {
                if x >= lower && x <= upper {
                    1.0 / (upper - lower)
                } else {
                    0.0
                }
            }
            Distribution::Normal { mu, sigma } => {
                special::standard_normal_pdf((x - mu) / sigma) / sigma
            }
            Distribution::Lognormal { mu, sigma } => {
                if x <= 0.0 || x.is_infinite() {
                    return 0.0;
                }
                special::standard_normal_pdf((x.ln() - mu) / sigma) / (x * sigma)
            }
            Distribution::Beta {
                r,
                s,
                lower,
                upper,
                ln_beta,
            } => {
                if x < lower || x > upper {
                    return 0.0;
                }
                let width = upper - lower;
                let t = (x - lower) / width;
                if t > 0.0 && t < 1.0 {
                    ((r - 1.0) * t.ln() + (s - 1.0) * (-t).ln_1p() - ln_beta).exp() / width
                } else {
                    // Endpoints: 0^0 = 1 gives the finite one-sided limit when a shape is 1
                    t.powf(r - 1.0) * (1.0 - t).powf(s - 1.0) / ln_beta.exp() / width
                }
            }
            Distribution::Gumbel { mu, beta } => gumbel_pdf((x - mu) / beta) / beta,
            Distribution::Logitnormal { mu, sigma } => {
                if x <= 0.0 || x >= 1.0 {
                    return 0.0;
                }
                let z = (special::logit(x) - mu) / sigma;
                special::standard_normal_pdf(z) / (sigma * x * (1.0 - x))
            }
            Distribution::Triangular { a, b, c } => {
                if x < a || x > b {
                    0.0
                } else if x < c {
                    2.0 * (x - a) / ((b - a) * (c - a))
                } else if x == c {
                    2.0 / (b - a)
                } else {
                    2.0 * (b - x) / ((b - a) * (b - c))
                }
            }
            Distribution::TruncGumbel(ref t) | Distribution::TruncNormal(ref t) => t.pdf(x),
            Distribution::Exponential { lambda } => {
                if x < 0.0 {
                    0.0
                } else {
                    lambda * (-lambda * x).exp()
                }
            }
        }
    }

    /// P(X ≤ x); 0 below the support and 1 above it.
    pub(crate) fn cdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        match *self {
            Distribution::Uniform { lower, upper } => {
                if x <= lower {
                    0.0
                } else if x >= upper {
                    1.0
                } else {
                    (x - lower) / (upper - lower)
                }
            }
            Distribution::Normal { mu, sigma } => special::standard_normal_cdf((x - mu) / sigma),
            Distribution::Lognormal { mu, sigma } => {
                if x <= 0.0 {
                    0.0
                } else {
                    special::standard_normal_cdf((x.ln() - mu) / sigma)
                }
            }
            Distribution::Beta {
                r, s, lower, upper, ..
            } => {
                if x <= lower {
                    0.0
                } else if x >= upper {
                    1.0
                } else {
                    special::regularized_incomplete_beta((x - lower) / (upper - lower), r, s)
                }
            }
            Distribution::Gumbel { mu, beta } => gumbel_cdf((x - mu) / beta),
            Distribution::Logitnormal { mu, sigma } => {
                if x <= 0.0 {
                    0.0
                } else if x >= 1.0 {
                    1.0
                } else {
                    special::standard_normal_cdf((special::logit(x) - mu) / sigma)
                }
            }
            Distribution::Triangular { a, b, c } => {
                if x <= a {
                    0.0
                } else if x <= c {
                    (x - a) * (x - a) / ((b - a) * (c - a))
                } else if x < b {
                    1.0 - (b - x) * (b - x) / ((b - a) * (b - c))
                } else {
                    1.0
                }
            }
            Distribution::TruncGumbel(ref t) | Distribution::TruncNormal(ref t) => t.cdf(x),
            Distribution::Exponential { lambda } => {
                if x <= 0.0 {
                    0.0
                } else {
                    -(-lambda * x).exp_m1()
                }
            }
        }
    }

    /// Quantile for `p ∈ [0, 1]`.
    ///
    /// `p = 0` and `p = 1` map to the support bounds (possibly infinite);
    /// other results are clipped into the support. The caller checks the
    /// range of `p`.
    pub(crate) fn icdf(&self, p: f64) -> f64 {
        let support = self.support();
        if p <= 0.0 {
            return support.lower;
        }
        if p >= 1.0 {
            return support.upper;
        }
        let x = match *self {
            Distribution::Uniform { lower, upper } => lower + p * (upper - lower),
            Distribution::Normal { mu, sigma } => mu + sigma * special::inverse_normal_cdf(p),
            Distribution::Lognormal { mu, sigma } => {
                (mu + sigma * special::inverse_normal_cdf(p)).exp()
            }
            Distribution::Beta {
                r,
                s,
                lower,
                upper,
                ln_beta,
            } => lower + (upper - lower) * beta_unit_quantile(p, r, s, ln_beta),
            Distribution::Gumbel { mu, beta } => mu + beta * gumbel_quantile(p),
            Distribution::Logitnormal { mu, sigma } => {
                special::logistic(mu + sigma * special::inverse_normal_cdf(p))
            }
            Distribution::Triangular { a, b, c } => {
                let fc = (c - a) / (b - a);
                if p < fc {
                    a + ((b - a) * (c - a) * p).sqrt()
                } else {
                    b - ((b - a) * (b - c) * (1.0 - p)).sqrt()
                }
            }
            Distribution::TruncGumbel(ref t) | Distribution::TruncNormal(ref t) => t.icdf(p),
            Distribution::Exponential { lambda } => -(-p).ln_1p() / lambda,
        };
        support.clip(x)
    }
}

/// Quantile of Beta(r, s) on [0, 1].
///
/// Probabilities up to the mass below the mean are solved for `t`; larger
/// ones for `1 − t` through I_{1−t}(s, r) = 1 − I_t(r, s). Either way the
/// unknown lies below the mean of its parameterization.
fn beta_unit_quantile(p: f64, r: f64, s: f64, ln_beta: f64) -> f64 {
    let mean = r / (r + s);
    if p <= special::regularized_incomplete_beta(mean, r, s) {
        beta_lower_quantile(p, r, s, ln_beta)
    } else {
        1.0 - beta_lower_quantile(1.0 - p, s, r, ln_beta)
    }
}

/// Root of I_t(r, s) = p for `t` at most the mean `r / (r + s)`.
///
/// # Algorithm
/// Newton iteration on `u = ln t`, started from the tail asymptote
/// I_t ≈ t^r / (r B(r, s)) and safeguarded by a shrinking bracket; steps
/// that leave the bracket fall back to bisection in `u`. Working in `ln t`
/// keeps quantiles far below 2^-200 reachable when `r` is small.
fn beta_lower_quantile(p: f64, r: f64, s: f64, ln_beta: f64) -> f64 {
    const MAX_ITER: usize = 200;

    // ln of the smallest positive subnormal
    let mut lo = (f64::MIN_POSITIVE * f64::EPSILON).ln();
    let mut hi = (r / (r + s)).ln();
    let mut u = ((p.ln() + r.ln() + ln_beta) / r).max(lo).min(hi);

    for _ in 0..MAX_ITER {
        let t = u.exp();
        let f = special::regularized_incomplete_beta(t, r, s) - p;
        if f == 0.0 {
            return t;
        }
        if f < 0.0 {
            lo = u;
        } else {
            hi = u;
        }

        // dI/du = t · pdf(t)
        let slope = (r * u + (s - 1.0) * (-t).ln_1p() - ln_beta).exp();
        let newton = u - f / slope;
        let next = if slope.is_finite() && slope > 0.0 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        if (next - u).abs() <= 16.0 * f64::EPSILON * u.abs().max(1.0) {
            return next.exp();
        }
        u = next;
    }
    u.exp()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_distribution() -> impl Strategy<Value = Distribution> {
        prop_oneof![
            (-50.0_f64..50.0, 0.1_f64..20.0)
                .prop_map(|(a, w)| Distribution::new(DistributionKind::Uniform, &[a, a + w]).unwrap()),
            (-50.0_f64..50.0, 0.05_f64..10.0)
                .prop_map(|(m, s)| Distribution::new(DistributionKind::Normal, &[m, s]).unwrap()),
            (-2.0_f64..2.0, 0.05_f64..1.5)
                .prop_map(|(m, s)| Distribution::new(DistributionKind::Lognormal, &[m, s]).unwrap()),
            (0.5_f64..8.0, 0.5_f64..8.0, -5.0_f64..5.0, 0.5_f64..10.0).prop_map(|(r, s, a, w)| {
                Distribution::new(DistributionKind::Beta, &[r, s, a, a + w]).unwrap()
            }),
            (-10.0_f64..10.0, 0.1_f64..5.0)
                .prop_map(|(m, b)| Distribution::new(DistributionKind::Gumbel, &[m, b]).unwrap()),
            (-2.0_f64..2.0, 0.1_f64..2.0).prop_map(|(m, s)| {
                Distribution::new(DistributionKind::Logitnormal, &[m, s]).unwrap()
            }),
            (-20.0_f64..0.0, 0.5_f64..20.0, 0.0_f64..=1.0).prop_map(|(a, w, f)| {
                Distribution::new(DistributionKind::Triangular, &[a, a + w, a + f * w]).unwrap()
            }),
            (-5.0_f64..5.0, 0.2_f64..3.0, 0.1_f64..4.0, 0.1_f64..4.0).prop_map(
                |(m, b, dl, du)| {
                    Distribution::new(DistributionKind::TruncGumbel, &[m, b, m - dl * b, m + du * b])
                        .unwrap()
                }
            ),
            (-5.0_f64..5.0, 0.2_f64..3.0, 0.1_f64..4.0, 0.1_f64..4.0).prop_map(
                |(m, s, dl, du)| {
                    Distribution::new(DistributionKind::TruncNormal, &[m, s, m - dl * s, m + du * s])
                        .unwrap()
                }
            ),
            (0.05_f64..20.0)
                .prop_map(|l| Distribution::new(DistributionKind::Exponential, &[l]).unwrap()),
        ]
    }

    // Unit support keeps tail quantiles representable
    fn small_shape_beta() -> impl Strategy<Value = Distribution> {
        (0.05_f64..8.0, 0.05_f64..8.0, 0.5_f64..10.0).prop_map(|(r, s, w)| {
            Distribution::new(DistributionKind::Beta, &[r, s, 0.0, w]).unwrap()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn beta_quantile_roundtrip_small_shapes(d in small_shape_beta(), p in 1e-6_f64..0.5) {
            let x = d.icdf(p);
            let back = d.cdf(x);
            prop_assert!((back - p).abs() <= 1e-8 * p.max(1e-3), "{d:?}: p={p} -> x={x} -> {back}");
        }

        #[test]
        fn quantile_roundtrip(d in any_distribution(), p in 0.001_f64..0.999) {
            let x = d.icdf(p);
            let back = d.cdf(x);
            prop_assert!((back - p).abs() < 1e-8, "{d:?}: p={p} -> x={x} -> {back}");
        }

        #[test]
        fn cdf_monotonic_and_bounded(d in any_distribution(), u in 0.0_f64..1.0, v in 0.0_f64..1.0) {
            let (lo, hi) = if u <= v { (u, v) } else { (v, u) };
            let x1 = d.icdf(lo);
            let x2 = d.icdf(hi);
            let (c1, c2) = (d.cdf(x1), d.cdf(x2));
            prop_assert!(c1 <= c2 + 1e-12);
            prop_assert!((0.0..=1.0).contains(&c1) && (0.0..=1.0).contains(&c2));
        }

        #[test]
        fn cdf_at_support_bounds(d in any_distribution()) {
            let s = d.support();
            prop_assert_eq!(d.cdf(s.lower), 0.0);
            prop_assert_eq!(d.cdf(s.upper), 1.0);
        }

        #[test]
        fn density_zero_outside_support(d in any_distribution(), gap in 1e-6_f64..100.0) {
            let s = d.support();
            if s.lower.is_finite() {
                prop_assert_eq!(d.pdf(s.lower - gap), 0.0);
            }
            if s.upper.is_finite() {
                prop_assert_eq!(d.pdf(s.upper + gap), 0.0);
            }
        }

        #[test]
        fn quantile_inside_support(d in any_distribution(), p in 0.0_f64..=1.0) {
            let x = d.icdf(p);
            prop_assert!(d.support().contains(x), "{d:?}: icdf({p}) = {x}");
        }
    }
}
