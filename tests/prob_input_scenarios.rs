use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::{array, Array2, Axis};
use uqtestfuns::test_functions::{ackley, borehole, ishigami, sobol_g};
use uqtestfuns::{
    stats, DistributionKind, Error, ErrorKind, Formula, Marginal, ProbInputSpec,
    ProbabilisticInput, TestFunction,
};

fn independent_uniforms(seed: u64) -> ProbabilisticInput {
    let mut input = ProbabilisticInput::new(vec![
        Marginal::new(DistributionKind::Uniform, &[0.0, 1.0]).unwrap(),
        Marginal::new(DistributionKind::Uniform, &[0.0, 1.0]).unwrap(),
    ])
    .unwrap();
    input.reset_rng(Some(seed));
    input
}

fn mixed_model() -> ProbabilisticInput {
    ProbabilisticInput::new(vec![
        Marginal::new(DistributionKind::Beta, &[2.0, 5.0, 0.0, 1.0]).unwrap(),
        Marginal::new(DistributionKind::Gumbel, &[0.0, 2.0]).unwrap(),
        Marginal::new(DistributionKind::TruncNormal, &[0.0, 1.0, -1.0, 2.0]).unwrap(),
        Marginal::new(DistributionKind::Triangular, &[-1.0, 1.0, 0.0]).unwrap(),
    ])
    .unwrap()
}

#[test]
fn independent_columns_are_uncorrelated() {
    let mut input = independent_uniforms(31_415);
    let xx = input.get_sample(1000);
    assert_eq!(xx.dim(), (1000, 2));
    let r = stats::correlation(&xx.column(0).to_vec(), &xx.column(1).to_vec()).unwrap();
    // |r| < 4/sqrt(n) under independence
    assert!(r.abs() < 0.13, "r = {r}");
}

#[test]
fn same_master_seed_same_matrix() {
    let mut a = mixed_model();
    let mut b = mixed_model();
    a.reset_rng(Some(5));
    b.reset_rng(Some(5));
    assert_eq!(a.get_sample(64), b.get_sample(64));

    b.reset_rng(Some(6));
    a.reset_rng(Some(5));
    assert_ne!(a.get_sample(64), b.get_sample(64));
}

#[test]
fn joint_density_is_product_of_marginals() {
    let mut input = mixed_model();
    input.reset_rng(Some(9));
    let mut xx = input.get_sample(50);
    // Boundary and outside points
    let extra = array![
        [0.0, 0.0, -1.0, -1.0],
        [1.0, 10.0, 2.0, 1.0],
        [0.5, 0.0, 2.5, 0.0]
    ];
    xx.append(Axis(0), extra.view()).unwrap();

    let joint = input.density(&xx).unwrap();
    for (row, &d) in xx.rows().into_iter().zip(joint.iter()) {
        let expected: f64 = row
            .iter()
            .zip(input.marginals())
            .map(|(&x, m)| m.pdf(x))
            .product();
        assert_relative_eq!(d, expected, max_relative = 1e-15);
    }
    assert_eq!(joint[52], 0.0);
}

#[test]
fn transform_of_identically_seeded_samples_is_identical() {
    let target = mixed_model();
    let mut source_a = ProbabilisticInput::new(vec![
        Marginal::new(DistributionKind::Uniform, &[-1.0, 1.0]).unwrap(),
        Marginal::new(DistributionKind::Uniform, &[-1.0, 1.0]).unwrap(),
        Marginal::new(DistributionKind::Uniform, &[-1.0, 1.0]).unwrap(),
        Marginal::new(DistributionKind::Uniform, &[-1.0, 1.0]).unwrap(),
    ])
    .unwrap();
    let mut source_b = ProbabilisticInput::new(
        (0..4)
            .map(|_| Marginal::new(DistributionKind::Uniform, &[-1.0, 1.0]).unwrap())
            .collect(),
    )
    .unwrap();
    source_a.reset_rng(Some(2718));
    source_b.reset_rng(Some(2718));

    let ya = target.transform_sample_default(&source_a.get_sample(200)).unwrap();
    let yb = target.transform_sample_default(&source_b.get_sample(200)).unwrap();
    assert_eq!(ya, yb);
    assert!(target.contains(&ya));
}

#[test]
fn transformed_sample_follows_target_marginals() {
    let mut canonical = independent_uniforms(88);
    let target = ProbabilisticInput::new(vec![
        Marginal::new(DistributionKind::Normal, &[3.0, 2.0]).unwrap(),
        Marginal::new(DistributionKind::Exponential, &[0.5]).unwrap(),
    ])
    .unwrap();
    let yy = target
        .transform_sample(&canonical.get_sample(20_000), 0.0, 1.0)
        .unwrap();
    let m0 = stats::mean(&yy.column(0).to_vec()).unwrap();
    let m1 = stats::mean(&yy.column(1).to_vec()).unwrap();
    assert_abs_diff_eq!(m0, 3.0, epsilon = 0.1);
    assert_abs_diff_eq!(m1, 2.0, epsilon = 0.1);
}

#[test]
fn transform_rejects_bad_bounds_and_values() {
    let input = mixed_model();
    let xx = Array2::zeros((3, 4));
    let err = input.transform_sample(&xx, 2.0, -2.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);

    let mut outside = Array2::zeros((3, 4));
    outside[[2, 3]] = 1.01;
    match input.transform_sample_default(&outside) {
        Err(Error::OutOfDomain { row, column, value, .. }) => {
            assert_eq!((row, column), (2, 3));
            assert_eq!(value, 1.01);
        }
        other => panic!("unexpected {other:?}"),
    }

    let narrow = Array2::zeros((3, 2));
    assert_eq!(
        input.transform_sample_default(&narrow).unwrap_err().kind(),
        ErrorKind::DimensionMismatch
    );
}

#[test]
fn input_model_loads_from_json() {
    let json = r#"{
        "name": "Borehole (custom)",
        "marginals": [
            {"name": "rw", "distribution": "normal", "parameters": [0.10, 0.0161812]},
            {"name": "r", "distribution": "lognormal", "parameters": [7.71, 1.0056]},
            {"name": "k", "distribution": "truncated-gumbel-max", "parameters": [1.0, 0.5, 0.0, 3.0],
             "description": "a truncated Gumbel"}
        ]
    }"#;
    let spec: ProbInputSpec = serde_json::from_str(json).unwrap();
    let mut input = ProbabilisticInput::from_spec(&spec, Some(10)).unwrap();
    assert_eq!(input.spatial_dimension(), 3);
    assert_eq!(input.name(), Some("Borehole (custom)"));
    assert_eq!(input.marginal(2).unwrap().description(), Some("a truncated Gumbel"));
    let sample = input.get_sample(100);
    assert!(input.contains(&sample));

    let round_trip: ProbInputSpec =
        serde_json::from_str(&serde_json::to_string(&spec).unwrap()).unwrap();
    assert_eq!(round_trip, spec);
}

#[test]
fn invalid_json_parameters_are_rejected_on_build() {
    let json = r#"{"marginals": [{"distribution": "beta", "parameters": [1.0, 1.0, 2.0, 1.0]}]}"#;
    let spec: ProbInputSpec = serde_json::from_str(json).unwrap();
    let err = ProbabilisticInput::from_spec(&spec, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn catalog_functions_evaluate_transformed_samples() {
    let mut canonical = ProbabilisticInput::from_spec(&sobol_g::prob_input_spec(8), Some(1))
        .unwrap();
    let u = canonical.get_sample(100);

    let f = borehole::build(None, Some(1)).unwrap();
    let xx = f.transform_sample(&u, 0.0, 1.0).unwrap();
    let yy = f.evaluate(&xx).unwrap();
    assert_eq!(yy.dim(), (100, 1));
    assert!(yy.iter().all(|y| y.is_finite()));

    let g = ishigami::build(None, Some(1)).unwrap();
    assert_eq!(g.spatial_dimension(), 3);
    assert_eq!(
        g.evaluate(&u).unwrap_err(),
        Error::DimensionMismatch {
            expected: 3,
            got: 8
        }
    );

    let h = ackley::build(8, Some(1)).unwrap();
    assert_eq!(h.output_dimension().unwrap(), 1);
    assert!(h.evaluate(&h.transform_sample(&u, 0.0, 1.0).unwrap()).is_ok());
}

#[test]
fn variable_dimension_functions_fix_their_dimension() {
    for m in [1, 5, 20] {
        let f = sobol_g::build(m, Some("sobol-3"), None).unwrap();
        assert_eq!(f.spatial_dimension(), m);
        assert_eq!(f.parameters().vector("a").unwrap().len(), m);
    }
}

#[test]
fn formula_dimension_must_match_input_model() {
    let err = TestFunction::new(
        ishigami::FUNCTION_ID,
        independent_uniforms(1),
        ishigami::parameters(ishigami::DEFAULT_PARAMETER_SET).unwrap(),
        ishigami::evaluate.with_dimension(ishigami::SPATIAL_DIMENSION),
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::DimensionMismatch {
            expected: 3,
            got: 2
        }
    );
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);

    // Width-agnostic formulas bind to any model
    let f = TestFunction::new(
        "ackley-2d",
        independent_uniforms(1),
        ackley::parameters("ackley").unwrap(),
        ackley::evaluate,
    )
    .unwrap();
    assert_eq!(f.spatial_dimension(), 2);
}
