//! Property tests over random candidate sets: redundancy symmetry, binary
//! outputs, monotone local search, and fallback equivalence.

use proptest::prelude::*;
use qhive_core::classical::{IMPROVEMENT_THRESHOLD, greedy_init, local_search};
use qhive_core::{
    BackendPolicy, CandidateSet, ExhaustiveBackend, NullBackend, Qubo, SelectionConfig,
    SelectionVector, build_objective, compute_redundancy, solve_classical, solve_via_backend,
};

const EMBEDDING_DIM: usize = 3;
const INTENTS: usize = 3;

fn arb_intent() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01_f64..1.0, INTENTS).prop_map(|raw| {
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|p| p / total).collect()
    })
}

fn arb_candidates(max_n: usize) -> impl Strategy<Value = CandidateSet> {
    (0..=max_n).prop_flat_map(|n| {
        (
            prop::collection::vec(0.0_f64..1.0, n),
            prop::collection::vec(0.0_f64..1.0, n),
            prop::collection::vec(prop::collection::vec(-1.0_f64..1.0, EMBEDDING_DIM), n),
            prop::collection::vec(arb_intent(), n),
        )
            .prop_map(|(relevance, freshness, embeddings, intents)| CandidateSet {
                relevance,
                freshness,
                embeddings,
                intents,
            })
    })
}

fn arb_problem(max_n: usize) -> impl Strategy<Value = (CandidateSet, SelectionConfig)> {
    arb_candidates(max_n).prop_flat_map(|set| {
        let n = set.len();
        (Just(set), 0..=n, 0.0_f64..3.0, 0.0_f64..1.5, 0.0_f64..1.0).prop_map(
            |(set, k, lambda, mu, gamma)| {
                let config = SelectionConfig::new(k)
                    .with_lambda(lambda)
                    .with_mu(mu)
                    .with_gamma(gamma);
                (set, config)
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn redundancy_is_symmetric(set in arb_candidates(10), alpha in 0.0_f64..=1.0) {
        let red = compute_redundancy(&set.embeddings, &set.intents, alpha).unwrap();
        let n = set.len();
        for i in 0..n {
            prop_assert!(red[(i, i)].abs() < f64::EPSILON);
            for j in 0..n {
                prop_assert!((red[(i, j)] - red[(j, i)]).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn flip_gain_equals_objective_difference((set, config) in arb_problem(8)) {
        let red = set.redundancy(0.6).unwrap();
        let objective = build_objective(&set.relevance, &red, &set.freshness, &config).unwrap();
        let x = greedy_init(objective.linear(), config.k);

        for i in 0..objective.len() {
            let mut flipped = x.clone();
            flipped.flip(i);
            let expected = objective.evaluate(&flipped) - objective.evaluate(&x);
            prop_assert!((objective.flip_gain(&x, i) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn local_search_never_lowers_the_objective((set, config) in arb_problem(10)) {
        let red = set.redundancy(0.6).unwrap();
        let objective = build_objective(&set.relevance, &red, &set.freshness, &config).unwrap();

        let mut x = greedy_init(objective.linear(), config.k);
        let before = objective.evaluate(&x);
        let stats = local_search(&objective, &mut x);
        let after = objective.evaluate(&x);

        prop_assert!(after >= before - 1e-12);
        // Each accepted flip gains more than the threshold.
        prop_assert!(
            after - before >= IMPROVEMENT_THRESHOLD * stats.accepted_flips as f64 - 1e-9
        );
        prop_assert!(stats.passes >= 1);
        for i in 0..objective.len() {
            prop_assert!(objective.flip_gain(&x, i) <= IMPROVEMENT_THRESHOLD);
        }
    }

    #[test]
    fn selection_vector_is_binary((set, config) in arb_problem(10)) {
        let red = set.redundancy(0.6).unwrap();
        let objective = build_objective(&set.relevance, &red, &set.freshness, &config).unwrap();
        let outcome = solve_classical(&objective, config.k);

        prop_assert_eq!(outcome.selection.len(), set.len());
        prop_assert!(outcome.selection.to_binary().iter().all(|&b| b <= 1));
        let indices = outcome.selection.indices();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unavailable_backend_matches_classical((set, config) in arb_problem(10)) {
        let config = config.with_qaoa(true, 2);
        let red = set.redundancy(0.6).unwrap();
        let objective = build_objective(&set.relevance, &red, &set.freshness, &config).unwrap();

        let classical = solve_classical(&objective, config.k);
        let adapted = solve_via_backend(&objective, &config, &NullBackend, &BackendPolicy::default());

        prop_assert_eq!(adapted.selection, classical.selection);
        prop_assert!(adapted.regime.is_fallback());
    }

    #[test]
    fn exhaustive_backend_is_at_least_as_good((set, config) in arb_problem(8)) {
        let config = config.with_qaoa(true, 1);
        let red = set.redundancy(0.6).unwrap();
        let objective = build_objective(&set.relevance, &red, &set.freshness, &config).unwrap();

        let classical = solve_classical(&objective, config.k);
        let exact = solve_via_backend(
            &objective,
            &config,
            &ExhaustiveBackend::default(),
            &BackendPolicy::default(),
        );

        prop_assert!(!exact.regime.is_fallback());
        prop_assert!(
            objective.evaluate(&exact.selection) >= objective.evaluate(&classical.selection) - 1e-9
        );
    }

    #[test]
    fn qubo_energy_negates_objective((set, config) in arb_problem(6), mask in any::<u8>()) {
        let red = set.redundancy(0.6).unwrap();
        let objective = build_objective(&set.relevance, &red, &set.freshness, &config).unwrap();
        let bits: Vec<bool> = (0..set.len()).map(|i| mask & (1 << i) != 0).collect();

        let qubo = Qubo::from_objective(&objective);
        let energy = qubo.energy(&bits);
        let value = objective.evaluate(&SelectionVector::from(bits));

        prop_assert!((energy + value).abs() < 1e-9);
    }
}
