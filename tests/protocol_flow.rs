use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use zkp_graph_coloring::{
    run_parallel, Challenge, Color, ColorPermutation, ColoredGraph, CommitmentScheme, Edge, Nonce,
    ProtocolError, ProtocolRunner, Prover, ProverConfig, Rejection, RoundVerdict, RunnerState,
    Verifier,
};

fn sample_graph() -> ColoredGraph {
    ColoredGraph::from_parts(
        vec![Color::Red, Color::Green, Color::Red, Color::Blue],
        &[(0, 1), (1, 3)],
    )
    .unwrap()
}

fn graph_with_one_bad_edge() -> ColoredGraph {
    ColoredGraph::from_parts_unchecked(
        vec![Color::Red, Color::Green, Color::Green, Color::Blue],
        &[(0, 1), (1, 2), (2, 3)],
    )
    .unwrap()
}

fn relabelling() -> ColorPermutation {
    ColorPermutation::new([Color::Blue, Color::Red, Color::Green]).unwrap()
}

#[test]
fn honest_prover_is_never_rejected() {
    let mut rng = StdRng::seed_from_u64(21);
    let graph = ColoredGraph::generate(20, &mut rng).unwrap();
    let prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(22));
    let verifier = Verifier::with_rng(&graph, CommitmentScheme::default(), StdRng::seed_from_u64(23));
    let mut runner = ProtocolRunner::new(prover, verifier, 400);
    assert_eq!(runner.state(), RunnerState::Idle);

    let mut seen_rounds = Vec::new();
    let stats = runner
        .run_with(|record| {
            assert!(record.verdict.is_accepted());
            seen_rounds.push(record.round);
        })
        .unwrap();

    assert_eq!(stats.accepted, 400);
    assert_eq!(stats.rejected, 0);
    assert_eq!(runner.state(), RunnerState::Done);
    assert_eq!(seen_rounds, (0..400).collect::<Vec<u64>>());
}

#[test]
fn fixed_relabelling_opens_permuted_colours() {
    let graph = sample_graph();
    let mut prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(1));
    let mut verifier =
        Verifier::with_rng(&graph, CommitmentScheme::default(), StdRng::seed_from_u64(2));

    let committed = prover.commit_with_permutation(relabelling());
    let table = committed.table().clone();
    assert_eq!(table.len(), 4);
    let challenge = verifier.issue_challenge(&table, Edge::new(0, 1)).unwrap();
    let opening = committed.open_edge(&challenge).unwrap();
    assert_eq!(opening.from.color, Color::Blue);
    assert_eq!(opening.to.color, Color::Red);

    let verdict = verifier.check_round(&table, &challenge, &opening).unwrap();
    assert_eq!(verdict, RoundVerdict::Accepted);
    assert_eq!(verifier.statistics().accepted, 1);
}

#[test]
fn mismatched_nonce_is_rejected() {
    let graph = sample_graph();
    let mut prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(3));
    let mut verifier =
        Verifier::with_rng(&graph, CommitmentScheme::default(), StdRng::seed_from_u64(4));

    let committed = prover.commit_with_permutation(relabelling());
    let table = committed.table().clone();
    let challenge = verifier.issue_challenge(&table, Edge::new(0, 1)).unwrap();
    let mut opening = committed.open_edge(&challenge).unwrap();
    let mut forged = opening.to.nonce.as_bytes().to_vec();
    forged[0] ^= 0xFF;
    opening.to.nonce = Nonce::from_bytes(forged);

    let verdict = verifier.check_round(&table, &challenge, &opening).unwrap();
    assert_eq!(verdict, RoundVerdict::Rejected(Rejection::ToPledgeMismatch));
    let stats = verifier.statistics();
    assert_eq!((stats.accepted, stats.rejected), (0, 1));
}

#[test]
fn lying_about_a_colour_is_rejected() {
    let graph = sample_graph();
    let mut prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(5));
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());

    let committed = prover.commit_round();
    let table = committed.table().clone();
    let challenge = verifier.choose_challenge(&table).unwrap();
    let mut opening = committed.open_edge(&challenge).unwrap();
    opening.from.color = opening.to.color;

    let verdict = verifier.check_round(&table, &challenge, &opening).unwrap();
    assert_eq!(verdict, RoundVerdict::Rejected(Rejection::FromPledgeMismatch));
}

#[test]
fn monochromatic_edge_is_caught_when_challenged() {
    let graph = graph_with_one_bad_edge();
    let mut prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(6));
    let mut verifier =
        Verifier::with_rng(&graph, CommitmentScheme::default(), StdRng::seed_from_u64(7));

    for _ in 0..6 {
        let committed = prover.commit_round();
        let table = committed.table().clone();
        let challenge = verifier.issue_challenge(&table, Edge::new(1, 2)).unwrap();
        let opening = committed.open_edge(&challenge).unwrap();
        let verdict = verifier.check_round(&table, &challenge, &opening).unwrap();
        assert_eq!(verdict, RoundVerdict::Rejected(Rejection::SameColor));
    }
    assert_eq!(verifier.statistics().rejected, 6);
}

#[test]
fn cheating_prover_is_eventually_caught() {
    let graph = graph_with_one_bad_edge();
    let prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(8));
    let verifier = Verifier::with_rng(&graph, CommitmentScheme::default(), StdRng::seed_from_u64(9));
    let stats = ProtocolRunner::new(prover, verifier, 300).run().unwrap();

    assert_eq!(stats.rounds(), 300);
    assert!(stats.rejected > 50, "only {} rejections", stats.rejected);
    assert!(stats.accepted > 100, "only {} acceptances", stats.accepted);
}

#[test]
fn challenges_are_uniform_over_edges() {
    let graph = ColoredGraph::from_parts(
        vec![Color::Red, Color::Green, Color::Blue, Color::Red, Color::Green],
        &[(0, 1), (1, 2), (2, 3), (3, 4)],
    )
    .unwrap();
    let mut prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(10));
    let mut verifier =
        Verifier::with_rng(&graph, CommitmentScheme::default(), StdRng::seed_from_u64(11));
    let table = prover.commit_round().table().clone();

    let trials = 8_000;
    let mut counts: HashMap<Edge, u32> = HashMap::new();
    for _ in 0..trials {
        let challenge = verifier.choose_challenge(&table).unwrap();
        assert!(graph.has_edge(challenge.edge.from, challenge.edge.to));
        *counts.entry(challenge.edge).or_default() += 1;
    }

    assert_eq!(counts.len(), graph.edge_count());
    for (edge, count) in counts {
        assert!(
            (1_750..=2_250).contains(&count),
            "edge {edge:?} challenged {count} times out of {trials}"
        );
    }
}

#[test]
fn edgeless_graph_cannot_be_challenged() {
    let graph = ColoredGraph::from_parts(vec![Color::Red, Color::Green], &[]).unwrap();
    let mut prover = Prover::new(&graph, ProverConfig::default());
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());
    let committed = prover.commit_round();
    assert!(matches!(
        verifier.choose_challenge(committed.table()),
        Err(ProtocolError::NoChallengeableEdge)
    ));

    let prover = Prover::new(&graph, ProverConfig::default());
    let verifier = Verifier::new(&graph, CommitmentScheme::default());
    let result = ProtocolRunner::new(prover, verifier, 3).run();
    assert!(matches!(result, Err(ProtocolError::NoChallengeableEdge)));
}

#[test]
fn stale_round_material_fails_loudly() {
    let graph = sample_graph();
    let mut prover = Prover::new(&graph, ProverConfig::default());
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());

    let stale = prover.commit_round();
    let fresh = prover.commit_round();
    assert_eq!(fresh.round(), stale.round() + 1);
    let challenge = verifier.choose_challenge(fresh.table()).unwrap();
    assert!(matches!(
        stale.open_edge(&challenge),
        Err(ProtocolError::StaleRound { expected: 0, found: 1 })
    ));

    let stale = prover.commit_round();
    let stale_table = stale.table().clone();
    let fresh = prover.commit_round();
    let fresh_table = fresh.table().clone();
    let challenge = verifier.choose_challenge(&fresh_table).unwrap();
    let opening = fresh.open_edge(&challenge).unwrap();
    assert!(matches!(
        verifier.check_round(&stale_table, &challenge, &opening),
        Err(ProtocolError::TableMismatch { expected: 3, found: 2 })
    ));
    assert_eq!(verifier.statistics().rounds(), 0);
}

#[test]
fn opening_for_other_nodes_is_misuse() {
    let graph = sample_graph();
    let mut prover = Prover::new(&graph, ProverConfig::default());
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());
    let committed = prover.commit_round();
    let table = committed.table().clone();
    let challenge = verifier.issue_challenge(&table, Edge::new(0, 1)).unwrap();
    let other = Challenge {
        round: table.round,
        edge: Edge::new(1, 3),
    };
    let opening = committed.open_edge(&other).unwrap();
    assert!(matches!(
        verifier.check_round(&table, &challenge, &opening),
        Err(ProtocolError::OpeningMismatch { .. })
    ));
    assert!(matches!(
        verifier.issue_challenge(&table, Edge::new(0, 2)),
        Err(ProtocolError::NotAnEdge { from: 0, to: 2 })
    ));
    assert_eq!(verifier.statistics().rounds(), 0);
}

#[test]
fn checking_without_a_challenge_is_misuse() {
    let graph = graph_with_one_bad_edge();
    let mut prover = Prover::with_rng(&graph, ProverConfig::default(), StdRng::seed_from_u64(12));
    let mut verifier =
        Verifier::with_rng(&graph, CommitmentScheme::default(), StdRng::seed_from_u64(13));

    // A caller that always names the well-coloured edge must not be scored.
    for _ in 0..5 {
        let committed = prover.commit_round();
        let table = committed.table().clone();
        let chosen = Challenge {
            round: table.round,
            edge: Edge::new(0, 1),
        };
        let opening = committed.open_edge(&chosen).unwrap();
        assert!(matches!(
            verifier.check_round(&table, &chosen, &opening),
            Err(ProtocolError::NoPendingChallenge)
        ));
    }
    assert_eq!(verifier.statistics().rounds(), 0);
}

#[test]
fn same_round_cannot_be_checked_twice() {
    let graph = sample_graph();
    let mut prover = Prover::new(&graph, ProverConfig::default());
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());
    let committed = prover.commit_round();
    let table = committed.table().clone();
    let challenge = verifier.choose_challenge(&table).unwrap();
    let opening = committed.open_edge(&challenge).unwrap();

    assert_eq!(
        verifier.check_round(&table, &challenge, &opening).unwrap(),
        RoundVerdict::Accepted
    );
    assert!(matches!(
        verifier.check_round(&table, &challenge, &opening),
        Err(ProtocolError::NoPendingChallenge)
    ));
    assert_eq!(verifier.statistics().accepted, 1);
    assert_eq!(verifier.statistics().rounds(), 1);
}

#[test]
fn table_swapped_after_challenge_is_misuse() {
    let graph = sample_graph();
    let mut prover = Prover::new(&graph, ProverConfig::default());
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());

    let first = prover.commit_round();
    let first_table = first.table().clone();
    let second = prover.commit_round();
    let second_table = second.table().clone();
    let challenge = verifier.choose_challenge(&first_table).unwrap();
    let opening = first.open_edge(&challenge).unwrap();
    assert!(matches!(
        verifier.check_round(&second_table, &challenge, &opening),
        Err(ProtocolError::TableMismatch { expected: 0, found: 1 })
    ));

    // Same round number, different pledges.
    let mut rival = Prover::new(&graph, ProverConfig::default());
    let rival_table = rival.commit_round().table().clone();
    assert_eq!(rival_table.round, 0);
    let honest = Prover::new(&graph, ProverConfig::default()).commit_round();
    let honest_table = honest.table().clone();
    let challenge = verifier.choose_challenge(&honest_table).unwrap();
    let opening = honest.open_edge(&challenge).unwrap();
    assert!(matches!(
        verifier.check_round(&rival_table, &challenge, &opening),
        Err(ProtocolError::TableMismatch { expected: 0, found: 0 })
    ));
    assert_eq!(verifier.statistics().rounds(), 0);
}

#[test]
fn substituted_challenge_is_misuse() {
    let graph = sample_graph();
    let mut prover = Prover::new(&graph, ProverConfig::default());
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());
    let committed = prover.commit_round();
    let table = committed.table().clone();
    verifier.issue_challenge(&table, Edge::new(0, 1)).unwrap();

    let substituted = Challenge {
        round: table.round,
        edge: Edge::new(1, 3),
    };
    let opening = committed.open_edge(&substituted).unwrap();
    assert!(matches!(
        verifier.check_round(&table, &substituted, &opening),
        Err(ProtocolError::ChallengeMismatch {
            from: 0,
            to: 1,
            found_from: 1,
            found_to: 3,
        })
    ));
    assert_eq!(verifier.statistics().rounds(), 0);
}

#[test]
fn table_of_wrong_length_is_refused() {
    let graph = sample_graph();
    let other = ColoredGraph::from_parts(vec![Color::Red, Color::Blue], &[(0, 1)]).unwrap();
    let mut prover = Prover::new(&other, ProverConfig::default());
    let mut verifier = Verifier::new(&graph, CommitmentScheme::default());
    let committed = prover.commit_round();
    assert!(matches!(
        verifier.choose_challenge(committed.table()),
        Err(ProtocolError::TableSizeMismatch { expected: 4, found: 2 })
    ));
}

#[test]
fn each_round_uses_fresh_nonces() {
    let graph = sample_graph();
    let mut prover = Prover::new(&graph, ProverConfig::default());
    let first = prover.commit_round();
    let second = prover.commit_round();
    for (a, b) in first.table().pledges.iter().zip(&second.table().pledges) {
        assert_ne!(a, b);
    }
}

#[test]
fn parallel_rounds_accept_honest_prover() {
    let mut rng = StdRng::seed_from_u64(30);
    let graph = ColoredGraph::generate(12, &mut rng).unwrap();
    assert!(graph.edge_count() > 0);
    let stats = run_parallel(&graph, 200, ProverConfig::default()).unwrap();
    assert_eq!(stats.accepted, 200);
    assert_eq!(stats.rejected, 0);
}
