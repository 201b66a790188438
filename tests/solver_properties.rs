//! Properties of the policy-iteration solver on the full game

use rand::SeedableRng;
use rand::rngs::StdRng;

use oxrl::board::BoardState;
use oxrl::dp::PolicyIterationSolver;
use oxrl::error::Error;
use oxrl::pipeline::{MatchDriver, RandomAgent};

#[test]
fn expected_returns_stay_within_score_range() {
    let mut solver = PolicyIterationSolver::new();
    let root = BoardState::empty();
    for action in root.legal_actions() {
        let value = solver.expected_return(root, action).unwrap();
        assert!((-1.0..=1.0).contains(&value), "return {value} out of range");
    }
}

#[test]
fn illegal_actions_are_errors_not_sentinels() {
    let mut solver = PolicyIterationSolver::new();
    let state = BoardState::from_label("X.O......").unwrap();
    assert!(matches!(
        solver.expected_return(state, 0),
        Err(Error::InvalidAction { action: 0 })
    ));
}

#[test]
fn solved_game_values_every_opening_positively() {
    let mut solver = PolicyIterationSolver::new();
    solver.solve().unwrap();

    let root = BoardState::empty();
    // against a random opponent the first player cannot be at a disadvantage
    assert!(solver.tables.value(&root) >= 0.0);

    // every opening wins far more often than it loses; the exact ordering of
    // openings sits below the convergence bound, so only the magnitude is
    // asserted
    for action in 0..9 {
        let value = solver.expected_return(root, action).unwrap();
        assert!(value > 0.5, "opening {action} valued at {value}");
    }
}

#[test]
fn solved_policy_beats_random_play() {
    let mut solver = PolicyIterationSolver::new();
    solver.solve().unwrap();

    let driver = MatchDriver::new();
    let mut opponent = RandomAgent::with_seed(17);
    let mut rng = StdRng::seed_from_u64(18);

    let mut wins = 0;
    let mut losses = 0;
    for _ in 0..200 {
        let episode = driver.play(&mut solver, &mut opponent, &mut rng).unwrap();
        match episode.scores[0] {
            1 => wins += 1,
            -1 => losses += 1,
            _ => {}
        }
    }
    assert!(
        wins > losses,
        "solved policy won {wins} and lost {losses} of 200 games"
    );
}

#[test]
fn exhausted_sweep_limit_reports_nonconvergence() {
    let mut solver = PolicyIterationSolver::with_bound(0.0, 1);
    solver.seed_states().unwrap();
    match solver.policy_evaluation() {
        Err(Error::NonConvergence { sweeps, .. }) => assert_eq!(sweeps, 1),
        other => panic!("expected NonConvergence, got {other:?}"),
    }
}
