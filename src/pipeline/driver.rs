//! Match driver: runs two agents against each other to termination
//!
//! The driver owns the physical board, kept in seat 0's perspective. Seat 1
//! sees the flipped board, so both agents always reason over canonical
//! states where their own marks are `Mine`.

use rand::Rng;

use crate::board::{BoardState, Mark, Outcome};
use crate::error::{Error, Result};
use crate::ports::{Agent, Observation};

/// Who moves first, and how turns proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRule {
    /// Seat 0 opens, then strict alternation
    Alternate,
    /// Every turn is handed to a uniformly random seat
    Random,
}

/// Where an episode begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRule {
    /// The empty board
    Empty,
    /// A uniformly random ongoing board (exploring starts)
    Exploring,
}

/// One move of a finished episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeStep {
    /// Seat that moved (0 or 1)
    pub seat: usize,
    /// Board as the mover saw it, in the mover's perspective
    pub state: BoardState,
    /// Cell the mover chose
    pub action: usize,
}

/// A finished episode: the full move trace and the terminal scores
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub steps: Vec<EpisodeStep>,
    /// `[1, -1]` when seat 0 won, `[-1, 1]` when seat 1 won, `[0, 0]` drawn
    pub scores: [i32; 2],
}

impl Episode {
    /// The (state, action) trace of one seat, in move order
    pub fn trace_for(&self, seat: usize) -> Vec<(BoardState, usize)> {
        self.steps
            .iter()
            .filter(|step| step.seat == seat)
            .map(|step| (step.state, step.action))
            .collect()
    }
}

/// Plays single episodes between two agents
#[derive(Debug, Clone, Copy)]
pub struct MatchDriver {
    pub turn_rule: TurnRule,
    pub start_rule: StartRule,
}

impl MatchDriver {
    /// Standard play: seat 0 opens on the empty board, strict alternation
    pub fn new() -> Self {
        MatchDriver {
            turn_rule: TurnRule::Alternate,
            start_rule: StartRule::Empty,
        }
    }

    /// Exploring starts: random ongoing board, random seat each turn
    pub fn exploring() -> Self {
        MatchDriver {
            turn_rule: TurnRule::Random,
            start_rule: StartRule::Exploring,
        }
    }

    /// Run one episode to termination
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalAction`] when an agent selects an action
    /// outside its observation, and propagates agent errors.
    pub fn play<R: Rng + ?Sized>(
        &self,
        first: &mut dyn Agent,
        second: &mut dyn Agent,
        rng: &mut R,
    ) -> Result<Episode> {
        let mut board = match self.start_rule {
            StartRule::Empty => BoardState::empty(),
            StartRule::Exploring => BoardState::random_ongoing(rng),
        };
        let mut seat = match self.turn_rule {
            TurnRule::Alternate => 0,
            TurnRule::Random => rng.random_range(0..2),
        };
        let mut steps = Vec::new();

        loop {
            match board.outcome()? {
                Outcome::Ongoing => {}
                Outcome::Win(Mark::Mine) => {
                    return Ok(Episode {
                        steps,
                        scores: [1, -1],
                    });
                }
                Outcome::Win(Mark::Theirs) => {
                    return Ok(Episode {
                        steps,
                        scores: [-1, 1],
                    });
                }
                Outcome::Draw => {
                    return Ok(Episode {
                        steps,
                        scores: [0, 0],
                    });
                }
            }

            let view = if seat == 0 { board } else { board.flipped() };
            let observation = Observation::of(view);
            let agent: &mut dyn Agent = if seat == 0 { &mut *first } else { &mut *second };

            let action = agent.select_action(&observation)?;
            if !observation.actions.contains(&action) {
                return Err(Error::IllegalAction {
                    agent: agent.name().to_string(),
                    action,
                });
            }

            steps.push(EpisodeStep {
                seat,
                state: view,
                action,
            });

            let mark = if seat == 0 { Mark::Mine } else { Mark::Theirs };
            board = board.place(action, mark)?;

            seat = match self.turn_rule {
                TurnRule::Alternate => 1 - seat,
                TurnRule::Random => rng.random_range(0..2),
            };
        }
    }
}

impl Default for MatchDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::pipeline::roster::RandomAgent;

    #[test]
    fn test_scores_are_zero_sum() {
        let driver = MatchDriver::new();
        let mut first = RandomAgent::with_seed(1);
        let mut second = RandomAgent::with_seed(2);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let episode = driver.play(&mut first, &mut second, &mut rng).unwrap();
            assert_eq!(episode.scores[0] + episode.scores[1], 0);
            assert!(matches!(
                episode.scores,
                [1, -1] | [-1, 1] | [0, 0]
            ));
        }
    }

    #[test]
    fn test_alternation_and_trace_split() {
        let driver = MatchDriver::new();
        let mut first = RandomAgent::with_seed(10);
        let mut second = RandomAgent::with_seed(11);
        let mut rng = StdRng::seed_from_u64(12);

        let episode = driver.play(&mut first, &mut second, &mut rng).unwrap();
        for (i, step) in episode.steps.iter().enumerate() {
            assert_eq!(step.seat, i % 2);
        }

        let trace0 = episode.trace_for(0);
        let trace1 = episode.trace_for(1);
        assert_eq!(trace0.len() + trace1.len(), episode.steps.len());
        // seat 0 never moves fewer times than seat 1, and at most once more
        assert!(trace0.len() >= trace1.len());
        assert!(trace0.len() <= trace1.len() + 1);
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        struct CheatingAgent;

        impl Agent for CheatingAgent {
            fn select_action(&mut self, _observation: &Observation) -> Result<usize> {
                Ok(0)
            }

            fn name(&self) -> &str {
                "cheater"
            }
        }

        struct CornerAgent;

        impl Agent for CornerAgent {
            fn select_action(&mut self, observation: &Observation) -> Result<usize> {
                Ok(observation.actions[0])
            }

            fn name(&self) -> &str {
                "corner"
            }
        }

        // the cheater keeps playing cell 0; once it's occupied the driver
        // must refuse the move
        let driver = MatchDriver::new();
        let mut first = CheatingAgent;
        let mut second = CornerAgent;
        let mut rng = StdRng::seed_from_u64(0);

        let result = driver.play(&mut first, &mut second, &mut rng);
        assert!(matches!(result, Err(Error::IllegalAction { .. })));
    }

    #[test]
    fn test_exploring_starts_terminate() {
        let driver = MatchDriver::exploring();
        let mut first = RandomAgent::with_seed(5);
        let mut second = RandomAgent::with_seed(6);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let episode = driver.play(&mut first, &mut second, &mut rng).unwrap();
            assert!(episode.steps.len() <= 9);
        }
    }
}
