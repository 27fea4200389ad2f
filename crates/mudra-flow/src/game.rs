//! Shape-duel mini-game
//!
//! A best-of-three round loop over three stored gestures forming a
//! cyclic beats relation (rock beats scissors, paper beats rock,
//! scissors beats paper). Each round counts down, listens for one of the
//! three shapes within a fixed window, and plays it against a uniformly
//! random opponent shape drawn from the trio members currently in the
//! store. First side to the win score takes the game.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use mudra_core::{Gesture, SessionTime};
use mudra_record::capture_frame;

use crate::{FlowContext, FlowState, Intent, Phase, Verdict, Waiting};

/// The three shapes of the duel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rock,
    Paper,
    Scissors,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Rock, Shape::Paper, Shape::Scissors];

    /// Parse a gesture name as a shape (case-insensitive)
    pub fn from_name(name: &str) -> Option<Shape> {
        if name.eq_ignore_ascii_case("rock") {
            Some(Shape::Rock)
        } else if name.eq_ignore_ascii_case("paper") {
            Some(Shape::Paper)
        } else if name.eq_ignore_ascii_case("scissors") {
            Some(Shape::Scissors)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Rock => "rock",
            Shape::Paper => "paper",
            Shape::Scissors => "scissors",
        }
    }

    /// The fixed cyclic beats relation
    pub fn beats(self, other: Shape) -> bool {
        matches!(
            (self, other),
            (Shape::Rock, Shape::Scissors)
                | (Shape::Paper, Shape::Rock)
                | (Shape::Scissors, Shape::Paper)
        )
    }
}

/// Result of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    PlayerPoint,
    OpponentPoint,
    Tie,
}

/// Score a round. Ties occur exactly when the shapes are equal.
pub fn duel(player: Shape, opponent: Shape) -> RoundOutcome {
    if player == opponent {
        RoundOutcome::Tie
    } else if player.beats(opponent) {
        RoundOutcome::PlayerPoint
    } else {
        RoundOutcome::OpponentPoint
    }
}

/// Mini-game pacing and the winning score
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Delay before each round's recognition window opens
    pub countdown: Duration,
    /// How long one round listens for a shape before restarting
    pub listen_window: Duration,
    /// Points needed to win the game
    pub win_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            countdown: Duration::from_secs(3),
            listen_window: Duration::from_secs(5),
            win_score: 2,
        }
    }
}

/// Entry state: waits until all three shape gestures exist in the store
pub struct PreGame {
    config: GameConfig,
    warned: bool,
}

impl PreGame {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        PreGame {
            config,
            warned: false,
        }
    }
}

impl Default for PreGame {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowState for PreGame {
    fn name(&self) -> &'static str {
        "pre-game"
    }

    fn on_end(&mut self, ctx: &mut FlowContext, _now: SessionTime) -> Verdict {
        if ctx.take_intent() == Some(Intent::ExitGame) {
            return Verdict::Next(Box::new(Waiting::new()));
        }

        let missing: Vec<&str> = Shape::ALL
            .iter()
            .filter(|shape| !ctx.store.iter().any(|g| Shape::from_name(g.name()) == Some(**shape)))
            .map(|shape| shape.name())
            .collect();

        if missing.is_empty() {
            Verdict::Next(Box::new(GameRound::new(self.config.clone())))
        } else {
            if !self.warned {
                warn!(?missing, "record the missing shapes before playing");
                self.warned = true;
            }
            Verdict::Pending
        }
    }
}

enum RoundStep {
    /// Arm the next round
    Arm,
    /// Counting down to the recognition window
    Countdown { until: SessionTime },
    /// Listening for one of the three shapes
    Listen { deadline: SessionTime },
}

/// One full game: rounds repeat until either side reaches the win score
pub struct GameRound {
    config: GameConfig,
    rng: StdRng,
    step: RoundStep,
    player_score: u32,
    opponent_score: u32,
}

impl GameRound {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic opponent picks, for tests
    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        GameRound {
            config,
            rng,
            step: RoundStep::Arm,
            player_score: 0,
            opponent_score: 0,
        }
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.player_score, self.opponent_score)
    }

    fn score_round(&mut self, player: Shape, opponent: Shape) {
        match duel(player, opponent) {
            RoundOutcome::PlayerPoint => self.player_score += 1,
            RoundOutcome::OpponentPoint => self.opponent_score += 1,
            RoundOutcome::Tie => {}
        }
        debug!(
            player = player.name(),
            opponent = opponent.name(),
            score = ?(self.player_score, self.opponent_score),
            "round scored"
        );
    }
}

impl FlowState for GameRound {
    fn name(&self) -> &'static str {
        "game-round"
    }

    fn on_end(&mut self, ctx: &mut FlowContext, now: SessionTime) -> Verdict {
        match self.step {
            RoundStep::Arm => {
                debug!("round starting");
                self.step = RoundStep::Countdown {
                    until: now + self.config.countdown,
                };
                Verdict::Pending
            }
            RoundStep::Countdown { until } => {
                if now >= until {
                    self.step = RoundStep::Listen {
                        deadline: now + self.config.listen_window,
                    };
                }
                Verdict::Pending
            }
            RoundStep::Listen { deadline } => {
                let live = capture_frame(ctx.pose.as_mut());
                let FlowContext {
                    store, recognizer, ..
                } = ctx;

                // Recognition restricted to the three shape gestures.
                let trio = store
                    .iter()
                    .filter(|g| Shape::from_name(g.name()).is_some());
                let played = recognizer
                    .recognize(now, &live, trio)
                    .and_then(|m| Shape::from_name(&m.name));

                if let Some(player) = played {
                    let present: Vec<Shape> = shapes_in_store(store);
                    if present.is_empty() {
                        warn!("shape gestures vanished mid-game; restarting round");
                        self.step = RoundStep::Arm;
                        return Verdict::Pending;
                    }
                    let opponent = present[self.rng.gen_range(0..present.len())];
                    self.score_round(player, opponent);

                    let win = self.config.win_score;
                    if self.player_score >= win || self.opponent_score >= win {
                        return Verdict::Next(Box::new(GameWaiting::new(
                            self.config.clone(),
                            self.player_score,
                            self.opponent_score,
                        )));
                    }
                    self.step = RoundStep::Arm;
                } else if now >= deadline {
                    debug!("no shape within the window; restarting round");
                    self.step = RoundStep::Arm;
                }
                Verdict::Pending
            }
        }
    }
}

fn shapes_in_store(store: &mudra_store::GestureStore) -> Vec<Shape> {
    store
        .iter()
        .map(Gesture::name)
        .filter_map(Shape::from_name)
        .collect()
}

/// Game over: wait for a replay-or-exit decision
pub struct GameWaiting {
    config: GameConfig,
    player_score: u32,
    opponent_score: u32,
}

impl GameWaiting {
    pub fn new(config: GameConfig, player_score: u32, opponent_score: u32) -> Self {
        GameWaiting {
            config,
            player_score,
            opponent_score,
        }
    }
}

impl FlowState for GameWaiting {
    fn name(&self) -> &'static str {
        "game-waiting"
    }

    fn on_start(&mut self, _ctx: &mut FlowContext, _now: SessionTime) -> Phase {
        debug!(
            player = self.player_score,
            opponent = self.opponent_score,
            "game over"
        );
        Phase::Complete
    }

    fn on_end(&mut self, ctx: &mut FlowContext, _now: SessionTime) -> Verdict {
        match ctx.take_intent() {
            Some(Intent::Replay) => {
                Verdict::Next(Box::new(PreGame::with_config(self.config.clone())))
            }
            Some(Intent::ExitGame) => Verdict::Next(Box::new(Waiting::new())),
            _ => Verdict::Pending,
        }
    }
}
