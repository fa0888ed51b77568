//! Session driver: hidden die, roll simulation and scoring.
//!
//! A session owns the belief engine and the RNG. It picks the hidden die once,
//! rolls it on request, feeds each roll to the engine and finally compares the
//! engine's guess with the hidden die. The engine never sees the hidden die.

use bd_config::{RollRange, Settings};
use bd_math::DistributionSummary;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, trace};

use crate::inference::{BeliefEngine, BeliefError, BeliefTable, DEFAULT_GUESS_THRESHOLD};

/// Errors raised while driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Belief(#[from] BeliefError),

    #[error("guess threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("a {sides}-sided die cannot be rolled with roll range {roll_range}")]
    UnrollableDie { sides: u32, roll_range: RollRange },
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Parameters for a single session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub hypotheses: Vec<u32>,
    pub guess_threshold: f64,
    pub roll_range: RollRange,
    /// RNG seed; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            hypotheses: bd_config::DEFAULT_HYPOTHESES.to_vec(),
            guess_threshold: DEFAULT_GUESS_THRESHOLD,
            roll_range: RollRange::default(),
            seed: None,
        }
    }
}

impl From<&Settings> for SessionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            hypotheses: settings.hypotheses.clone(),
            guess_threshold: settings.guess_threshold,
            roll_range: settings.roll_range,
            seed: settings.seed,
        }
    }
}

/// Outcome of comparing the final guess with the hidden die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// A confident guess matched the hidden die.
    Correct,
    /// A confident guess named the wrong die.
    Incorrect,
    /// No die held the guess threshold when the session ended.
    Undecided,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Correct => write!(f, "correct"),
            Verdict::Incorrect => write!(f, "incorrect"),
            Verdict::Undecided => write!(f, "undecided"),
        }
    }
}

/// Result of one roll.
#[derive(Debug, Clone, Serialize)]
pub struct RollOutcome {
    /// 1-based roll counter.
    pub roll_number: usize,
    pub roll: u32,
    pub table: BeliefTable,
    pub guess: Option<u32>,
}

/// Final report for a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub hidden_die: u32,
    pub guess: Option<u32>,
    pub verdict: Verdict,
    pub rolls: usize,
    pub observations: Vec<u32>,
    pub posterior: Vec<PosteriorEntry>,
    pub distribution: DistributionSummary,
    pub guess_threshold: f64,
    pub roll_range: RollRange,
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Posterior probability for one die.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PosteriorEntry {
    pub sides: u32,
    pub probability: f64,
}

/// One play-through with a single hidden die.
#[derive(Debug)]
pub struct Session {
    id: String,
    engine: BeliefEngine,
    rng: StdRng,
    hidden_die: u32,
    guess_threshold: f64,
    roll_range: RollRange,
    seed: u64,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Build the engine and pick the hidden die uniformly at random.
    pub fn new(options: SessionOptions) -> Result<Self> {
        let t = options.guess_threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(SessionError::InvalidThreshold(t));
        }
        let engine = BeliefEngine::new(&options.hypotheses)?;
        if let Some(&sides) = engine
            .hypotheses()
            .sides()
            .iter()
            .find(|&&s| options.roll_range.max_face(s) == 0)
        {
            return Err(SessionError::UnrollableDie {
                sides,
                roll_range: options.roll_range,
            });
        }

        let seed = options.seed.unwrap_or_else(rand::random::<u64>);
        let mut rng = StdRng::seed_from_u64(seed);
        let sides = engine.hypotheses().sides();
        let hidden_die = sides[rng.random_range(0..sides.len())];
        let id = generate_session_id();

        info!(
            session_id = %id,
            hypotheses = %engine.hypotheses(),
            roll_range = %options.roll_range,
            threshold = t,
            seed,
            "session started"
        );
        trace!(session_id = %id, hidden_die, "hidden die selected");

        Ok(Self {
            id,
            engine,
            rng,
            hidden_die,
            guess_threshold: t,
            roll_range: options.roll_range,
            seed,
            started_at: Utc::now(),
        })
    }

    /// Roll the hidden die once and update the belief.
    pub fn roll(&mut self) -> Result<RollOutcome> {
        let max_face = self.roll_range.max_face(self.hidden_die);
        let roll = self.rng.random_range(1..=max_face);
        self.engine.observe(roll)?;
        self.engine.update_belief()?;

        let outcome = RollOutcome {
            roll_number: self.engine.observations().len(),
            roll,
            table: self.engine.table(),
            guess: self.engine.best_guess(self.guess_threshold),
        };
        info!(
            session_id = %self.id,
            roll_number = outcome.roll_number,
            roll,
            guess = ?outcome.guess,
            "roll observed"
        );
        Ok(outcome)
    }

    /// Current confident guess, if any.
    pub fn guess(&self) -> Option<u32> {
        self.engine.best_guess(self.guess_threshold)
    }

    /// Score the current guess against the hidden die.
    ///
    /// Only the final belief counts; a guess that lapsed after later rolls
    /// does not.
    pub fn verdict(&self) -> Verdict {
        match self.guess() {
            Some(g) if g == self.hidden_die => Verdict::Correct,
            Some(_) => Verdict::Incorrect,
            None => Verdict::Undecided,
        }
    }

    /// End the session and report.
    pub fn finish(self) -> SessionSummary {
        let posterior: Vec<PosteriorEntry> = self
            .engine
            .current_posterior()
            .into_iter()
            .map(|(sides, probability)| PosteriorEntry { sides, probability })
            .collect();
        let summary = SessionSummary {
            session_id: self.id.clone(),
            hidden_die: self.hidden_die,
            guess: self.guess(),
            verdict: self.verdict(),
            rolls: self.engine.observations().len(),
            observations: self.engine.observations().to_vec(),
            distribution: DistributionSummary::from_probs(self.engine.posterior().as_slice()),
            posterior,
            guess_threshold: self.guess_threshold,
            roll_range: self.roll_range,
            seed: self.seed,
            started_at: self.started_at,
            finished_at: Utc::now(),
        };
        info!(
            session_id = %summary.session_id,
            verdict = %summary.verdict,
            rolls = summary.rolls,
            "session finished"
        );
        summary
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> &BeliefEngine {
        &self.engine
    }

    /// The die being rolled. For scoring and display after the session.
    pub fn hidden_die(&self) -> u32 {
        self.hidden_die
    }

    pub fn guess_threshold(&self) -> f64 {
        self.guess_threshold
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rolls(&self) -> usize {
        self.engine.observations().len()
    }
}

/// Generate a unique session ID.
pub fn generate_session_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    // Shorten to first 12 hex chars for readability
    format!("session-{}", &uuid[..12])
}
