//! Game state and session lifecycle
//!
//! One `GameState` per page. Phase transitions drive every other mutation:
//! physics and obstacles only change while `Playing`.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::layout::Layout;
use super::obstacles::ObstacleField;
use super::physics::Character;
use crate::identifier::{Identifier, IdentifierError};
use crate::leaderboard::ScoreSubmission;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for an identifier and a start trigger
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    Ended,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Idle => "idle",
            GamePhase::Playing => "playing",
            GamePhase::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Gameplay events for audio and HUD, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A run began (start or restart)
    Started,
    /// Flap impulse applied
    Flapped,
    /// Points awarded; carries the new score
    Scored { score: u64 },
    /// Run ended with this score
    Crashed { score: u64 },
    /// Crash score beat the session best
    NewBest { score: u64 },
}

/// A refused state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Identifier failed validation
    InvalidIdentifier(IdentifierError),
    /// Identifier already set for this session
    IdentifierLocked,
    /// Start requested before an identifier was accepted
    MissingIdentifier,
    /// Transition not allowed from the current phase
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidIdentifier(e) => write!(f, "{}", e),
            SessionError::IdentifierLocked => {
                write!(f, "Wallet address is already set for this session.")
            }
            SessionError::MissingIdentifier => write!(f, "Enter a wallet address before playing."),
            SessionError::WrongPhase { expected, actual } => {
                write!(f, "Game must be {} but is {}.", expected, actual)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::InvalidIdentifier(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IdentifierError> for SessionError {
    fn from(e: IdentifierError) -> Self {
        SessionError::InvalidIdentifier(e)
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Highest score reached this session
    pub best: u64,
    identifier: Option<Identifier>,
    pub layout: Layout,
    pub character: Character,
    pub obstacles: ObstacleField,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    pending_submission: Option<ScoreSubmission>,
}

impl GameState {
    /// Create an idle session for a surface of the given size
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let layout = Layout::for_surface(width, height);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            best: 0,
            identifier: None,
            layout,
            character: Character::new(&layout),
            obstacles: ObstacleField::new(),
            time_ticks: 0,
            events: Vec::new(),
            pending_submission: None,
        }
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Validate and store the player's identifier (Idle only, once)
    ///
    /// On error nothing changes.
    pub fn submit_identifier(&mut self, raw: &str) -> Result<&Identifier, SessionError> {
        self.expect_phase(GamePhase::Idle)?;
        if self.identifier.is_some() {
            return Err(SessionError::IdentifierLocked);
        }
        let identifier = Identifier::parse(raw)?;
        log::info!("Identifier accepted: {}", identifier.abbreviated());
        let stored = self.identifier.insert(identifier);
        Ok(&*stored)
    }

    /// Idle -> Playing
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_phase(GamePhase::Idle)?;
        if self.identifier.is_none() {
            return Err(SessionError::MissingIdentifier);
        }
        self.begin_run();
        Ok(())
    }

    /// Ended -> Playing with a fresh run
    ///
    /// The next run reseeds from the previous seed so a whole session
    /// replays identically from its first seed.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.expect_phase(GamePhase::Ended)?;
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.begin_run();
        Ok(())
    }

    fn begin_run(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.obstacles.clear();
        self.character.reset(&self.layout);
        self.pending_submission = None;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Playing -> Ended, queueing the score for submission exactly once
    pub(crate) fn end_run(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Ended;
        self.events.push(GameEvent::Crashed { score: self.score });

        if self.score > self.best {
            self.best = self.score;
            self.events.push(GameEvent::NewBest { score: self.score });
        }

        if let Some(identifier) = &self.identifier {
            self.pending_submission = Some(ScoreSubmission::new(identifier, self.score));
        }
        log::info!("Run ended with score {} after {} ticks", self.score, self.time_ticks);
    }

    /// Award points (never decreases the score)
    pub(crate) fn award(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score += u64::from(points);
        self.events.push(GameEvent::Scored { score: self.score });
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the queued score submission; yields it once per ended run
    pub fn take_submission(&mut self) -> Option<ScoreSubmission> {
        self.pending_submission.take()
    }

    /// Drain gameplay events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Adopt a new surface size, rescaling positions proportionally
    pub fn resize(&mut self, width: f32, height: f32) {
        let old = self.layout;
        let layout = Layout::for_surface(width, height);
        if layout == old {
            return;
        }
        let sx = layout.width / old.width;
        let sy = layout.height / old.height;

        self.character.x = layout.character_x;
        self.character.size = layout.character_size;
        self.character.y *= sy;
        self.character.velocity *= sy;
        self.obstacles.rescale(sx, sy, layout.gap_height);
        self.layout = layout;

        log::debug!("Layout resized to {}x{}", layout.width, layout.height);
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}
