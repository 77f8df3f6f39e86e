//! # finance_quiz_engine
//!
//! A headless engine for a financial-statements quiz game: the scenario and
//! level progression, the player's balance and bank, and the random crisis
//! and war events that interrupt play. Rendering, audio, and input belong to
//! the host; this crate only owns the rules.
//!
//! ## How it works
//!
//! 1. Load a [`GameData`] from three JSON sources: scenario questions, crisis
//!    true/false questions, and war narratives.
//! 2. Build a [`GameSession`] with a [`GameConfig`] (defaults match the
//!    shipped game). The session draws its first scenario immediately.
//! 3. Drive it from the host: player actions (`load_level`, `submit_answer`,
//!    `advance`, `borrow`, `evaluate_events`, `answer_crisis`,
//!    `acknowledge_war`) plus a per-frame `tick(dt)` for the scenario timer
//!    and crisis losses.
//! 4. Read [`GameSession::phase`] and drain [`GameEvent`]s to update the UI.
//!    [`view_adapter`] builds ready-to-render snapshots.
//!
//! ## Key features
//!
//! - **Deterministic**: set `rng_seed` in the config to replay a session
//!   exactly, shuffles and event rolls included.
//! - **Explicit terminal states**: game over and game complete are
//!   [`Phase`]s, not errors. `reset` restarts from any phase.
//! - **Fail-fast loading**: one malformed question or an undersized scenario
//!   rejects the whole data set.
//!
//! ## Quick start
//!
//! ```rust
//! use finance_quiz_engine::{GameConfig, GameData, GameSession, Phase};
//!
//! let question = r#"{ "company": "Acme", "sector": "Retail",
//!     "statements": ["Revenue rose 10%"], "table": [["Revenue", "110"]],
//!     "options": ["True", "False"], "correct": "True", "justification": "See table." }"#;
//! let pool = vec![question; 20].join(",");
//! let scenarios = format!(r#"{{ "Retail": [{pool}] }}"#);
//! let data = GameData::from_json(&scenarios, "[]", "[]").unwrap();
//!
//! let config = GameConfig { rng_seed: Some(7), ..GameConfig::default() };
//! let mut session = GameSession::new(config, data).unwrap();
//!
//! session.load_level().unwrap();
//! let round = session.submit_answer("True").unwrap();
//! assert!(round.correct);
//! assert_eq!(session.balance(), 10);
//! assert_eq!(session.phase(), Phase::RoundOver);
//! ```

pub mod game_engine;
pub mod view_adapter;

// Convenience re-exports so callers can use `finance_quiz_engine::GameSession`
// directly without reaching into `game_engine::`.
pub use game_engine::{
    BorrowOutcome, ConfigError, CrisisExit, DataFormatError, EventDecision, GameConfig,
    GameData, GameError, GameEvent, GameSession, LevelKey, Phase, Question, RoundResult,
    StreakMode, WarOutcome,
};
