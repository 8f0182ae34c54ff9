//! # BRAWL Security - The Referee
//!
//! Anti-cheat validation for fight-to-earn results.
//!
//! ## Features
//!
//! - **Session Issuing**: unguessable session ids and per-session signing seeds
//! - **Rate Limiting**: bounded sessions per player per rolling hour
//! - **Event Log Checks**: ordering, reaction-time floor, hit ratio
//! - **Pattern Detection**: machine-perfect hit periodicity
//! - **Attestation**: HMAC-SHA256 over accepted results, keyed by the seed
//!
//! ## Architecture
//!
//! ```text
//! start game                              submit result
//!     │                                        │
//!     ▼                                        ▼
//! ┌──────────────┐  GameSession   ┌─────────────────────────┐
//! │ RateLimiter  │ ─────────────► │ ResultValidator         │
//! │ SessionIssuer│   (stored)     │  1. session id          │
//! └──────────────┘                │  2. minimum duration    │
//!                                 │  3. score feasibility   │
//!                                 │  4. accuracy ceiling    │
//!                                 │  5. EventLogValidator   │
//!                                 │  6. PatternDetector     │
//!                                 │  7. haircut + attest    │
//!                                 └────────────┬────────────┘
//!                                              ▼
//!                                       ValidationResult
//! ```
//!
//! Everything here is synchronous and free of I/O. The caller owns storage,
//! the clock reading, and at-most-once consumption of sessions.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod anti_cheat;
pub mod attestation;
pub mod clock;
pub mod config;
pub mod error;
pub mod session;
pub mod validation;

pub use anti_cheat::{PatternDetector, PatternReport, SignalReport, SuspiciousSignal};
pub use attestation::{attest, verify_attestation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RateLimitPolicy, SecurityConfig, ValidatorPolicy};
pub use error::{SecurityError, SecurityResult};
pub use session::{RateLimiter, SessionIssuer};
pub use validation::{EventLogSummary, EventLogValidator, ResultValidator};
