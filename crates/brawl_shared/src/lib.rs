//! # BRAWL Shared
//!
//! Common types used by the game client, the result server and the claim
//! service.
//!
//! ## CRITICAL RULE
//!
//! Everything the client sends ([`GameResult`], [`GameEvent`]) is a claim.
//! Everything the server produces ([`GameSession`], [`ValidationResult`]) is
//! authoritative. Types here carry no validation policy; that lives in
//! `brawl_security`.
//!
//! ## Round Lifecycle
//!
//! ```text
//! SERVER                         CLIENT
//!   │                              │
//!   │── SessionTicket ────────────►│  (session id, mode, start time)
//!   │   (server seed stays here)   │
//!   │                              │  plays, records GameEvents
//!   │◄──────────────── GameResult ─│
//!   │                              │
//!   ▼
//! ValidationResult ──► claim ledger
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod error;
pub mod events;
pub mod protocol;
pub mod session;

pub use error::{SharedError, SharedResult};
pub use events::{GameEvent, GameEventKind};
pub use protocol::{GameResult, RejectReason, Signature, ValidationResult};
pub use session::{GameMode, GameSession, PlayerAddress, ServerSeed, SessionId, SessionTicket};
