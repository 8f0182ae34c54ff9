//! # BRAWL Rewards
//!
//! Everything between a referee verdict and tokens in a wallet.
//!
//! ## Modules
//!
//! - **store**: session, result and claim storage boundaries plus in-memory backends
//! - **reward**: integer reward schedule per game mode
//! - **mint**: the payout boundary
//! - **service**: [`ArenaService`], the start / submit / claim flow
//!
//! ## Invariants
//!
//! - A session is judged at most once.
//! - A claim is paid at most once, and only against a valid attestation.
//! - Payout amounts come from stored verdicts, never from the request.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod mint;
pub mod reward;
pub mod service;
pub mod store;

pub use config::ArenaConfig;
pub use error::{ArenaError, ArenaResult};
pub use mint::{MintRecord, RecordingMinter, RewardMinter};
pub use reward::RewardPolicy;
pub use service::{ArenaService, ArenaStores, ClaimReceipt};
pub use store::{
    ClaimLedger, InMemoryClaimLedger, InMemoryResultStore, InMemorySessionStore, ResultStore,
    SessionStore, VerifiedResult,
};
