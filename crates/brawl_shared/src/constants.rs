//! # Round Constants
//!
//! Sizes of the server-generated session material. These are part of the
//! wire contract: the client sees hex-encoded session ids of exactly this
//! length.

/// Random bytes in a session id (128 bits).
pub const SESSION_ID_BYTES: usize = 16;

/// Random bytes in a server seed (256 bits).
pub const SERVER_SEED_BYTES: usize = 32;

/// Hex length of an encoded session id.
pub const SESSION_ID_HEX_LEN: usize = SESSION_ID_BYTES * 2;

/// Milliseconds per second, for converting wall-clock spans.
pub const MS_PER_SECOND: u64 = 1_000;
