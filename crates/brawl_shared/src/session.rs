//! Session types: who is playing, which mode, since when, and the secret the
//! server will sign the outcome with.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::{SERVER_SEED_BYTES, SESSION_ID_BYTES};
use crate::error::{SharedError, SharedResult};

/// Game modes the server issues sessions for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Reaction Arena - hit targets as they appear.
    Reaction,
    /// Precision Challenge - fewer, smaller targets.
    Precision,
    /// Survival - last as long as possible.
    Survival,
}

impl GameMode {
    /// Every supported mode.
    pub const ALL: [Self; 3] = [Self::Reaction, Self::Precision, Self::Survival];

    /// Wire name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reaction => "reaction",
            Self::Precision => "precision",
            Self::Survival => "survival",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SharedError::UnsupportedGameMode(wanted.to_owned()))
    }
}

/// Opaque session identifier.
///
/// Server-issued ids are 32 lowercase hex characters. Ids arriving from the
/// client are wrapped verbatim; an unknown id simply fails the store lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw id as received.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encodes freshly drawn random bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; SESSION_ID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the client sent no id at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized player account identifier (`0x` + 40 lowercase hex digits).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct PlayerAddress(String);

impl PlayerAddress {
    /// Parses and normalizes a raw address.
    ///
    /// # Errors
    ///
    /// Returns [`SharedError::EmptyAddress`] for blank input and
    /// [`SharedError::InvalidAddress`] when the input is not a 20-byte hex
    /// account identifier.
    pub fn parse(raw: &str) -> SharedResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SharedError::EmptyAddress);
        }

        // Checksum casing is advisory here; only the bytes matter.
        Address::from_str(trimmed).map_err(|_| SharedError::InvalidAddress(trimmed.to_owned()))?;

        let lower = trimmed.to_ascii_lowercase();
        let normalized = if lower.starts_with("0x") {
            lower
        } else {
            format!("0x{lower}")
        };
        Ok(Self(normalized))
    }

    /// The normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerAddress {
    type Error = SharedError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl fmt::Display for PlayerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-session signing secret (256 bits).
///
/// **CRITICAL**: never sent to the client before the result is submitted.
/// Anyone holding it can mint valid attestations for the session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSeed(#[serde(with = "hex::serde")] [u8; SERVER_SEED_BYTES]);

impl ServerSeed {
    /// Wraps raw seed bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SERVER_SEED_BYTES]) -> Self {
        Self(bytes)
    }

    /// Raw key material.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SERVER_SEED_BYTES] {
        &self.0
    }
}

impl fmt::Debug for ServerSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // NEVER expose the seed in debug output
        f.write_str("ServerSeed([REDACTED])")
    }
}

/// A server-issued game session.
///
/// Read-only after creation. Consumed exactly once when its result is
/// submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Unique session id.
    pub session_id: SessionId,
    /// Normalized owner address.
    pub player_address: PlayerAddress,
    /// Mode being played.
    pub game_mode: GameMode,
    /// Server clock at creation (Unix milliseconds).
    pub start_time: u64,
    /// Signing secret for this session's attestation.
    pub server_seed: ServerSeed,
}

impl GameSession {
    /// The client-safe view of this session.
    #[must_use]
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket {
            session_id: self.session_id.clone(),
            game_mode: self.game_mode,
            start_time: self.start_time,
        }
    }

    /// Returns true if `player` owns this session.
    #[must_use]
    pub fn is_owned_by(&self, player: &PlayerAddress) -> bool {
        self.player_address == *player
    }
}

/// What the client receives when a game starts. Carries no secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTicket {
    /// Session id to echo back with the result.
    pub session_id: SessionId,
    /// Mode the session was issued for.
    pub game_mode: GameMode,
    /// Server start time (Unix milliseconds).
    pub start_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x1234567890123456789012345678901234567890";

    #[test]
    fn test_game_mode_parse() {
        assert_eq!("reaction".parse::<GameMode>(), Ok(GameMode::Reaction));
        assert_eq!(" Survival ".parse::<GameMode>(), Ok(GameMode::Survival));
        assert_eq!(
            "arena".parse::<GameMode>(),
            Err(SharedError::UnsupportedGameMode("arena".to_owned()))
        );
    }

    #[test]
    fn test_address_normalized_to_lowercase() {
        let mixed = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";
        let address = PlayerAddress::parse(mixed).unwrap();
        assert_eq!(address.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");

        let bare = PlayerAddress::parse(&ADDRESS[2..]).unwrap();
        assert_eq!(bare.as_str(), ADDRESS);
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert_eq!(PlayerAddress::parse("   "), Err(SharedError::EmptyAddress));
        assert!(matches!(
            PlayerAddress::parse("0x1234"),
            Err(SharedError::InvalidAddress(_))
        ));
        assert!(PlayerAddress::parse("not-an-address").is_err());
    }

    #[test]
    fn test_seed_debug_is_redacted() {
        let seed = ServerSeed::from_bytes([0xAB; SERVER_SEED_BYTES]);
        let debug = format!("{seed:?}");
        assert!(!debug.contains("ab"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_ticket_hides_seed() {
        let session = GameSession {
            session_id: SessionId::from_bytes(&[7; SESSION_ID_BYTES]),
            player_address: PlayerAddress::parse(ADDRESS).unwrap(),
            game_mode: GameMode::Precision,
            start_time: 1_700_000_000_000,
            server_seed: ServerSeed::from_bytes([9; SERVER_SEED_BYTES]),
        };

        let json = serde_json::to_value(session.ticket()).unwrap();
        assert_eq!(json["sessionId"], "07".repeat(SESSION_ID_BYTES));
        assert_eq!(json["gameMode"], "precision");
        assert!(json.get("serverSeed").is_none());
    }

    #[test]
    fn test_session_round_trips_through_store_encoding() {
        let session = GameSession {
            session_id: SessionId::new("abc"),
            player_address: PlayerAddress::parse(ADDRESS).unwrap(),
            game_mode: GameMode::Reaction,
            start_time: 42,
            server_seed: ServerSeed::from_bytes([1; SERVER_SEED_BYTES]),
        };

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains(&"01".repeat(SERVER_SEED_BYTES)));
        let back: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
