//! Gameplay events recorded by the client during a round.
//!
//! The client produces these; the server only reads them. Timestamps are the
//! client's own clock and are checked for plausibility, never trusted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type discriminator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameEventKind {
    /// A target was hit
    Hit,
    /// A shot missed
    Miss,
    /// A target spawned
    Spawn,
    /// The player died
    Death,
    /// A powerup was collected
    Powerup,
}

/// A single timestamped gameplay event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Client clock when the event happened (milliseconds).
    pub timestamp: u64,
    /// What happened.
    #[serde(rename = "type")]
    pub kind: GameEventKind,
    /// Opaque payload (target ids and the like). Never interpreted.
    #[serde(default)]
    pub data: Value,
}

impl GameEvent {
    /// Creates an event with an empty payload.
    #[must_use]
    pub const fn new(timestamp: u64, kind: GameEventKind) -> Self {
        Self {
            timestamp,
            kind,
            data: Value::Null,
        }
    }

    /// Shorthand for a hit event.
    #[must_use]
    pub const fn hit(timestamp: u64) -> Self {
        Self::new(timestamp, GameEventKind::Hit)
    }

    /// Shorthand for a miss event.
    #[must_use]
    pub const fn miss(timestamp: u64) -> Self {
        Self::new(timestamp, GameEventKind::Miss)
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Returns true for hit events.
    #[inline]
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.kind == GameEventKind::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let event = GameEvent::hit(1_500).with_data(json!({ "targetId": "7" }));
        let wire = serde_json::to_value(&event).unwrap();

        assert_eq!(wire["type"], "hit");
        assert_eq!(wire["timestamp"], 1_500);
        assert_eq!(wire["data"]["targetId"], "7");
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let event: GameEvent =
            serde_json::from_str(r#"{"timestamp":10,"type":"powerup"}"#).unwrap();
        assert_eq!(event, GameEvent::new(10, GameEventKind::Powerup));
        assert!(!event.is_hit());
    }

    #[test]
    fn test_unknown_kind_is_rejected_at_the_boundary() {
        let parsed = serde_json::from_str::<GameEvent>(r#"{"timestamp":10,"type":"teleport"}"#);
        assert!(parsed.is_err());
    }
}
