//! # Result Attestation
//!
//! The signature handed to the claim ledger:
//!
//! ```text
//! HMAC-SHA256(key = server_seed, msg = "{session_id}:{score}:{kills}")
//! ```
//!
//! Only the holder of the session's seed can produce it. The client-side
//! hash never enters the message.

use brawl_shared::{ServerSeed, SessionId, Signature};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(session_id: &SessionId, score: u64, kills: u32, seed: &ServerSeed) -> HmacSha256 {
    let Ok(mut mac) = HmacSha256::new_from_slice(seed.as_bytes()) else {
        unreachable!("HMAC accepts keys of any length");
    };
    mac.update(format!("{session_id}:{score}:{kills}").as_bytes());
    mac
}

/// Signs a verified result.
#[must_use]
pub fn attest(session_id: &SessionId, score: u64, kills: u32, seed: &ServerSeed) -> Signature {
    let tag = keyed_mac(session_id, score, kills, seed).finalize().into_bytes();
    Signature::from_bytes(&tag)
}

/// Checks a presented signature in constant time.
#[must_use]
pub fn verify_attestation(
    session_id: &SessionId,
    score: u64,
    kills: u32,
    seed: &ServerSeed,
    signature: &Signature,
) -> bool {
    let Some(presented) = signature.to_bytes() else {
        return false;
    };
    keyed_mac(session_id, score, kills, seed)
        .verify_slice(&presented)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> ServerSeed {
        ServerSeed::from_bytes([byte; 32])
    }

    #[test]
    fn test_attestation_is_deterministic() {
        let id = SessionId::new("00112233445566778899aabbccddeeff");
        let a = attest(&id, 950, 20, &seed(1));
        let b = attest(&id, 950, 20, &seed(1));

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_every_input_moves_the_signature() {
        let id = SessionId::new("00112233445566778899aabbccddeeff");
        let base = attest(&id, 950, 20, &seed(1));

        assert_ne!(base, attest(&id, 951, 20, &seed(1)));
        assert_ne!(base, attest(&id, 950, 21, &seed(1)));
        assert_ne!(base, attest(&id, 950, 20, &seed(2)));
        assert_ne!(base, attest(&SessionId::new("ff"), 950, 20, &seed(1)));
    }

    #[test]
    fn test_verify_round_trip() {
        let id = SessionId::new("abcd");
        let signature = attest(&id, 100, 3, &seed(7));

        assert!(verify_attestation(&id, 100, 3, &seed(7), &signature));
        assert!(!verify_attestation(&id, 101, 3, &seed(7), &signature));
        assert!(!verify_attestation(&id, 100, 3, &seed(8), &signature));
        assert!(!verify_attestation(&id, 100, 3, &seed(7), &Signature::new("zz-not-hex")));
        assert!(!verify_attestation(&id, 100, 3, &seed(7), &Signature::new("")));
    }
}
