//! Signed envelope: `{type, payload, signature}`.
//!
//! The payload is decoded once, by its declared `type` tag, into one of three
//! fixed-shape structs. What gets signed is the canonical encoding of that
//! struct (`serde_json` with declared field order and no extra fields), so
//! adding or reordering fields on the wire cannot change what was signed.

use ballot_types::{PrivateKey, Rejection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three transaction types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Election,
    Poll,
    Vote,
}

impl EnvelopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeKind::Election => "election",
            EnvelopeKind::Poll => "poll",
            EnvelopeKind::Vote => "vote",
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Election-create payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionCreate {
    pub id: String,
    pub from: String,
    /// Hex public keys of the eligible voters.
    pub voters: Vec<String>,
}

/// Poll-create payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollCreate {
    pub from: String,
    /// Content address of the folder holding `poll.json`.
    pub poll_hash: String,
    pub election_id: String,
}

/// Vote-cast payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCast {
    pub from: String,
    pub poll_hash: String,
    pub choice: String,
}

/// A payload tagged by its envelope type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Election(ElectionCreate),
    Poll(PollCreate),
    Vote(VoteCast),
}

impl Payload {
    pub fn kind(&self) -> EnvelopeKind {
        match self {
            Payload::Election(_) => EnvelopeKind::Election,
            Payload::Poll(_) => EnvelopeKind::Poll,
            Payload::Vote(_) => EnvelopeKind::Vote,
        }
    }

    /// Hex public key of the submitter.
    pub fn from(&self) -> &str {
        match self {
            Payload::Election(p) => &p.from,
            Payload::Poll(p) => &p.from,
            Payload::Vote(p) => &p.from,
        }
    }

    /// The bytes covered by the signature.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("payload structs always serialize")
    }

    fn decode(kind: EnvelopeKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            EnvelopeKind::Election => Payload::Election(serde_json::from_value(value)?),
            EnvelopeKind::Poll => Payload::Poll(serde_json::from_value(value)?),
            EnvelopeKind::Vote => Payload::Vote(serde_json::from_value(value)?),
        })
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: EnvelopeKind,
    payload: serde_json::Value,
    signature: String,
}

#[derive(Serialize)]
struct WireEnvelope<'a> {
    #[serde(rename = "type")]
    kind: EnvelopeKind,
    payload: &'a Payload,
    signature: &'a str,
}

/// A decoded transaction. The signature is kept as submitted (hex) and is
/// only decoded during verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub payload: Payload,
    pub signature: String,
}

impl Envelope {
    /// Decode raw transaction bytes. Any shape problem is an encoding error.
    pub fn decode(bytes: &[u8]) -> Result<Self, Rejection> {
        let raw: RawEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| Rejection::encoding(format!("malformed envelope: {e}")))?;
        let payload = Payload::decode(raw.kind, raw.payload)
            .map_err(|e| Rejection::encoding(format!("malformed {} payload: {e}", raw.kind)))?;
        Ok(Self {
            payload,
            signature: raw.signature,
        })
    }

    /// Sign `payload` with `key`. The caller is responsible for `payload.from`
    /// matching the key.
    pub fn sign(payload: Payload, key: &PrivateKey) -> Self {
        let signature = ballot_crypto::sign_message(&payload.canonical_bytes(), key);
        Self {
            payload,
            signature: signature.to_hex(),
        }
    }

    pub fn kind(&self) -> EnvelopeKind {
        self.payload.kind()
    }

    /// Wire encoding, accepted by [`Envelope::decode`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let wire = WireEnvelope {
            kind: self.kind(),
            payload: &self.payload,
            signature: &self.signature,
        };
        serde_json::to_vec(&wire).expect("envelope always serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::ResponseCode;

    fn vote() -> Payload {
        Payload::Vote(VoteCast {
            from: "ab".into(),
            poll_hash: "Qm1".into(),
            choice: "a".into(),
        })
    }

    #[test]
    fn canonical_bytes_follow_declared_field_order() {
        assert_eq!(
            vote().canonical_bytes(),
            br#"{"from":"ab","poll_hash":"Qm1","choice":"a"}"#.to_vec()
        );
    }

    #[test]
    fn decode_drops_unknown_payload_fields() {
        let raw = br#"{"type":"vote","signature":"00","payload":{"choice":"a","extra":1,"poll_hash":"Qm1","from":"ab"}}"#;
        let env = Envelope::decode(raw).unwrap();
        assert_eq!(env.payload, vote());
        assert_eq!(env.payload.canonical_bytes(), vote().canonical_bytes());
    }

    #[test]
    fn wire_roundtrip() {
        let env = Envelope {
            payload: Payload::Election(ElectionCreate {
                id: "e1".into(),
                from: "ab".into(),
                voters: vec!["cd".into(), "ef".into()],
            }),
            signature: "ff".into(),
        };
        assert_eq!(Envelope::decode(&env.to_bytes()).unwrap(), env);
    }

    #[test]
    fn unknown_type_is_encoding_error() {
        let raw = br#"{"type":"referendum","payload":{},"signature":""}"#;
        assert_eq!(
            Envelope::decode(raw).unwrap_err().code,
            ResponseCode::EncodingError
        );
    }

    #[test]
    fn missing_payload_field_is_encoding_error() {
        let raw = br#"{"type":"poll","payload":{"from":"ab","poll_hash":"Qm1"},"signature":""}"#;
        assert_eq!(
            Envelope::decode(raw).unwrap_err().code,
            ResponseCode::EncodingError
        );
    }

    #[test]
    fn payload_of_other_kind_is_rejected() {
        // a vote body under an election tag has no `id`
        let raw = br#"{"type":"election","payload":{"from":"ab","poll_hash":"Qm1","choice":"a"},"signature":""}"#;
        assert!(Envelope::decode(raw).is_err());
    }

    #[test]
    fn garbage_is_encoding_error() {
        assert_eq!(
            Envelope::decode(b"\x00\x01").unwrap_err().code,
            ResponseCode::EncodingError
        );
    }
}
