//! Signature verification over the canonical payload bytes.

use ballot_crypto::{decode_public_key_hex, decode_signature_hex, verify_signature};
use ballot_types::{PublicKey, Rejection};

use crate::Envelope;

/// Check that `envelope` is signed by the key in its `from` field.
///
/// A `from` that is not a hex-encoded public key, or a signature blob of the
/// wrong shape, is an encoding error. A well-formed signature that does not
/// verify is unauthorized.
pub fn verify_envelope(envelope: &Envelope) -> Result<PublicKey, Rejection> {
    let message = envelope.payload.canonical_bytes();

    let signer = decode_public_key_hex(envelope.payload.from())
        .map_err(|e| Rejection::encoding(format!("bad submitter key: {e}")))?;
    let signature = decode_signature_hex(&envelope.signature)
        .map_err(|e| Rejection::encoding(format!("bad signature: {e}")))?;

    if !verify_signature(&message, &signature, &signer) {
        return Err(Rejection::unauthorized(format!(
            "signature does not verify for {}",
            envelope.kind()
        )));
    }
    Ok(signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Payload, VoteCast};
    use ballot_crypto::keypair_from_seed;
    use ballot_types::ResponseCode;

    fn signed_vote(seed: u8) -> Envelope {
        let kp = keypair_from_seed(&[seed; 32]);
        let payload = Payload::Vote(VoteCast {
            from: kp.public.to_hex(),
            poll_hash: "Qm1".into(),
            choice: "a".into(),
        });
        Envelope::sign(payload, &kp.private)
    }

    #[test]
    fn valid_signature_yields_signer() {
        let env = signed_vote(1);
        let signer = verify_envelope(&env).unwrap();
        assert_eq!(signer.to_hex(), env.payload.from());
    }

    #[test]
    fn survives_wire_roundtrip() {
        let env = Envelope::decode(&signed_vote(2).to_bytes()).unwrap();
        assert!(verify_envelope(&env).is_ok());
    }

    #[test]
    fn changed_choice_is_unauthorized() {
        let mut env = signed_vote(3);
        if let Payload::Vote(v) = &mut env.payload {
            v.choice = "b".into();
        }
        assert_eq!(
            verify_envelope(&env).unwrap_err().code,
            ResponseCode::Unauthorized
        );
    }

    #[test]
    fn other_signer_is_unauthorized() {
        let mut env = signed_vote(4);
        env.payload = signed_vote(5).payload;
        assert_eq!(
            verify_envelope(&env).unwrap_err().code,
            ResponseCode::Unauthorized
        );
    }

    #[test]
    fn non_hex_from_is_encoding_error() {
        let mut env = signed_vote(6);
        if let Payload::Vote(v) = &mut env.payload {
            v.from = "not-a-key".into();
        }
        assert_eq!(
            verify_envelope(&env).unwrap_err().code,
            ResponseCode::EncodingError
        );
    }

    #[test]
    fn short_from_is_encoding_error() {
        let mut env = signed_vote(7);
        if let Payload::Vote(v) = &mut env.payload {
            v.from = "abcd".into();
        }
        assert_eq!(
            verify_envelope(&env).unwrap_err().code,
            ResponseCode::EncodingError
        );
    }

    #[test]
    fn malformed_signature_is_encoding_error() {
        let mut env = signed_vote(8);
        env.signature = "zz".into();
        assert_eq!(
            verify_envelope(&env).unwrap_err().code,
            ResponseCode::EncodingError
        );

        env.signature.truncate(0);
        env.signature.push_str(&"00".repeat(63));
        assert_eq!(
            verify_envelope(&env).unwrap_err().code,
            ResponseCode::EncodingError
        );
    }
}
