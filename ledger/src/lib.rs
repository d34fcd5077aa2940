//! The ballot state machine.
//!
//! Every transaction arrives as a signed [`Envelope`]. The same pipeline
//! (decode, [`verify_envelope`], [`Validator::validate`]) backs both the
//! admission check and the commit path, so the two can never disagree.
//! Only commit goes on to [`apply`], staging every write into one batch.
//! [`QueryEngine`] answers read-only projections over committed state.

pub mod apply;
pub mod envelope;
pub mod error;
pub mod query;
pub mod state_machine;
pub mod validation;
pub mod verify;

pub use apply::apply;
pub use envelope::{ElectionCreate, Envelope, EnvelopeKind, Payload, PollCreate, VoteCast};
pub use error::LedgerError;
pub use query::{ElectionItem, PollItem, PollVotes, QueryEngine, QueryResponse};
pub use state_machine::{Committed, StateMachine};
pub use validation::{Admitted, ValidationContext, Validator};
pub use verify::verify_envelope;
