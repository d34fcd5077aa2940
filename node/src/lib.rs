//! Ballot node: the boundary the consensus engine drives.
//!
//! [`BallotApp`] wraps the ledger state machine behind a read/write lock:
//! - `admission_check` and `query` take a read guard and never write
//! - `commit` and `finalize_block` take the write guard, one at a time
//!
//! A query therefore always sees the state after some whole number of
//! commits, never a commit in progress.

pub mod app;
pub mod config;
pub mod error;

pub use app::{BallotApp, LmdbBallotApp, TxResponse};
pub use config::NodeConfig;
pub use error::NodeError;
