//! The decision function shared by admission and commit.
//!
//! Checks run in a fixed order per transaction type and the first failure
//! wins; which rejection a transaction gets is part of the contract.

use std::collections::BTreeSet;

use ballot_crypto::decode_public_key_hex;
use ballot_manifest::{load_poll_manifest, ManifestSource, PollManifest};
use ballot_store::{EntityStore, KvStore, PollRecord};
use ballot_types::{PublicKey, Rejection};

use crate::{ElectionCreate, LedgerError, Payload, PollCreate, VoteCast};

/// Per-instance validation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationContext {
    /// Hex key allowed to create elections and polls.
    pub authority_key: String,
}

impl ValidationContext {
    pub fn new(authority_key: impl Into<String>) -> Self {
        Self {
            authority_key: authority_key.into(),
        }
    }
}

/// An accepted transaction, carrying what the applier needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admitted {
    Election(ElectionCreate),
    Poll {
        payload: PollCreate,
        manifest: PollManifest,
    },
    Vote {
        payload: VoteCast,
        /// The poll as read during validation, before this vote.
        poll: PollRecord,
    },
}

/// Validates payloads against committed state. Never writes.
pub struct Validator<'a, S, M: ?Sized> {
    ctx: &'a ValidationContext,
    store: &'a EntityStore<S>,
    manifests: &'a M,
}

impl<'a, S: KvStore, M: ManifestSource + ?Sized> Validator<'a, S, M> {
    pub fn new(ctx: &'a ValidationContext, store: &'a EntityStore<S>, manifests: &'a M) -> Self {
        Self {
            ctx,
            store,
            manifests,
        }
    }

    pub fn validate(&self, payload: &Payload) -> Result<Admitted, Rejection> {
        match payload {
            Payload::Election(p) => self.validate_election(p),
            Payload::Poll(p) => self.validate_poll(p),
            Payload::Vote(p) => self.validate_vote(p),
        }
    }

    fn require_authority(&self, from: &str) -> Result<(), Rejection> {
        if from != self.ctx.authority_key {
            return Err(Rejection::unauthorized(format!(
                "{from} is not the election authority"
            )));
        }
        Ok(())
    }

    fn validate_election(&self, p: &ElectionCreate) -> Result<Admitted, Rejection> {
        self.require_authority(&p.from)?;

        let mut seen: BTreeSet<PublicKey> = BTreeSet::new();
        for voter in &p.voters {
            let key = decode_public_key_hex(voter)
                .map_err(|e| Rejection::unauthorized(format!("voter {voter}: {e}")))?;
            if !seen.insert(key) {
                return Err(Rejection::unauthorized(format!(
                    "voter {voter} is listed more than once"
                )));
            }
        }

        if self
            .store
            .election_exists(&p.id)
            .map_err(LedgerError::from)?
        {
            return Err(Rejection::unauthorized(format!(
                "election {} already exists",
                p.id
            )));
        }

        Ok(Admitted::Election(p.clone()))
    }

    fn validate_poll(&self, p: &PollCreate) -> Result<Admitted, Rejection> {
        self.require_authority(&p.from)?;

        if !self
            .store
            .election_exists(&p.election_id)
            .map_err(LedgerError::from)?
        {
            return Err(Rejection::unauthorized(format!(
                "election {} does not exist",
                p.election_id
            )));
        }

        if p.poll_hash.is_empty() {
            return Err(Rejection::unauthorized("poll hash is empty"));
        }

        let manifest = load_poll_manifest(self.manifests, &p.poll_hash).map_err(|e| {
            Rejection::unauthorized(format!("poll manifest {}: {e}", p.poll_hash))
        })?;

        if self
            .store
            .poll_exists(&p.poll_hash)
            .map_err(LedgerError::from)?
        {
            return Err(Rejection::unauthorized(format!(
                "poll {} already exists",
                p.poll_hash
            )));
        }

        let latest = self
            .store
            .latest_election_id()
            .map_err(LedgerError::from)?;
        if latest.as_deref() != Some(p.election_id.as_str()) {
            return Err(Rejection::unauthorized(format!(
                "election {} is not the latest election",
                p.election_id
            )));
        }

        Ok(Admitted::Poll {
            payload: p.clone(),
            manifest,
        })
    }

    fn validate_vote(&self, p: &VoteCast) -> Result<Admitted, Rejection> {
        if p.poll_hash.is_empty() {
            return Err(Rejection::unauthorized("poll hash is empty"));
        }

        let poll = self
            .store
            .poll(&p.poll_hash)
            .map_err(LedgerError::from)?
            .ok_or_else(|| {
                Rejection::unauthorized(format!("poll {} does not exist", p.poll_hash))
            })?;

        let election = self
            .store
            .election(&poll.election_id)
            .map_err(LedgerError::from)?
            .ok_or_else(|| {
                LedgerError::Inconsistent(format!(
                    "poll {} references missing election {}",
                    poll.hash, poll.election_id
                ))
            })?;

        if !election.is_voter(&p.from) {
            return Err(Rejection::unauthorized(format!(
                "{} is not a voter in election {}",
                p.from, election.id
            )));
        }

        if !poll.has_choice(&p.choice) {
            return Err(Rejection::unauthorized(format!(
                "poll {} has no choice {}",
                poll.hash, p.choice
            )));
        }

        if self
            .store
            .has_voted(&p.from, &p.poll_hash)
            .map_err(LedgerError::from)?
        {
            return Err(Rejection::unauthorized(format!(
                "{} already voted on poll {}",
                p.from, p.poll_hash
            )));
        }

        let latest = self.store.latest_poll_hash().map_err(LedgerError::from)?;
        if latest.as_deref() != Some(p.poll_hash.as_str()) {
            return Err(Rejection::unauthorized(format!(
                "poll {} is not the latest poll",
                p.poll_hash
            )));
        }

        Ok(Admitted::Vote {
            payload: p.clone(),
            poll,
        })
    }
}
