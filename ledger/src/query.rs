//! Read-only projections over committed state.
//!
//! | Path                | Params          | Value                                  |
//! |---------------------|-----------------|----------------------------------------|
//! | `/elections`        |                 | `[{id, number_of_voters, latest}]`     |
//! | `/elections/latest` |                 | `{id, number_of_voters, latest}` or `` |
//! | `/polls`            |                 | `[{poll_hash, latest}]`                |
//! | `/polls/latest`     |                 | `{poll_hash, latest}` or ``            |
//! | `/votes`            | `{"poll_hash"}` | `{choices, number_of_votes}`           |
//!
//! Any other path answers `OK` with an empty value.

use std::collections::BTreeMap;

use ballot_store::{EntityStore, KvStore};
use ballot_types::{Rejection, ResponseCode};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionItem {
    pub id: String,
    pub number_of_voters: u64,
    pub latest: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollItem {
    pub poll_hash: String,
    pub latest: bool,
}

/// Tally of one poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollVotes {
    pub choices: BTreeMap<String, u64>,
    pub number_of_votes: u64,
}

#[derive(Deserialize)]
struct VotesParams {
    #[serde(alias = "PollHash")]
    poll_hash: String,
}

/// Result of a query: a code, the JSON value (possibly empty) and a log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryResponse {
    pub code: ResponseCode,
    pub value: Vec<u8>,
    pub log: String,
}

impl QueryResponse {
    fn ok(value: Vec<u8>) -> Self {
        Self {
            code: ResponseCode::Ok,
            value,
            log: String::new(),
        }
    }

    fn rejected(rejection: Rejection) -> Self {
        Self {
            code: rejection.code,
            value: Vec::new(),
            log: rejection.reason,
        }
    }
}

pub struct QueryEngine<'a, S> {
    store: &'a EntityStore<S>,
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, Rejection> {
    serde_json::to_vec(value).map_err(|e| Rejection::server(format!("encoding result: {e}")))
}

impl<'a, S: KvStore> QueryEngine<'a, S> {
    pub fn new(store: &'a EntityStore<S>) -> Self {
        Self { store }
    }

    pub fn query(&self, path: &str, params: &[u8]) -> QueryResponse {
        let result = match path {
            "/elections" => self.elections().and_then(|items| to_json(&items)),
            "/elections/latest" => self.latest_election(),
            "/polls" => self.polls().and_then(|items| to_json(&items)),
            "/polls/latest" => self.latest_poll(),
            "/votes" => self.votes(params).and_then(|votes| to_json(&votes)),
            _ => Ok(Vec::new()),
        };
        match result {
            Ok(value) => QueryResponse::ok(value),
            Err(rejection) => {
                tracing::debug!(path, code = %rejection.code, reason = %rejection.reason, "query rejected");
                QueryResponse::rejected(rejection)
            }
        }
    }

    /// Every election in commit order, flagged with the latest one.
    pub fn elections(&self) -> Result<Vec<ElectionItem>, Rejection> {
        let latest = self
            .store
            .latest_election_id()
            .map_err(LedgerError::from)?;
        let index = self.store.election_index().map_err(LedgerError::from)?;
        Ok(index
            .into_iter()
            .map(|entry| ElectionItem {
                latest: latest.as_deref() == Some(entry.id.as_str()),
                id: entry.id,
                number_of_voters: entry.voter_count,
            })
            .collect())
    }

    fn latest_election(&self) -> Result<Vec<u8>, Rejection> {
        let Some(id) = self
            .store
            .latest_election_id()
            .map_err(LedgerError::from)?
        else {
            return Ok(Vec::new());
        };
        let record = self
            .store
            .election(&id)
            .map_err(LedgerError::from)?
            .ok_or_else(|| LedgerError::Inconsistent(format!("latest election {id} missing")))?;
        to_json(&ElectionItem {
            id: record.id,
            number_of_voters: record.voters.len() as u64,
            latest: true,
        })
    }

    /// Every poll in commit order, flagged with the latest one.
    pub fn polls(&self) -> Result<Vec<PollItem>, Rejection> {
        let latest = self.store.latest_poll_hash().map_err(LedgerError::from)?;
        let index = self.store.poll_index().map_err(LedgerError::from)?;
        Ok(index
            .into_iter()
            .map(|entry| PollItem {
                latest: latest.as_deref() == Some(entry.hash.as_str()),
                poll_hash: entry.hash,
            })
            .collect())
    }

    fn latest_poll(&self) -> Result<Vec<u8>, Rejection> {
        match self.store.latest_poll_hash().map_err(LedgerError::from)? {
            Some(poll_hash) => to_json(&PollItem {
                poll_hash,
                latest: true,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn votes(&self, params: &[u8]) -> Result<PollVotes, Rejection> {
        let params: VotesParams = serde_json::from_slice(params)
            .map_err(|e| Rejection::encoding(format!("bad /votes params: {e}")))?;
        self.tally(&params.poll_hash)
    }

    /// Choice counts and number of voters for one poll.
    pub fn tally(&self, poll_hash: &str) -> Result<PollVotes, Rejection> {
        let poll = self
            .store
            .poll(poll_hash)
            .map_err(LedgerError::from)?
            .ok_or_else(|| Rejection::unauthorized(format!("poll {poll_hash} does not exist")))?;
        Ok(PollVotes {
            number_of_votes: poll.number_of_votes(),
            choices: poll.choices,
        })
    }
}
