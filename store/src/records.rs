//! Records persisted in the entity store.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A committed election. Immutable once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionRecord {
    pub id: String,
    /// Hex key of the authority that created it.
    pub authority_key: String,
    /// Hex keys allowed to vote in this election's polls.
    pub voters: BTreeSet<String>,
}

impl ElectionRecord {
    pub fn is_voter(&self, key_hex: &str) -> bool {
        self.voters.contains(key_hex)
    }
}

/// A committed poll. The choice labels are fixed at creation; only the
/// counts and `voted_already` change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRecord {
    /// Content address of the poll manifest.
    pub hash: String,
    pub election_id: String,
    pub description: String,
    /// Choice label → number of votes.
    pub choices: BTreeMap<String, u64>,
    /// Voters who already voted, in commit order.
    pub voted_already: Vec<String>,
}

impl PollRecord {
    pub fn has_choice(&self, label: &str) -> bool {
        self.choices.contains_key(label)
    }

    /// Fold one vote into the tally.
    pub fn record_vote(&mut self, voter: &str, choice: &str) {
        self.voted_already.push(voter.to_string());
        *self.choices.entry(choice.to_string()).or_insert(0) += 1;
    }

    pub fn number_of_votes(&self) -> u64 {
        self.voted_already.len() as u64
    }
}

/// One row of the election enumeration index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionIndexEntry {
    pub id: String,
    pub voter_count: u64,
}

/// One row of the poll enumeration index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollIndexEntry {
    pub hash: String,
}

/// Application bookkeeping reported to the consensus engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Number of finalized blocks.
    pub height: u64,
    /// Number of successfully committed transactions.
    pub size: u64,
    /// Rolling hash over every committed transaction.
    pub app_hash: [u8; 32],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll() -> PollRecord {
        PollRecord {
            hash: "Qm1".into(),
            election_id: "e1".into(),
            description: "lunch".into(),
            choices: [("a".to_string(), 0), ("b".to_string(), 0)].into(),
            voted_already: Vec::new(),
        }
    }

    #[test]
    fn record_vote_increments_one_label() {
        let mut p = poll();
        p.record_vote("v1", "a");
        p.record_vote("v2", "a");
        assert_eq!(p.choices["a"], 2);
        assert_eq!(p.choices["b"], 0);
        assert_eq!(p.number_of_votes(), 2);
    }

    #[test]
    fn bincode_roundtrip_keeps_choice_order() {
        let p = poll();
        let bytes = bincode::serialize(&p).unwrap();
        let back: PollRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.choices.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
