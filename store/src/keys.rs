//! Key layout. All entity kinds share one keyspace, separated by prefix.

/// Id of the most recently committed election.
pub const LATEST_ELECTION: &[u8] = b"latest:election";
/// Hash of the most recently committed poll.
pub const LATEST_POLL: &[u8] = b"latest:poll";
/// Serialized `Vec<ElectionIndexEntry>` in commit order.
pub const ELECTION_INDEX: &[u8] = b"index:elections";
/// Serialized `Vec<PollIndexEntry>` in commit order.
pub const POLL_INDEX: &[u8] = b"index:polls";
/// Serialized `AppInfo`.
pub const APP_INFO: &[u8] = b"meta:app_info";

const ELECTION_PREFIX: &[u8] = b"election:";
const POLL_PREFIX: &[u8] = b"poll:";
const VOTE_PREFIX: &[u8] = b"vote:";

fn prefixed(prefix: &[u8], parts: &[&str]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(prefix);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            key.push(b':');
        }
        key.extend_from_slice(part.as_bytes());
    }
    key
}

pub fn election(id: &str) -> Vec<u8> {
    prefixed(ELECTION_PREFIX, &[id])
}

pub fn poll(hash: &str) -> Vec<u8> {
    prefixed(POLL_PREFIX, &[hash])
}

/// Presence marker for a `(voter, poll)` pair. The voter is hex, so the
/// separator cannot appear inside it.
pub fn vote(voter: &str, poll_hash: &str) -> Vec<u8> {
    prefixed(VOTE_PREFIX, &[voter, poll_hash])
}
