use election_lib::{Address, GrantTerm};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Wire shape handed to the submission collaborator: one entry per term
/// holding pending votes, each a list of `[address, votes]` pairs.
pub type SubmitPayload = Vec<Vec<(Address, u64)>>;

#[derive(Debug, Error, PartialEq)]
pub enum VoteError {
    #[error("vote weight {0} is not finite")]
    NotFinite(f64),
    #[error("vote weight {0} is negative")]
    Negative(f64),
    #[error("vote weight {0} is not a representable vote count")]
    NotIntegral(f64),
}

/// One awardee's pending allocation within a term. Weights are validated
/// on the way in ([`RawVote`]), so a ledger never holds an invalid entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Vote {
    pub address: Address,
    pub votes: u64,
}

/// Vote as it arrives from an edit event, weight still unchecked.
#[derive(Deserialize, Clone, Debug)]
pub struct RawVote {
    pub address: Address,
    pub votes: f64,
}

impl TryFrom<RawVote> for Vote {
    type Error = VoteError;

    fn try_from(raw: RawVote) -> Result<Self, VoteError> {
        if !raw.votes.is_finite() {
            return Err(VoteError::NotFinite(raw.votes));
        }
        if raw.votes < 0.0 {
            return Err(VoteError::Negative(raw.votes));
        }
        if raw.votes.fract() != 0.0 || raw.votes > u64::MAX as f64 {
            return Err(VoteError::NotIntegral(raw.votes));
        }
        Ok(Vote {
            address: raw.address,
            votes: raw.votes as u64,
        })
    }
}

/// Per-term vote allocations, keyed by grant term with at most one entry
/// per address in a slot. Writes return a fresh ledger and leave the
/// receiver untouched, so callers relying on snapshot identity for change
/// detection can keep the previous value around.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteLedger {
    slots: BTreeMap<GrantTerm, Vec<Vote>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert by address: any previous entry for `vote.address` in the
    /// term's slot is dropped, then the vote is appended.
    #[must_use]
    pub fn assign_vote(&self, grant_term: GrantTerm, vote: Vote) -> Self {
        let mut slots = self.slots.clone();
        let mut slot = slots.remove(&grant_term).unwrap_or_default();
        slot.retain(|entry| entry.address != vote.address);
        slot.push(vote);
        slots.insert(grant_term, slot);
        Self { slots }
    }

    /// Pending votes for a term, empty for a term never assigned.
    pub fn votes_for(&self, grant_term: GrantTerm) -> &[Vote] {
        self.slots
            .get(&grant_term)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total weight already allocated in a term's slot. The ledger reports
    /// usage but never enforces a budget; capping against the max-votes
    /// pool is the edit boundary's job.
    pub fn votes_used(&self, grant_term: GrantTerm) -> u64 {
        self.votes_for(grant_term).iter().map(|vote| vote.votes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }

    /// Serialize for submission. Terms without votes are omitted; terms
    /// come out ascending, pairs in slot insertion/update order.
    pub fn to_payload(&self) -> SubmitPayload {
        self.slots
            .values()
            .filter(|slot| !slot.is_empty())
            .map(|slot| {
                slot.iter()
                    .map(|vote| (vote.address.clone(), vote.votes))
                    .collect()
            })
            .collect()
    }
}
