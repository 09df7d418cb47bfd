use crate::elections::{aggregate_elections, GrantRoundFilter};
use crate::ledger::{SubmitPayload, Vote, VoteLedger};
use crate::rounds::{create_grant_rounds, GrantRound};
use election_lib::{election_metadata, Address, ElectionSource, GrantElection, GrantTerm};
use itertools::Itertools;
use tracing::{debug, warn};

/// Wallet facts as supplied by the wallet collaborator. The core only ever
/// reads these; connecting is the collaborator's trigger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletStatus {
    pub is_connected: bool,
    pub account: Option<Address>,
}

/// Receives the serialized ballot on submit. Submission is fire-and-forget
/// from the session's side; surfacing transaction results is the sink's
/// job.
pub trait SubmissionSink {
    fn submit_votes(&mut self, payload: SubmitPayload);
}

/// One user's voting session: election lists, display filter, vote budget
/// and the pending ledger, with the submission sink injected at
/// construction. All operations run to completion on the caller's thread;
/// the only asynchronous boundary is the metadata fetch, which is tolerated
/// by only ever replacing the active list wholesale.
pub struct VotingSession<S> {
    ledger: VoteLedger,
    filter: GrantRoundFilter,
    max_votes: u64,
    active_elections: Vec<GrantElection>,
    closed_elections: Vec<GrantElection>,
    wallet: WalletStatus,
    sink: S,
    closed: bool,
}

impl<S: SubmissionSink> VotingSession<S> {
    pub fn new(max_votes: u64, closed_elections: Vec<GrantElection>, sink: S) -> Self {
        Self {
            ledger: VoteLedger::new(),
            filter: GrantRoundFilter::default(),
            max_votes,
            active_elections: Vec::new(),
            closed_elections,
            wallet: WalletStatus::default(),
            sink,
            closed: false,
        }
    }

    /// Wholesale replacement of the active list by a completed fetch.
    /// Returns whether anything observably changed: a repeat of the current
    /// list is a no-op, as is any fetch landing after [`close`](Self::close).
    pub fn on_elections_fetched(&mut self, metadata: Vec<GrantElection>) -> bool {
        if self.closed {
            debug!("dropping election fetch for a torn-down session");
            return false;
        }
        if metadata == self.active_elections {
            return false;
        }
        let duplicate_terms = metadata
            .iter()
            .map(|election| election.grant_term)
            .duplicates()
            .collect::<Vec<_>>();
        if !duplicate_terms.is_empty() {
            // grant_term is the join key with the ledger; the data owner
            // has to resolve this, we only make it visible
            warn!(?duplicate_terms, "active elections share a grant term");
        }
        debug!(elections = metadata.len(), "replacing active elections");
        self.active_elections = metadata;
        true
    }

    /// Fetch and normalize the given election indices from a source. A
    /// failing index contributes no election this cycle; it is logged and
    /// picked up again on the next refresh trigger.
    pub fn refresh_elections(
        &mut self,
        source: &impl ElectionSource,
        indices: impl IntoIterator<Item = usize>,
    ) -> bool {
        let mut metadata = Vec::new();
        for index in indices {
            match election_metadata(source, index) {
                Ok(election) => metadata.push(election),
                Err(error) => warn!(index, %error, "election fetch failed"),
            }
        }
        self.on_elections_fetched(metadata)
    }

    /// Store the filter, correcting the all-false combination to show-all.
    pub fn set_filter(&mut self, next: GrantRoundFilter) {
        self.filter = next.normalized();
    }

    pub fn filter(&self) -> &GrantRoundFilter {
        &self.filter
    }

    pub fn set_max_votes(&mut self, max_votes: u64) {
        self.max_votes = max_votes;
    }

    pub fn max_votes(&self) -> u64 {
        self.max_votes
    }

    pub fn on_wallet_changed(&mut self, wallet: WalletStatus) {
        self.wallet = wallet;
    }

    pub fn wallet(&self) -> &WalletStatus {
        &self.wallet
    }

    /// Record a pending vote; each edit produces a fresh ledger snapshot.
    /// The budget is not enforced here (see [`votes_remaining`](Self::votes_remaining)).
    pub fn assign_vote(&mut self, grant_term: GrantTerm, vote: Vote) {
        self.ledger = self.ledger.assign_vote(grant_term, vote);
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// Saturating remainder of the per-term vote budget.
    pub fn votes_remaining(&self, grant_term: GrantTerm) -> u64 {
        self.max_votes
            .saturating_sub(self.ledger.votes_used(grant_term))
    }

    pub fn active_elections(&self) -> &[GrantElection] {
        &self.active_elections
    }

    pub fn closed_elections(&self) -> &[GrantElection] {
        &self.closed_elections
    }

    /// The filtered, recency-ordered list for display. Recomputed on every
    /// call from the current lists and filter.
    pub fn displayed_elections(&self) -> Vec<GrantElection> {
        aggregate_elections(
            &self.active_elections,
            &self.closed_elections,
            &self.filter,
        )
    }

    pub fn grant_rounds(&self) -> Vec<GrantRound> {
        create_grant_rounds(&self.active_elections, &self.closed_elections)
    }

    /// Serialize the pending ledger and hand it to the submission sink.
    pub fn submit(&mut self) {
        self.sink.submit_votes(self.ledger.to_payload());
    }

    /// Mark the session torn down; late fetches become no-ops.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
