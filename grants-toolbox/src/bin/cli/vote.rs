use super::{Error, Fixtures};
use election_lib::GrantTerm;
use grants_toolbox::ledger::{RawVote, SubmitPayload, Vote as LedgerVote};
use grants_toolbox::session::{SubmissionSink, VotingSession, WalletStatus};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::warn;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Vote {
    #[structopt(flatten)]
    fixtures: Fixtures,

    /// Ballot file: JSON list of `{grantTerm, address, votes}` edits,
    /// applied in order
    #[structopt(long)]
    ballots: PathBuf,

    /// Vote budget per grant term
    #[structopt(long, default_value = "100")]
    max_votes: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BallotEntry {
    grant_term: GrantTerm,
    #[serde(flatten)]
    vote: RawVote,
}

/// Stand-in for the on-chain submission collaborator: prints the wire
/// payload to stdout.
struct PrintSink;

impl SubmissionSink for PrintSink {
    fn submit_votes(&mut self, payload: SubmitPayload) {
        println!(
            "{}",
            serde_json::to_string(&payload).expect("payload serializes")
        );
    }
}

impl Vote {
    pub fn exec(self) -> Result<(), Error> {
        let (active, closed) = self.fixtures.load()?;
        let ballots: Vec<BallotEntry> =
            serde_json::from_reader(BufReader::new(File::open(&self.ballots)?))?;

        let mut session = VotingSession::new(self.max_votes, closed, PrintSink);
        session.on_elections_fetched(active);
        // the CLI is its own wallet collaborator
        session.on_wallet_changed(WalletStatus {
            is_connected: true,
            account: None,
        });

        for ballot in ballots {
            let vote = LedgerVote::try_from(ballot.vote)?;
            if vote.votes > session.votes_remaining(ballot.grant_term) {
                warn!(
                    grant_term = ballot.grant_term,
                    address = %vote.address,
                    "vote exceeds the remaining budget, skipping"
                );
                continue;
            }
            session.assign_vote(ballot.grant_term, vote);
        }

        session.submit();
        session.close();
        Ok(())
    }
}
