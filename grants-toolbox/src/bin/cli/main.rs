mod elections;
mod rounds;
mod vote;

use election_lib::{FixtureSource, GrantElection};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Adapter(#[from] election_lib::AdapterError),

    #[error(transparent)]
    Vote(#[from] grants_toolbox::ledger::VoteError),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Fixture inputs shared by every subcommand, matching the externally
/// supplied `activeElections`/`closedElections` lists.
#[derive(StructOpt)]
pub struct Fixtures {
    /// Active elections fixture (JSON list of raw election records)
    #[structopt(long)]
    pub active: PathBuf,

    /// Closed elections fixture (JSON list of raw election records)
    #[structopt(long)]
    pub closed: PathBuf,
}

impl Fixtures {
    pub fn load(&self) -> Result<(Vec<GrantElection>, Vec<GrantElection>), Error> {
        Ok((
            load_elections(&self.active)?,
            load_elections(&self.closed)?,
        ))
    }
}

fn load_elections(path: &Path) -> Result<Vec<GrantElection>, Error> {
    let fixture = FixtureSource::from_reader(BufReader::new(File::open(path)?))?;
    Ok(fixture.elections()?)
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
enum GrantsToolbox {
    /// List elections the way the overview displays them
    Elections(elections::Elections),
    /// Group elections into grant rounds by term
    Rounds(rounds::Rounds),
    /// Run a voting session over fixtures and print the submit payload
    Vote(vote::Vote),
}

impl GrantsToolbox {
    fn exec(self) -> Result<(), Error> {
        match self {
            GrantsToolbox::Elections(cmd) => cmd.exec(),
            GrantsToolbox::Rounds(cmd) => cmd.exec(),
            GrantsToolbox::Vote(cmd) => cmd.exec(),
        }
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();
    GrantsToolbox::from_args().exec()
}
