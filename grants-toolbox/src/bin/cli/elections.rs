use super::{Error, Fixtures};
use election_lib::ElectionState;
use grants_toolbox::elections::{aggregate_elections, GrantRoundFilter};
use grants_toolbox::rounds::election_name;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Elections {
    #[structopt(flatten)]
    fixtures: Fixtures,

    /// Show only elections that are still open for voting
    #[structopt(long, conflicts_with = "closed-only")]
    active_only: bool,

    /// Show only elections that already closed
    #[structopt(long)]
    closed_only: bool,

    /// Unix time to derive election states against (defaults to now)
    #[structopt(long)]
    now: Option<u64>,

    /// Write the list to a CSV file instead of printing it
    #[structopt(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ElectionRecord {
    id: String,
    name: String,
    grant_term: u32,
    start_time: u64,
    end_time: u64,
    state: &'static str,
    awardees: usize,
}

fn state_label(state: ElectionState) -> &'static str {
    match state {
        ElectionState::Upcoming => "upcoming",
        ElectionState::Active => "active",
        ElectionState::Closed => "closed",
    }
}

fn write_csv(path: &PathBuf, records: &[ElectionRecord]) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_path(path)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

impl Elections {
    pub fn exec(self) -> Result<(), Error> {
        let (active, closed) = self.fixtures.load()?;
        let filter = GrantRoundFilter {
            active: !self.closed_only,
            closed: !self.active_only,
        }
        .normalized();
        let now = self.now.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock before unix epoch")
                .as_secs()
        });

        let records = aggregate_elections(&active, &closed, &filter)
            .iter()
            .map(|election| ElectionRecord {
                id: election.id.clone(),
                name: election_name(election),
                grant_term: election.grant_term,
                start_time: election.start_time,
                end_time: election.end_time,
                state: state_label(election.state_at(now)),
                awardees: election.awardees.len(),
            })
            .collect::<Vec<_>>();

        match &self.output {
            Some(path) => write_csv(path, &records)?,
            None => {
                for record in &records {
                    println!(
                        "{} [{}] term {} start {} {}",
                        record.name, record.id, record.grant_term, record.start_time, record.state,
                    );
                }
            }
        }
        Ok(())
    }
}
