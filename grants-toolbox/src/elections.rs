use election_lib::GrantElection;
use serde::{Deserialize, Serialize};

/// Which rounds to show. Both flags false is not a meaningful query;
/// [`normalized`](Self::normalized) maps it back to show-all instead of
/// treating it as an error.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrantRoundFilter {
    pub active: bool,
    pub closed: bool,
}

impl Default for GrantRoundFilter {
    fn default() -> Self {
        Self {
            active: true,
            closed: true,
        }
    }
}

impl GrantRoundFilter {
    pub fn normalized(self) -> Self {
        if !self.active && !self.closed {
            Self::default()
        } else {
            self
        }
    }

    pub fn matches(&self, election: &GrantElection) -> bool {
        (election.active && self.active) || (!election.active && self.closed)
    }
}

/// The ordered display list: active and closed lists merged, filtered,
/// newest start time first. The sort is stable, so elections sharing a
/// start time keep their concatenation order.
pub fn aggregate_elections(
    active: &[GrantElection],
    closed: &[GrantElection],
    filter: &GrantRoundFilter,
) -> Vec<GrantElection> {
    let mut elections: Vec<GrantElection> = active
        .iter()
        .chain(closed.iter())
        .filter(|election| filter.matches(election))
        .cloned()
        .collect();
    elections.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    elections
}
