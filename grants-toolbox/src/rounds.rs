use election_lib::{GrantElection, GrantTerm};
use itertools::Itertools;
use std::collections::BTreeMap;

/// All elections sharing a grant term, grouped for display. A round spans
/// its elections' whole lifecycle, so an active and an already closed
/// election with the same term belong to the same round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrantRound {
    pub name: String,
    pub elections: Vec<GrantElection>,
}

fn term_label(term: GrantTerm) -> String {
    match term {
        0 => "Monthly".to_string(),
        1 => "Quarterly".to_string(),
        2 => "Yearly".to_string(),
        n => format!("Term {}", n),
    }
}

/// Stable display title for an election, a pure function of its term and
/// share type.
pub fn election_name(election: &GrantElection) -> String {
    format!(
        "{} Grant Election ({})",
        term_label(election.grant_term),
        election.share_type.label()
    )
}

/// Partition the union of the two lists by grant term. Rounds come out in
/// term order; within a round, elections keep their input order with the
/// active list first. Empty inputs produce an empty result.
pub fn create_grant_rounds(active: &[GrantElection], closed: &[GrantElection]) -> Vec<GrantRound> {
    active
        .iter()
        .chain(closed.iter())
        .cloned()
        .into_group_map_by(|election| election.grant_term)
        .into_iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(term, elections)| GrantRound {
            name: format!("{} Grant Round", term_label(term)),
            elections,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use election_lib::ShareType;

    fn election(id: &str, grant_term: GrantTerm, active: bool) -> GrantElection {
        GrantElection {
            id: id.to_string(),
            start_time: 100,
            end_time: 200,
            grant_term,
            share_type: ShareType::EqualWeight,
            awardees_count: 0,
            awardees: vec![],
            description: String::new(),
            active,
            quadratic: false,
        }
    }

    #[test]
    fn elections_with_equal_terms_share_a_round() {
        let rounds = create_grant_rounds(
            &[election("open", 1, true)],
            &[election("done", 1, false), election("old", 0, false)],
        );

        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].name, "Monthly Grant Round");
        assert_eq!(rounds[1].name, "Quarterly Grant Round");
        let ids = rounds[1]
            .elections
            .iter()
            .map(|e| e.id.as_str())
            .collect::<Vec<_>>();
        // active list first, then closed
        assert_eq!(ids, vec!["open", "done"]);
    }

    #[test]
    fn empty_inputs_produce_no_rounds() {
        assert!(create_grant_rounds(&[], &[]).is_empty());
    }

    #[test]
    fn names_are_stable_for_identical_inputs() {
        let quarterly = election("e", 1, true);
        assert_eq!(election_name(&quarterly), election_name(&quarterly.clone()));
        assert_eq!(
            election_name(&quarterly),
            "Quarterly Grant Election (Equal Share)"
        );

        let mut weighted = election("w", 7, true);
        weighted.share_type = ShareType::DynamicWeight;
        assert_eq!(election_name(&weighted), "Term 7 Grant Election (Weighted Share)");
    }
}
