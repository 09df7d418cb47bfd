mod de;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use de::RawTimestamp;

pub type Address = String;
pub type GrantTerm = u32;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("source has no election record at index {0}")]
    NotFound(usize),
    #[error("election {id}: invalid {field} timestamp {value:?}")]
    InvalidTimestamp {
        id: String,
        field: &'static str,
        value: String,
    },
    #[error("election {id}: unknown share type {share_type:?}")]
    UnknownShareType { id: String, share_type: String },
    #[error("election {id}: awardeesCount {count} does not match {actual} awardee addresses")]
    AwardeeCountMismatch {
        id: String,
        count: usize,
        actual: usize,
    },
}

/// How an election splits its vote pool between awardees. Opaque to the
/// aggregation core beyond naming.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ShareType {
    EqualWeight,
    DynamicWeight,
}

impl ShareType {
    fn from_raw(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_ref() {
            "equalweight" | "equal" => Some(ShareType::EqualWeight),
            "dynamicweight" | "dynamic" => Some(ShareType::DynamicWeight),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShareType::EqualWeight => "Equal Share",
            ShareType::DynamicWeight => "Weighted Share",
        }
    }
}

/// Election record as handed over by a source, before normalization.
/// Field shapes are as loose as the sources are; nothing downstream of the
/// adapter accepts this type.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RawElection {
    pub id: String,
    pub start_time: RawTimestamp,
    pub end_time: RawTimestamp,
    pub grant_term: GrantTerm,
    pub grant_share_type: String,
    #[serde(default)]
    pub awardees_count: Option<usize>,
    #[serde(default)]
    pub awardees: Vec<Address>,
    #[serde(default)]
    pub description: String,
    pub active: bool,
    #[serde(default)]
    pub quadratic: bool,
}

/// Canonical election value. Immutable once produced by
/// [`GrantElection::from_raw`]; the `active` flag and the time bounds are
/// read as given, never recomputed here.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GrantElection {
    pub id: String,
    pub start_time: u64,
    pub end_time: u64,
    pub grant_term: GrantTerm,
    pub share_type: ShareType,
    pub awardees_count: usize,
    pub awardees: Vec<Address>,
    pub description: String,
    pub active: bool,
    pub quadratic: bool,
}

/// Lifecycle of an election, derived from supplied data at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElectionState {
    Upcoming,
    Active,
    Closed,
}

impl GrantElection {
    /// Strict parse of a raw record. The sole path into the canonical type.
    pub fn from_raw(raw: RawElection) -> Result<Self, AdapterError> {
        let start_time =
            raw.start_time
                .to_unix()
                .map_err(|value| AdapterError::InvalidTimestamp {
                    id: raw.id.clone(),
                    field: "startTime",
                    value,
                })?;
        let end_time = raw
            .end_time
            .to_unix()
            .map_err(|value| AdapterError::InvalidTimestamp {
                id: raw.id.clone(),
                field: "endTime",
                value,
            })?;
        let share_type = ShareType::from_raw(&raw.grant_share_type).ok_or_else(|| {
            AdapterError::UnknownShareType {
                id: raw.id.clone(),
                share_type: raw.grant_share_type.clone(),
            }
        })?;
        let awardees_count = raw.awardees_count.unwrap_or(raw.awardees.len());
        if awardees_count != raw.awardees.len() {
            return Err(AdapterError::AwardeeCountMismatch {
                id: raw.id,
                count: awardees_count,
                actual: raw.awardees.len(),
            });
        }
        Ok(GrantElection {
            id: raw.id,
            start_time,
            end_time,
            grant_term: raw.grant_term,
            share_type,
            awardees_count,
            awardees: raw.awardees,
            description: raw.description,
            active: raw.active,
            quadratic: raw.quadratic,
        })
    }

    pub fn state_at(&self, now: u64) -> ElectionState {
        if now < self.start_time {
            ElectionState::Upcoming
        } else if self.active {
            ElectionState::Active
        } else {
            ElectionState::Closed
        }
    }
}

/// Anything that can be asked for the raw election record at an index.
/// Implementations are the opaque half of the `(source, electionIndex)`
/// adapter input; the fixture source below is the in-process one, a
/// contract read wrapper would be another.
pub trait ElectionSource {
    fn election_record(&self, index: usize) -> Option<RawElection>;
}

/// Fetch and normalize one election.
pub fn election_metadata(
    source: &impl ElectionSource,
    index: usize,
) -> Result<GrantElection, AdapterError> {
    let raw = source
        .election_record(index)
        .ok_or(AdapterError::NotFound(index))?;
    GrantElection::from_raw(raw)
}

/// An [`ElectionSource`] over an externally supplied list of raw records,
/// e.g. one of the `activeElections`/`closedElections` fixture files.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct FixtureSource(Vec<RawElection>);

impl From<Vec<RawElection>> for FixtureSource {
    fn from(from: Vec<RawElection>) -> Self {
        Self(from)
    }
}

impl FixtureSource {
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalizes every record in the fixture, failing on the first bad one.
    pub fn elections(&self) -> Result<Vec<GrantElection>, AdapterError> {
        self.0
            .iter()
            .cloned()
            .map(GrantElection::from_raw)
            .collect()
    }
}

impl ElectionSource for FixtureSource {
    fn election_record(&self, index: usize) -> Option<RawElection> {
        self.0.get(index).cloned()
    }
}

#[cfg(feature = "proptest")]
mod arbitrary {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for ShareType {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: ()) -> Self::Strategy {
            prop_oneof![Just(ShareType::EqualWeight), Just(ShareType::DynamicWeight)].boxed()
        }
    }

    impl Arbitrary for GrantElection {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: ()) -> Self::Strategy {
            (
                "[a-f0-9]{8}",
                0..=u64::from(u32::MAX),
                any::<u32>(),
                0..8u32,
                any::<ShareType>(),
                proptest::collection::vec("0x[a-f0-9]{6}", 0..4),
                any::<bool>(),
                any::<bool>(),
            )
                .prop_map(
                    |(id, start_time, duration, grant_term, share_type, awardees, active, quadratic)| {
                        GrantElection {
                            id,
                            start_time,
                            end_time: start_time + u64::from(duration),
                            grant_term,
                            share_type,
                            awardees_count: awardees.len(),
                            awardees,
                            description: String::new(),
                            active,
                            quadratic,
                        }
                    },
                )
                .boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, start: RawTimestamp) -> RawElection {
        RawElection {
            id: id.to_string(),
            start_time: start,
            end_time: RawTimestamp::from(0),
            grant_term: 1,
            grant_share_type: "equalWeight".to_string(),
            awardees_count: None,
            awardees: vec![],
            description: String::new(),
            active: true,
            quadratic: false,
        }
    }

    #[test]
    fn string_and_numeric_timestamps_normalize_to_the_same_value() {
        let from_string = GrantElection::from_raw(raw("e1", RawTimestamp::from("200"))).unwrap();
        let from_number = GrantElection::from_raw(raw("e1", RawTimestamp::from(200))).unwrap();
        assert_eq!(from_string.start_time, 200);
        assert_eq!(from_string, from_number);
    }

    #[test]
    fn non_numeric_timestamp_is_rejected() {
        let err = GrantElection::from_raw(raw("e1", RawTimestamp::from("soon"))).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::InvalidTimestamp { field: "startTime", .. }
        ));
    }

    #[test]
    fn unknown_share_type_is_rejected() {
        let mut record = raw("e1", RawTimestamp::from(0));
        record.grant_share_type = "winnerTakesAll".to_string();
        let err = GrantElection::from_raw(record).unwrap_err();
        assert!(matches!(err, AdapterError::UnknownShareType { .. }));
    }

    #[test]
    fn awardee_count_mismatch_is_rejected() {
        let mut record = raw("e1", RawTimestamp::from(0));
        record.awardees = vec!["0xA".to_string()];
        record.awardees_count = Some(3);
        let err = GrantElection::from_raw(record).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::AwardeeCountMismatch { count: 3, actual: 1, .. }
        ));
    }

    #[test]
    fn missing_awardee_count_defaults_to_list_length() {
        let mut record = raw("e1", RawTimestamp::from(0));
        record.awardees = vec!["0xA".to_string(), "0xB".to_string()];
        let election = GrantElection::from_raw(record).unwrap();
        assert_eq!(election.awardees_count, 2);
    }

    #[test]
    fn fixture_source_adapts_by_index() {
        let fixture: FixtureSource = serde_json::from_str(
            r#"[{
                "id": "mock1",
                "startTime": "1627980001",
                "endTime": 1628030401,
                "grantTerm": 1,
                "grantShareType": "equalWeight",
                "awardeesCount": 1,
                "awardees": ["0x0Ec6290A6D2E2c1D483564fb9D6c11b27a2a4391"],
                "description": "Quarterly grant election",
                "active": true
            }]"#,
        )
        .unwrap();

        let election = election_metadata(&fixture, 0).unwrap();
        assert_eq!(election.start_time, 1627980001);
        assert_eq!(election.end_time, 1628030401);
        assert_eq!(election.share_type, ShareType::EqualWeight);
        assert!(!election.quadratic);

        assert!(matches!(
            election_metadata(&fixture, 1),
            Err(AdapterError::NotFound(1))
        ));
    }

    #[test]
    fn state_is_derived_from_supplied_data_only() {
        let mut election = GrantElection::from_raw(raw("e1", RawTimestamp::from(100))).unwrap();
        election.end_time = 200;

        assert_eq!(election.state_at(50), ElectionState::Upcoming);
        assert_eq!(election.state_at(150), ElectionState::Active);

        election.active = false;
        assert_eq!(election.state_at(150), ElectionState::Closed);
        // the flag is authoritative once the election has started
        assert_eq!(election.state_at(500), ElectionState::Closed);
    }
}
