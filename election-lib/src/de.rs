use serde::Deserialize;

/// Timestamp field as it appears in a raw election record.
///
/// Contract reads surface timestamps as decimal strings, fixtures store
/// plain JSON numbers. Parsing to a unix value is deferred to the adapter
/// so that a bad string is reported as an [`AdapterError`](crate::AdapterError)
/// and not a generic deserialization failure.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum RawTimestamp {
    // `"startTime": 1627980001`
    Number(u64),
    // `"startTime": "1627980001"`
    String(String),
}

impl RawTimestamp {
    /// Unix seconds, or the offending value for error reporting.
    pub(crate) fn to_unix(&self) -> Result<u64, String> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::String(s) => s.trim().parse().map_err(|_| s.clone()),
        }
    }
}

impl From<u64> for RawTimestamp {
    fn from(from: u64) -> Self {
        Self::Number(from)
    }
}

impl From<&str> for RawTimestamp {
    fn from(from: &str) -> Self {
        Self::String(from.to_string())
    }
}
