use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::Statistic;
use crate::error::{CwqError, Result};
use crate::model::metric::Metric;

const MAX_ID_LEN: usize = 255;

/// Identifier of one metric data query: a lowercase letter followed by
/// letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueryId(String);

impl QueryId {
    pub fn parse(input: &str) -> Result<Self> {
        let mut chars = input.chars();
        let valid_head = chars.next().is_some_and(|c| c.is_ascii_lowercase());
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_head || !valid_tail || input.len() > MAX_ID_LEN {
            return Err(CwqError::Parse(format!("invalid query id: {input}")));
        }
        Ok(Self(input.to_string()))
    }

    /// Stable id derived from the compact JSON of `[metric, stat]`.
    pub fn for_metric_stat(metric: &Metric, stat: &Statistic) -> Self {
        let canonical = serde_json::to_vec(&(metric, stat)).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        Self(format!("h{digest:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QueryId {
    type Error = CwqError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<QueryId> for String {
    fn from(value: QueryId) -> Self {
        value.0
    }
}
