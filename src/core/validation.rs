//! Validation pass turning loosely-typed cluster records into a [`Partition`].
//!
//! Records come from model output and hand-written ground truth, so they are
//! frequently malformed. Invalid records are dropped individually and reported
//! back to the caller; the rest of the partition survives.
//!
//! Accepted shapes:
//! - `{"sub_circuit_name": "CM", "transistor_names": ["m1", "m2"]}`
//! - `{"label": "CM", "members": ["m1", "m2"]}`
//! - `["CM", ["m1", "m2"]]`

use super::{Cluster, ComponentId, Partition};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const LABEL_KEYS: [&str; 2] = ["sub_circuit_name", "label"];
const MEMBER_KEYS: [&str; 2] = ["transistor_names", "members"];

/// Why a record was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Neither an object nor a `[label, members]` pair
    NotARecord,
    MissingLabel,
    EmptyLabel,
    MissingMembers,
    MembersNotAList,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotARecord => "record is neither an object nor a [label, members] pair",
            Self::MissingLabel => "label is missing or not a string",
            Self::EmptyLabel => "label is empty",
            Self::MissingMembers => "member list is missing",
            Self::MembersNotAList => "member list is not an array",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// Position of the record in the raw input
    pub position: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub partition: Partition,
    pub rejected: Vec<RejectedRecord>,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Keep only well-formed records. Never fails.
pub fn validate_records(records: &[Value]) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (position, record) in records.iter().enumerate() {
        match validate_record(record) {
            Ok(cluster) => outcome.partition.push(cluster),
            Err(reason) => outcome.rejected.push(RejectedRecord { position, reason }),
        }
    }

    outcome
}

/// Validate a single record
pub fn validate_record(record: &Value) -> Result<Cluster, RejectReason> {
    let (label, members) = match record {
        Value::Object(map) => (
            LABEL_KEYS.iter().find_map(|k| map.get(*k)),
            MEMBER_KEYS.iter().find_map(|k| map.get(*k)),
        ),
        Value::Array(items) if items.len() == 2 => (items.first(), items.get(1)),
        _ => return Err(RejectReason::NotARecord),
    };

    let label = label
        .and_then(Value::as_str)
        .ok_or(RejectReason::MissingLabel)?
        .trim();
    if label.is_empty() {
        return Err(RejectReason::EmptyLabel);
    }

    let members = match members {
        None | Some(Value::Null) => return Err(RejectReason::MissingMembers),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(RejectReason::MembersNotAList),
    };

    // Non-string or blank entries are skipped; the record itself stays valid.
    let members = members
        .iter()
        .filter_map(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(ComponentId::new)
        .collect();

    Ok(Cluster {
        label: label.to_string(),
        members,
    })
}
