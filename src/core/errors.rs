use thiserror::Error;

use crate::core::aggregate::GroupKey;
use crate::domain::RangeError;

/// Reasons a summary request is rejected before any table is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    #[error(transparent)]
    InvalidRange(#[from] RangeError),
    #[error("at least one grouping key is required")]
    EmptyGroupBy,
    #[error("cannot group by {0}: at least one entry does not carry that field")]
    MissingGroupKey(GroupKey),
    #[error("unknown grouping key `{0}` (expected type or category)")]
    UnknownGroupKey(String),
}
