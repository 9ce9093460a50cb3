use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for the loaded datasets.
///
/// Returned by [`Datasets::stats`](crate::Datasets::stats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub countries: usize,
    pub airports: usize,
}
