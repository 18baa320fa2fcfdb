//! Release coordinates for deployed containers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates of the release deployed into a container
///
/// Containers are deployed and versioned externally; this core only reads
/// the coordinates, mainly as metric labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseId {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ReleaseId {
    /// Create release coordinates
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
