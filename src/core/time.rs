//! Wall-clock primitive.

use serde::{Deserialize, Serialize};

/// Wall clock in milliseconds since the Unix epoch.
///
/// Audit timestamps and deadlines only - not a causal ordering primitive.
/// Copy is fine here - it's just a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallClock(pub u64);

impl WallClock {
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(ms)
    }
}
