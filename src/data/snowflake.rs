use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use std::env;

use crate::DocumentId;

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;

const MAX_NODE_ID: u64 = (1 << NODE_ID_BITS) - 1;
const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;

const NODE_ID_SHIFT: u64 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u64 = SEQUENCE_BITS + NODE_ID_BITS;

/// Generates time-ordered document identifiers.
///
/// Identifiers handed out by one generator are strictly increasing, so
/// insertion order and `_id` order agree within a collection.
pub struct Snowflake {
    node_id: u64,
    state: AtomicU64, // (timestamp << 12) | sequence
}

impl Snowflake {
    /// Node id comes from `Q_NODE_ID`, falling back to 0.
    pub fn new() -> Self {
        match env::var("Q_NODE_ID") {
            Ok(value) => Self::from(value.parse::<u64>().unwrap_or(0)),
            Err(_) => Self::from(0),
        }
    }

    pub fn generate(&self) -> DocumentId {
        loop {
            let last = self.state.load(Ordering::Relaxed);
            let last_ts = last >> SEQUENCE_BITS;
            let last_seq = last & MAX_SEQUENCE;

            // A clock that steps backwards keeps issuing from the last timestamp.
            let now = current_timestamp().max(last_ts);

            // An exhausted sequence borrows the next millisecond.
            let (ts, seq) = if now > last_ts {
                (now, 0)
            } else if last_seq == MAX_SEQUENCE {
                (last_ts + 1, 0)
            } else {
                (last_ts, last_seq + 1)
            };

            let next = (ts << SEQUENCE_BITS) | seq;
            if self
                .state
                .compare_exchange(last, next, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return DocumentId((ts << TIMESTAMP_SHIFT) | (self.node_id << NODE_ID_SHIFT) | seq);
            }
        }
    }
}

impl Default for Snowflake {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for Snowflake {
    fn from(node_id: u64) -> Self {
        Self {
            node_id: node_id & MAX_NODE_ID,
            state: AtomicU64::new(0),
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
