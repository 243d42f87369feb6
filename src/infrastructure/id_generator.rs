// ID Generator - Snowflake-like IDs for pages, sections and assets
// 64-bit ID format: [timestamp:42][node_id:10][sequence:12]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const SEQUENCE_BITS: u64 = 12;
const SEQUENCE_MASK: u64 = 0xFFF;
const TIMESTAMP_MASK: u64 = 0x3FF_FFFF_FFFF;

/// Allows for 1024 nodes and 4096 IDs per millisecond per node
#[derive(Debug)]
pub struct IdGenerator {
    node_id: u16,
    /// Last issued `[timestamp][sequence]` pair, swapped as one unit
    state: AtomicU64,
}

impl IdGenerator {
    /// Create new ID generator; node ids above 1023 are masked to 10 bits
    pub fn new(node_id: u16) -> Self {
        Self {
            node_id: node_id & 0x3FF,
            state: AtomicU64::new(0),
        }
    }

    /// Generate next unique ID
    pub fn next_id(&self) -> i64 {
        loop {
            let now = current_millis() & TIMESTAMP_MASK;
            let last = self.state.load(Ordering::Acquire);
            let last_ts = last >> SEQUENCE_BITS;
            let last_seq = last & SEQUENCE_MASK;

            let (ts, sequence) = if now > last_ts {
                (now, 0)
            } else if last_seq < SEQUENCE_MASK {
                // Same millisecond, or the clock moved back: keep counting on the last one
                (last_ts, last_seq + 1)
            } else {
                // Sequence exhausted - wait for next millisecond
                std::thread::sleep(std::time::Duration::from_millis(1));
                continue;
            };

            let next = (ts << SEQUENCE_BITS) | sequence;
            if self
                .state
                .compare_exchange(last, next, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }

            let id = (ts << 22) |                          // 42 bits timestamp
                     ((self.node_id as u64) << 12) |       // 10 bits node_id
                     sequence;                             // 12 bits sequence

            return id as i64;
        }
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
