// Snowflake ID generator
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Snowflake ID generator for time-ordered unique identifiers
///
/// Format (64 bits):
/// - 41 bits: timestamp in milliseconds since custom epoch
/// - 10 bits: machine/worker ID
/// - 12 bits: sequence number
pub struct SnowflakeGenerator {
    /// Machine/worker ID (0-1023)
    worker_id: u16,

    /// Custom epoch (milliseconds since Unix epoch)
    /// Default: 2024-01-01 00:00:00 UTC (1704067200000)
    epoch: u64,

    /// State protected by mutex
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    /// Last timestamp used
    last_timestamp: u64,

    /// Sequence number (0-4095)
    sequence: u16,
}

impl SnowflakeGenerator {
    /// Custom epoch: 2024-01-01 00:00:00 UTC
    pub const DEFAULT_EPOCH: u64 = 1704067200000;

    /// Maximum worker ID
    pub const MAX_WORKER_ID: u16 = 1023;

    /// Maximum sequence number
    const MAX_SEQUENCE: u16 = 4095;

    /// Create a new Snowflake ID generator
    pub fn new(worker_id: u16) -> Self {
        Self::with_epoch(worker_id, Self::DEFAULT_EPOCH)
    }

    /// Create a new Snowflake ID generator with custom epoch
    pub fn with_epoch(worker_id: u16, epoch: u64) -> Self {
        assert!(
            worker_id <= Self::MAX_WORKER_ID,
            "worker_id must be <= {}",
            Self::MAX_WORKER_ID
        );

        Self {
            worker_id,
            epoch,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    /// Generate the next Snowflake ID
    pub fn next_id(&self) -> Result<i64, String> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| format!("Snowflake state lock poisoned: {}", e))?;

        let mut timestamp = self.current_timestamp()?;

        // Handle clock going backwards
        if timestamp < state.last_timestamp {
            return Err(format!(
                "Clock moved backwards. Refusing to generate id for {} milliseconds",
                state.last_timestamp - timestamp
            ));
        }

        if timestamp == state.last_timestamp {
            // Same millisecond - increment sequence
            state.sequence = (state.sequence + 1) & Self::MAX_SEQUENCE;

            if state.sequence == 0 {
                // Sequence overflow - wait for next millisecond
                timestamp = self.wait_next_millis(state.last_timestamp)?;
            }
        } else {
            // New millisecond - reset sequence
            state.sequence = 0;
        }

        state.last_timestamp = timestamp;

        // Construct the ID
        let id = ((timestamp - self.epoch) << 22)
            | ((self.worker_id as u64) << 12)
            | (state.sequence as u64);

        Ok(id as i64)
    }

    /// Get current timestamp in milliseconds
    fn current_timestamp(&self) -> Result<u64, String> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| format!("Failed to get current timestamp: {}", e))
    }

    /// Wait until next millisecond
    fn wait_next_millis(&self, last_timestamp: u64) -> Result<u64, String> {
        let mut timestamp = self.current_timestamp()?;
        while timestamp <= last_timestamp {
            timestamp = self.current_timestamp()?;
        }
        Ok(timestamp)
    }

    /// Extract timestamp from a Snowflake ID
    pub fn extract_timestamp(&self, id: i64) -> u64 {
        let id = id as u64;
        (id >> 22) + self.epoch
    }

    /// Extract worker ID from a Snowflake ID
    pub fn extract_worker_id(&self, id: i64) -> u16 {
        let id = id as u64;
        ((id >> 12) & 0x3FF) as u16
    }

    /// Extract sequence from a Snowflake ID
    pub fn extract_sequence(&self, id: i64) -> u16 {
        let id = id as u64;
        (id & 0xFFF) as u16
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
