use serde::{Deserialize, Serialize};

pub mod env;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Identifier of the single page-view record.
/// The value doubles as the partition key of the backing table.
pub const COUNTER_ID: &str = "page-views";

/// The one persisted document: a named counter and its current value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    pub id: String,
    pub count: u64,
}

impl CounterRecord {
    /// The record written on the first visit, before any record exists.
    pub fn first(counter_id: &str) -> Self {
        CounterRecord {
            id: counter_id.to_string(),
            count: 1,
        }
    }

    /// A copy of this record with the count advanced by one.
    pub fn incremented(&self) -> Self {
        CounterRecord {
            id: self.id.clone(),
            count: self.count + 1,
        }
    }
}

/// Success body returned to the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Failure body returned to the caller. The message stays generic; the
/// underlying store error is only ever logged.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_record_starts_at_one() {
        let record: CounterRecord = CounterRecord::first(COUNTER_ID);

        assert_eq!(COUNTER_ID, record.id);
        assert_eq!(1, record.count);
    }

    #[test]
    fn incremented_advances_count_only() {
        let record: CounterRecord = CounterRecord {
            id: COUNTER_ID.to_string(),
            count: 41,
        };

        let next: CounterRecord = record.incremented();

        assert_eq!(record.id, next.id);
        assert_eq!(42, next.count);
    }

    #[test]
    fn count_response_serializes_to_expected_shape() {
        let body: String = serde_json::to_string(&CountResponse { count: 7 }).unwrap();

        assert_eq!(r#"{"count":7}"#, body);
    }
}
