//! `Duration` carried as integer milliseconds on the wire
//!
//! Use with `#[serde(with = "crate::shared::serde_duration")]`.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Timed {
        #[serde(with = "super")]
        elapsed_ms: Duration,
    }

    #[test]
    fn test_millis_on_the_wire() {
        let timed = Timed {
            elapsed_ms: Duration::from_millis(1500),
        };
        let json = serde_json::to_string(&timed).unwrap();
        assert_eq!(json, r#"{"elapsed_ms":1500}"#);

        let back: Timed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timed);
    }

    #[test]
    fn test_sub_millisecond_truncates() {
        let timed = Timed {
            elapsed_ms: Duration::from_micros(999),
        };
        assert_eq!(serde_json::to_string(&timed).unwrap(), r#"{"elapsed_ms":0}"#);
    }
}
