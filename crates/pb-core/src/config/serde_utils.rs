//! Serde helpers for configuration types

/// Serialize and deserialize `Duration` as whole seconds
///
/// Keeps the config file free of nested `{ secs, nanos }` tables; every
/// duration the bridge cares about is coarse enough for second resolution.
pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super::duration_secs")]
        value: Duration,
    }

    #[test]
    fn test_duration_serializes_as_seconds() {
        let wrapper = Wrapper {
            value: Duration::from_secs(90),
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"value":90}"#);
    }

    #[test]
    fn test_duration_deserializes_from_seconds() {
        let wrapper: Wrapper = serde_json::from_str(r#"{"value":15}"#).unwrap();
        assert_eq!(wrapper.value, Duration::from_secs(15));
    }
}
