//! Serde adapters for the stored text formats (`HH:MM:SS` times and
//! durations, `YYYY/MM/DD` dates).

pub mod time {
    use crate::utils::time::{format_time, normalize_to_seconds};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_time(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        normalize_to_seconds(&raw).map_err(D::Error::custom)
    }
}

pub mod time_opt {
    use crate::utils::time::{format_time, normalize_to_seconds};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&format_time(*t)),
            None => s.serialize_none(),
        }
    }

    /// `null`, absent and `""` all mean "no time"; the edit screen used to
    /// store empty strings for unset pickers.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => normalize_to_seconds(v).map(Some).map_err(D::Error::custom),
        }
    }
}

pub mod duration_opt {
    use crate::utils::time::{format_hms, parse_hms_duration};
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_str(&format_hms(*d)),
            None => s.serialize_none(),
        }
    }

    /// Durations are derived data; an unreadable value is dropped and
    /// recomputed from the endpoints by the owner.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.and_then(|v| parse_hms_duration(&v).ok()))
    }
}
