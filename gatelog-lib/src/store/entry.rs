use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};

/// One check-in row from the remote `entries` table.
///
/// Field names mirror the wire format exactly; rows are never created or
/// deleted from this side, only read (and their lock flag rewritten), so
/// the type deserializes but does not serialize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub user_name: String,
    /// Stored as text in some deployments and as a number in others.
    #[serde(deserialize_with = "de_room_no")]
    pub room_no: String,
    pub entry_date: NaiveDate,
    /// The service emits `HH:MM:SS` for time columns, but rows written by
    /// hand or by older clients may carry bare `HH:MM`.
    #[serde(deserialize_with = "de_entry_time")]
    pub entry_time: NaiveTime,
    /// Defaults to unlocked when the column is absent or null.
    #[serde(rename = "isLocked", default, deserialize_with = "de_locked")]
    pub is_locked: bool,
}

impl Entry {
    pub fn date_str(&self) -> String {
        self.entry_date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.entry_time.format("%H:%M").to_string()
    }
}

fn de_room_no<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RoomNo {
        Text(String),
        Number(i64),
    }

    Ok(match RoomNo::deserialize(deserializer)? {
        RoomNo::Text(text) => text,
        RoomNo::Number(number) => number.to_string(),
    })
}

fn de_entry_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveTime::parse_from_str(&raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
        .map_err(serde::de::Error::custom)
}

fn de_locked<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
