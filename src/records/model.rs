use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumIter};
use uuid::Uuid;

/// Lifecycle of a bird in the coop. The serialized strings are the ones the
/// app has always written, so stored records keep decoding across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum ChickenStatus {
    #[serde(rename = "Active")]
    #[strum(serialize = "Active")]
    Active,
    #[serde(rename = "Not laying")]
    #[strum(serialize = "Not laying")]
    NotLaying,
    #[serde(rename = "Sold")]
    #[strum(serialize = "Sold")]
    Sold,
    #[serde(rename = "Deceased")]
    #[strum(serialize = "Deceased")]
    Deceased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chicken {
    pub id: Uuid,
    pub name: String,
    pub breed: String,
    pub arrival_date: DateTime<Utc>,
    pub notes: String,
    pub laying_rate: u32,
    pub status: ChickenStatus,
    pub comment: String,
    pub image_name: String,
}

impl Chicken {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        breed: impl Into<String>,
        arrival_date: DateTime<Utc>,
        notes: impl Into<String>,
        laying_rate: u32,
        status: ChickenStatus,
        comment: impl Into<String>,
        image_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            breed: breed.into(),
            arrival_date,
            notes: notes.into(),
            laying_rate,
            status,
            comment: comment.into(),
            image_name: image_name.into(),
        }
    }
}

/// One collection run. `chicken_name` is free text, not a roster reference;
/// entries survive a bird being removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub quantity: u32,
    pub chicken_name: Option<String>,
}

impl EggEntry {
    pub fn new(date: DateTime<Utc>, quantity: u32, chicken_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            quantity,
            chicken_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum ReminderInterval {
    #[serde(rename = "Every hour")]
    #[strum(serialize = "Every hour")]
    EveryHour,
    #[serde(rename = "Every day")]
    #[strum(serialize = "Every day")]
    EveryDay,
    #[serde(rename = "Every 3 days")]
    #[strum(serialize = "Every 3 days")]
    Every3Days,
    #[serde(rename = "Select date")]
    #[strum(serialize = "Select date")]
    SelectDate,
}

impl ReminderInterval {
    /// Repeat period. [`Self::SelectDate`] is a one-shot and has none.
    pub fn period(self) -> Option<Duration> {
        match self {
            Self::EveryHour => Some(Duration::from_secs(3600)),
            Self::EveryDay => Some(Duration::from_secs(86_400)),
            Self::Every3Days => Some(Duration::from_secs(259_200)),
            Self::SelectDate => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub text: String,
    pub interval: ReminderInterval,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl Reminder {
    pub fn new(text: impl Into<String>, interval: ReminderInterval) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            interval,
            created_at: Utc::now(),
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_keeps_historic_strings() {
        assert_eq!(
            serde_json::to_value(ChickenStatus::NotLaying).expect("serialize"),
            json!("Not laying")
        );
        let parsed: ChickenStatus = serde_json::from_value(json!("Deceased")).expect("parse");
        assert_eq!(parsed, ChickenStatus::Deceased);
        assert_eq!(ChickenStatus::NotLaying.to_string(), "Not laying");
    }

    #[test]
    fn interval_periods_match_labels() {
        assert_eq!(
            ReminderInterval::EveryHour.period(),
            Some(Duration::from_secs(3600))
        );
        assert_eq!(
            ReminderInterval::Every3Days.period(),
            Some(Duration::from_secs(259_200))
        );
        assert_eq!(ReminderInterval::SelectDate.period(), None);
        let parsed: ReminderInterval =
            serde_json::from_value(json!("Every 3 days")).expect("parse");
        assert_eq!(parsed, ReminderInterval::Every3Days);
    }

    #[test]
    fn chicken_serializes_with_camel_case_keys() {
        let chicken = Chicken::new(
            "Henrietta",
            "Sussex",
            Utc::now(),
            "",
            5,
            ChickenStatus::Active,
            "",
            "chicken1",
        );
        let value = serde_json::to_value(&chicken).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(object.contains_key("arrivalDate"));
        assert!(object.contains_key("layingRate"));
        assert!(object.contains_key("imageName"));
        assert!(!object.contains_key("laying_rate"));
    }

    #[test]
    fn new_reminder_starts_incomplete() {
        let reminder = Reminder::new("Clean the coop", ReminderInterval::EveryDay);
        assert!(!reminder.completed);
        let value = serde_json::to_value(&reminder).expect("serialize");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn egg_entry_without_chicken_round_trips() {
        let entry = EggEntry::new(Utc::now(), 12, None);
        let value = serde_json::to_value(&entry).expect("serialize");
        let back: EggEntry = serde_json::from_value(value).expect("parse");
        assert_eq!(back, entry);
        assert_eq!(back.chicken_name, None);
    }
}
