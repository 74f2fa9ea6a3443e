//! Projected records returned by the category fetchers.
//!
//! Each struct is the fixed field set a fetcher projects from its source.
//! JSON keys match the names clients already consume, which is why some
//! keys are camelCase and some keep their source's snake_case.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Sentiment and emotion attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectRecord {
    pub date: Timestamp,
    pub sentiment: Option<f64>,
    pub emotion: Option<String>,
}

/// Message content and where it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRecord {
    pub text: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: Timestamp,
}

/// An inferred interest with its confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRecord {
    pub value: String,
    pub confidence: Option<f64>,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRecord {
    pub timestamp: Timestamp,
    #[serde(rename = "restingHeartRate")]
    pub resting_heart_rate: Option<f64>,
    pub peak_minutes: Option<f64>,
    pub cardio_minutes: Option<f64>,
    #[serde(rename = "fatBurn_minutes")]
    pub fat_burn_minutes: Option<f64>,
    #[serde(rename = "outOfRange_minutes")]
    pub out_of_range_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    pub timestamp: Timestamp,
    pub duration: Option<f64>,
    pub efficiency: Option<f64>,
    pub minutes_after_wakeup: Option<f64>,
    pub minutes_asleep: Option<f64>,
    pub minutes_awake: Option<f64>,
    pub minutes_to_fall_asleep: Option<f64>,
    pub time_in_bed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub timestamp: Timestamp,
    pub calories_in: Option<f64>,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub protein: Option<f64>,
    pub sodium: Option<f64>,
    pub water: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRecord {
    pub timestamp: Timestamp,
    pub body_fat: Option<f64>,
    pub body_weight: Option<f64>,
    pub body_bmi: Option<f64>,
    pub name_body: Option<String>,
}

/// A contact the user is connected to on some source network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub contact_id: String,
    pub source: Option<String>,
}

/// Kinds of physical-state measurement, each its own source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalKind {
    Heart,
    Sleep,
    Food,
    Body,
}

impl PhysicalKind {
    /// Source tag stored alongside each measurement.
    pub fn source_tag(&self) -> &'static str {
        match self {
            PhysicalKind::Heart => "fitbit-heart",
            PhysicalKind::Sleep => "fitbit-sleep",
            PhysicalKind::Food => "fitbit-food",
            PhysicalKind::Body => "fitbit-body",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_record_uses_source_field_names() {
        let record = HeartRecord {
            timestamp: Timestamp::now(),
            resting_heart_rate: Some(58.0),
            peak_minutes: Some(3.0),
            cardio_minutes: None,
            fat_burn_minutes: Some(20.0),
            out_of_range_minutes: None,
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["restingHeartRate"], 58.0);
        assert_eq!(json["peak_minutes"], 3.0);
        assert_eq!(json["fatBurn_minutes"], 20.0);
        assert!(json.get("outOfRange_minutes").is_some());
    }

    #[test]
    fn sleep_record_is_camel_case() {
        let record = SleepRecord {
            timestamp: Timestamp::now(),
            duration: Some(480.0),
            efficiency: Some(92.0),
            minutes_after_wakeup: None,
            minutes_asleep: Some(450.0),
            minutes_awake: None,
            minutes_to_fall_asleep: Some(12.0),
            time_in_bed: Some(490.0),
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["minutesAsleep"], 450.0);
        assert_eq!(json["timeInBed"], 490.0);
    }

    #[test]
    fn connection_record_serializes_contact_id() {
        let record = ConnectionRecord {
            contact_id: "c-1".to_string(),
            source: Some("twitter".to_string()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["contactId"], "c-1");
    }

    #[test]
    fn physical_kinds_have_distinct_tags() {
        let tags = [
            PhysicalKind::Heart.source_tag(),
            PhysicalKind::Sleep.source_tag(),
            PhysicalKind::Food.source_tag(),
            PhysicalKind::Body.source_tag(),
        ];
        let unique: std::collections::HashSet<_> = tags.iter().collect();
        assert_eq!(unique.len(), 4);
    }
}
