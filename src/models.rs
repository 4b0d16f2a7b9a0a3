use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(format!("unsupported language `{other}`")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Server-localized text. Older endpoints send a bare string, which is
/// treated as the English value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub en: String,
    pub ar: String,
}

impl LocalizedText {
    pub fn get(&self, language: Language) -> &str {
        let (preferred, fallback) = match language {
            Language::En => (&self.en, &self.ar),
            Language::Ar => (&self.ar, &self.en),
        };
        if preferred.is_empty() {
            fallback
        } else {
            preferred
        }
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Pair {
            #[serde(default)]
            en: Option<String>,
            #[serde(default)]
            ar: Option<String>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Plain(String),
            Pair(Pair),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Plain(en) => LocalizedText {
                en,
                ar: String::new(),
            },
            Raw::Pair(pair) => LocalizedText {
                en: pair.en.unwrap_or_default(),
                ar: pair.ar.unwrap_or_default(),
            },
        })
    }
}

/// Price exactly as the server formatted it. Never used for arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Price(pub String);

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Price(text),
            Raw::Number(number) => Price(number.to_string()),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Salon {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    pub name: LocalizedText,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub banners: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubService {
    pub id: i64,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: LocalizedText,
    pub price: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: i64,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: LocalizedText,
    pub price: Price,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub sub_services: Vec<SubService>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: LocalizedText,
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Server-proposed slot. Times are fixed-width "HH:mm".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub cart_item_id: i64,
    #[serde(default)]
    pub salon_id: Option<i64>,
    pub service: LocalizedText,
    #[serde(default)]
    pub employee: Option<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub price: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_price: Price,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Rescheduled,
    Completed,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "rescheduled" => Ok(AppointmentStatus::Rescheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub status: AppointmentStatus,
    pub date: NaiveDate,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub salon: LocalizedText,
    pub service: LocalizedText,
    #[serde(default)]
    pub employee: Option<String>,
    pub price: Price,
}

impl Appointment {
    pub fn can_cancel(&self) -> bool {
        matches!(
            self.status,
            AppointmentStatus::Pending | AppointmentStatus::Rescheduled
        )
    }

    pub fn can_reschedule(&self) -> bool {
        self.can_cancel()
    }

    /// Actions the appointments screen offers for this status.
    pub fn actions(&self) -> Vec<&'static str> {
        let mut actions = Vec::new();
        if self.can_reschedule() {
            actions.push("reschedule");
        }
        if self.can_cancel() {
            actions.push("cancel");
        }
        actions
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub title: LocalizedText,
    pub body: LocalizedText,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub appointment_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: i64,
    pub salon_id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    pub name: LocalizedText,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HomeFeed {
    #[serde(default)]
    pub salons: Vec<Salon>,
    #[serde(default)]
    pub banners: Vec<String>,
    #[serde(default)]
    pub recent_appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
