//! Wire format of the Random User API (`https://randomuser.me/api/`).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{UserDetails, UserId, UserRecord};

/// Either a page of results or an API-side error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserResponse {
    #[serde(default)]
    pub results: Vec<RandomUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ResponseInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseInfo {
    #[serde(default)]
    pub seed: String,
    #[serde(default)]
    pub results: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<Login>,
    pub picture: Picture,
    pub name: Name,
    pub location: Location,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub cell: String,
    pub dob: Dated,
    pub registered: Dated,
    #[serde(default)]
    pub nat: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    pub uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub large: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub thumbnail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub street: Street,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub country: String,
    pub postcode: Postcode,
    pub timezone: Timezone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Street {
    pub number: u32,
    pub name: String,
}

/// Postcodes come back as numbers for some nationalities and strings for others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Postcode {
    Number(i64),
    Text(String),
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Postcode::Number(value) => write!(f, "{value}"),
            Postcode::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timezone {
    pub offset: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dated {
    pub date: DateTime<Utc>,
    pub age: u32,
}

impl RandomUser {
    /// Maps the API shape onto a working-set record. `fallback_id` is used when
    /// the response carries no login block.
    pub fn into_user_record(self, fallback_id: impl FnOnce() -> String) -> UserRecord {
        let id = match self.login {
            Some(login) if !login.uuid.is_empty() => login.uuid,
            _ => fallback_id(),
        };
        let details = UserDetails {
            street: format!(
                "{} {}",
                self.location.street.number, self.location.street.name
            ),
            postal_code: self.location.postcode.to_string(),
            date_of_birth: self.dob.date,
            age: self.dob.age,
            registered_at: self.registered.date,
            timezone_name: self.location.timezone.description,
            timezone_offset: self.location.timezone.offset,
            nationality: self.nat,
        };

        UserRecord {
            id: UserId(id),
            picture: self.picture.large,
            full_name: format!("{} {}", self.name.first, self.name.last),
            country: self.location.country,
            city: self.location.city,
            email: self.email,
            phone: self.phone,
            details: Some(details),
        }
    }
}
