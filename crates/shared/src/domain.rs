use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseSortOptionError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(UserId);

/// A profile card as kept in the working set.
///
/// Records saved by sessions that predate the extended profile fields carry no
/// `details`; they still render as cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub picture: String,
    pub full_name: String,
    pub country: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<UserDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub street: String,
    pub postal_code: String,
    pub date_of_birth: DateTime<Utc>,
    pub age: u32,
    pub registered_at: DateTime<Utc>,
    pub timezone_name: String,
    pub timezone_offset: String,
    pub nationality: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "nameAsc")]
    NameAsc,
    #[serde(rename = "nameDesc")]
    NameDesc,
    #[serde(rename = "country")]
    Country,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::None,
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::Country,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::None => "none",
            SortOption::NameAsc => "nameAsc",
            SortOption::NameDesc => "nameDesc",
            SortOption::Country => "country",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = ParseSortOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseSortOptionError(trimmed.to_string()))
    }
}

/// Persisted sort selection. `last_used_timestamp` is milliseconds since the
/// Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortPreference {
    pub option: SortOption,
    pub last_used_timestamp: i64,
}
