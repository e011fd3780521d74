use shared::domain::{UserId, UserRecord};

pub(crate) fn record(id: &str, full_name: &str, country: &str) -> UserRecord {
    UserRecord {
        id: UserId::from(id),
        picture: format!("https://example.test/{id}.jpg"),
        full_name: full_name.to_string(),
        country: country.to_string(),
        city: "Springfield".to_string(),
        email: format!("{id}@example.test"),
        phone: "555-0100".to_string(),
        details: None,
    }
}

pub(crate) fn names(users: &[UserRecord]) -> Vec<&str> {
    users.iter().map(|user| user.full_name.as_str()).collect()
}
