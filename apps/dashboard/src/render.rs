//! Plain-text cards and detail view.

use std::fmt::Write as _;

use shared::domain::{SortOption, UserRecord};

pub fn render_cards(users: &[UserRecord], total: usize, sort: SortOption, search: &str) -> String {
    let mut out = String::new();
    let filter = if search.trim().is_empty() {
        String::new()
    } else {
        format!(", search \"{search}\"")
    };
    let _ = writeln!(
        out,
        "{} of {} profiles (sort: {sort}{filter})",
        users.len(),
        total
    );

    if users.is_empty() {
        let _ = writeln!(out, "  no profiles match");
        return out;
    }

    for user in users {
        let _ = writeln!(out, "- {} [{}]", user.full_name, user.id);
        let _ = writeln!(out, "    {}, {}", user.city, user.country);
        let _ = writeln!(out, "    {} | {}", user.email, user.phone);
    }
    out
}

pub fn render_details(user: &UserRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", user.full_name);
    let _ = writeln!(out, "  id:       {}", user.id);
    let _ = writeln!(out, "  picture:  {}", user.picture);
    let _ = writeln!(out, "  email:    {}", user.email);
    let _ = writeln!(out, "  phone:    {}", user.phone);

    match &user.details {
        Some(details) => {
            let _ = writeln!(
                out,
                "  address:  {}, {} {}, {}",
                details.street, details.postal_code, user.city, user.country
            );
            let _ = writeln!(
                out,
                "  born:     {} (age {})",
                details.date_of_birth.format("%Y-%m-%d"),
                details.age
            );
            let _ = writeln!(
                out,
                "  member:   since {}",
                details.registered_at.format("%Y-%m-%d")
            );
            let _ = writeln!(
                out,
                "  timezone: {} ({})",
                details.timezone_name, details.timezone_offset
            );
            let _ = writeln!(out, "  nat:      {}", details.nationality);
        }
        None => {
            let _ = writeln!(out, "  location: {}, {}", user.city, user.country);
        }
    }
    out
}
