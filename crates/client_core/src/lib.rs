pub mod dashboard;
pub mod error;
pub mod loading;
pub mod sorting;
pub mod user_source;
pub mod working_set;

pub use dashboard::{
    filter_users, DashboardController, DashboardEvent, DashboardPhase, Notification,
    NotificationLevel, DEFAULT_BATCH_SIZE,
};
pub use error::FetchError;
pub use loading::{LoadingFeedback, DEFAULT_MIN_DISPLAY};
pub use sorting::{sort_users, SortCoordinator, SORT_PREFERENCES_KEY};
pub use user_source::{RandomUserClient, UserSource, DEFAULT_API_URL};
pub use working_set::{WorkingSetStore, USERS_STORAGE_KEY};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
