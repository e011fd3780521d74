use std::{cmp::Reverse, sync::Mutex};

use chrono::Utc;
use shared::domain::{SortOption, SortPreference, UserRecord};
use storage::LocalStore;
use tokio::sync::watch;
use tracing::info;

pub const SORT_PREFERENCES_KEY: &str = "sort_preferences";

/// Current sort selection, persisted as a [`SortPreference`] on every change.
pub struct SortCoordinator {
    store: LocalStore,
    current: watch::Sender<SortOption>,
    last_timestamp: Mutex<i64>,
}

impl SortCoordinator {
    /// Adopts the persisted option, if any, without rewriting it.
    pub async fn load(store: LocalStore) -> Self {
        let saved: Option<SortPreference> = store.get_data(SORT_PREFERENCES_KEY).await;
        let (option, last_timestamp) = match saved {
            Some(preference) => {
                info!(option = %preference.option, "restored saved sort preference");
                (preference.option, preference.last_used_timestamp)
            }
            None => (SortOption::None, 0),
        };

        let (current, _) = watch::channel(option);
        Self {
            store,
            current,
            last_timestamp: Mutex::new(last_timestamp),
        }
    }

    pub fn current_option(&self) -> SortOption {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SortOption> {
        self.current.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.current.receiver_count()
    }

    pub async fn set_option(&self, option: SortOption) {
        self.current.send_replace(option);
        let preference = SortPreference {
            option,
            last_used_timestamp: self.next_timestamp(),
        };
        self.store
            .save_data(SORT_PREFERENCES_KEY, &preference)
            .await;
    }

    pub async fn reset_option(&self) {
        self.set_option(SortOption::None).await;
    }

    /// Sorts by `option`, or by the current option when `None`.
    pub fn sort_users(&self, users: &[UserRecord], option: Option<SortOption>) -> Vec<UserRecord> {
        sort_users(users, option.unwrap_or_else(|| self.current_option()))
    }

    // Wall clock may step backwards; persisted timestamps must not.
    fn next_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self
            .last_timestamp
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = (*last).max(now);
        *last
    }
}

pub fn sort_users(users: &[UserRecord], option: SortOption) -> Vec<UserRecord> {
    if users.is_empty() {
        return Vec::new();
    }

    let mut sorted = users.to_vec();
    match option {
        SortOption::NameAsc => sorted.sort_by_cached_key(|user| collation_key(&user.full_name)),
        SortOption::NameDesc => {
            sorted.sort_by_cached_key(|user| Reverse(collation_key(&user.full_name)))
        }
        SortOption::Country => sorted.sort_by_cached_key(|user| collation_key(&user.country)),
        SortOption::None => {}
    }
    sorted
}

/// Case- and accent-insensitive ordering with a deterministic tie-break on the
/// raw text.
#[cfg(test)]
fn locale_compare(a: &str, b: &str) -> std::cmp::Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(text: &str) -> (String, String) {
    let primary = text
        .chars()
        .map(fold_diacritic)
        .flat_map(char::to_lowercase)
        .collect();
    (primary, text.to_string())
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'À'..='Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'č' => 'c',
        'Ç' | 'Ć' | 'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'è'..='ë' | 'ē' | 'ę' | 'ě' => 'e',
        'È'..='Ë' | 'Ē' | 'Ę' | 'Ě' => 'E',
        'ğ' => 'g',
        'Ğ' => 'G',
        'ì'..='ï' | 'ī' | 'ı' => 'i',
        'Ì'..='Ï' | 'Ī' | 'İ' => 'I',
        'ł' => 'l',
        'Ł' => 'L',
        'ñ' | 'ń' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ň' => 'N',
        'ò'..='ö' | 'ø' | 'ō' | 'ő' => 'o',
        'Ò'..='Ö' | 'Ø' | 'Ō' | 'Ő' => 'O',
        'ř' => 'r',
        'Ř' => 'R',
        'ś' | 'š' | 'ş' => 's',
        'Ś' | 'Š' | 'Ş' => 'S',
        'ť' => 't',
        'Ť' => 'T',
        'ù'..='ü' | 'ū' | 'ů' | 'ű' => 'u',
        'Ù'..='Ü' | 'Ū' | 'Ů' | 'Ű' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' | 'Ÿ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        other => other,
    }
}

#[cfg(test)]
#[path = "tests/sorting_tests.rs"]
mod tests;
