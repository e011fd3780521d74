use std::cmp::Ordering;

use super::*;
use crate::test_support::{names, record};

fn sample() -> Vec<UserRecord> {
    vec![
        record("1", "carla Diaz", "Spain"),
        record("2", "Ann Lee", "France"),
        record("3", "Émile Zola", "Canada"),
        record("4", "Bob Stone", "chile"),
    ]
}

#[test]
fn none_preserves_original_order() {
    let users = sample();
    let sorted = sort_users(&users, SortOption::None);
    assert_eq!(sorted, users);
}

#[test]
fn empty_input_yields_empty_output() {
    for option in SortOption::ALL {
        assert!(sort_users(&[], option).is_empty());
    }
}

#[test]
fn name_ascending_ignores_case_and_accents() {
    let sorted = sort_users(&sample(), SortOption::NameAsc);
    assert_eq!(
        names(&sorted),
        vec!["Ann Lee", "Bob Stone", "carla Diaz", "Émile Zola"]
    );
}

#[test]
fn name_descending_is_exact_reverse_for_distinct_names() {
    let users = sample();
    let ascending = sort_users(&users, SortOption::NameAsc);
    let mut descending = sort_users(&users, SortOption::NameDesc);
    descending.reverse();
    assert_eq!(ascending, descending);
}

#[test]
fn country_sorts_ascending() {
    let sorted = sort_users(&sample(), SortOption::Country);
    let countries: Vec<&str> = sorted.iter().map(|user| user.country.as_str()).collect();
    assert_eq!(countries, vec!["Canada", "chile", "France", "Spain"]);
}

#[test]
fn country_sort_keeps_insertion_order_for_ties() {
    let users = vec![
        record("1", "Zed", "Chile"),
        record("2", "Amy", "Brazil"),
        record("3", "Max", "Chile"),
    ];
    let sorted = sort_users(&users, SortOption::Country);
    assert_eq!(names(&sorted), vec!["Amy", "Zed", "Max"]);
}

#[test]
fn sorting_leaves_input_untouched() {
    let users = sample();
    let before = users.clone();
    let _ = sort_users(&users, SortOption::NameDesc);
    assert_eq!(users, before);
}

#[test]
fn locale_compare_folds_accents_before_tie_break() {
    assert_eq!(locale_compare("émile", "Emma"), Ordering::Less);
    assert_eq!(locale_compare("Zoe", "älva"), Ordering::Greater);
    assert_ne!(locale_compare("Ann", "ann"), Ordering::Equal);
}

#[tokio::test]
async fn starts_with_none_when_nothing_saved() {
    let coordinator = SortCoordinator::load(LocalStore::in_memory()).await;
    assert_eq!(coordinator.current_option(), SortOption::None);
}

#[tokio::test]
async fn preference_survives_reload_from_same_store() {
    let store = LocalStore::in_memory();
    let coordinator = SortCoordinator::load(store.clone()).await;
    coordinator.set_option(SortOption::Country).await;

    let reloaded = SortCoordinator::load(store).await;
    assert_eq!(reloaded.current_option(), SortOption::Country);
}

#[tokio::test]
async fn loading_does_not_rewrite_saved_timestamp() {
    let store = LocalStore::in_memory();
    store
        .save_data(
            SORT_PREFERENCES_KEY,
            &SortPreference {
                option: SortOption::NameDesc,
                last_used_timestamp: 1234,
            },
        )
        .await;

    let coordinator = SortCoordinator::load(store.clone()).await;
    assert_eq!(coordinator.current_option(), SortOption::NameDesc);

    let saved: SortPreference = store.get_data(SORT_PREFERENCES_KEY).await.expect("saved");
    assert_eq!(saved.last_used_timestamp, 1234);
}

#[tokio::test]
async fn timestamps_never_decrease_across_writes() {
    let store = LocalStore::in_memory();
    let far_future = Utc::now().timestamp_millis() + 60_000;
    store
        .save_data(
            SORT_PREFERENCES_KEY,
            &SortPreference {
                option: SortOption::NameAsc,
                last_used_timestamp: far_future,
            },
        )
        .await;
    let coordinator = SortCoordinator::load(store.clone()).await;

    coordinator.set_option(SortOption::Country).await;
    let first: SortPreference = store.get_data(SORT_PREFERENCES_KEY).await.expect("first");
    coordinator.set_option(SortOption::NameAsc).await;
    let second: SortPreference = store.get_data(SORT_PREFERENCES_KEY).await.expect("second");

    assert!(first.last_used_timestamp >= far_future);
    assert!(second.last_used_timestamp >= first.last_used_timestamp);
    assert_eq!(second.option, SortOption::NameAsc);
}

#[tokio::test]
async fn reset_returns_to_none_and_notifies_subscribers() {
    let coordinator = SortCoordinator::load(LocalStore::in_memory()).await;
    let mut rx = coordinator.subscribe();

    coordinator.set_option(SortOption::NameAsc).await;
    rx.changed().await.expect("changed");
    assert_eq!(*rx.borrow_and_update(), SortOption::NameAsc);

    coordinator.reset_option().await;
    rx.changed().await.expect("changed");
    assert_eq!(*rx.borrow_and_update(), SortOption::None);
}

#[tokio::test]
async fn override_takes_precedence_over_current_option() {
    let coordinator = SortCoordinator::load(LocalStore::in_memory()).await;
    coordinator.set_option(SortOption::NameDesc).await;

    let users = sample();
    let by_current = coordinator.sort_users(&users, None);
    let by_override = coordinator.sort_users(&users, Some(SortOption::None));

    assert_eq!(by_current.first().map(|user| user.full_name.as_str()), Some("Émile Zola"));
    assert_eq!(by_override, users);
}
