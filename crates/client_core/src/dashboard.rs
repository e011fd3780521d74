//! Dashboard orchestration: fetches profiles into the working set and keeps
//! the filtered+sorted view current.

use std::sync::{Arc, Mutex, MutexGuard};

use shared::{
    domain::{SortOption, UserId, UserRecord},
    error::{DashboardFailure, FailureKind},
};
use tokio::{
    sync::{broadcast, watch, Mutex as AsyncMutex},
    task::JoinHandle,
};
use tracing::{debug, error, info};

use crate::{
    error::FetchError, loading::LoadingFeedback, sorting::SortCoordinator,
    user_source::UserSource, working_set::WorkingSetStore,
};

pub const DEFAULT_BATCH_SIZE: usize = 3;

const LOADING_PROFILES_MESSAGE: &str = "Loading profiles...";
const GENERATING_PROFILE_MESSAGE: &str = "Generating new profile...";
const PROFILE_GENERATED_MESSAGE: &str = "New profile generated successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPhase {
    Idle,
    LoadingBatch,
    LoadingSingle,
    /// A failed fetch is being surfaced. Returns to `Idle` once the busy
    /// flag is released; the failure stays available through `last_failure`.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    ViewChanged { visible: usize, total: usize },
    Notification(Notification),
}

struct DashboardState {
    users: Vec<UserRecord>,
    search_term: String,
    phase: DashboardPhase,
    failure: Option<DashboardFailure>,
    page: u32,
    selected: Option<UserId>,
    generating_single: bool,
    view_sort: Option<SortOption>,
}

pub struct DashboardController {
    source: Arc<dyn UserSource>,
    working_set: WorkingSetStore,
    sorting: Arc<SortCoordinator>,
    loading: Arc<LoadingFeedback>,
    batch_size: usize,
    state: Mutex<DashboardState>,
    view: watch::Sender<Vec<UserRecord>>,
    events: broadcast::Sender<DashboardEvent>,
    sort_task: Mutex<Option<JoinHandle<()>>>,
    persist_lock: AsyncMutex<()>,
}

impl DashboardController {
    pub fn new(
        source: Arc<dyn UserSource>,
        working_set: WorkingSetStore,
        sorting: Arc<SortCoordinator>,
        loading: Arc<LoadingFeedback>,
        batch_size: usize,
    ) -> Arc<Self> {
        let (view, _) = watch::channel(Vec::new());
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            source,
            working_set,
            sorting,
            loading,
            batch_size: batch_size.max(1),
            state: Mutex::new(DashboardState {
                users: Vec::new(),
                search_term: String::new(),
                phase: DashboardPhase::Idle,
                failure: None,
                page: 1,
                selected: None,
                generating_single: false,
                view_sort: None,
            }),
            view,
            events,
            sort_task: Mutex::new(None),
            persist_lock: AsyncMutex::new(()),
        })
    }

    /// Follows sort option changes and restores the saved working set, falling
    /// back to fetching a first batch when nothing was saved.
    pub async fn start(self: &Arc<Self>) {
        self.watch_sort_changes();

        match self.working_set.load().await {
            Some(saved) if !saved.is_empty() => {
                info!(count = saved.len(), "restored saved working set");
                let mut state = self.state();
                state.users = saved;
                self.publish_view(&mut state);
            }
            _ => {
                // Failures are already recorded and surfaced by `load_more`.
                let _ = self.load_more().await;
            }
        }
    }

    fn watch_sort_changes(self: &Arc<Self>) {
        let mut options = self.sorting.subscribe();
        let controller = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            while options.changed().await.is_ok() {
                let option = *options.borrow_and_update();
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                controller.apply_sort(option);
            }
        });

        let previous = self
            .sort_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Fetches one more batch. Not guarded: overlapping calls each append
    /// their results in arrival order.
    pub async fn load_more(&self) -> Result<usize, FetchError> {
        {
            let mut state = self.state();
            state.failure = None;
            state.phase = DashboardPhase::LoadingBatch;
        }
        self.loading.show();

        match self.source.fetch_users(self.batch_size).await {
            Ok(new_users) => {
                let count = new_users.len();
                {
                    let mut state = self.state();
                    state.users.extend(new_users);
                    state.page += 1;
                    state.phase = DashboardPhase::Idle;
                    self.publish_view(&mut state);
                }
                let total = self.persist_working_set().await;
                info!(count, total, "loaded more users");
                self.loading.hide();
                Ok(count)
            }
            Err(err) => {
                self.record_failure(FailureKind::BatchFetch, &err);
                self.loading.hide();
                self.state().phase = DashboardPhase::Idle;
                Err(err)
            }
        }
    }

    /// Fetches a single profile. Returns `Ok(None)` without fetching while the
    /// busy flag is up.
    pub async fn generate_one(&self) -> Result<Option<UserRecord>, FetchError> {
        {
            let mut state = self.state();
            if self.loading.is_loading() {
                debug!("busy; ignoring profile generation request");
                return Ok(None);
            }
            state.failure = None;
            state.generating_single = true;
            state.phase = DashboardPhase::LoadingSingle;
            self.loading.show();
        }

        match self.source.fetch_single_user().await {
            Ok(user) => {
                {
                    let mut state = self.state();
                    state.users.push(user.clone());
                    state.phase = DashboardPhase::Idle;
                    self.publish_view(&mut state);
                }
                let total = self.persist_working_set().await;
                info!(user_id = %user.id, total, "generated new profile");
                self.notify(Notification::success(PROFILE_GENERATED_MESSAGE));
                self.loading.hide();
                self.state().generating_single = false;
                Ok(Some(user))
            }
            Err(err) => {
                self.record_failure(FailureKind::SingleFetch, &err);
                self.loading.hide();
                let mut state = self.state();
                state.generating_single = false;
                state.phase = DashboardPhase::Idle;
                Err(err)
            }
        }
    }

    pub fn search(&self, term: impl Into<String>) -> Vec<UserRecord> {
        let mut state = self.state();
        state.search_term = term.into();
        self.publish_view(&mut state)
    }

    pub async fn change_sort(&self, option: SortOption) -> Vec<UserRecord> {
        self.sorting.set_option(option).await;
        self.apply_sort(option)
    }

    /// Recomputes and publishes the visible list: search filter first, then the
    /// current sort option.
    pub fn apply_filters_and_sort(&self) -> Vec<UserRecord> {
        let mut state = self.state();
        self.publish_view(&mut state)
    }

    // Both `change_sort` and the sort watcher land here; whichever runs second
    // finds the view already sorted by `option` and publishes nothing.
    fn apply_sort(&self, option: SortOption) -> Vec<UserRecord> {
        let mut state = self.state();
        if state.view_sort == Some(option) {
            return self.view.borrow().clone();
        }
        self.publish_view(&mut state)
    }

    fn publish_view(&self, state: &mut DashboardState) -> Vec<UserRecord> {
        let option = self.sorting.current_option();
        let filtered = filter_users(&state.users, &state.search_term);
        let view = self.sorting.sort_users(&filtered, Some(option));
        state.view_sort = Some(option);

        self.view.send_replace(view.clone());
        let _ = self.events.send(DashboardEvent::ViewChanged {
            visible: view.len(),
            total: state.users.len(),
        });
        view
    }

    /// Writes the latest working set. Saves are serialized and each one reads
    /// the state after taking the lock, so the last write is never stale.
    async fn persist_working_set(&self) -> usize {
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.state().users.clone();
        self.working_set.save(&snapshot).await;
        snapshot.len()
    }

    pub fn select_user(&self, user_id: &UserId) -> Option<UserRecord> {
        let mut state = self.state();
        let user = state.users.iter().find(|user| &user.id == user_id).cloned()?;
        state.selected = Some(user.id.clone());
        Some(user)
    }

    pub fn close_user_details(&self) {
        self.state().selected = None;
    }

    pub fn selected_user(&self) -> Option<UserRecord> {
        let state = self.state();
        let selected = state.selected.as_ref()?;
        state.users.iter().find(|user| &user.id == selected).cloned()
    }

    pub fn view(&self) -> Vec<UserRecord> {
        self.view.borrow().clone()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<Vec<UserRecord>> {
        self.view.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.state().users.clone()
    }

    pub fn search_term(&self) -> String {
        self.state().search_term.clone()
    }

    pub fn sort_option(&self) -> SortOption {
        self.sorting.current_option()
    }

    pub fn phase(&self) -> DashboardPhase {
        self.state().phase
    }

    pub fn last_error(&self) -> Option<String> {
        self.state()
            .failure
            .as_ref()
            .map(|failure| failure.message.clone())
    }

    pub fn last_failure(&self) -> Option<DashboardFailure> {
        self.state().failure.clone()
    }

    pub fn page(&self) -> u32 {
        self.state().page
    }

    pub fn users_per_page(&self) -> usize {
        self.batch_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading(&self) -> &LoadingFeedback {
        &self.loading
    }

    pub fn loading_message(&self) -> &'static str {
        if self.state().generating_single {
            GENERATING_PROFILE_MESSAGE
        } else {
            LOADING_PROFILES_MESSAGE
        }
    }

    fn record_failure(&self, kind: FailureKind, err: &FetchError) {
        let failure = DashboardFailure::new(kind);
        {
            let mut state = self.state();
            state.failure = Some(failure.clone());
            state.phase = DashboardPhase::Error;
        }
        error!(kind = ?kind, error = %err, "dashboard fetch failed");
        self.notify(Notification::error(failure.message));
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(DashboardEvent::Notification(notification));
    }

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        let task = self
            .sort_task
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

/// Case-insensitive substring match on full name or country. A blank term
/// keeps every record.
pub fn filter_users(users: &[UserRecord], term: &str) -> Vec<UserRecord> {
    if term.trim().is_empty() {
        return users.to_vec();
    }

    let needle = term.to_lowercase();
    users
        .iter()
        .filter(|user| {
            user.full_name.to_lowercase().contains(&needle)
                || user.country.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
