use crate::storage::LocalStorage;
use crate::tracker::HabitTracker;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared server state. The mutex serializes user actions so each one
/// finishes, including its file write, before the next starts.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub tracker: Arc<Mutex<HabitTracker<LocalStorage>>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, tracker: HabitTracker<LocalStorage>) -> Self {
        Self {
            data_path,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}
