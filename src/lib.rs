pub mod app;
pub mod errors;
pub mod grid;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod stats;
pub mod storage;
pub mod tracker;
pub mod ui;
pub mod state;

pub use app::router;
pub use state::AppState;
pub use storage::{load_storage, persist_storage, resolve_data_path};
pub use tracker::HabitTracker;
