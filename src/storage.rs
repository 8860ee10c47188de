use crate::errors::AppError;
use crate::migration::RawHabits;
use crate::models::HabitCollection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub const HABITS_KEY: &str = "habits";
pub const SELECTION_KEY: &str = "currentHabit";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory key-value store, flushed to disk as one JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalStorage {
    items: BTreeMap<String, String>,
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoredState {
    pub habits: RawHabits,
    pub selection: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HabitStore<S> {
    backend: S,
}

impl<S: KeyValueStore> HabitStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn load(&self) -> StoredState {
        let habits = match self.backend.get(HABITS_KEY) {
            Some(json) => match serde_json::from_str::<RawHabits>(&json) {
                Ok(habits) => habits,
                Err(err) => {
                    error!("failed to parse stored habits: {err}");
                    RawHabits::default()
                }
            },
            None => RawHabits::default(),
        };

        StoredState {
            habits,
            selection: self.backend.get(SELECTION_KEY),
        }
    }

    pub fn save(&mut self, habits: &HabitCollection) {
        match serde_json::to_string(habits) {
            Ok(json) => self.backend.set(HABITS_KEY, json),
            Err(err) => error!("failed to serialize habits: {err}"),
        }
    }

    pub fn set_selection(&mut self, name: Option<&str>) {
        match name {
            Some(name) => self.backend.set(SELECTION_KEY, name.to_string()),
            None => self.backend.remove(SELECTION_KEY),
        }
    }
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/habits.json"))
}

pub async fn load_storage(path: &Path) -> LocalStorage {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(storage) => storage,
            Err(err) => {
                error!("failed to parse data file: {err}");
                LocalStorage::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalStorage::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            LocalStorage::default()
        }
    }
}

pub async fn persist_storage(path: &Path, storage: &LocalStorage) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(storage).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
