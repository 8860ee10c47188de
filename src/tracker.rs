use crate::grid::build_grid_at;
use crate::migration::migrate_collection;
use crate::models::{
    date_key, HabitCollection, HabitListEntry, HabitRecord, HabitStats, TrackerView,
};
use crate::stats::build_stats_at;
use crate::storage::{HabitStore, KeyValueStore};
use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

#[derive(Debug)]
pub struct HabitTracker<S> {
    store: HabitStore<S>,
    habits: HabitCollection,
    selection: Option<String>,
    pending_delete: Option<String>,
}

impl<S: KeyValueStore> HabitTracker<S> {
    pub fn open(backend: S) -> Self {
        let mut store = HabitStore::new(backend);
        let stored = store.load();
        let (habits, _) = migrate_collection(stored.habits);
        store.save(&habits);

        let selection = match stored.selection {
            Some(name) if habits.contains(&name) => Some(name),
            Some(name) => {
                warn!("stored selection {name:?} is not a known habit, clearing");
                store.set_selection(None);
                None
            }
            None => None,
        };

        info!(habits = habits.len(), "loaded habits");
        Self {
            store,
            habits,
            selection,
            pending_delete: None,
        }
    }

    pub fn habits(&self) -> &HabitCollection {
        &self.habits
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn store(&self) -> &HabitStore<S> {
        &self.store
    }

    fn current_record(&self) -> Option<&HabitRecord> {
        self.selection
            .as_deref()
            .and_then(|name| self.habits.get(name))
    }

    pub fn add_habit(&mut self, name: &str) -> bool {
        self.pending_delete = None;
        let name = name.trim();
        if name.is_empty() || self.habits.contains(name) {
            return false;
        }

        self.habits.insert(name, HabitRecord::default());
        self.store.save(&self.habits);
        info!(habit = name, "added habit");
        self.select_habit(name);
        true
    }

    pub fn select_habit(&mut self, name: &str) -> bool {
        self.pending_delete = None;
        if !self.habits.contains(name) {
            return false;
        }

        self.selection = Some(name.to_string());
        self.store.set_selection(Some(name));
        true
    }

    pub fn delete_habit(&mut self, name: &str) -> bool {
        self.pending_delete = None;
        if self.habits.remove(name).is_none() {
            return false;
        }
        self.store.save(&self.habits);

        if self.selection.as_deref() == Some(name) {
            self.selection = None;
            self.store.set_selection(None);
        }
        info!(habit = name, "deleted habit");
        true
    }

    /// Nothing is removed until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, name: &str) -> bool {
        if !self.habits.contains(name) {
            self.pending_delete = None;
            return false;
        }
        self.pending_delete = Some(name.to_string());
        true
    }

    pub fn confirm_delete(&mut self) -> bool {
        match self.pending_delete.take() {
            Some(name) => self.delete_habit(&name),
            None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// `None` when no habit is selected.
    pub fn toggle_date(&mut self, date: NaiveDate) -> Option<bool> {
        self.pending_delete = None;
        let name = self.selection.as_deref()?;
        let record = self.habits.get_mut(name)?;

        let active = if record.dates.remove(&date) {
            false
        } else {
            record.dates.insert(date);
            true
        };
        self.store.save(&self.habits);
        Some(active)
    }

    pub fn toggle_today(&mut self, today: NaiveDate) -> Option<bool> {
        self.toggle_date(today)
    }

    pub fn stats_at(&self, today: NaiveDate) -> HabitStats {
        build_stats_at(today, self.current_record())
    }

    pub fn view_at(&self, today: NaiveDate) -> TrackerView {
        let habits = self
            .habits
            .names()
            .map(|name| HabitListEntry {
                name: name.to_string(),
                selected: self.selection.as_deref() == Some(name),
            })
            .collect();

        let grid = self
            .current_record()
            .map(|record| build_grid_at(today, &record.dates))
            .unwrap_or_default();

        TrackerView {
            habits,
            current_habit: self.selection.clone(),
            pending_delete: self.pending_delete.clone(),
            today: date_key(today),
            year: today.year(),
            stats: self.stats_at(today),
            grid,
        }
    }
}
