use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT).ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    #[serde(with = "date_set")]
    pub dates: BTreeSet<NaiveDate>,
}

mod date_set {
    use super::{date_key, parse_date_key};
    use chrono::NaiveDate;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::collections::BTreeSet;
    use std::fmt;
    use tracing::warn;

    pub fn serialize<S: Serializer>(
        dates: &BTreeSet<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(dates.len()))?;
        for date in dates {
            map.serialize_entry(&date_key(*date), &true)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<NaiveDate>, D::Error> {
        deserializer.deserialize_map(DateSetVisitor)
    }

    struct DateSetVisitor;

    impl<'de> Visitor<'de> for DateSetVisitor {
        type Value = BTreeSet<NaiveDate>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of YYYY-MM-DD keys to true")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut dates = BTreeSet::new();
            while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                if value != serde_json::Value::Bool(true) {
                    continue;
                }
                match parse_date_key(&key) {
                    Some(date) => {
                        dates.insert(date);
                    }
                    None => warn!("dropping invalid date key {key:?}"),
                }
            }
            Ok(dates)
        }
    }
}

/// Habits keyed by name, kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitCollection {
    entries: Vec<(String, HabitRecord)>,
}

impl HabitCollection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&HabitRecord> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut HabitRecord> {
        self.position(name).map(|index| &mut self.entries[index].1)
    }

    pub fn insert(&mut self, name: impl Into<String>, record: HabitRecord) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, record));
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<HabitRecord> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == name)
    }
}

impl FromIterator<(String, HabitRecord)> for HabitCollection {
    fn from_iter<I: IntoIterator<Item = (String, HabitRecord)>>(iter: I) -> Self {
        let mut collection = Self::default();
        for (name, record) in iter {
            collection.insert(name, record);
        }
        collection
    }
}

impl Serialize for HabitCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, record) in &self.entries {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}

#[derive(Debug, Deserialize)]
pub struct HabitNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HabitStats {
    pub total_days: usize,
    pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub date: Option<String>,
    pub active: bool,
}

impl GridCell {
    pub fn placeholder() -> Self {
        Self {
            date: None,
            active: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitListEntry {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerView {
    pub habits: Vec<HabitListEntry>,
    pub current_habit: Option<String>,
    pub pending_delete: Option<String>,
    pub today: String,
    pub year: i32,
    pub stats: HabitStats,
    pub grid: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub date: String,
    pub active: Option<bool>,
    pub stats: HabitStats,
}
