use crate::models::{HabitCollection, HabitRecord};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHabits(pub Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawHabits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawVisitor;

        impl<'de> Visitor<'de> for RawVisitor {
            type Value = RawHabits;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of habit names to records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawHabits, A::Error> {
                let mut entries: Vec<(String, Value)> = Vec::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    match entries.iter_mut().find(|(existing, _)| *existing == name) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((name, value)),
                    }
                }
                Ok(RawHabits(entries))
            }
        }

        deserializer.deserialize_map(RawVisitor)
    }
}

// Records without `dates` are the legacy flat date map.
pub fn migrate_record(value: Value) -> (Value, bool) {
    match value {
        Value::Object(map) if map.contains_key("dates") => (Value::Object(map), false),
        legacy => {
            let mut wrapped = Map::new();
            wrapped.insert("dates".to_string(), legacy);
            (Value::Object(wrapped), true)
        }
    }
}

pub fn migrate_raw(raw: RawHabits) -> (RawHabits, usize) {
    let mut migrated = 0;
    let entries = raw
        .0
        .into_iter()
        .map(|(name, value)| {
            let (value, changed) = migrate_record(value);
            if changed {
                migrated += 1;
            }
            (name, value)
        })
        .collect();
    (RawHabits(entries), migrated)
}

pub fn migrate_collection(raw: RawHabits) -> (HabitCollection, usize) {
    let (raw, migrated) = migrate_raw(raw);
    if migrated > 0 {
        info!(migrated, "upgraded legacy habit records");
    }

    let habits = raw
        .0
        .into_iter()
        .map(|(name, value)| {
            let record = serde_json::from_value::<HabitRecord>(value).unwrap_or_else(|err| {
                warn!("habit {name:?} has unreadable dates, starting empty: {err}");
                HabitRecord::default()
            });
            (name, record)
        })
        .collect();

    (habits, migrated)
}
