use crate::models::{date_key, GridCell};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

pub const GRID_WEEKS: usize = 53;
pub const GRID_DAYS: usize = 7;
pub const GRID_CELLS: usize = GRID_WEEKS * GRID_DAYS;

pub fn build_grid_at(today: NaiveDate, dates: &BTreeSet<NaiveDate>) -> Vec<GridCell> {
    build_grid(today.year(), dates)
}

/// 53 week rows of 7 days, Sunday first. Days outside `year` are placeholders.
pub fn build_grid(year: i32, dates: &BTreeSet<NaiveDate>) -> Vec<GridCell> {
    let Some(jan_first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return vec![GridCell::placeholder(); GRID_CELLS];
    };
    let start_offset = jan_first.weekday().num_days_from_sunday() as i64;

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for week in 0..GRID_WEEKS {
        for day in 0..GRID_DAYS {
            let day_offset = (week * GRID_DAYS + day) as i64 - start_offset;
            let date = jan_first + Duration::days(day_offset);
            if date.year() == year {
                cells.push(GridCell {
                    date: Some(date_key(date)),
                    active: dates.contains(&date),
                });
            } else {
                cells.push(GridCell::placeholder());
            }
        }
    }
    cells
}
