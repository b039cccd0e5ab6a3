use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::ser::{Serialize, Serializer};

use crate::time::DateKey;

/// Day inside the calendar year without any recorded value.
pub const EMPTY: i64 = 0;
/// Grid slot that is not part of the calendar year.
pub const OUT_OF_RANGE: i64 = -1;

pub const DAYS_PER_WEEK: usize = 7;
/// Week 0 takes January days of the previous ISO year, week 53 takes
/// December days of the next one.
pub const WEEKS_PER_YEAR: usize = 54;

/// Aggregated value per canonical UTC date.
pub type DateValueMap = BTreeMap<NaiveDate, i64>;

/// Values for Monday (index 0) through Sunday (index 6).
pub type WeekRow = [i64; DAYS_PER_WEEK];

/// Sentinel-aware view of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    OutOfRange,
    Empty,
    Value(i64),
}

impl DayCell {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            OUT_OF_RANGE => DayCell::OutOfRange,
            EMPTY => DayCell::Empty,
            value => DayCell::Value(value),
        }
    }

    pub fn is_in_year(&self) -> bool {
        !matches!(self, DayCell::OutOfRange)
    }
}

/// Running minimum and maximum of a non-empty set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Extent<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + Ord> Extent<T> {
    pub fn of(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn include(self, value: T) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }
}

/// Folds `value` into an optional extent, starting one if there is none yet.
pub fn widen<T: Copy + Ord>(extent: Option<Extent<T>>, value: T) -> Option<Extent<T>> {
    Some(match extent {
        Some(e) => e.include(value),
        None => Extent::of(value),
    })
}

/// A 54 x 7 grid of day values for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGrid {
    year: i32,
    weeks: [WeekRow; WEEKS_PER_YEAR],
}

impl YearGrid {
    pub(crate) fn from_weeks(year: i32, weeks: [WeekRow; WEEKS_PER_YEAR]) -> Self {
        Self { year, weeks }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn weeks(&self) -> &[WeekRow; WEEKS_PER_YEAR] {
        &self.weeks
    }

    pub fn get(&self, week: usize, day: usize) -> Option<i64> {
        self.weeks.get(week)?.get(day).copied()
    }

    pub fn cell(&self, week: usize, day: usize) -> Option<DayCell> {
        self.get(week, day).map(DayCell::from_raw)
    }

    /// Adds `value` to the cell at `key`.
    ///
    /// Returns `false` and leaves the grid untouched when the key belongs to
    /// another year, lies outside the grid, points at an `OUT_OF_RANGE` slot,
    /// or would overflow the cell.
    pub(crate) fn add(&mut self, key: DateKey, value: i64) -> bool {
        if key.year != self.year {
            return false;
        }
        let Some(cell) = self
            .weeks
            .get_mut(key.week_index())
            .and_then(|row| row.get_mut(key.day_index()))
        else {
            return false;
        };
        if *cell == OUT_OF_RANGE {
            return false;
        }
        match cell.checked_add(value) {
            Some(sum) => {
                *cell = sum;
                true
            }
            None => false,
        }
    }

    /// Iterates `(week, day, cell)` over every slot, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, DayCell)> + '_ {
        self.weeks.iter().enumerate().flat_map(|(week, row)| {
            row.iter()
                .enumerate()
                .map(move |(day, raw)| (week, day, DayCell::from_raw(*raw)))
        })
    }

    /// Number of slots that belong to the calendar year (365 or 366).
    pub fn days_in_year(&self) -> usize {
        self.cells().filter(|(_, _, c)| c.is_in_year()).count()
    }

    /// Sum of all values, saturating at `i64::MAX`.
    pub fn total(&self) -> i64 {
        self.cells()
            .map(|(_, _, c)| match c {
                DayCell::Value(v) => v,
                _ => 0,
            })
            .fold(0i64, i64::saturating_add)
    }

    pub fn active_days(&self) -> usize {
        self.cells()
            .filter(|(_, _, c)| matches!(c, DayCell::Value(_)))
            .count()
    }

    /// Highest value cell; ties go to the earliest slot.
    pub fn busiest_day(&self) -> Option<(usize, usize, i64)> {
        self.cells()
            .filter_map(|(week, day, c)| match c {
                DayCell::Value(v) => Some((week, day, v)),
                _ => None,
            })
            .fold(None, |best: Option<(usize, usize, i64)>, cur| match best {
                Some(b) if b.2 >= cur.2 => Some(b),
                _ => Some(cur),
            })
    }

    /// Calendar date shown in a slot, `None` for `OUT_OF_RANGE` slots.
    pub fn date_at(&self, week: usize, day: usize) -> Option<NaiveDate> {
        if !self.cell(week, day)?.is_in_year() {
            return None;
        }
        let jan_first = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let origin = DateKey::from_date(jan_first);
        let slot = (week * DAYS_PER_WEEK + day) as i64;
        let origin_slot = (origin.week_index() * DAYS_PER_WEEK + origin.day_index()) as i64;
        jan_first.checked_add_signed(Duration::days(slot - origin_slot))
    }
}

/// Serializes as the bare 54 x 7 nested array.
impl Serialize for YearGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.weeks.iter())
    }
}

/// Year grids for a contiguous range of years, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(transparent)]
pub struct CalendarYears {
    grids: Vec<YearGrid>,
}

impl CalendarYears {
    pub(crate) fn new(grids: Vec<YearGrid>) -> Self {
        Self { grids }
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.grids.first().map(YearGrid::year)
    }

    pub fn get(&self, year: i32) -> Option<&YearGrid> {
        let first = self.first_year()?;
        let index = usize::try_from(year.checked_sub(first)?).ok()?;
        self.grids.get(index)
    }

    pub(crate) fn get_mut(&mut self, year: i32) -> Option<&mut YearGrid> {
        let first = self.first_year()?;
        let index = usize::try_from(year.checked_sub(first)?).ok()?;
        self.grids.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearGrid> {
        self.grids.iter()
    }

}

impl<'a> IntoIterator for &'a CalendarYears {
    type Item = &'a YearGrid;
    type IntoIter = std::slice::Iter<'a, YearGrid>;

    fn into_iter(self) -> Self::IntoIter {
        self.grids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(year: i32) -> YearGrid {
        YearGrid::from_weeks(year, [[EMPTY; DAYS_PER_WEEK]; WEEKS_PER_YEAR])
    }

    fn key(year: i32, week: u32, weekday: u32) -> DateKey {
        DateKey { year, week, weekday }
    }

    #[test]
    fn test_day_cell_from_raw() {
        assert_eq!(DayCell::from_raw(-1), DayCell::OutOfRange);
        assert_eq!(DayCell::from_raw(0), DayCell::Empty);
        assert_eq!(DayCell::from_raw(42), DayCell::Value(42));
    }

    #[test]
    fn test_add_skips_sentinel_and_other_years() {
        let mut weeks = [[EMPTY; DAYS_PER_WEEK]; WEEKS_PER_YEAR];
        weeks[0][0] = OUT_OF_RANGE;
        let mut grid = YearGrid::from_weeks(2022, weeks);

        assert!(!grid.add(key(2022, 0, 1), 10));
        assert_eq!(grid.get(0, 0), Some(OUT_OF_RANGE));

        assert!(!grid.add(key(2021, 3, 2), 10));
        assert_eq!(grid.get(3, 1), Some(EMPTY));

        assert!(grid.add(key(2022, 3, 2), 10));
        assert!(grid.add(key(2022, 3, 2), 5));
        assert_eq!(grid.cell(3, 1), Some(DayCell::Value(15)));
    }

    #[test]
    fn test_add_refuses_overflowing_sum() {
        let mut grid = blank(2022);
        assert!(grid.add(key(2022, 1, 1), i64::MAX));
        assert!(!grid.add(key(2022, 1, 1), 1));
        assert_eq!(grid.get(1, 0), Some(i64::MAX));

        assert!(grid.add(key(2022, 2, 1), 5));
        assert_eq!(grid.total(), i64::MAX);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = blank(2020);
        assert_eq!(grid.get(54, 0), None);
        assert_eq!(grid.get(0, 7), None);
    }

    #[test]
    fn test_busiest_day_prefers_earliest_tie() {
        let mut grid = blank(2020);
        grid.add(key(2020, 5, 3), 300);
        grid.add(key(2020, 2, 1), 300);
        grid.add(key(2020, 9, 7), 100);
        assert_eq!(grid.busiest_day(), Some((2, 0, 300)));
        assert_eq!(grid.total(), 700);
        assert_eq!(grid.active_days(), 3);
    }

    #[test]
    fn test_extent_widen() {
        let extent = [5, 2, 9].into_iter().fold(None, widen);
        assert_eq!(extent, Some(Extent { min: 2, max: 9 }));
        assert_eq!(None::<i32>.into_iter().fold(None, widen::<i32>), None);
    }

    #[test]
    fn test_calendar_years_lookup() {
        let years = CalendarYears::new(vec![blank(2019), blank(2020), blank(2021)]);
        assert_eq!(years.len(), 3);
        assert_eq!(years.get(2020).map(YearGrid::year), Some(2020));
        assert!(years.get(2018).is_none());
        assert!(years.get(2022).is_none());
        assert!(CalendarYears::default().get(2020).is_none());
    }

    #[test]
    fn test_year_grid_serializes_as_nested_array() {
        let json = serde_json::to_value(blank(2020)).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), WEEKS_PER_YEAR);
        assert!(rows.iter().all(|r| r.as_array().unwrap().len() == DAYS_PER_WEEK));
    }
}
