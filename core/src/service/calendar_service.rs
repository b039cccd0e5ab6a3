use chrono::Datelike;
use tracing::{debug, trace};

use crate::model::calendar::{
    CalendarYears, DateValueMap, Extent, YearGrid, widen, DAYS_PER_WEEK, EMPTY, OUT_OF_RANGE,
    WEEKS_PER_YEAR,
};
use crate::time::{create_utc_date, DateKey};

/// Builds the padded, value-free grid for `year`.
///
/// Slots before January 1 in its week and after December 31 in its week are
/// `OUT_OF_RANGE`, as is every week outside the year's adjusted span.
pub fn initialize_empty_year(year: i32) -> YearGrid {
    let bounds = create_utc_date(year, 1, 1).zip(create_utc_date(year, 12, 31));
    let Some((first_date, last_date)) = bounds else {
        // Outside chrono's supported range: nothing belongs to the year.
        return YearGrid::from_weeks(year, [[OUT_OF_RANGE; DAYS_PER_WEEK]; WEEKS_PER_YEAR]);
    };
    let first = DateKey::from_date(first_date);
    let last = DateKey::from_date(last_date);
    let (first_week, first_day) = (first.week_index(), first.day_index());
    let (last_week, last_day) = (last.week_index(), last.day_index());

    let mut weeks = [[EMPTY; DAYS_PER_WEEK]; WEEKS_PER_YEAR];
    for (week, row) in weeks.iter_mut().enumerate() {
        for (day, cell) in row.iter_mut().enumerate() {
            let before_start = week < first_week || (week == first_week && day < first_day);
            let after_end = week > last_week || (week == last_week && day > last_day);
            if before_start || after_end {
                *cell = OUT_OF_RANGE;
            }
        }
    }

    YearGrid::from_weeks(year, weeks)
}

/// Smallest and largest calendar year among the map's dates.
pub fn extract_year_range(values: &DateValueMap) -> Option<Extent<i32>> {
    values.keys().map(|date| date.year()).fold(None, widen)
}

/// Adds every value of `values` onto its cell in `years`.
///
/// Dates without a grid for their year, landing on an `OUT_OF_RANGE` slot, or
/// whose value would overflow the cell are skipped. Returns the number of
/// values written.
pub fn populate(years: &mut CalendarYears, values: &DateValueMap) -> usize {
    let mut written = 0;
    for (date, value) in values {
        let key = DateKey::from_date(*date);
        let Some(grid) = years.get_mut(key.year) else {
            debug!(%date, "no grid for year, skipping");
            continue;
        };
        if grid.add(key, *value) {
            written += 1;
        } else {
            trace!(%date, week = key.week, weekday = key.weekday, "slot not writable, skipping");
        }
    }
    written
}

/// Lays `values` out on one grid per year from the earliest to the latest
/// year present. An empty map yields no grids.
pub fn convert_to_calendar_years(values: &DateValueMap) -> CalendarYears {
    let Some(range) = extract_year_range(values) else {
        return CalendarYears::default();
    };

    let grids = (range.min..=range.max).map(initialize_empty_year).collect();
    let mut years = CalendarYears::new(grids);
    let written = populate(&mut years, values);
    debug!(
        min_year = range.min,
        max_year = range.max,
        dates = values.len(),
        written,
        "built calendar years"
    );
    years
}
