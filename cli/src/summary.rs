use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use wordgrid_core::{ChapterCalendar, YearGrid};

#[derive(Tabled, Debug, PartialEq)]
pub struct YearRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Days")]
    days: usize,
    #[tabled(rename = "Active")]
    active: usize,
    #[tabled(rename = "Words")]
    words: i64,
    #[tabled(rename = "Busiest Day")]
    busiest: String,
}

impl YearRow {
    fn from_grid(grid: &YearGrid) -> Self {
        let busiest = grid
            .busiest_day()
            .and_then(|(week, day, words)| {
                grid.date_at(week, day)
                    .map(|date| format!("{} ({})", date.format("%Y-%m-%d"), words))
            })
            .unwrap_or_else(|| "-".to_string());

        Self {
            year: grid.year(),
            days: grid.days_in_year(),
            active: grid.active_days(),
            words: grid.total(),
            busiest,
        }
    }
}

pub fn year_rows(calendar: &ChapterCalendar, year: Option<i32>) -> Vec<YearRow> {
    calendar
        .data
        .iter()
        .filter(|grid| year.map_or(true, |y| grid.year() == y))
        .map(YearRow::from_grid)
        .collect()
}

pub fn show_summary(calendar: &ChapterCalendar, year: Option<i32>) {
    let rows = year_rows(calendar, year);
    if rows.is_empty() {
        println!("No chapters with word counts found.");
        return;
    }

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);

    if let (Some(min), Some(max)) = (calendar.min_value, calendar.max_value) {
        println!("Words per day: {} .. {}", min, max);
    }
}
