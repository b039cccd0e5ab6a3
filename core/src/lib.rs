pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use error::{Error, Result};
pub use model::calendar::{
    CalendarYears, DateValueMap, DayCell, Extent, WeekRow, YearGrid, DAYS_PER_WEEK, EMPTY,
    OUT_OF_RANGE, WEEKS_PER_YEAR,
};
pub use model::chapter::{Chapter, ChapterMeta, PartOf, WebNovelRelease};
pub use repository::{ChapterRepository, FileChapterRepository};
pub use service::calendar_service::{
    convert_to_calendar_years, extract_year_range, initialize_empty_year, populate,
};
pub use time::{
    adjusted_iso_week, create_utc_date, is_valid_timestamp, iso_weekday, iso_weeks_in_year,
    parse_timestamp, to_canonical_date, DateKey,
};
pub use usecase::chapters::{
    classify_chapter, convert_chapters_to_calendar_years, convert_chapters_to_mapping,
    should_include_chapter, AcceptedChapter, ChapterCalendar, ChapterMapping, Exclusion,
};
