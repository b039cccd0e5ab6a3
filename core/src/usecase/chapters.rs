use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::model::calendar::{widen, CalendarYears, DateValueMap, Extent};
use crate::model::chapter::Chapter;
use crate::service::calendar_service::convert_to_calendar_years;
use crate::time::to_canonical_date;

/// Why a chapter was left out of the word counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Hidden,
    NotInWebNovel,
    InvalidRef,
    InvalidPublished,
    MissingWords,
    /// Word count does not fit the grid's value type.
    WordsOverflow,
}

/// A chapter that passed filtering, reduced to its UTC publication date
/// and word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedChapter {
    pub date: NaiveDate,
    pub words: i64,
}

pub fn classify_chapter(chapter: &Chapter) -> Result<AcceptedChapter, Exclusion> {
    if !chapter.meta.show {
        return Err(Exclusion::Hidden);
    }
    let release = chapter.web_novel().ok_or(Exclusion::NotInWebNovel)?;

    if !release.reference.is_some_and(|r| r > 0) {
        return Err(Exclusion::InvalidRef);
    }

    let date = release
        .published
        .as_deref()
        .and_then(|raw| to_canonical_date(raw).ok())
        .ok_or(Exclusion::InvalidPublished)?;

    let words = release.total_words.ok_or(Exclusion::MissingWords)?;
    let words = i64::try_from(words).map_err(|_| Exclusion::WordsOverflow)?;

    Ok(AcceptedChapter { date, words })
}

/// Visible, has a positive volume ref, a strict publication timestamp and a
/// word count.
pub fn should_include_chapter(chapter: &Chapter) -> bool {
    classify_chapter(chapter).is_ok()
}

/// Words per UTC day plus the ranges seen while folding them in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChapterMapping {
    pub mapping: DateValueMap,
    pub years: Option<Extent<i32>>,
    /// Range of the per-date running totals at the moment each was updated.
    pub values: Option<Extent<i64>>,
}

impl ChapterMapping {
    /// A contribution that would overflow its date's total is dropped.
    fn fold_in(mut self, accepted: AcceptedChapter) -> Self {
        let total = self.mapping.entry(accepted.date).or_insert(0);
        let Some(sum) = total.checked_add(accepted.words) else {
            debug!(date = %accepted.date, words = accepted.words, "daily total overflows, dropping");
            return self;
        };
        *total = sum;

        Self {
            years: widen(self.years, accepted.date.year()),
            values: widen(self.values, sum),
            mapping: self.mapping,
        }
    }

    /// `(min, max)` year, or `(+inf, -inf)` when nothing was accepted.
    pub fn year_bounds(&self) -> (f64, f64) {
        float_bounds(self.years.map(|e| (f64::from(e.min), f64::from(e.max))))
    }

    /// `(min, max)` value, or `(+inf, -inf)` when nothing was accepted.
    pub fn value_bounds(&self) -> (f64, f64) {
        float_bounds(self.values.map(|e| (e.min as f64, e.max as f64)))
    }
}

fn float_bounds(bounds: Option<(f64, f64)>) -> (f64, f64) {
    bounds.unwrap_or((f64::INFINITY, f64::NEG_INFINITY))
}

pub fn convert_chapters_to_mapping(chapters: &[Chapter]) -> ChapterMapping {
    let mapping = chapters
        .iter()
        .filter_map(|chapter| match classify_chapter(chapter) {
            Ok(accepted) => Some(accepted),
            Err(reason) => {
                debug!(id = %chapter.id, ?reason, "excluding chapter");
                None
            }
        })
        .fold(ChapterMapping::default(), ChapterMapping::fold_in);

    info!(
        chapters = chapters.len(),
        dates = mapping.mapping.len(),
        "aggregated words per day"
    );
    mapping
}

/// Finished grids and the ranges a renderer scales them by.
///
/// Serializes as `{"data", "minYear", "maxYear", "minValue", "maxValue"}`;
/// the ranges are `null` for an empty dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterCalendar {
    pub data: CalendarYears,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

impl ChapterCalendar {
    pub fn year_bounds(&self) -> (f64, f64) {
        float_bounds(
            self.min_year
                .zip(self.max_year)
                .map(|(min, max)| (f64::from(min), f64::from(max))),
        )
    }

    pub fn value_bounds(&self) -> (f64, f64) {
        float_bounds(
            self.min_value
                .zip(self.max_value)
                .map(|(min, max)| (min as f64, max as f64)),
        )
    }
}

pub fn convert_chapters_to_calendar_years(chapters: &[Chapter]) -> ChapterCalendar {
    let ChapterMapping {
        mapping,
        years,
        values,
    } = convert_chapters_to_mapping(chapters);

    ChapterCalendar {
        data: convert_to_calendar_years(&mapping),
        min_year: years.map(|e| e.min),
        max_year: years.map(|e| e.max),
        min_value: values.map(|e| e.min),
        max_value: values.map(|e| e.max),
    }
}
