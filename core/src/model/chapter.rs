use serde::{Deserialize, Serialize};

/// One chapter record as it appears in the chapter dataset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub meta: ChapterMeta,
    #[serde(default)]
    pub part_of: PartOf,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChapterMeta {
    /// Listed in the table of contents.
    #[serde(default)]
    pub show: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartOf {
    #[serde(default)]
    pub web_novel: Option<WebNovelRelease>,
}

/// Placement of a chapter in the web novel release.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WebNovelRelease {
    /// Volume reference. Placeholder chapters carry zero, negative or no ref.
    #[serde(rename = "ref", default)]
    pub reference: Option<i64>,
    /// Original publication timestamp, e.g. `2022-01-01T00:00:00+00:00`.
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub total_words: Option<u64>,
}

impl Chapter {
    pub fn new(id: impl Into<String>, show: bool, web_novel: Option<WebNovelRelease>) -> Self {
        Self {
            id: id.into(),
            meta: ChapterMeta { show },
            part_of: PartOf { web_novel },
        }
    }

    pub fn web_novel(&self) -> Option<&WebNovelRelease> {
        self.part_of.web_novel.as_ref()
    }
}

impl WebNovelRelease {
    pub fn new(reference: i64, published: &str, total_words: u64) -> Self {
        Self {
            reference: Some(reference),
            published: Some(published.to_string()),
            total_words: Some(total_words),
        }
    }
}
