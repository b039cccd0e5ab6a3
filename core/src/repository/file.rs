use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::chapter::Chapter;
use crate::repository::traits::ChapterRepository;

const DEFAULT_DIR_NAME: &str = "wordgrid";
const DEFAULT_FILE_NAME: &str = "chapters.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFormat {
    Yaml,
    Json,
}

impl DatasetFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(DatasetFormat::Yaml),
            Some("json") => Ok(DatasetFormat::Json),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Reads the chapter dataset from a local YAML or JSON file.
#[derive(Debug, Clone)]
pub struct FileChapterRepository {
    file_path: PathBuf,
    format: DatasetFormat,
}

impl FileChapterRepository {
    /// Uses `path`, or `<data dir>/wordgrid/chapters.yaml` when none is given.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let file_path = match path {
            Some(p) => p,
            None => default_dataset_path()?,
        };
        let format = DatasetFormat::from_path(&file_path)?;
        Ok(FileChapterRepository { file_path, format })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// The file must hold a list; list entries that do not decode as a
    /// chapter are skipped.
    fn read_chapters(&self) -> Result<Vec<Chapter>> {
        let reader = BufReader::new(File::open(&self.file_path)?);
        let chapters = match self.format {
            DatasetFormat::Yaml => {
                let records: Vec<serde_yaml::Value> = serde_yaml::from_reader(reader)?;
                decode_records(records, serde_yaml::from_value)
            }
            DatasetFormat::Json => {
                let records: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
                decode_records(records, serde_json::from_value)
            }
        };
        Ok(chapters)
    }
}

fn decode_records<V, E, F>(records: Vec<V>, decode: F) -> Vec<Chapter>
where
    E: std::fmt::Display,
    F: Fn(V) -> std::result::Result<Chapter, E>,
{
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match decode(record) {
            Ok(chapter) => Some(chapter),
            Err(err) => {
                debug!(index, %err, "skipping malformed chapter record");
                None
            }
        })
        .collect()
}

pub fn default_dataset_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;
    Ok(data_dir.join(DEFAULT_DIR_NAME).join(DEFAULT_FILE_NAME))
}

impl ChapterRepository for FileChapterRepository {
    fn list(&self) -> Result<Vec<Chapter>> {
        let chapters = self.read_chapters()?;
        debug!(path = %self.file_path.display(), count = chapters.len(), "loaded chapters");
        Ok(chapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const YAML: &str = r#"
- id: "1.00"
  meta:
    show: true
  partOf:
    webNovel:
      ref: 1
      published: "2016-07-27T00:00:00+00:00"
      totalWords: 4890
- id: "interlude"
  meta:
    show: false
  partOf: {}
"#;

    #[test]
    fn test_list_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapters.yml");
        fs::write(&path, YAML).unwrap();

        let repo = FileChapterRepository::new(Some(path)).unwrap();
        let chapters = repo.list().unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].web_novel().unwrap().total_words, Some(4890));
        assert!(chapters[1].web_novel().is_none());
    }

    #[test]
    fn test_list_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapters.JSON");
        fs::write(
            &path,
            r#"[{"id": "a", "meta": {"show": true}, "partOf": {"webNovel": {"ref": 2}}}]"#,
        )
        .unwrap();

        let chapters = FileChapterRepository::new(Some(path)).unwrap().list().unwrap();
        assert_eq!(chapters[0].web_novel().unwrap().reference, Some(2));
    }

    #[test]
    fn test_skips_malformed_yaml_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapters.yaml");
        fs::write(
            &path,
            r#"
- id: "good"
  meta: { show: true }
  partOf:
    webNovel: { ref: 1, published: "2022-01-03T00:00:00+00:00", totalWords: 1200 }
- id: "float-words"
  meta: { show: true }
  partOf:
    webNovel: { ref: 2, published: "2022-01-04T00:00:00+00:00", totalWords: 12.5 }
- id: "string-ref"
  meta: { show: true }
  partOf:
    webNovel: { ref: "three", published: "2022-01-05T00:00:00+00:00", totalWords: 10 }
- id: "no-meta"
  partOf: {}
"#,
        )
        .unwrap();

        let chapters = FileChapterRepository::new(Some(path)).unwrap().list().unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].id, "good");
    }

    #[test]
    fn test_skips_malformed_json_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapters.json");
        fs::write(
            &path,
            r#"[
                {"id": "bad", "meta": {"show": true}, "partOf": {"webNovel": {"totalWords": -5}}},
                {"id": "ok", "meta": {"show": true}, "partOf": {"webNovel": {"ref": 1}}}
            ]"#,
        )
        .unwrap();

        let chapters = FileChapterRepository::new(Some(path)).unwrap().list().unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].id, "ok");
    }

    #[test]
    fn test_non_list_dataset_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chapters.json");
        fs::write(&path, r#"{"id": "lonely"}"#).unwrap();
        let repo = FileChapterRepository::new(Some(path)).unwrap();
        assert!(matches!(repo.list(), Err(Error::Json(_))));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let err = FileChapterRepository::new(Some(PathBuf::from("chapters.csv"))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let repo = FileChapterRepository::new(Some(dir.path().join("absent.yaml"))).unwrap();
        assert!(matches!(repo.list(), Err(Error::Io(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "- id: [unclosed").unwrap();
        let repo = FileChapterRepository::new(Some(path)).unwrap();
        assert!(matches!(repo.list(), Err(Error::Yaml(_))));
    }
}
