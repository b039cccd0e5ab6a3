use crate::error::Result;
use crate::model::chapter::Chapter;

pub trait ChapterRepository {
    fn list(&self) -> Result<Vec<Chapter>>;
}
