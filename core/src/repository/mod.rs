pub mod file;
pub mod traits;

// Re-export
pub use file::FileChapterRepository;
pub use traits::ChapterRepository;
