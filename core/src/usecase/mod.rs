pub mod chapters;
