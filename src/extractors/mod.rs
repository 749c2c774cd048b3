// src/extractors/mod.rs
pub mod tutorial;

pub use tutorial::TutorialExtractor;
