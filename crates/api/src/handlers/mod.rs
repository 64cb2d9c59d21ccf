pub mod categories;
pub mod jobs;
