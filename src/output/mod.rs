//! Keyframe configuration writing and statistics reporting module

pub mod report;
pub mod writer;

pub use report::GopStatistics;
pub use writer::ConfigWriter;
