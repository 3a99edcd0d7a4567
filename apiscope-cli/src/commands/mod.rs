pub mod common;
pub mod diff;
pub mod extract;
pub mod report;
pub mod stats;
