pub mod batch;
pub mod cli;
pub mod format;
pub mod logging;
pub mod profile;
pub mod report;
pub mod utils;
