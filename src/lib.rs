pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod logging;
pub mod outreach;
pub mod output;
pub mod scoring;
