pub mod batch;
pub mod config;
pub mod error;
pub mod grading;
pub mod output;
pub mod report;
pub mod service;
pub mod store;
