#![forbid(unsafe_code)]

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use app::{Engines, Pipeline, RunOutput, TranscribeRequest};
pub use domain::{AppConfig, FailureKind, RunError};
