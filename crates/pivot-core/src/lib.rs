//! pivot-core library.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at the command and storage seams;
//!   `anyhow::Result` for configuration loading.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod lock;
pub mod model;
pub mod nav;
pub mod repository;
pub mod session;
pub mod storage;

pub use command::{Command, CommandOutcome, Index};
pub use error::{CommandError, ErrorCode};
pub use nav::{Page, Section};
pub use session::Session;
pub use storage::{JsonStorage, StorageError};
