#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod attribution;
pub mod cli;
pub mod config;
pub mod error;
pub mod launch;
pub mod permissions;
pub mod records;
pub mod remote_config;
pub mod store;

pub use config::Config;
pub use error::{CountbookError, Result};
pub use launch::{LaunchCoordinator, LaunchDecision, LaunchSnapshot};
