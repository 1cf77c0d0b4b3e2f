//! Terminal front-ends
//!
//! This module is optional and only available when the `tui` feature is enabled.
//! [`run_wizard`] drives the full-screen ratatui wizard; [`run_create`] is the
//! flag-driven path with cliclack output.

mod app;
pub mod keys;
mod prompts;
mod view;

pub use app::{restore_terminal, run_wizard};
pub use prompts::{check_output_dir, resolve_config, run_create, CreateArgs};
