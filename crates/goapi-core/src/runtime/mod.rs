//! External tool management
//!
//! This module provides the deployment invoker: locating a deploy tool
//! from a list of candidate command names and running it against a
//! generated project.

pub mod tool;

pub use tool::{fly_tool, DeployOutput, ToolConfig, ToolManager};
