//! Deploy tool management
//!
//! Provides a reusable abstraction for locating a deployment CLI and
//! launching a generated project with it. Each deploy request runs the tool
//! exactly once; there is no retry and no timeout.

use crate::error::DeployError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;

/// Configuration for a deploy tool
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Command names probed in order (e.g., "flyctl", "fly")
    pub candidates: Vec<String>,
    /// Display name for user-facing messages
    pub display_name: String,
    /// URL to the install documentation
    pub docs_url: String,
}

/// Captured result of a successful deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutput {
    pub tool: PathBuf,
    /// Stdout and stderr lines interleaved in the order they arrived
    pub output: String,
}

/// Manager for locating and running a deploy tool
#[derive(Debug, Clone)]
pub struct ToolManager {
    config: ToolConfig,
}

impl ToolManager {
    /// Create a new tool manager with the given configuration
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Get the tool configuration
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// First candidate found on PATH
    pub fn locate(&self) -> Option<PathBuf> {
        self.config
            .candidates
            .iter()
            .find_map(|candidate| which::which(candidate).ok())
    }

    /// Arguments for the initial, non-interactive launch
    pub fn launch_args(project_name: &str) -> Vec<String> {
        vec![
            "launch".to_string(),
            "--name".to_string(),
            project_name.to_string(),
            "--copy-config".to_string(),
            "--yes".to_string(),
        ]
    }

    /// Launch the project in `project_dir` and capture the tool's output
    pub async fn launch(
        &self,
        project_name: &str,
        project_dir: &Path,
    ) -> Result<DeployOutput, DeployError> {
        let tool = self.locate().ok_or_else(|| DeployError::ToolNotFound {
            candidates: self.config.candidates.join(" or "),
            docs_url: self.config.docs_url.clone(),
        })?;

        tracing::info!(
            tool = %tool.display(),
            name = %self.config.display_name,
            project = project_name,
            "launching deployment"
        );

        let spawn_error = |source| DeployError::Spawn {
            tool: tool.display().to_string(),
            source,
        };

        let mut child = TokioCommand::new(&tool)
            .args(Self::launch_args(project_name))
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(spawn_error(std::io::Error::other("output pipes unavailable")));
        };
        let output = interleave_output(stdout, stderr).await;
        let status = child.wait().await.map_err(spawn_error)?;

        if !status.success() {
            tracing::warn!(%status, "deployment failed");
            return Err(DeployError::Failed {
                status: status.to_string(),
                output,
            });
        }

        tracing::info!("deployment finished");
        Ok(DeployOutput { tool, output })
    }
}

/// Read both streams to the end, appending whole lines as they arrive
async fn interleave_output<O, E>(stdout: O, stderr: E) -> String
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut stdout = BufReader::new(stdout);
    let mut stderr = BufReader::new(stderr);
    let (mut stdout_line, mut stderr_line) = (Vec::new(), Vec::new());
    let (mut stdout_open, mut stderr_open) = (true, true);
    let mut combined = Vec::new();

    while stdout_open || stderr_open {
        tokio::select! {
            read = stdout.read_until(b'\n', &mut stdout_line), if stdout_open => {
                stdout_open = matches!(read, Ok(n) if n > 0);
                combined.append(&mut stdout_line);
            }
            read = stderr.read_until(b'\n', &mut stderr_line), if stderr_open => {
                stderr_open = matches!(read, Ok(n) if n > 0);
                combined.append(&mut stderr_line);
            }
        }
    }

    String::from_utf8_lossy(&combined).into_owned()
}

/// Pre-configured tool manager for Fly.io
pub fn fly_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        candidates: vec!["flyctl".to_string(), "fly".to_string()],
        display_name: "Fly.io".to_string(),
        docs_url: "https://fly.io/docs/getting-started/installing-flyctl/".to_string(),
    })
}
