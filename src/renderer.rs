//! External Renderer
//!
//! The opaque subprocess responsible for actual format conversion: a source
//! path in, an output path out, options passed through unvalidated. The
//! orchestrator depends only on the exit-status contract.

use crate::error::RunError;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// One render invocation. All paths are absolute; `resource_dir` is the
/// source file's containing directory so relative references inside the
/// document resolve.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub source: PathBuf,
    pub resource_dir: PathBuf,
    pub options: Vec<String>,
    pub output: PathBuf,
}

/// Seam between the orchestrator and the conversion step. Tests substitute
/// an in-memory fake; production uses [`CommandRenderer`].
pub trait Renderer {
    fn render(&self, job: &RenderJob) -> Result<(), RunError>;
}

/// Pandoc-style subprocess adapter:
/// `<program> <source> --resource-path=<dir> <options...> -o <output>`.
///
/// Exit status zero means "artifact written"; nonzero means "no usable
/// artifact", with no partial-output guarantee from the renderer's side.
/// The call blocks with no internal timeout.
pub struct CommandRenderer {
    program: String,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Dependency presence check: can the renderer be spawned at all?
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, job: &RenderJob) -> Result<(), RunError> {
        tracing::debug!(
            program = %self.program,
            source = ?job.source,
            output = ?job.output,
            "invoking renderer"
        );

        let status = Command::new(&self.program)
            .arg(&job.source)
            .arg(format!("--resource-path={}", job.resource_dir.display()))
            .args(&job.options)
            .arg("-o")
            .arg(&job.output)
            .status()
            .map_err(|e| {
                // Spawn failure (program vanished mid-run) reads the same as
                // a nonzero exit to the caller's per-file error handling.
                RunError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to spawn renderer '{}': {}", self.program, e),
                ))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::RendererFailed {
                path: job.source.clone(),
                status: status.code().unwrap_or(-1),
            })
        }
    }
}
