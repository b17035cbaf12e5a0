use std::path::PathBuf;
use std::process::Command;

use crate::model::{TaskRecord, TouchedSet};

/// Environment variable pointing the backend at its data directory
pub const DATA_ENV: &str = "TASKDATA";

/// Errors from invoking the task backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("could not run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("'{program}' exited with status {}:\n{stderr}", display_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("could not decode exported tasks: {0}")]
    Export(#[from] serde_json::Error),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

impl BackendError {
    /// The backend's own exit code, when it ran and failed
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BackendError::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

/// The outcome of a mutating pass-through command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub touched: TouchedSet,
}

impl CommandOutput {
    /// Backend reports print a `Description` column header; anything else is a
    /// message worth echoing to the user.
    pub fn is_report(&self) -> bool {
        self.stdout.contains("Description")
    }
}

/// Blocking subprocess access to the task backend
#[derive(Debug, Clone)]
pub struct Backend {
    program: String,
    data_dir: PathBuf,
}

impl Backend {
    pub fn new(program: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Backend {
            program: program.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Run the backend with `args`, returning its standard output.
    /// A non-zero exit is an error carrying the captured standard error.
    pub fn run(&self, args: &[String]) -> Result<String, BackendError> {
        tracing::debug!(program = %self.program, ?args, "invoking backend");
        let output = Command::new(&self.program)
            .args(args)
            .env(DATA_ENV, &self.data_dir)
            .output()
            .map_err(|e| BackendError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(BackendError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Forward a user command verbatim and collect the ids it touched.
    pub fn pass_through(&self, args: &[String]) -> Result<CommandOutput, BackendError> {
        let stdout = self.run(args)?;
        let touched = TouchedSet::from_backend_output(&stdout);
        Ok(CommandOutput { stdout, touched })
    }

    /// `<program> <filter...> export`, decoded as a JSON array of tasks.
    pub fn export(&self, filter: &[String]) -> Result<Vec<TaskRecord>, BackendError> {
        let mut args = filter.to_vec();
        args.push("export".to_string());
        let out = self.run(&args)?;
        parse_export(&out)
    }
}

/// Decode the backend's export output. Blank output means no tasks.
pub fn parse_export(out: &str) -> Result<Vec<TaskRecord>, BackendError> {
    if out.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(out)?)
}
