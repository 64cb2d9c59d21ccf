//! Interpreter resolution and process spawning.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// How the script file is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runtime {
    /// Run through an interpreter, preferring a project-local one.
    Interpreter {
        /// Path relative to the script directory, e.g. `venv/bin/python3`.
        local: PathBuf,
        /// Fallback looked up on `PATH`, e.g. `python3`.
        system: String,
    },
    /// Execute the script file itself.
    Direct,
}

/// Everything needed to start one job process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Working directory of the child; relative script and runtime paths
    /// are resolved against it.
    pub script_dir: PathBuf,
    pub script: PathBuf,
    pub runtime: Runtime,
    /// Positional arguments, passed through `Command::arg` without a shell.
    pub args: Vec<String>,
}

/// Errors that prevent a job process from starting.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("child process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// Output of [`LaunchPlan::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub working_dir: PathBuf,
    pub program: OsString,
    pub args: Vec<OsString>,
}

/// A spawned job process that owns both of its output pipes.
///
/// Stdin is never opened. The process is not killed when this handle is
/// dropped: a job outlives a vanished client.
#[derive(Debug)]
pub struct JobProcess {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
    pub pid: Option<u32>,
}

impl LaunchPlan {
    /// The script location before canonicalization.
    pub fn script_path(&self) -> PathBuf {
        self.script_dir.join(&self.script)
    }

    /// The script's file name, for user-facing messages.
    pub fn script_file_name(&self) -> String {
        self.script
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.script.display().to_string())
    }

    /// Resolve the working directory, program and argument vector.
    ///
    /// Fails with [`LaunchError::ScriptNotFound`] when the script is not a
    /// regular file. The local interpreter path is joined, not
    /// canonicalized, so a virtualenv symlink keeps pointing into its venv.
    pub async fn resolve(&self) -> Result<ResolvedCommand, LaunchError> {
        let dir = tokio::fs::canonicalize(&self.script_dir)
            .await
            .map_err(|_| LaunchError::ScriptNotFound(self.script_path()))?;
        let script = dir.join(&self.script);
        if !is_file(&script).await {
            return Err(LaunchError::ScriptNotFound(script));
        }

        let mut args: Vec<OsString> = Vec::with_capacity(self.args.len() + 1);
        let program = match &self.runtime {
            Runtime::Interpreter { local, system } => {
                args.push(script.into_os_string());
                let local = dir.join(local);
                if is_file(&local).await {
                    local.into_os_string()
                } else {
                    OsString::from(system)
                }
            }
            Runtime::Direct => script.into_os_string(),
        };
        args.extend(self.args.iter().map(OsString::from));

        Ok(ResolvedCommand {
            working_dir: dir,
            program,
            args,
        })
    }

    /// Spawn the process with stdin closed and stdout/stderr piped.
    pub async fn launch(&self) -> Result<JobProcess, LaunchError> {
        let ResolvedCommand {
            working_dir,
            program,
            args,
        } = self.resolve().await?;

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

        let stdout = child.stdout.take().ok_or(LaunchError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(LaunchError::MissingPipe("stderr"))?;
        let pid = child.id();

        Ok(JobProcess {
            child,
            stdout,
            stderr,
            pid,
        })
    }
}

/// Whether `path` names a regular file, following symlinks.
async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
