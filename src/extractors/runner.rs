use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// A single external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// Human-readable exit status
    pub fn status_description(&self) -> String {
        match self.status_code {
            Some(code) => format!("exit status {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Runs external programs and captures their output
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion. `Err` means the process could not be started.
    async fn run(&self, invocation: &CommandInvocation) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &CommandInvocation) -> std::io::Result<CommandOutput> {
        tracing::debug!("Running: {}", invocation);

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().await?;

        Ok(CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let invocation = CommandInvocation::new("yt-dlp")
            .arg("--get-title")
            .args(["--no-playlist", "https://youtu.be/xyz987"])
            .current_dir(Path::new("/tmp"));

        assert_eq!(invocation.args.len(), 3);
        assert!(invocation.has_arg("--get-title"));
        assert!(!invocation.has_arg("--skip-download"));
        assert_eq!(invocation.current_dir.as_deref(), Some(Path::new("/tmp")));
        assert_eq!(
            invocation.to_string(),
            r#"yt-dlp "--get-title" "--no-playlist" "https://youtu.be/xyz987""#
        );
    }

    #[test]
    fn test_output_status() {
        let ok = CommandOutput {
            status_code: Some(0),
            ..Default::default()
        };
        let failed = CommandOutput {
            status_code: Some(2),
            ..Default::default()
        };
        let killed = CommandOutput::default();

        assert!(ok.success());
        assert!(!failed.success());
        assert_eq!(failed.status_description(), "exit status 2");
        assert!(!killed.success());
        assert_eq!(killed.status_description(), "termination by signal");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tokio_runner_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = CommandInvocation::new("sh")
            .args(["-c", "pwd; echo oops >&2; exit 3"])
            .current_dir(dir.path());

        let output = TokioCommandRunner.run(&invocation).await.unwrap();

        assert_eq!(output.status_code, Some(3));
        assert!(output.stdout.trim_end().ends_with(
            dir.path().file_name().unwrap().to_str().unwrap()
        ));
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_tokio_runner_missing_program() {
        let invocation = CommandInvocation::new("definitely-not-an-installed-tool-xyz");
        let err = TokioCommandRunner.run(&invocation).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
