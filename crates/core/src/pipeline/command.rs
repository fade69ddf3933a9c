//! Pipeline backed by an external program.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use super::error::PipelineError;
use super::traits::{Pipeline, PipelineOutput};
use crate::config::Config;

/// Environment variable telling the program where to write its artifacts.
pub const OUTPUT_DIR_ENV: &str = "LECTERN_OUTPUT_DIR";

/// Runs `program [args...] <document>` and reads a JSON result from stdout.
///
/// A zero exit status with empty stdout counts as `{"success": true}`.
/// A non-zero status becomes [`PipelineError::Failed`] carrying the last
/// non-empty stderr line. The child is killed if the returned future is
/// dropped, which is how invoker timeouts cancel a hung run.
#[derive(Debug, Clone)]
pub struct CommandPipeline {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    output_root: PathBuf,
}

impl CommandPipeline {
    /// Creates a pipeline running `program`, writing into `output_root`.
    pub fn new(program: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            output_root: output_root.into(),
        }
    }

    /// Builds the pipeline from config. Returns `None` when no program is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let program = config.pipeline.program.as_ref()?;
        let mut pipeline = Self::new(program, &config.storage.output_root)
            .with_args(config.pipeline.args.clone());
        if let Some(dir) = &config.pipeline.working_dir {
            pipeline = pipeline.with_working_dir(dir);
        }
        Some(pipeline)
    }

    /// Sets arguments placed before the document path.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Sets the working directory of the child process.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn failure_message(status: std::process::ExitStatus, stderr: &[u8]) -> String {
        String::from_utf8_lossy(stderr)
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Pipeline exited with {}", status))
    }
}

#[async_trait]
impl Pipeline for CommandPipeline {
    fn name(&self) -> &str {
        "command"
    }

    async fn run(&self, document: &Path) -> Result<PipelineOutput, PipelineError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(document)
            .env(OUTPUT_DIR_ENV, &self.output_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!("Running pipeline {:?} on {:?}", self.program, document);

        let output = command.output().await.map_err(|e| PipelineError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            let message = Self::failure_message(output.status, &output.stderr);
            warn!("Pipeline failed ({}): {}", output.status, message);
            return Err(PipelineError::Failed { message });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if stdout.is_empty() {
            return Ok(serde_json::json!({ "success": true }));
        }

        serde_json::from_str(stdout).map_err(|e| PipelineError::InvalidOutput {
            reason: e.to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str, output_root: &Path) -> CommandPipeline {
        CommandPipeline::new("sh", output_root).with_args(vec![
            "-c".to_string(),
            script.to_string(),
            "pipeline".to_string(),
        ])
    }

    #[tokio::test]
    async fn test_parses_json_stdout() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("book.pdf");
        std::fs::write(&doc, b"%PDF").unwrap();

        let pipeline = sh(r#"test -f "$1" && echo '{"chunks": 3}'"#, temp.path());
        let output = pipeline.run(&doc).await.unwrap();
        assert_eq!(output["chunks"], 3);
    }

    #[tokio::test]
    async fn test_empty_stdout_is_success() {
        let temp = TempDir::new().unwrap();
        let pipeline = sh("true", temp.path());
        let output = pipeline.run(Path::new("book.pdf")).await.unwrap();
        assert_eq!(output["success"], true);
    }

    #[tokio::test]
    async fn test_writes_into_output_dir_env() {
        let temp = TempDir::new().unwrap();
        let pipeline = sh(
            r#"mkdir -p "$LECTERN_OUTPUT_DIR/audio" && printf abc > "$LECTERN_OUTPUT_DIR/audio/part_001.mp3""#,
            temp.path(),
        );
        pipeline.run(Path::new("book.pdf")).await.unwrap();
        assert_eq!(
            std::fs::read(temp.path().join("audio/part_001.mp3")).unwrap(),
            b"abc"
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_last_stderr_line() {
        let temp = TempDir::new().unwrap();
        let pipeline = sh("echo starting >&2; echo 'voice not found' >&2; exit 3", temp.path());
        let err = pipeline.run(Path::new("book.pdf")).await.unwrap_err();
        match err {
            PipelineError::Failed { message } => assert_eq!(message, "voice not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_without_stderr() {
        let temp = TempDir::new().unwrap();
        let pipeline = sh("exit 2", temp.path());
        let err = pipeline.run(Path::new("book.pdf")).await.unwrap_err();
        assert!(err.to_string().starts_with("Pipeline exited with"));
    }

    #[tokio::test]
    async fn test_invalid_json_stdout() {
        let temp = TempDir::new().unwrap();
        let pipeline = sh("echo not-json", temp.path());
        let err = pipeline.run(Path::new("book.pdf")).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidOutput { .. }));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let temp = TempDir::new().unwrap();
        let pipeline = CommandPipeline::new("/nonexistent/lectern-pipeline", temp.path());
        let err = pipeline.run(Path::new("book.pdf")).await.unwrap_err();
        assert!(matches!(err, PipelineError::Spawn { .. }));
    }

    #[test]
    fn test_from_config_requires_program() {
        let mut config = Config::default();
        assert!(CommandPipeline::from_config(&config).is_none());

        config.pipeline.program = Some(PathBuf::from("narrate"));
        config.pipeline.args = vec!["--fast".to_string()];
        let pipeline = CommandPipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.args, vec!["--fast"]);
        assert_eq!(pipeline.output_root, PathBuf::from("output"));
    }
}
