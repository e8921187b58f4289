//! External classifier invocation.
//!
//! The classifier is a separate program; this module models the call
//! as an explicit command (program, arguments, working directory) run
//! through a [`CommandRunner`] seam so tests can substitute a stub.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};

/// A fully assembled classifier invocation.
#[derive(Debug, Clone)]
pub struct ClassifierCommand {
    /// Program to execute.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
    /// Working directory; inherited when unset.
    pub working_dir: Option<PathBuf>,
}

impl ClassifierCommand {
    /// Build the analysis invocation for an input directory.
    ///
    /// A custom model adds `--classifier` and switches the confidence
    /// floor to the custom-model value.
    pub fn analysis(config: &ClassifierConfig, input_dir: &Path, output_dir: &Path) -> Self {
        let min_confidence = if config.model.is_some() {
            config.custom_model_min_confidence
        } else {
            config.min_confidence
        };

        let mut args = vec![
            "--i".to_string(),
            input_dir.to_string_lossy().to_string(),
            "--o".to_string(),
            output_dir.to_string_lossy().to_string(),
            "--overlap".to_string(),
            config.overlap.to_string(),
            "--rtype".to_string(),
            "csv".to_string(),
            "--sensitivity".to_string(),
            config.sensitivity.to_string(),
            "--min_conf".to_string(),
            min_confidence.to_string(),
        ];

        if let Some(model) = &config.model {
            args.push("--classifier".to_string());
            args.push(model.to_string_lossy().to_string());
        }

        Self {
            program: config.program.clone(),
            args,
            working_dir: None,
        }
    }
}

/// Captured result of a finished classifier process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status_code: Option<i32>,
    /// Whether the process exited successfully.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Executes classifier commands.
///
/// The system implementation blocks until the process exits; tests
/// substitute a stub.
pub trait CommandRunner {
    /// Run a command to completion, capturing its output.
    fn run(&self, command: &ClassifierCommand) -> Result<CommandOutput>;
}

/// Runner backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ClassifierCommand) -> Result<CommandOutput> {
        let mut process = Command::new(&command.program);
        process.args(&command.args);
        if let Some(dir) = &command.working_dir {
            process.current_dir(dir);
        }

        debug!("running {} {}", command.program, command.args.join(" "));

        let output = process.output().map_err(|e| Error::ClassifierLaunch {
            program: command.program.clone(),
            source: e,
        })?;

        Ok(CommandOutput {
            status_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run the classifier over an input directory, writing result CSVs to
/// the output directory.
///
/// Blocks until the process exits; a non-zero exit surfaces the
/// captured stderr in the error.
pub fn run_analysis(
    runner: &dyn CommandRunner,
    config: &ClassifierConfig,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let command = ClassifierCommand::analysis(config, input_dir, output_dir);
    info!("running classifier: {}", command.program);

    let output = runner.run(&command)?;
    if !output.success {
        let status = output
            .status_code
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
        return Err(Error::ClassifierFailed {
            status,
            stderr: output.stderr.trim().to_string(),
        });
    }

    debug!("classifier stdout: {}", output.stdout.trim());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubRunner {
        output: CommandOutput,
        seen: RefCell<Vec<ClassifierCommand>>,
    }

    impl StubRunner {
        fn succeeding() -> Self {
            Self {
                output: CommandOutput {
                    status_code: Some(0),
                    success: true,
                    stdout: String::new(),
                    stderr: String::new(),
                },
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing(stderr: &str) -> Self {
            Self {
                output: CommandOutput {
                    status_code: Some(1),
                    success: false,
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                },
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for StubRunner {
        fn run(&self, command: &ClassifierCommand) -> Result<CommandOutput> {
            self.seen.borrow_mut().push(command.clone());
            Ok(self.output.clone())
        }
    }

    #[test]
    fn test_analysis_command_stock_model() {
        let config = ClassifierConfig::default();
        let command =
            ClassifierCommand::analysis(&config, Path::new("/in"), Path::new("/out"));

        assert_eq!(command.program, "birdnet-analyze");
        let args = command.args.join(" ");
        assert!(args.contains("--i /in"));
        assert!(args.contains("--o /out"));
        assert!(args.contains("--rtype csv"));
        assert!(args.contains("--min_conf 0.01"));
        assert!(!args.contains("--classifier"));
    }

    #[test]
    fn test_analysis_command_custom_model_raises_floor() {
        let config = ClassifierConfig {
            model: Some(PathBuf::from("/models/custom.tflite")),
            ..ClassifierConfig::default()
        };
        let command =
            ClassifierCommand::analysis(&config, Path::new("/in"), Path::new("/out"));

        let args = command.args.join(" ");
        assert!(args.contains("--classifier /models/custom.tflite"));
        assert!(args.contains("--min_conf 0.1"));
        assert!(!args.contains("--min_conf 0.01"));
    }

    #[test]
    fn test_run_analysis_passes_command_to_runner() {
        let dir = tempfile::tempdir().unwrap();
        let runner = StubRunner::succeeding();

        run_analysis(
            &runner,
            &ClassifierConfig::default(),
            Path::new("/in"),
            &dir.path().join("out"),
        )
        .unwrap();

        let seen = runner.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].program, "birdnet-analyze");
    }

    #[test]
    fn test_run_analysis_surfaces_stderr_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = StubRunner::failing("model file not found");

        let result = run_analysis(
            &runner,
            &ClassifierConfig::default(),
            Path::new("/in"),
            &dir.path().join("out"),
        );

        match result {
            Err(Error::ClassifierFailed { status, stderr }) => {
                assert_eq!(status, "exit code 1");
                assert_eq!(stderr, "model file not found");
            }
            other => panic!("expected ClassifierFailed, got {other:?}"),
        }
    }
}
