use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::io::config_io::expand_tilde;
use crate::model::{Config, Task};

/// Error type for backend calls. The message is shown to the user as is.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("could not run {bin}: {source}")]
    Spawn {
        bin: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Failed(String),
    #[error("could not parse task export: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The task tracker the dashboard reads from and writes to.
///
/// Every call is a single synchronous request; failures are returned, never
/// retried.
pub trait TaskBackend {
    fn pending_tasks(&self) -> Result<Vec<Task>, BackendError>;
    fn mark_done(&self, uuid: &str) -> Result<(), BackendError>;
    fn modify(&self, uuid: &str, args: &[String]) -> Result<(), BackendError>;
    fn annotate(&self, uuid: &str, text: &str) -> Result<(), BackendError>;
    fn start(&self, uuid: &str) -> Result<(), BackendError>;
    fn stop(&self, uuid: &str) -> Result<(), BackendError>;
    fn add(&self, args: &[String]) -> Result<(), BackendError>;
    /// Interactive editor command, run with the terminal handed over
    fn edit_command(&self, uuid: &str) -> Command;
}

/// rc overrides that keep the `task` CLI from prompting or chattering
const BATCH_OVERRIDES: [&str; 3] = [
    "rc.confirmation=no",
    "rc.recurrence.confirmation=no",
    "rc.verbose=nothing",
];

/// [`TaskBackend`] backed by the Taskwarrior command line
#[derive(Debug, Clone)]
pub struct Taskwarrior {
    bin: PathBuf,
    taskrc: Option<PathBuf>,
}

impl Taskwarrior {
    pub fn new(bin: impl Into<PathBuf>, taskrc: Option<PathBuf>) -> Self {
        Taskwarrior {
            bin: bin.into(),
            taskrc,
        }
    }

    /// Backend configured by `task_bin` and `taskrc`
    pub fn from_config(config: &Config) -> Self {
        Taskwarrior::new(&config.task_bin, config.taskrc.as_deref().map(expand_tilde))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.bin);
        if let Some(rc) = &self.taskrc {
            cmd.env("TASKRC", rc);
        }
        cmd
    }

    /// Full argument list for a non-interactive invocation
    pub fn batch_args<S: AsRef<str>>(args: &[S]) -> Vec<String> {
        BATCH_OVERRIDES
            .iter()
            .map(|s| s.to_string())
            .chain(args.iter().map(|s| s.as_ref().to_string()))
            .collect()
    }

    fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<u8>, BackendError> {
        let args = Self::batch_args(args);
        log::debug!("$ {} {}", self.bin.display(), args.join(" "));

        let output = self
            .command()
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BackendError::Spawn {
                bin: self.bin.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::debug!("{} failed: {}", self.bin.display(), stderr);
            return Err(BackendError::Failed(if stderr.is_empty() {
                format!("{} exited with {}", self.bin.display(), output.status)
            } else {
                stderr
            }));
        }
        Ok(output.stdout)
    }
}

/// Parse the JSON array written by `task export`
pub fn parse_export(output: &[u8]) -> Result<Vec<Task>, BackendError> {
    if output.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(output)?)
}

impl TaskBackend for Taskwarrior {
    fn pending_tasks(&self) -> Result<Vec<Task>, BackendError> {
        let stdout = self.run(&["status:pending", "export"])?;
        let tasks = parse_export(&stdout)?;
        log::debug!("loaded {} pending tasks", tasks.len());
        Ok(tasks)
    }

    fn mark_done(&self, uuid: &str) -> Result<(), BackendError> {
        self.run(&[uuid, "done"]).map(drop)
    }

    fn modify(&self, uuid: &str, args: &[String]) -> Result<(), BackendError> {
        let mut full = vec![uuid.to_string(), "modify".to_string()];
        full.extend_from_slice(args);
        self.run(full.as_slice()).map(drop)
    }

    fn annotate(&self, uuid: &str, text: &str) -> Result<(), BackendError> {
        self.run(&[uuid, "annotate", text]).map(drop)
    }

    fn start(&self, uuid: &str) -> Result<(), BackendError> {
        self.run(&[uuid, "start"]).map(drop)
    }

    fn stop(&self, uuid: &str) -> Result<(), BackendError> {
        self.run(&[uuid, "stop"]).map(drop)
    }

    fn add(&self, args: &[String]) -> Result<(), BackendError> {
        let mut full = vec!["add".to_string()];
        full.extend_from_slice(args);
        self.run(full.as_slice()).map(drop)
    }

    fn edit_command(&self, uuid: &str) -> Command {
        let mut cmd = self.command();
        cmd.args([uuid, "edit"]);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_export_array() {
        let json = br#"[
            {"id":1,"uuid":"a","description":"one","entry":"20240101T000000Z","status":"pending","urgency":1.5},
            {"id":2,"uuid":"b","description":"two","entry":"20240102T000000Z","project":"home","tags":["x"]}
        ]"#;
        let tasks = parse_export(json).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].project, "home");
        assert_eq!(tasks[1].tags, vec!["x"]);
    }

    #[test]
    fn parse_export_empty_output() {
        assert!(parse_export(b"").unwrap().is_empty());
        assert!(parse_export(b"\n").unwrap().is_empty());
        assert!(parse_export(b"[]").unwrap().is_empty());
    }

    #[test]
    fn parse_export_rejects_garbage() {
        let err = parse_export(b"Cannot proceed without rc file.").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
        assert!(err.to_string().starts_with("could not parse task export"));
    }

    #[test]
    fn batch_args_prepend_overrides() {
        let args = Taskwarrior::batch_args(&["abc", "done"]);
        assert_eq!(
            args,
            vec![
                "rc.confirmation=no",
                "rc.recurrence.confirmation=no",
                "rc.verbose=nothing",
                "abc",
                "done",
            ]
        );
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let tw = Taskwarrior::new("/nonexistent/taskaway-test-task", None);
        let err = tw.pending_tasks().unwrap_err();
        assert!(matches!(err, BackendError::Spawn { .. }));
        assert!(err.to_string().contains("could not run"));
    }

    #[test]
    fn from_config_expands_taskrc() {
        let config = Config {
            task_bin: "/opt/bin/task".into(),
            taskrc: Some("/etc/taskrc".into()),
            ..Config::default()
        };
        let tw = Taskwarrior::from_config(&config);
        assert_eq!(tw.bin, PathBuf::from("/opt/bin/task"));
        assert_eq!(tw.taskrc, Some(PathBuf::from("/etc/taskrc")));
    }

    #[test]
    fn edit_command_sets_taskrc() {
        let tw = Taskwarrior::new("task", Some(PathBuf::from("/tmp/rc")));
        let cmd = tw.edit_command("abc");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["abc", "edit"]);
        let envs: Vec<_> = cmd
            .get_envs()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.map(|v| v.to_string_lossy().into_owned())))
            .collect();
        assert_eq!(envs, vec![("TASKRC".to_string(), Some("/tmp/rc".to_string()))]);
    }
}
