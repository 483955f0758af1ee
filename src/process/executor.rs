use std::process::{Command, Stdio};

use tracing::debug;

use super::{signal, ProcessError};
use crate::flags::Flags;
use crate::jobs::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Block until the child terminates.
    Foreground,
    /// Detach; the caller records the returned task and keeps going.
    Background,
}

#[derive(Clone)]
pub struct ProcessExecutor {
    quiet_mode: bool,
}

impl ProcessExecutor {
    pub fn new(flags: &Flags) -> Self {
        ProcessExecutor {
            quiet_mode: flags.is_set("quiet"),
        }
    }

    /// Spawns `argv` as a child process, inheriting stdio and environment.
    ///
    /// One code path serves both modes: `Foreground` waits on the child and
    /// returns it as a finished task, `Background` hands back a running
    /// task that retains the OS handle. The foreground exit status is not
    /// surfaced to the caller.
    pub fn spawn(&self, argv: &[String], mode: SpawnMode) -> Result<Task, ProcessError> {
        let program = argv.first().ok_or(ProcessError::EmptyCommand)?;

        let mut command = Command::new(program);
        command
            .args(&argv[1..])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    return Err(ProcessError::CommandNotFound(program.clone()));
                }
                return Err(e.into());
            }
        };

        let pid = child.id();
        debug!("spawned {} (pid {}) as {:?}", program, pid, mode);

        match mode {
            SpawnMode::Foreground => {
                signal::setup_signal_handlers()?;
                let status = child.wait()?;
                debug!("foreground child {} exited: {}", pid, status);
                if !status.success() && !self.quiet_mode {
                    println!("Process exited with status: {}", status);
                }
                Ok(Task::finished(pid, program))
            }
            SpawnMode::Background => Ok(Task::from_child(child, program)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::TaskStatus;
    use std::time::{Duration, Instant};

    fn executor() -> ProcessExecutor {
        ProcessExecutor::new(&Flags::default())
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_foreground_spawn_blocks_until_exit() {
        let start = Instant::now();
        let task = executor()
            .spawn(&argv(&["sleep", "1"]), SpawnMode::Foreground)
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(900));
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.label, "sleep");
    }

    #[test]
    fn test_background_spawn_returns_immediately() {
        let start = Instant::now();
        let mut task = executor()
            .spawn(&argv(&["sleep", "100"]), SpawnMode::Background)
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(task.status, TaskStatus::Running);
        assert_eq!(task.label, "sleep");
        assert!(task.pid > 0);

        let mut child = task.take_child().expect("background task keeps its handle");
        child.kill().expect("failed to kill child");
        child.wait().expect("failed to reap child");
    }

    #[test]
    fn test_unknown_program_reports_not_found() {
        let result = executor().spawn(
            &argv(&["definitely-not-a-real-program"]),
            SpawnMode::Foreground,
        );
        assert!(matches!(result, Err(ProcessError::CommandNotFound(_))));
    }

    #[test]
    fn test_empty_argv_is_rejected() {
        let result = executor().spawn(&[], SpawnMode::Foreground);
        assert!(matches!(result, Err(ProcessError::EmptyCommand)));
    }
}
