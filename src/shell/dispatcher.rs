use std::env;
use std::io;

use tracing::debug;

use super::ShellState;
use crate::error::ShellError;
use crate::process::{signal, ProcessError, ProcessExecutor, SpawnMode};

/// Executes one tokenized command line against the interpreter state.
///
/// User-level failures (bad argument counts, invalid job numbers, OS call
/// errors) are reported here and never escalate. An `Err` from this
/// function is fatal to the interpreter; the only such condition is the
/// job table hitting its ceiling.
pub fn dispatch(
    tokens: &[String],
    state: &mut ShellState,
    executor: &ProcessExecutor,
    quiet: bool,
) -> Result<(), ShellError> {
    // Callers keep empty lines out; degrade to a no-op rather than index
    // into nothing.
    let Some(name) = tokens.first() else {
        return Ok(());
    };

    match name.as_str() {
        "cd" => change_directory(&tokens[1..], quiet),
        "pwd" => print_working_directory(&tokens[1..]),
        "exit" => request_exit(&tokens[1..], state),
        "jobs" => list_jobs(state),
        "fg" => wait_for_job(&tokens[1..], state),
        "bg" => resume_job(&tokens[1..], state),
        _ => return spawn_external(tokens, state, executor),
    }
    Ok(())
}

fn change_directory(args: &[String], quiet: bool) {
    if args.len() != 1 {
        println!("cd accepts exactly 1 arg. Received: {}", args.len());
        return;
    }

    let target = &args[0];
    match env::set_current_dir(target) {
        Ok(()) => {
            if !quiet {
                println!("changed directory to {}", target);
            }
        }
        Err(e) => println!("cd: {}: {}", chdir_error_kind(&e), target),
    }
}

fn chdir_error_kind(err: &io::Error) -> &'static str {
    match err.raw_os_error() {
        Some(libc::EACCES) => "permission denied",
        Some(libc::EFAULT) => "path lies outside the accessible address space",
        Some(libc::EIO) => "I/O error",
        Some(libc::ELOOP) => "too many symbolic links",
        Some(libc::ENAMETOOLONG) => "path is too long",
        Some(libc::ENOENT) => "no such file or directory",
        Some(libc::ENOMEM) => "insufficient kernel memory",
        Some(libc::ENOTDIR) => "component of path is not a directory",
        _ => "unknown error",
    }
}

fn print_working_directory(args: &[String]) {
    if !args.is_empty() {
        println!("pwd accepts 0 args. Received: {}", args.len());
        return;
    }

    match env::current_dir() {
        Ok(dir) => println!("{}", dir.display()),
        Err(e) => println!("pwd: {}", e),
    }
}

fn request_exit(args: &[String], state: &mut ShellState) {
    if args.len() > 1 {
        println!("exit accepts at most 1 arg. Received: {}", args.len());
        return;
    }

    // An exit status argument is tolerated but not interpreted.
    state.exit_requested = true;
}

fn list_jobs(state: &ShellState) {
    println!("\nBackground tasks:");
    for (number, task) in state.jobs.iter() {
        println!(
            "[{}] {} (PID: {}) - Status: {}",
            number, task.label, task.pid, task.status
        );
    }
}

/// Blocks until the named background task terminates, then marks it done.
fn wait_for_job(args: &[String], state: &mut ShellState) {
    let Some(number) = parse_job_number("fg", args) else {
        return;
    };
    let Some(task) = state.jobs.get_mut(number) else {
        println!("Invalid job number");
        return;
    };

    println!("Bringing job [{}] {} to foreground...", number, task.label);

    match task.take_child() {
        Some(mut child) => match child.wait() {
            Ok(status) => debug!("job {} terminated: {}", number, status),
            Err(e) => println!("fg: wait failed: {}", e),
        },
        // An earlier wait already consumed the handle; nothing to block on.
        None => debug!("job {} has no live handle", number),
    }

    state.jobs.mark_done(number - 1);
}

/// Sends the continue signal to the named background task and marks it
/// running again.
fn resume_job(args: &[String], state: &mut ShellState) {
    let Some(number) = parse_job_number("bg", args) else {
        return;
    };
    let Some(task) = state.jobs.get(number) else {
        println!("Invalid job number");
        return;
    };

    println!("Resuming job [{}] {} in background...", number, task.label);

    if let Err(e) = signal::send_continue(task.pid) {
        println!("bg: {}", e);
        return;
    }

    state.jobs.mark_running(number - 1);
}

fn parse_job_number(command: &str, args: &[String]) -> Option<usize> {
    let Some(arg) = args.first() else {
        println!("{} requires a job number", command);
        return None;
    };

    // Non-numeric input is rejected outright instead of silently resolving
    // to a job.
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            println!("Invalid job number");
            None
        }
    }
}

fn spawn_external(
    tokens: &[String],
    state: &mut ShellState,
    executor: &ProcessExecutor,
) -> Result<(), ShellError> {
    let background = tokens.last().is_some_and(|t| t == "&");

    if background {
        let argv = &tokens[..tokens.len() - 1];
        if argv.is_empty() {
            println!("& requires a command");
            return Ok(());
        }

        match executor.spawn(argv, SpawnMode::Background) {
            Ok(task) => {
                let pid = task.pid;
                let label = task.label.clone();
                let index = state.jobs.append(task)?;
                debug!("registered background job {}", index + 1);
                println!("[Background] {} started: {}", pid, label);
            }
            Err(e) => report_spawn_failure(&e),
        }
        return Ok(());
    }

    match executor.spawn(tokens, SpawnMode::Foreground) {
        // The child's exit status is discarded; only the finished task is
        // recorded in the foreground slot.
        Ok(task) => state.jobs.set_foreground(task),
        Err(e) => report_spawn_failure(&e),
    }
    Ok(())
}

fn report_spawn_failure(err: &ProcessError) {
    match err {
        ProcessError::CommandNotFound(name) => {
            println!("execution failed: command not found");
            println!("{}: unknown command", name);
        }
        other => println!("execution failed: {}", other),
    }
}
