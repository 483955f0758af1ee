use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::process::ProcessError;

use libc::{signal, sighandler_t, SIGINT};

pub extern "C" fn handle_sigint(_: i32) {
    // Do nothing, let the child process handle the signal
}

pub fn setup_signal_handlers() -> Result<(), ProcessError> {
    unsafe {
        signal(SIGINT, handle_sigint as sighandler_t);
    }
    Ok(())
}

/// Delivers the continue signal to a stopped process.
pub fn send_continue(pid: u32) -> Result<(), ProcessError> {
    kill(Pid::from_raw(pid as i32), Signal::SIGCONT)
        .map_err(|e| ProcessError::SignalError(format!("SIGCONT to {}: {}", pid, e)))
}
