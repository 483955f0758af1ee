use std::env;
use std::path::PathBuf;

use rustyline::DefaultEditor;

mod dispatcher;

use crate::{
    error::ShellError,
    flags::Flags,
    jobs::{JobError, JobTable},
    process::ProcessExecutor,
    prompt::Prompt,
    tokenizer,
};

pub use dispatcher::dispatch;

/// Mutable interpreter state threaded through the dispatch chain.
///
/// Created once at startup and alive for the process lifetime; nothing
/// here is global.
pub struct ShellState {
    pub jobs: JobTable,
    pub exit_requested: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellState {
    pub fn new() -> Self {
        ShellState {
            jobs: JobTable::new(),
            exit_requested: false,
        }
    }
}

pub struct Shell {
    editor: DefaultEditor,
    current_dir: String,
    prompt: Prompt,
    state: ShellState,
    executor: ProcessExecutor,
    flags: Flags,
    history_file: PathBuf,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let mut editor = DefaultEditor::new()?;
        let current_dir = env::current_dir()?.to_string_lossy().to_string();

        let history_file = dirs::home_dir()
            .ok_or(ShellError::HomeDirNotFound)?
            .join(".tsh_history");
        if history_file.exists() {
            if let Err(e) = editor.load_history(&history_file) {
                if !flags.is_set("quiet") {
                    eprintln!("Warning: Couldn't load history: {}", e);
                }
            }
        }

        ctrlc::set_handler(move || {
            println!("\nUse 'exit' to exit the shell");
        })?;

        let executor = ProcessExecutor::new(&flags);

        Ok(Shell {
            editor,
            current_dir,
            prompt: Prompt::new(),
            state: ShellState::new(),
            executor,
            flags,
            history_file,
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        if !self.flags.is_set("quiet") {
            println!("{}", self.prompt.banner());
        }

        loop {
            if !self.flags.is_set("quiet") {
                println!("{}", self.prompt.header(&self.current_dir));
            }

            match self.editor.readline(self.prompt.ready()) {
                Ok(line) => {
                    if let Err(e) = self.handle_line(&line) {
                        if matches!(e, ShellError::JobError(JobError::TableFull(_))) {
                            eprintln!("{}", self.prompt.error(&format!("CRITICAL: {}", e)));
                            return Err(e);
                        }
                        eprintln!("{}", self.prompt.error(&e.to_string()));
                    }

                    // The exit flag is checked once per iteration, after dispatch.
                    if self.state.exit_requested {
                        println!("Stopping shell...");
                        break;
                    }
                }
                Err(rustyline::error::ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    continue;
                }
                Err(rustyline::error::ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    continue;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<(), ShellError> {
        let tokens = tokenizer::tokenize(line);
        if tokens.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.editor.add_history_entry(line) {
            if !self.flags.is_set("quiet") {
                eprintln!("Warning: Couldn't add to history: {}", e);
            }
        }

        dispatcher::dispatch(
            &tokens,
            &mut self.state,
            &self.executor,
            self.flags.is_set("quiet"),
        )?;

        self.current_dir = env::current_dir()?.to_string_lossy().to_string();
        Ok(())
    }

    fn save_history(&mut self) {
        if let Err(e) = self.editor.save_history(&self.history_file) {
            if !self.flags.is_set("quiet") {
                eprintln!("Warning: Couldn't save history: {}", e);
            }
        }
    }
}
