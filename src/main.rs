use std::env;

use tracing_subscriber::EnvFilter;
use tsh::error::ShellError;
use tsh::flags::Flags;
use tsh::shell::Shell;

fn main() -> Result<(), ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("tsh {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if flags.is_set("debug") {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let mut shell = Shell::new(flags)?;
    shell.run()
}
