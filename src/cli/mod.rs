pub mod command;
pub mod detect;
pub mod extract;

use log::Level;

use command::Cli;

/// Level at which recoverable conditions become fatal.
pub fn fail_level(cli: &Cli) -> Level {
    if cli.strict { Level::Warn } else { Level::Error }
}
