use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_SESSION_FILE: &str = "session-file";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_SESSION_FILE)
            .long("session-file")
            .help("Where the admin session is stored (default: $XDG_CONFIG_HOME/invite-console/session.json)")
            .env("INVITE_CONSOLE_SESSION_FILE")
            .global(true)
            .value_parser(clap::value_parser!(PathBuf)),
    )
}

#[must_use]
pub fn session_file(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<PathBuf>(ARG_SESSION_FILE).cloned()
}
