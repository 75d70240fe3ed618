use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_STATUS: &str = "status";

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log in as an administrator and store the session")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .short('u')
                        .long("username")
                        .help("Administrator username")
                        .env("INVITE_CONSOLE_USERNAME")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .short('p')
                        .long("password")
                        .help("Administrator password, read from stdin when omitted")
                        .env("INVITE_CONSOLE_PASSWORD")
                        .hide_env_values(true),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Forget the stored admin session"))
        .subcommand(Command::new(CMD_STATUS).about("Show whether an admin session is stored"))
}
