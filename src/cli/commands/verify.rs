use clap::{Arg, Command};

pub const CMD_VERIFY: &str = "verify";
pub const ARG_CODE: &str = "code";
pub const ARG_USER_ID: &str = "user-id";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_VERIFY)
            .about("Redeem an invite code")
            .arg(
                Arg::new(ARG_CODE)
                    .help("Invite code to verify")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_USER_ID)
                    .short('u')
                    .long("user-id")
                    .help("Identifier of the user redeeming the code"),
            ),
    )
}
