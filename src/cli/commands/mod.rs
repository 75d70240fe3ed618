pub mod api;
pub mod auth;
pub mod codes;
pub mod logging;
pub mod session;
pub mod verify;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const ARG_JSON: &str = "json";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("invite-console")
        .about("Verify and administer invite codes")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_JSON)
                .long("json")
                .help("Print results as JSON")
                .global(true)
                .action(ArgAction::SetTrue),
        );

    let command = api::with_args(command);
    let command = session::with_args(command);
    let command = logging::with_args(command);
    let command = verify::with_subcommands(command);
    let command = auth::with_subcommands(command);
    codes::with_subcommands(command)
}
