use crate::features::codes::{SortDirection, SortField};
use clap::{Arg, ArgAction, Command};

pub const CMD_GENERATE: &str = "generate";
pub const CMD_LIST: &str = "list";
pub const CMD_SHOW: &str = "show";
pub const CMD_USAGE: &str = "usage";
pub const CMD_ENABLE: &str = "enable";
pub const CMD_DISABLE: &str = "disable";

pub const ARG_COUNT: &str = "count";
pub const ARG_DESCRIPTION: &str = "description";
pub const ARG_PAGE: &str = "page";
pub const ARG_SIZE: &str = "size";
pub const ARG_SORT_BY: &str = "sort-by";
pub const ARG_DIRECTION: &str = "direction";
pub const ARG_ID: &str = "id";
pub const ARG_BY_CODE: &str = "by-code";
pub const ARG_YES: &str = "yes";

// Kept in step with `DEFAULT_PAGE_SIZE` and `DEFAULT_COUNT`.
const DEFAULT_PAGE_SIZE_ARG: &str = "10";
const DEFAULT_COUNT_ARG: &str = "10";

fn page_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PAGE)
                .long("page")
                .help("Zero-based page index")
                .default_value("0")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_SIZE)
                .long("size")
                .help("Page size")
                .default_value(DEFAULT_PAGE_SIZE_ARG)
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new(ARG_ID).help(help).required(true)
}

fn toggle_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(id_arg("Invite code id")).arg(
        Arg::new(ARG_YES)
            .short('y')
            .long("yes")
            .help("Skip the confirmation prompt")
            .action(ArgAction::SetTrue),
    )
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    let sort_fields: Vec<&'static str> = SortField::ALL.iter().map(|f| f.as_str()).collect();

    command
        .subcommand(
            Command::new(CMD_GENERATE)
                .about("Generate a batch of invite codes")
                .arg(
                    Arg::new(ARG_COUNT)
                        .short('n')
                        .long("count")
                        .help("Number of codes to generate (1-100)")
                        .default_value(DEFAULT_COUNT_ARG)
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new(ARG_DESCRIPTION)
                        .short('d')
                        .long("description")
                        .help("Free-text description of the batch"),
                ),
        )
        .subcommand(page_args(
            Command::new(CMD_LIST)
                .about("List invite codes page by page")
                .arg(
                    Arg::new(ARG_SORT_BY)
                        .long("sort-by")
                        .help(format!("Sort field: {}", sort_fields.join(", ")))
                        .default_value(SortField::CreatedAt.as_str())
                        .value_parser(clap::value_parser!(SortField)),
                )
                .arg(
                    Arg::new(ARG_DIRECTION)
                        .long("direction")
                        .help("Sort direction: asc or desc")
                        .default_value(SortDirection::Desc.as_str())
                        .value_parser(clap::value_parser!(SortDirection)),
                ),
        ))
        .subcommand(
            Command::new(CMD_SHOW)
                .about("Show one invite code")
                .arg(id_arg("Invite code id, or the code itself with --by-code"))
                .arg(
                    Arg::new(ARG_BY_CODE)
                        .long("by-code")
                        .help("Look the code up by its code string")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(page_args(
            Command::new(CMD_USAGE)
                .about("List usage records of an invite code")
                .arg(id_arg("Invite code id")),
        ))
        .subcommand(toggle_command(CMD_ENABLE, "Enable an invite code"))
        .subcommand(toggle_command(CMD_DISABLE, "Disable an invite code"))
}
