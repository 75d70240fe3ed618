use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names in `-v` count order; `error` means no `-v` at all.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts `INVITE_CONSOLE_LOG_LEVEL` as a level name or as the equivalent
/// number of `-v` flags.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> std::result::Result<u8, String> {
        let level = level.trim().to_ascii_lowercase();
        LEVEL_NAMES
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .or_else(|| level.parse::<u8>().ok().filter(|n| usize::from(*n) < LEVEL_NAMES.len()))
            .ok_or_else(|| format!("invalid log level, expected one of {}", LEVEL_NAMES.join(", ")))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log more; repeat for WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("INVITE_CONSOLE_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(level: &str) -> Result<u8, clap::Error> {
        let command = Command::new("t").arg(Arg::new("level").value_parser(validator_log_level()));
        command
            .try_get_matches_from(["t", level])
            .map(|m| m.get_one::<u8>("level").copied().unwrap_or_default())
    }

    #[test]
    fn level_names_map_to_counts() {
        assert_eq!(parse("error").ok(), Some(0));
        assert_eq!(parse(" Debug ").ok(), Some(3));
        assert_eq!(parse("trace").ok(), Some(4));
    }

    #[test]
    fn numeric_levels_are_bounded() {
        assert_eq!(parse("2").ok(), Some(2));
        assert!(parse("5").is_err());
        assert!(parse("loud").is_err());
    }
}
