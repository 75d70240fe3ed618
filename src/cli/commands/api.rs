use crate::api::DEFAULT_BASE_URL;
use clap::{builder::ValueParser, Arg, ArgMatches, Command};
use url::Url;

pub const ARG_API_URL: &str = "api-url";

/// Accept only absolute http(s) URLs; the trailing slash is dropped.
#[must_use]
pub fn validator_api_url() -> ValueParser {
    ValueParser::from(move |raw: &str| -> std::result::Result<String, String> {
        let url = Url::parse(raw.trim()).map_err(|e| format!("invalid API URL: {e}"))?;
        match url.scheme() {
            "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
            other => Err(format!("unsupported API URL scheme: {other}")),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_API_URL)
            .long("api-url")
            .help("Base URL of the invite code API")
            .env("INVITE_CONSOLE_API_URL")
            .default_value(DEFAULT_BASE_URL)
            .global(true)
            .value_parser(validator_api_url()),
    )
}

#[must_use]
pub fn api_url(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>(ARG_API_URL)
        .cloned()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
