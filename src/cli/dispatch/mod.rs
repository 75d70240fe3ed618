//! Maps parsed CLI matches to a typed [`Action`].

use crate::cli::{
    actions::{
        auth::{LoginArgs, SessionArgs},
        codes::{CodeTarget, GenerateArgs, ListArgs, ShowArgs, ToggleArgs, UsageArgs},
        verify, Action,
    },
    commands::{self, api, auth, codes, session},
    globals::GlobalArgs,
};
use crate::features::codes::{CodeId, CodeQuery, SortDirection, SortField, UsageQuery};
use crate::workflows::ToggleAction;
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn globals(matches: &ArgMatches) -> GlobalArgs {
    let mut globals = GlobalArgs::new(api::api_url(matches));
    globals.session_file = session::session_file(matches);
    globals.json = matches.get_flag(commands::ARG_JSON);
    globals
}

fn required(matches: &ArgMatches, arg: &str) -> Result<String> {
    matches
        .get_one::<String>(arg)
        .cloned()
        .with_context(|| format!("missing required argument: {arg}"))
}

fn code_id(matches: &ArgMatches) -> Result<CodeId> {
    Ok(CodeId::from(required(matches, codes::ARG_ID)?.as_str()))
}

fn usage_query(matches: &ArgMatches) -> UsageQuery {
    let defaults = UsageQuery::default();
    UsageQuery {
        page: matches
            .get_one::<u32>(codes::ARG_PAGE)
            .copied()
            .unwrap_or(defaults.page),
        size: matches
            .get_one::<u32>(codes::ARG_SIZE)
            .copied()
            .unwrap_or(defaults.size),
    }
}

fn code_query(matches: &ArgMatches) -> CodeQuery {
    let defaults = CodeQuery::default();
    let paging = usage_query(matches);
    CodeQuery {
        page: paging.page,
        size: paging.size,
        sort_by: matches
            .get_one::<SortField>(codes::ARG_SORT_BY)
            .copied()
            .unwrap_or(defaults.sort_by),
        direction: matches
            .get_one::<SortDirection>(codes::ARG_DIRECTION)
            .copied()
            .unwrap_or(defaults.direction),
    }
}

fn toggle(matches: &ArgMatches, globals: GlobalArgs, action: ToggleAction) -> Result<Action> {
    Ok(Action::Toggle(ToggleArgs {
        globals,
        id: code_id(matches)?,
        action,
        assume_yes: matches.get_flag(codes::ARG_YES),
    }))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is
/// unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches);

    let Some((name, sub)) = matches.subcommand() else {
        bail!("no command given, see --help");
    };

    let action = match name {
        commands::verify::CMD_VERIFY => Action::Verify(verify::Args {
            globals,
            code: required(sub, commands::verify::ARG_CODE)?,
            user_id: sub.get_one::<String>(commands::verify::ARG_USER_ID).cloned(),
        }),
        auth::CMD_LOGIN => Action::Login(LoginArgs {
            globals,
            username: required(sub, auth::ARG_USERNAME)?,
            password: sub
                .get_one::<String>(auth::ARG_PASSWORD)
                .map(|password| SecretString::from(password.clone())),
        }),
        auth::CMD_LOGOUT => Action::Logout(SessionArgs { globals }),
        auth::CMD_STATUS => Action::Status(SessionArgs { globals }),
        codes::CMD_GENERATE => Action::Generate(GenerateArgs {
            globals,
            count: sub
                .get_one::<i64>(codes::ARG_COUNT)
                .copied()
                .context("missing required argument: count")?,
            description: sub
                .get_one::<String>(codes::ARG_DESCRIPTION)
                .cloned()
                .unwrap_or_default(),
        }),
        codes::CMD_LIST => Action::List(ListArgs {
            globals,
            query: code_query(sub),
        }),
        codes::CMD_SHOW => {
            let value = required(sub, codes::ARG_ID)?;
            let target = if sub.get_flag(codes::ARG_BY_CODE) {
                CodeTarget::Code(value)
            } else {
                CodeTarget::Id(CodeId::from(value.as_str()))
            };
            Action::Show(ShowArgs { globals, target })
        }
        codes::CMD_USAGE => Action::Usage(UsageArgs {
            globals,
            id: code_id(sub)?,
            query: usage_query(sub),
        }),
        codes::CMD_ENABLE => toggle(sub, globals, ToggleAction::Enable)?,
        codes::CMD_DISABLE => toggle(sub, globals, ToggleAction::Disable)?,
        other => bail!("unknown command: {other}"),
    };

    Ok(action)
}
