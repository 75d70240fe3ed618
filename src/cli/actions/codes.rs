use crate::{
    api::ApiError,
    cli::globals::GlobalArgs,
    features::{
        auth::{forget_on_rejection, require_admin},
        codes::{client, CodeId, CodeQuery, InviteCode, UsageQuery, UsageRecord},
    },
    session::{Session, SessionStore},
    workflows::{
        generate::failure_message, CodeDetailView, CodeListView, Decision, GenerateForm,
        ToggleAction, ToggleIntent, ToggleOutcome,
    },
};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub struct GenerateArgs {
    pub globals: GlobalArgs,
    pub count: i64,
    pub description: String,
}

#[derive(Debug)]
pub struct ListArgs {
    pub globals: GlobalArgs,
    pub query: CodeQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeTarget {
    Id(CodeId),
    Code(String),
}

#[derive(Debug)]
pub struct ShowArgs {
    pub globals: GlobalArgs,
    pub target: CodeTarget,
}

#[derive(Debug)]
pub struct UsageArgs {
    pub globals: GlobalArgs,
    pub id: CodeId,
    pub query: UsageQuery,
}

#[derive(Debug)]
pub struct ToggleArgs {
    pub globals: GlobalArgs,
    pub id: CodeId,
    pub action: ToggleAction,
    pub assume_yes: bool,
}

/// Turn a failed admin call into a CLI error, clearing the stored session
/// when the server rejected the token.
fn admin_error(store: &dyn SessionStore, err: &ApiError, message: String) -> anyhow::Error {
    match forget_on_rejection(store, err) {
        Ok(true) => anyhow!("{message}; stored session cleared, run `invite-console login` again"),
        Ok(false) => anyhow!(message),
        Err(store_err) => anyhow!(store_err).context(message),
    }
}

fn admin_session(store: &dyn SessionStore) -> Result<Session> {
    require_admin(store).map_err(|err| anyhow!(err.user_message()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_time(at: Option<&DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn code_row(code: &InviteCode) -> String {
    format!(
        "{:<8} {:<16} {:<9} {:>6}  {}",
        code.id,
        code.code,
        code.status_label(),
        code.usage_count,
        format_time(code.created_at.as_ref())
    )
}

fn record_row(record: &UsageRecord) -> String {
    format!(
        "{:<20} {:<16} {:<20} {}",
        format_time(record.used_at.as_ref()),
        record.user_id.as_deref().unwrap_or("-"),
        record.ip_address.as_deref().unwrap_or("-"),
        record.user_agent.as_deref().unwrap_or("-")
    )
}

fn print_code_detail(code: &InviteCode) {
    println!("Id:          {}", code.id);
    println!("Code:        {}", code.code);
    println!("Status:      {}", code.status_label());
    println!("Usage count: {}", code.usage_count);
    println!("Batch:       {}", code.batch_id.as_deref().unwrap_or("-"));
    println!("Created at:  {}", format_time(code.created_at.as_ref()));
    println!("Created by:  {}", code.created_by.as_deref().unwrap_or("-"));
}

fn print_records(view: &CodeDetailView) {
    let query = view.records_query();
    println!(
        "Usage records (page {}, size {}, {} total):",
        query.page,
        query.size,
        view.records_total()
    );
    if view.records().is_empty() {
        println!("  none");
    }
    for record in view.records() {
        println!("  {}", record_row(record));
    }
}

/// Ask `action`'s confirmation question on `prompt` and read the answer.
fn confirm<R: BufRead, W: Write>(action: ToggleAction, mut input: R, mut prompt: W) -> io::Result<Decision> {
    write!(prompt, "{}: {} [y/N] ", action.title(), action.prompt())?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(Decision::from(answer == "y" || answer == "yes"))
}

/// # Errors
/// Returns an error if not logged in or generation fails.
pub async fn generate(args: GenerateArgs) -> Result<()> {
    let store = args.globals.store()?;
    let session = admin_session(&store)?;
    let api = args.globals.client()?;

    let form = GenerateForm::new(args.count, args.description);
    let batch = form
        .submit(&api, &session)
        .await
        .map_err(|err| admin_error(&store, &err, failure_message(&err)))?;

    if args.globals.json {
        return print_json(batch.codes());
    }

    if let Some(batch_id) = batch.batch_id() {
        println!("Generated {} codes in batch {batch_id}:", batch.len());
    } else {
        println!("Generated {} codes:", batch.len());
    }
    println!("{}", batch.copy_all());
    Ok(())
}

/// # Errors
/// Returns an error if not logged in or the listing fails.
pub async fn list(args: ListArgs) -> Result<()> {
    let store = args.globals.store()?;
    let session = admin_session(&store)?;
    let api = args.globals.client()?;

    let mut view = CodeListView::new(args.query);
    view.reload(&api, &session)
        .await
        .map_err(|err| admin_error(&store, &err, err.user_message()))?;

    let info = view.page_info();
    if args.globals.json {
        return print_json(&json!({
            "page": info.page,
            "size": info.size,
            "totalElements": info.total_elements,
            "totalPages": info.total_pages,
            "content": view.codes(),
        }));
    }

    println!(
        "{:<8} {:<16} {:<9} {:>6}  {}",
        "ID", "CODE", "STATUS", "USED", "CREATED"
    );
    for code in view.codes() {
        println!("{}", code_row(code));
    }
    println!(
        "page {} of {} ({} codes, size {})",
        u64::from(info.page) + 1,
        info.total_pages.max(1),
        info.total_elements,
        info.size
    );
    Ok(())
}

/// # Errors
/// Returns an error if not logged in or the code cannot be loaded.
pub async fn show(args: ShowArgs) -> Result<()> {
    let store = args.globals.store()?;
    let session = admin_session(&store)?;
    let api = args.globals.client()?;

    let id = match args.target {
        CodeTarget::Id(id) => id,
        CodeTarget::Code(code) => {
            client::find_by_code(&api, &session, &code)
                .await
                .map_err(|err| admin_error(&store, &err, err.user_message()))?
                .id
        }
    };

    let mut view = CodeDetailView::new(id);
    view.load(&api, &session)
        .await
        .map_err(|err| admin_error(&store, &err, err.user_message()))?;

    let code = view
        .code()
        .context("server returned no invite code")?;

    if args.globals.json {
        return print_json(&json!({
            "code": code,
            "usageRecords": view.records(),
            "usageRecordsTotal": view.records_total(),
        }));
    }

    print_code_detail(code);
    print_records(&view);
    Ok(())
}

/// # Errors
/// Returns an error if not logged in or the records cannot be loaded.
pub async fn usage(args: UsageArgs) -> Result<()> {
    let store = args.globals.store()?;
    let session = admin_session(&store)?;
    let api = args.globals.client()?;

    let mut view = CodeDetailView::new(args.id).with_records_query(args.query);
    view.refresh_records(&api, &session)
        .await
        .map_err(|err| admin_error(&store, &err, err.user_message()))?;

    if args.globals.json {
        return print_json(&json!({
            "page": view.records_query().page,
            "size": view.records_query().size,
            "totalElements": view.records_total(),
            "content": view.records(),
        }));
    }

    print_records(&view);
    Ok(())
}

/// # Errors
/// Returns an error if not logged in, the prompt cannot be read, or the
/// server refuses the change.
pub async fn toggle(args: ToggleArgs) -> Result<()> {
    let store = args.globals.store()?;
    let session = admin_session(&store)?;
    let api = args.globals.client()?;

    let decision = if args.assume_yes {
        Decision::Confirmed
    } else {
        confirm(args.action, io::stdin().lock(), io::stderr())
            .context("failed to read confirmation")?
    };

    let mut view = CodeDetailView::new(args.id.clone());
    let intent = ToggleIntent::new(args.id, args.action);
    let outcome = view
        .resolve_toggle(&api, &session, intent, decision)
        .await
        .map_err(|err| admin_error(&store, &err, err.user_message()))?;

    match outcome {
        ToggleOutcome::Cancelled => {
            if !args.globals.json {
                println!("Cancelled, nothing was changed");
            }
        }
        ToggleOutcome::Applied { action, .. } => {
            if args.globals.json {
                return print_json(&view.code());
            }
            println!("{}", action.done_message());
            if let Some(code) = view.code() {
                print_code_detail(code);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use secrecy::SecretString;

    #[test]
    fn confirm_accepts_yes_only() -> Result<()> {
        let mut prompt = Vec::new();
        assert_eq!(
            confirm(ToggleAction::Disable, "y\n".as_bytes(), &mut prompt)?,
            Decision::Confirmed
        );
        assert!(String::from_utf8(prompt)?.starts_with("Confirm disable: "));

        for answer in ["\n", "n\n", "nope\n", ""] {
            assert_eq!(
                confirm(ToggleAction::Enable, answer.as_bytes(), io::sink())?,
                Decision::Cancelled
            );
        }
        assert_eq!(
            confirm(ToggleAction::Enable, " YES \n".as_bytes(), io::sink())?,
            Decision::Confirmed
        );
        Ok(())
    }

    #[test]
    fn admin_error_clears_session_on_401() -> Result<()> {
        let store = MemorySessionStore::with_session(Session::authenticated(
            SecretString::from("token"),
            None,
            Vec::new(),
        ));
        let err = ApiError::Http {
            status: 401,
            message: None,
            body: "Unauthorized".to_string(),
        };

        let reported = admin_error(&store, &err, err.user_message());
        assert!(reported.to_string().contains("stored session cleared"));
        assert!(!store.load()?.is_authenticated());
        Ok(())
    }

    #[test]
    fn admin_session_requires_login() {
        let store = MemorySessionStore::new();
        assert!(admin_session(&store).is_err());
    }
}
