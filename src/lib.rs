// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{anyhow, bail, Result};
use application::{
    ArchivedView, Banners, FormKind, LoginForm, NotesView, Outcome, Route, SessionGate,
};
use cli::args::{Args, Command};
use constants::messages;
use domain::{ApiError, DomainError, Note};
use infrastructure::terminal::{prompt_line, prompt_password};
use infrastructure::{Config, FileTokenStore, HttpNotesApi, TerminalConfirm};
use ports::TextPresenter;
use tracing::{debug, info};

pub fn run(args: Args) -> Result<()> {
    debug!(json = args.json, config = ?args.config, "Starting notekeep");

    // Initialize infrastructure
    let config = Config::resolve(args.config.as_deref())?;
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.api.base_url.clone());
    let storage_path = config.storage_path()?;
    debug!(%base_url, ?storage_path, "Resolved configuration");

    let mut gate = SessionGate::new(FileTokenStore::new(storage_path))?;
    gate.subscribe(|authenticated| debug!(authenticated, "Session state changed"));

    // Route gating
    if let Some(requested) = route_of(&args.command) {
        let resolved = gate.resolve(requested);
        if resolved != requested {
            info!(from = requested.path(), to = resolved.path(), "Redirecting");
        }
        if requested.is_protected() && resolved == Route::Login {
            return Err(DomainError::NotAuthenticated.into());
        }
    }

    let api = HttpNotesApi::new(&base_url).with_token(gate.token());
    let output = Output {
        json: args.json,
        presenter: TextPresenter::new(),
    };

    match args.command {
        Command::Login { username, password } => {
            if gate.is_authenticated() {
                println!("Already logged in");
                return list_notes(api, &output, None);
            }
            let (username, password) =
                login_credentials(username, password, prompt_line, prompt_password)?;
            let mut api = api;
            let mut form = LoginForm::new(username, password);
            match form.submit(&mut api, &mut gate) {
                Ok(Outcome::Applied) => println!("Logged in"),
                Ok(Outcome::Skipped) => bail!("Username and password are required"),
                Err(e) => {
                    debug!(error = %e, "Login rejected");
                    return Err(anyhow!(form
                        .banners()
                        .error()
                        .unwrap_or(messages::INVALID_CREDENTIALS)
                        .to_string()));
                }
            }
        }
        Command::Logout => {
            gate.logout()?;
            println!("Logged out");
        }
        Command::Status => {
            if gate.is_authenticated() {
                println!("Logged in ({base_url})");
            } else {
                println!("Not logged in ({base_url})");
            }
        }
        Command::List { tag } => list_notes(api, &output, tag)?,
        Command::Archived => {
            let mut view = ArchivedView::new(api, TerminalConfirm::new(false));
            let result = view.fetch_archived();
            check(result, view.banners())?;
            output.notes(view.notes(), "archived note")?;
        }
        Command::Create {
            title,
            content,
            tags,
            new_tag,
        } => {
            let mut view = NotesView::new(api, TerminalConfirm::new(false));
            let result = view.load();
            check(result, view.banners())?;
            let form = view.form_mut(FormKind::Create);
            form.title = title;
            form.content = content;
            for id in tags {
                form.selection.select(id);
            }
            form.new_tag_name = new_tag.unwrap_or_default();
            let result = view.create_note();
            if check(result, view.banners())? == Outcome::Skipped {
                bail!("Title and content must not be blank");
            }
            output.banners(view.banners());
        }
        Command::Edit {
            note_id,
            title,
            content,
            tags,
            untags,
            clear_tags,
            new_tag,
        } => {
            let mut view = NotesView::new(api, TerminalConfirm::new(false));
            let result = view.load();
            check(result, view.banners())?;
            view.start_edit_by_id(note_id)?;
            let form = view.form_mut(FormKind::Edit);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(content) = content {
                form.content = content;
            }
            if clear_tags {
                form.selection.clear();
            }
            for id in tags {
                form.selection.select(id);
            }
            for id in untags {
                form.selection.deselect(id);
            }
            form.new_tag_name = new_tag.unwrap_or_default();
            let result = view.save_edit();
            if check(result, view.banners())? == Outcome::Skipped {
                view.cancel_edit();
                bail!("Title and content must not be blank");
            }
            output.banners(view.banners());
        }
        Command::Archive { note_id } => {
            let mut view = NotesView::new(api, TerminalConfirm::new(false));
            let result = view.fetch_notes();
            check(result, view.banners())?;
            let result = view.toggle_archive(note_id);
            if check(result, view.banners())? == Outcome::Skipped {
                return Err(DomainError::NoteNotFound(note_id).into());
            }
            output.banners(view.banners());
        }
        Command::Restore { note_id } => {
            let mut view = ArchivedView::new(api, TerminalConfirm::new(false));
            let result = view.fetch_archived();
            check(result, view.banners())?;
            let result = view.unarchive(note_id);
            if check(result, view.banners())? == Outcome::Skipped {
                return Err(DomainError::NoteNotFound(note_id).into());
            }
            output.banners(view.banners());
        }
        Command::Delete { note_id, yes } => {
            let mut view = NotesView::new(api, TerminalConfirm::new(yes));
            let result = view.delete_note(note_id);
            report_outcome(check(result, view.banners())?, view.banners(), &output);
        }
        Command::Purge { note_id, yes } => {
            let mut view = ArchivedView::new(api, TerminalConfirm::new(yes));
            let result = view.delete_note(note_id);
            report_outcome(check(result, view.banners())?, view.banners(), &output);
        }
        Command::Tags => {
            let mut view = NotesView::new(api, TerminalConfirm::new(false));
            view.fetch_tags()
                .map_err(|e| anyhow!(e.display_message(messages::LOAD_TAGS_FAILED)))?;
            output.tags(view.tags())?;
        }
        Command::TagCreate { name } => {
            if name.trim().is_empty() {
                bail!("Tag name must not be blank");
            }
            let mut view = NotesView::new(api, TerminalConfirm::new(false));
            match view.create_tag(&name, None) {
                Some(tag) => println!("Created tag [{}] {}", tag.id, tag.name),
                None => bail!(view
                    .banners()
                    .error()
                    .unwrap_or(messages::CREATE_TAG_FAILED)
                    .to_string()),
            }
        }
        Command::TagDelete { tag_id, yes } => {
            let mut view = NotesView::new(api, TerminalConfirm::new(yes));
            let result = view.delete_tag(tag_id);
            report_outcome(check(result, view.banners())?, view.banners(), &output);
        }
    }

    Ok(())
}

/// View a command belongs to; `None` for session commands.
pub fn route_of(command: &Command) -> Option<Route> {
    match command {
        Command::Login { .. } => Some(Route::Login),
        Command::Logout | Command::Status => None,
        Command::Archived | Command::Restore { .. } | Command::Purge { .. } => {
            Some(Route::Archived)
        }
        _ => Some(Route::Notes),
    }
}

/// Fills missing login flags interactively; the password is never echoed.
fn login_credentials(
    username: Option<String>,
    password: Option<String>,
    mut read_line: impl FnMut(&str) -> Result<String>,
    mut read_secret: impl FnMut(&str) -> Result<String>,
) -> Result<(String, String)> {
    let username = match username {
        Some(u) => u,
        None => read_line("Username: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => read_secret("Password: ")?,
    };
    Ok((username, password))
}

fn list_notes(api: HttpNotesApi, output: &Output, tag: Option<i64>) -> Result<()> {
    let mut view = NotesView::new(api, TerminalConfirm::new(false));
    let result = view.load();
    check(result, view.banners())?;
    view.set_filter(tag);
    if let Some(tag_id) = tag {
        let tags = view.tags();
        if !tags.is_empty() && !tags.iter().any(|t| t.id == tag_id) {
            return Err(DomainError::TagNotFound(tag_id).into());
        }
    }
    output.notes(view.notes(), "active note")
}

/// Turns a controller failure into the message shown on its error banner.
fn check<T>(result: Result<T, ApiError>, banners: &Banners) -> Result<T> {
    result.map_err(|e| {
        let message = banners
            .error()
            .map(str::to_owned)
            .unwrap_or_else(|| e.to_string());
        if e.is_unauthorized() {
            anyhow!("{message} (session expired? run `notekeep login`)")
        } else {
            anyhow!(message)
        }
    })
}

fn report_outcome(outcome: Outcome, banners: &Banners, output: &Output) {
    match outcome {
        Outcome::Applied => output.banners(banners),
        Outcome::Skipped => println!("Cancelled"),
    }
}

struct Output {
    json: bool,
    presenter: TextPresenter,
}

impl Output {
    fn notes(&self, notes: &[Note], label: &str) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(notes)?);
        } else {
            print!("{}", self.presenter.render_notes(notes, label));
        }
        Ok(())
    }

    fn tags(&self, tags: &[domain::Tag]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(tags)?);
        } else {
            print!("{}", self.presenter.render_tags(tags));
        }
        Ok(())
    }

    fn banners(&self, banners: &Banners) {
        if !self.json {
            print!("{}", self.presenter.render_banners(banners));
        }
    }
}
