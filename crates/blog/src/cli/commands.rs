//! # CLI Layer
//!
//! This module is **one possible UI client** for the blog, not the
//! application itself.
//!
//! The CLI layer is the **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Decides exit codes
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments become typed commands via clap
//! 2. **Context Setup**: `blogapp::app::initialize` with the terminal as
//!    display root and notice sink
//! 3. **Guarding**: every command visits its page's route first, so the same
//!    access rules apply as in any other front end
//! 4. **Output**: view models are rendered by `render.rs` to stdout; notices
//!    and logs go to stderr
//!
//! A command fails (exit code 1) when its guard redirects or when it
//! produced an error notice.

use super::render;
use super::setup::{build_command, AdminCommands, Cli, Commands, PostArgs, ProfileCommands};
use super::styles::Palette;
use super::terminal::{TerminalNotifier, TerminalRoot};
use anyhow::{anyhow, Context as _};
use blogapp::app::{initialize, BlogApp};
use blogapp::config::BlogPaths;
use blogapp::error::BlogError;
use blogapp::guard::{Access, Route};
use blogapp::http::ReqwestTransport;
use blogapp::i18n::{Language, MessageKey};
use blogapp::model::{ProfileUpdate, RegisterRequest};
use blogapp::notice::Notice;
use blogapp::pages::editor::{self, EditorView};
use blogapp::pages::{admin, home, post_detail, profile};
use blogapp::store::fs_backend::FsBackend;
use clap::Parser;
use std::io::{IsTerminal, Read, Write};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

type App = BlogApp<ReqwestTransport, FsBackend>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
}

struct Context {
    app: App,
    root: Rc<TerminalRoot>,
}

impl Context {
    fn palette(&self) -> &'static Palette {
        self.root.palette()
    }

    fn language(&self) -> Language {
        self.app.language()
    }

    fn print(&self, output: String) {
        print!("{}", output);
    }

    fn fail(&self, message: impl std::fmt::Display) -> Outcome {
        let style = self.palette().error.clone().for_stderr();
        eprintln!("{}", style.apply_to(format!("✗ {}", message)));
        Outcome::Failed
    }
}

pub fn run() -> anyhow::Result<Outcome> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Naked `blog` lists the first page
    let command = cli.command.unwrap_or(Commands::List {
        page: 1,
        search: None,
    });

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut build_command(), "blog", &mut std::io::stdout());
        return Ok(Outcome::Done);
    }

    let paths = BlogPaths::resolve(cli.data, cli.config)?;
    tracing::debug!(config = %paths.config_file.display(), "Resolved paths");
    let root = Rc::new(TerminalRoot::new());
    let notifier = Rc::new(TerminalNotifier::new(root.clone()));
    let app = initialize(&paths, root.clone(), notifier.clone())?;
    let ctx = Context { app, root };

    let outcome = match command {
        Commands::Config => handle_config(&ctx, &paths)?,
        command => dispatch(&ctx, command)?,
    };

    if notifier.error_count() > 0 {
        return Ok(Outcome::Failed);
    }
    Ok(outcome)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("blogapp=debug,blog=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(ctx: &Context, command: Commands) -> anyhow::Result<Outcome> {
    match command {
        Commands::List { page, search } => Ok(handle_list(ctx, page, search.as_deref())),
        Commands::View { id } => Ok(handle_view(ctx, id)),
        Commands::Create(post) => handle_create(ctx, post),
        Commands::Edit { id, post } => handle_edit(ctx, id, post),
        Commands::Delete { id } => Ok(handle_delete(ctx, id)),
        Commands::Login { username, password } => handle_login(ctx, &username, password),
        Commands::Register {
            username,
            email,
            password,
        } => handle_register(ctx, username, email, password),
        Commands::Logout => {
            ctx.app.session.logout();
            Ok(Outcome::Done)
        }
        Commands::Profile { action } => handle_profile(ctx, action),
        Commands::Admin { action } => handle_admin(ctx, action),
        Commands::Open { path } => handle_open(ctx, &path),
        Commands::Theme { show } => handle_theme(ctx, show),
        Commands::Lang { code } => handle_lang(ctx, code),
        Commands::Config | Commands::Completions { .. } => Ok(Outcome::Done),
    }
}

/// Visits `route` through its guard. Reports and returns false when the
/// guard sends the user elsewhere.
fn enter(ctx: &Context, route: Route) -> bool {
    match ctx.app.open(route) {
        Some(landed) if landed == route => true,
        Some(landed) => {
            let hint = match (route.access(), landed) {
                (_, Route::Login) => "sign in first with `blog login`".to_string(),
                (Access::GuestOnly, _) => match ctx.app.session.current() {
                    Some(user) => format!("already signed in as {}", user.username),
                    None => "already signed in".to_string(),
                },
                (Access::Admin, _) => "admins only".to_string(),
                _ => "not allowed".to_string(),
            };
            ctx.fail(format!("{} → {}: {}", route, landed, hint));
            false
        }
        None => {
            ctx.fail(format!("{}: session is still loading", route));
            false
        }
    }
}

fn handle_list(ctx: &Context, page: u32, search: Option<&str>) -> Outcome {
    if !enter(ctx, Route::Home) {
        return Outcome::Failed;
    }
    let view = home::load(&ctx.app, page.saturating_sub(1), search);
    ctx.print(render::post_list(&view, ctx.language(), ctx.palette()));
    Outcome::Done
}

fn handle_view(ctx: &Context, id: i64) -> Outcome {
    if !enter(ctx, Route::Post(id)) {
        return Outcome::Failed;
    }
    match post_detail::load(&ctx.app, id) {
        Some(view) => {
            ctx.print(render::post_detail(&view, ctx.language(), ctx.palette()));
            Outcome::Done
        }
        None => Outcome::Failed,
    }
}

fn handle_create(ctx: &Context, post: PostArgs) -> anyhow::Result<Outcome> {
    if !enter(ctx, Route::CreatePost) {
        return Ok(Outcome::Failed);
    }
    let mut view = editor::open_create(&ctx.app);
    let content = match post.content {
        Some(content) => Some(content),
        None if !std::io::stdin().is_terminal() => Some("-".to_string()),
        None => None,
    };
    fill_form(&mut view, post.title, content, &post.tags)?;
    Ok(submit(ctx, &mut view))
}

fn handle_edit(ctx: &Context, id: i64, post: PostArgs) -> anyhow::Result<Outcome> {
    if !enter(ctx, Route::EditPost(id)) {
        return Ok(Outcome::Failed);
    }
    let Some(mut view) = editor::open_edit(&ctx.app, id) else {
        return Ok(Outcome::Failed);
    };
    fill_form(&mut view, post.title, post.content, &post.tags)?;
    Ok(submit(ctx, &mut view))
}

fn fill_form(
    view: &mut EditorView,
    title: Option<String>,
    content: Option<String>,
    tags: &[i64],
) -> anyhow::Result<()> {
    if let Some(title) = title {
        view.form.set_title(title);
    }
    match content.as_deref() {
        Some("-") => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("reading post content from stdin")?;
            view.form.set_content(body);
        }
        Some(body) => view.form.set_content(body),
        None => {}
    }
    for id in tags {
        view.form.toggle_tag(*id);
    }
    Ok(())
}

fn submit(ctx: &Context, view: &mut EditorView) -> Outcome {
    match editor::submit(&ctx.app, view) {
        Some(post) => {
            println!("{}", Route::Post(post.id));
            Outcome::Done
        }
        None => {
            for (field, message) in &view.form.errors {
                ctx.fail(format!("{}: {}", field, message));
            }
            Outcome::Failed
        }
    }
}

fn handle_delete(ctx: &Context, id: i64) -> Outcome {
    if !enter(ctx, Route::Post(id)) {
        return Outcome::Failed;
    }
    let Some(view) = post_detail::load(&ctx.app, id) else {
        return Outcome::Failed;
    };
    if !view.can_edit {
        return ctx.fail("only the author or an admin can delete this post");
    }
    if post_detail::delete(&ctx.app, id) {
        Outcome::Done
    } else {
        Outcome::Failed
    }
}

fn read_password(given: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        let _ = std::io::stderr().flush();
    }
    let mut line = String::new();
    stdin
        .read_line(&mut line)
        .context("reading password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn handle_login(ctx: &Context, username: &str, password: Option<String>) -> anyhow::Result<Outcome> {
    if !enter(ctx, Route::Login) {
        return Ok(Outcome::Failed);
    }
    let password = read_password(password)?;
    match ctx.app.session.login(&ctx.app.api, username, &password) {
        Ok(user) => {
            ctx.print(render::user_card(&user, ctx.palette()));
            Ok(Outcome::Done)
        }
        Err(_) => Ok(Outcome::Failed),
    }
}

fn handle_register(
    ctx: &Context,
    username: String,
    email: String,
    password: Option<String>,
) -> anyhow::Result<Outcome> {
    if !enter(ctx, Route::Register) {
        return Ok(Outcome::Failed);
    }
    let password = read_password(password)?;
    let request = RegisterRequest {
        username,
        email,
        password,
    };
    match ctx.app.session.register(&ctx.app.api, request) {
        Ok(()) => Ok(Outcome::Done),
        Err(BlogError::Validation(errors)) => {
            // The first one was already shown as a notice
            for (field, message) in errors.iter().skip(1) {
                ctx.fail(format!("{}: {}", field, message));
            }
            Ok(Outcome::Failed)
        }
        Err(_) => Ok(Outcome::Failed),
    }
}

fn handle_profile(ctx: &Context, action: Option<ProfileCommands>) -> anyhow::Result<Outcome> {
    if !enter(ctx, Route::Profile) {
        return Ok(Outcome::Failed);
    }
    let Some(current) = ctx.app.session.current() else {
        return Ok(Outcome::Failed);
    };

    match action {
        None => {
            let Some(view) = profile::load(&ctx.app) else {
                return Ok(Outcome::Failed);
            };
            ctx.print(render::profile(&view, ctx.language(), ctx.palette()));
            Ok(Outcome::Done)
        }
        Some(ProfileCommands::Update {
            username,
            email,
            password,
        }) => {
            let update = ProfileUpdate {
                username: username.unwrap_or(current.username),
                email: email.unwrap_or(current.email),
                password,
            };
            match profile::update(&ctx.app, update) {
                Ok(user) => {
                    ctx.print(render::user_card(&user, ctx.palette()));
                    Ok(Outcome::Done)
                }
                Err(_) => Ok(Outcome::Failed),
            }
        }
        Some(ProfileCommands::Refresh) => match profile::fetch(&ctx.app) {
            Ok(user) => {
                ctx.app.session.replace_user(user.clone())?;
                ctx.print(render::user_card(&user, ctx.palette()));
                Ok(Outcome::Done)
            }
            Err(_) => Ok(Outcome::Failed),
        },
    }
}

fn handle_admin(ctx: &Context, action: AdminCommands) -> anyhow::Result<Outcome> {
    if !enter(ctx, Route::Admin) {
        return Ok(Outcome::Failed);
    }
    let (language, palette) = (ctx.language(), ctx.palette());
    let done = |ok: bool| if ok { Outcome::Done } else { Outcome::Failed };

    let outcome = match action {
        AdminCommands::Posts { page } => {
            let view = admin::load_posts(&ctx.app, page.saturating_sub(1));
            ctx.print(render::admin_posts(&view, language, palette));
            Outcome::Done
        }
        AdminCommands::DeletePost { id } => done(admin::delete_post(&ctx.app, id)),
        AdminCommands::Tags => {
            ctx.print(render::tags(&admin::load_tags(&ctx.app), language, palette));
            Outcome::Done
        }
        AdminCommands::TagCreate { name } => match admin::create_tag(&ctx.app, &name) {
            Some(tag) => {
                ctx.print(render::tags(&[tag], language, palette));
                Outcome::Done
            }
            None => Outcome::Failed,
        },
        AdminCommands::TagRename { id, name } => done(admin::rename_tag(&ctx.app, id, &name).is_some()),
        AdminCommands::TagDelete { id } => done(admin::delete_tag(&ctx.app, id)),
        AdminCommands::Users => {
            ctx.print(render::users(&admin::load_users(&ctx.app), language, palette));
            Outcome::Done
        }
    };
    Ok(outcome)
}

fn handle_open(ctx: &Context, path: &str) -> anyhow::Result<Outcome> {
    let route: Route = path.parse()?;
    match ctx.app.open(route) {
        Some(landed) => {
            println!("{}", landed);
            Ok(Outcome::Done)
        }
        None => Ok(ctx.fail(format!("{}: session is still loading", route))),
    }
}

fn handle_theme(ctx: &Context, show: bool) -> anyhow::Result<Outcome> {
    let dark = if show {
        ctx.app.preferences.is_dark_mode()
    } else {
        let dark = ctx.app.preferences.toggle()?;
        let key = if dark {
            MessageKey::DarkModeOn
        } else {
            MessageKey::DarkModeOff
        };
        ctx.app.notifier.notify(Notice::info(ctx.app.text(key)));
        dark
    };
    println!("{}", if dark { "dark" } else { "light" });
    Ok(Outcome::Done)
}

fn handle_lang(ctx: &Context, code: Option<String>) -> anyhow::Result<Outcome> {
    let Some(code) = code else {
        println!("{}", ctx.language());
        return Ok(Outcome::Done);
    };
    let language: Language = code.parse().map_err(|e: String| anyhow!(e))?;
    ctx.app.preferences.set_language(language)?;
    ctx.app.notify_success(MessageKey::LanguageChanged);
    println!("{}", language);
    Ok(Outcome::Done)
}

fn handle_config(ctx: &Context, paths: &BlogPaths) -> anyhow::Result<Outcome> {
    println!("config file: {}", paths.config_file.display());
    println!("data dir:    {}", paths.data_dir.display());
    println!("{}", serde_json::to_string_pretty(&ctx.app.config)?);
    Ok(Outcome::Done)
}
