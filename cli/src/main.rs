use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use defectdesk::config::ConfigError;
use defectdesk::nav::{Tab, sidebar_role, visible_tabs};
use defectdesk::pages::dashboard::greeting;
use defectdesk::storage::{CookieJar, FileStorage};
use defectdesk::{
    AuthError, ClientConfig, HttpClient, LoginFlow, Navigator, PageId, PageLoad, PageLoader, Route, SessionCheck,
    SessionStore, TokenManager,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("no page at path `{0}`")]
    UnknownPage(String),
    #[error("not logged in")]
    NoSession,
    #[error("redirected to {0}")]
    Redirected(Route),
    #[error("page failed to load: {0}")]
    PageFailed(String),
    #[error("interrupted")]
    Cancelled,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "defectdesk", about = "Defect-tracking dashboard session client")]
struct Cli {
    /// Overrides `DEFECTDESK_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    #[arg(long, env = "DEFECTDESK_SESSION_FILE", default_value = ".defectdesk-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session.
    Login {
        #[arg(long, env = "DEFECTDESK_EMAIL")]
        email: String,
        #[arg(long, env = "DEFECTDESK_PASSWORD")]
        password: String,
    },
    /// Show the stored session's role and user.
    Whoami,
    /// Validate the session, refreshing it if needed.
    Check,
    /// End the session.
    Logout,
    /// List the sidebar tabs for the stored role.
    Tabs,
    /// Load a dashboard page and print its data.
    Page { path: String },
}

/// Prints navigation decisions instead of following them.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: Route) {
        eprintln!("-> {route}");
    }
}

struct Context {
    store: SessionStore,
    http: Arc<HttpClient>,
}

impl Context {
    fn tokens(&self) -> TokenManager {
        TokenManager::new(self.http.clone(), self.store.clone())
    }

    fn login_flow(&self) -> LoginFlow {
        LoginFlow::new(self.http.clone(), self.store.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let config = match cli.api_url.as_deref() {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    let file = Arc::new(FileStorage::new(cli.session_file));
    let ctx = Context {
        store: SessionStore::new(file.clone(), Arc::new(CookieJar::new(file))),
        http: Arc::new(HttpClient::new(config)?),
    };

    let cancel = CancellationToken::new();
    let _interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Command::Login { email, password } => run_login(&ctx, &email, &password).await,
        Command::Whoami => run_whoami(&ctx),
        Command::Check => run_check(&ctx, &cancel).await,
        Command::Logout => {
            let route = ctx.login_flow().logout().await;
            println!("logged out");
            PrintNavigator.navigate(route);
            Ok(())
        }
        Command::Tabs => {
            for line in tab_lines(&visible_tabs(sidebar_role(&ctx.store))) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Page { path } => run_page(&ctx, &path, &cancel).await,
    }
}

async fn run_login(ctx: &Context, email: &str, password: &str) -> Result<(), CliError> {
    let landing = ctx.login_flow().login(email, password).await?;
    println!("{}", greeting(&ctx.store));
    PrintNavigator.navigate(landing);
    Ok(())
}

fn run_whoami(ctx: &Context) -> Result<(), CliError> {
    let claims = ctx.store.claims().map_err(|_| CliError::NoSession)?;
    println!("{}", greeting(&ctx.store));
    println!("role: {}", claims.role.as_deref().unwrap_or("-"));
    if let Some(exp) = claims.exp {
        println!("{}", expiry_line(exp, claims.is_expired_at(unix_now())));
    }
    Ok(())
}

fn expiry_line(exp: i64, expired: bool) -> String {
    if expired { format!("expires: {exp} (expired, next check refreshes)") } else { format!("expires: {exp}") }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

async fn run_check(ctx: &Context, cancel: &CancellationToken) -> Result<(), CliError> {
    match ctx.tokens().check_token(cancel).await {
        SessionCheck::Valid => {
            println!("session valid");
            Ok(())
        }
        SessionCheck::Denied(e) => {
            PrintNavigator.navigate(e.redirect_target());
            Err(e.into())
        }
        SessionCheck::Cancelled => Err(CliError::Cancelled),
    }
}

async fn run_page(ctx: &Context, path: &str, cancel: &CancellationToken) -> Result<(), CliError> {
    let page = PageId::from_path(path).ok_or_else(|| CliError::UnknownPage(path.to_owned()))?;
    let loader = PageLoader::new(ctx.tokens(), ctx.http.clone());
    match loader.load::<Value>(page, cancel).await {
        PageLoad::Ready(value) => print_json(&value),
        PageLoad::Redirect(route) => {
            PrintNavigator.navigate(route);
            Err(CliError::Redirected(route))
        }
        PageLoad::Failed(message) => Err(CliError::PageFailed(message)),
        PageLoad::Loading | PageLoad::Cancelled => Err(CliError::Cancelled),
    }
}

fn tab_lines(tabs: &[Tab]) -> Vec<String> {
    tabs.iter()
        .map(|tab| format!("{:<18} {:<14} {}", tab.id(), tab.label(), tab.route()))
        .collect()
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
