//! Interactive Box login console
//!
//! Thin driver over the session coordinator:
//! 1. Resolves the secrets file (CLI arg > BOX_SECRETS_PATH > default)
//! 2. Selects the strategy named on the command line
//! 3. Walks the chosen flow, reading the pasted redirect URL from stdin
//!    for the delegated path
//! 4. Prints the verified identity on success

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use box_auth::{AuthError, HttpBoxApi, StrategyKind};
use box_session::{AuthCoordinator, Error as SessionError, SessionStore, StrategyInput};
use common::SecretStore;

const USAGE: &str = "usage: box-login <oauth|jwt|dev> [secrets-path]";

/// Resolve the secrets file path from CLI arg or BOX_SECRETS_PATH env var.
fn resolve_secrets_path(cli_path: Option<&str>) -> PathBuf {
    if let Some(p) = cli_path {
        return PathBuf::from(p);
    }
    if let Ok(p) = std::env::var("BOX_SECRETS_PATH") {
        return PathBuf::from(p);
    }
    PathBuf::from("box-secrets.toml")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let strategy: StrategyKind = args
        .get(1)
        .context(USAGE)?
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{e}\n{USAGE}"))?;
    let secrets_path = resolve_secrets_path(args.get(2).map(String::as_str));

    let secrets = SecretStore::load(&secrets_path)
        .with_context(|| format!("loading secrets from {}", secrets_path.display()))?;
    info!(path = %secrets_path.display(), strategy = strategy.label(), "secrets loaded");

    let api = Arc::new(HttpBoxApi::new(reqwest::Client::new()));
    let coordinator = AuthCoordinator::new(api, secrets, Arc::new(SessionStore::new()));

    coordinator.select_strategy(strategy).await;

    match strategy {
        StrategyKind::DelegatedCode => run_delegated(&coordinator).await?,
        StrategyKind::SignedAssertion | StrategyKind::StaticToken => {
            coordinator
                .submit(StrategyInput::Execute)
                .await
                .context("authorization failed")?;
        }
    }

    let identity = coordinator
        .current_identity()
        .await
        .context("no identity after commit")?;
    let account_note = if identity.is_service_account {
        " (Service Account)"
    } else {
        ""
    };
    println!("Successfully authenticated as {}{account_note}", identity.name);
    Ok(())
}

/// Drive the two-step delegated flow, re-prompting on a correctable paste.
async fn run_delegated(coordinator: &AuthCoordinator) -> Result<()> {
    let url = coordinator
        .begin_delegated()
        .await
        .context("starting authorization")?;
    println!("Open this URL in your browser and authorize the app:\n\n  {url}\n");
    println!("After authorizing you will be redirected; copy the full URL from the address bar.");

    let stdin = io::stdin();
    loop {
        print!("Paste the full redirect URL here: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            anyhow::bail!("stdin closed before a redirect URL was supplied");
        }

        match coordinator.submit(StrategyInput::CallbackUrl(line)).await {
            Ok(()) => return Ok(()),
            // Correctable: no code in the pasted URL, same attempt stays open
            Err(SessionError::Auth(AuthError::MalformedCallback(msg))) => {
                eprintln!("{msg}");
            }
            Err(e) => return Err(e).context("completing authorization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that mutate environment variables, preventing
    /// data races when tests run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    fn resolve_path_cli_arg() {
        let path = resolve_secrets_path(Some("/custom/secrets.toml"));
        assert_eq!(path, PathBuf::from("/custom/secrets.toml"));
    }

    #[test]
    fn resolve_path_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("BOX_SECRETS_PATH", "/env/secrets.toml") };
        let path = resolve_secrets_path(None);
        assert_eq!(path, PathBuf::from("/env/secrets.toml"));
        unsafe { remove_env("BOX_SECRETS_PATH") };
    }

    #[test]
    fn resolve_path_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("BOX_SECRETS_PATH") };
        let path = resolve_secrets_path(None);
        assert_eq!(path, PathBuf::from("box-secrets.toml"));
    }

    #[test]
    fn resolve_path_cli_overrides_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("BOX_SECRETS_PATH", "/env/should-lose.toml") };
        let path = resolve_secrets_path(Some("/cli/wins.toml"));
        assert_eq!(
            path,
            PathBuf::from("/cli/wins.toml"),
            "CLI arg must take precedence over BOX_SECRETS_PATH"
        );
        unsafe { remove_env("BOX_SECRETS_PATH") };
    }
}
