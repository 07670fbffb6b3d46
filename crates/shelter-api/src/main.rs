//! shelter server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API over HTTP. The remaining subcommands
//! provision users, institutions and admin roles out of band.
//!
//! ```text
//! cargo run -p shelter-api --bin server -- add-user --name Ana --email ana@example.com
//! cargo run -p shelter-api --bin server -- add-institution --name Patas --owner 1
//! cargo run -p shelter-api --bin server -- grant-admin --user 1 --institution 1
//! cargo run -p shelter-api --bin server
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use shelter_api::{AppState, ServerConfig, auth::hash_password};
use shelter_core::{institution::NewInstitution, store::AdoptionStore, user::NewUser};
use shelter_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Shelter adoption API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Register a user; the password is read from stdin.
  AddUser {
    #[arg(long)]
    name:  String,
    #[arg(long)]
    email: String,
  },
  /// Register an institution owned by an existing user.
  AddInstitution {
    #[arg(long)]
    name:  String,
    #[arg(long)]
    owner: i64,
  },
  /// Make a user an admin of an institution.
  GrantAdmin {
    #[arg(long)]
    user:        i64,
    #[arg(long)]
    institution: i64,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => {
      let (server_cfg, store) = open_store(&cli.config).await?;
      serve(store, server_cfg).await?;
    }
    Command::HashPassword => {
      let password = read_password()?;
      let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
      println!("{hash}");
    }
    Command::AddUser { name, email } => {
      let (_, store) = open_store(&cli.config).await?;
      let password = read_password()?;
      let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
      let user = store
        .add_user(NewUser { name, email, password_hash })
        .await
        .context("failed to add user")?;
      println!("{}", serde_json::to_string_pretty(&user)?);
    }
    Command::AddInstitution { name, owner } => {
      let (_, store) = open_store(&cli.config).await?;
      let institution = store
        .add_institution(NewInstitution { name, owner_id: owner })
        .await
        .context("failed to add institution")?;
      println!("{}", serde_json::to_string_pretty(&institution)?);
    }
    Command::GrantAdmin { user, institution } => {
      let (_, store) = open_store(&cli.config).await?;
      let role = store
        .grant_admin(user, institution)
        .await
        .context("failed to grant admin role")?;
      println!("{}", serde_json::to_string_pretty(&role)?);
    }
  }

  Ok(())
}

/// Load configuration and open the SQLite store it points at.
async fn open_store(config_path: &Path) -> anyhow::Result<(ServerConfig, SqliteStore)> {
  let server_cfg = ServerConfig::load(config_path).context("failed to load configuration")?;
  let store_path = server_cfg.resolved_store_path();

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  Ok((server_cfg, store))
}

async fn serve(store: SqliteStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };
  let app = shelter_api::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
