// Vidgate
// Copyright (C) 2025 Throneless Tech

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

pub mod admin;
pub mod api;
pub mod channels;
pub mod db;
pub mod delivery;
pub mod gate;
pub mod messages;
pub mod oracle;
pub mod settings;
pub mod utils;

use clap::{Parser, Subcommand, ValueHint};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use sea_orm::{Database, DatabaseConnection};
use std::{fs, path::Path, path::PathBuf, sync::Arc};
use teloxide::Bot;
use tracing::info;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;
use vidgate_common::{
    error::{Result, VidgateErrorKind},
    role::Role,
};

use api::ApiState;
use channels::telegram::{self, TelegramOracle};
use settings::Settings;

/// Vidgate: a Telegram bot that unlocks a video library with a secret code
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "vidgate.toml", value_hint = ValueHint::FilePath)]
    config: PathBuf,

    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// run the bot
    Run,

    /// apply database migrations and exit
    Migrate,

    /// set the role of a user
    #[command(arg_required_else_help = true)]
    Promote {
        /// Telegram user ID
        identity: i64,

        /// user, admin or superadmin
        role: String,
    },
}

async fn connect(path: &Path) -> Result<DatabaseConnection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let uri = format!("sqlite://{}?mode=rwc", path.display());
    Ok(Database::connect(&uri).await?)
}

async fn run(settings: Settings, db: DatabaseConnection) -> Result<()> {
    let Some(token) = settings.token else {
        return Err(VidgateErrorKind::InvalidInput(
            "no bot token configured, set `token` or VIDGATE_TOKEN".to_owned(),
        )
        .into());
    };

    let bot = Bot::new(token);
    let state = ApiState {
        db,
        oracle: Arc::new(TelegramOracle::new(bot.clone())),
        platform_url: settings.platform_url,
        log_limit: settings.log_limit,
    };
    telegram::run(bot, state).await
}

////////////////////////////////////////////////////////////////////////////////
// PUBLIC FUNCTION
////////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.log_level_filter().as_trace().into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::load(&cli.config)?;
    let db = connect(&settings.database).await?;
    db::migration::migrate(&db).await?;

    for identity in &settings.superadmins {
        db::account::set_role(*identity, Role::Superadmin, &db).await?;
        info!(identity, "superadmin from configuration");
    }

    match cli.command {
        Commands::Migrate => {
            info!(database = %settings.database.display(), "migrations applied");
            Ok(())
        }
        Commands::Promote { identity, role } => {
            let role: Role = role.parse()?;
            let account = db::account::set_role(identity, role, &db).await?;
            info!(identity, role = %account.role, "role updated");
            Ok(())
        }
        Commands::Run => run(settings, db).await,
    }
}
