use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use duidui_common::models::{CdkStatus, TierDraft, UserProfile};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod config;
mod context;

use config::ServerConfig;
use context::ServerContext;

#[derive(Parser, Debug, Clone)]
#[command(name = "duidui")]
#[command(author, version, about = "duidui - tiered CDK dispensing engine")]
pub struct Args {
    /// Directory holding the CSV tables. Overrides DUIDUI_DATA_DIR.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter directives. Overrides DUIDUI_LOG.
    #[arg(long, global = true)]
    pub log: Option<String>,

    /// Lifetime of a login verification state, in seconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub state_ttl_secs: Option<u32>,

    /// Base64-wrap every string in the JSON output (twice, as on the wire).
    #[arg(long, global = true, default_value = "false")]
    pub obfuscate: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage tiers
    Tier {
        #[command(subcommand)]
        action: TierCommand,
    },
    /// Import, list and revoke CDKs
    Cdk {
        #[command(subcommand)]
        action: CdkCommand,
    },
    /// Redeem one code of a tier for a user
    Redeem {
        tier_id: i64,
        #[arg(long)]
        user_id: i64,
    },
    /// Redemption history of one user, or of everyone
    History {
        #[arg(long)]
        user_id: Option<i64>,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommand,
    },
    /// Two-step login with a single-use verification state
    Login {
        #[command(subcommand)]
        action: LoginCommand,
    },
    /// Apply or strip the boundary encoding
    Codec {
        #[command(subcommand)]
        action: CodecCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TierCommand {
    List,
    /// Active tiers only, as users see them
    Active,
    Show { id: i64 },
    Create(TierArgs),
    Update {
        id: i64,
        #[command(flatten)]
        tier: TierArgs,
    },
    Delete { id: i64 },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TierArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value_t = 0)]
    pub quota: i64,
    #[arg(long, default_value_t = 0)]
    pub required_level: i64,
    #[arg(long, default_value_t = 0)]
    pub daily_limit: i64,
    #[arg(long, default_value_t = 0)]
    pub sort_order: i64,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub active: bool,
}

impl From<TierArgs> for TierDraft {
    fn from(args: TierArgs) -> Self {
        TierDraft {
            name: args.name,
            quota: args.quota,
            required_level: args.required_level,
            daily_limit: args.daily_limit,
            sort_order: args.sort_order,
            is_active: args.active,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CdkCommand {
    /// Import plaintext codes, given inline or one per line in --file
    Import {
        tier_id: i64,
        #[arg(long)]
        file: Option<PathBuf>,
        codes: Vec<String>,
    },
    List {
        #[arg(long)]
        tier_id: Option<i64>,
        /// available, locked, redeemed, revoked (or 0-3)
        #[arg(long)]
        status: Option<CdkStatus>,
    },
    Revoke { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    Upsert(ProfileArgs),
    List,
    Show {
        id: Option<i64>,
        #[arg(long, conflicts_with = "id")]
        external_id: Option<i64>,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(long)]
    pub external_id: i64,
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value_t = 0)]
    pub trust_level: i64,
    #[arg(long, default_value = "false")]
    pub admin: bool,
}

impl From<ProfileArgs> for UserProfile {
    fn from(args: ProfileArgs) -> Self {
        UserProfile {
            external_id: args.external_id,
            username: args.username,
            name: args.name,
            trust_level: args.trust_level,
            is_admin: args.admin,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum LoginCommand {
    /// Issue a verification state
    Start,
    /// Accept a state once and store the profile
    Finish {
        #[arg(long)]
        state: String,
        #[command(flatten)]
        profile: ProfileArgs,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CodecCommand {
    Encode { text: String },
    Decode { text: String },
}

fn init_tracing(filter: &str) {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("log bridge not installed: {e}");
    }
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{filter}': {e}");
        EnvFilter::new(config::DEFAULT_LOG_FILTER)
    });
    let sub = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(&args)?;
    init_tracing(&config.log_filter);

    let ctx = ServerContext::new(&config).await?;
    info!("duidui started. data_dir={}", ctx.db.data_dir().display());

    match commands::execute(&ctx, args.command).await {
        Ok(output) => {
            println!("{}", commands::render(output, args.obfuscate)?);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(e.into())
        }
    }
}
