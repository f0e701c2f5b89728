//! duidui-server/src/commands.rs
//!
//! Runs one parsed subcommand against the services and returns its result
//! as JSON.

use std::path::Path;

use duidui_common::models::CdkFilter;
use duidui_core::{Error, codec};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::context::ServerContext;
use crate::{CdkCommand, CodecCommand, Command, LoginCommand, TierCommand, UserCommand};

pub async fn execute(ctx: &ServerContext, command: Command) -> Result<Value, Error> {
    debug!("Executing {:?}", command);
    match command {
        Command::Tier { action } => tier_command(ctx, action).await,
        Command::Cdk { action } => cdk_command(ctx, action).await,
        Command::Redeem { tier_id, user_id } => {
            to_json(ctx.redeem_service.redeem(tier_id, user_id).await?)
        }
        Command::History { user_id } => match user_id {
            Some(uid) => to_json(ctx.redeem_service.list_user_redemptions(uid).await?),
            None => to_json(ctx.redeem_service.list_all_redemptions().await?),
        },
        Command::User { action } => user_command(ctx, action).await,
        Command::Login { action } => login_command(ctx, action).await,
        Command::Codec { action } => match action {
            CodecCommand::Encode { text } => Ok(json!({ "encoded": codec::encode(&text) })),
            CodecCommand::Decode { text } => Ok(json!({ "decoded": codec::decode(&text)? })),
        },
    }
}

/// Pretty JSON; with `obfuscate` every string is encoded first.
pub fn render(output: Value, obfuscate: bool) -> Result<String, Error> {
    let output = if obfuscate { codec::encode_strings(output) } else { output };
    Ok(serde_json::to_string_pretty(&output)?)
}

async fn tier_command(ctx: &ServerContext, action: TierCommand) -> Result<Value, Error> {
    let tiers = &ctx.tier_service;
    match action {
        TierCommand::List => to_json(tiers.list_tiers().await?),
        TierCommand::Active => to_json(tiers.list_active_tiers().await?),
        TierCommand::Show { id } => to_json(tiers.get_tier(id).await?),
        TierCommand::Create(args) => to_json(tiers.create_tier(&args.into()).await?),
        TierCommand::Update { id, tier } => to_json(tiers.update_tier(id, &tier.into()).await?),
        TierCommand::Delete { id } => {
            tiers.delete_tier(id).await?;
            Ok(json!({ "deleted": id }))
        }
    }
}

async fn cdk_command(ctx: &ServerContext, action: CdkCommand) -> Result<Value, Error> {
    match action {
        CdkCommand::Import { tier_id, file, mut codes } => {
            if let Some(path) = file {
                codes.extend(read_code_file(&path).await?);
            }
            to_json(ctx.cdk_service.import_codes(tier_id, &codes).await?)
        }
        CdkCommand::List { tier_id, status } => {
            to_json(ctx.cdk_service.list_cdks(&CdkFilter { tier_id, status }).await?)
        }
        CdkCommand::Revoke { id } => to_json(ctx.cdk_service.revoke_cdk(id).await?),
    }
}

async fn user_command(ctx: &ServerContext, action: UserCommand) -> Result<Value, Error> {
    let users = &ctx.user_service;
    match action {
        UserCommand::Upsert(profile) => to_json(users.upsert_user(&profile.into()).await?),
        UserCommand::List => to_json(users.list_users().await?),
        UserCommand::Show { id, external_id } => match (id, external_id) {
            (Some(id), _) => to_json(users.get_user(id).await?),
            (None, Some(ext)) => to_json(users.get_user_by_external_id(ext).await?),
            (None, None) => Err(Error::Validation("give a user id or --external-id".into())),
        },
    }
}

async fn login_command(ctx: &ServerContext, action: LoginCommand) -> Result<Value, Error> {
    match action {
        LoginCommand::Start => {
            let state = ctx.login_service.start().await?;
            info!("Login started; finish within {}s", ctx.state_ttl.num_seconds());
            Ok(json!({ "state": state, "expires_in_secs": ctx.state_ttl.num_seconds() }))
        }
        LoginCommand::Finish { state, profile } => {
            to_json(ctx.login_service.finish(&state, &profile.into()).await?)
        }
    }
}

async fn read_code_file(path: &Path) -> Result<Vec<String>, Error> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content.lines().map(str::to_string).collect())
}

fn to_json<T: Serialize>(value: T) -> Result<Value, Error> {
    Ok(serde_json::to_value(value)?)
}
