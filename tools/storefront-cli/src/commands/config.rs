//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use storefront_data::AccessToken;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

/// Config safe to print: the access token is masked.
fn redacted(config: &CliConfig) -> CliConfig {
    let mut config = config.clone();
    if config.session.access_token.is_some() {
        config.session.access_token = Some(AccessToken::new("***"));
    }
    config
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = redacted(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv(
        "timeout.connect",
        &format!("{}ms", config.api.timeout.connect.as_millis()),
    );
    ctx.output.kv(
        "timeout.request",
        &format!("{}ms", config.api.timeout.request.as_millis()),
    );
    ctx.output.kv("max_retries", &config.api.max_retries.to_string());

    ctx.output.info("[cart]");
    ctx.output.kv("debounce", &format!("{}ms", config.cart.debounce.as_millis()));

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level.to_string());
    ctx.output.kv("format", &format!("{:?}", config.logging.format).to_lowercase());

    ctx.output.info("[session]");
    ctx.output.kv(
        "access_token",
        if config.session.access_token.is_some() {
            "***"
        } else {
            "(not set)"
        },
    );
    if let Some(user_id) = &config.session.user_id {
        ctx.output.kv("user_id", user_id.as_str());
    }
    if !config.session.email.is_empty() {
        ctx.output.kv("email", &config.session.email);
    }

    ctx.output.info("[display]");
    ctx.output.kv("currency_symbol", &config.display.currency_symbol);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let path = ctx.cwd.join(CONFIG_NAMES[0]);
    if path.exists() && !force {
        bail!("{} already exists. Use --force to overwrite.", path.display());
    }

    fs::write(&path, generate_default_config())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    ctx.output.success(&format!("Created {}", path.display()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_masks_token() {
        let config = CliConfig::default()
            .with_overrides(|key| (key == "STOREFRONT_ACCESS_TOKEN").then(|| "secret".to_string()));

        let shown = redacted(&config);
        let json = serde_json::to_string(&shown).unwrap();

        assert!(!json.contains("secret"));
        assert_eq!(shown.session.access_token, Some(AccessToken::new("***")));
    }

    #[test]
    fn test_redacted_leaves_missing_token() {
        let shown = redacted(&CliConfig::default());
        assert!(shown.session.access_token.is_none());
    }
}
