use anyhow::Result;
use colored::Colorize;
use emby302_core::{load_config, Settings};
use std::path::Path;

pub fn show_config(path: &Path, port_override: Option<u16>, json: bool) -> Result<()> {
    let mut settings = load_config(path).map_err(|e| anyhow::anyhow!(e))?;
    if let Some(port) = port_override {
        settings.port = port;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&settings_json(&settings))?);
        return Ok(());
    }

    println!("{}", "Server:".cyan().bold());
    println!("  Listen: {}:{}", settings.listen_host, settings.port);
    println!("{}", "Emby:".cyan().bold());
    println!("  Host: {}", settings.emby.host);
    println!("  API Key: {}", mask_key(&settings.emby.api_key));
    println!("  Download Strategy: {}", settings.emby.download_policy);
    println!("  Timeout: {:?}", settings.emby.timeout);
    println!("{}", "Path Map:".cyan().bold());
    if settings.rules.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for rule in settings.rules.rules() {
        println!("  {} => {}", rule.from(), rule.to());
    }
    println!("{}", "Client Filter:".cyan().bold());
    if settings.client_filter.is_enabled() {
        println!("  Mode: {}", settings.client_filter.mode());
        println!("  Clients: {}", settings.client_filter.patterns().collect::<Vec<_>>().join(", "));
    } else {
        println!("  {}", "disabled".dimmed());
    }
    Ok(())
}

pub fn check_config(path: &Path) -> Result<()> {
    let settings = load_config(path)
        .map_err(|e| anyhow::anyhow!("{} is invalid: {}", path.display(), e))?;

    println!(
        "{} {} is valid ({} path-map rules, client filter {})",
        "✓".green(),
        path.display(),
        settings.rules.len(),
        if settings.client_filter.is_enabled() { "enabled" } else { "disabled" }
    );
    Ok(())
}

fn settings_json(settings: &Settings) -> serde_json::Value {
    let rules: Vec<String> =
        settings.rules.rules().iter().map(|r| format!("{} => {}", r.from(), r.to())).collect();
    let clients: Vec<&str> = settings.client_filter.patterns().collect();

    serde_json::json!({
        "server": {
            "host": settings.listen_host,
            "port": settings.port,
        },
        "emby": {
            "host": settings.emby.host,
            "api_key": mask_key(&settings.emby.api_key),
            "download_strategy": settings.emby.download_policy.to_string(),
            "timeout_secs": settings.emby.timeout.as_secs_f64(),
            "path_map": rules,
        },
        "client_filter": {
            "enabled": settings.client_filter.is_enabled(),
            "mode": settings.client_filter.mode().to_string(),
            "clients": clients,
        },
    })
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
