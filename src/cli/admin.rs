//! CLI commands: `vaakku admin`

use super::{report, AdminAction};
use vaakku_client::{AdminStats, VaakkuClient};
use vaakku_core::Feature;

/// Run an admin command
pub async fn run(client: &VaakkuClient, action: AdminAction) -> anyhow::Result<()> {
    match action {
        AdminAction::Stats { json } => stats(client, json).await,
    }
}

async fn stats(client: &VaakkuClient, json: bool) -> anyhow::Result<()> {
    if !client.session().is_authenticated() {
        anyhow::bail!("Log in first: `vaakku login`.");
    }
    // Cached profile may predate a role change
    if client.session().user().is_none_or(|u| !u.is_admin) && client.refresh_user().await.is_none() {
        anyhow::bail!("Could not load your profile. Run `vaakku whoami`.");
    }

    let stats = client.admin_stats().await.map_err(report)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }
    Ok(())
}

fn print_stats(stats: &AdminStats) {
    println!("  Total users:            {}", stats.total_users);
    println!("  Signups (last 7 days):  {}", stats.signups_last_7_days);
    println!("  Users with API key:     {}", stats.users_with_api_key_count);
    println!("  Credits (users w/ key): {}", stats.credits_users_with_key);
    println!(
        "  Most used feature:      {}",
        stats.most_used().map_or("-", Feature::label)
    );

    println!();
    println!("Usage ({} calls)", stats.usage.total());
    for feature in Feature::ALL {
        println!("  {:<16} {}", feature.label(), stats.usage.get(feature));
    }

    if stats.recent_signups.is_empty() {
        return;
    }
    println!();
    println!("Recent signups");
    for row in &stats.recent_signups {
        let created = row
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let active = row
            .last_active_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<32} joined {}  active {}", row.email, created, active);
    }
}
