//! CLI command: `vaakku quota`
//!
//! Shows the free tries left for an anonymous caller, or the credits of a
//! logged-in user.

use vaakku_client::VaakkuClient;
use vaakku_core::{Feature, QuotaState};

/// Run the quota subcommand.
pub fn run(client: &VaakkuClient, json: bool) -> anyhow::Result<()> {
    if json {
        run_json(client)
    } else {
        run_table(client);
        Ok(())
    }
}

/// Pretty-printed table output.
fn run_table(client: &VaakkuClient) {
    println!();
    if client.session().is_authenticated() {
        let user = client.session().user();
        let email = user.as_ref().map(|u| u.email.as_str()).unwrap_or("unknown");
        println!("  Logged in as {}: no free-tier limits apply", email);
        if let Some(credits) = user.and_then(|u| u.credits) {
            println!("  Credits: {}", credits);
        }
        println!();
        return;
    }

    println!("  Free tries (anonymous)");
    println!("  {}", "-".repeat(44));
    println!("  {:<18} {:<8} {:<8} Left", "Feature", "Used", "Limit");
    println!("  {}", "-".repeat(44));

    let tracker = client.tracker();
    for feature in Feature::ALL {
        let limit = tracker.limit(feature);
        let left = match tracker.state(feature) {
            QuotaState::Available { remaining } => remaining.to_string(),
            QuotaState::Exhausted => "0 !!".to_string(),
        };
        println!(
            "  {:<18} {:<8} {:<8} {}",
            feature.label(),
            tracker.usage(feature),
            limit,
            left
        );
    }
    println!("  {}", "-".repeat(44));
    println!("  Sign up for full access: vaakku signup");
    println!();
}

/// JSON output for scripting.
fn run_json(client: &VaakkuClient) -> anyhow::Result<()> {
    let output = if client.session().is_authenticated() {
        let user = client.session().user();
        serde_json::json!({
            "mode": "authenticated",
            "email": user.as_ref().map(|u| u.email.clone()),
            "credits": user.and_then(|u| u.credits),
        })
    } else {
        let tracker = client.tracker();
        let features: serde_json::Map<String, serde_json::Value> = Feature::ALL
            .iter()
            .map(|&f| {
                (
                    f.as_str().to_string(),
                    serde_json::json!({
                        "used": tracker.usage(f),
                        "limit": tracker.limit(f),
                        "remaining": tracker.remaining(f),
                        "exhausted": tracker.is_exhausted(f),
                    }),
                )
            })
            .collect();
        serde_json::json!({
            "mode": "anonymous",
            "anonymous_id": client.identity().anonymous_id(),
            "features": features,
        })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One-line quota notice after a metered call; silent when logged in.
pub fn print_remaining(client: &VaakkuClient, feature: Feature) {
    match client.quota(feature) {
        Some(QuotaState::Available { remaining }) => eprintln!(
            "{} of {} free {} tries left.",
            remaining,
            feature.anonymous_limit(),
            feature.label()
        ),
        Some(QuotaState::Exhausted) => eprintln!(
            "You've used all free {} tries. Sign up for more: vaakku signup",
            feature.label()
        ),
        None => {}
    }
}
