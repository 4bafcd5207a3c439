//! CLI commands: `login`, `signup`, `logout`, `whoami`, `history`, `api-key`

use super::{report, ApiKeyAction};
use anyhow::Context;
use inquire::{Password, PasswordDisplayMode, Text};
use std::path::PathBuf;
use vaakku_client::VaakkuClient;
use vaakku_core::password::{password_requirements, validate_password};
use vaakku_core::{CallerIdentity, Feature, SecureString, UserProfile};

fn prompt_email(email: Option<String>) -> anyhow::Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Ok(Text::new("Email:")
            .with_validator(inquire::required!())
            .prompt()?),
    }
}

fn print_profile(user: &UserProfile) {
    println!("  Email:    {}", user.email);
    if let Some(credits) = user.credits {
        println!("  Credits:  {}", credits);
    }
    println!(
        "  API key:  {}",
        if user.has_sarvam_key { "your own" } else { "shared" }
    );
    if user.is_admin {
        println!("  Role:     admin");
    }
}

/// Log in with email and password
pub async fn login(client: &VaakkuClient, email: Option<String>) -> anyhow::Result<()> {
    let email = prompt_email(email)?;
    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let user = client
        .login(&email, &SecureString::new(password))
        .await
        .map_err(report)?;

    println!("Logged in as {}", user.email);
    Ok(())
}

/// Create an account
pub async fn signup(client: &VaakkuClient, email: Option<String>) -> anyhow::Result<()> {
    let email = prompt_email(email)?;
    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_custom_confirmation_message("Confirm password:")
        .with_help_message("8+ characters with upper and lower case, a number and a symbol")
        .prompt()?;

    if validate_password(&password).is_some() {
        eprintln!("Password requirements:");
        for req in password_requirements(&password) {
            eprintln!("  [{}] {}", if req.met { "x" } else { " " }, req.label);
        }
    }

    let user = client
        .signup(&email, &SecureString::new(password))
        .await
        .map_err(report)?;

    println!("Account created. Logged in as {}", user.email);
    Ok(())
}

/// Forget the local session
pub fn logout(client: &VaakkuClient) -> anyhow::Result<()> {
    client.logout().map_err(report)?;
    println!("Logged out.");
    Ok(())
}

/// Show who requests are sent as
pub async fn whoami(client: &VaakkuClient) -> anyhow::Result<()> {
    match client.identity().resolve() {
        CallerIdentity::Anonymous { anonymous_id } => {
            println!("Not logged in.");
            println!("  Anonymous id: {}", anonymous_id);
        }
        CallerIdentity::Authenticated { .. } => match client.refresh_user().await {
            Some(user) => print_profile(&user),
            // Refresh may have ended the session
            None if !client.session().is_authenticated() => {
                println!("Your session has expired. Run `vaakku login`.");
            }
            None => println!("Logged in, but the profile could not be loaded."),
        },
    }
    Ok(())
}

fn require_login_for_history(client: &VaakkuClient) -> anyhow::Result<()> {
    if !client.session().is_authenticated() {
        anyhow::bail!("History is available after logging in. Run `vaakku login`.");
    }
    Ok(())
}

/// Show recent results
pub async fn history(client: &VaakkuClient, kind: Option<Feature>) -> anyhow::Result<()> {
    require_login_for_history(client)?;

    let items = client.history(kind).await.map_err(report)?;
    if items.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    for (n, entry) in items.iter().enumerate() {
        let when = entry
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let label = entry.feature().map_or(entry.kind.as_str(), |f| f.label());
        println!("{:>2}. {:<16} {}", n + 1, when, label);
        if !entry.input.is_empty() {
            println!("  in:  {}", entry.input);
        }
        let output = entry.display_output();
        if !output.is_empty() {
            println!("  out: {}", output);
        }
    }
    Ok(())
}

/// Speak entry `n` (1-based, as listed by `history`) into a WAV file
pub async fn replay(
    client: &VaakkuClient,
    kind: Option<Feature>,
    n: usize,
    out: PathBuf,
) -> anyhow::Result<()> {
    require_login_for_history(client)?;

    let items = client.history(kind).await.map_err(report)?;
    let Some(entry) = n.checked_sub(1).and_then(|i| items.get(i)) else {
        anyhow::bail!("No history entry {} (have {}).", n, items.len());
    };
    if entry.replay_request().is_none() {
        anyhow::bail!("Entry {} has no text to play.", n);
    }

    let speech = client.replay_history(entry).await.map_err(report)?;
    let audio = speech.decode_audio().map_err(report)?;
    tokio::fs::write(&out, &audio)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!("Saved {} ({} bytes)", out.display(), audio.len());
    Ok(())
}

/// Set or clear the personal API key
pub async fn api_key(client: &VaakkuClient, action: ApiKeyAction) -> anyhow::Result<()> {
    if !client.session().is_authenticated() {
        anyhow::bail!("Log in first: `vaakku login`.");
    }

    let key = match action {
        ApiKeyAction::Set => Some(SecureString::new(
            Password::new("Sarvam API key:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .with_validator(inquire::required!())
                .prompt()?,
        )),
        ApiKeyAction::Clear => None,
    };

    let user = client
        .update_api_key(key.as_ref())
        .await
        .map_err(report)?;

    match key {
        Some(_) => println!("API key saved. Requests now use your own key."),
        None => println!("API key removed. Requests use shared credits."),
    }
    if let Some(user) = user {
        print_profile(&user);
    }
    Ok(())
}
