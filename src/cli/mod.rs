//! CLI module for Vaakku
//!
//! Metered commands (`tts`, `stt`, `translate`) work without an account
//! until the free tries run out; account commands manage the session kept
//! in the profile directory.

use crate::settings::{self, AppConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vaakku_client::{SttMode, VaakkuClient};
use vaakku_core::{Feature, UserFriendlyError};

pub mod account;
pub mod admin;
pub mod feature;
pub mod languages;
pub mod quota;

/// Vaakku speech & translation CLI
#[derive(Parser, Debug)]
#[command(name = "vaakku")]
#[command(about = "Text-to-speech, speech-to-text and translation for Indian languages")]
#[command(version)]
pub struct Cli {
    /// Profile directory (overrides storage.dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub profile: Option<PathBuf>,

    /// API base URL (overrides api.base_url)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert text to speech
    Tts {
        /// Text to speak
        text: String,
        /// Language code
        #[arg(short, long, default_value = vaakku_core::languages::DEFAULT_TTS_LANGUAGE)]
        lang: String,
        /// Voice
        #[arg(short, long, default_value = vaakku_core::languages::DEFAULT_SPEAKER)]
        speaker: String,
        /// Speaking pace (0.5 - 2.0)
        #[arg(short, long, default_value_t = 1.0)]
        pace: f32,
        /// Output WAV file
        #[arg(short, long, default_value = "speech.wav")]
        out: PathBuf,
    },
    /// Transcribe an audio file
    Stt {
        /// Audio file (WAV, MP3, M4A, OGG, FLAC, WebM)
        file: PathBuf,
        /// transcribe, translate, translit or codemix
        #[arg(short, long, default_value = "transcribe")]
        mode: SttMode,
    },
    /// Translate text
    Translate {
        /// Text to translate
        text: String,
        /// Source language code or "auto"
        #[arg(short, long, default_value = vaakku_core::languages::AUTO_DETECT)]
        from: String,
        /// Target language code
        #[arg(short, long, default_value = vaakku_core::languages::DEFAULT_TRANSLATE_TARGET)]
        to: String,
    },
    /// Log in
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account
    Signup {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Log out
    Logout,
    /// Show the current user or anonymous identity
    Whoami,
    /// Show remaining free tries
    Quota {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recent results (last 10)
    History {
        /// Only tts, stt or translate
        #[arg(short = 't', long = "type")]
        kind: Option<Feature>,
        /// Speak entry N of the list again (1 = newest)
        #[arg(long, value_name = "N")]
        play: Option<usize>,
        /// Output WAV file for --play
        #[arg(short, long, default_value = "replay.wav", requires = "play")]
        out: PathBuf,
    },
    /// Manage your personal Sarvam API key
    ApiKey {
        #[command(subcommand)]
        action: ApiKeyAction,
    },
    /// Admin tools
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// List supported languages and voices
    Languages,
}

#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Show service-wide usage
    Stats {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ApiKeyAction {
    /// Store a key (prompted)
    Set,
    /// Remove the stored key
    Clear,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Languages = command {
        languages::run();
        return Ok(());
    }

    let mut config = settings::load_config()?;
    if let Some(dir) = cli.profile {
        config.storage.dir = Some(dir);
    }
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    let client = build_client(&config)?;

    match command {
        Commands::Tts {
            text,
            lang,
            speaker,
            pace,
            out,
        } => feature::tts(&client, text, lang, speaker, pace, out).await,
        Commands::Stt { file, mode } => feature::stt(&client, file, mode).await,
        Commands::Translate { text, from, to } => feature::translate(&client, text, from, to).await,
        Commands::Login { email } => account::login(&client, email).await,
        Commands::Signup { email } => account::signup(&client, email).await,
        Commands::Logout => account::logout(&client),
        Commands::Whoami => account::whoami(&client).await,
        Commands::Quota { json } => quota::run(&client, json),
        Commands::History { kind, play, out } => match play {
            Some(n) => account::replay(&client, kind, n, out).await,
            None => account::history(&client, kind).await,
        },
        Commands::ApiKey { action } => account::api_key(&client, action).await,
        Commands::Admin { action } => admin::run(&client, action).await,
        Commands::Languages => Ok(()),
    }
}

fn build_client(config: &AppConfig) -> anyhow::Result<VaakkuClient> {
    VaakkuClient::from_config(&config.api, config.store()).map_err(report)
}

/// Print the suggestion for `err` and turn it into an `anyhow::Error`
/// whose top-level message is the user-facing one
pub(crate) fn report<E>(err: E) -> anyhow::Error
where
    E: UserFriendlyError + std::error::Error + Send + Sync + 'static,
{
    if let Some(hint) = err.suggestion() {
        eprintln!("hint: {}", hint);
    }
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}
