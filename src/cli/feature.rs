//! CLI commands: `vaakku tts`, `vaakku stt`, `vaakku translate`

use super::{quota, report};
use anyhow::Context;
use std::path::PathBuf;
use vaakku_client::{AudioUpload, SttMode, TranslateRequest, TtsRequest, VaakkuClient};
use vaakku_core::languages::{find_language, is_known_speaker, is_valid_source, AUTO_DETECT};
use vaakku_core::Feature;

/// Synthesize `text` into a WAV file
pub async fn tts(
    client: &VaakkuClient,
    text: String,
    lang: String,
    speaker: String,
    pace: f32,
    out: PathBuf,
) -> anyhow::Result<()> {
    let Some(language) = find_language(&lang) else {
        anyhow::bail!("Unsupported language '{}'. Run `vaakku languages`.", lang);
    };
    if !is_known_speaker(&speaker) {
        anyhow::bail!("Unknown voice '{}'. Run `vaakku languages`.", speaker);
    }

    let request = TtsRequest::new(text)
        .with_language(language.code)
        .with_speaker(speaker)
        .with_pace(pace);

    let speech = client.text_to_speech(request).await.map_err(report)?;
    let audio = speech.decode_audio().map_err(report)?;
    tokio::fs::write(&out, &audio)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!("Saved {} ({} bytes)", out.display(), audio.len());
    quota::print_remaining(client, Feature::Tts);
    Ok(())
}

/// Transcribe an audio file
pub async fn stt(client: &VaakkuClient, file: PathBuf, mode: SttMode) -> anyhow::Result<()> {
    let audio = AudioUpload::from_path(&file).await.map_err(report)?;
    let result = client.speech_to_text(audio, mode).await.map_err(report)?;

    println!("{}", result.transcript);
    if let Some(code) = result.language_code.as_deref() {
        let name = find_language(code).map(|l| l.label).unwrap_or(code);
        eprintln!("Detected language: {}", name);
    }
    quota::print_remaining(client, Feature::Stt);
    Ok(())
}

/// Translate text
pub async fn translate(
    client: &VaakkuClient,
    text: String,
    from: String,
    to: String,
) -> anyhow::Result<()> {
    if !is_valid_source(&from) {
        anyhow::bail!("Unsupported source language '{}'. Run `vaakku languages`.", from);
    }
    let Some(target) = find_language(&to) else {
        anyhow::bail!("Unsupported target language '{}'. Run `vaakku languages`.", to);
    };
    let source = find_language(&from).map_or(AUTO_DETECT, |l| l.code);
    if source == target.code {
        anyhow::bail!("Source and target language are the same.");
    }

    let request = TranslateRequest::new(text)
        .with_source(source)
        .with_target(target.code);
    let translated = client.translate(request).await.map_err(report)?;

    println!("{}", translated);
    quota::print_remaining(client, Feature::Translate);
    Ok(())
}
