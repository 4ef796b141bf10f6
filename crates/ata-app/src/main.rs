//! `ata` binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the analysis backends, voice adapters and the assistant engine
//! 4. Print engine notifications from a background task
//! 5. Drive the engine's command interface from stdin

mod cli;
mod console;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

use ata_analysis::TextAnalyzer;
use ata_assistant::recommend::DEFAULT_LIMIT;
use ata_assistant::{
    recommend, Assistant, AssistantError, CommentGate, ImmediateClock, InterestProfile,
    RecognitionResult, VoiceIo,
};
use ata_core::{AssistantEvent, AtaConfig, Sender};

use cli::CliArgs;
use console::{render, Command, ConsoleSpeaker, LineCapture};

const HELP: &str = "Comandos: /toggle  /mic  /say <fala>  /comment <texto>  /recommend  /history  /quit\n\
                    Qualquer outra linha é enviada ao assistente.";

/// Print engine notifications until the engine goes away.
async fn print_events(mut events: broadcast::Receiver<AssistantEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => print_event(&event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_event(event: &AssistantEvent) {
    match event {
        AssistantEvent::MessageAppended { message, .. } => {
            let who = match message.sender {
                Sender::User => "você",
                Sender::Assistant => "assistente",
                Sender::System => "sistema",
            };
            println!("[{}] {}", who, render(&message.content));
        }
        AssistantEvent::PlaceholderShown { .. } => println!("… digitando"),
        AssistantEvent::SessionToggled { active, .. } => {
            println!(
                "== assistente {} ==",
                if *active { "ativado" } else { "desativado" }
            );
        }
        AssistantEvent::ListeningToggled { listening, .. } => {
            if *listening {
                println!("(microfone ligado: use /say <fala>)");
            } else {
                println!("(microfone desligado)");
            }
        }
        other => tracing::debug!(event = other.event_name(), "Engine event"),
    }
}

/// Report a caller error at the prompt. These are usage hints, not failures.
fn report(result: Result<(), AssistantError>) {
    match result {
        Ok(()) => {}
        Err(AssistantError::Inactive) => println!("⚠ assistente desativado (use /toggle)"),
        Err(e) => println!("⚠ {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = AtaConfig::load_or_default(&config_file);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting ata v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Engine.
    let analyzer = TextAnalyzer::local(&config.analysis);
    tracing::info!(?analyzer, "Analysis backends ready");

    let mut voice = VoiceIo::from_config(&config.voice);
    if !args.no_voice {
        voice = voice
            .with_capture(Arc::new(LineCapture))
            .with_synthesizer(Arc::new(ConsoleSpeaker));
    }

    let mut assistant = Assistant::new(&config, analyzer).with_voice(voice);
    if let Some(seed) = args.resolve_seed(config.assistant.rng_seed) {
        assistant = assistant.with_seed(seed);
    }
    if args.instant {
        assistant = assistant.with_clock(Arc::new(ImmediateClock));
    }
    let assistant = Arc::new(assistant);
    let comments = CommentGate::new(Arc::clone(&assistant));
    let profile = InterestProfile::from_content(assistant.content());

    let caps = assistant.capabilities();
    tracing::info!(capture = caps.capture, playback = caps.playback, "Voice capabilities");

    let printer = tokio::spawn(print_events(assistant.subscribe()));

    println!("{}", HELP);

    // === REPL ===

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Toggle => {
                assistant.toggle_active().await;
            }
            Command::Mic => report(assistant.toggle_listening().await.map(|_| ())),
            Command::Say(transcript) => {
                let assistant = Arc::clone(&assistant);
                tokio::spawn(async move {
                    let result = if assistant.session().is_listening() {
                        let results = [RecognitionResult::finalized(&[transcript.as_str()])];
                        assistant.deliver_recognition(&results).await.map(|_| ())
                    } else {
                        assistant
                            .submit_voice_transcript(&transcript)
                            .await
                            .map(|_| ())
                    };
                    report(result);
                });
            }
            Command::Comment(text) => {
                println!("{}", comments.indicator(&text).await);
                println!("{}", comments.review(&text).await.notice());
            }
            Command::Recommend => {
                for entry in recommend(&assistant.content().catalog, &profile, DEFAULT_LIMIT) {
                    println!("• {} [{}]", entry.title, entry.tags.join(", "));
                }
            }
            Command::History => {
                for message in assistant.messages() {
                    println!(
                        "#{} {}: {}",
                        message.seq,
                        message.sender,
                        render(&message.content)
                    );
                }
            }
            Command::Text(text) => {
                let assistant = Arc::clone(&assistant);
                tokio::spawn(async move {
                    report(assistant.submit_text(&text).await.map(|_| ()));
                });
            }
        }
    }

    printer.abort();
    tracing::info!("Bye");
    Ok(())
}
