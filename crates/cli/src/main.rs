//! voicebot operator CLI
//!
//! Drives a live call through the call automation REST API.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use voicebot_call::{CallEvent, CallMediaController, IvrLanguageMenu};
use voicebot_config::{load_settings_from, Settings, Sound};
use voicebot_core::CallSession;
use voicebot_persistence::InMemoryMessageStore;
use voicebot_transport::AcsCallAutomation;

use crate::cli::{CallArgs, Cli, Command, StreamAction};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let settings = match load_settings_from(&cli.config_dir, cli.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::debug!(
        environment = ?settings.environment,
        config_dir = %cli.config_dir.display(),
        "Configuration loaded"
    );

    match cli.command {
        Command::Say {
            call,
            text,
            style,
            context,
            no_store,
        } => {
            let controller = build_controller(&settings, &call)?;
            let played = controller
                .speak(&text, style.into(), context.map(Into::into), !no_store)
                .await?;
            if played {
                println!("played");
            } else {
                println!("call ended before the text was fully played");
            }
        }
        Command::Play {
            call,
            sound,
            url,
            context,
        } => {
            let sound_url = match (sound, url) {
                (Some(sound), _) => Sound::from(sound).url(&settings.resources),
                (None, Some(url)) => url,
                (None, None) => bail!("either --sound or --url is required"),
            };
            let controller = build_controller(&settings, &call)?;
            controller
                .play_file(&sound_url, context.map(Into::into))
                .await?;
            println!("playing {}", sound_url);
        }
        Command::Ivr { call } => {
            let controller = build_controller(&settings, &call)?;
            IvrLanguageMenu::from_config(&settings.conversation)
                .ask(&controller)
                .await?;
            println!("language menu started");
        }
        Command::Hangup { call } => {
            let controller = build_controller(&settings, &call)?;
            controller.hang_up().await?;
            println!("hung up");
        }
        Command::Transfer {
            call,
            target,
            context,
        } => {
            let controller = build_controller(&settings, &call)?;
            controller
                .transfer(&target, context.map(Into::into))
                .await?;
            println!("transfer to {} requested", target);
        }
        Command::Stream { call, action } => {
            let controller = build_controller(&settings, &call)?;
            match action {
                StreamAction::Start => controller.start_streaming().await?,
                StreamAction::Stop => controller.stop_streaming().await?,
            }
            println!("streaming {}", if action == StreamAction::Start { "started" } else { "stopped" });
        }
        Command::Events { path } => {
            let body = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            for event in CallEvent::parse_batch(&body)? {
                let contexts: Vec<_> = event
                    .contexts()?
                    .into_iter()
                    .map(|context| context.as_str())
                    .collect();
                println!(
                    "{:?} connection={} contexts=[{}] code={} choice={}",
                    event.kind,
                    event.call_connection_id.as_deref().unwrap_or("-"),
                    contexts.join(","),
                    event
                        .result_information
                        .as_ref()
                        .and_then(|info| info.code)
                        .map(|code| code.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    event.recognized_label().unwrap_or("-"),
                );
            }
        }
        Command::Config => {
            let mut value = serde_json::to_value(&settings)?;
            if let Some(key) = value.pointer_mut("/communication_services/access_key") {
                if !key.is_null() {
                    *key = serde_json::Value::String("***".to_string());
                }
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

fn build_controller(settings: &Settings, call: &CallArgs) -> Result<CallMediaController> {
    let automation = AcsCallAutomation::from_settings(&settings.communication_services)
        .context("creating call automation client")?;

    let lang = match &call.lang {
        Some(code) => settings
            .conversation
            .language(code)
            .cloned()
            .with_context(|| format!("language {} is not configured", code))?,
        None => settings.conversation.default_language(),
    };

    let session = CallSession::new(call.phone_number.clone(), lang)
        .with_voice_id(call.connection_id.clone())
        .with_prosody_rate(settings.conversation.prosody_rate);
    tracing::info!(
        call_id = %session.call_id,
        connection_id = %call.connection_id,
        lang = %session.lang.short_code,
        "Controlling call"
    );

    Ok(CallMediaController::from_settings(
        Arc::new(session),
        Arc::new(automation),
        Arc::new(InMemoryMessageStore::new()),
        settings,
    ))
}

/// Initialize tracing on stderr; stdout carries command output
fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("voicebot={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
