//! Command line definitions
//!
//! - `say` -- speak a text into a call
//! - `play` -- play a bundled sound or an audio URL
//! - `ivr` -- ask the caller to pick a language
//! - `hangup` -- end a call for everyone
//! - `transfer` -- transfer a call to a phone number
//! - `stream start|stop` -- toggle audio streaming
//! - `events` -- decode a callback body
//! - `config` -- print the loaded settings

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use voicebot_config::Sound;
use voicebot_core::{OperationContext, SpeakingStyle};

#[derive(Parser, Debug)]
#[command(
    name = "voicebot",
    version = env!("CARGO_PKG_VERSION"),
    about = "Control live voicebot calls"
)]
pub struct Cli {
    /// Directory holding default.yaml and {env}.yaml
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    /// Configuration environment
    #[arg(long, global = true, env = "VOICEBOT_ENV")]
    pub env: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Which call to act on
#[derive(Args, Debug, Clone)]
pub struct CallArgs {
    /// Call connection id reported by the backend
    #[arg(long, env = "VOICEBOT_CONNECTION_ID")]
    pub connection_id: String,

    /// Caller phone number, E.164
    #[arg(long, default_value = "")]
    pub phone_number: String,

    /// Language short code; defaults to the configured default language
    #[arg(long)]
    pub lang: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Speak a text into the call
    Say {
        #[command(flatten)]
        call: CallArgs,

        text: String,

        #[arg(long, value_enum, default_value_t = StyleArg::None)]
        style: StyleArg,

        #[arg(long, value_enum)]
        context: Option<ContextArg>,

        /// Do not record the text in the call history
        #[arg(long)]
        no_store: bool,
    },

    /// Play a bundled sound or an audio URL
    Play {
        #[command(flatten)]
        call: CallArgs,

        #[arg(long, value_enum, conflicts_with = "url")]
        sound: Option<SoundArg>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long, value_enum)]
        context: Option<ContextArg>,
    },

    /// Ask the caller to pick a language
    Ivr {
        #[command(flatten)]
        call: CallArgs,
    },

    /// End the call for everyone
    Hangup {
        #[command(flatten)]
        call: CallArgs,
    },

    /// Transfer the call
    Transfer {
        #[command(flatten)]
        call: CallArgs,

        /// Target phone number, E.164
        target: String,

        #[arg(long, value_enum)]
        context: Option<ContextArg>,
    },

    /// Start or stop audio streaming
    Stream {
        #[command(flatten)]
        call: CallArgs,

        #[arg(value_enum)]
        action: StreamAction,
    },

    /// Decode a callback body (JSON array of events) from a file
    Events { path: PathBuf },

    /// Print the loaded settings, access key redacted
    Config,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    None,
    Cheerful,
    Empathetic,
    Sad,
}

impl From<StyleArg> for SpeakingStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::None => SpeakingStyle::None,
            StyleArg::Cheerful => SpeakingStyle::Cheerful,
            StyleArg::Empathetic => SpeakingStyle::Empathetic,
            StyleArg::Sad => SpeakingStyle::Sad,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextArg {
    ConnectAgent,
    Goodbye,
    IvrLangSelect,
    TransferFailed,
}

impl From<ContextArg> for OperationContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::ConnectAgent => OperationContext::ConnectAgent,
            ContextArg::Goodbye => OperationContext::Goodbye,
            ContextArg::IvrLangSelect => OperationContext::IvrLangSelect,
            ContextArg::TransferFailed => OperationContext::TransferFailed,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundArg {
    Loading,
    Ready,
}

impl From<SoundArg> for Sound {
    fn from(arg: SoundArg) -> Self {
        match arg {
            SoundArg::Loading => Sound::Loading,
            SoundArg::Ready => Sound::Ready,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamAction {
    Start,
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_say() {
        let cli = Cli::try_parse_from([
            "voicebot",
            "say",
            "--connection-id",
            "abc",
            "--style",
            "cheerful",
            "--context",
            "goodbye",
            "Bonjour !",
        ])
        .unwrap();

        match cli.command {
            Command::Say {
                call,
                text,
                style,
                context,
                no_store,
            } => {
                assert_eq!(call.connection_id, "abc");
                assert_eq!(text, "Bonjour !");
                assert_eq!(SpeakingStyle::from(style), SpeakingStyle::Cheerful);
                assert_eq!(context.map(OperationContext::from), Some(OperationContext::Goodbye));
                assert!(!no_store);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cli.config_dir, PathBuf::from("config"));
    }

    #[test]
    fn test_parse_context_names_match_wire_names() {
        let cli = Cli::try_parse_from([
            "voicebot",
            "transfer",
            "--connection-id",
            "abc",
            "+33100000000",
            "--context",
            "connect-agent",
        ])
        .unwrap();
        match cli.command {
            Command::Transfer { context, target, .. } => {
                assert_eq!(target, "+33100000000");
                assert_eq!(
                    context.map(|c| OperationContext::from(c).as_str()),
                    Some("connect_agent")
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_play_sound_and_url_conflict() {
        let result = Cli::try_parse_from([
            "voicebot",
            "play",
            "--connection-id",
            "abc",
            "--sound",
            "ready",
            "--url",
            "https://cdn.example.com/x.wav",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stream_action() {
        let cli = Cli::try_parse_from(["voicebot", "stream", "--connection-id", "abc", "stop"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Stream {
                action: StreamAction::Stop,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
