//! Dhwani CLI - command-line interface to the voice assistant pipeline
//!
//! Examples:
//!   dhwani chat                       # Interactive conversation
//!   dhwani ask "what time is it"      # One query with stage breakdown
//!   dhwani transcribe query.wav       # Speech to text
//!   dhwani say "namaskaram" -o out.wav
//!   dhwani intent "remind me at 5pm"  # Inspect intent classification

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use dhwani_core::{AsrBackend, AsrModelSize, ChatModelSize, ComputeDevice, PipelineConfig, TtsBackend};

#[derive(Parser)]
#[command(
    name = "dhwani",
    about = "Multilingual voice assistant pipeline",
    version = env!("CARGO_PKG_VERSION"),
    arg_required_else_help = true,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target language tag (e.g. ml, hi, en)
    #[arg(short, long, global = true, default_value = "ml", env = "DHWANI_LANGUAGE")]
    language: String,

    /// Speech-recognition backend (whisper, meta-asr)
    #[arg(long, global = true, default_value = "whisper", env = "DHWANI_ASR_BACKEND")]
    asr_backend: String,

    /// Speech-recognition model size (tiny, base, small, medium, large)
    #[arg(long, global = true, default_value = "base", env = "DHWANI_ASR_SIZE")]
    asr_size: String,

    /// Chat model size (0.5b, 1.5b, 3b, 7b)
    #[arg(long, global = true, default_value = "1.5b", env = "DHWANI_CHAT_SIZE")]
    chat_size: String,

    /// Speech-synthesis backend (mms, cartesia, indic)
    #[arg(long, global = true, default_value = "mms", env = "DHWANI_TTS_BACKEND")]
    tts_backend: String,

    /// Compute target advertised to the model servers (cuda, cpu)
    #[arg(long, global = true, default_value = "cuda", env = "DHWANI_DEVICE")]
    device: String,

    /// Disable intent detection
    #[arg(long, global = true)]
    no_intent: bool,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive conversation through the full pipeline
    ///
    /// Type 'quit' to exit and 'clear' to reset the conversation history.
    Chat,

    /// Process a single text query and print the stage breakdown
    Ask {
        /// Query text in the target language (or English with -l en)
        text: String,

        /// Save the synthesized reply to this WAV file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Transcribe an audio file
    Transcribe {
        /// Audio file to transcribe
        file: PathBuf,
    },

    /// Synthesize speech from text
    Say {
        /// Text to synthesize
        text: String,

        /// Output WAV file
        #[arg(short, long, default_value = "reply.wav")]
        output: PathBuf,
    },

    /// Classify intent for a text input
    Intent {
        /// Text to classify
        text: String,
    },
}

impl Cli {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        Ok(PipelineConfig {
            asr_backend: AsrBackend::parse(&self.asr_backend)?,
            asr_model_size: AsrModelSize::parse(&self.asr_size)?,
            chat_model_size: ChatModelSize::parse(&self.chat_size)?,
            tts_backend: TtsBackend::parse(&self.tts_backend)?,
            device: ComputeDevice::parse(&self.device)?,
            language: self.language.clone(),
            detect_intent: !self.no_intent,
            ..PipelineConfig::default()
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt::init();
    }

    let config = cli.pipeline_config()?;

    match &cli.command {
        Commands::Chat => commands::chat::execute(config).await,
        Commands::Ask { text, output } => {
            commands::ask::execute(config, text, output.as_deref()).await
        }
        Commands::Transcribe { file } => commands::transcribe::execute(config, file).await,
        Commands::Say { text, output } => commands::say::execute(config, text, output).await,
        Commands::Intent { text } => commands::intent::execute(text).await,
    }
}
