use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

#[cfg(not(feature = "whisper-rs"))]
use audioscribe::adapters::WhisperCliEngine;
#[cfg(feature = "whisper-rs")]
use audioscribe::adapters::WhisperRsEngine;
use audioscribe::adapters::{
    FfmpegDecoder, HostComputeProbe, SherpaDiarizer, TokenFile, TomlConfigStore,
};
use audioscribe::app::{Engines, Pipeline, RenderMode, TranscribeRequest, TranscriptWriter};
use audioscribe::domain::{AppConfig, FailureKind, ModelSize, StageOutcome};
use audioscribe::infrastructure::init_logging;
use audioscribe::ports::{ComputeProbe, ConfigStore, Diarizer, SpeechEngine, TokenStore};

/// AudioScribe - local audio transcription
#[derive(Parser, Debug)]
#[command(name = "audioscribe")]
#[command(author, version, long_about = None)]
#[command(about = "Local audio transcription with optional speaker identification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe an audio file and save the transcript
    Transcribe(TranscribeArgs),
    /// Store the credential token used for gated diarization models
    SaveToken {
        /// Token value to persist
        token: String,
    },
    /// Show resolved paths, compute profile, and engine settings
    Info,
}

#[derive(Args, Debug)]
struct TranscribeArgs {
    /// Audio file to transcribe (mp3, wav, m4a, aac, flac, ogg, wma)
    file: PathBuf,

    /// Model size: tiny, base, small, medium, large-v2, large-v3
    #[arg(short, long)]
    model: Option<String>,

    /// Language code (e.g. en, fr), or "auto" to detect
    #[arg(short, long)]
    language: Option<String>,

    /// Attempt speaker identification
    #[arg(short, long)]
    diarize: bool,

    /// Credential token for gated diarization models; overrides the saved one
    #[arg(long)]
    token: Option<String>,

    /// Directory to save the transcript into (default: Downloads)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Group lines into speaker blocks instead of per-line timestamps
    #[arg(long)]
    speaker_blocks: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store = TomlConfigStore::new().context("could not initialize the configuration store")?;
    let config = store.load().context("could not load the configuration")?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let _log_guard = init_logging(&store.logs_dir(), level, config.logging.file_logging);

    match cli.command {
        Commands::Transcribe(args) => transcribe(args, &store, &config).await,
        Commands::SaveToken { token } => save_token(&token),
        Commands::Info => info(&store, &config),
    }
}

async fn transcribe(
    args: TranscribeArgs,
    store: &TomlConfigStore,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let request = build_request(&args, config)?;
    let mut pipeline = Pipeline::new(build_engines(store, config));

    let progress: Box<dyn Fn(f32, &str) + Send + Sync> = Box::new(|fraction, label| {
        eprintln!("[{:>3.0}%] {label}", fraction * 100.0);
    });

    match pipeline.run(&request, Some(progress.as_ref())).await {
        Ok(output) => {
            println!("{}", output.transcript);
            eprintln!();
            if let StageOutcome::Skipped { reason } = &output.alignment {
                eprintln!("note: alignment skipped ({reason})");
            }
            if request.diarize {
                if let StageOutcome::Skipped { reason } = &output.diarization {
                    eprintln!("note: speaker identification skipped ({reason})");
                }
            }
            eprintln!("Detected language: {}", output.language);
            eprintln!("Saved to: {}", output.output_path.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(exit_code(err.kind()));
        }
    }
}

fn save_token(token: &str) -> anyhow::Result<()> {
    let tokens = TokenFile::new();
    let path = tokens.save(token).context("could not save the token")?;
    println!("Token saved to {}", path.display());
    Ok(())
}

fn info(store: &TomlConfigStore, config: &AppConfig) -> anyhow::Result<()> {
    let profile = HostComputeProbe::new().resolve();
    let tokens = TokenFile::new();
    let token_state = match tokens.load() {
        Ok(Some(_)) => "present",
        Ok(None) => "absent",
        Err(_) => "unreadable",
    };
    let output_dir = TranscriptWriter::new(config.output.directory.clone())
        .output_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| "unresolved (no downloads directory)".to_string());

    println!("audioscribe {}", env!("CARGO_PKG_VERSION"));
    println!("Config file:   {}", store.config_path().display());
    println!("Logs:          {}", store.logs_dir().display());
    println!("Models:        {}", models_dir(store, config).display());
    println!("Output:        {output_dir}");
    println!("Device:        {} ({})", profile.device, profile.precision);
    println!("Batch size:    {}", profile.batch_size());
    println!("Default model: {}", config.transcription.model);
    println!("Language:      {}", config.transcription.language);
    println!(
        "Token file:    {} ({token_state})",
        tokens.token_path().display()
    );
    Ok(())
}

fn build_request(args: &TranscribeArgs, config: &AppConfig) -> anyhow::Result<TranscribeRequest> {
    let model = match &args.model {
        Some(name) => name
            .parse::<ModelSize>()
            .map_err(|err| anyhow::anyhow!(err))?,
        None => config.transcription.model,
    };

    let language = match &args.language {
        Some(code) => normalize_language(code),
        None => config.transcription.language_code(),
    };

    let render_mode = if args.speaker_blocks || config.transcription.speaker_blocks {
        RenderMode::SpeakerBlocks
    } else {
        RenderMode::Timestamped
    };

    Ok(TranscribeRequest {
        input: args.file.clone(),
        model,
        language,
        diarize: args.diarize,
        token: args.token.clone(),
        render_mode,
        output_dir: args
            .output_dir
            .clone()
            .or_else(|| config.output.directory.clone()),
    })
}

fn normalize_language(code: &str) -> Option<String> {
    let code = code.trim();
    if code.is_empty() || code.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(code.to_string())
    }
}

fn build_engines(store: &TomlConfigStore, config: &AppConfig) -> Engines {
    let models_dir = models_dir(store, config);

    #[cfg(feature = "whisper-rs")]
    let speech: Arc<dyn SpeechEngine> = Arc::new(WhisperRsEngine::new(models_dir));
    #[cfg(not(feature = "whisper-rs"))]
    let speech: Arc<dyn SpeechEngine> = match &config.engine.whisper_binary {
        Some(binary) => Arc::new(WhisperCliEngine::with_binary(binary, models_dir)),
        None => Arc::new(WhisperCliEngine::new(models_dir)),
    };

    let diarizer = SherpaDiarizer::from_config(&config.diarization)
        .map(|diarizer| Arc::new(diarizer) as Arc<dyn Diarizer>);

    Engines {
        probe: Arc::new(HostComputeProbe::new()),
        decoder: Arc::new(FfmpegDecoder::new()),
        speech,
        aligner: None,
        diarizer,
        tokens: Arc::new(TokenFile::new()),
    }
}

fn models_dir(store: &TomlConfigStore, config: &AppConfig) -> PathBuf {
    config
        .engine
        .models_dir
        .clone()
        .unwrap_or_else(|| store.data_dir().join("models"))
}

/// Script-friendly exit codes, one per failure class.
fn exit_code(kind: FailureKind) -> i32 {
    match kind {
        FailureKind::InvalidInput => 2,
        FailureKind::EnvironmentMissing => 3,
        FailureKind::ResourceExhausted => 4,
        FailureKind::UnclassifiedFailure => 1,
    }
}
