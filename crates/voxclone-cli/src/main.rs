use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use voxclone_serve::{build_service, create_loader, parse_yaml_file, serve, ServiceConfig};
use voxclone_speech::{DevicePreference, PresetRegistry, SynthesisService};

#[derive(Parser)]
#[command(name = "voxclone")]
#[command(about = "Voxclone - Voice-cloning speech synthesis service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve speech synthesis over HTTP
    Serve {
        #[command(flatten)]
        overrides: ConfigArgs,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List the preset voices available for synthesis
    Voices {
        #[command(flatten)]
        overrides: ConfigArgs,
    },
    /// Synthesize a single utterance to a WAV file
    Synthesize {
        #[command(flatten)]
        overrides: ConfigArgs,

        /// Text to speak
        #[arg(short, long)]
        text: String,

        /// Preset voice id (conflicts with --reference)
        #[arg(short, long, conflicts_with = "reference", required_unless_present = "reference")]
        voice: Option<String>,

        /// Reference audio file to clone the voice from (conflicts with --voice)
        #[arg(short, long, conflicts_with = "voice")]
        reference: Option<PathBuf>,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to a service configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding preset voice samples
    #[arg(long)]
    presets_dir: Option<PathBuf>,

    /// Directory for uploaded reference audio
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Compute device: auto, cpu, cuda or metal
    #[arg(long)]
    device: Option<DevicePreference>,
}

impl ConfigArgs {
    fn load(self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("Loading configuration from {:?}", path);
                parse_yaml_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
            }
            None => ServiceConfig::default(),
        };

        if let Some(dir) = self.presets_dir {
            config.voices.presets_dir = dir;
        }
        if let Some(dir) = self.temp_dir {
            config.storage.temp_dir = dir;
        }
        if let Some(device) = self.device {
            config.engine.device = device;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            overrides,
            host,
            port,
        } => {
            let mut config = overrides.load()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve_speech(config).await?;
        }
        Commands::Voices { overrides } => {
            list_voices(overrides.load()?).await?;
        }
        Commands::Synthesize {
            overrides,
            text,
            voice,
            reference,
            output,
        } => {
            let config = overrides.load()?;
            synthesize_to_file(config, &text, voice, reference, &output).await?;
        }
    }

    Ok(())
}

async fn start_service(config: &ServiceConfig) -> Result<SynthesisService> {
    let loader = create_loader(config)?;
    let service = build_service(config, loader).await?;

    log::info!(
        "Loading synthesis model on {}",
        service.engine().current_device()
    );
    service
        .engine()
        .initialize()
        .await
        .context("Failed to load synthesis model")?;
    log::info!("Synthesis model ready");

    Ok(service)
}

async fn serve_speech(config: ServiceConfig) -> Result<()> {
    let service = start_service(&config).await?;

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );
    serve(config.server, service).await?;

    Ok(())
}

async fn list_voices(config: ServiceConfig) -> Result<()> {
    let registry =
        PresetRegistry::with_extension(config.voices.presets_dir, config.voices.extension);
    let voices = registry.list().await?;

    if voices.is_empty() {
        log::warn!("No preset voices found in {:?}", registry.dir());
    }
    for voice in voices {
        println!("{}", voice);
    }

    Ok(())
}

async fn synthesize_to_file(
    config: ServiceConfig,
    text: &str,
    voice: Option<String>,
    reference: Option<PathBuf>,
    output: &Path,
) -> Result<()> {
    let service = start_service(&config).await?;

    let audio = match (voice, reference) {
        (Some(voice), _) => service.generate_from_preset(text, &voice).await?,
        (None, Some(reference)) => {
            let sample = tokio::fs::read(&reference)
                .await
                .with_context(|| format!("Failed to read {}", reference.display()))?;
            let name = reference
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("reference");
            service.generate_from_upload(text, &sample, name).await?
        }
        (None, None) => anyhow::bail!("Either --voice or --reference must be specified"),
    };

    tokio::fs::write(output, &audio.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({} ms, {} Hz)",
        output.display(),
        audio.duration_ms,
        audio.sample_rate
    );
    Ok(())
}
