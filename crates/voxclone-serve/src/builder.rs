use crate::config::{validate_config, ServiceConfig};
use crate::error::Result;
use std::sync::Arc;
use voxclone_speech::{
    ModelLoader, PresetRegistry, SynthesisEngine, SynthesisService, TransientStore, WavEncoder,
};

/// Model loader for the backend compiled into this build
pub fn create_loader(config: &ServiceConfig) -> Result<Arc<dyn ModelLoader>> {
    #[cfg(feature = "pocket-tts")]
    {
        use voxclone_speech::providers::pocket_tts::PocketTtsLoader;

        log::info!(
            "Using Pocket-TTS backend (variant: {})",
            config.engine.pocket_tts.model_variant
        );
        Ok(Arc::new(PocketTtsLoader::new(config.engine.pocket_tts.clone())))
    }

    #[cfg(not(feature = "pocket-tts"))]
    {
        let _ = config;
        Err(crate::error::ServeError::ConfigError(
            "No synthesis backend compiled in. Rebuild with --features pocket-tts".to_string(),
        ))
    }
}

/// Wire engine, presets, transient storage and encoder into a service.
///
/// The engine is returned unloaded; call `initialize()` on it before serving.
/// Nothing in the transient directory is removed here, so one-shot callers can share
/// it with a running server.
pub async fn build_service(
    config: &ServiceConfig,
    loader: Arc<dyn ModelLoader>,
) -> Result<SynthesisService> {
    validate_config(config)?;

    let engine = Arc::new(SynthesisEngine::new(loader, config.engine.device));
    let presets = PresetRegistry::with_extension(
        config.voices.presets_dir.clone(),
        config.voices.extension.clone(),
    );
    let transient = TransientStore::new(config.storage.temp_dir.clone())?;

    log::info!("Presets directory: {:?}", presets.dir());
    log::info!("Transient upload directory: {:?}", transient.root());

    Ok(SynthesisService::new(
        engine,
        presets,
        transient,
        WavEncoder::new(config.engine.sample_format),
    ))
}
