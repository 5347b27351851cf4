use super::schema::ServiceConfig;
use crate::error::Result;
use std::path::Path;

pub fn parse_yaml_file<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml_str(&content)
}

pub fn parse_yaml_str(yaml: &str) -> Result<ServiceConfig> {
    let config: ServiceConfig = serde_yaml::from_str(yaml)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxclone_speech::{DevicePreference, SampleFormat};

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 9000
  max_upload_bytes: 1048576
voices:
  presets_dir: /srv/voices
storage:
  temp_dir: /tmp/uploads
engine:
  device: cuda
  sample_format: pcm16
"#;
        let config = parse_yaml_str(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_upload_bytes, 1024 * 1024);
        assert_eq!(config.voices.presets_dir.to_str(), Some("/srv/voices"));
        assert_eq!(config.voices.extension, "wav");
        assert_eq!(config.storage.temp_dir.to_str(), Some("/tmp/uploads"));
        assert_eq!(config.engine.device, DevicePreference::Cuda);
        assert_eq!(config.engine.sample_format, SampleFormat::Pcm16);
    }

    #[test]
    fn test_empty_sections_use_defaults() {
        let config = parse_yaml_str("server: {}\n").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.engine.device, DevicePreference::Auto);
    }

    #[test]
    fn test_unknown_device_is_rejected() {
        assert!(parse_yaml_str("engine:\n  device: tpu\n").is_err());
    }
}
