use std::path::PathBuf;

use clap::Parser;

use crate::preprocess::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Maximum accepted upload size (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Brain scan classification server.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// ONNX export of the trained classifier.
    #[arg(long, env = "MODEL_PATH", default_value = "brain_tumor_recognizer_model.onnx")]
    pub model_path: PathBuf,

    /// Directory for in-flight uploads. Created if missing.
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    #[arg(long, env = "IMAGE_HEIGHT", default_value_t = DEFAULT_HEIGHT)]
    pub image_height: u32,

    #[arg(long, env = "IMAGE_WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub image_width: u32,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            dir: self.upload_dir.clone(),
            max_bytes: self.max_upload_bytes,
        }
    }
}

/// What the prediction handler needs to know about storing uploads.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["brain-scan-classifier"]).unwrap();
        assert_eq!(config.image_height, 180);
        assert_eq!(config.image_width, 180);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "brain-scan-classifier",
            "--port",
            "8080",
            "--model-path",
            "/models/scan.onnx",
            "--max-upload-bytes",
            "1024",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.model_path, PathBuf::from("/models/scan.onnx"));
        assert_eq!(config.upload_settings().max_bytes, 1024);
    }
}
