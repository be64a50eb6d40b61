//! Run configuration: the JSON surface users edit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mode::PackingModeSpec;
use crate::texture_type::TextureTypeTable;

/// Extensions accepted as input textures. EXR sources are decoded and
/// reduced to 8-bit on load.
pub const ALLOWED_INPUT_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tga", "exr"];

/// Extensions packed outputs may be written as.
pub const ALLOWED_OUTPUT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "tga"];

/// Output extensions that cannot carry an alpha channel.
pub const ALPHA_INCOMPATIBLE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "jfif"];

const UNSAFE_FOLDER_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Resolution mismatch policy when a set's maps disagree in size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeStrategy {
    /// Upscale everything to the largest map.
    Up,
    /// Downscale everything to the smallest map.
    Down,
}

/// Complete run configuration.
///
/// Field names mirror the JSON keys (`INPUT_FOLDER`, `FILE_TYPE`, ...), all
/// optional with sensible defaults so a minimal config only needs
/// `PACKING_MODES`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PackConfig {
    /// Root folder to scan; empty means the current directory.
    pub input_folder: String,
    /// Output extension for packed textures.
    pub file_type: String,
    /// Delete consumed source maps instead of moving them to the backup
    /// folder.
    pub delete_used: bool,
    /// Subfolder (per input folder) that receives packed outputs.
    pub dest_folder_name: String,
    /// Subfolder that receives consumed sources; empty disables backups.
    pub backup_folder_name: String,
    /// `"up"` or `"down"`; anything else warns and falls back to `"down"`.
    pub resize_strategy: String,
    pub packing_modes: Vec<PackingModeSpec>,
    /// Print per-file diagnostics during the run.
    pub show_details: bool,
    /// Recognized resolution tokens at the end of filenames.
    pub size_suffixes: Vec<String>,
    pub texture_types: TextureTypeTable,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            input_folder: String::new(),
            file_type: "png".to_string(),
            delete_used: false,
            dest_folder_name: "created_maps".to_string(),
            backup_folder_name: String::new(),
            resize_strategy: "down".to_string(),
            packing_modes: Vec::new(),
            show_details: false,
            size_suffixes: ["512", "1k", "2k", "4k", "8k"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            texture_types: TextureTypeTable::builtin(),
        }
    }
}

impl PackConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check the parts of the config that do not need the type table:
    /// folder name safety, the output extension, and alpha support of that
    /// extension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in [&self.dest_folder_name, &self.backup_folder_name] {
            if !is_safe_folder_name(name) {
                return Err(ConfigError::UnsafeFolderName { name: name.clone() });
            }
        }

        let extension = self.file_type.trim().to_ascii_lowercase();
        if !ALLOWED_OUTPUT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ConfigError::UnsupportedFileType {
                file_type: self.file_type.clone(),
            });
        }
        if ALPHA_INCOMPATIBLE_EXTENSIONS.contains(&extension.as_str()) {
            for spec in &self.packing_modes {
                let has_alpha = spec
                    .channels
                    .a
                    .as_deref()
                    .is_some_and(|a| !a.trim().is_empty());
                if has_alpha && !spec.name.trim().is_empty() {
                    return Err(ConfigError::AlphaUnsupportedByExtension {
                        mode: spec.name.trim().to_string(),
                        extension,
                    });
                }
            }
        }
        Ok(())
    }

    /// The strategy actually applied; unknown strings fall back to `Down`.
    pub fn effective_strategy(&self) -> ResizeStrategy {
        match self.resize_strategy.to_ascii_lowercase().as_str() {
            "up" => ResizeStrategy::Up,
            _ => ResizeStrategy::Down,
        }
    }

    /// Whether `resize_strategy` is one of the recognized values. Callers
    /// warn when it is not, rather than failing the run.
    pub fn strategy_is_known(&self) -> bool {
        matches!(
            self.resize_strategy.to_ascii_lowercase().as_str(),
            "up" | "down"
        )
    }

    pub fn table(&self) -> &TextureTypeTable {
        &self.texture_types
    }
}

/// Folder names may not contain path separators or Windows-reserved
/// characters. Empty names are fine (they disable the feature).
pub fn is_safe_folder_name(name: &str) -> bool {
    !name.contains(UNSAFE_FOLDER_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ChannelMappingSpec;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = PackConfig::default();
        assert_eq!(config.file_type, "png");
        assert_eq!(config.dest_folder_name, "created_maps");
        assert!(config.backup_folder_name.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let config = PackConfig::from_json_str(r#"{"FILE_TYPE": "tga"}"#).unwrap();
        assert_eq!(config.file_type, "tga");
        assert_eq!(config.resize_strategy, "down");
        assert_eq!(config.size_suffixes, vec!["512", "1k", "2k", "4k", "8k"]);
        assert!(config.table().get("Albedo").is_some());
    }

    #[test]
    fn packing_modes_parse_from_json() {
        let config = PackConfig::from_json_str(
            r#"{
                "PACKING_MODES": [
                    {
                        "mode_name": "arm",
                        "channels": {"R": "AO", "G": "Roughness", "B": "Metalness"}
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.packing_modes.len(), 1);
        assert_eq!(config.packing_modes[0].name, "arm");
        assert_eq!(config.packing_modes[0].channels.g.as_deref(), Some("Roughness"));
    }

    #[test]
    fn unsupported_file_type_is_rejected() {
        let config = PackConfig {
            file_type: "exe".to_string(),
            ..PackConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFileType { .. }));

        // Case and surrounding whitespace do not matter.
        let shouty = PackConfig {
            file_type: " TGA ".to_string(),
            ..PackConfig::default()
        };
        shouty.validate().unwrap();

        // EXR is an input format only, never an output.
        let exr = PackConfig {
            file_type: "exr".to_string(),
            ..PackConfig::default()
        };
        assert!(exr.validate().is_err());
    }

    #[test]
    fn unsafe_dest_folder_is_rejected() {
        let config = PackConfig {
            dest_folder_name: "out:maps".to_string(),
            ..PackConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnsafeFolderName { .. }));
    }

    #[test]
    fn alpha_mode_with_jpg_output_is_rejected() {
        let config = PackConfig {
            file_type: "jpg".to_string(),
            packing_modes: vec![PackingModeSpec {
                name: "rma".to_string(),
                custom_suffix: String::new(),
                channels: ChannelMappingSpec {
                    r: Some("Roughness".to_string()),
                    g: Some("Metalness".to_string()),
                    b: Some("AO".to_string()),
                    a: Some("Mask".to_string()),
                },
            }],
            ..PackConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::AlphaUnsupportedByExtension { .. }
        ));
    }

    #[test]
    fn alpha_mode_with_png_output_is_fine() {
        let config = PackConfig {
            packing_modes: vec![PackingModeSpec {
                name: "rma".to_string(),
                custom_suffix: String::new(),
                channels: ChannelMappingSpec {
                    a: Some("Mask".to_string()),
                    ..ChannelMappingSpec::default()
                },
            }],
            ..PackConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn unknown_strategy_falls_back_to_down() {
        let config = PackConfig {
            resize_strategy: "sideways".to_string(),
            ..PackConfig::default()
        };
        assert!(!config.strategy_is_known());
        assert_eq!(config.effective_strategy(), ResizeStrategy::Down);

        let up = PackConfig {
            resize_strategy: "UP".to_string(),
            ..PackConfig::default()
        };
        assert!(up.strategy_is_known());
        assert_eq!(up.effective_strategy(), ResizeStrategy::Up);
    }

    #[test]
    fn safe_folder_name_check() {
        assert!(is_safe_folder_name("created_maps"));
        assert!(is_safe_folder_name(""));
        assert!(!is_safe_folder_name("a/b"));
        assert!(!is_safe_folder_name("a?b"));
    }
}
