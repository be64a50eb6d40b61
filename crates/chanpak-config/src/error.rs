//! Error types for configuration loading and validation.

use thiserror::Error;

/// Fatal configuration errors.
///
/// Every variant here aborts the run before any file is touched; per-file
/// problems during processing are reported and recovered from instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A packing mode left one of the required R/G/B slots unmapped.
    #[error("packing mode '{mode}' is missing required channel '{slot}'")]
    MissingChannel { mode: String, slot: char },

    /// A channel value did not parse as `<type>[('.'|'_')<r|g|b>]`.
    #[error("packing mode '{mode}' has invalid syntax in channel '{slot}': '{value}'")]
    InvalidChannelSyntax {
        mode: String,
        slot: char,
        value: String,
    },

    /// A channel value referenced a texture type that is not in the type table.
    #[error("packing mode '{mode}' references unknown texture type in channel '{slot}': '{value}'")]
    UnknownTextureType {
        mode: String,
        slot: char,
        value: String,
    },

    /// A full three-channel map was assigned to the alpha slot without an
    /// explicit component; there is no principled choice of source channel.
    #[error(
        "packing mode '{mode}' assigns full RGB map '{value}' to the alpha channel; \
         alpha must reference a single channel (e.g. '{value}.r'), a grayscale map, or be empty"
    )]
    AmbiguousAlpha { mode: String, value: String },

    /// The configured output extension is not one the packer can write.
    #[error(
        "invalid FILE_TYPE '{file_type}'; supported output types are png, jpg, jpeg, tga"
    )]
    UnsupportedFileType { file_type: String },

    /// The configured output extension cannot carry an alpha channel.
    #[error(
        "output file type '{extension}' does not support alpha, but mode '{mode}' maps the alpha \
         channel; change FILE_TYPE to 'png' or 'tga' and retry"
    )]
    AlphaUnsupportedByExtension { mode: String, extension: String },

    /// A destination or backup folder name contains filesystem-unsafe characters.
    #[error("invalid folder name '{name}': it cannot contain \\ / : * ? \" < > |")]
    UnsafeFolderName { name: String },

    /// JSON parsing error while reading the configuration file.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
