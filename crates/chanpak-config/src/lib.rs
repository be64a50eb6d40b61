//! ChanPak configuration: the JSON run config, the texture type table, and
//! packing mode validation.
//!
//! This crate owns everything the engine needs to know before it touches the
//! filesystem. [`PackConfig`] is the user-facing surface; [`normalize_modes`]
//! turns its raw mode declarations into [`PackingMode`]s that downstream code
//! can consume without further checks.

pub mod config;
pub mod error;
pub mod mode;
pub mod texture_type;

pub use config::{
    is_safe_folder_name, PackConfig, ResizeStrategy, ALLOWED_INPUT_EXTENSIONS,
    ALLOWED_OUTPUT_EXTENSIONS, ALPHA_INCOMPATIBLE_EXTENSIONS,
};
pub use error::ConfigError;
pub use mode::{
    normalize_modes, ChannelMappingSpec, Component, PackingMode, PackingModeSpec, Slot, SlotSource,
};
pub use texture_type::{MapKind, TextureType, TextureTypeTable};
