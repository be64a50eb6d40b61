//! Packing mode declarations and normalization.
//!
//! A raw [`PackingModeSpec`] comes straight out of the JSON config; the
//! normalizer resolves each channel reference against the texture type table
//! and produces a [`PackingMode`] that the rest of the pipeline can trust
//! without re-validating.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::texture_type::{MapKind, TextureTypeTable};

/// A packing mode as declared in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingModeSpec {
    #[serde(rename = "mode_name")]
    pub name: String,
    /// Overrides the derived output suffix when non-empty.
    pub custom_suffix: String,
    pub channels: ChannelMappingSpec,
}

/// Raw channel references, one per output slot. Each value is
/// `<type>[('.'|'_')<r|g|b>]`, e.g. `"Albedo.r"` or `"Roughness"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMappingSpec {
    #[serde(rename = "R")]
    pub r: Option<String>,
    #[serde(rename = "G")]
    pub g: Option<String>,
    #[serde(rename = "B")]
    pub b: Option<String>,
    #[serde(rename = "A")]
    pub a: Option<String>,
}

/// Output channel slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    R,
    G,
    B,
    A,
}

impl Slot {
    pub fn letter(self) -> char {
        match self {
            Slot::R => 'R',
            Slot::G => 'G',
            Slot::B => 'B',
            Slot::A => 'A',
        }
    }
}

/// Component of a three-channel source map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    R,
    G,
    B,
}

impl Component {
    pub fn letter(self) -> char {
        match self {
            Component::R => 'r',
            Component::G => 'g',
            Component::B => 'b',
        }
    }
}

/// One resolved slot: which texture type feeds it, and which component of
/// that type when the type is a color map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSource {
    /// Canonical type name from the table, e.g. `"Albedo"`.
    pub base: String,
    /// `None` for grayscale types; always `Some` for color types.
    pub component: Option<Component>,
}

impl SlotSource {
    pub fn base_lower(&self) -> String {
        self.base.to_ascii_lowercase()
    }
}

/// A fully validated packing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingMode {
    pub name: String,
    /// Uppercase suffix appended to output filenames, e.g. `"ARM"`.
    pub suffix: String,
    pub r: SlotSource,
    pub g: SlotSource,
    pub b: SlotSource,
    pub a: Option<SlotSource>,
}

impl PackingMode {
    /// Slots in output order. Alpha is included only when mapped.
    pub fn slot_sources(&self) -> impl Iterator<Item = (Slot, &SlotSource)> {
        [
            Some((Slot::R, &self.r)),
            Some((Slot::G, &self.g)),
            Some((Slot::B, &self.b)),
            self.a.as_ref().map(|a| (Slot::A, a)),
        ]
        .into_iter()
        .flatten()
    }

    /// Distinct lowercase base type names referenced by this mode.
    pub fn required_types(&self) -> BTreeSet<String> {
        self.slot_sources()
            .map(|(_, source)| source.base_lower())
            .collect()
    }

    pub fn has_alpha(&self) -> bool {
        self.a.is_some()
    }
}

fn channel_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^([a-z0-9]+)(?:[._]([rgb]))?$").expect("valid regex"))
}

fn parse_slot(
    mode: &str,
    slot: Slot,
    value: &str,
    table: &TextureTypeTable,
) -> Result<Option<SlotSource>, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let caps = channel_ref_regex().captures(value).ok_or_else(|| {
        ConfigError::InvalidChannelSyntax {
            mode: mode.to_string(),
            slot: slot.letter(),
            value: value.to_string(),
        }
    })?;
    let base = &caps[1];
    let ty = table
        .get(base)
        .ok_or_else(|| ConfigError::UnknownTextureType {
            mode: mode.to_string(),
            slot: slot.letter(),
            value: value.to_string(),
        })?;
    let declared = caps
        .get(2)
        .and_then(|m| match m.as_str().to_ascii_lowercase().as_str() {
            "r" => Some(Component::R),
            "g" => Some(Component::G),
            "b" => Some(Component::B),
            _ => None,
        });

    let component = match ty.kind {
        // A component on a grayscale map is meaningless; ignore it.
        MapKind::Grayscale => None,
        MapKind::Rgb => match declared {
            Some(c) => Some(c),
            // Default to the slot's own channel, except in alpha where
            // there is no sensible default.
            None => match slot {
                Slot::R => Some(Component::R),
                Slot::G => Some(Component::G),
                Slot::B => Some(Component::B),
                Slot::A => {
                    return Err(ConfigError::AmbiguousAlpha {
                        mode: mode.to_string(),
                        value: value.to_string(),
                    })
                }
            },
        },
    };

    Ok(Some(SlotSource {
        base: ty.name.clone(),
        component,
    }))
}

fn derive_suffix(custom: &str, slots: &[&SlotSource]) -> String {
    let custom = custom.trim();
    if !custom.is_empty() {
        return custom.to_string();
    }
    let mut seen = Vec::new();
    let mut suffix = String::new();
    for source in slots {
        let lower = source.base_lower();
        if seen.contains(&lower) {
            continue;
        }
        if let Some(first) = source.base.chars().next() {
            suffix.push(first.to_ascii_uppercase());
        }
        seen.push(lower);
    }
    suffix
}

/// Validate and resolve every declared mode against the type table.
///
/// Modes with a blank name are silently skipped; anything else wrong is a
/// hard error so that a bad config never half-runs.
pub fn normalize_modes(
    specs: &[PackingModeSpec],
    table: &TextureTypeTable,
) -> Result<Vec<PackingMode>, ConfigError> {
    let mut modes = Vec::new();
    for spec in specs {
        let name = spec.name.trim();
        if name.is_empty() {
            continue;
        }

        let mut resolve_required = |slot: Slot, value: &Option<String>| {
            parse_slot(name, slot, value.as_deref().unwrap_or(""), table)?.ok_or(
                ConfigError::MissingChannel {
                    mode: name.to_string(),
                    slot: slot.letter(),
                },
            )
        };
        let r = resolve_required(Slot::R, &spec.channels.r)?;
        let g = resolve_required(Slot::G, &spec.channels.g)?;
        let b = resolve_required(Slot::B, &spec.channels.b)?;
        let a = parse_slot(name, Slot::A, spec.channels.a.as_deref().unwrap_or(""), table)?;

        let mut slots: Vec<&SlotSource> = vec![&r, &g, &b];
        if let Some(a) = a.as_ref() {
            slots.push(a);
        }
        let suffix = derive_suffix(&spec.custom_suffix, &slots);

        modes.push(PackingMode {
            name: name.to_string(),
            suffix,
            r,
            g,
            b,
            a,
        });
    }
    Ok(modes)
}
