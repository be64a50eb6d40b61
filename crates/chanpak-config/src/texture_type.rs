//! Texture type table: the set of map types the matcher and compositor know.
//!
//! Each type carries the filename aliases it is recognized by, whether it is
//! a grayscale or full-color map, and the flat value used to synthesize it
//! when a source file is missing or unreadable.

use serde::{Deserialize, Serialize};

/// How many meaningful channels a texture type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    /// Single-channel data (roughness, height, masks).
    Grayscale,
    /// Three-channel data (albedo, normals, emissive).
    Rgb,
}

/// One entry in the texture type table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureType {
    /// Canonical display name, e.g. `"Roughness"`.
    pub name: String,
    /// Filename aliases in priority order; earlier aliases win when more
    /// than one could match the same filename.
    pub aliases: Vec<String>,
    pub kind: MapKind,
    /// Flat 0-255 value used when this type must be synthesized.
    pub default_fill: u8,
}

impl TextureType {
    fn new(name: &str, aliases: &[&str], kind: MapKind, default_fill: u8) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            kind,
            default_fill,
        }
    }
}

/// Ordered collection of texture types.
///
/// Order matters twice over: the matcher tries types in table order, and the
/// mode suffix is derived from base types in slot order against this table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureTypeTable {
    types: Vec<TextureType>,
}

impl TextureTypeTable {
    pub fn new(types: Vec<TextureType>) -> Self {
        Self { types }
    }

    /// The default table covering the common PBR map types.
    ///
    /// Aliases include frequent misspellings seen in asset packs
    /// ("roughnes", "metalnes") and single-letter shorthands.
    pub fn builtin() -> Self {
        use MapKind::{Grayscale, Rgb};
        Self::new(vec![
            TextureType::new(
                "AO",
                &["ambientocclusion", "occlusion", "ambient", "ao"],
                Grayscale,
                255,
            ),
            TextureType::new(
                "Roughness",
                &["roughness", "roughnes", "rough", "r"],
                Grayscale,
                128,
            ),
            TextureType::new(
                "Metalness",
                &["metalness", "metalnes", "metallic", "metal", "m"],
                Grayscale,
                0,
            ),
            TextureType::new(
                "Height",
                &["displacement", "height", "disp", "d", "h"],
                Grayscale,
                0,
            ),
            TextureType::new("Mask", &["opacity", "alpha", "mask"], Grayscale, 255),
            TextureType::new(
                "Translucency",
                &["translucency", "translucent", "trans", "t"],
                Grayscale,
                0,
            ),
            TextureType::new("Specular", &["specular", "spec", "s"], Grayscale, 128),
            TextureType::new(
                "Normal",
                &[
                    "normal_dx",
                    "normal_gl",
                    "normaldx",
                    "normalgl",
                    "normal",
                    "nor_dx",
                    "nor_gl",
                    "norm",
                    "nrm",
                    "n",
                ],
                Rgb,
                128,
            ),
            TextureType::new("BendNormal", &["bend_normal", "bendnormal", "bn"], Rgb, 128),
            TextureType::new("Bump", &["bump", "bp"], Grayscale, 128),
            TextureType::new(
                "Albedo",
                &[
                    "basecolor", "diffuse", "albedo", "color", "diff", "base", "a", "b",
                ],
                Rgb,
                128,
            ),
            TextureType::new("SSS", &["subsurface", "sss"], Grayscale, 0),
            TextureType::new(
                "Emissive",
                &["emissive", "emission", "emit", "glow"],
                Rgb,
                0,
            ),
            TextureType::new("Glossiness", &["glossiness", "gloss", "gl"], Grayscale, 128),
        ])
    }

    /// Look up a type by canonical name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&TextureType> {
        self.types
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_lookup_is_case_insensitive() {
        let table = TextureTypeTable::builtin();
        assert_eq!(table.get("roughness").map(|t| t.name.as_str()), Some("Roughness"));
        assert_eq!(table.get("ROUGHNESS").map(|t| t.name.as_str()), Some("Roughness"));
        assert!(table.get("velvet").is_none());
    }

    #[test]
    fn builtin_kinds_and_fills() {
        let table = TextureTypeTable::builtin();
        let ao = table.get("AO").unwrap();
        assert_eq!(ao.kind, MapKind::Grayscale);
        assert_eq!(ao.default_fill, 255);

        let normal = table.get("Normal").unwrap();
        assert_eq!(normal.kind, MapKind::Rgb);
        assert_eq!(normal.default_fill, 128);

        let metal = table.get("Metalness").unwrap();
        assert_eq!(metal.default_fill, 0);
    }

    #[test]
    fn longer_aliases_listed_before_short_ones() {
        // The matcher relies on alias order to prefer "roughness" over "r".
        let table = TextureTypeTable::builtin();
        let rough = table.get("Roughness").unwrap();
        assert_eq!(rough.aliases.first().map(String::as_str), Some("roughness"));
        assert_eq!(rough.aliases.last().map(String::as_str), Some("r"));
    }

    #[test]
    fn serde_round_trip() {
        let table = TextureTypeTable::builtin();
        let json = serde_json::to_string(&table).unwrap();
        let back: TextureTypeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
