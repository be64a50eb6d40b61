//! Mode applicability and target resolution selection.

use std::collections::BTreeMap;

use chanpak_config::{PackingMode, ResizeStrategy};

use crate::set_builder::{TextureMapEntry, TextureSet};

pub fn is_power_of_two(n: u32) -> bool {
    (n & (n.wrapping_sub(1)) == 0) && n != 0
}

/// Maps an actual resolution back to the naming token used for it.
/// Non-square images bucket by their longer edge.
pub fn resolution_to_suffix(size: (u32, u32)) -> String {
    let longest = size.0.max(size.1);
    for (threshold, label) in [
        (512, "512"),
        (1024, "1K"),
        (2048, "2K"),
        (4096, "4K"),
        (8192, "8K"),
    ] {
        if longest <= threshold {
            return label.to_string();
        }
    }
    format!("{longest}px")
}

/// Why a mode cannot run for a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionIssue {
    /// At least one required map could not be probed.
    Unreadable,
    /// The smallest map is not power-of-two sized; packing it would break
    /// mipmap generation downstream.
    NonPowerOfTwo { width: u32, height: u32 },
}

/// A mode that qualified for a set, with the maps it will consume.
/// Maps are keyed by lowercase base type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCandidate<'a> {
    pub mode: &'a PackingMode,
    pub maps: BTreeMap<String, &'a TextureMapEntry>,
}

impl ModeCandidate<'_> {
    /// Canonical names of required types the set does not provide. These get
    /// synthesized with flat defaults during compositing.
    pub fn missing_types(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for (_, source) in self.mode.slot_sources() {
            let lower = source.base_lower();
            if !self.maps.contains_key(&lower) && !missing.contains(&source.base) {
                missing.push(source.base.clone());
            }
        }
        missing
    }
}

/// Which configured modes can run against this set.
///
/// A mode referencing one or two base types needs all of them present; a
/// mode referencing more qualifies with any two. Either way at least two
/// real maps must exist, so a lone map never produces an output.
pub fn candidate_modes<'a>(
    set: &'a TextureSet,
    modes: &'a [PackingMode],
) -> Vec<ModeCandidate<'a>> {
    let mut candidates = Vec::new();
    for mode in modes {
        let required = mode.required_types();
        let present: Vec<&String> = required
            .iter()
            .filter(|t| set.maps.contains_key(t.as_str()))
            .collect();

        let qualifies = if required.len() <= 2 {
            present.len() == required.len()
        } else {
            present.len() >= 2
        };
        if !qualifies {
            continue;
        }

        let maps: BTreeMap<String, &TextureMapEntry> = present
            .iter()
            .filter_map(|t| set.maps.get(t.as_str()).map(|m| ((*t).clone(), m)))
            .collect();
        if maps.len() < 2 {
            continue;
        }
        candidates.push(ModeCandidate { mode, maps });
    }
    candidates
}

/// Pick the resolution every map gets normalized to before packing.
pub fn pick_target_resolution(
    maps: &BTreeMap<String, &TextureMapEntry>,
    strategy: ResizeStrategy,
) -> Result<(u32, u32), ResolutionIssue> {
    let mut resolutions = Vec::with_capacity(maps.len());
    for entry in maps.values() {
        match entry.resolution {
            Some(res) => resolutions.push(res),
            None => return Err(ResolutionIssue::Unreadable),
        }
    }
    if resolutions.is_empty() {
        return Err(ResolutionIssue::Unreadable);
    }

    let area = |r: &(u32, u32)| u64::from(r.0) * u64::from(r.1);
    let min = *resolutions
        .iter()
        .min_by_key(|r| area(r))
        .unwrap_or(&resolutions[0]);
    let max = *resolutions
        .iter()
        .max_by_key(|r| area(r))
        .unwrap_or(&resolutions[0]);

    if !is_power_of_two(min.0) || !is_power_of_two(min.1) {
        return Err(ResolutionIssue::NonPowerOfTwo {
            width: min.0,
            height: min.1,
        });
    }

    if resolutions.iter().all(|r| *r == min) {
        return Ok(min);
    }
    match strategy {
        ResizeStrategy::Up => Ok(max),
        ResizeStrategy::Down => Ok(min),
    }
}

/// A map that will be rescaled to the target resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleNote {
    pub filename: String,
    pub from: (u32, u32),
}

pub fn rescale_diagnostics(
    maps: &BTreeMap<String, &TextureMapEntry>,
    target: (u32, u32),
) -> Vec<ScaleNote> {
    maps.values()
        .filter_map(|entry| match entry.resolution {
            Some(res) if res != target => Some(ScaleNote {
                filename: entry.filename.clone(),
                from: res,
            }),
            _ => None,
        })
        .collect()
}

/// A filename whose declared size token disagrees with the file's actual
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixNote {
    pub filename: String,
    pub actual: (u32, u32),
}

pub fn suffix_mismatches(maps: &BTreeMap<String, &TextureMapEntry>) -> Vec<SuffixNote> {
    maps.values()
        .filter_map(|entry| {
            let resolution = entry.resolution?;
            let declared = entry.size_suffix.as_deref()?.trim_start_matches('_');
            if declared.is_empty() {
                return None;
            }
            let expected = resolution_to_suffix(resolution).to_ascii_lowercase();
            if declared.to_ascii_lowercase() != expected {
                Some(SuffixNote {
                    filename: entry.filename.clone(),
                    actual: resolution,
                })
            } else {
                None
            }
        })
        .collect()
}
