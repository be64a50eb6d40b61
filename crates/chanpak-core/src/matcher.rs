//! Filename classification: which texture type does a file carry, what set
//! does it belong to, and what resolution does its name claim.
//!
//! Artists name files in more than one convention, so each (type, alias)
//! pair matches three shapes against the lowercase stem:
//!
//! 1. `<set>_<alias>[_<extra>]_<size>`  (type then size)
//! 2. `<set>_<size>[_<extra>]_<alias>`  (size then type)
//! 3. `<set>_<alias>`                   (type only)
//!
//! Separators are `_`, `-` or `.`. Everything before the matched portion is
//! the set name.

use chanpak_config::TextureTypeTable;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("failed to compile filename pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Detects a declared resolution token (`2k`, `512`, ...) at the end of a
/// filename stem.
#[derive(Debug)]
pub struct SizeSuffixDetector {
    pattern: Option<Regex>,
}

impl SizeSuffixDetector {
    pub fn new(suffixes: &[String]) -> Result<Self, MatcherError> {
        let alternation = size_alternation(suffixes);
        let pattern = match alternation {
            Some(alt) => Some(Regex::new(&format!(r"(?i)[._-]({alt})$"))?),
            None => None,
        };
        Ok(Self { pattern })
    }

    /// The lowercase token, without its separator, when the stem ends with
    /// one.
    pub fn detect(&self, stem: &str) -> Option<String> {
        let pattern = self.pattern.as_ref()?;
        pattern
            .captures(stem)
            .map(|caps| caps[1].to_ascii_lowercase())
    }
}

/// Longest-first alternation so `1k` never shadows a hypothetical `10k`.
fn size_alternation(suffixes: &[String]) -> Option<String> {
    let mut tokens: Vec<String> = suffixes
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
        .collect();
    if tokens.is_empty() {
        return None;
    }
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tokens.dedup();
    Some(
        tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

/// Precompiled shapes for one (type, alias) pair.
#[derive(Debug)]
struct AliasRule {
    type_name: String,
    /// Shape 1, capturing the size token.
    alias_then_size: Option<Regex>,
    /// Shape 2, capturing the size token.
    size_then_alias: Option<Regex>,
    /// Shape 3.
    alias_only: Regex,
}

/// A classified filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedName {
    /// Set prefix with trailing separators stripped, original casing kept.
    pub set_name: String,
    /// Canonical type name from the table.
    pub type_name: String,
    /// Lowercase declared size token, when the name carries one.
    pub size_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(MatchedName),
    /// No type alias found; the file may still complete a set's name guess.
    Untyped { fallback_set_name: String },
}

/// Classifies filename stems against the texture type table.
///
/// Rules are tried in table order, aliases in declared order, so earlier
/// and longer aliases win ties.
#[derive(Debug)]
pub struct SuffixTypeMatcher {
    rules: Vec<AliasRule>,
    size_detector: SizeSuffixDetector,
}

impl SuffixTypeMatcher {
    pub fn new(
        table: &TextureTypeTable,
        size_suffixes: &[String],
    ) -> Result<Self, MatcherError> {
        let size_detector = SizeSuffixDetector::new(size_suffixes)?;
        let size_alt = size_alternation(size_suffixes);

        let sep = r"[._-]";
        let middle = r"(?:[._-][A-Za-z0-9]+)?";
        let mut rules = Vec::new();
        for ty in table.iter() {
            for alias in &ty.aliases {
                let alias = regex::escape(&alias.to_ascii_lowercase());
                let (alias_then_size, size_then_alias) = match size_alt.as_deref() {
                    Some(alt) => (
                        Some(Regex::new(&format!(
                            r"(?i){sep}{alias}{middle}{sep}({alt})$"
                        ))?),
                        Some(Regex::new(&format!(
                            r"(?i){sep}({alt}){middle}{sep}{alias}$"
                        ))?),
                    ),
                    None => (None, None),
                };
                rules.push(AliasRule {
                    type_name: ty.name.clone(),
                    alias_then_size,
                    size_then_alias,
                    alias_only: Regex::new(&format!(r"(?i){sep}{alias}$"))?,
                });
            }
        }
        Ok(Self {
            rules,
            size_detector,
        })
    }

    /// Classify a filename stem (no extension).
    pub fn classify(&self, stem: &str) -> MatchOutcome {
        let detected = self.size_detector.detect(stem);

        for rule in &self.rules {
            // Size-bearing shapes only apply when the stem actually ends
            // with a known size token; the captured token must be the
            // detected one so a mid-name lookalike never counts.
            if let Some(detected) = detected.as_deref() {
                for pattern in [&rule.alias_then_size, &rule.size_then_alias]
                    .into_iter()
                    .flatten()
                {
                    if let Some(caps) = pattern.captures(stem) {
                        if caps[1].eq_ignore_ascii_case(detected) {
                            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                            return self.matched(stem, start, rule, Some(detected));
                        }
                    }
                }
            }
            if let Some(m) = rule.alias_only.find(stem) {
                return self.matched(stem, m.start(), rule, detected.as_deref());
            }
        }

        MatchOutcome::Untyped {
            fallback_set_name: fallback_set_name(stem),
        }
    }

    fn matched(
        &self,
        stem: &str,
        match_start: usize,
        rule: &AliasRule,
        size: Option<&str>,
    ) -> MatchOutcome {
        let set_name = stem[..match_start]
            .trim_end_matches(['_', '-', '.'])
            .to_string();
        MatchOutcome::Matched(MatchedName {
            set_name,
            type_name: rule.type_name.clone(),
            size_suffix: size.map(str::to_string),
        })
    }
}

/// Best-effort set name for a stem with no recognized type: drop the last
/// underscore-delimited token.
fn fallback_set_name(stem: &str) -> String {
    match stem.rsplit_once('_') {
        Some((head, _)) if !head.is_empty() => head.to_string(),
        _ => stem.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanpak_config::PackConfig;
    use pretty_assertions::assert_eq;

    fn matcher() -> SuffixTypeMatcher {
        let config = PackConfig::default();
        SuffixTypeMatcher::new(config.table(), &config.size_suffixes).unwrap()
    }

    fn expect_match(stem: &str) -> MatchedName {
        match matcher().classify(stem) {
            MatchOutcome::Matched(m) => m,
            MatchOutcome::Untyped { fallback_set_name } => {
                panic!("expected {stem} to match a type, got untyped ({fallback_set_name})")
            }
        }
    }

    #[test]
    fn type_only_shape() {
        let m = expect_match("T_Wall_AO");
        assert_eq!(m.set_name, "T_Wall");
        assert_eq!(m.type_name, "AO");
        assert_eq!(m.size_suffix, None);
    }

    #[test]
    fn type_then_size_shape() {
        let m = expect_match("Wall_Roughness_2K");
        assert_eq!(m.set_name, "Wall");
        assert_eq!(m.type_name, "Roughness");
        assert_eq!(m.size_suffix.as_deref(), Some("2k"));
    }

    #[test]
    fn type_then_extra_then_size_shape() {
        let m = expect_match("Wall_Normal_DirectX_4k");
        assert_eq!(m.set_name, "Wall");
        assert_eq!(m.type_name, "Normal");
        assert_eq!(m.size_suffix.as_deref(), Some("4k"));
    }

    #[test]
    fn mixed_separators() {
        let m = expect_match("Rock-basecolor.1K");
        assert_eq!(m.set_name, "Rock");
        assert_eq!(m.type_name, "Albedo");
        assert_eq!(m.size_suffix.as_deref(), Some("1k"));
    }

    #[test]
    fn long_alias_wins_over_single_letter() {
        // "_roughness" must resolve as Roughness, not as Albedo via the
        // trailing "s" of some other alias or a single-letter match.
        let m = expect_match("Crate_roughness");
        assert_eq!(m.type_name, "Roughness");
        assert_eq!(m.set_name, "Crate");
    }

    #[test]
    fn single_letter_alias_matches_as_own_token() {
        let m = expect_match("Crate_R_2k");
        assert_eq!(m.type_name, "Roughness");
        assert_eq!(m.set_name, "Crate");
    }

    #[test]
    fn classification_is_case_insensitive() {
        let a = expect_match("wall_ao");
        let b = expect_match("WALL_AO");
        assert_eq!(a.type_name, b.type_name);
    }

    #[test]
    fn classification_is_idempotent() {
        let stems = ["T_Wall_AO", "Wall_Roughness_2K", "Rock-basecolor.1K", "plain"];
        for stem in stems {
            assert_eq!(matcher().classify(stem), matcher().classify(stem));
        }
    }

    #[test]
    fn size_token_in_the_middle_does_not_count() {
        // Ends with an alias, not a size token, so only shape 3 applies and
        // the detected size is none.
        let m = expect_match("Wall_2k_ao");
        assert_eq!(m.type_name, "AO");
        assert_eq!(m.set_name, "Wall_2k");
        assert_eq!(m.size_suffix, None);
    }

    #[test]
    fn untyped_falls_back_to_trimmed_name() {
        let outcome = matcher().classify("Wall_Weirdmap");
        assert_eq!(
            outcome,
            MatchOutcome::Untyped {
                fallback_set_name: "Wall".to_string()
            }
        );
    }

    #[test]
    fn untyped_without_underscore_keeps_whole_stem() {
        let outcome = matcher().classify("loosefile");
        assert_eq!(
            outcome,
            MatchOutcome::Untyped {
                fallback_set_name: "loosefile".to_string()
            }
        );
    }

    #[test]
    fn detector_returns_lowercase_token() {
        let detector =
            SizeSuffixDetector::new(&["512".to_string(), "2k".to_string()]).unwrap();
        assert_eq!(detector.detect("Wall_AO_2K").as_deref(), Some("2k"));
        assert_eq!(detector.detect("Wall_AO.512").as_deref(), Some("512"));
        assert_eq!(detector.detect("Wall_AO"), None);
        assert_eq!(detector.detect("Wall_2k_AO"), None);
    }

    #[test]
    fn empty_suffix_list_detects_nothing() {
        let detector = SizeSuffixDetector::new(&[]).unwrap();
        assert_eq!(detector.detect("Wall_AO_2k"), None);
    }
}
