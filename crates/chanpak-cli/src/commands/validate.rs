//! `chanpak validate` - check the configuration without touching any files.

use std::process::ExitCode;

use anyhow::bail;
use chanpak_config::normalize_modes;

use crate::printer;

pub fn run(config_path: Option<&str>, verbose: bool) -> anyhow::Result<ExitCode> {
    let config = super::load_config(config_path)?;
    config.validate()?;

    if !config.strategy_is_known() {
        printer::warn(&format!(
            "Unknown RESIZE_STRATEGY '{}'. Runs will default to 'down'.",
            config.resize_strategy
        ));
    }

    let modes = normalize_modes(&config.packing_modes, config.table())?;
    if modes.is_empty() {
        bail!("no packing modes configured");
    }

    if verbose {
        for mode in &modes {
            let slots: Vec<String> = mode
                .slot_sources()
                .map(|(slot, source)| {
                    let component = source
                        .component
                        .map(|c| format!(".{}", c.letter()))
                        .unwrap_or_default();
                    format!("{}: {}{component}", slot.letter(), source.base)
                })
                .collect();
            printer::info(&format!(
                "mode '{}' -> suffix '{}' ({})",
                mode.name,
                mode.suffix,
                slots.join(", ")
            ));
        }
    }

    printer::complete(&format!(
        "Configuration OK ({} packing mode{})",
        modes.len(),
        if modes.len() == 1 { "" } else { "s" }
    ));
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chanpak.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let path_str = path.to_string_lossy().into_owned();
        (dir, path_str)
    }

    #[test]
    fn valid_config_passes() {
        let (_dir, path) = write_config(
            r#"{
                "PACKING_MODES": [
                    {
                        "mode_name": "arm",
                        "channels": {"R": "AO", "G": "Roughness", "B": "Metalness"}
                    }
                ]
            }"#,
        );
        assert!(run(Some(&path), true).is_ok());
    }

    #[test]
    fn unknown_texture_type_fails() {
        let (_dir, path) = write_config(
            r#"{
                "PACKING_MODES": [
                    {
                        "mode_name": "bad",
                        "channels": {"R": "Velvet", "G": "Roughness", "B": "Metalness"}
                    }
                ]
            }"#,
        );
        assert!(run(Some(&path), false).is_err());
    }

    #[test]
    fn empty_mode_list_fails() {
        let (_dir, path) = write_config(r#"{"PACKING_MODES": []}"#);
        assert!(run(Some(&path), false).is_err());
    }

    #[test]
    fn missing_config_file_fails() {
        assert!(run(Some("/definitely/not/here.json"), false).is_err());
    }
}
