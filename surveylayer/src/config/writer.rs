//! INI serialization for converting `ConfigFile` into the text of `config.ini`.

use std::path::Path;

use super::file::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[cache]
; Milliseconds between background checks of watched tracks for new data
watch_interval_ms = {}
; Change notifications buffered per subscriber before the oldest are dropped
event_capacity = {}

[logging]
; Directory for the log file (~ expands to your home directory)
directory = {}
file = {}
"#,
        config.cache.watch_interval_ms,
        config.cache.event_capacity,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Display a path, collapsing the home directory back to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_contains_sections() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("[cache]"));
        assert!(text.contains("watch_interval_ms = 300"));
        assert!(text.contains("event_capacity = 64"));
        assert!(text.contains("[logging]"));
        assert!(text.contains("file = surveylayer.log"));
    }

    #[test]
    fn test_home_directory_is_collapsed() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path_to_string(&home.join("logs")), "~/logs");
        }
    }
}
