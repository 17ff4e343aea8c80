// Selection settings
// Loaded from ~/.config/gridsel/selection.toml

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

/// Which selection model a selection layer starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionModelKind {
    /// Arbitrary rectangular cell regions (default)
    #[default]
    Default,
    /// Whole rows, tracked by row identity
    Row,
    /// Whole columns
    Column,
    /// Cells, tracked by row identity so they survive data reshuffles
    Preserve,
}

impl SelectionModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionModelKind::Default => "default",
            SelectionModelKind::Row => "row",
            SelectionModelKind::Column => "column",
            SelectionModelKind::Preserve => "preserve",
        }
    }

    /// Returns true if the model keys rows by identity rather than position
    pub fn tracks_row_identity(&self) -> bool {
        matches!(self, SelectionModelKind::Row | SelectionModelKind::Preserve)
    }
}

impl fmt::Display for SelectionModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionModelKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "cell" => Ok(SelectionModelKind::Default),
            "row" | "rows" => Ok(SelectionModelKind::Row),
            "column" | "columns" => Ok(SelectionModelKind::Column),
            "preserve" => Ok(SelectionModelKind::Preserve),
            _ => Err(ConfigError::UnknownModel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectionSettings {
    /// Model installed when a selection layer is created
    pub model: SelectionModelKind,

    /// Ctrl/shift gestures may accumulate more than one selected block
    pub multiple_selection: bool,

    /// Clear the selection after hiding the selected rows
    pub hide_selected_clears_selection: bool,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            model: SelectionModelKind::Default,
            multiple_selection: true,
            hide_selected_clears_selection: false,
        }
    }
}

impl SelectionSettings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridsel")
            .join("selection.toml")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}: {}; using default selection settings", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save settings, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let settings = SelectionSettings::from_toml_str("").unwrap();
        assert_eq!(settings, SelectionSettings::default());
        assert!(settings.multiple_selection);
    }

    #[test]
    fn test_partial_file() {
        let settings = SelectionSettings::from_toml_str("model = \"preserve\"\n").unwrap();
        assert_eq!(settings.model, SelectionModelKind::Preserve);
        assert!(settings.model.tracks_row_identity());
        assert!(settings.multiple_selection);
    }

    #[test]
    fn test_bad_model_is_parse_error() {
        let err = SelectionSettings::from_toml_str("model = \"diagonal\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Row".parse::<SelectionModelKind>().unwrap(), SelectionModelKind::Row);
        assert_eq!(" columns ".parse::<SelectionModelKind>().unwrap(), SelectionModelKind::Column);
        assert!(matches!(
            "diagonal".parse::<SelectionModelKind>(),
            Err(ConfigError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("selection.toml");
        let settings = SelectionSettings {
            model: SelectionModelKind::Row,
            multiple_selection: false,
            hide_selected_clears_selection: true,
        };

        settings.save_to(&path).unwrap();
        let loaded = SelectionSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectionSettings::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
