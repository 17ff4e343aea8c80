use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    Io(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// Settings could not be serialized.
    Serialize(String),
    /// A selection model name that no model answers to.
    UnknownModel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Serialize(msg) => write!(f, "settings serialize error: {msg}"),
            Self::UnknownModel(name) => {
                write!(
                    f,
                    "unknown selection model '{name}' (expected default, row, column or preserve)"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
