// Construction-time errors. Once a match is running nothing is fatal except quit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing resource handle `{0}`")]
    MissingResource(String),
    #[error("malformed key mapping: {0}")]
    MalformedKeyMapping(String),
    #[error("crafts `{0}` and `{1}` share control keys")]
    ConflictingKeyMapping(String, String),
    #[error("invalid value `{value}` for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("invalid arena setting: {0}")]
    InvalidSetting(String),
    #[error("failed to load input script {path}: {reason}")]
    InputScript { path: String, reason: String },
}
