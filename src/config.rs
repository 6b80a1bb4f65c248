use std::sync::LazyLock;

use colored::Color;
use derive_from_env::FromEnv;

use crate::level::Level;

/// Default colors for the two severities that are always colorized.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub error: Color,
    pub warning: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warning: Color::Yellow,
        }
    }
}

/// Formatting and filtering configuration shared by every buffer of a
/// [`Console`](crate::Console). The threshold given here is only the
/// initial value; it stays mutable on the console afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub threshold: Level,
    pub indent_char: char,
    pub indent_width: usize,
    pub colors: Colors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: Level::Info,
            indent_char: ' ',
            indent_width: 4,
            colors: Colors::default(),
        }
    }
}

#[derive(FromEnv)]
#[from_env(prefix = "INKLINE")]
#[allow(non_snake_case)]
struct EnvConfig {
    #[from_env(default = "info")]
    LEVEL: String,
    #[from_env(default = "4")]
    INDENT_WIDTH: u64,
}

static ENV_CONFIG: LazyLock<EnvConfig> = LazyLock::new(|| EnvConfig::from_env().unwrap());

impl Config {
    /// Configuration from `INKLINE_LEVEL` and `INKLINE_INDENT_WIDTH`.
    /// Unset variables fall back to the defaults; an unrecognized level
    /// name falls back to info.
    pub fn from_env() -> Self {
        Self {
            threshold: ENV_CONFIG.LEVEL.parse().unwrap_or(Level::Info),
            indent_width: ENV_CONFIG.INDENT_WIDTH as usize,
            ..Self::default()
        }
    }
}
