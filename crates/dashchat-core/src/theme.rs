// dashchat core: Theme
//
// The only persisted UI state. The server picks the initial theme from
// config; the page flips it and keeps the flag in localStorage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// localStorage key the page uses for the dark-mode flag.
pub const THEME_STORAGE_KEY: &str = "darkMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class applied to `<body>`, the chat container and the message list.
    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark-mode",
        }
    }

    /// Value written under [`THEME_STORAGE_KEY`].
    pub fn storage_value(self) -> &'static str {
        if self.is_dark() { "true" } else { "false" }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}
