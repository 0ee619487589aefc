use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key combination that triggers a cycle, e.g. `Ctrl+Alt+F11`.
///
/// Registering the combination with the OS is left to whatever hotkey daemon
/// the user runs; this type only parses, validates and persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hotkey {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyParseError {
    #[error("hotkey is empty")]
    Empty,
    #[error("hotkey has no key, only modifiers")]
    MissingKey,
    #[error("hotkey has more than one key: `{first}` and `{second}`")]
    MultipleKeys { first: String, second: String },
    #[error("hotkey repeats modifier `{0}`")]
    RepeatedModifier(String),
}

impl Default for Hotkey {
    fn default() -> Self {
        Self {
            ctrl: true,
            alt: true,
            shift: false,
            super_key: false,
            key: "F11".to_string(),
        }
    }
}

impl FromStr for Hotkey {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut hotkey = Hotkey {
            ctrl: false,
            alt: false,
            shift: false,
            super_key: false,
            key: String::new(),
        };

        for part in s.split('+').map(str::trim) {
            let flag = match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => &mut hotkey.ctrl,
                "alt" | "option" => &mut hotkey.alt,
                "shift" => &mut hotkey.shift,
                "super" | "cmd" | "command" | "win" => &mut hotkey.super_key,
                _ => {
                    if part.is_empty() {
                        return Err(HotkeyParseError::MissingKey);
                    }
                    if !hotkey.key.is_empty() {
                        return Err(HotkeyParseError::MultipleKeys {
                            first: hotkey.key,
                            second: part.to_string(),
                        });
                    }
                    hotkey.key = normalize_key(part);
                    continue;
                }
            };
            if *flag {
                return Err(HotkeyParseError::RepeatedModifier(part.to_string()));
            }
            *flag = true;
        }

        if hotkey.key.is_empty() {
            return Err(HotkeyParseError::MissingKey);
        }
        Ok(hotkey)
    }
}

// Single letters are upper-cased, function keys get a canonical `F` prefix.
fn normalize_key(key: &str) -> String {
    let upper = key.to_ascii_uppercase();
    if key.chars().count() == 1 || (upper.starts_with('F') && upper[1..].parse::<u8>().is_ok())
    {
        upper
    } else {
        key.to_string()
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
            (self.super_key, "Super"),
        ];
        for (_, name) in modifiers.iter().filter(|(set, _)| *set) {
            write!(f, "{name}+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl TryFrom<String> for Hotkey {
    type Error = HotkeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hotkey> for String {
    fn from(hotkey: Hotkey) -> Self {
        hotkey.to_string()
    }
}
