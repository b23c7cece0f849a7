//! Key mapping and action dispatch system for fen
//!
//! Maps keys to actions, parsing them from the config, and defines the enum variants
//! for all navigation, file and system actions used by fen.

use crate::config::Config;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Represents any action in the app: navigation, file, or system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Nav(NavAction),
    File(FileAction),
    System(SystemAction),
}

/// Navigation and selection actions
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    GoParent,
    GoIntoDir,
    GoUp,
    GoDown,
    GoToTop,
    GoToBottom,
    GoToMiddle,
    PageUp,
    PageDown,
    ToggleMarker,
    SelectAll,
    ClearAll,
    Search,
    ToggleHidden,
}

/// File actions (yank, paste, delete, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileAction {
    Yank,
    Cut,
    Paste,
    Delete,
    Rename,
    Create,
    CreateDirectory,
    OpenWith,
}

/// System actions (quit, keybind help)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemAction {
    Quit,
    KeybindHelp,
}

/// Key + modifiers as used in keybind/keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Stores the mapping from Key to action, which is built from the config
#[derive(Debug)]
pub struct Keymap {
    map: HashMap<Key, Action>,
}

impl Keymap {
    /// Builds the keymap from the config
    #[rustfmt::skip]
    pub fn from_config(config: &Config) -> Self {
        let mut map = HashMap::new();
        let keys = config.keys();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        use NavAction as N;
        use FileAction as F;
        use SystemAction as S;

        // NavActions
        bind!(keys.go_parent(),         Action::Nav(N::GoParent));
        bind!(keys.go_into_dir(),       Action::Nav(N::GoIntoDir));
        bind!(keys.go_up(),             Action::Nav(N::GoUp));
        bind!(keys.go_down(),           Action::Nav(N::GoDown));
        bind!(keys.go_to_top(),         Action::Nav(N::GoToTop));
        bind!(keys.go_to_bottom(),      Action::Nav(N::GoToBottom));
        bind!(keys.go_to_middle(),      Action::Nav(N::GoToMiddle));
        bind!(keys.page_up(),           Action::Nav(N::PageUp));
        bind!(keys.page_down(),         Action::Nav(N::PageDown));
        bind!(keys.toggle_marker(),     Action::Nav(N::ToggleMarker));
        bind!(keys.select_all(),        Action::Nav(N::SelectAll));
        bind!(keys.clear_all(),         Action::Nav(N::ClearAll));
        bind!(keys.search(),            Action::Nav(N::Search));
        bind!(keys.toggle_hidden(),     Action::Nav(N::ToggleHidden));

        // FileActions
        bind!(keys.yank(),              Action::File(F::Yank));
        bind!(keys.cut(),               Action::File(F::Cut));
        bind!(keys.paste(),             Action::File(F::Paste));
        bind!(keys.delete(),            Action::File(F::Delete));
        bind!(keys.rename(),            Action::File(F::Rename));
        bind!(keys.create(),            Action::File(F::Create));
        bind!(keys.create_directory(),  Action::File(F::CreateDirectory));
        bind!(keys.open_with(),         Action::File(F::OpenWith));

        // SystemActions
        bind!(keys.quit(),              Action::System(S::Quit));
        bind!(keys.keybind_help(),      Action::System(S::KeybindHelp));

        Keymap { map }
    }

    /// Looks up the action for a given key event
    pub fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let k = Key {
            code: key.code,
            modifiers: key.modifiers,
        };

        if let Some(action) = self.map.get(&k).copied() {
            return Some(action);
        }

        if matches!(key.code, KeyCode::Char(_)) && key.modifiers.contains(KeyModifiers::SHIFT) {
            let k2 = Key {
                code: key.code,
                modifiers: key.modifiers - KeyModifiers::SHIFT,
            };
            return self.map.get(&k2).copied();
        }
        None
    }
}

/// Parses a key string like `"k"`, `"Ctrl+n"`, `"<c-n>"` or `"PageDown"`.
pub fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    let is_bracketed = s.starts_with('<') && s.ends_with('>') && s.len() > 2;
    let mut input = if is_bracketed {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    };

    if is_bracketed && input.contains('-') {
        let parts: Vec<&str> = input.split('-').collect();

        for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
            match prefix.to_lowercase().as_str() {
                "c" | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "a" | "m" | "alt" => modifiers |= KeyModifiers::ALT,
                "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        input = parts.last()?.to_string();
    }

    if input == " " {
        return Some(Key {
            code: KeyCode::Char(' '),
            modifiers,
        });
    }

    let normalized = input.replace('-', "+");
    for part in normalized.split('+') {
        let p_low = part.to_lowercase();
        match p_low.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,

            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "home" => code = Some(KeyCode::Home),
            "end" => code = Some(KeyCode::End),
            "pageup" | "pgup" => code = Some(KeyCode::PageUp),
            "pagedown" | "pgdown" => code = Some(KeyCode::PageDown),
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "backspace" | "back" => code = Some(KeyCode::Backspace),
            "delete" | "del" => code = Some(KeyCode::Delete),
            "tab" => code = Some(KeyCode::Tab),
            "space" | "spc" => code = Some(KeyCode::Char(' ')),

            _ => {
                let mut chars = part.chars();
                if let (Some(mut c), None) = (chars.next(), chars.next()) {
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        c = c.to_ascii_uppercase();
                    }
                    code = Some(KeyCode::Char(c));
                } else if p_low.starts_with('f')
                    && p_low.len() > 1
                    && p_low[1..].chars().all(|c| c.is_ascii_digit())
                {
                    let n = p_low[1..].parse().ok()?;
                    code = Some(KeyCode::F(n));
                } else if part.is_empty() {
                    continue;
                } else {
                    return None;
                }
            }
        }
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => tracing::warn!(key = %k, ?action, "ignoring unparsable key binding"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_plain_special_and_modified_keys() {
        assert_eq!(
            parse_key("k"),
            Some(Key {
                code: KeyCode::Char('k'),
                modifiers: KeyModifiers::NONE
            })
        );
        assert_eq!(parse_key("PageDown").map(|k| k.code), Some(KeyCode::PageDown));
        assert_eq!(parse_key("Space").map(|k| k.code), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("/").map(|k| k.code), Some(KeyCode::Char('/')));
        assert_eq!(
            parse_key("Ctrl+n"),
            Some(Key {
                code: KeyCode::Char('n'),
                modifiers: KeyModifiers::CONTROL
            })
        );
        assert_eq!(parse_key("<c-n>"), parse_key("Ctrl+n"));
        assert_eq!(parse_key("Hyper+x"), None);
    }

    #[test]
    fn default_bindings_dispatch() {
        let config = Config::default();
        let keymap = Keymap::from_config(&config);

        assert_eq!(
            keymap.lookup(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Action::Nav(NavAction::GoDown))
        );
        assert_eq!(
            keymap.lookup(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Action::Nav(NavAction::GoToBottom))
        );
        assert_eq!(
            keymap.lookup(key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Action::File(FileAction::OpenWith))
        );
        assert_eq!(
            keymap.lookup(key(KeyCode::Char('n'), KeyModifiers::NONE)),
            Some(Action::File(FileAction::Create))
        );
        assert_eq!(
            keymap.lookup(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::Nav(NavAction::GoIntoDir))
        );
        assert_eq!(
            keymap.lookup(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::System(SystemAction::Quit))
        );
        assert_eq!(
            keymap.lookup(key(KeyCode::F(1), KeyModifiers::NONE)),
            Some(Action::System(SystemAction::KeybindHelp))
        );
        assert_eq!(
            keymap.lookup(key(KeyCode::Char('?'), KeyModifiers::SHIFT)),
            Some(Action::System(SystemAction::KeybindHelp))
        );
        assert_eq!(keymap.lookup(key(KeyCode::Null, KeyModifiers::NONE)), None);
    }
}
