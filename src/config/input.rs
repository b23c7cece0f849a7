//! Input configuration options for fen
//!
//! This module defines the key lists per action and the editor used to open files, both read
//! from the fen.toml configuration file.

use serde::Deserialize;

/// Input configuration options of all actions
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    go_parent: Vec<String>,
    go_into_dir: Vec<String>,
    go_to_top: Vec<String>,
    go_to_bottom: Vec<String>,
    go_to_middle: Vec<String>,
    page_up: Vec<String>,
    page_down: Vec<String>,
    toggle_marker: Vec<String>,
    select_all: Vec<String>,
    clear_all: Vec<String>,
    yank: Vec<String>,
    cut: Vec<String>,
    paste: Vec<String>,
    delete: Vec<String>,
    rename: Vec<String>,
    create: Vec<String>,
    create_directory: Vec<String>,
    open_with: Vec<String>,
    search: Vec<String>,
    toggle_hidden: Vec<String>,
    keybind_help: Vec<String>,
    quit: Vec<String>,
}

/// Editor configuration options
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Editor {
    cmd: String,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    go_up,
    go_down,
    go_parent,
    go_into_dir,
    go_to_top,
    go_to_bottom,
    go_to_middle,
    page_up,
    page_down,
    toggle_marker,
    select_all,
    clear_all,
    yank,
    cut,
    paste,
    delete,
    rename,
    create,
    create_directory,
    open_with,
    search,
    toggle_hidden,
    keybind_help,
    quit,
);

/// Default input configuration options
impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            go_parent: vec!["h".into(), "Left".into(), "Backspace".into()],
            go_into_dir: vec!["l".into(), "Right".into(), "Enter".into()],
            go_to_top: vec!["g".into(), "Home".into()],
            go_to_bottom: vec!["G".into(), "End".into()],
            go_to_middle: vec!["M".into()],
            page_up: vec!["PageUp".into()],
            page_down: vec!["PageDown".into()],

            toggle_marker: vec!["Space".into()],
            select_all: vec!["A".into()],
            clear_all: vec!["D".into()],

            yank: vec!["y".into()],
            cut: vec!["d".into()],
            paste: vec!["p".into()],
            delete: vec!["x".into(), "Delete".into()],
            rename: vec!["a".into()],
            create: vec!["n".into()],
            create_directory: vec!["N".into()],
            open_with: vec!["Ctrl+n".into()],

            search: vec!["/".into()],
            toggle_hidden: vec!["z".into()],

            keybind_help: vec!["F1".into(), "?".into()],
            quit: vec!["q".into()],
        }
    }
}

/// Public methods for accessing editor configuration options
impl Editor {
    #[inline]
    pub fn cmd(&self) -> &str {
        let trimmed = self.cmd.trim();
        if trimmed.is_empty() { "nvim" } else { trimmed }
    }

    pub fn exists(&self) -> bool {
        which::which(self.cmd()).is_ok()
    }
}

/// Default editor configuration options
impl Default for Editor {
    fn default() -> Self {
        Editor { cmd: "nvim".into() }
    }
}
