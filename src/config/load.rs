//! The main config loading module for fen.
//!
//! Handles loading and deserializing settings from `fen.toml`.
//!
//! Provides and manages the main [Config] struct, as well as the internal [RawConfig] used for
//! parsing and processing.
//!
//! Also implements default config initialization when `fen.toml` is not present.

use crate::config::{Editor, Keys};
use crate::config::{General, InternalGeneral};
use crate::utils::cli::CliOverrides;
use crate::utils::get_home;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Raw configuration as read from the toml file
/// This struct is deserialized directly from the toml file.
/// It uses owned types and is then converted into the main [Config] struct.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    editor: Editor,
    keys: Keys,
}

/// Main configuration struct for fen
/// This struct holds the processed configuration options used by fen.
#[derive(Debug)]
pub struct Config {
    general: InternalGeneral,
    editor: Editor,
    keys: Keys,
}

/// Conversion from RawConfig to Config
impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            editor: raw.editor,
            keys: raw.keys,
        }
    }
}

const DEFAULT_TOML: &str = r##"# fen.toml - default configuration for fen
#
# Commented values are the internal defaults.

[general]
# folders_first = true
# show_hidden = false
# sort_by = "name"          # "name", "size" or "modified"
# sort_reverse = false
# no_write = false          # refuse every file mutation
# file_op_workers = 0       # background copy/move/delete threads, 0 = automatic

# [editor]
# cmd = "nvim"              # falls back to nvim, vim, vi, nano

# [keys]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# go_parent = ["h", "Left", "Backspace"]
# go_into_dir = ["l", "Right", "Enter"]
# go_to_top = ["g", "Home"]
# go_to_bottom = ["G", "End"]
# go_to_middle = ["M"]
# page_up = ["PageUp"]
# page_down = ["PageDown"]
# toggle_marker = ["Space"]
# select_all = ["A"]
# clear_all = ["D"]
# yank = ["y"]
# cut = ["d"]
# paste = ["p"]
# delete = ["x", "Delete"]
# rename = ["a"]
# create = ["n"]
# create_directory = ["N"]
# open_with = ["Ctrl+n"]
# search = ["/"]
# toggle_hidden = ["z"]
# keybind_help = ["F1", "?"]
# quit = ["q"]
"##;

/// Public methods for loading and accessing the configuration
impl Config {
    /// Load configuration from the default path
    /// If the file does not exist or fails to parse, returns the default configuration.
    ///
    /// Called by entry point to load config at startup.
    pub fn load() -> Self {
        let path = Self::default_path();

        if !path.exists() {
            eprintln!(
                "No fen.toml config file found. Using internal defaults. (Tip: run 'fen --init' to generate a config file.)"
            );
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load configuration from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error parsing config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    /// Applies the command-line overrides on top of the loaded file.
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        self.general.apply_overrides(overrides);
        self
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Determine the default configuration file path.
    /// Checks the FEN_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/fen/fen.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("FEN_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("fen/fen.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/fen/fen.toml");
        }
        PathBuf::from("fen.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, DEFAULT_TOML)?;
        println!("Default config generated at {:?}", path);
        Ok(())
    }
}

/// Default configuration options
impl Default for Config {
    fn default() -> Self {
        Config::from(RawConfig::default())
    }
}
