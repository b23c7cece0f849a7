//! Navigation tests for fen
//!
//! These tests check listing order and selection behaviour as configured from a `fen.toml`
//! snippet, across the config, core and app modules.

use fen_tui::app::nav::{GoRight, NavState};
use fen_tui::config::Config;
use fen_tui::core::{self, SortBy};
use fen_tui::utils::cli::{CliAction, parse_args};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn names(nav: &NavState) -> Vec<String> {
    nav.entries()
        .iter()
        .map(|e| e.name_str().into_owned())
        .collect()
}

#[test]
fn test_config_drives_listing_order() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::create_dir(temp.path().join("zdir"))?;
    fs::write(temp.path().join("big"), vec![0u8; 4096])?;
    fs::write(temp.path().join("small"), "s")?;
    fs::write(temp.path().join(".dot"), "")?;

    let config = Config::from_toml(
        r#"
        [general]
        sort_by = "size"
        sort_reverse = true
        folders_first = true
        "#,
    )?;
    let options = config.general().list_options();
    assert_eq!(options.sort_by, SortBy::Size);

    let nav = NavState::new(temp.path().to_path_buf(), options);
    assert_eq!(names(&nav), vec!["zdir", "big", "small"]);

    let config = Config::from_toml("[general]\nshow_hidden = true\nfolders_first = false")?;
    let nav = NavState::new(temp.path().to_path_buf(), config.general().list_options());
    assert_eq!(nav.entries().len(), 4);
    assert!(names(&nav).contains(&".dot".to_string()));
    Ok(())
}

#[test]
fn test_cli_flags_override_config_listing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    fs::write(temp.path().join("a_small"), "s")?;
    fs::write(temp.path().join("b_big"), vec![0u8; 2048])?;
    fs::write(temp.path().join(".hidden"), "hh")?;

    let dir = temp.path().to_string_lossy().into_owned();
    let args: Vec<String> = ["--hidden-files", "--sort-by=size", "--sort-reverse", &dir]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let CliAction::RunAppAtPath(path, overrides) = parse_args(&args) else {
        return Err("flags were rejected".into());
    };
    assert_eq!(path, dir);

    let config = Config::from_toml("[general]\nshow_hidden = false")?.with_overrides(&overrides);
    let nav = NavState::new(temp.path().to_path_buf(), config.general().list_options());
    assert_eq!(names(&nav), vec!["b_big", ".hidden", "a_small"]);
    Ok(())
}

#[test]
fn test_core_empty_dir() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let entries = core::read_entries(temp.path())?;
    assert!(entries.is_empty());

    let mut nav = NavState::new(temp.path().to_path_buf(), Default::default());
    assert_eq!(nav.selection(), None);
    assert_eq!(nav.go_right(), GoRight::Nothing);
    assert!(!nav.go_down(1));
    Ok(())
}

#[test]
fn test_history_restores_deep_positions() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let root = temp.path().join("root");
    for dir in ["a/x", "a/y", "a/z", "b"] {
        fs::create_dir_all(root.join(dir))?;
    }

    let mut nav = NavState::new(root.clone(), Default::default());
    assert_eq!(nav.selection(), Some(root.join("a").as_path()));

    assert_eq!(nav.go_right(), GoRight::Entered);
    nav.go_bottom();
    assert_eq!(nav.selection(), Some(root.join("a/z").as_path()));

    nav.go_left();
    nav.go_down(1);
    assert_eq!(nav.selection(), Some(root.join("b").as_path()));
    nav.go_up(1);
    nav.go_right();
    assert_eq!(nav.selection(), Some(root.join("a/z").as_path()));
    Ok(())
}

#[test]
fn test_vanished_selection_is_repaired() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    for name in ["one", "two", "three"] {
        fs::write(temp.path().join(name), name)?;
    }
    let mut nav = NavState::new(temp.path().to_path_buf(), Default::default());
    nav.go_bottom();
    let last = nav.selection().map(Path::to_path_buf).ok_or("no selection")?;

    fs::remove_file(&last)?;
    nav.refresh();
    assert_eq!(nav.entries().len(), 2);
    assert_eq!(nav.selected_index(), Some(1));
    Ok(())
}
