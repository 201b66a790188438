//! Exact round-trips of the plain-text table format

use std::collections::HashMap;
use std::fs;

use tempfile::tempdir;

use oxrl::board::BoardState;
use oxrl::error::Error;
use oxrl::persist;

#[test]
fn state_values_round_trip_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("values.tsv");

    let mut values = HashMap::new();
    values.insert(BoardState::empty(), 1.0 / 3.0);
    values.insert(BoardState::from_label("XO.......").unwrap(), -0.25);
    values.insert(BoardState::from_label("X...O...X").unwrap(), 0.1);
    values.insert(BoardState::from_label("OX.......").unwrap(), 0.0);

    persist::save_values(&path, &values).unwrap();
    let restored = persist::load_values(&path).unwrap();

    assert_eq!(restored, values);
}

#[test]
fn action_values_round_trip_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("action-values.tsv");

    let mut values = HashMap::new();
    let root = BoardState::empty();
    values.insert((root, 0), 2.0 / 3.0);
    values.insert((root, 4), -1.0e-9);
    values.insert((BoardState::from_label("..X.O....").unwrap(), 8), 0.5);

    persist::save_action_values(&path, &values).unwrap();
    let restored = persist::load_action_values(&path).unwrap();

    assert_eq!(restored, values);
}

#[test]
fn entries_are_sorted_by_label() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("values.tsv");

    let mut values = HashMap::new();
    values.insert(BoardState::from_label("X........").unwrap(), 1.0);
    values.insert(BoardState::empty(), 0.5);
    values.insert(BoardState::from_label("O........").unwrap(), -1.0);

    persist::save_values(&path, &values).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let labels: Vec<&str> = text
        .lines()
        .map(|line| line.split('\t').next().unwrap())
        .collect();

    let mut sorted = labels.clone();
    sorted.sort_unstable();
    assert_eq!(labels, sorted);
}

#[test]
fn malformed_lines_are_reported_with_line_numbers() {
    let dir = tempdir().unwrap();

    let no_tab = dir.path().join("no-tab.tsv");
    fs::write(&no_tab, "XO.......\t0.5\nbroken line\n").unwrap();
    match persist::load_values(&no_tab) {
        Err(Error::ParseTable { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected ParseTable, got {other:?}"),
    }

    let bad_value = dir.path().join("bad-value.tsv");
    fs::write(&bad_value, "XO.......\tnot-a-number\n").unwrap();
    assert!(matches!(
        persist::load_values(&bad_value),
        Err(Error::ParseTable { line: 1, .. })
    ));

    let bad_label = dir.path().join("bad-label.tsv");
    fs::write(&bad_label, "XZ.......\t0.5\n").unwrap();
    assert!(matches!(
        persist::load_values(&bad_label),
        Err(Error::ParseTable { line: 1, .. })
    ));

    let bad_action = dir.path().join("bad-action.tsv");
    fs::write(&bad_action, "XO.......\t0.5\n").unwrap();
    assert!(matches!(
        persist::load_action_values(&bad_action),
        Err(Error::ParseTable { line: 1, .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.tsv");
    assert!(matches!(
        persist::load_values(&path),
        Err(Error::Io { .. })
    ));
}
