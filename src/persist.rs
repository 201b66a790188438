//! Plain-text persistence for learned tables
//!
//! One entry per line, tab-separated: the board label and its value. Action
//! values key on `<label>#<action>`. Values are written with Rust's default
//! float formatting, which round-trips exactly, and entries are sorted by
//! key so files diff cleanly between runs.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::board::BoardState;
use crate::error::{Error, Result};

fn write_sorted(path: &Path, mut entries: Vec<(String, f64)>) -> Result<()> {
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let file = File::create(path)
        .map_err(|e| Error::io(format!("create {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);
    for (key, value) in entries {
        writeln!(writer, "{key}\t{value}")
            .map_err(|e| Error::io(format!("write {}", path.display()), e))?;
    }
    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<(usize, String, f64)>> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("open {}", path.display()), e))?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(format!("read {}", path.display()), e))?;
        if line.is_empty() {
            continue;
        }
        let number = index + 1;
        let (key, raw) = line.split_once('\t').ok_or_else(|| Error::ParseTable {
            line: number,
            message: "missing tab separator".to_string(),
        })?;
        let value: f64 = raw.parse().map_err(|_| Error::ParseTable {
            line: number,
            message: format!("invalid value '{raw}'"),
        })?;
        entries.push((number, key.to_string(), value));
    }
    Ok(entries)
}

/// Save a state-value table
pub fn save_values(path: &Path, values: &HashMap<BoardState, f64>) -> Result<()> {
    let entries = values
        .iter()
        .map(|(state, &value)| (state.encode(), value))
        .collect();
    write_sorted(path, entries)
}

/// Load a state-value table
pub fn load_values(path: &Path) -> Result<HashMap<BoardState, f64>> {
    let mut values = HashMap::new();
    for (number, key, value) in read_lines(path)? {
        let state = BoardState::from_label(&key).map_err(|e| Error::ParseTable {
            line: number,
            message: e.to_string(),
        })?;
        values.insert(state, value);
    }
    Ok(values)
}

/// Save an action-value table under `<label>#<action>` keys
pub fn save_action_values(
    path: &Path,
    values: &HashMap<(BoardState, usize), f64>,
) -> Result<()> {
    let entries = values
        .iter()
        .map(|(&(state, action), &value)| (format!("{}#{}", state.encode(), action), value))
        .collect();
    write_sorted(path, entries)
}

/// Load an action-value table
pub fn load_action_values(path: &Path) -> Result<HashMap<(BoardState, usize), f64>> {
    let mut values = HashMap::new();
    for (number, key, value) in read_lines(path)? {
        let (label, raw_action) = key.split_once('#').ok_or_else(|| Error::ParseTable {
            line: number,
            message: "missing '#' action separator".to_string(),
        })?;
        let state = BoardState::from_label(label).map_err(|e| Error::ParseTable {
            line: number,
            message: e.to_string(),
        })?;
        let action: usize = raw_action.parse().map_err(|_| Error::ParseTable {
            line: number,
            message: format!("invalid action '{raw_action}'"),
        })?;
        values.insert((state, action), value);
    }
    Ok(values)
}
