// Copyright (c) 2026 The bloomsize authors
//
// Licensed under the MIT license.

//! Items read from line-oriented text.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

/// Read one item per non-blank line, trimmed, in file order.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}

/// Read one item per non-blank line, trimmed, in input order.
pub fn from_reader<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut items = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let item = line.trim();

        if !item.is_empty() {
            items.push(item.to_owned());
        }
    }
    Ok(items)
}
