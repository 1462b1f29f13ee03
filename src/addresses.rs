//! Address list loading
//!
//! Lists are CSV files where every non-empty cell is a hex address. Rows may
//! have any number of cells; there is no header row.

use crate::error::{Error, Result};
use alloy::primitives::Address;
use std::io::Read;
use std::path::Path;

/// Read every address in a CSV file, row by row, left to right
pub fn load_address_list(path: impl AsRef<Path>) -> Result<Vec<Address>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| Error::config(format!("open address list {}: {e}", path.display())))?;
    read_address_list(file).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Parse addresses from any CSV reader
///
/// Errors name the 1-based line of the offending record.
pub fn read_address_list<R: Read>(reader: R) -> Result<Vec<Address>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut addrs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| match e.position() {
            Some(pos) => Error::config(format!("line {}: {e}", pos.line())),
            None => Error::config(e),
        })?;
        let line = record.position().map_or(0, |pos| pos.line());
        for cell in record.iter().filter(|cell| !cell.is_empty()) {
            let addr: Address = cell
                .parse()
                .map_err(|e| Error::config(format!("line {line}: invalid address {cell:?}: {e}")))?;
            addrs.push(addr);
        }
    }
    Ok(addrs)
}
