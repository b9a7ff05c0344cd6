//! Comma-delimited text matrices.
//!
//! One line per grid row (index `i`), `ny` values per line. Values use
//! the same scientific layout as numpy's `savetxt` default `%.18e`:
//! 18 fractional digits, a signed exponent of at least two digits.
//!
//! ```text
//! 1.000000000000000000e+02,9.394130628134757861e+01
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use calor_core::Field;

use crate::error::PersistError;

/// Format one value as `%.18e`.
///
/// ```
/// use calor_io::format_value;
///
/// assert_eq!(format_value(100.0), "1.000000000000000000e+02");
/// assert_eq!(format_value(-0.25), "-2.500000000000000000e-01");
/// // Digits are exact, not rounded to the shortest form.
/// assert_eq!(format_value(0.1), "1.000000000000000056e-01");
/// assert_eq!(format_value(0.0), "0.000000000000000000e+00");
/// ```
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{v:.18e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        None => raw,
    }
}

/// Write `field` as a CSV matrix.
pub fn write_matrix<W: Write>(mut w: W, field: &Field) -> Result<(), PersistError> {
    let mut line = String::new();
    for row in field.rows() {
        line.clear();
        for (j, &v) in row.iter().enumerate() {
            if j > 0 {
                line.push(',');
            }
            line.push_str(&format_value(v));
        }
        line.push('\n');
        w.write_all(line.as_bytes())?;
    }
    w.flush()?;
    Ok(())
}

/// Parse a CSV matrix back into a field.
///
/// Blank lines are ignored. Every non-blank line must have the same
/// number of values.
pub fn read_matrix<R: BufRead>(r: R) -> Result<Field, PersistError> {
    let mut data = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0usize;
    for (idx, line) in r.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let before = data.len();
        for token in line.split(',') {
            let token = token.trim();
            let v: f64 = token.parse().map_err(|_| PersistError::Parse {
                line: lineno,
                reason: format!("not a number: '{token}'"),
            })?;
            data.push(v);
        }
        let found = data.len() - before;
        match cols {
            None => cols = Some(found),
            Some(expected) if expected != found => {
                return Err(PersistError::Ragged {
                    line: lineno,
                    expected,
                    found,
                })
            }
            Some(_) => {}
        }
        rows += 1;
    }
    let cols = cols.ok_or_else(|| PersistError::Parse {
        line: 0,
        reason: "empty matrix".to_string(),
    })?;
    Field::from_vec(rows, cols, data).map_err(|e| PersistError::Parse {
        line: 0,
        reason: e.to_string(),
    })
}

/// Write `field` to `path`, replacing any existing file.
pub fn write_matrix_file(path: &Path, field: &Field) -> Result<(), PersistError> {
    write_matrix(BufWriter::new(File::create(path)?), field)
}

/// Read a field from `path`.
pub fn read_matrix_file(path: &Path) -> Result<Field, PersistError> {
    read_matrix(BufReader::new(File::open(path)?))
}
