//! Reader for the IERS `finals2000A` fixed-width format.
//!
//! Each data line holds one daily record. Only the columns needed for the rotation of the
//! apparent frame are read (0-based, end-exclusive byte ranges):
//!
//! | field            | columns    | unit   |
//! |------------------|------------|--------|
//! | MJD              | `7..15`    | day    |
//! | PM-x (Bulletin A)| `18..27`   | arcsec |
//! | PM-y (Bulletin A)| `37..46`   | arcsec |
//! | UT1−UTC (Bull. A)| `58..68`   | second |
//!
//! The IERS extends the file past the prediction horizon with rows where only the date is
//! filled. Such rows end the data: they may only be followed by rows of the same kind.

use std::ops::Range;

use camino::Utf8Path;

use super::{EopDataError, EopRecord};

const MJD_COLUMNS: Range<usize> = 7..15;
const PM_X_COLUMNS: Range<usize> = 18..27;
const PM_Y_COLUMNS: Range<usize> = 37..46;
const UT1_UTC_COLUMNS: Range<usize> = 58..68;

/// Read and parse a `finals2000A` file.
pub fn read_finals(path: &Utf8Path) -> Result<Vec<EopRecord>, EopDataError> {
    let content = std::fs::read_to_string(path).map_err(|source| EopDataError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_finals(&content)
}

/// Parse the content of a `finals2000A` file.
///
/// Blank lines are skipped. Records are returned in file order; ordering is checked when
/// the table is built.
///
/// Return
/// ------
/// * the records, or [`EopDataError::Malformed`] pointing at the first bad line (1-based).
pub fn parse_finals(content: &str) -> Result<Vec<EopRecord>, EopDataError> {
    let mut records = Vec::new();
    let mut horizon: Option<usize> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        match parse_finals_line(line, line_number)? {
            Some(record) => {
                if let Some(start) = horizon {
                    return Err(EopDataError::Malformed {
                        line: line_number,
                        reason: format!(
                            "values resume after the unfilled rows starting at line {start}"
                        ),
                    });
                }
                records.push(record);
            }
            None => {
                horizon.get_or_insert(line_number);
            }
        }
    }

    Ok(records)
}

/// Parse one `finals2000A` line.
///
/// Return
/// ------
/// * `Some(record)` for a filled row, `None` for a row past the prediction horizon.
fn parse_finals_line(line: &str, line_number: usize) -> Result<Option<EopRecord>, EopDataError> {
    let malformed = |reason: String| EopDataError::Malformed {
        line: line_number,
        reason,
    };

    let mjd = field(line, MJD_COLUMNS)
        .ok_or_else(|| malformed("missing MJD".into()))
        .and_then(|s| parse_number(s, "MJD").map_err(malformed))?;

    let columns = [
        ("PM-x", field(line, PM_X_COLUMNS)),
        ("PM-y", field(line, PM_Y_COLUMNS)),
        ("UT1-UTC", field(line, UT1_UTC_COLUMNS)),
    ];

    if columns.iter().all(|(_, value)| value.is_none()) {
        return Ok(None);
    }

    let mut values = [0.0; 3];
    for (slot, (name, value)) in values.iter_mut().zip(columns) {
        let text = value.ok_or_else(|| malformed(format!("missing {name} at MJD {mjd}")))?;
        *slot = parse_number(text, name).map_err(malformed)?;
    }
    let [polar_motion_x, polar_motion_y, ut1_minus_utc] = values;

    Ok(Some(EopRecord::new(
        mjd,
        ut1_minus_utc,
        polar_motion_x,
        polar_motion_y,
    )))
}

/// Trimmed content of a fixed-width column, `None` when blank or beyond the end of the line.
fn field(line: &str, columns: Range<usize>) -> Option<&str> {
    let end = columns.end.min(line.len());
    let text = line.get(columns.start..end)?.trim();
    (!text.is_empty()).then_some(text)
}

fn parse_number(text: &str, name: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("invalid {name} value '{text}'"))
}
