//! Trajectory CSV loading.
//!
//! Rows carry named fields `timestamp,objid,x,y,z`; columns are resolved by
//! header name, not position. Any unparsable field aborts the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::DataError;
use crate::trajectory::TrajectoryRow;

const COLUMNS: [&str; 5] = ["timestamp", "objid", "x", "y", "z"];

/// Load trajectory rows from a CSV file on disk.
pub fn load_trajectory_csv<P: AsRef<Path>>(path: P) -> Result<Vec<TrajectoryRow>, DataError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::MissingSource(path.to_path_buf()));
    }
    debug!("Loading trajectory data from: {}", path.display());
    let file = File::open(path)?;
    let rows = parse_trajectory_csv(BufReader::new(file))?;
    info!("Trajectory file parsed: {} rows", rows.len());
    Ok(rows)
}

/// Parse trajectory rows from any buffered reader.
pub fn parse_trajectory_csv<R: BufRead>(reader: R) -> Result<Vec<TrajectoryRow>, DataError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Ok(Vec::new()),
        }
    };

    let fields: Vec<&str> = header.split(',').map(str::trim).collect();
    let mut indices = [0usize; COLUMNS.len()];
    for (slot, column) in indices.iter_mut().zip(COLUMNS) {
        *slot = fields
            .iter()
            .position(|f| *f == column)
            .ok_or_else(|| DataError::MissingColumn(column.to_string()))?;
    }
    let [ts_col, objid_col, x_col, y_col, z_col] = indices;

    fn get_field<'a>(
        fields: &[&'a str],
        col: usize,
        name: &str,
        line: usize,
    ) -> Result<&'a str, DataError> {
        fields.get(col).copied().ok_or_else(|| DataError::MalformedRow {
            line,
            reason: format!("missing {name} field"),
        })
    }

    fn get_coord(fields: &[&str], col: usize, name: &str, line: usize) -> Result<f64, DataError> {
        get_field(fields, col, name, line)?
            .parse()
            .map_err(|_| DataError::MalformedRow {
                line,
                reason: format!("unparsable {name} value"),
            })
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        rows.push(TrajectoryRow {
            timestamp: get_field(&fields, ts_col, "timestamp", line_number)?.to_string(),
            objid: get_field(&fields, objid_col, "objid", line_number)?.to_string(),
            x: get_coord(&fields, x_col, "x", line_number)?,
            y: get_coord(&fields, y_col, "y", line_number)?,
            z: get_coord(&fields, z_col, "z", line_number)?,
        });
    }

    Ok(rows)
}
