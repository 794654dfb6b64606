//! Delimited text export of recorded samples.

use std::fmt::Write as _;
use std::path::Path;

use gt_engine::RunRecord;

use crate::error::{AppError, AppResult};

const HEADER: [&str; 7] = [
    "time_s",
    "phase",
    "n1_pct",
    "n2_pct",
    "thrust_lbf",
    "fuel_flow_pph",
    "egt_degc",
];

/// Render every sample as one row, header first.
pub fn samples_csv(record: &RunRecord, delimiter: &str) -> String {
    let mut out = HEADER.join(delimiter);
    out.push('\n');
    for s in &record.samples {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{t:.4}{d}{phase}{d}{n1:.3}{d}{n2:.3}{d}{thrust:.2}{d}{flow:.2}{d}{egt:.2}",
            t = s.t,
            phase = s.phase,
            n1 = s.n1,
            n2 = s.n2,
            thrust = s.thrust_lbf,
            flow = s.fuel_flow_pph,
            egt = s.egt_degc,
            d = delimiter,
        );
    }
    out
}

pub fn write_samples_csv(path: &Path, record: &RunRecord, delimiter: &str) -> AppResult<()> {
    std::fs::write(path, samples_csv(record, delimiter)).map_err(|source| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
