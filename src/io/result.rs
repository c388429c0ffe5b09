//! Read/write result JSON files.
//!
//! A result file is the portable form of one calculation: the validated input,
//! the gap-filled series, the trajectory and its statistics. `inflatio plot`
//! re-renders it without touching the network.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::pipeline::RunOutput;
use crate::error::AppError;

const TOOL: &str = "inflatio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    pub generated_on: NaiveDate,
    pub run: RunOutput,
}

/// Write a result JSON file.
pub fn write_result_json(path: &Path, run: &RunOutput, generated_on: NaiveDate) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    let result = ResultFile {
        tool: TOOL.to_string(),
        generated_on,
        run: run.clone(),
    };

    serde_json::to_writer_pretty(file, &result)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;

    Ok(())
}

/// Read a result JSON file.
pub fn read_result_json(path: &Path) -> Result<ResultFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let result: ResultFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))?;
    if result.tool != TOOL {
        return Err(AppError::new(
            2,
            format!("'{}' was written by '{}', not {TOOL}.", path.display(), result.tool),
        ));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::{CalculatorInput, FilledObservation, FilledSeries, ValuePoint};

    #[test]
    fn result_file_survives_disk() {
        let run = RunOutput {
            input: CalculatorInput {
                country_code: "DE".to_string(),
                principal: 250.0,
                start_year: 2023,
            },
            current_year: 2024,
            country_name: Some("Germany".to_string()),
            series: FilledSeries {
                observations: vec![FilledObservation { year: 2023, rate: 0.0625, was_deduced: false }],
                deduced_years: BTreeSet::new(),
            },
            trajectory: vec![
                ValuePoint { year: 2023, amount: 265.625 },
                ValuePoint { year: 2024, amount: 250.0 },
            ],
            stats: crate::report::compute_stats(&FilledSeries::default()),
        };

        let path = std::env::temp_dir().join(format!("inflatio_result_{}.json", std::process::id()));
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        write_result_json(&path, &run, day).unwrap();
        let back = read_result_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.generated_on, day);
        assert_eq!(back.run, run);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_result_json(Path::new("/nonexistent/inflatio.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
