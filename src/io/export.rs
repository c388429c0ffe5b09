//! Export per-year results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;

/// Write one row per trajectory year.
pub fn write_results_csv(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(&mut file, run)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_results(out: &mut impl Write, run: &RunOutput) -> std::io::Result<()> {
    writeln!(out, "country,year,inflation_rate,deduced,amount")?;

    for point in &run.trajectory {
        let obs = run.series.observations.iter().find(|o| o.year == point.year);
        writeln!(
            out,
            "{},{},{},{},{:.6}",
            run.input.country_code,
            point.year,
            obs.map(|o| format!("{:.10}", o.rate)).unwrap_or_default(),
            obs.map(|o| o.was_deduced.to_string()).unwrap_or_default(),
            point.amount,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::{CalculatorInput, FilledObservation, FilledSeries, ValuePoint};

    #[test]
    fn csv_has_row_per_year() {
        let run = RunOutput {
            input: CalculatorInput {
                country_code: "FR".to_string(),
                principal: 10.0,
                start_year: 2024,
            },
            current_year: 2025,
            country_name: None,
            series: FilledSeries {
                observations: vec![FilledObservation { year: 2024, rate: 0.02, was_deduced: true }],
                deduced_years: BTreeSet::from([2024]),
            },
            trajectory: vec![
                ValuePoint { year: 2024, amount: 10.2 },
                ValuePoint { year: 2025, amount: 10.0 },
            ],
            stats: None,
        };

        let mut buf = Vec::new();
        write_results(&mut buf, &run).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "country,year,inflation_rate,deduced,amount\n\
             FR,2024,0.0200000000,true,10.200000\n\
             FR,2025,,,10.000000\n"
        );
    }
}
