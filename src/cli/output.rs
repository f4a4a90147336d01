//! Rendering of load results and plans for the terminal

use clap::ValueEnum;
use serde_json::json;

use crate::pipeline::{LoadResult, StepName};
use crate::statement::Statement;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Format a load result for display
pub fn format_load_result(result: &LoadResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => format_result_as_table(result),
    }
}

/// Format the statements of a plan for display
pub fn format_plan(plan: &[(StepName, Vec<Statement>)], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let steps: Vec<serde_json::Value> = plan
                .iter()
                .map(|(step, statements)| json!({ "step": step, "statements": statements }))
                .collect();
            serde_json::to_string_pretty(&steps).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Table => format_plan_as_text(plan),
    }
}

fn format_result_as_table(result: &LoadResult) -> String {
    let columns = ["#", "step", "status", "duration_us"];
    let rows: Vec<[String; 4]> = result
        .step_log
        .iter()
        .map(|outcome| {
            [
                outcome.name.position().to_string(),
                outcome.name.to_string(),
                if outcome.succeeded { "ok" } else { "FAILED" }.to_string(),
                outcome.duration_micros.to_string(),
            ]
        })
        .collect();

    // Calculate column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.len());
        }
    }

    let mut output = String::new();

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
        .collect();
    output.push_str(&header.join(" | "));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&separator.join("-+-"));
    output.push('\n');

    for row in &rows {
        let values: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:width$}", v, width = widths[i]))
            .collect();
        output.push_str(&values.join(" | "));
        output.push('\n');
    }

    output.push_str(&format!("({} steps)\n", rows.len()));
    output.push_str(&format!("\nRun:         {}\n", result.run_id));
    output.push_str(&format!(
        "Rows staged: {}\n",
        result.rows_staged.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Rows loaded: {}\n",
        result.rows_loaded.as_deref().unwrap_or("-")
    ));
    for error in &result.errors {
        output.push_str(&format!("Error:       {}\n", error));
    }

    output
}

fn format_plan_as_text(plan: &[(StepName, Vec<Statement>)]) -> String {
    let mut output = String::new();
    for (step, statements) in plan {
        output.push_str(&format!("-- [{}] {}\n", step.position(), step));
        if statements.is_empty() {
            output.push_str("-- (nothing to execute)\n");
        }
        for statement in statements {
            output.push_str(&statement.to_string());
            output.push('\n');
        }
        output.push('\n');
    }
    output
}
