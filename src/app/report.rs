use crate::domain::model::SourceRunResult;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

const HEADERS: [&str; 4] = ["Language", "Found", "Processed", "Average salary"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub language: String,
    pub found: u64,
    pub processed: u64,
    pub average_salary: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub languages: Vec<ReportRow>,
}

impl SourceReport {
    pub fn new(result: &SourceRunResult) -> Self {
        Self {
            source: result.source.clone(),
            generated_at: Utc::now(),
            languages: rows(result),
        }
    }
}

pub fn rows(result: &SourceRunResult) -> Vec<ReportRow> {
    result
        .stats
        .iter()
        .map(|(language, stats)| ReportRow {
            language: language.to_string(),
            found: stats.found,
            processed: stats.processed,
            average_salary: stats.average_salary,
        })
        .collect()
}

/// ASCII table with the title set into the top border.
pub fn render_table(title: &str, result: &SourceRunResult) -> String {
    let body: Vec<[String; 4]> = rows(result)
        .into_iter()
        .map(|r| {
            [
                r.language,
                r.found.to_string(),
                r.processed.to_string(),
                r.average_salary.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = border(&widths);
    let mut lines = vec![titled_border(&separator, title)];
    lines.push(line(&HEADERS.map(str::to_string), &widths));
    lines.push(separator.clone());
    lines.extend(body.iter().map(|row| line(row, &widths)));
    lines.push(separator);
    lines.join("\n")
}

fn border(widths: &[usize; 4]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

fn titled_border(separator: &str, title: &str) -> String {
    let title_len = title.chars().count();
    let border_len = separator.chars().count();
    // 標題放不下就退回普通邊框
    if title.is_empty() || title_len + 2 > border_len {
        return separator.to_string();
    }
    let rest: String = separator.chars().skip(title_len + 1).collect();
    format!("+{}{}", title, rest)
}

fn line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!(" {}{} ", cell, " ".repeat(pad))
        })
        .collect();
    format!("|{}|", padded.join("|"))
}

pub fn to_csv(result: &SourceRunResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows(result) {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::utils::error::StatsError::IoError(e.into_error()))
}

pub fn to_json(report: &SourceReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

/// Writes `<source>.csv` and `<source>.json` through a storage backend.
pub struct ReportExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn export(&self, result: &SourceRunResult) -> Result<Vec<String>> {
        let csv_name = format!("{}.csv", result.source);
        let json_name = format!("{}.json", result.source);

        self.storage.write_file(&csv_name, &to_csv(result)?).await?;
        self.storage
            .write_file(&json_name, &to_json(&SourceReport::new(result))?)
            .await?;

        tracing::info!("💾 {}: exported {} and {}", result.source, csv_name, json_name);
        Ok(vec![csv_name, json_name])
    }
}
