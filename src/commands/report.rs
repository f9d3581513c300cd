//! Plain-terminal rendering of analyses shared by `show`, `analyze` and `history`.

use colored::*;

use crate::analytics::recommendations::{classify, to_markup, RecommendationBlock};
use crate::analytics::{chart, format_number, ChartSeries, Trends};
use crate::models::{AnalysisRecord, RecommendationCategory};
use crate::ui::{display_key, display_value};

const BAR_WIDTH: usize = 30;

/// Render a full analysis report
pub fn render_record(
    record: &AnalysisRecord,
    trends: &Trends,
    date_format: &str,
    markup: bool,
) -> String {
    let mut out = Vec::new();

    out.push(
        format!("Analysis #{} · {}", record.id, record.date.format(date_format))
            .bold()
            .to_string(),
    );
    out.push("────────────────────────────────".to_string());

    if let Some(score) = record.fitness_score() {
        let mut line = format!("Fitness Score: {}/100", format_number(score).green().bold());
        if let Some(overall) = record.overall_fitness() {
            line.push_str(&format!(" ({})", overall.yellow()));
        }
        out.push(line);
    }

    if let Some(level) = record.activity_level() {
        out.push(format!("Activity Level: {}", level));
    }

    out.push(String::new());
    out.push("Fitness Data".bold().to_string());

    if record.fitness_data.is_empty() {
        out.push("  No metrics were extracted from this image.".dimmed().to_string());
    }

    for (key, value) in &record.fitness_data {
        let mut line = format!("  {:<18} {}", display_key(key), display_value(value));
        if let Some(trend) = trends.for_key(key) {
            let chip = trend.chip_label();
            let chip = if trend.improved { chip.green() } else { chip.red() };
            line.push_str(&format!("  {}", chip));
        }
        out.push(line);
    }

    if let Some(series) = chart::build(record).filter(|s| !s.is_empty()) {
        out.push(String::new());
        out.push(chart::DATASET_LABEL.bold().to_string());
        out.extend(render_bars(&series));
    }

    let insights = record.insights();
    if !insights.is_empty() {
        out.push(String::new());
        out.push("Insights".bold().to_string());
        out.extend(insights.iter().map(|insight| format!("  • {}", insight)));
    }

    for category in RecommendationCategory::ALL {
        let text = record.recommendations.get(category);
        if text.trim().is_empty() {
            continue;
        }

        out.push(String::new());
        out.push(category.title().bold().to_string());
        out.extend(render_recommendation(text, markup));
    }

    out.join("\n")
}

fn render_recommendation(text: &str, markup: bool) -> Vec<String> {
    if markup {
        return vec![to_markup(text)];
    }

    match classify(text) {
        RecommendationBlock::List(items) => items
            .iter()
            .map(|item| format!("  {} {}", "•".cyan(), item))
            .collect(),
        RecommendationBlock::Paragraph(paragraph) => paragraph
            .trim()
            .lines()
            .map(|line| format!("  {}", line.trim()))
            .collect(),
    }
}

/// Horizontal bars scaled to the largest value
pub fn render_bars(series: &ChartSeries) -> Vec<String> {
    let max = series.max_value().filter(|m| *m > 0.0).unwrap_or(0.0);
    let label_width = series
        .labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);

    series
        .iter()
        .map(|(label, value)| {
            let filled = if max > 0.0 && value > 0.0 {
                ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize
            } else {
                0
            };
            format!(
                "  {:<width$} {}{} {}",
                label,
                "█".repeat(filled).cyan(),
                " ".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
                format_number(value),
                width = label_width
            )
        })
        .collect()
}

/// One history row: `#12  2024-03-05 08:15  8500 steps • Active`
pub fn render_history_row(record: &AnalysisRecord, date_format: &str) -> String {
    format!(
        "{:<6} {}  {}",
        format!("#{}", record.id).dimmed(),
        record.date.format(date_format),
        record.summary_line()
    )
}
