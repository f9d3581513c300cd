use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Widget, Wrap},
};
use serde_json::Value;

use crate::analytics::chart::DATASET_LABEL;
use crate::analytics::recommendations::{classify, RecommendationBlock};
use crate::analytics::{format_number, ChartSeries, Trends};
use crate::cache::CacheState;
use crate::models::{AnalysisRecord, HistoryList, RecommendationCategory};

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Gray))
}

/// Render the history list, keeping the selected row in view
pub fn render_history_list(
    area: Rect,
    buf: &mut Buffer,
    history: &HistoryList,
    selected_index: usize,
    date_format: &str,
) {
    let block = panel(" 📋 History ").border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    block.render(area, buf);

    if history.is_empty() {
        Paragraph::new("No history available yet.\nRun 'fitness-history analyze <image>' to start.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
        return;
    }

    // each record takes two rows
    let visible = (inner.height as usize / 2).max(1);
    let offset = selected_index.saturating_sub(visible - 1);

    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, record)| {
            let style = if idx == selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("#{:<4} ", record.id), Style::default().fg(Color::DarkGray)),
                    Span::raw(record.date.format(date_format).to_string()),
                ]),
                Line::from(Span::styled(
                    format!("      {}", record.summary_line()),
                    Style::default().fg(Color::Gray),
                )),
            ])
            .style(style)
        })
        .collect();

    List::new(items).render(inner, buf);
}

/// Render fitness data with trend chips and the analysis headline
pub fn render_record_detail(
    area: Rect,
    buf: &mut Buffer,
    record: Option<&AnalysisRecord>,
    trends: &Trends,
    date_format: &str,
) {
    let Some(record) = record else {
        let block = panel(" 🏃 Analysis ");
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new("Select an analysis to see its details.")
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
        return;
    };

    let title = format!(" 🏃 Analysis #{} · {} ", record.id, record.date.format(date_format));
    let block = panel(&title);
    let inner = block.inner(area);
    block.render(area, buf);

    let mut lines = Vec::new();

    if let Some(score) = record.fitness_score() {
        let mut spans = vec![
            Span::styled("Fitness Score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/100", format_number(score)),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(overall) = record.overall_fitness() {
            spans.push(Span::styled(format!("  {}", overall), Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    for (key, value) in &record.fitness_data {
        let mut spans = vec![
            Span::styled(format!("{:<18}", display_key(key)), Style::default().fg(Color::Gray)),
            Span::styled(
                display_value(value),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ];

        if let Some(trend) = trends.for_key(key) {
            let color = if trend.improved { Color::Green } else { Color::Red };
            spans.push(Span::styled(format!("  {}", trend.chip_label()), Style::default().fg(color)));
        }

        lines.push(Line::from(spans));
    }

    if record.fitness_data.is_empty() {
        lines.push(Line::from(Span::styled(
            "No metrics were extracted from this image.",
            Style::default().fg(Color::Gray),
        )));
    }

    Paragraph::new(lines).render(inner, buf);
}

/// Render the record's numeric metrics as a bar chart
pub fn render_metrics_chart(area: Rect, buf: &mut Buffer, series: Option<&ChartSeries>) {
    let title = format!(" 📈 {} ", DATASET_LABEL);
    let block = panel(&title);
    let inner = block.inner(area);
    block.render(area, buf);

    let Some(series) = series.filter(|s| !s.is_empty()) else {
        Paragraph::new("No numeric metrics to chart.")
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
        return;
    };

    let bars: Vec<Bar> = series
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .value(value.max(0.0).round() as u64)
                .label(Line::from(label.to_string()))
                .text_value(format_number(value))
        })
        .collect();

    let bar_width = (inner.width / series.len().max(1) as u16)
        .saturating_sub(1)
        .clamp(3, 12);

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .render(inner, buf);
}

/// Render the recommendation tabs and the active category
pub fn render_recommendations(
    area: Rect,
    buf: &mut Buffer,
    record: Option<&AnalysisRecord>,
    tab: RecommendationCategory,
) {
    let block = panel(" 💡 Recommendations ");
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height < 2 {
        return;
    }

    let tabs_area = Rect { height: 1, ..inner };
    let body_area = Rect {
        y: inner.y + 2,
        height: inner.height.saturating_sub(2),
        ..inner
    };

    Tabs::new(RecommendationCategory::ALL.iter().map(|c| c.to_string()))
        .select(tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider("|")
        .render(tabs_area, buf);

    let text = record
        .map(|r| r.recommendations.get(tab))
        .unwrap_or_default();

    if text.trim().is_empty() {
        Paragraph::new("No recommendations for this category.")
            .style(Style::default().fg(Color::Gray))
            .render(body_area, buf);
        return;
    }

    let lines: Vec<Line> = match classify(text) {
        RecommendationBlock::List(items) => items
            .into_iter()
            .map(|item| {
                Line::from(vec![
                    Span::styled("• ", Style::default().fg(Color::Cyan)),
                    Span::raw(item),
                ])
            })
            .collect(),
        RecommendationBlock::Paragraph(paragraph) => paragraph
            .trim()
            .lines()
            .map(|line| Line::from(line.trim().to_string()))
            .collect(),
    };

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(body_area, buf);
}

/// Render status bar
pub fn render_status_bar(area: Rect, buf: &mut Buffer, state: &CacheState) {
    let mut spans = Vec::new();

    if state.loading {
        spans.push(Span::styled(" ⏳ Loading… ", Style::default().fg(Color::Yellow)));
    } else if let Some(error) = &state.error {
        spans.push(Span::styled(format!(" ✗ {} ", error), Style::default().fg(Color::Red)));
    } else {
        spans.push(Span::styled(
            format!(" ✓ {} analyses ", state.history.len()),
            Style::default().fg(Color::Green),
        ));
    }

    if let Some(last_refresh) = state.last_refresh {
        spans.push(Span::styled(
            format!("│ refreshed {} ", last_refresh.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(
        "│ r refresh │ ↑↓ select │ Tab category │ ? help │ q quit",
        Style::default().fg(Color::DarkGray),
    ));

    Paragraph::new(Line::from(spans)).render(area, buf);
}

/// Render help overlay
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    block.render(area, buf);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let help = [
        ("↑/k  ↓/j", "Select analysis"),
        ("g  G", "First / last analysis"),
        ("Tab  ←/→", "Switch recommendation category"),
        ("r", "Refresh history from the service"),
        ("?", "Toggle this help"),
        ("q  Esc", "Quit"),
    ];

    let lines: Vec<Line> = help
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", keys), key_style),
                Span::raw(*description),
            ])
        })
        .collect();

    Paragraph::new(lines).render(inner, buf);
}

/// `active_minutes` -> `Active Minutes`
pub fn display_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| number.to_string()),
        Value::String(text) => text.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
