//! Dashboard utility functions
//!
//! Contains the formatting helpers shared across dashboard components

use crate::api::resources::{Metrics, QueryTypes, Timestamp};
use crate::events::EventType;
use ratatui::prelude::Color;

/// Chart palette; entries cycle by index.
pub const CHART_PALETTE: [Color; 5] = [
    Color::Rgb(0x4e, 0x79, 0xa7),
    Color::Rgb(0xf2, 0x8e, 0x2b),
    Color::Rgb(0xe1, 0x57, 0x59),
    Color::Rgb(0x76, 0xb7, 0xb2),
    Color::Rgb(0x59, 0xa1, 0x4f),
];

pub fn chart_color(index: usize) -> Color {
    CHART_PALETTE[index % CHART_PALETTE.len()]
}

/// Get a ratatui color for a notification based on its type
pub fn get_event_color(event_type: EventType) -> Color {
    match event_type {
        EventType::Success => Color::Green,
        EventType::Info => Color::Cyan,
        EventType::Warning => Color::LightYellow,
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// The four headline cards of the overview tab, as (label, value).
pub fn metrics_cards(metrics: &Metrics) -> [(&'static str, String); 4] {
    [
        ("Total queries", metrics.total.to_string()),
        ("Blocked", metrics.blocked.to_string()),
        ("Blocked %", format_percentage(metrics.percentage_blocked)),
        ("Blocklist domains", metrics.domain_block_len.to_string()),
    ]
}

/// One chart entry per query type: (label, count, color).
pub fn query_type_bars(query_types: &QueryTypes) -> Vec<(String, u64, Color)> {
    query_types
        .0
        .iter()
        .enumerate()
        .map(|(index, entry)| (entry.query_type.clone(), entry.count, chart_color(index)))
        .collect()
}

/// Server timestamp as `MM-DD HH:MM` local time, or the raw value if it does not parse.
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    match timestamp.to_local() {
        Some(local) => local.format("%m-%d %H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Remaining pause time as `Xm Ys`.
pub fn format_time_left(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}m {}s", seconds / 60, seconds % 60)
}
