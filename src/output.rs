//! Report rendering for the terminal.

use std::fmt::Write as _;

use promo_planner::{ProductRow, RegionReport};
use serde_json::Value;

pub const NO_HOLIDAY_DATA: &str = "연휴 데이터가 없습니다.";
pub const NO_KEYWORD_DATA: &str = "인기검색어 데이터가 없습니다.";
pub const NO_PROMOTION_DATA: &str = "프로모션 컨셉 추천 데이터가 없습니다.";
pub const NO_TREND_DATA: &str = "트렌드 데이터가 없습니다.";

/// Renders a report as plain text.
pub fn render_text(report: &RegionReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "대상 월: {}", report.target_ym);
    let _ = writeln!(out, "국가: {} {}", report.flag, report.region);
    out.push('\n');

    out.push_str("== 🌏 NOW TREND ==\n");
    if report.trend.is_empty() {
        let _ = writeln!(out, "- {NO_TREND_DATA}");
    }
    for section in report.trend.sections.iter().filter(|section| !section.is_empty()) {
        let _ = writeln!(out, "{}", section.title);
        if !section.hashtags.is_empty() {
            let _ = writeln!(out, "  {}", section.hashtags.join(" "));
        }
        for bullet in &section.bullets {
            let _ = writeln!(out, "  - {bullet}");
        }
    }
    out.push('\n');

    out.push_str("== 🗓️ 연휴 상황 ==\n");
    if report.holidays.is_empty() {
        let _ = writeln!(out, "- {NO_HOLIDAY_DATA}");
    }
    for name in &report.holidays {
        let _ = writeln!(out, "• {name}");
    }
    out.push('\n');

    out.push_str("== 🔎 인기검색어 Top 10 ==\n");
    if report.keywords.is_empty() {
        let _ = writeln!(out, "- {NO_KEYWORD_DATA}");
    }
    for (position, keyword) in report.keywords.iter().enumerate() {
        let rank = if keyword.is_ranked() {
            keyword.rank.to_string()
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "{:>2}. {} (rank {rank}, volume {})",
            position + 1,
            keyword.keyword,
            format_number(keyword.search_value)
        );
    }
    out.push('\n');

    out.push_str("== 🎯 프로모션 컨셉 ==\n");
    if report.themes.is_empty() {
        let _ = writeln!(out, "- {NO_PROMOTION_DATA}");
    }
    for assignment in &report.themes {
        let _ = writeln!(out, "• {}", assignment.theme);
        for row in assignment.rows() {
            let _ = writeln!(out, "  {}", render_row(&row));
        }
    }

    out
}

fn render_row(row: &ProductRow) -> String {
    let stock = row.stock.as_ref().map_or_else(|| "-".to_string(), display_value);
    let score = row.score_total.map_or_else(|| "-".to_string(), format_number);
    let mechanic = row.suggested_mechanic.as_deref().unwrap_or("-");
    format!(
        "{} | {} | stock {stock} | score {score} | {mechanic}",
        row.name, row.category
    )
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
