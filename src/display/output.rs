use crate::pipeline::CollectionReport;
use crate::view::{RankedRow, ViewFilter};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: String,
    champion: String,
    role: String,
    games: String,
    trend: String,
}

fn format_trend(trend: Option<f64>) -> String {
    match trend {
        Some(t) if t > 0.0 => format!("▲ {:.1}%", t).green().to_string(),
        Some(t) if t < 0.0 => format!("▼ {:.1}%", t.abs()).red().to_string(),
        Some(_) => "= 0.0%".to_string(),
        None => "-".dimmed().to_string(),
    }
}

pub fn display_rankings(rows: &[RankedRow<'_>], filter: &ViewFilter, limit: usize) {
    let mut title = format!("👑 Champion Ranking ({})", filter.role);
    if !filter.search_query.trim().is_empty() {
        title.push_str(&format!(" matching \"{}\"", filter.search_query.trim()));
    }
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if rows.is_empty() {
        println!("{}", "No champions match the current filter".yellow());
        return;
    }

    let table_rows: Vec<RankingRow> = rows
        .iter()
        .take(limit)
        .map(|row| RankingRow {
            rank: format!("#{}", row.rank),
            champion: row.stat.champion_name.clone(),
            role: row
                .stat
                .role
                .map(|r| r.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
            games: row.stat.count.to_string(),
            trend: format_trend(row.stat.trend_percentage),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!("\n{} {} champions\n", "Total:".bold(), rows.len().to_string().magenta());
}

pub fn display_collection_summary(report: &CollectionReport) {
    println!("\n{}", "📈 Collection summary".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!("• Ladder size:        {}", report.leaderboard_size);
    println!("• Players selected:   {}", report.players_selected);
    println!(
        "• Players with data:  {}",
        report.snapshot.total_players_analyzed.to_string().green()
    );
    if report.players_failed > 0 {
        println!("• Players skipped:    {}", report.players_failed.to_string().yellow());
    }
    let games: usize = report.snapshot.results.iter().map(|s| s.count).sum();
    println!("• Games counted:      {}", games);
    println!("• Champion/role pairs: {}\n", report.snapshot.results.len());
}

/// Follow-up line for players dropped after soft errors. Their warnings
/// are logged at the default level, so they are already on screen.
pub fn skipped_players_notice(players_failed: usize) -> String {
    let noun = if players_failed == 1 { "player" } else { "players" };
    format!(
        "{} {} skipped after errors (see the warnings above)",
        players_failed, noun
    )
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
