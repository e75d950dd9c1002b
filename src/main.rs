use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use fbref_ingest::catalog;
use fbref_ingest::driver::scrape_competition;
use fbref_ingest::persist::{StorageMode, save_tables};

const DEFAULT_OUT_DIR: &str = "data_directory/fbref_data";

fn main() -> Result<()> {
    let league = flag_or_env("--league", "FBREF_LEAGUE")
        .ok_or_else(|| anyhow!("missing --league (or FBREF_LEAGUE); e.g. 'England Premier League'"))?;
    let end_year = flag_or_env("--end-year", "FBREF_END_YEAR")
        .ok_or_else(|| anyhow!("missing --end-year (or FBREF_END_YEAR); e.g. 2023"))?
        .parse::<u16>()
        .context("end year must be a number")?;
    let mode = StorageMode::parse(&flag_or_env("--mode", "FBREF_MODE").unwrap_or_else(|| "all".to_string()))?;
    let out_root = PathBuf::from(
        flag_or_env("--out", "FBREF_OUT").unwrap_or_else(|| DEFAULT_OUT_DIR.to_string()),
    );

    // Fail fast before any fetch.
    let comp = catalog::competition(&league)?;
    catalog::validate_end_year(comp, end_year)?;

    println!(
        "Scraping {league} season {}...",
        catalog::season_label(comp, end_year)
    );

    let summary = scrape_competition(&league, end_year)?;

    println!("Player data: {} rows", summary.player.row_count());
    println!("Team data: {} rows", summary.team_for.row_count());
    println!("Vs Team data: {} rows", summary.team_against.row_count());
    if summary.incomplete_player_rows_dropped > 0 {
        println!(
            "Removed {} incomplete player rows (no Player name)",
            summary.incomplete_player_rows_dropped
        );
    }
    for warning in &summary.warnings {
        println!("Warning: {warning}");
    }

    let written = save_tables(&out_root, &league, end_year, mode, &summary)?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    println!("Done!");

    Ok(())
}

fn flag_or_env(flag: &str, env_key: &str) -> Option<String> {
    parse_flag(flag).or_else(|| {
        std::env::var(env_key)
            .ok()
            .filter(|v| !v.trim().is_empty())
    })
}

fn parse_flag(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefixed = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefixed) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
