use std::mem;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::catalog::{self, Competition, STAT_CATEGORIES, StatCategory};
use crate::fetch::fetch_page;
use crate::merge::{self, EntityKind, PLAYER_COL, merge_keys, safe_merge};
use crate::scrape::{CategoryTables, extract_category_tables};
use crate::table::StatTable;

/// Minimum spacing between category fetches; fbref rate-limits aggressively.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(6);

/// Everything one competition-season run produces: the three consolidated
/// tables plus the non-fatal diagnostics collected along the way.
#[derive(Debug, Default)]
pub struct ScrapeSummary {
    pub player: StatTable,
    pub team_for: StatTable,
    pub team_against: StatTable,
    pub warnings: Vec<String>,
    pub incomplete_player_rows_dropped: usize,
}

/// Fetch every stat category for a competition-season, strictly one at a
/// time, merging each category's tables into the three consolidated tables.
/// Network failures abort the whole run; merge fan-out and lossy id
/// association are collected as warnings instead.
pub fn scrape_competition(league: &str, end_year: u16) -> Result<ScrapeSummary> {
    let comp = catalog::competition(league)?;
    catalog::validate_end_year(comp, end_year)?;

    let mut summary = ScrapeSummary::default();
    for category in STAT_CATEGORIES {
        let started = Instant::now();
        let tables = fetch_category(comp, end_year, category)
            .with_context(|| format!("fetching {} {}", category.name, end_year))?;
        consolidate_category(&mut summary, tables);

        let elapsed = started.elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            thread::sleep(MIN_REQUEST_INTERVAL - elapsed);
        }
    }

    finalize(&mut summary);
    Ok(summary)
}

/// Fetch and extract a single stat category by name. Unknown competitions,
/// seasons and categories fail fast, before any request goes out.
pub fn scrape_category(league: &str, end_year: u16, category: &str) -> Result<CategoryTables> {
    let comp = catalog::competition(league)?;
    catalog::validate_end_year(comp, end_year)?;
    let category = catalog::stat_category(category)?;
    fetch_category(comp, end_year, category)
}

fn fetch_category(
    comp: &Competition,
    end_year: u16,
    category: &StatCategory,
) -> Result<CategoryTables> {
    if comp.multi_league {
        // Aggregate views split squad and player stats over two sub-pages.
        let squad_html = fetch_page(&catalog::category_url(comp, end_year, category, Some("squads")))?;
        let player_html =
            fetch_page(&catalog::category_url(comp, end_year, category, Some("players")))?;
        Ok(extract_category_tables(&squad_html, &player_html, category))
    } else {
        let html = fetch_page(&catalog::category_url(comp, end_year, category, None))?;
        Ok(extract_category_tables(&html, &html, category))
    }
}

/// Merge one category's tables into the accumulating consolidated tables.
pub fn consolidate_category(summary: &mut ScrapeSummary, tables: CategoryTables) {
    accumulate(&mut summary.team_for, tables.squad, EntityKind::Team, &mut summary.warnings);
    accumulate(
        &mut summary.team_against,
        tables.opponent,
        EntityKind::Team,
        &mut summary.warnings,
    );
    accumulate(&mut summary.player, tables.player, EntityKind::Player, &mut summary.warnings);
    summary.warnings.extend(tables.notes);
}

fn accumulate(
    acc: &mut StatTable,
    incoming: StatTable,
    kind: EntityKind,
    warnings: &mut Vec<String>,
) {
    if incoming.is_empty() {
        return;
    }
    let keys = merge_keys(&incoming, kind);
    let outcome = safe_merge(mem::take(acc), incoming, &keys);
    *acc = outcome.table;
    warnings.extend(outcome.warning);
}

/// Post-merge cleanup: drop merge-collision columns, drop player rows that
/// exist only as outer-join artifacts (no player name), then coerce numeric
/// columns everywhere.
pub fn finalize(summary: &mut ScrapeSummary) {
    merge::strip_duplicate_columns(&mut summary.team_for);
    merge::strip_duplicate_columns(&mut summary.team_against);
    merge::strip_duplicate_columns(&mut summary.player);

    if let Some(names) = summary.player.column(PLAYER_COL) {
        let keep: Vec<bool> = names.values.iter().map(|c| !c.is_missing()).collect();
        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped > 0 {
            summary.player.retain_rows(|idx| keep[idx]);
            summary.incomplete_player_rows_dropped = dropped;
        }
    }

    summary.player.coerce_numeric_columns();
    summary.team_for.coerce_numeric_columns();
    summary.team_against.coerce_numeric_columns();
}
