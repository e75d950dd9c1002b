use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::driver::ScrapeSummary;
use crate::table::StatTable;

/// Which of the three consolidated tables to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    PlayerOnly,
    TeamOnly,
    VsTeamOnly,
    All,
}

impl StorageMode {
    /// Accepts `player_only` / `player only` and friends, case-insensitive.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().replace('_', " ").as_str() {
            "player only" => Ok(StorageMode::PlayerOnly),
            "team only" => Ok(StorageMode::TeamOnly),
            "vs team only" => Ok(StorageMode::VsTeamOnly),
            "all" => Ok(StorageMode::All),
            other => Err(anyhow!(
                "invalid storage mode '{other}'; expected player_only, team_only, vs_team_only or all"
            )),
        }
    }

    fn includes_player(self) -> bool {
        matches!(self, StorageMode::PlayerOnly | StorageMode::All)
    }

    fn includes_team(self) -> bool {
        matches!(self, StorageMode::TeamOnly | StorageMode::All)
    }

    fn includes_vs_team(self) -> bool {
        matches!(self, StorageMode::VsTeamOnly | StorageMode::All)
    }
}

/// `<root>/<season-start>_<season-end-2digit>/<competition>/`
pub fn output_dir(root: &Path, competition: &str, end_year: u16) -> PathBuf {
    let season_dir = format!("{}_{:02}", end_year - 1, end_year % 100);
    root.join(season_dir).join(competition)
}

/// Write the selected consolidated tables as JSON documents, returning the
/// paths written.
pub fn save_tables(
    root: &Path,
    competition: &str,
    end_year: u16,
    mode: StorageMode,
    summary: &ScrapeSummary,
) -> Result<Vec<PathBuf>> {
    let dir = output_dir(root, competition, end_year);
    fs::create_dir_all(&dir).with_context(|| format!("create output dir {}", dir.display()))?;

    let prefix = format!("{} {end_year}", competition.to_lowercase());
    let mut written = Vec::new();

    if mode.includes_player() {
        let path = dir.join(format!("{prefix} player data.json"));
        write_table(&path, &summary.player)?;
        written.push(path);
    }
    if mode.includes_team() {
        let path = dir.join(format!("{prefix} team data.json"));
        write_table(&path, &summary.team_for)?;
        written.push(path);
    }
    if mode.includes_vs_team() {
        let path = dir.join(format!("{prefix} vs team data.json"));
        write_table(&path, &summary.team_against)?;
        written.push(path);
    }

    Ok(written)
}

fn write_table(path: &Path, table: &StatTable) -> Result<()> {
    let json = serde_json::to_string(table).context("serialize table")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}
