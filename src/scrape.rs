use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::catalog::StatCategory;
use crate::enrich::{add_id_column, add_team_id_column};
use crate::html_table::parse_table;
use crate::ids::{IdKind, extract_ids, extract_player_team_pairs};
use crate::merge::{PLAYER_COL, PLAYER_ID_COL, SQUAD_COL, TEAM_ID_COL};
use crate::table::StatTable;

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("static selector should parse"));

/// The three tables one stat category contributes, already id-enriched.
#[derive(Debug, Default)]
pub struct CategoryTables {
    pub squad: StatTable,
    pub opponent: StatTable,
    pub player: StatTable,
    /// Non-fatal extraction diagnostics (e.g. the lossy team-association
    /// fallback fired).
    pub notes: Vec<String>,
}

/// fbref wraps most stats tables in HTML comments so they load lazily;
/// stripping the comment markers makes them parseable like any other table.
pub fn uncover_commented_tables(html: &str) -> String {
    html.replace("<!--", "").replace("-->", "")
}

/// Pull the squad-for, squad-against and player tables for one category out
/// of the already-fetched page markup. For aggregate views the player table
/// lives on its own page, so the two arguments differ there; everywhere else
/// the same markup is passed twice. Missing tables yield empty StatTables.
pub fn extract_category_tables(
    squad_html: &str,
    player_html: &str,
    category: &StatCategory,
) -> CategoryTables {
    let squad_doc = Html::parse_document(&uncover_commented_tables(squad_html));
    let mut out = CategoryTables::default();

    let for_suffix = format!("{}_for", category.table_stem);
    if let Some(tag) = find_table(&squad_doc, |id| id.ends_with(&for_suffix)) {
        out.squad = squad_table(tag);
    }

    let against_suffix = format!("{}_against", category.table_stem);
    if let Some(tag) = find_table(&squad_doc, |id| id.ends_with(&against_suffix)) {
        out.opponent = squad_table(tag);
    }

    let player_doc = Html::parse_document(&uncover_commented_tables(player_html));
    let player_id = format!("stats_{}", category.table_stem);
    if let Some(tag) = find_table(&player_doc, |id| id == player_id) {
        out.player = parse_table(tag);
        add_id_column(
            &mut out.player,
            &extract_ids(Some(tag), IdKind::Player),
            PLAYER_COL,
            PLAYER_ID_COL,
        );
        let pairs = extract_player_team_pairs(Some(tag));
        if let Some(note) = add_team_id_column(&mut out.player, &pairs) {
            out.notes.push(format!("{}: {note}", category.name));
        }
    }

    out
}

fn squad_table(tag: ElementRef) -> StatTable {
    let mut table = parse_table(tag);
    add_id_column(
        &mut table,
        &extract_ids(Some(tag), IdKind::Team),
        SQUAD_COL,
        TEAM_ID_COL,
    );
    table
}

fn find_table<'a>(doc: &'a Html, matches: impl Fn(&str) -> bool) -> Option<ElementRef<'a>> {
    doc.select(&TABLE)
        .find(|t| t.value().attr("id").is_some_and(&matches))
}
