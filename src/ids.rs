use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::html_table::is_inline_header_row;

static PLAYER_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/en/players/([a-f0-9]+)/").expect("static regex should parse"));
static SQUAD_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/en/squads/([a-f0-9]+)/").expect("static regex should parse"));

static PLAYER_CELL: Lazy<Selector> = Lazy::new(|| sel(r#"td[data-stat="player"]"#));
static TEAM_CELL: Lazy<Selector> = Lazy::new(|| sel(r#"th[data-stat="team"]"#));
static ROW_PLAYER_CELL: Lazy<Selector> =
    Lazy::new(|| sel(r#"th[data-stat="player"], td[data-stat="player"]"#));
static ROW_TEAM_CELL: Lazy<Selector> =
    Lazy::new(|| sel(r#"th[data-stat="team"], td[data-stat="team"]"#));
static BODY_ROW: Lazy<Selector> = Lazy::new(|| sel("tbody tr"));
static LINK: Lazy<Selector> = Lazy::new(|| sel("a"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector should parse")
}

/// Which entity's identifiers to pull out of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Player,
    Team,
}

/// Map display names to fbref hex identifiers by scanning a table's anchor
/// links. Player names sit in `td` cells, team names in row-header `th`
/// cells. Cells without a link matching the expected href pattern are
/// skipped silently; an absent table yields an empty map.
pub fn extract_ids(table: Option<ElementRef>, kind: IdKind) -> HashMap<String, String> {
    let mut ids = HashMap::new();
    let Some(table) = table else {
        return ids;
    };

    let (cell_sel, href_re): (&Selector, &Regex) = match kind {
        IdKind::Player => (&*PLAYER_CELL, &*PLAYER_HREF),
        IdKind::Team => (&*TEAM_CELL, &*SQUAD_HREF),
    };

    for cell in table.select(cell_sel) {
        if let Some((name, id)) = link_name_and_id(cell, href_re) {
            ids.insert(name, id);
        }
    }
    ids
}

/// Per-row (player id, team id) pairs for a player table, in document order.
///
/// Section-header rows repeated inside the body are skipped; for every other
/// row, the player and team identifiers are extracted independently and
/// either may be absent. This is what lets a player who appears once per
/// team be associated with the right squad positionally.
pub fn extract_player_team_pairs(
    table: Option<ElementRef>,
) -> Vec<(Option<String>, Option<String>)> {
    let mut pairs = Vec::new();
    let Some(table) = table else {
        return pairs;
    };

    for row in table.select(&BODY_ROW) {
        if is_inline_header_row(row) {
            continue;
        }
        let player_id = row
            .select(&ROW_PLAYER_CELL)
            .next()
            .and_then(|cell| link_id(cell, &PLAYER_HREF));
        let team_id = row
            .select(&ROW_TEAM_CELL)
            .next()
            .and_then(|cell| link_id(cell, &SQUAD_HREF));
        pairs.push((player_id, team_id));
    }
    pairs
}

fn link_name_and_id(cell: ElementRef, href_re: &Regex) -> Option<(String, String)> {
    let link = cell.select(&LINK).next()?;
    let href = link.value().attr("href")?;
    let id = href_re.captures(href)?.get(1)?.as_str().to_string();
    let name = link.text().collect::<String>().trim().to_string();
    Some((name, id))
}

fn link_id(cell: ElementRef, href_re: &Regex) -> Option<String> {
    let link = cell.select(&LINK).next()?;
    let href = link.value().attr("href")?;
    Some(href_re.captures(href)?.get(1)?.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn with_table<T>(html: &str, f: impl FnOnce(Option<ElementRef>) -> T) -> T {
        let doc = Html::parse_document(html);
        let table_sel = Selector::parse("table").expect("selector");
        f(doc.select(&table_sel).next())
    }

    #[test]
    fn absent_table_yields_empty_map() {
        assert!(extract_ids(None, IdKind::Player).is_empty());
        assert!(extract_player_team_pairs(None).is_empty());
    }

    #[test]
    fn non_matching_hrefs_are_skipped() {
        let html = "<table><tbody><tr>\
            <td data-stat=\"player\"><a href=\"/en/matches/abc123/\">Saka</a></td>\
            <td data-stat=\"player\">No Link</td>\
            </tr></tbody></table>";
        with_table(html, |t| {
            assert!(extract_ids(t, IdKind::Player).is_empty());
        });
    }

    #[test]
    fn player_ids_come_from_td_cells() {
        let html = "<table><tbody><tr>\
            <td data-stat=\"player\"><a href=\"/en/players/bc7dc64d/Bukayo-Saka\">Bukayo Saka</a></td>\
            </tr></tbody></table>";
        with_table(html, |t| {
            let ids = extract_ids(t, IdKind::Player);
            assert_eq!(ids.get("Bukayo Saka").map(String::as_str), Some("bc7dc64d"));
        });
    }

    #[test]
    fn team_ids_come_from_th_cells() {
        let html = "<table><tbody><tr>\
            <th data-stat=\"team\"><a href=\"/en/squads/18bb7c10/Arsenal-Stats\">Arsenal</a></th>\
            <td data-stat=\"team\"><a href=\"/en/squads/deadbeef/Nope\">Nope</a></td>\
            </tr></tbody></table>";
        with_table(html, |t| {
            let ids = extract_ids(t, IdKind::Team);
            assert_eq!(ids.len(), 1);
            assert_eq!(ids.get("Arsenal").map(String::as_str), Some("18bb7c10"));
        });
    }

    #[test]
    fn pairs_follow_row_order_and_allow_absences() {
        let html = "<table><tbody>\
            <tr>\
              <td data-stat=\"player\"><a href=\"/en/players/aa11bb22/A\">A</a></td>\
              <td data-stat=\"team\"><a href=\"/en/squads/18bb7c10/X\">X</a></td>\
            </tr>\
            <tr class=\"thead\"><td data-stat=\"player\">Player</td></tr>\
            <tr>\
              <td data-stat=\"player\">No Link</td>\
              <td data-stat=\"team\"><a href=\"/en/squads/cff3d9bb/Y\">Y</a></td>\
            </tr>\
            </tbody></table>";
        with_table(html, |t| {
            let pairs = extract_player_team_pairs(t);
            assert_eq!(
                pairs,
                vec![
                    (Some("aa11bb22".to_string()), Some("18bb7c10".to_string())),
                    (None, Some("cff3d9bb".to_string())),
                ]
            );
        });
    }
}
