//! Downloads fbref stats pages for a competition-season, extracts the
//! embedded squad and player tables together with the entity ids hidden in
//! their anchor links, merges every stat category into three consolidated
//! tables (team-for, team-against, player) and writes them out as JSON.

pub mod catalog;
pub mod driver;
pub mod enrich;
pub mod fetch;
pub mod html_table;
pub mod ids;
pub mod merge;
pub mod persist;
pub mod scrape;
pub mod table;
