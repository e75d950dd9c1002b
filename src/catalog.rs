use anyhow::{Result, anyhow};

const BASE_URL: &str = "https://fbref.com/en/comps";

/// One supported competition: fbref competition id, URL slug, the earliest
/// season end-year with stats coverage, whether the season label is a single
/// calendar year, and whether the competition is a multi-league aggregate
/// view (squad and player tables live on separate sub-pages there).
#[derive(Debug, Clone, Copy)]
pub struct Competition {
    pub name: &'static str,
    pub comp_id: &'static str,
    pub slug: &'static str,
    pub first_end_year: u16,
    pub single_year: bool,
    pub multi_league: bool,
}

pub const COMPETITIONS: &[Competition] = &[
    comp("Argentina Liga Profesional", "21", "Primera-Division", 2015, true, false),
    comp("Australia A-League Women", "196", "A-League-Women", 2019, false, false),
    comp("Belgium Pro League", "37", "Belgian-Pro-League", 2015, false, false),
    comp("Brazil Serie A", "24", "Serie-A", 2014, true, false),
    comp("CONMEBOL Copa America", "685", "Copa-America", 2015, true, false),
    comp("CONMEBOL Copa Libertadores", "14", "Copa-Libertadores", 2014, true, false),
    comp("England EFL Championship", "10", "Championship", 2002, false, false),
    comp("England Premier League", "9", "Premier-League", 1993, false, false),
    comp("England WSL", "189", "Womens-Super-League", 2017, false, false),
    comp("FBref Big 5 Combined", "Big5", "Big-5-European-Leagues", 1996, false, true),
    comp("FIFA Womens World Cup", "106", "Womens-World-Cup", 1991, true, false),
    comp("FIFA World Cup", "1", "World-Cup", 1930, true, false),
    comp("France Ligue 1", "13", "Ligue-1", 1996, false, false),
    comp("France Ligue 2", "60", "Ligue-2", 2010, false, false),
    comp("France Premiere Ligue", "193", "Premiere-Ligue", 2019, false, false),
    comp("Germany 2.Bundesliga", "33", "2-Bundesliga", 2004, false, false),
    comp("Germany Bundesliga", "20", "Bundesliga", 1989, false, false),
    comp("Germany Womens Bundesliga", "183", "Frauen-Bundesliga", 2017, false, false),
    comp("Italy Serie A", "11", "Serie-A", 1989, false, false),
    comp("Italy Serie B", "18", "Serie-B", 2003, false, false),
    comp("Italy Womens Serie A", "208", "Serie-A", 2019, false, false),
    comp("Mexico Liga MX", "31", "Liga-MX", 2013, false, false),
    comp("Netherlands Eredivisie", "23", "Eredivisie", 2001, false, false),
    comp("Portugal Primeira Liga", "32", "Primeira-Liga", 2001, false, false),
    comp("Saudi Arabia Pro League", "70", "Saudi-Professional-League", 2013, false, false),
    comp("Spain La Liga", "12", "La-Liga", 1989, false, false),
    comp("Spain La Liga 2", "17", "Segunda-Division", 2002, false, false),
    comp("Spain Liga F", "230", "Liga-F", 2017, false, false),
    comp("Turkiye Super Lig", "26", "Super-Lig", 2015, false, false),
    comp("UEFA Champions League", "8", "Champions-League", 1991, false, false),
    comp("UEFA Conference League", "882", "Conference-League", 2022, false, false),
    comp("UEFA Europa League", "19", "Europa-League", 1991, false, false),
    comp("UEFA European Championship", "676", "European-Championship", 1960, true, false),
    comp("UEFA Womens Champions League", "181", "Womens-Champions-League", 2002, false, false),
    comp("UEFA Womens European Championship", "162", "UEFA-Womens-Euro", 1984, true, false),
    comp("USA MLS", "22", "Major-League-Soccer", 1996, true, false),
    comp("USA NWSL", "182", "NWSL", 2013, true, false),
    comp("USA NWSL Challenge Cup", "881", "NWSL-Challenge-Cup", 2020, true, false),
    comp("USA NWSL Fall Series", "884", "NWSL-Fall-Series", 2020, true, false),
];

const fn comp(
    name: &'static str,
    comp_id: &'static str,
    slug: &'static str,
    first_end_year: u16,
    single_year: bool,
    multi_league: bool,
) -> Competition {
    Competition {
        name,
        comp_id,
        slug,
        first_end_year,
        single_year,
        multi_league,
    }
}

/// One stats page/section: its URL path segment and the stem of the table
/// ids on the page (`stats_squads_{stem}_for`, `stats_{stem}`, ...).
#[derive(Debug, Clone, Copy)]
pub struct StatCategory {
    pub name: &'static str,
    pub url_segment: &'static str,
    pub table_stem: &'static str,
}

pub const STAT_CATEGORIES: &[StatCategory] = &[
    cat("standard", "stats", "standard"),
    cat("goalkeeping", "keepers", "keeper"),
    cat("advanced goalkeeping", "keepersadv", "keeper_adv"),
    cat("shooting", "shooting", "shooting"),
    cat("passing", "passing", "passing"),
    cat("pass types", "passing_types", "passing_types"),
    cat("goal and shot creation", "gca", "gca"),
    cat("defensive", "defense", "defense"),
    cat("possession", "possession", "possession"),
    cat("playing time", "playingtime", "playing_time"),
    cat("misc", "misc", "misc"),
];

const fn cat(
    name: &'static str,
    url_segment: &'static str,
    table_stem: &'static str,
) -> StatCategory {
    StatCategory {
        name,
        url_segment,
        table_stem,
    }
}

/// Look a competition up by display name, failing fast with the full list of
/// valid names on a miss.
pub fn competition(name: &str) -> Result<&'static Competition> {
    COMPETITIONS
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| {
            let mut valid: Vec<&str> = COMPETITIONS.iter().map(|c| c.name).collect();
            valid.sort_unstable();
            anyhow!("invalid league '{name}'; valid leagues are:\n  {}", valid.join("\n  "))
        })
}

pub fn stat_category(name: &str) -> Result<&'static StatCategory> {
    STAT_CATEGORIES
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| anyhow!("invalid stat category '{name}'"))
}

pub fn validate_end_year(comp: &Competition, end_year: u16) -> Result<()> {
    if end_year < comp.first_end_year {
        return Err(anyhow!(
            "no {} coverage before the season ending {}; got {end_year}",
            comp.name,
            comp.first_end_year
        ));
    }
    Ok(())
}

/// Season label as fbref spells it: "2022-2023" for cross-year leagues,
/// "2023" for calendar-year leagues and tournaments.
pub fn season_label(comp: &Competition, end_year: u16) -> String {
    if comp.single_year {
        end_year.to_string()
    } else {
        format!("{}-{}", end_year - 1, end_year)
    }
}

pub fn season_url(comp: &Competition, end_year: u16) -> String {
    let label = season_label(comp, end_year);
    format!(
        "{BASE_URL}/{}/{label}/{label}-{}-Stats",
        comp.comp_id, comp.slug
    )
}

/// The page holding one stat category: the category segment (plus, for
/// aggregate views, a `squads`/`players` selector) is spliced in before the
/// final path element of the season URL.
pub fn category_url(
    comp: &Competition,
    end_year: u16,
    category: &StatCategory,
    sub_page: Option<&str>,
) -> String {
    let season = season_url(comp, end_year);
    let mut parts: Vec<&str> = season.split('/').collect();
    let last = parts.pop().unwrap_or_default();
    parts.push(category.url_segment);
    if let Some(sub) = sub_page {
        parts.push(sub);
    }
    parts.push(last);
    parts.join("/")
}
