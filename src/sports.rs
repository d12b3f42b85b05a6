//! Fixed fixture lists with odds for a handful of sports.

use std::{fmt, str::FromStr};

use axum::{debug_handler, response::Html, routing::get, Router};
use serde::Serialize;
use tower_sessions::Session;

use crate::{
    include_res,
    res::{self, escape, PageResult},
    session::MaybeUser,
    AppError, AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fixture {
    pub id: u32,
    pub home: &'static str,
    pub away: &'static str,
    pub home_odds: f64,
    pub away_odds: f64,
    pub draw_odd: f64,
}

const fn fixture(id: u32, home: &'static str, away: &'static str, home_odds: f64, away_odds: f64, draw_odd: f64) -> Fixture {
    Fixture {
        id,
        home,
        away,
        home_odds,
        away_odds,
        draw_odd,
    }
}

const FOOTBALL: [Fixture; 10] = [
    fixture(1, "Manchester United", "Liverpool", 2.10, 1.20, 3.0),
    fixture(2, "Arsenal", "Chelsea", 2.10, 1.20, 3.0),
    fixture(3, "Manchester City", "Tottenham", 2.10, 1.20, 3.0),
    fixture(4, "Everton", "West Ham", 2.30, 1.50, 2.80),
    fixture(5, "Aston Villa", "Brighton", 2.40, 1.60, 2.90),
    fixture(6, "Newcastle", "Wolves", 2.20, 1.80, 3.10),
    fixture(7, "Leicester", "Crystal Palace", 2.00, 1.90, 3.20),
    fixture(8, "Southampton", "Brentford", 2.50, 1.70, 2.85),
    fixture(9, "Fulham", "Nottingham Forest", 2.15, 1.95, 3.05),
    fixture(10, "Leeds", "Bournemouth", 2.35, 1.65, 2.75),
];

const BASKETBALL: [Fixture; 10] = [
    fixture(1, "Los Angeles Lakers", "Golden State Warriors", 1.80, 2.00, 3.10),
    fixture(2, "Brooklyn Nets", "Milwaukee Bucks", 2.10, 1.75, 3.20),
    fixture(3, "Chicago Bulls", "Miami Heat", 1.90, 1.95, 3.00),
    fixture(4, "Phoenix Suns", "Denver Nuggets", 1.85, 2.05, 3.25),
    fixture(5, "Philadelphia 76ers", "Boston Celtics", 2.00, 1.85, 3.15),
    fixture(6, "New York Knicks", "Toronto Raptors", 1.75, 2.10, 3.30),
    fixture(7, "Dallas Mavericks", "Memphis Grizzlies", 2.20, 1.70, 3.10),
    fixture(8, "Cleveland Cavaliers", "Atlanta Hawks", 1.95, 2.00, 3.05),
    fixture(9, "Utah Jazz", "Portland Trail Blazers", 2.15, 1.85, 3.40),
    fixture(10, "Sacramento Kings", "San Antonio Spurs", 1.90, 2.10, 3.20),
];

const HOCKEY: [Fixture; 10] = [
    fixture(1, "Toronto Maple Leafs", "Montreal Canadiens", 2.00, 1.90, 3.60),
    fixture(2, "Edmonton Oilers", "Calgary Flames", 1.85, 2.10, 3.50),
    fixture(3, "Boston Bruins", "New York Rangers", 1.95, 2.00, 3.45),
    fixture(4, "Pittsburgh Penguins", "Washington Capitals", 2.10, 1.85, 3.40),
    fixture(5, "Chicago Blackhawks", "Detroit Red Wings", 2.20, 1.80, 3.35),
    fixture(6, "Los Angeles Kings", "San Jose Sharks", 2.00, 1.95, 3.55),
    fixture(7, "Colorado Avalanche", "Vegas Golden Knights", 1.75, 2.25, 3.30),
    fixture(8, "Tampa Bay Lightning", "Florida Panthers", 2.05, 1.90, 3.45),
    fixture(9, "St. Louis Blues", "Minnesota Wild", 1.95, 2.05, 3.50),
    fixture(10, "New Jersey Devils", "Buffalo Sabres", 2.15, 1.85, 3.40),
];

const NFL: [Fixture; 10] = [
    fixture(1, "Kansas City Chiefs", "Buffalo Bills", 1.90, 2.00, 3.50),
    fixture(2, "Dallas Cowboys", "Philadelphia Eagles", 2.10, 1.85, 3.40),
    fixture(3, "San Francisco 49ers", "Los Angeles Rams", 1.95, 2.05, 3.60),
    fixture(4, "Green Bay Packers", "Minnesota Vikings", 2.00, 1.90, 3.45),
    fixture(5, "Miami Dolphins", "New York Jets", 2.20, 1.80, 3.30),
    fixture(6, "Baltimore Ravens", "Pittsburgh Steelers", 1.85, 2.15, 3.55),
    fixture(7, "Seattle Seahawks", "Arizona Cardinals", 1.75, 2.25, 3.25),
    fixture(8, "Indianapolis Colts", "Tennessee Titans", 2.30, 1.70, 3.20),
    fixture(9, "New Orleans Saints", "Carolina Panthers", 2.05, 1.95, 3.35),
    fixture(10, "Denver Broncos", "Las Vegas Raiders", 2.15, 1.85, 3.50),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sport {
    Football,
    Basketball,
    Hockey,
    Nfl,
}

impl Sport {
    pub const ALL: [Sport; 4] = [Sport::Football, Sport::Basketball, Sport::Hockey, Sport::Nfl];

    pub fn fixtures(self) -> &'static [Fixture] {
        match self {
            Sport::Football => &FOOTBALL,
            Sport::Basketball => &BASKETBALL,
            Sport::Hockey => &HOCKEY,
            Sport::Nfl => &NFL,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Basketball => "basketball",
            Sport::Hockey => "hockey",
            Sport::Nfl => "nfl",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sport::Nfl => write!(f, "NFL"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl FromStr for Sport {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.slug().eq_ignore_ascii_case(s))
            .ok_or(AppError::NotFound("sport"))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/football", get(football))
        .route("/basketball", get(basketball))
        .route("/hockey", get(hockey))
        .route("/nfl", get(nfl))
}

async fn fixtures_page(sport: Sport, viewer: MaybeUser, session: Session) -> PageResult<Html<String>> {
    let MaybeUser(viewer) = viewer;
    let rows: String = sport
        .fixtures()
        .iter()
        .map(|f| {
            include_res!(str, "/pages/fixture_row.html")
                .replace("{id}", &f.id.to_string())
                .replace("{home_odds}", &format!("{:.2}", f.home_odds))
                .replace("{away_odds}", &format!("{:.2}", f.away_odds))
                .replace("{draw_odd}", &format!("{:.2}", f.draw_odd))
                .replace("{home}", &escape(f.home))
                .replace("{away}", &escape(f.away))
        })
        .collect();

    let title = sport.to_string();
    let body = include_res!(str, "/pages/fixtures.html")
        .replace("{rows}", &rows)
        .replace("{sport}", &title);
    res::page(&session, viewer.as_ref(), &title, &body).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn football(viewer: MaybeUser, session: Session) -> PageResult<Html<String>> {
    fixtures_page(Sport::Football, viewer, session).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn basketball(viewer: MaybeUser, session: Session) -> PageResult<Html<String>> {
    fixtures_page(Sport::Basketball, viewer, session).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn hockey(viewer: MaybeUser, session: Session) -> PageResult<Html<String>> {
    fixtures_page(Sport::Hockey, viewer, session).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn nfl(viewer: MaybeUser, session: Session) -> PageResult<Html<String>> {
    fixtures_page(Sport::Nfl, viewer, session).await
}
