use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub struct WatchlistId(pub String);

impl WatchlistId {
    pub fn generate() -> Self {
        WatchlistId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for WatchlistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WatchlistId {
    fn from(s: &str) -> Self {
        WatchlistId(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Watchlist {
    pub id: WatchlistId,
    pub name: String,
    /// Insertion order kept for display; no duplicates.
    pub tickers: Vec<String>,
}

impl Watchlist {
    pub fn new(name: impl Into<String>) -> Self {
        Watchlist {
            id: WatchlistId::generate(),
            name: name.into(),
            tickers: Vec::new(),
        }
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }
}
