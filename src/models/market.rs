use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::StockError;
use crate::utils::coercion::{lenient_text, parse_numeric};

/// Which top-movers list to read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoverDirection {
    Gainers,
    Losers,
    MostActive,
}

impl MoverDirection {
    pub const ALL: [MoverDirection; 3] = [
        MoverDirection::Gainers,
        MoverDirection::Losers,
        MoverDirection::MostActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoverDirection::Gainers => "gainers",
            MoverDirection::Losers => "losers",
            MoverDirection::MostActive => "most_active",
        }
    }

    /// Array key in the TOP_GAINERS_LOSERS payload.
    pub fn payload_key(&self) -> &'static str {
        match self {
            MoverDirection::Gainers => "top_gainers",
            MoverDirection::Losers => "top_losers",
            MoverDirection::MostActive => "most_actively_traded",
        }
    }
}

impl fmt::Display for MoverDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoverDirection {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gainers" | "gainer" | "up" => Ok(MoverDirection::Gainers),
            "losers" | "loser" | "down" => Ok(MoverDirection::Losers),
            "active" | "most_active" | "most-active" => Ok(MoverDirection::MostActive),
            other => Err(StockError::InvalidParameter(format!("unknown direction: {}", other))),
        }
    }
}

/// One row of the top movers list. Values stay display strings; absent ones become "0".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockSummary {
    pub ticker: String,
    pub price: String,
    pub change_amount: String,
    pub change_percent: String,
    pub volume: String,
}

impl StockSummary {
    /// Build from an upstream row; rows without a ticker are rejected.
    pub fn from_value(row: &Value) -> Option<Self> {
        let field = |key: &str| -> String {
            match row.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => "0".to_string(),
            }
        };

        let ticker = row.get("ticker")?.as_str()?.trim();
        if ticker.is_empty() {
            return None;
        }

        Some(StockSummary {
            ticker: ticker.to_string(),
            price: field("price"),
            change_amount: field("change_amount"),
            change_percent: field("change_percentage"),
            volume: field("volume"),
        })
    }

    pub fn price_value(&self) -> f64 {
        parse_numeric(Some(&self.price))
    }

    pub fn change_amount_value(&self) -> f64 {
        parse_numeric(Some(&self.change_amount))
    }

    /// e.g. "12.5%" -> 12.5
    pub fn change_percent_value(&self) -> f64 {
        parse_numeric(Some(&self.change_percent))
    }

    pub fn volume_value(&self) -> f64 {
        parse_numeric(Some(&self.volume))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    pub symbol: String,
    #[serde(rename = "2. name")]
    pub name: Option<String>,
    #[serde(rename = "3. type")]
    pub instrument_type: Option<String>,
    #[serde(rename = "4. region")]
    pub region: Option<String>,
    #[serde(rename = "8. currency")]
    pub currency: Option<String>,
    #[serde(rename = "9. matchScore")]
    pub match_score: Option<String>,
}

impl SymbolMatch {
    pub fn score(&self) -> f64 {
        parse_numeric(self.match_score.as_deref())
    }
}

/// Company overview. Only the fields the screens show are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverviewRecord {
    #[serde(rename = "Symbol", deserialize_with = "lenient_text")]
    pub symbol: String,
    #[serde(rename = "AssetType", deserialize_with = "lenient_text")]
    pub asset_type: String,
    #[serde(rename = "Name", deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "Description", deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "Exchange", deserialize_with = "lenient_text")]
    pub exchange: String,
    #[serde(rename = "Currency", deserialize_with = "lenient_text")]
    pub currency: String,
    #[serde(rename = "Country", deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(rename = "Sector", deserialize_with = "lenient_text")]
    pub sector: String,
    #[serde(rename = "Industry", deserialize_with = "lenient_text")]
    pub industry: String,
    #[serde(rename = "MarketCapitalization", deserialize_with = "lenient_text")]
    pub market_capitalization: String,
    #[serde(rename = "PERatio", deserialize_with = "lenient_text")]
    pub pe_ratio: String,
    #[serde(rename = "EPS", deserialize_with = "lenient_text")]
    pub eps: String,
    #[serde(rename = "DividendYield", deserialize_with = "lenient_text")]
    pub dividend_yield: String,
    #[serde(rename = "Beta", deserialize_with = "lenient_text")]
    pub beta: String,
    #[serde(rename = "52WeekHigh", deserialize_with = "lenient_text")]
    pub week_52_high: String,
    #[serde(rename = "52WeekLow", deserialize_with = "lenient_text")]
    pub week_52_low: String,
    #[serde(rename = "50DayMovingAverage", deserialize_with = "lenient_text")]
    pub moving_average_50: String,
    #[serde(rename = "200DayMovingAverage", deserialize_with = "lenient_text")]
    pub moving_average_200: String,
    #[serde(rename = "AnalystTargetPrice", deserialize_with = "lenient_text")]
    pub analyst_target_price: String,
    #[serde(rename = "ProfitMargin", deserialize_with = "lenient_text")]
    pub profit_margin: String,
    #[serde(rename = "SharesOutstanding", deserialize_with = "lenient_text")]
    pub shares_outstanding: String,
}

impl OverviewRecord {
    pub fn market_cap(&self) -> f64 {
        parse_numeric(Some(&self.market_capitalization))
    }

    pub fn pe(&self) -> f64 {
        parse_numeric(Some(&self.pe_ratio))
    }

    pub fn dividend_yield_value(&self) -> f64 {
        parse_numeric(Some(&self.dividend_yield))
    }

    /// (52-week low, 52-week high)
    pub fn week_52_range(&self) -> (f64, f64) {
        (
            parse_numeric(Some(&self.week_52_low)),
            parse_numeric(Some(&self.week_52_high)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stock_summary_defaults_missing_fields() {
        let row = json!({"ticker": "ACME", "price": "12.5", "change_percentage": "4.1%"});
        let s = StockSummary::from_value(&row).unwrap();
        assert_eq!(s.ticker, "ACME");
        assert_eq!(s.change_amount, "0");
        assert_eq!(s.volume, "0");
        assert_eq!(s.change_percent_value(), 4.1);
        assert_eq!(s.price_value(), 12.5);
    }

    #[test]
    fn test_stock_summary_requires_ticker() {
        assert!(StockSummary::from_value(&json!({"price": "1"})).is_none());
        assert!(StockSummary::from_value(&json!({"ticker": "  "})).is_none());
    }

    #[test]
    fn test_overview_tolerates_sentinels() {
        let rec: OverviewRecord = serde_json::from_value(json!({
            "Symbol": "IBM",
            "Name": "International Business Machines",
            "MarketCapitalization": "172000000000",
            "PERatio": "None",
            "52WeekHigh": "199.18",
            "52WeekLow": "120.55"
        }))
        .unwrap();
        assert_eq!(rec.symbol, "IBM");
        assert_eq!(rec.market_cap(), 172_000_000_000.0);
        assert_eq!(rec.pe(), 0.0);
        assert_eq!(rec.week_52_range(), (120.55, 199.18));
        assert!(rec.sector.is_empty());
    }

    #[test]
    fn test_overview_coerces_numbers_and_nulls() {
        let rec: OverviewRecord = serde_json::from_value(json!({
            "Symbol": "IBM",
            "Name": "IBM",
            "PERatio": null,
            "Beta": 1.1,
            "MarketCapitalization": 172000000000u64
        }))
        .unwrap();
        assert_eq!(rec.pe_ratio, "");
        assert_eq!(rec.pe(), 0.0);
        assert_eq!(rec.beta, "1.1");
        assert_eq!(rec.market_cap(), 172_000_000_000.0);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Gainers".parse::<MoverDirection>().unwrap(), MoverDirection::Gainers);
        assert_eq!("active".parse::<MoverDirection>().unwrap(), MoverDirection::MostActive);
        assert!("sideways".parse::<MoverDirection>().is_err());
    }
}
