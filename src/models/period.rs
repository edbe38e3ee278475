use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::StockError;

/// Chart period selectable by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Period {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

/// Upstream sampling resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Resolution {
    Intraday5Min,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSize {
    Compact,
    Full,
}

/// How chart tick labels are rendered for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    TimeOfDay,
    Weekday,
    ShortDate,
    MonthYear,
}

impl Period {
    pub const ALL: [Period; 7] = [
        Period::OneDay,
        Period::OneWeek,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1D",
            Period::OneWeek => "1W",
            Period::OneMonth => "1M",
            Period::ThreeMonths => "3M",
            Period::SixMonths => "6M",
            Period::OneYear => "1Y",
            Period::FiveYears => "5Y",
        }
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            Period::OneDay => Resolution::Intraday5Min,
            Period::FiveYears => Resolution::Weekly,
            _ => Resolution::Daily,
        }
    }

    /// `None` where the endpoint takes no outputsize (weekly).
    pub fn output_size(&self) -> Option<OutputSize> {
        match self {
            Period::OneDay | Period::OneWeek | Period::OneMonth | Period::ThreeMonths => {
                Some(OutputSize::Compact)
            }
            // compact 는 최근 100 거래일뿐이라 6M 이상은 full 필요
            Period::SixMonths | Period::OneYear => Some(OutputSize::Full),
            Period::FiveYears => None,
        }
    }

    /// Lookback window in calendar days.
    pub fn lookback_days(&self) -> i64 {
        match self {
            Period::OneDay => 1,
            Period::OneWeek => 7,
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
            Period::FiveYears => 1825,
        }
    }

    /// How long a cached series for this period stays fresh.
    pub fn freshness(&self) -> Duration {
        const MINUTE: u64 = 60;
        match self {
            Period::OneDay => Duration::from_secs(5 * MINUTE),
            Period::OneWeek | Period::OneMonth => Duration::from_secs(30 * MINUTE),
            Period::ThreeMonths | Period::SixMonths => Duration::from_secs(60 * MINUTE),
            Period::OneYear | Period::FiveYears => Duration::from_secs(4 * 60 * MINUTE),
        }
    }

    pub fn label_style(&self) -> LabelStyle {
        match self {
            Period::OneDay => LabelStyle::TimeOfDay,
            Period::OneWeek => LabelStyle::Weekday,
            Period::OneMonth => LabelStyle::ShortDate,
            _ => LabelStyle::MonthYear,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Period::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| StockError::InvalidParameter(format!("unknown period: {}", s)))
    }
}

impl Resolution {
    pub fn function(&self) -> &'static str {
        match self {
            Resolution::Intraday5Min => "TIME_SERIES_INTRADAY",
            Resolution::Daily => "TIME_SERIES_DAILY",
            Resolution::Weekly => "TIME_SERIES_WEEKLY",
        }
    }

    /// Fixed `interval` parameter, intraday only.
    pub fn interval(&self) -> Option<&'static str> {
        match self {
            Resolution::Intraday5Min => Some("5min"),
            _ => None,
        }
    }
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Period::OneDay, Resolution::Intraday5Min, 5 * 60)]
    #[case(Period::OneWeek, Resolution::Daily, 30 * 60)]
    #[case(Period::OneMonth, Resolution::Daily, 30 * 60)]
    #[case(Period::ThreeMonths, Resolution::Daily, 60 * 60)]
    #[case(Period::SixMonths, Resolution::Daily, 60 * 60)]
    #[case(Period::OneYear, Resolution::Daily, 4 * 3600)]
    #[case(Period::FiveYears, Resolution::Weekly, 4 * 3600)]
    fn test_period_table(
        #[case] period: Period,
        #[case] resolution: Resolution,
        #[case] fresh_secs: u64,
    ) {
        assert_eq!(period.resolution(), resolution);
        assert_eq!(period.freshness(), Duration::from_secs(fresh_secs));
    }

    #[test]
    fn test_shorter_windows_refresh_sooner() {
        for pair in Period::ALL.windows(2) {
            assert!(pair[0].freshness() <= pair[1].freshness());
            assert!(pair[0].lookback_days() < pair[1].lookback_days());
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("1m".parse::<Period>().unwrap(), Period::OneMonth);
        assert_eq!(" 5Y ".parse::<Period>().unwrap(), Period::FiveYears);
        assert!("2W".parse::<Period>().is_err());
        for p in Period::ALL {
            assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Period::ThreeMonths).unwrap(), "\"3M\"");
        let p: Period = serde_json::from_str("\"1Y\"").unwrap();
        assert_eq!(p, Period::OneYear);
    }

    #[test]
    fn test_request_shape() {
        assert_eq!(Period::OneDay.resolution().interval(), Some("5min"));
        assert_eq!(Period::OneMonth.resolution().interval(), None);
        assert_eq!(Period::FiveYears.output_size(), None);
        assert_eq!(Period::OneYear.output_size(), Some(OutputSize::Full));
        assert_eq!(Period::FiveYears.resolution().function(), "TIME_SERIES_WEEKLY");
    }
}
