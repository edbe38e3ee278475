pub mod market;
pub mod period;
pub mod time_series;
pub mod watchlist;

pub use market::{MoverDirection, OverviewRecord, StockSummary, SymbolMatch};
pub use period::{LabelStyle, OutputSize, Period, Resolution};
pub use time_series::{NormalizedSeries, RawBar, RawSeries, TimeSeriesPoint};
pub use watchlist::{Watchlist, WatchlistId};
