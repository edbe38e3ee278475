/**
* filename : main
* author : HAMA
* date: 2025. 5. 14.
* description: stocktrack 명령줄 진입점
**/

use std::sync::Arc;

use anyhow::{anyhow, bail};

use stocktrack::config::Config;
use stocktrack::market_data::{HttpProvider, MarketDataClient};
use stocktrack::models::{MoverDirection, Period, WatchlistId};
use stocktrack::storage::{FileStore, PersistentStore};
use stocktrack::utils::coercion::{
    format_change, format_currency, format_large_number, format_value,
};
use stocktrack::utils::{format_timestamp, logging};
use stocktrack::watchlist::WatchlistStore;
use stocktrack::StockError;

const USAGE: &str = "usage:
  stocktrack overview <TICKER>
  stocktrack series <TICKER> [1D|1W|1M|3M|6M|1Y|5Y]
  stocktrack movers [gainers|losers|active]
  stocktrack search <QUERY>
  stocktrack watchlist list
  stocktrack watchlist create <NAME>
  stocktrack watchlist add <ID> <TICKER>
  stocktrack watchlist remove <ID> <TICKER>
  stocktrack watchlist delete <ID>";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging)?;
    log::info!("stocktrack {} 시작", stocktrack::VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let store: Arc<dyn PersistentStore> = Arc::new(FileStore::open(&config.storage.path).await?);

    let result = match args.first().map(String::as_str) {
        Some("watchlist") => run_watchlist(store, &args[1..]).await,
        Some(command) => run_market(command, &args[1..], store, &config).await,
        None => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    if let Err(e) = &result {
        if let Some(stock_err) = e.downcast_ref::<StockError>() {
            if stock_err.is_retryable() {
                eprintln!("일시적인 오류입니다. 잠시 후 다시 시도하세요.");
            }
        }
    }
    result
}

async fn run_market(
    command: &str,
    args: &[String],
    store: Arc<dyn PersistentStore>,
    config: &Config,
) -> Result<(), anyhow::Error> {
    let provider = Arc::new(HttpProvider::new(&config.api)?);
    let client = MarketDataClient::from_config(provider, store, config);

    match command {
        "overview" => {
            let ticker = arg(args, 0, "TICKER")?;
            let o = client.fetch_overview(ticker).await?;
            println!("{} ({}) - {}", o.name, o.symbol, o.exchange);
            println!("{} / {}", o.sector, o.industry);
            println!("Market cap : {}", format_currency(o.market_cap()));
            println!("P/E        : {}", format_value(Some(&o.pe_ratio)));
            println!("EPS        : {}", format_value(Some(&o.eps)));
            println!("Div. yield : {}", format_value(Some(&o.dividend_yield)));
            let (low, high) = o.week_52_range();
            println!("52W range  : {} - {}", format_currency(low), format_currency(high));
        }
        "series" => {
            let ticker = arg(args, 0, "TICKER")?;
            let period: Period = match args.get(1) {
                Some(p) => p.parse()?,
                None => Period::OneMonth,
            };
            let series = client.fetch_time_series(ticker, period).await?;
            if !series.has_data() {
                println!("{} {}: 데이터 없음", ticker, period);
                return Ok(());
            }
            println!(
                "{} {}: {} points, {}",
                ticker.to_uppercase(),
                period,
                series.points.len(),
                format_change(series.price_change, series.price_change_percent)
            );
            for (point, label) in series.sampled_points.iter().zip(&series.labels) {
                println!(
                    "{:>8}  {}  {:>10.2}  {:>12}",
                    label,
                    format_timestamp(point.timestamp, "%Y-%m-%d %H:%M"),
                    point.close,
                    format_large_number(point.volume)
                );
            }
        }
        "movers" => {
            let direction: MoverDirection = match args.first() {
                Some(d) => d.parse()?,
                None => MoverDirection::Gainers,
            };
            for s in client.fetch_top_movers(direction).await? {
                println!(
                    "{:<8} {:>10} {:>10} {:>10} {:>14}",
                    s.ticker,
                    format_currency(s.price_value()),
                    s.change_amount,
                    s.change_percent,
                    format_large_number(s.volume_value())
                );
            }
        }
        "search" => {
            let query = args.join(" ");
            for m in client.search_symbols(&query).await? {
                println!(
                    "{:<12} {:<40} {:<16} {:.4}",
                    m.symbol,
                    m.name.as_deref().unwrap_or("-"),
                    m.region.as_deref().unwrap_or("-"),
                    m.score()
                );
            }
        }
        other => bail!("unknown command: {}\n{}", other, USAGE),
    }
    Ok(())
}

async fn run_watchlist(
    store: Arc<dyn PersistentStore>,
    args: &[String],
) -> Result<(), anyhow::Error> {
    let mut lists = WatchlistStore::load_all(store).await;

    match args.first().map(String::as_str) {
        Some("list") | None => {
            for list in lists.watchlists() {
                println!("{}  {}  [{}]", list.id, list.name, list.tickers.join(", "));
            }
        }
        Some("create") => {
            let name = args[1..].join(" ");
            let id = lists.create_list(&name)?;
            println!("{}", id);
        }
        Some("add") => {
            let id = WatchlistId::from(arg(args, 1, "ID")?);
            let ticker = arg(args, 2, "TICKER")?;
            if !lists.add_ticker(&id, ticker) {
                println!("변경 없음");
            }
        }
        Some("remove") => {
            let id = WatchlistId::from(arg(args, 1, "ID")?);
            let ticker = arg(args, 2, "TICKER")?;
            if !lists.remove_ticker(&id, ticker) {
                println!("변경 없음");
            }
        }
        Some("delete") => {
            let id = WatchlistId::from(arg(args, 1, "ID")?);
            if !lists.remove_list(&id) {
                println!("변경 없음");
            }
        }
        Some(other) => bail!("unknown watchlist command: {}\n{}", other, USAGE),
    }

    lists.flush().await;
    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, anyhow::Error> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing <{}>\n{}", name, USAGE))
}
