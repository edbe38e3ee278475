/**
* filename : watchlist
* author : HAMA
* date: 2025. 5. 14.
* description: 워치리스트 저장소 (메모리 컬렉션 + 백그라운드 스냅샷 기록)
**/

mod writer;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::StockError;
use crate::market_data::normalize_ticker;
use crate::models::{Watchlist, WatchlistId};
use crate::storage::PersistentStore;
use crate::utils::logging;
use writer::PersistCommand;

/// 저장소 안에서 컬렉션 전체가 기록되는 키
pub const WATCHLISTS_KEY: &str = "watchlists";

/// 워치리스트 컬렉션
///
/// 변경은 메모리에서 동기적으로 반영되고, 전체 컬렉션 스냅샷이 백그라운드 태스크로 전달된다.
/// 여러 작업에서 공유할 때는 `Arc<RwLock<WatchlistStore>>` 로 감싼다.
pub struct WatchlistStore {
    lists: Vec<Watchlist>,
    writer: mpsc::UnboundedSender<PersistCommand>,
    _writer_task: JoinHandle<()>,
}

impl WatchlistStore {
    /// 시작 시 한 번 호출. 없거나 읽을 수 없는 데이터는 빈 컬렉션으로 시작한다.
    pub async fn load_all(store: Arc<dyn PersistentStore>) -> Self {
        let lists = match store.get(WATCHLISTS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Watchlist>>(&raw) {
                Ok(lists) => repair(lists),
                Err(e) => {
                    log::warn!("워치리스트 디코딩 실패, 빈 목록으로 시작: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                logging::log_error("워치리스트 로드 실패, 빈 목록으로 시작", &e);
                Vec::new()
            }
        };
        log::info!("워치리스트 {}개 로드", lists.len());

        let (writer, task) = writer::spawn_writer(store, WATCHLISTS_KEY);
        WatchlistStore {
            lists,
            writer,
            _writer_task: task,
        }
    }

    pub fn watchlists(&self) -> &[Watchlist] {
        &self.lists
    }

    pub fn get(&self, id: &WatchlistId) -> Option<&Watchlist> {
        self.lists.iter().find(|l| &l.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Watchlist> {
        let name = name.trim();
        self.lists.iter().find(|l| l.name == name)
    }

    pub fn lists_containing(&self, ticker: &str) -> Vec<&Watchlist> {
        match normalize_ticker(ticker) {
            Ok(ticker) => self.lists.iter().filter(|l| l.contains(&ticker)).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// 새 목록 생성. 이름은 앞뒤 공백 제거 후 대소문자 구분 유일.
    pub fn create_list(&mut self, name: &str) -> Result<WatchlistId, StockError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StockError::InvalidParameter(
                "watchlist name must not be blank".to_string(),
            ));
        }
        if self.find_by_name(name).is_some() {
            return Err(StockError::DuplicateName(name.to_string()));
        }

        let list = Watchlist::new(name);
        let id = list.id.clone();
        self.lists.push(list);
        log::info!("워치리스트 생성: {} ({})", name, id);
        self.persist();
        Ok(id)
    }

    /// 티커 추가. 목록이 없거나, 빈 티커이거나, 이미 있으면 false.
    pub fn add_ticker(&mut self, id: &WatchlistId, ticker: &str) -> bool {
        let ticker = match normalize_ticker(ticker) {
            Ok(ticker) => ticker,
            Err(_) => return false,
        };
        let list = match self.lists.iter_mut().find(|l| &l.id == id) {
            Some(list) => list,
            None => return false,
        };
        if list.contains(&ticker) {
            return false;
        }

        list.tickers.push(ticker);
        self.persist();
        true
    }

    pub fn remove_ticker(&mut self, id: &WatchlistId, ticker: &str) -> bool {
        let ticker = match normalize_ticker(ticker) {
            Ok(ticker) => ticker,
            Err(_) => return false,
        };
        let list = match self.lists.iter_mut().find(|l| &l.id == id) {
            Some(list) => list,
            None => return false,
        };
        let before = list.tickers.len();
        list.tickers.retain(|t| t != &ticker);
        if list.tickers.len() == before {
            return false;
        }

        self.persist();
        true
    }

    pub fn remove_list(&mut self, id: &WatchlistId) -> bool {
        let before = self.lists.len();
        self.lists.retain(|l| &l.id != id);
        if self.lists.len() == before {
            return false;
        }

        log::info!("워치리스트 삭제: {}", id);
        self.persist();
        true
    }

    /// 이전에 요청된 모든 스냅샷 기록이 끝날 때까지 대기
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.writer.send(PersistCommand::Flush(ack)).is_err() {
            return;
        }
        let _ = done.await;
    }

    fn persist(&self) {
        let snapshot = match serde_json::to_string(&self.lists) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                logging::log_persist_failure(WATCHLISTS_KEY, &StockError::from(e));
                return;
            }
        };
        if self.writer.send(PersistCommand::Save(snapshot)).is_err() {
            log::error!("워치리스트 기록 태스크가 종료되어 스냅샷을 보낼 수 없음");
        }
    }
}

/// 중복 id/이름을 가진 목록은 첫 번째만 남기고, 목록 안의 중복 티커는 합친다
fn repair(lists: Vec<Watchlist>) -> Vec<Watchlist> {
    let total = lists.len();
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    let repaired: Vec<Watchlist> = lists
        .into_iter()
        .filter(|l| ids.insert(l.id.clone()) && names.insert(l.name.clone()))
        .map(|mut l| {
            let mut seen = HashSet::new();
            l.tickers.retain(|t| seen.insert(t.clone()));
            l
        })
        .collect();

    if repaired.len() != total {
        log::warn!("중복 워치리스트 {}개 제거", total - repaired.len());
    }
    repaired
}
