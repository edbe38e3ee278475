use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::storage::PersistentStore;
use crate::utils::logging;

pub(crate) enum PersistCommand {
    Save(String),
    Flush(oneshot::Sender<()>),
}

/// 스냅샷 기록 태스크 시작. 채널이 닫히면 남은 명령을 처리하고 종료한다.
pub(crate) fn spawn_writer(
    store: Arc<dyn PersistentStore>,
    key: &'static str,
) -> (mpsc::UnboundedSender<PersistCommand>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_writer(store, key, rx));
    (tx, task)
}

async fn run_writer(
    store: Arc<dyn PersistentStore>,
    key: &'static str,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
) {
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut waiters = Vec::new();

        // 대기 중인 명령을 모아서 가장 최신 스냅샷 하나만 기록
        let mut next = Some(first);
        while let Some(command) = next {
            match command {
                PersistCommand::Save(snapshot) => latest = Some(snapshot),
                PersistCommand::Flush(ack) => waiters.push(ack),
            }
            next = rx.try_recv().ok();
        }

        if let Some(snapshot) = latest {
            if let Err(e) = store.set(key, &snapshot).await {
                logging::log_persist_failure(key, &e);
            }
        }

        for ack in waiters {
            let _ = ack.send(());
        }
    }
    log::debug!("watchlist writer stopped");
}
