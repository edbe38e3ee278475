//! 시계열 정규화
//!
//! 원시 날짜 -> OHLCV 매핑을 검증/정렬/다운샘플링하고 차트 라벨과 등락을 계산한다.

pub mod labels;
pub mod normalizer;

pub use normalizer::{downsample, normalize, normalize_recent, price_change, SAMPLE_CAP};
