/**
* filename : normalizer
* author : HAMA
* date: 2025. 5. 12.
* description: 원시 시계열 -> 차트용 정규화 시계열
**/

use crate::models::{NormalizedSeries, Period, RawBar, RawSeries, TimeSeriesPoint};
use crate::series::labels;
use crate::utils::coercion::{parse_numeric, parse_timestamp};
use crate::utils::days_to_ms;

/// 차트에 넘기는 최대 포인트 수
pub const SAMPLE_CAP: usize = 50;

/// 원시 시계열 전체를 정규화. 잘못된 행은 조용히 버리고 절대 실패하지 않는다.
pub fn normalize(raw: &RawSeries, period: Period) -> NormalizedSeries {
    summarize(parse_points(raw), period)
}

/// `normalize` 와 같되, 마지막 포인트 기준 기간(lookback) 안의 포인트만 사용
pub fn normalize_recent(raw: &RawSeries, period: Period) -> NormalizedSeries {
    let points = clip_to_lookback(parse_points(raw), period.lookback_days());
    summarize(points, period)
}

/// 유효 행만 골라 시간 오름차순 정렬 + 타임스탬프 중복 제거
pub fn parse_points(raw: &RawSeries) -> Vec<TimeSeriesPoint> {
    let mut points: Vec<TimeSeriesPoint> = raw
        .iter()
        .filter_map(|(date, bar)| to_point(date, bar))
        .collect();

    let dropped = raw.len() - points.len();
    if dropped > 0 {
        log::debug!("유효하지 않은 행 {}개 제외 (전체 {})", dropped, raw.len());
    }

    points.sort_by_key(|p| p.timestamp);
    points.dedup_by_key(|p| p.timestamp);
    points
}

fn to_point(date: &str, bar: &RawBar) -> Option<TimeSeriesPoint> {
    let close = parse_numeric(bar.close.as_deref());
    if close <= 0.0 {
        return None;
    }
    let timestamp = parse_timestamp(date)?;
    Some(TimeSeriesPoint {
        timestamp,
        open: parse_numeric(bar.open.as_deref()),
        high: parse_numeric(bar.high.as_deref()),
        low: parse_numeric(bar.low.as_deref()),
        close,
        volume: parse_numeric(bar.volume.as_deref()),
    })
}

/// 마지막 포인트에서 `days` 이내의 포인트만 유지 (입력은 정렬되어 있어야 함)
///
/// 구간 시작을 덮도록 cutoff 이전의 마지막 포인트 하나(anchor)는 남긴다.
/// 주말/휴일로 22 거래일이 30 일을 넘겨도 첫 거래일이 잘리지 않는다.
pub fn clip_to_lookback(mut points: Vec<TimeSeriesPoint>, days: i64) -> Vec<TimeSeriesPoint> {
    let cutoff = match points.last() {
        Some(last) => last.timestamp - days_to_ms(days),
        None => return points,
    };
    let start = points
        .partition_point(|p| p.timestamp <= cutoff)
        .saturating_sub(1);
    points.split_off(start)
}

fn summarize(points: Vec<TimeSeriesPoint>, period: Period) -> NormalizedSeries {
    if points.is_empty() {
        return NormalizedSeries::empty(period);
    }

    let sampled_points = downsample(&points, SAMPLE_CAP);
    let labels = labels::build_labels(&sampled_points, period.label_style());
    let (price_change, price_change_percent) = price_change(&sampled_points);

    NormalizedSeries {
        period,
        points,
        sampled_points,
        labels,
        price_change,
        price_change_percent,
    }
}

/// 첫/마지막 포인트를 항상 포함하고 중간 포인트를 전체 구간에 고르게 뽑는다.
/// 간격은 `(len - 1) / (cap - 1)` 로, `stride = len / cap` 보다 좁아지지 않는다.
/// 결과 길이는 `cap` 이하.
pub fn downsample(points: &[TimeSeriesPoint], cap: usize) -> Vec<TimeSeriesPoint> {
    let cap = cap.max(2);
    let len = points.len();
    if len <= cap {
        return points.to_vec();
    }

    let mut sampled = Vec::with_capacity(cap);
    sampled.push(points[0]);
    sampled.extend(
        (1..cap - 1)
            .map(|k| k * (len - 1) / (cap - 1))
            .map(|i| points[i]),
    );
    sampled.push(points[len - 1]);
    sampled
}

/// (마지막 종가 - 첫 종가, 변화율 %). 첫 종가가 0 이면 변화율 0.
pub fn price_change(sampled: &[TimeSeriesPoint]) -> (f64, f64) {
    match (sampled.first(), sampled.last()) {
        (Some(first), Some(last)) => {
            let change = last.close - first.close;
            let percent = if first.close != 0.0 {
                change / first.close * 100.0
            } else {
                0.0
            };
            (change, percent)
        }
        _ => (0.0, 0.0),
    }
}
