use crate::models::{LabelStyle, TimeSeriesPoint};
use crate::utils::format_timestamp;

/// Upper bound on labelled ticks, first and last included.
pub const MAX_LABELS: usize = 6;

/// Indices that get a visible label: every point when there are few,
/// otherwise first, last and evenly spaced points between them.
pub fn label_indices(len: usize) -> Vec<usize> {
    if len <= MAX_LABELS {
        return (0..len).collect();
    }
    let slots = MAX_LABELS - 1;
    let mut indices: Vec<usize> = (0..=slots)
        .map(|i| (i * (len - 1) + slots / 2) / slots)
        .collect();
    indices.dedup();
    indices
}

pub fn format_label(timestamp: i64, style: LabelStyle) -> String {
    let fmt = match style {
        LabelStyle::TimeOfDay => "%H:%M",
        LabelStyle::Weekday => "%a",
        LabelStyle::ShortDate => "%b %-d",
        LabelStyle::MonthYear => "%b '%y",
    };
    format_timestamp(timestamp, fmt)
}

/// One entry per point; blank where no label is drawn.
pub fn build_labels(points: &[TimeSeriesPoint], style: LabelStyle) -> Vec<String> {
    let mut labels = vec![String::new(); points.len()];
    for i in label_indices(points.len()) {
        labels[i] = format_label(points[i].timestamp, style);
    }
    labels
}
