//! Animation Scheduler
//!
//! Every line owns the full timeline; its words split it into back-to-back
//! windows. Boundaries are whole frames with the remainder spread across
//! the line, so `180 / 7` yields windows of 25 and 26 frames that still
//! end exactly at frame 180.
//!
//! A line with more words than frames cannot be partitioned. Each word then
//! keeps its proportional start and is shown for one frame, so neighbouring
//! windows overlap instead of collapsing to nothing.

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` frame interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameWindow {
    pub start: u32,
    pub end: u32,
}

impl FrameWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn full(total_frames: u32) -> Self {
        Self::new(0, total_frames)
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Windows for `word_count` words sharing `total_frames`.
pub fn schedule_words(word_count: usize, total_frames: u32) -> Vec<FrameWindow> {
    let n = word_count as u64;
    let total = u64::from(total_frames);
    (0..n)
        .map(|i| {
            let start = i * total / n;
            let end = ((i + 1) * total / n).max(start + 1).min(total);
            FrameWindow::new(start as u32, end as u32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_spans_timeline() {
        assert_eq!(schedule_words(1, 180), vec![FrameWindow::full(180)]);
    }

    #[test]
    fn test_even_split_matches_plain_division() {
        let windows = schedule_words(4, 180);
        assert_eq!(
            windows,
            vec![
                FrameWindow::new(0, 45),
                FrameWindow::new(45, 90),
                FrameWindow::new(90, 135),
                FrameWindow::new(135, 180),
            ]
        );
    }

    #[test]
    fn test_uneven_split_partitions_exactly() {
        for n in 1..=40 {
            let windows = schedule_words(n, 180);
            assert_eq!(windows.len(), n);
            assert_eq!(windows[0].start, 0);
            assert_eq!(windows[n - 1].end, 180);
            for pair in windows.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            let total: u32 = windows.iter().map(FrameWindow::duration).sum();
            assert_eq!(total, 180);
        }
    }

    #[test]
    fn test_no_words_no_windows() {
        assert!(schedule_words(0, 180).is_empty());
    }

    #[test]
    fn test_crowded_line_keeps_one_frame_per_word() {
        let windows = schedule_words(200, 180);
        assert_eq!(windows.len(), 200);
        assert!(windows.iter().all(|w| w.duration() >= 1));
        assert!(windows.iter().all(|w| w.end <= 180));
        for pair in windows.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        assert_eq!(windows[199], FrameWindow::new(179, 180));
    }
}
