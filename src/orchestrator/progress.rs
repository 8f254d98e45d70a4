//! 进度统计 - 编排层
//!
//! 与批处理循环解耦的进度/ETA 累加器：
//! 循环每完成一张图片调用一次 `record_completion()`，
//! 得到可直接展示的进度快照。
//! 剩余时间按线性外推估算（已用时间 / 完成比例 - 已用时间）。

use std::fmt;
use std::time::{Duration, Instant};

/// 单张图片完成后的进度快照
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    /// 已完成数量
    pub completed: usize,
    /// 图片总数
    pub total: usize,
    /// 完成比例（0.0 ..= 1.0）
    pub fraction: f64,
    /// 已用时间
    pub elapsed: Duration,
    /// 预估剩余时间（线性外推，下限为零）
    pub remaining: Duration,
}

impl ProgressSnapshot {
    /// 已用时间的 HH:MM:SS 文本
    pub fn elapsed_hms(&self) -> String {
        format_hms(self.elapsed)
    }

    /// 剩余时间的 HH:MM:SS 文本
    pub fn remaining_hms(&self) -> String {
        format_hms(self.remaining)
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progressing: {}/{} | Elapsed: {} | Remaining: {}",
            self.completed,
            self.total,
            self.elapsed_hms(),
            self.remaining_hms()
        )
    }
}

/// 进度跟踪器
///
/// `completed` 只增不减；`fraction` 在历次调用间单调不减
#[derive(Debug)]
pub struct ProgressTracker {
    started_at: Instant,
    total: usize,
    completed: usize,
}

impl ProgressTracker {
    /// 创建新的进度跟踪器（在批次开始时调用）
    pub fn new(total: usize) -> Self {
        Self {
            started_at: Instant::now(),
            total,
            completed: 0,
        }
    }

    /// 已完成数量
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// 记录一张图片完成，返回进度快照
    pub fn record_completion(&mut self) -> ProgressSnapshot {
        self.record_completion_at(Instant::now())
    }

    fn record_completion_at(&mut self, now: Instant) -> ProgressSnapshot {
        self.completed += 1;

        let fraction = if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        };

        let elapsed = now.saturating_duration_since(self.started_at);

        // fraction == 0 时总时长无定义，剩余时间按零处理
        let remaining = if fraction > 0.0 {
            let estimated_total = elapsed.as_secs_f64() / fraction;
            Duration::from_secs_f64((estimated_total - elapsed.as_secs_f64()).max(0.0))
        } else {
            Duration::ZERO
        };

        ProgressSnapshot {
            completed: self.completed,
            total: self.total,
            fraction,
            elapsed,
            remaining,
        }
    }
}

/// 把时长格式化为 HH:MM:SS
fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_increases_by_one_over_total() {
        let mut tracker = ProgressTracker::new(4);
        let start = tracker.started_at;

        let s1 = tracker.record_completion_at(start + Duration::from_secs(10));
        let s2 = tracker.record_completion_at(start + Duration::from_secs(20));
        let s3 = tracker.record_completion_at(start + Duration::from_secs(30));
        let s4 = tracker.record_completion_at(start + Duration::from_secs(40));

        assert!((s1.fraction - 0.25).abs() < 1e-9);
        assert!((s2.fraction - 0.50).abs() < 1e-9);
        assert!((s3.fraction - 0.75).abs() < 1e-9);
        assert!((s4.fraction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_extrapolation() {
        let mut tracker = ProgressTracker::new(4);
        let start = tracker.started_at;

        // 30 秒完成 1/4，预估总时长 120 秒，剩余 90 秒
        let snapshot = tracker.record_completion_at(start + Duration::from_secs(30));
        assert_eq!(snapshot.elapsed, Duration::from_secs(30));
        assert_eq!(snapshot.remaining.as_secs(), 90);
    }

    #[test]
    fn test_remaining_never_negative() {
        let mut tracker = ProgressTracker::new(2);
        let start = tracker.started_at;

        let s1 = tracker.record_completion_at(start + Duration::from_secs(10));
        let s2 = tracker.record_completion_at(start + Duration::from_secs(12));

        assert!(s1.remaining >= Duration::ZERO);
        // 最后一张完成时 fraction == 1，剩余时间归零
        assert_eq!(s2.remaining, Duration::ZERO);
    }

    #[test]
    fn test_zero_total_reports_zero_remaining() {
        let mut tracker = ProgressTracker::new(0);
        let start = tracker.started_at;

        let snapshot = tracker.record_completion_at(start + Duration::from_secs(5));
        assert_eq!(snapshot.fraction, 0.0);
        assert_eq!(snapshot.remaining, Duration::ZERO);
    }

    #[test]
    fn test_completed_monotonic() {
        let mut tracker = ProgressTracker::new(3);
        let start = tracker.started_at;

        let mut last = 0;
        for i in 1..=3 {
            let snapshot = tracker.record_completion_at(start + Duration::from_secs(i));
            assert!(snapshot.completed > last);
            last = snapshot.completed;
        }
        assert_eq!(tracker.completed(), 3);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_hms(Duration::from_secs(62)), "00:01:02");
        assert_eq!(format_hms(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(format_hms(Duration::from_secs(86400)), "24:00:00");
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = ProgressSnapshot {
            completed: 3,
            total: 10,
            fraction: 0.3,
            elapsed: Duration::from_secs(62),
            remaining: Duration::from_secs(144),
        };
        assert_eq!(
            snapshot.to_string(),
            "Progressing: 3/10 | Elapsed: 00:01:02 | Remaining: 00:02:24"
        );
    }
}
