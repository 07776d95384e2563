use crate::error::Result;
use crate::writer::{ActiveState, RollPolicy, RollingKind};
use std::fmt;

/// Rolls the log as soon as the live file reaches a byte limit.
///
/// History files take monotonically increasing decimal tails (`a.log.1`,
/// `a.log.2`, ...) while the live file keeps its original name.
#[derive(Debug, Clone, Copy)]
pub struct SizeRolling {
    max_file_size: u64,
}

impl SizeRolling {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }
}

impl RollPolicy for SizeRolling {
    fn kind(&self) -> RollingKind {
        RollingKind::Size
    }

    fn needs_roll(&self, active: &ActiveState<'_>) -> Result<bool> {
        // Bytes counted since open, not a fresh stat.
        Ok(active.current_size >= self.max_file_size)
    }

    fn is_valid_tail(&self, tail: &str) -> bool {
        !tail.is_empty() && tail.parse::<u64>().is_ok()
    }

    fn sort_tails(&self, tails: &mut [String]) {
        tails.sort_by_key(|tail| tail.parse::<u64>().unwrap_or(0));
    }

    fn next_tail(&self, last_tail: &str) -> Option<String> {
        let last_index: u64 = last_tail.parse().unwrap_or(0);
        Some((last_index + 1).to_string())
    }

    fn active_name(&self, original_name: &str) -> String {
        original_name.to_string()
    }
}

impl fmt::Display for SizeRolling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max file size: {}", self.max_file_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(size: u64) -> ActiveState<'static> {
        ActiveState {
            original_name: "a.log",
            current_name: "a.log",
            current_size: size,
        }
    }

    #[test]
    fn test_rolls_at_limit() {
        let policy = SizeRolling::new(10);
        assert!(!policy.needs_roll(&active(9)).unwrap());
        assert!(policy.needs_roll(&active(10)).unwrap());
        assert!(policy.needs_roll(&active(11)).unwrap());
    }

    #[test]
    fn test_tail_validity() {
        let policy = SizeRolling::new(10);
        assert!(policy.is_valid_tail("1"));
        assert!(policy.is_valid_tail("17"));
        assert!(!policy.is_valid_tail(""));
        assert!(!policy.is_valid_tail("2024-01-01"));
        assert!(!policy.is_valid_tail("old"));
    }

    #[test]
    fn test_sort_is_numeric() {
        let policy = SizeRolling::new(10);
        let mut tails = vec!["10".to_string(), "2".to_string(), "1".to_string()];
        policy.sort_tails(&mut tails);
        assert_eq!(tails, ["1", "2", "10"]);
    }

    #[test]
    fn test_next_tail_counts_up() {
        let policy = SizeRolling::new(10);
        assert_eq!(policy.next_tail("").as_deref(), Some("1"));
        assert_eq!(policy.next_tail("6").as_deref(), Some("7"));
    }

    #[test]
    fn test_tail_round_trip() {
        let policy = SizeRolling::new(10);
        for n in [1u64, 2, 17, 9999] {
            let tail = n.to_string();
            assert!(policy.is_valid_tail(&tail));
            assert_eq!(tail.parse::<u64>().unwrap(), n);
        }
    }

    #[test]
    fn test_live_name_is_unchanged() {
        let policy = SizeRolling::new(10);
        assert_eq!(policy.active_name("a.log"), "a.log");
    }
}
