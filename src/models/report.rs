//! Cache report DTOs
//!
//! Point-in-time, serializable view of a cache's occupancy.

use serde::Serialize;

/// One cached entry as seen in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    /// Display form of the key
    pub key: String,
    /// Resolved size of the entry
    pub size: i64,
}

impl EntryReport {
    /// Creates a new EntryReport
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// Occupancy report for a cache.
///
/// Entries are listed least recently used first, i.e. in eviction order.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    /// Capacity of the cache
    pub max_size: i64,
    /// Sum of entry sizes
    pub occupied_size: i64,
    /// Number of entries held
    pub entry_count: usize,
    /// Entries, oldest first
    pub entries: Vec<EntryReport>,
}

impl CacheReport {
    /// Creates a new CacheReport, deriving totals from `entries`.
    pub fn new(max_size: i64, entries: Vec<EntryReport>) -> Self {
        Self {
            max_size,
            occupied_size: entries.iter().map(|e| e.size).sum(),
            entry_count: entries.len(),
            entries,
        }
    }

    /// Fraction of capacity in use, between 0.0 and 1.0.
    pub fn utilization(&self) -> f64 {
        if self.max_size <= 0 {
            0.0
        } else {
            self.occupied_size as f64 / self.max_size as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let report = CacheReport::new(
            100,
            vec![EntryReport::new("a.jpg", 30), EntryReport::new("b.png", 20)],
        );
        assert_eq!(report.occupied_size, 50);
        assert_eq!(report.entry_count, 2);
        assert!((report.utilization() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_report_empty() {
        let report = CacheReport::new(100, Vec::new());
        assert_eq!(report.occupied_size, 0);
        assert_eq!(report.utilization(), 0.0);
    }

    #[test]
    fn test_report_serialize() {
        let report = CacheReport::new(64, vec![EntryReport::new("cover.jpg", 16)]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"max_size\":64"));
        assert!(json.contains("\"occupied_size\":16"));
        assert!(json.contains("cover.jpg"));
    }
}
