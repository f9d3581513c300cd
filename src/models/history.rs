use std::cmp::Ordering;

use super::AnalysisRecord;

/// Analysis history ordered newest-first.
///
/// The order is established on construction instead of being trusted from the
/// source, so index `i + 1` is always the chronological predecessor of `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryList {
    records: Vec<AnalysisRecord>,
}

impl HistoryList {
    /// Build a history, sorting by date then id, newest first
    pub fn new(mut records: Vec<AnalysisRecord>) -> Self {
        let ordered = records
            .windows(2)
            .all(|pair| newest_first(&pair[0], &pair[1]) != Ordering::Greater);

        if !ordered {
            tracing::debug!("Reordering {} history records newest-first", records.len());
            records.sort_by(newest_first);
        }

        Self { records }
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnalysisRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&AnalysisRecord> {
        self.records.get(index)
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.records.first()
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn find(&self, id: i64) -> Option<&AnalysisRecord> {
        self.position(id).and_then(|index| self.records.get(index))
    }

    /// The next-older record, if `id` is present and not the oldest entry
    pub fn predecessor_of(&self, id: i64) -> Option<&AnalysisRecord> {
        self.position(id).and_then(|index| self.records.get(index + 1))
    }
}

impl<'a> IntoIterator for &'a HistoryList {
    type Item = &'a AnalysisRecord;
    type IntoIter = std::slice::Iter<'a, AnalysisRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn newest_first(a: &AnalysisRecord, b: &AnalysisRecord) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: i64, date: &str) -> AnalysisRecord {
        serde_json::from_value(json!({"id": id, "date": date})).unwrap()
    }

    #[test]
    fn test_sorts_oldest_first_input() {
        let history = HistoryList::new(vec![
            record(1, "2024-01-01T00:00:00Z"),
            record(2, "2024-01-02T00:00:00Z"),
            record(3, "2024-01-03T00:00:00Z"),
        ]);

        let ids: Vec<i64> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(history.latest().map(|r| r.id), Some(3));
    }

    #[test]
    fn test_same_date_breaks_tie_on_id() {
        let history = HistoryList::new(vec![
            record(4, "2024-01-01T00:00:00Z"),
            record(9, "2024-01-01T00:00:00Z"),
        ]);

        assert_eq!(history.get(0).map(|r| r.id), Some(9));
    }

    #[test]
    fn test_predecessor_lookup() {
        let history = HistoryList::new(vec![
            record(3, "2024-01-03T00:00:00Z"),
            record(2, "2024-01-02T00:00:00Z"),
        ]);

        assert_eq!(history.predecessor_of(3).map(|r| r.id), Some(2));
        assert!(history.predecessor_of(2).is_none());
        assert!(history.predecessor_of(42).is_none());
    }
}
