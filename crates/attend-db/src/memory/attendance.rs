use async_trait::async_trait;
use dashmap::mapref::entry::Entry;

use attend_core::entities::AttendanceRecord;
use attend_core::error::DomainError;
use attend_core::traits::{AttendanceQuery, AttendanceRepository, RepoResult};
use attend_core::value_objects::CivilDate;

use super::MemoryDatabase;

#[derive(Clone, Debug)]
pub struct MemoryAttendanceRepository {
    db: MemoryDatabase,
}

impl MemoryAttendanceRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }

    fn collect<F>(&self, keep: F) -> Vec<AttendanceRecord>
    where
        F: Fn(&AttendanceRecord) -> bool,
    {
        let mut records: Vec<AttendanceRecord> = self
            .db
            .tables
            .attendance
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| {
            a.check_in_date
                .cmp(&b.check_in_date)
                .then(a.checked_in_at.cmp(&b.checked_in_at))
                .then(a.participant_id.cmp(&b.participant_id))
        });
        records
    }
}

#[async_trait]
impl AttendanceRepository for MemoryAttendanceRepository {
    async fn find(
        &self,
        participant_id: &str,
        date: CivilDate,
    ) -> RepoResult<Option<AttendanceRecord>> {
        Ok(self
            .db
            .tables
            .attendance
            .get(&(participant_id.to_string(), date))
            .map(|r| r.clone()))
    }

    async fn insert(&self, record: &AttendanceRecord) -> RepoResult<()> {
        let key = (record.participant_id.clone(), record.check_in_date);
        match self.db.tables.attendance.entry(key) {
            Entry::Occupied(_) => Err(DomainError::AlreadyCheckedIn(record.check_in_date.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find_all(&self, query: &AttendanceQuery) -> RepoResult<Vec<AttendanceRecord>> {
        Ok(self.collect(|r| query.matches(r)))
    }

    async fn count(&self, query: &AttendanceQuery) -> RepoResult<i64> {
        let count = self
            .db
            .tables
            .attendance
            .iter()
            .filter(|r| query.matches(r.value()))
            .count();
        Ok(count as i64)
    }

    async fn find_range(
        &self,
        start: CivilDate,
        end: CivilDate,
        query: &AttendanceQuery,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let query = AttendanceQuery {
            date: None,
            ..query.clone()
        };
        Ok(self.collect(|r| {
            r.check_in_date >= start && r.check_in_date <= end && query.matches(r)
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use attend_core::value_objects::{Attribute, CheckInMethod};

    fn date(day: u32) -> CivilDate {
        CivilDate::from_ymd(2026, 3, day).unwrap()
    }

    fn record(participant: &str, day: u32, method: CheckInMethod) -> AttendanceRecord {
        AttendanceRecord::new(participant, date(day), Utc::now(), None, Attribute::Participant, method)
    }

    #[tokio::test]
    async fn test_insert_is_unique_per_day() {
        let repo = MemoryAttendanceRepository::new(MemoryDatabase::new());
        repo.insert(&record("p1", 1, CheckInMethod::Scan)).await.unwrap();

        let duplicate = repo.insert(&record("p1", 1, CheckInMethod::Manual)).await;
        assert!(matches!(duplicate, Err(DomainError::AlreadyCheckedIn(_))));

        repo.insert(&record("p1", 2, CheckInMethod::Manual)).await.unwrap();

        let stored = repo.find("p1", date(1)).await.unwrap().unwrap();
        assert_eq!(stored.method, CheckInMethod::Scan);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_admit_one() {
        let repo = Arc::new(MemoryAttendanceRepository::new(MemoryDatabase::new()));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(&record("p1", 1, CheckInMethod::Scan)).await.is_ok()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn test_range_and_count() {
        let repo = MemoryAttendanceRepository::new(MemoryDatabase::new());
        for (p, d) in [("p1", 1), ("p2", 1), ("p1", 2), ("p1", 5)] {
            repo.insert(&record(p, d, CheckInMethod::Scan)).await.unwrap();
        }

        assert_eq!(repo.count(&AttendanceQuery::on(date(1))).await.unwrap(), 2);

        let range = repo
            .find_range(date(1), date(2), &AttendanceQuery::default())
            .await
            .unwrap();
        assert_eq!(range.len(), 3);
        assert!(range.windows(2).all(|w| w[0].check_in_date <= w[1].check_in_date));
    }
}
