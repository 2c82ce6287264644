use super::IOccurrenceRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use mealmind_domain::{OccurrenceStatus, ScheduledOccurrence, ID};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct InMemoryOccurrenceRepo {
    occurrences: Mutex<Vec<ScheduledOccurrence>>,
    generations: Mutex<HashMap<String, i64>>,
}

impl InMemoryOccurrenceRepo {
    pub fn new() -> Self {
        Self {
            occurrences: Mutex::new(Vec::new()),
            generations: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl IOccurrenceRepo for InMemoryOccurrenceRepo {
    async fn insert(&self, occurrence: &ScheduledOccurrence) -> anyhow::Result<()> {
        insert(occurrence, &self.occurrences);
        Ok(())
    }

    async fn save(&self, occurrence: &ScheduledOccurrence) -> anyhow::Result<()> {
        save(occurrence, &self.occurrences);
        Ok(())
    }

    async fn find(&self, occurrence_id: &ID) -> Option<ScheduledOccurrence> {
        find(occurrence_id, &self.occurrences)
    }

    async fn find_scheduled_by_user(&self, user_id: &ID) -> Vec<ScheduledOccurrence> {
        find_by(&self.occurrences, |o| {
            o.user_id == *user_id && o.status == OccurrenceStatus::Scheduled
        })
    }

    async fn find_due(&self, now: i64, grace_millis: i64) -> Vec<ScheduledOccurrence> {
        find_by(&self.occurrences, |o| o.is_due(now, grace_millis))
    }

    async fn delete_terminal_before(&self, before: i64) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.occurrences, |o| {
            o.status.is_terminal() && o.created_at < before
        }))
    }

    async fn bump_generation(&self, user_id: &ID) -> anyhow::Result<i64> {
        let mut generations = self.generations.lock().unwrap();
        let entry = generations.entry(user_id.as_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn generation(&self, user_id: &ID) -> i64 {
        let generations = self.generations.lock().unwrap();
        generations.get(&user_id.as_string()).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mealmind_domain::Weekday;

    fn occurrence(user_id: &ID, scheduled_for: i64) -> ScheduledOccurrence {
        ScheduledOccurrence::new(
            user_id.clone(),
            ID::new(),
            Weekday::Mon,
            scheduled_for,
            1,
            0,
        )
    }

    #[tokio::test]
    async fn finds_due_occurrences_within_grace_window() {
        let repo = InMemoryOccurrenceRepo::new();
        let user_id = ID::new();
        let due = occurrence(&user_id, 100_000);
        let not_yet = occurrence(&user_id, 500_000);
        let long_missed = occurrence(&user_id, 1_000);
        repo.insert(&due).await.unwrap();
        repo.insert(&not_yet).await.unwrap();
        repo.insert(&long_missed).await.unwrap();

        // now = 100_050, grace 60s: only the 100_000 row qualifies
        let found = repo.find_due(100_050, 60_000).await;
        assert_eq!(found, vec![due]);
    }

    #[tokio::test]
    async fn scheduled_by_user_excludes_terminal_rows() {
        let repo = InMemoryOccurrenceRepo::new();
        let user_id = ID::new();
        let mut sent = occurrence(&user_id, 100);
        sent.mark_sent(150);
        let open = occurrence(&user_id, 200);
        repo.insert(&sent).await.unwrap();
        repo.insert(&open).await.unwrap();

        assert_eq!(repo.find_scheduled_by_user(&user_id).await, vec![open]);
    }

    #[tokio::test]
    async fn save_replaces_the_stored_document() {
        let repo = InMemoryOccurrenceRepo::new();
        let user_id = ID::new();
        let mut o = occurrence(&user_id, 100);
        repo.insert(&o).await.unwrap();

        o.mark_cancelled(150);
        repo.save(&o).await.unwrap();

        assert_eq!(
            repo.find(&o.id).await.unwrap().status,
            OccurrenceStatus::Cancelled
        );
        assert!(repo.find_scheduled_by_user(&user_id).await.is_empty());
    }

    #[tokio::test]
    async fn retention_only_removes_old_terminal_rows() {
        let repo = InMemoryOccurrenceRepo::new();
        let user_id = ID::new();
        let mut old_sent = occurrence(&user_id, 100);
        old_sent.mark_sent(110);
        let open = occurrence(&user_id, 100);
        let mut fresh_failed = ScheduledOccurrence::new(
            user_id.clone(),
            ID::new(),
            Weekday::Tue,
            100,
            1,
            5_000,
        );
        fresh_failed.mark_failed(5_100);
        repo.insert(&old_sent).await.unwrap();
        repo.insert(&open).await.unwrap();
        repo.insert(&fresh_failed).await.unwrap();

        let res = repo.delete_terminal_before(1_000).await.unwrap();
        assert_eq!(res.deleted_count, 1);
        assert!(repo.find(&old_sent.id).await.is_none());
        assert!(repo.find(&open.id).await.is_some());
        assert!(repo.find(&fresh_failed.id).await.is_some());
    }

    #[tokio::test]
    async fn generation_counter_is_per_user() {
        let repo = InMemoryOccurrenceRepo::new();
        let user_a = ID::new();
        let user_b = ID::new();
        assert_eq!(repo.generation(&user_a).await, 0);
        assert_eq!(repo.bump_generation(&user_a).await.unwrap(), 1);
        assert_eq!(repo.bump_generation(&user_a).await.unwrap(), 2);
        assert_eq!(repo.generation(&user_a).await, 2);
        assert_eq!(repo.generation(&user_b).await, 0);
    }
}
