//! In-process log store.
//!
//! Used when no Supabase project is configured (local runs, tests). Entries
//! live for the lifetime of the process.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use pipeline::{LogEntry, LogEntryId, LogStoreError, NewLogEntry, RunId, RunLogStore, Timestamp};
use uuid::Uuid;

/// Append-only log store held in memory.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every entry of every run, in append order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RunLogStore for MemoryLogStore {
    async fn append(&self, entry: &NewLogEntry) -> Result<(), LogStoreError> {
        let stored = LogEntry {
            id: LogEntryId::from(Uuid::new_v4()),
            run_id: entry.run_id,
            agent: entry.agent,
            input: entry.input.clone(),
            output: entry.output.clone(),
            metadata: entry.metadata.clone(),
            created_at: Timestamp::now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stored);
        Ok(())
    }

    async fn list_run(&self, run_id: RunId) -> Result<Vec<LogEntry>, LogStoreError> {
        let mut entries: Vec<LogEntry> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.run_id == run_id)
            .cloned()
            .collect();
        // Stable: entries stamped within the same tick keep append order.
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pipeline::{AgentName, LogMetadata};

    use super::*;

    fn entry(run_id: RunId, agent: AgentName, output: &str) -> NewLogEntry {
        NewLogEntry {
            run_id,
            agent,
            input: "in".to_string(),
            output: output.to_string(),
            metadata: LogMetadata::None,
        }
    }

    #[tokio::test]
    async fn test_list_run_filters_and_keeps_order() {
        let store = MemoryLogStore::new();
        let run = RunId::new_random();
        let other = RunId::new_random();

        store.append(&entry(run, AgentName::Researcher, "1")).await.unwrap();
        store.append(&entry(other, AgentName::Researcher, "x")).await.unwrap();
        store.append(&entry(run, AgentName::Writer, "2")).await.unwrap();
        store.append(&entry(run, AgentName::FactChecker, "3")).await.unwrap();

        let entries = store.list_run(run).await.unwrap();
        let outputs: Vec<_> = entries.iter().map(|e| e.output.as_str()).collect();
        assert_eq!(outputs, vec!["1", "2", "3"]);
        assert!(entries.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert_ne!(entries[0].id, entries[1].id);
        assert_eq!(store.entries().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_run_is_empty() {
        let store = MemoryLogStore::new();
        assert!(store.list_run(RunId::new_random()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let store = Arc::new(MemoryLogStore::new());
        let run = RunId::new_random();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .append(&entry(run, AgentName::Writer, &i.to_string()))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list_run(run).await.unwrap().len(), 16);
    }
}
