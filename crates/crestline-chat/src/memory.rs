//! Conversation name memory.
//!
//! An injected session store mapping conversation id to the declared
//! name, bounded by a TTL and a capacity cap so memory use does not grow
//! with process lifetime. Reads refresh an entry's recency; when the cap
//! is exceeded the least-recently-touched entry is evicted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    name: String,
    touched: Instant,
}

/// TTL- and capacity-bounded conversation name store.
pub struct NameStore {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, Entry>>,
}

impl NameStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Remember a name for a conversation, refreshing its recency.
    pub fn remember(&self, conversation_id: &str, name: &str) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        entries.retain(|_, entry| entry.touched.elapsed() <= self.ttl);

        entries.insert(
            conversation_id.to_string(),
            Entry {
                name: name.to_string(),
                touched: Instant::now(),
            },
        );

        while entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    entries.remove(&id);
                }
                None => break,
            }
        }
    }

    /// Recall the name for a conversation, if present and unexpired.
    pub fn recall(&self, conversation_id: &str) -> Option<String> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match entries.get_mut(conversation_id) {
            Some(entry) if entry.touched.elapsed() <= self.ttl => {
                entry.touched = Instant::now();
                Some(entry.name.clone())
            }
            Some(_) => {
                entries.remove(conversation_id);
                None
            }
            None => None,
        }
    }

    /// Number of live entries (expired entries may still be counted
    /// until the next write prunes them).
    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> NameStore {
        NameStore::new(Duration::from_secs(1800), 1024)
    }

    #[test]
    fn test_remember_and_recall() {
        let names = store();
        names.remember("conv-1", "Sara");
        assert_eq!(names.recall("conv-1"), Some("Sara".to_string()));
    }

    #[test]
    fn test_recall_unknown_conversation() {
        let names = store();
        assert_eq!(names.recall("conv-404"), None);
    }

    #[test]
    fn test_conversations_are_isolated() {
        let names = store();
        names.remember("conv-1", "Sara");
        names.remember("conv-2", "Omar");
        assert_eq!(names.recall("conv-1"), Some("Sara".to_string()));
        assert_eq!(names.recall("conv-2"), Some("Omar".to_string()));
        assert_eq!(names.recall("conv-3"), None);
    }

    #[test]
    fn test_redeclaration_overwrites() {
        let names = store();
        names.remember("conv-1", "Sara");
        names.remember("conv-1", "Lena");
        assert_eq!(names.recall("conv-1"), Some("Lena".to_string()));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_expired_entry_not_recalled() {
        let names = NameStore::new(Duration::ZERO, 1024);
        names.remember("conv-1", "Sara");
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(names.recall("conv-1"), None);
        // The expired entry is removed by the failed recall.
        assert!(names.is_empty());
    }

    #[test]
    fn test_write_prunes_expired_entries() {
        let names = NameStore::new(Duration::ZERO, 1024);
        names.remember("conv-1", "Sara");
        std::thread::sleep(Duration::from_millis(5));
        names.remember("conv-2", "Omar");
        // conv-1 expired and was pruned by the second write.
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_least_recently_touched() {
        let names = NameStore::new(Duration::from_secs(1800), 2);
        names.remember("conv-1", "Sara");
        std::thread::sleep(Duration::from_millis(2));
        names.remember("conv-2", "Omar");
        std::thread::sleep(Duration::from_millis(2));

        // Touch conv-1 so conv-2 becomes the eviction candidate.
        names.recall("conv-1");
        std::thread::sleep(Duration::from_millis(2));
        names.remember("conv-3", "Lena");

        assert_eq!(names.len(), 2);
        assert_eq!(names.recall("conv-1"), Some("Sara".to_string()));
        assert_eq!(names.recall("conv-2"), None);
        assert_eq!(names.recall("conv-3"), Some("Lena".to_string()));
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let names = Arc::new(store());
        let mut handles = Vec::new();
        for i in 0..8 {
            let names = Arc::clone(&names);
            handles.push(thread::spawn(move || {
                let id = format!("conv-{}", i);
                names.remember(&id, "Name");
                names.recall(&id)
            }));
        }
        for handle in handles {
            assert!(handle.join().unwrap().is_some());
        }
        assert_eq!(names.len(), 8);
    }
}
