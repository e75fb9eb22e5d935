use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::database::seed;
use crate::models::{ActivitiesView, Activity};

struct ActivityEntry {
    name: String,
    description: String,
    schedule: String,
    max_participants: u32,
    participants: Mutex<Vec<String>>,
}

impl ActivityEntry {
    // Mutations never leave the list half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.participants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Activity {
        Activity {
            description: self.description.clone(),
            schedule: self.schedule.clone(),
            max_participants: self.max_participants,
            participants: self.lock().clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddParticipantOutcome {
    Added {
        participant_count: usize,
        max_participants: u32,
    },
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveParticipantOutcome {
    Removed { participant_count: usize },
    NotPresent,
}

/// In-memory activity store.
///
/// The set of activities is fixed at construction; only participant lists
/// change afterwards, each behind its own lock.
pub struct ActivityDirectory {
    entries: Vec<ActivityEntry>,
    index: HashMap<String, usize>,
}

impl ActivityDirectory {
    /// Builds a directory from `(name, activity)` pairs. A repeated name keeps
    /// its first definition.
    pub fn new(activities: impl IntoIterator<Item = (String, Activity)>) -> Self {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for (name, activity) in activities {
            if index.contains_key(&name) {
                tracing::warn!(activity = %name, "duplicate activity in seed data ignored");
                continue;
            }
            let mut participants: Vec<String> = Vec::with_capacity(activity.participants.len());
            for email in activity.participants {
                if !participants.contains(&email) {
                    participants.push(email);
                }
            }
            index.insert(name.clone(), entries.len());
            entries.push(ActivityEntry {
                name,
                description: activity.description,
                schedule: activity.schedule,
                max_participants: activity.max_participants,
                participants: Mutex::new(participants),
            });
        }
        Self { entries, index }
    }

    pub fn seeded() -> Self {
        Self::new(seed::seed_activities())
    }

    fn entry(&self, name: &str) -> Option<&ActivityEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn load_activity(&self, name: &str) -> Option<Activity> {
        self.entry(name).map(ActivityEntry::snapshot)
    }

    pub fn list_activities(&self) -> ActivitiesView {
        ActivitiesView::new(
            self.entries
                .iter()
                .map(|e| (e.name.clone(), e.snapshot()))
                .collect(),
        )
    }

    /// Returns `None` when no activity has this name.
    pub fn add_participant(&self, name: &str, email: &str) -> Option<AddParticipantOutcome> {
        let entry = self.entry(name)?;
        let mut participants = entry.lock();
        if participants.iter().any(|p| p == email) {
            return Some(AddParticipantOutcome::AlreadyPresent);
        }
        participants.push(email.to_string());
        Some(AddParticipantOutcome::Added {
            participant_count: participants.len(),
            max_participants: entry.max_participants,
        })
    }

    /// Returns `None` when no activity has this name.
    pub fn remove_participant(&self, name: &str, email: &str) -> Option<RemoveParticipantOutcome> {
        let entry = self.entry(name)?;
        let mut participants = entry.lock();
        let Some(pos) = participants.iter().position(|p| p == email) else {
            return Some(RemoveParticipantOutcome::NotPresent);
        };
        participants.remove(pos);
        Some(RemoveParticipantOutcome::Removed {
            participant_count: participants.len(),
        })
    }
}
