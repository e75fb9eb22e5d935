use serde::Serialize;
use tracing::{info, warn};

use crate::database::activity_directory::{
    ActivityDirectory, AddParticipantOutcome, RemoveParticipantOutcome,
};
use crate::models::ActivitiesView;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Student is already signed up for this activity")]
    AlreadySignedUp,
    #[error("Participant not found in this activity")]
    NotRegistered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub message: String,
}

pub fn list_activities(directory: &ActivityDirectory) -> ActivitiesView {
    directory.list_activities()
}

pub fn signup_participant(
    directory: &ActivityDirectory,
    activity_name: &str,
    email: &str,
) -> Result<MessageView, ActivityError> {
    match directory.add_participant(activity_name, email) {
        None => Err(ActivityError::ActivityNotFound),
        Some(AddParticipantOutcome::AlreadyPresent) => Err(ActivityError::AlreadySignedUp),
        Some(AddParticipantOutcome::Added {
            participant_count,
            max_participants,
        }) => {
            // Capacity is informational only; signups past it still go through.
            if participant_count > max_participants as usize {
                warn!(
                    activity = %activity_name,
                    participant_count,
                    max_participants,
                    "activity is over capacity"
                );
            }
            info!(activity = %activity_name, email = %email, "participant signed up");
            Ok(MessageView {
                message: format!("Signed up {} for {}", email, activity_name),
            })
        }
    }
}

pub fn unregister_participant(
    directory: &ActivityDirectory,
    activity_name: &str,
    email: &str,
) -> Result<MessageView, ActivityError> {
    match directory.remove_participant(activity_name, email) {
        None => Err(ActivityError::ActivityNotFound),
        Some(RemoveParticipantOutcome::NotPresent) => Err(ActivityError::NotRegistered),
        Some(RemoveParticipantOutcome::Removed { participant_count }) => {
            info!(
                activity = %activity_name,
                email = %email,
                participant_count,
                "participant unregistered"
            );
            Ok(MessageView {
                message: format!("Unregistered {} from {}", email, activity_name),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_message_names_email_and_activity() {
        let dir = ActivityDirectory::seeded();
        let view = signup_participant(&dir, "Chess Club", "test@mergington.edu").unwrap();
        assert!(view.message.contains("test@mergington.edu"));
        assert!(view.message.contains("Chess Club"));
        assert!(list_activities(&dir)
            .get("Chess Club")
            .unwrap()
            .has_participant("test@mergington.edu"));
    }

    #[test]
    fn second_signup_is_rejected_and_stored_once() {
        let dir = ActivityDirectory::seeded();
        signup_participant(&dir, "Chess Club", "dup@mergington.edu").unwrap();
        assert_eq!(
            signup_participant(&dir, "Chess Club", "dup@mergington.edu"),
            Err(ActivityError::AlreadySignedUp)
        );
        let chess = dir.load_activity("Chess Club").unwrap();
        let count = chess
            .participants
            .iter()
            .filter(|p| *p == "dup@mergington.edu")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn unknown_activity_is_not_found_for_both_operations() {
        let dir = ActivityDirectory::seeded();
        assert_eq!(
            signup_participant(&dir, "Nonexistent Club", "a@mergington.edu"),
            Err(ActivityError::ActivityNotFound)
        );
        assert_eq!(
            unregister_participant(&dir, "Nonexistent Club", "a@mergington.edu"),
            Err(ActivityError::ActivityNotFound)
        );
        assert_eq!(ActivityError::ActivityNotFound.to_string(), "Activity not found");
    }

    #[test]
    fn unregister_of_stranger_leaves_list_unchanged() {
        let dir = ActivityDirectory::seeded();
        let before = dir.load_activity("Chess Club").unwrap().participants;
        let err = unregister_participant(&dir, "Chess Club", "stranger@mergington.edu").unwrap_err();
        assert!(err.to_string().contains("not found in this activity"));
        assert_eq!(dir.load_activity("Chess Club").unwrap().participants, before);
    }

    #[test]
    fn signup_then_unregister_restores_count() {
        let dir = ActivityDirectory::seeded();
        let before = dir.load_activity("Programming Class").unwrap().participants.len();

        signup_participant(&dir, "Programming Class", "flow@mergington.edu").unwrap();
        let view = unregister_participant(&dir, "Programming Class", "flow@mergington.edu").unwrap();

        assert!(view.message.starts_with("Unregistered"));
        let after = dir.load_activity("Programming Class").unwrap();
        assert_eq!(after.participants.len(), before);
        assert!(!after.has_participant("flow@mergington.edu"));
    }

    #[test]
    fn signup_past_capacity_still_succeeds() {
        let dir = ActivityDirectory::seeded();
        let chess = dir.load_activity("Chess Club").unwrap();
        let free = chess.max_participants as usize - chess.participants.len();
        for i in 0..=free {
            signup_participant(&dir, "Chess Club", &format!("student{i}@mergington.edu")).unwrap();
        }
        let chess = dir.load_activity("Chess Club").unwrap();
        assert!(chess.participants.len() > chess.max_participants as usize);
    }
}
