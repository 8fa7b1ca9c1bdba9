use crate::{
    consts::consts::{ActivityName, Email},
    model::activity::Activity,
};

use super::table::ApplyErrors;

#[derive(Debug)]
pub struct ApplySignupResult {
    /// Index the email was appended at
    pub position: usize,
}

#[derive(Debug)]
pub struct ApplyUnregisterResult {
    /// Index the email was removed from, needed to put it back on rollback
    pub position: usize,
    pub previous: Email,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRow {
    pub name: ActivityName,
    pub activity: Activity,
}

impl ActivityRow {
    pub fn new(name: ActivityName, activity: Activity) -> Self {
        ActivityRow { name, activity }
    }

    /// Duplicate and capacity checks are intentionally absent, a signup always appends
    pub fn apply_signup(&mut self, email: Email) -> ApplySignupResult {
        self.activity.participants.push(email);

        ApplySignupResult {
            position: self.activity.participants.len() - 1,
        }
    }

    pub fn apply_unregister(&mut self, email: &Email) -> Result<ApplyUnregisterResult, ApplyErrors> {
        // Verify
        let position = self
            .activity
            .participants
            .iter()
            .position(|participant| participant == email)
            .ok_or_else(|| {
                ApplyErrors::ParticipantNotRegistered(self.name.clone(), email.clone())
            })?;

        // Apply
        let previous = self.activity.participants.remove(position);

        Ok(ApplyUnregisterResult { position, previous })
    }

    pub fn rollback_signup(&mut self, position: usize) {
        assert_eq!(
            position,
            self.activity.participants.len() - 1,
            "signups are rolled back in reverse order, the signup must be the last participant"
        );

        self.activity.participants.pop();
    }

    pub fn rollback_unregister(&mut self, position: usize, email: Email) {
        self.activity.participants.insert(position, email);
    }
}
