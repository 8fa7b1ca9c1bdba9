use std::collections::HashMap;
use thiserror::Error;

use crate::{
    consts::consts::{ActivityName, Email},
    model::{
        activity::{Activity, ActivityListing},
        statement::{Statement, StatementResult},
    },
};

use super::row::{ActivityRow, ApplySignupResult, ApplyUnregisterResult};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyErrors {
    #[error("Not found, activity does not exist: {0}")]
    ActivityDoesNotExist(ActivityName),

    #[error("Not found, {1} is not registered for {0}")]
    ParticipantNotRegistered(ActivityName, Email),
}

/// How to undo a mutation that has already been applied to the table
#[derive(Debug, Clone, PartialEq)]
pub enum Rollback {
    Nothing,
    Signup { row: usize, position: usize },
    Unregister { row: usize, position: usize, email: Email },
}

#[derive(Debug)]
pub struct Applied {
    pub result: StatementResult,
    pub rollback: Rollback,
}

type RowIndex = usize;

pub struct ActivityTable {
    /// Seed order is preserved, rows are never added or removed after construction
    pub activity_rows: Vec<ActivityRow>,
    pub name_index: HashMap<ActivityName, RowIndex>,
}

impl ActivityTable {
    pub fn new() -> Self {
        Self {
            activity_rows: Vec::new(),
            name_index: HashMap::<ActivityName, RowIndex>::new(),
        }
    }

    pub fn from_listing(listing: ActivityListing) -> Self {
        let mut table = ActivityTable::new();

        for (name, activity) in listing {
            // Listings cannot contain duplicate names, last one wins if one slips through
            match table.name_index.get(&name) {
                Some(&row) => table.activity_rows[row].activity = activity,
                None => {
                    table
                        .name_index
                        .insert(name.clone(), table.activity_rows.len());
                    table.activity_rows.push(ActivityRow::new(name, activity));
                }
            }
        }

        table
    }

    pub fn activity_count(&self) -> usize {
        self.activity_rows.len()
    }

    pub fn participant_count(&self) -> usize {
        self.activity_rows
            .iter()
            .map(|row| row.activity.participants.len())
            .sum()
    }

    // Each mutation can be broken up into 3 steps
    //  - Verifying the activity (and participant) exist
    //  - Applying the mutation
    //  - Recording how to roll it back
    #[tracing::instrument(skip(self))]
    pub fn apply(&mut self, statement: Statement) -> Result<Applied, ApplyErrors> {
        log::debug!("Applying {} statement", statement.kind());

        let applied = match statement {
            Statement::List => Applied {
                result: StatementResult::List(self.listing()),
                rollback: Rollback::Nothing,
            },
            Statement::Get(name) => {
                let row = self.row_index(&name)?;

                Applied {
                    result: StatementResult::Single(self.activity_rows[row].activity.clone()),
                    rollback: Rollback::Nothing,
                }
            }
            Statement::Signup(name, email) => {
                let row = self.row_index(&name)?;

                let message = format!("Signed up {} for {}", email, name);

                let ApplySignupResult { position } = self.activity_rows[row].apply_signup(email);

                Applied {
                    result: StatementResult::Message(message),
                    rollback: Rollback::Signup { row, position },
                }
            }
            Statement::Unregister(name, email) => {
                let row = self.row_index(&name)?;

                let ApplyUnregisterResult { position, previous } =
                    self.activity_rows[row].apply_unregister(&email)?;

                Applied {
                    result: StatementResult::Message(format!(
                        "Unregistered {} from {}",
                        email, name
                    )),
                    rollback: Rollback::Unregister {
                        row,
                        position,
                        email: previous,
                    },
                }
            }
        };

        Ok(applied)
    }

    pub fn apply_rollback(&mut self, rollback: Rollback) {
        match rollback {
            Rollback::Nothing => {}
            Rollback::Signup { row, position } => self.activity_rows[row].rollback_signup(position),
            Rollback::Unregister {
                row,
                position,
                email,
            } => self.activity_rows[row].rollback_unregister(position, email),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn listing(&self) -> ActivityListing {
        ActivityListing::new(
            self.activity_rows
                .iter()
                .map(|row| (row.name.clone(), row.activity.clone()))
                .collect(),
        )
    }

    pub fn get(&self, name: &ActivityName) -> Option<&Activity> {
        self.name_index
            .get(name)
            .map(|&row| &self.activity_rows[row].activity)
    }

    fn row_index(&self, name: &ActivityName) -> Result<RowIndex, ApplyErrors> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| ApplyErrors::ActivityDoesNotExist(name.clone()))
    }
}

impl Default for ActivityTable {
    fn default() -> Self {
        ActivityTable::new()
    }
}
