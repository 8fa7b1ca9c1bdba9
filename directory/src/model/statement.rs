use strum::IntoStaticStr;

use crate::consts::consts::{ActivityName, Email};

use super::activity::{Activity, ActivityListing};

#[derive(Clone, Debug, PartialEq, IntoStaticStr)]
pub enum Statement {
    /// Returns every activity, in seed order
    List,
    Get(ActivityName),
    /// Appends the email to the activity's participants
    Signup(ActivityName, Email),
    /// Removes the email from the activity's participants
    Unregister(ActivityName, Email),
}

impl Statement {
    pub fn is_query(&self) -> bool {
        !self.is_mutation()
    }

    pub fn is_mutation(&self) -> bool {
        match self {
            Statement::Signup(_, _) | Statement::Unregister(_, _) => true,
            Statement::List | Statement::Get(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

// TODO: Is there a better way to type this? The request manager knows which variant each statement
//  maps to, so the accessors below panic instead of returning an error.
#[derive(Clone, Debug, PartialEq)]
pub enum StatementResult {
    /// Confirmation returned by mutations
    Message(String),
    Single(Activity),
    List(ActivityListing),
}

impl StatementResult {
    pub fn message(self) -> String {
        if let StatementResult::Message(m) = self {
            m
        } else {
            panic!("Statement result is not of type Message")
        }
    }

    pub fn single(self) -> Activity {
        if let StatementResult::Single(a) = self {
            a
        } else {
            panic!("Statement result is not of type Single")
        }
    }

    pub fn list(self) -> ActivityListing {
        if let StatementResult::List(l) = self {
            l
        } else {
            panic!("Statement result is not of type List")
        }
    }
}
