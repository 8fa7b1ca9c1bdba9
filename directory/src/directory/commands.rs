use crate::{
    consts::consts::TransactionId,
    model::statement::{Statement, StatementResult},
};

use super::table::table::ApplyErrors;

/// Directory commands are how we interact with the directory worker, they are how we ask it to run a
/// transaction, report stats, shutdown, etc
///
/// The majority of interactions happen via statements (e.g. list, signup, unregister), but there are also
/// commands that are used to control the worker (e.g. shutdown).
#[derive(Debug)]
pub enum DirectoryCommand {
    /// Sends a set of statements to the directory and returns the results
    Transaction(Vec<Statement>),

    /// Commands that control the directory
    Control(Control),
}

impl DirectoryCommand {
    /// Prints complex logs in a more readable format
    pub fn log_format(&self) -> String {
        match self {
            DirectoryCommand::Transaction(statements) => {
                if statements.len() > 1 {
                    format!("{:#?}", self)
                } else {
                    format!("{:?}", self)
                }
            }
            _ => format!("{:?}", self),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DirectoryCommandTransactionResponse {
    /// Transaction has successfully committed, returns a list of statement results
    Commit(Vec<StatementResult>),
    /// Transaction has been rolled back, returns the error of the statement that failed
    Rollback(ApplyErrors),
}

impl DirectoryCommandTransactionResponse {
    /// Used to help with testing, creates a new committed result
    pub fn new_committed_single_result(result: StatementResult) -> Self {
        DirectoryCommandTransactionResponse::Commit(vec![result])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectoryStats {
    pub activities: usize,
    pub participants: usize,
    pub current_transaction_id: TransactionId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DirectoryCommandControlResponse {
    /// Successfully performed the control
    Success(String),
    Stats(DirectoryStats),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DirectoryCommandResponse {
    Transaction(DirectoryCommandTransactionResponse),
    Control(DirectoryCommandControlResponse),
}

impl DirectoryCommandResponse {
    pub fn control_success(message: &str) -> Self {
        DirectoryCommandResponse::Control(DirectoryCommandControlResponse::Success(
            message.to_string(),
        ))
    }

    pub fn control_stats(stats: DirectoryStats) -> Self {
        DirectoryCommandResponse::Control(DirectoryCommandControlResponse::Stats(stats))
    }
}

#[derive(Debug, PartialEq)]
pub enum Control {
    /// Stops the worker, requests sent before the shutdown are answered, requests after it are not
    Shutdown,
    /// Reports row counts and the current transaction id
    Stats,
}

pub struct DirectoryCommandRequest {
    pub resolver: oneshot::Sender<DirectoryCommandResponse>,
    pub command: DirectoryCommand,
}
