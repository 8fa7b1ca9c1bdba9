use std::time::{Duration, Instant};

use flume::Sender;
use thiserror::Error;

use crate::{
    consts::consts::{ActivityName, Email},
    model::{
        activity::{Activity, ActivityListing},
        statement::{Statement, StatementResult},
    },
};

use super::{
    commands::{
        Control, DirectoryCommand, DirectoryCommandControlResponse, DirectoryCommandRequest,
        DirectoryCommandResponse, DirectoryCommandTransactionResponse, DirectoryStats,
    },
    table::table::ApplyErrors,
};

const DISCONNECT_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Error, Debug)]
pub enum RequestManagerError {
    /// The request stays queued, a timed out mutation can still be committed by the worker afterwards
    #[error("Directory took too long to respond to request, it may still be applied")]
    DirectoryTimeout,
    #[error("Directory is not running")]
    DirectoryUnavailable,
    #[error("Rolled back transaction: {0}")]
    TransactionRollback(ApplyErrors),
}

impl RequestManagerError {
    /// The statement referenced an activity or participant that does not exist, every apply error
    /// is a lookup miss
    pub fn not_found(&self) -> Option<&ApplyErrors> {
        match self {
            RequestManagerError::TransactionRollback(error) => Some(error),
            _ => None,
        }
    }
}

/// Goal of the request manager is to provide a simple interface for interacting with the directory
///
/// The request manager provides the following APIs, sorted by the easiest to use to the most complex
/// 1. Operations on a single activity -- these are completely type safe
/// 2. Statement based API -- not type safe because you need to know what Statement maps to which
///    StatementResult (e.g. Statement::Signup maps -> StatementResult::Message)
/// 3. Transaction based API -- similar to the statement based API, but sends multiple statements that
///    either all commit or all roll back
#[derive(Clone)]
pub struct RequestManager {
    directory_sender: Sender<DirectoryCommandRequest>,
    request_timeout: Duration,
}

impl RequestManager {
    pub fn new(directory_sender: Sender<DirectoryCommandRequest>, request_timeout: Duration) -> Self {
        Self {
            directory_sender,
            request_timeout,
        }
    }

    pub fn send_list(&self) -> Result<ActivityListing, RequestManagerError> {
        let statement_result = self.send_single_statement(Statement::List)?;
        Ok(statement_result.list())
    }

    pub fn send_get(&self, name: ActivityName) -> Result<Activity, RequestManagerError> {
        let statement_result = self.send_single_statement(Statement::Get(name))?;
        Ok(statement_result.single())
    }

    pub fn send_signup(
        &self,
        name: ActivityName,
        email: Email,
    ) -> Result<String, RequestManagerError> {
        let statement_result = self.send_single_statement(Statement::Signup(name, email))?;
        Ok(statement_result.message())
    }

    pub fn send_unregister(
        &self,
        name: ActivityName,
        email: Email,
    ) -> Result<String, RequestManagerError> {
        let statement_result = self.send_single_statement(Statement::Unregister(name, email))?;
        Ok(statement_result.message())
    }

    pub fn send_stats(&self) -> Result<DirectoryStats, RequestManagerError> {
        match self.send_control(Control::Stats)? {
            DirectoryCommandControlResponse::Stats(stats) => Ok(stats),
            other => panic!("Stats should respond with stats, got: {:?}", other),
        }
    }

    /// Sends a shutdown request to the directory and returns the worker's response
    pub fn send_shutdown_request(&self) -> Result<String, RequestManagerError> {
        match self.send_control(Control::Shutdown)? {
            DirectoryCommandControlResponse::Success(message) => Ok(message),
            other => panic!("Shutdown should respond with success, got: {:?}", other),
        }
    }

    /// Sends a single statement to the directory and returns a single statement result
    pub fn send_single_statement(
        &self,
        statement: Statement,
    ) -> Result<StatementResult, RequestManagerError> {
        let single_statement_result = self
            .send_transaction(vec![statement])?
            .pop()
            .expect("single statement should generate single response");

        Ok(single_statement_result)
    }

    /// Used to create a transaction
    pub fn send_transaction(
        &self,
        statements: Vec<Statement>,
    ) -> Result<Vec<StatementResult>, RequestManagerError> {
        match self.send_command(DirectoryCommand::Transaction(statements))? {
            DirectoryCommandResponse::Transaction(DirectoryCommandTransactionResponse::Commit(
                results,
            )) => Ok(results),
            DirectoryCommandResponse::Transaction(
                DirectoryCommandTransactionResponse::Rollback(error),
            ) => Err(RequestManagerError::TransactionRollback(error)),
            DirectoryCommandResponse::Control(_) => {
                panic!("Transactions should respond with a transaction response")
            }
        }
    }

    fn send_control(
        &self,
        control: Control,
    ) -> Result<DirectoryCommandControlResponse, RequestManagerError> {
        match self.send_command(DirectoryCommand::Control(control))? {
            DirectoryCommandResponse::Control(response) => Ok(response),
            DirectoryCommandResponse::Transaction(_) => {
                panic!("Controls should respond with a control response")
            }
        }
    }

    fn send_command(
        &self,
        command: DirectoryCommand,
    ) -> Result<DirectoryCommandResponse, RequestManagerError> {
        let (resolver, response_receiver) = oneshot::channel::<DirectoryCommandResponse>();

        let request = DirectoryCommandRequest { resolver, command };

        // Sends the request to the directory worker, the worker will respond
        //  on the response_receiver once it's finished processing the request
        self.directory_sender
            .send(request)
            .map_err(|_| RequestManagerError::DirectoryUnavailable)?;

        let deadline = Instant::now() + self.request_timeout;

        // A request that lands in the queue after the worker stopped is never answered or dropped,
        //  so wait in slices and give up early once the worker's receiver is gone
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());

            match response_receiver.recv_timeout(remaining.min(DISCONNECT_POLL_INTERVAL)) {
                Ok(response) => return Ok(response),
                Err(oneshot::RecvTimeoutError::Disconnected) => {
                    return Err(RequestManagerError::DirectoryUnavailable)
                }
                Err(oneshot::RecvTimeoutError::Timeout) => {
                    if self.directory_sender.is_disconnected() {
                        return Err(RequestManagerError::DirectoryUnavailable);
                    }

                    if Instant::now() >= deadline {
                        return Err(RequestManagerError::DirectoryTimeout);
                    }
                }
            }
        }
    }
}
