use std::{thread, time::Instant};

use flume::Receiver;
use num_format::{Locale, ToFormattedString};

use crate::{
    consts::consts::{TransactionId, SHUTDOWN_MESSAGE},
    model::statement::{Statement, StatementResult},
};

use super::{
    commands::{
        Control, DirectoryCommand, DirectoryCommandRequest, DirectoryCommandResponse,
        DirectoryCommandTransactionResponse, DirectoryStats,
    },
    options::DirectoryOptions,
    request_manager::RequestManager,
    seed::SeedError,
    table::table::{ActivityTable, ApplyErrors, Rollback},
};

enum CommitStatus {
    Commit,
    Rollback(ApplyErrors),
}

pub enum DirectoryControlAction {
    Continue,
    Exit,
}

/// Owns the activity table. Every read and write goes through the single worker thread started by
/// `run`, so participant lists are never mutated concurrently.
pub struct Directory {
    pub activity_table: ActivityTable,
    current_transaction_id: TransactionId,
    options: DirectoryOptions,
}

impl Directory {
    pub fn new(options: DirectoryOptions) -> Result<Self, SeedError> {
        let now = Instant::now();

        let listing = options.seed.load()?;

        let directory = Self {
            activity_table: ActivityTable::from_listing(listing),
            current_transaction_id: TransactionId::new_first_transaction(),
            options,
        };

        log::info!(
            "✅ Successful Seed [Duration: {}ms]",
            now.elapsed().as_millis(),
        );

        log::info!(
            "📚 Data               [Activities: {}, Participants: {}]",
            directory.activity_table.activity_count(),
            directory
                .activity_table
                .participant_count()
                .to_formatted_string(&Locale::en)
        );

        Ok(directory)
    }

    pub fn new_test() -> Self {
        Directory::new(DirectoryOptions::new_test()).expect("built-in seed should always load")
    }

    /// Starts the worker thread and returns a handle for talking to it
    pub fn run(self) -> RequestManager {
        let (directory_sender, directory_receiver) = flume::unbounded::<DirectoryCommandRequest>();

        let request_timeout = self.options.request_timeout;

        thread::spawn(move || self.listen(directory_receiver));

        RequestManager::new(directory_sender, request_timeout)
    }

    fn listen(mut self, directory_receiver: Receiver<DirectoryCommandRequest>) {
        // Process incoming requests from the channel, exits once every request manager is dropped
        while let Ok(DirectoryCommandRequest { resolver, command }) = directory_receiver.recv() {
            log::info!("Received request: {}", command.log_format());

            let (response, control_action) = match command {
                DirectoryCommand::Transaction(statements) => (
                    DirectoryCommandResponse::Transaction(self.process_statements(statements)),
                    DirectoryControlAction::Continue,
                ),
                DirectoryCommand::Control(control) => self.process_control(control),
            };

            // The requester may have timed out and dropped the receiver, nothing left to tell it
            let _ = resolver.send(response);

            if let DirectoryControlAction::Exit = control_action {
                // Dropping queued requests drops their resolvers, so waiting requesters fail fast
                let dropped = directory_receiver.drain().count();

                if dropped > 0 {
                    log::info!("Dropped {} requests queued behind shutdown", dropped);
                }

                return;
            }
        }

        log::info!("All request managers dropped, stopping directory worker");
    }

    fn process_control(
        &self,
        control: Control,
    ) -> (DirectoryCommandResponse, DirectoryControlAction) {
        match control {
            Control::Stats => (
                DirectoryCommandResponse::control_stats(self.stats()),
                DirectoryControlAction::Continue,
            ),
            Control::Shutdown => {
                let stats = self.stats();

                log::info!(
                    "Shutting down directory [Activities: {}, Participants: {}, CurrentTxId: {}]",
                    stats.activities,
                    stats.participants,
                    stats
                        .current_transaction_id
                        .to_number()
                        .to_formatted_string(&Locale::en)
                );

                (
                    DirectoryCommandResponse::control_success(SHUTDOWN_MESSAGE),
                    DirectoryControlAction::Exit,
                )
            }
        }
    }

    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            activities: self.activity_table.activity_count(),
            participants: self.activity_table.participant_count(),
            current_transaction_id: self.current_transaction_id.clone(),
        }
    }

    pub fn current_transaction_id(&self) -> &TransactionId {
        &self.current_transaction_id
    }

    pub fn process_statement(&mut self, statement: Statement) -> DirectoryCommandTransactionResponse {
        self.process_statements(vec![statement])
    }

    pub fn process_statements(
        &mut self,
        statements: Vec<Statement>,
    ) -> DirectoryCommandTransactionResponse {
        let applying_transaction_id = self.current_transaction_id.increment();

        let is_mutation = statements.iter().any(Statement::is_mutation);

        let mut status = CommitStatus::Commit;

        let mut results: Vec<StatementResult> = Vec::with_capacity(statements.len());
        let mut rollback_stack: Vec<Rollback> = Vec::with_capacity(statements.len());

        for statement in statements {
            match self.activity_table.apply(statement) {
                Ok(applied) => {
                    results.push(applied.result);
                    rollback_stack.push(applied.rollback);
                }
                Err(err) => {
                    status = CommitStatus::Rollback(err);
                    break;
                }
            }
        }

        match status {
            CommitStatus::Commit => {
                // Read-only transactions do not move the transaction id
                if is_mutation {
                    log::info!("✅ Committed: [TX: {}]", &applying_transaction_id);
                    self.current_transaction_id = applying_transaction_id;
                }

                DirectoryCommandTransactionResponse::Commit(results)
            }
            CommitStatus::Rollback(error) => {
                log::info!(
                    "⚠️  Rolled back: [TX: {}] {}",
                    &applying_transaction_id,
                    error
                );

                for rollback in rollback_stack.into_iter().rev() {
                    self.activity_table.apply_rollback(rollback)
                }

                DirectoryCommandTransactionResponse::Rollback(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::*;
    use crate::{
        consts::consts::{ActivityName, Email},
        directory::seed::{mergington_activities, Seed},
    };

    fn signup(name: &str, email: &str) -> Statement {
        Statement::Signup(ActivityName::from(name), Email::from(email))
    }

    fn unregister(name: &str, email: &str) -> Statement {
        Statement::Unregister(ActivityName::from(name), Email::from(email))
    }

    mod signup {
        use super::*;

        #[test]
        fn signup_happy_path() {
            let mut directory = Directory::new_test();

            let response =
                directory.process_statement(signup("Basketball Team", "newstudent@mergington.edu"));

            assert_eq!(
                response,
                DirectoryCommandTransactionResponse::new_committed_single_result(
                    StatementResult::Message(
                        "Signed up newstudent@mergington.edu for Basketball Team".to_string()
                    )
                )
            );
        }

        #[test]
        fn signup_advances_transaction_id() {
            let mut directory = Directory::new_test();

            directory.process_statement(signup("Chess Club", "a@mergington.edu"));
            directory.process_statement(signup("Chess Club", "b@mergington.edu"));

            assert_eq!(directory.current_transaction_id(), &TransactionId(2));
        }

        #[test]
        fn queries_do_not_advance_transaction_id() {
            let mut directory = Directory::new_test();

            directory.process_statement(Statement::List);
            directory.process_statement(Statement::Get(ActivityName::from("Chess Club")));

            assert_eq!(
                directory.current_transaction_id(),
                &TransactionId::new_first_transaction()
            );
        }
    }

    mod unregister {
        use super::*;

        /// Every seeded participant can be unregistered from their activity
        #[rstest]
        #[case("Chess Club", "michael@mergington.edu")]
        #[case("Programming Class", "emma@mergington.edu")]
        #[case("Gym Class", "olivia@mergington.edu")]
        #[case("Basketball Team", "alex@mergington.edu")]
        #[case("Soccer Club", "noah@mergington.edu")]
        #[case("Art Club", "ava@mergington.edu")]
        #[case("Drama Club", "lucas@mergington.edu")]
        #[case("Math Olympiad", "ethan@mergington.edu")]
        #[case("Science Club", "jack@mergington.edu")]
        fn unregister_seeded_participant(#[case] name: &str, #[case] email: &str) {
            // Given a seeded directory where the participant is registered
            let mut directory = Directory::new_test();

            // When they are unregistered
            let response = directory.process_statement(unregister(name, email));

            // Then the message confirms it and they no longer appear
            let message = match response {
                DirectoryCommandTransactionResponse::Commit(mut results) => {
                    results.pop().expect("should have a result").message()
                }
                DirectoryCommandTransactionResponse::Rollback(e) => {
                    panic!("should not roll back: {}", e)
                }
            };

            assert!(message.contains("Unregistered"));
            assert!(!directory
                .activity_table
                .get(&ActivityName::from(name))
                .expect("should exist")
                .has_participant(&Email::from(email)));
        }

        #[test]
        fn unregister_missing_participant_rolls_back() {
            let mut directory = Directory::new_test();

            let response = directory.process_statement(unregister("Chess Club", "noone@nowhere.edu"));

            assert_eq!(
                response,
                DirectoryCommandTransactionResponse::Rollback(
                    ApplyErrors::ParticipantNotRegistered(
                        ActivityName::from("Chess Club"),
                        Email::from("noone@nowhere.edu")
                    )
                )
            );
        }
    }

    mod transaction_rollback {
        use super::*;

        fn create_rollback_statements() -> Vec<Statement> {
            vec![
                signup("Chess Club", "newstudent@mergington.edu"),
                unregister("Basketball Team", "alex@mergington.edu"),
                unregister("Basketball Team", "alex@mergington.edu"),
            ]
        }

        #[test]
        fn rollback_response() {
            // Given a seeded directory
            let mut directory = Directory::new_test();

            // When a rollback happens
            let response = directory.process_statements(create_rollback_statements());

            // Then the failing statement's error is returned
            assert_eq!(
                response,
                DirectoryCommandTransactionResponse::Rollback(
                    ApplyErrors::ParticipantNotRegistered(
                        ActivityName::from("Basketball Team"),
                        Email::from("alex@mergington.edu")
                    )
                )
            );
        }

        #[test]
        fn table_is_unchanged() {
            let mut directory = Directory::new_test();

            directory.process_statements(create_rollback_statements());

            assert_eq!(directory.activity_table.listing(), mergington_activities());
        }

        #[test]
        fn transaction_id_is_unchanged() {
            let mut directory = Directory::new_test();

            directory.process_statements(create_rollback_statements());

            assert_eq!(
                directory.current_transaction_id(),
                &TransactionId::new_first_transaction(),
                "Rolled back transactions should not be counted"
            );
        }

        #[test]
        fn successful_transaction_commits_every_statement() {
            let mut directory = Directory::new_test();

            let response = directory.process_statements(vec![
                signup("Chess Club", "newstudent@mergington.edu"),
                unregister("Basketball Team", "alex@mergington.edu"),
            ]);

            assert!(matches!(
                response,
                DirectoryCommandTransactionResponse::Commit(ref results) if results.len() == 2
            ));
            assert_eq!(directory.current_transaction_id(), &TransactionId(1));
        }
    }

    mod worker {
        use super::*;

        #[test_log::test]
        fn request_manager_round_trip() {
            let rm = Directory::new_test().run();

            let message = rm
                .send_signup(
                    ActivityName::from("Basketball Team"),
                    Email::from("newstudent@mergington.edu"),
                )
                .expect("should sign up");

            assert!(message.contains("Signed up"));

            let activity = rm
                .send_get(ActivityName::from("Basketball Team"))
                .expect("should get");

            assert!(activity.has_participant(&Email::from("newstudent@mergington.edu")));

            let stats = rm.send_stats().expect("should respond");

            assert_eq!(stats.current_transaction_id, TransactionId(1));
            assert_eq!(stats.participants, 18);
        }

        #[test_log::test]
        fn not_found_is_a_rollback() {
            let rm = Directory::new_test().run();

            let error = rm
                .send_unregister(
                    ActivityName::from("Knitting"),
                    Email::from("michael@mergington.edu"),
                )
                .err()
                .expect("should error");

            assert!(error.not_found().is_some());
        }

        #[test_log::test]
        fn requests_after_shutdown_are_unavailable() {
            let rm = Directory::new_test().run();

            let shutdown_response = rm.send_shutdown_request().expect("Should not timeout");

            assert_eq!(shutdown_response, SHUTDOWN_MESSAGE.to_string());

            let error = rm.send_list().err().expect("should error");

            assert!(matches!(
                error,
                crate::directory::request_manager::RequestManagerError::DirectoryUnavailable
            ));
        }

        /// The request sent right behind the shutdown races the worker exiting, it must still fail
        /// as unavailable and without waiting out the timeout
        #[test]
        fn requests_racing_shutdown_fail_fast() {
            let request_timeout = Duration::from_secs(2);

            for _ in 0..100 {
                let rm = Directory::new(
                    DirectoryOptions::new_test().set_request_timeout(request_timeout),
                )
                .unwrap()
                .run();

                rm.send_shutdown_request().expect("Should not timeout");

                let now = Instant::now();

                let error = rm.send_list().err().expect("should error");

                assert!(matches!(
                    error,
                    crate::directory::request_manager::RequestManagerError::DirectoryUnavailable
                ));
                assert!(now.elapsed() < request_timeout);
            }
        }

        #[test_log::test]
        fn concurrent_signups_are_all_recorded() {
            let rm = Directory::new_test().run();

            let handles: Vec<_> = (0..4)
                .map(|thread_id| {
                    let rm = rm.clone();

                    thread::spawn(move || {
                        for index in 0..25 {
                            rm.send_signup(
                                ActivityName::from("Gym Class"),
                                Email(format!("student-{}-{}@mergington.edu", thread_id, index)),
                            )
                            .expect("Should not timeout");
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            let gym = rm.send_get(ActivityName::from("Gym Class")).unwrap();

            // 2 seeded + 100 signups
            assert_eq!(gym.participants.len(), 102);
            assert_eq!(rm.send_stats().unwrap().current_transaction_id, TransactionId(100));
        }
    }

    #[test]
    fn empty_seed_has_no_activities() {
        let directory =
            Directory::new(DirectoryOptions::new_test().set_seed(Seed::Empty)).unwrap();

        assert_eq!(directory.stats().activities, 0);
    }
}
