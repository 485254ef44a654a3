//! In-memory task store.
//!
//! The `watch::Sender` is both the storage and the publication point:
//! `send_if_modified` runs the transition under the channel's lock and only
//! notifies subscribers when the command was applied.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{Applied, Board, Command, CommandError, Task};
use crate::ports::{Clock, EventSink, Guard, TaskStore};

pub struct InMemoryTaskStore {
    board: watch::Sender<Arc<Board>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl InMemoryTaskStore {
    pub fn new(tasks: Vec<Task>, clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>) -> Self {
        let (board, _) = watch::channel(Arc::new(Board::new(tasks)));
        Self { board, clock, sink }
    }
}

impl TaskStore for InMemoryTaskStore {
    fn apply_checked(&self, command: Command, guard: Guard<'_>) -> Result<Applied, CommandError> {
        let now = self.clock.now();
        let mut outcome = None;

        self.board.send_if_modified(|current| {
            let result = guard(&**current, &command).and_then(|()| current.apply(&command, now));
            match result {
                Ok((next, event)) => {
                    let version = next.version;
                    *current = Arc::new(next);
                    outcome = Some(Ok(Applied { version, event }));
                    true
                }
                Err(err) => {
                    outcome = Some(Err(err));
                    false
                }
            }
        });
        let Some(outcome) = outcome else {
            unreachable!("send_if_modified runs the closure exactly once");
        };

        match &outcome {
            Ok(applied) => {
                tracing::info!(
                    action = %command.action(),
                    task = %command.task_id(),
                    day = %command.day(),
                    version = applied.version,
                    "command applied"
                );
                self.sink.emit(&applied.event);
            }
            Err(err) => {
                tracing::debug!(
                    action = %command.action(),
                    task = %command.task_id(),
                    day = %command.day(),
                    reason = err.code(),
                    error = %err,
                    "command rejected"
                );
            }
        }
        outcome
    }

    fn snapshot(&self) -> Arc<Board> {
        Arc::clone(&self.board.borrow())
    }

    fn subscribe(&self) -> watch::Receiver<Arc<Board>> {
        self.board.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AssignmentStatus, Catalog, DomainEvent, Role, TaskId, TaskSpec, User, Weekday,
    };
    use crate::ports::{FixedClock, IdGenerator, RecordingEventSink, SequentialIdGenerator};
    use chrono::{Duration, TimeZone, Utc};

    struct Harness {
        store: InMemoryTaskStore,
        clock: Arc<FixedClock>,
        sink: Arc<RecordingEventSink>,
        ids: SequentialIdGenerator,
        kitchen: TaskId,
    }

    fn harness(specs: Vec<TaskSpec>) -> Harness {
        let ids = SequentialIdGenerator::new();
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 10, 6, 8, 0, 0).unwrap(),
        ));
        let sink = Arc::new(RecordingEventSink::new());
        let tasks = Catalog::new(specs).seed(|| ids.generate_task_id());
        let kitchen = tasks[0].id;
        let store = InMemoryTaskStore::new(tasks, clock.clone(), sink.clone());
        Harness {
            store,
            clock,
            sink,
            ids,
            kitchen,
        }
    }

    impl Harness {
        fn tenant(&self, name: &str) -> User {
            User::new(self.ids.generate_user_id(), name, Role::Tenant)
        }

        fn claim(&self, day: Weekday, user: &User) -> Result<Applied, CommandError> {
            self.store.apply(Command::Claim {
                task: self.kitchen,
                day,
                user: user.clone(),
            })
        }

        fn occupied(&self) -> usize {
            self.store.snapshot().task(self.kitchen).unwrap().occupied()
        }
    }

    #[test]
    fn applied_command_publishes_a_new_version() {
        let h = harness(vec![TaskSpec::new("Kitchen", 3, 3)]);
        let before = h.store.snapshot();

        let applied = h.claim(Weekday::Monday, &h.tenant("A")).unwrap();

        let after = h.store.snapshot();
        assert_eq!(applied.version, 1);
        assert_eq!(after.version, 1);
        assert_eq!(before.version, 0);
        assert!(before.task(h.kitchen).unwrap().assignments.is_empty());
    }

    #[test]
    fn rejected_command_changes_nothing_and_emits_nothing() {
        let h = harness(vec![TaskSpec::new("Kitchen", 1, 3)]);
        h.claim(Weekday::Monday, &h.tenant("A")).unwrap();
        let before = h.store.snapshot();

        let err = h.claim(Weekday::Tuesday, &h.tenant("B")).unwrap_err();

        assert!(matches!(err, CommandError::CapacityExceeded { .. }));
        assert!(Arc::ptr_eq(&before, &h.store.snapshot()));
        assert_eq!(h.sink.events().len(), 1);
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let h = harness(vec![TaskSpec::new("Kitchen", 3, 3)]);
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        for (day, name) in Weekday::ALL.into_iter().zip(names) {
            let _ = h.claim(day, &h.tenant(name));
            assert!(h.occupied() <= 3);
        }
        assert_eq!(h.occupied(), 3);
    }

    #[test]
    fn timestamps_come_from_the_clock() {
        let h = harness(vec![TaskSpec::new("Kitchen", 3, 3)]);
        let day = Weekday::Wednesday;
        h.claim(day, &h.tenant("A")).unwrap();

        h.clock.advance(Duration::hours(2));
        h.store
            .apply(Command::Complete {
                task: h.kitchen,
                day,
                photo: "content://photos/1".into(),
            })
            .unwrap();
        h.clock.advance(Duration::hours(1));
        h.store
            .apply(Command::Approve { task: h.kitchen, day })
            .unwrap();

        let board = h.store.snapshot();
        let a = board.task(h.kitchen).unwrap().assignment(day).unwrap();
        assert_eq!(a.status, AssignmentStatus::Approved);
        assert_eq!(a.completed_at.unwrap() + Duration::hours(1), a.approved_at.unwrap());
    }

    #[test]
    fn events_are_emitted_in_command_order() {
        let h = harness(vec![TaskSpec::new("Kitchen", 3, 3)]);
        let day = Weekday::Friday;
        let ana = h.tenant("Ana");

        h.claim(day, &ana).unwrap();
        h.store
            .apply(Command::Complete { task: h.kitchen, day, photo: "p".into() })
            .unwrap();
        h.store
            .apply(Command::Reject { task: h.kitchen, day, comment: "redo".into() })
            .unwrap();
        h.store.apply(Command::Release { task: h.kitchen, day }).unwrap();

        let kinds: Vec<_> = h.sink.events().iter().map(DomainEvent::kind).collect();
        assert_eq!(kinds, vec!["claimed", "completed", "rejected", "released"]);
        assert!(matches!(
            h.sink.events().last(),
            Some(DomainEvent::Released { claimant, previous: AssignmentStatus::Rejected, .. })
                if *claimant == ana.id
        ));
    }

    #[test]
    fn pending_approvals_match_pending_slots_exactly() {
        let h = harness(vec![TaskSpec::new("Kitchen", 7, 3)]);
        for day in Weekday::ALL {
            h.claim(day, &h.tenant(day.short_name())).unwrap();
        }
        for day in [Weekday::Monday, Weekday::Wednesday, Weekday::Sunday] {
            h.store
                .apply(Command::Complete { task: h.kitchen, day, photo: "p".into() })
                .unwrap();
        }
        h.store
            .apply(Command::Approve { task: h.kitchen, day: Weekday::Wednesday })
            .unwrap();

        let days: Vec<_> = h.store.pending_approvals().iter().map(|p| p.day).collect();
        assert_eq!(days, vec![Weekday::Monday, Weekday::Sunday]);
    }

    #[test]
    fn guard_denial_publishes_nothing() {
        let h = harness(vec![TaskSpec::new("Kitchen", 3, 3)]);
        let before = h.store.snapshot();
        let rx = h.store.subscribe();

        let ana = h.tenant("Ana");
        let err = h
            .store
            .apply_checked(
                Command::Claim { task: h.kitchen, day: Weekday::Monday, user: ana.clone() },
                &|_, command| {
                    Err(CommandError::NotPermitted {
                        actor: "nobody".into(),
                        action: command.action(),
                        reason: "closed for the week",
                    })
                },
            )
            .unwrap_err();

        assert_eq!(err.code(), "not_permitted");
        assert!(Arc::ptr_eq(&before, &h.store.snapshot()));
        assert!(!rx.has_changed().unwrap());
        assert!(h.sink.events().is_empty());
    }

    #[test]
    fn guard_sees_the_board_it_guards() {
        let h = harness(vec![TaskSpec::new("Kitchen", 3, 3)]);
        let day = Weekday::Thursday;
        let ana = h.tenant("Ana");
        let beto = h.tenant("Beto");
        h.claim(day, &ana).unwrap();

        // the slot changes hands between the caller's read and the guarded write
        let stale = h.store.snapshot();
        h.store.apply(Command::Release { task: h.kitchen, day }).unwrap();
        h.claim(day, &beto).unwrap();

        let only_ana = |board: &Board, command: &Command| {
            let claimant = board
                .task(command.task_id())
                .and_then(|t| t.assignment(command.day()))
                .map(|a| a.claimant_id);
            if claimant == Some(ana.id) {
                Ok(())
            } else {
                Err(CommandError::NotPermitted {
                    actor: ana.name.clone(),
                    action: command.action(),
                    reason: "not the claimant",
                })
            }
        };
        let complete = Command::Complete { task: h.kitchen, day, photo: "p".into() };

        assert!(only_ana(&stale, &complete).is_ok());
        let err = h.store.apply_checked(complete, &only_ana).unwrap_err();
        assert!(matches!(err, CommandError::NotPermitted { .. }));
        let board = h.store.snapshot();
        let slot = board.task(h.kitchen).unwrap().assignment(day).unwrap();
        assert_eq!(slot.status, AssignmentStatus::Taken);
        assert_eq!(slot.claimant_id, beto.id);
    }

    #[tokio::test]
    async fn subscribers_see_applied_commands_only() {
        let h = harness(vec![TaskSpec::new("Kitchen", 1, 3)]);
        let mut rx = h.store.subscribe();
        assert_eq!(rx.borrow_and_update().version, 0);

        h.claim(Weekday::Monday, &h.tenant("A")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().version, 1);

        // full task: rejected, no notification
        let _ = h.claim(Weekday::Tuesday, &h.tenant("B"));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn unknown_task_is_rejected() {
        let h = harness(vec![TaskSpec::new("Kitchen", 1, 3)]);
        let ghost = TaskId::from_ulid(ulid::Ulid::new());
        let err = h
            .store
            .apply(Command::Release { task: ghost, day: Weekday::Monday })
            .unwrap_err();
        assert_eq!(err, CommandError::TaskNotFound(ghost));
    }
}
