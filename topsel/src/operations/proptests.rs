//! Property-based tests for the reservation engine.
//!
//! These tests drive random operation sequences through the plan-execute
//! pipeline and check the cross-entity invariants after every step:
//! a topic is held iff it is unavailable, a confirmed topic is held by
//! its confirmed student, and each student's reservation pointer agrees
//! with exactly the topics that name them as holder.

use proptest::prelude::*;
use rusqlite::Connection;

use crate::database::test_util::{create_test_database, seed_student, seed_teacher, seed_topic};
use crate::database::Database;
use crate::identity::{Identity, Role};

use super::{
    ConfirmOptions, ConfirmPlan, DeleteOptions, DeletePlan, PlanExecutor, RejectOptions,
    RejectPlan, ReserveOptions, ReservePlan, WithdrawPlan,
};

const TITLES: [&str; 3] = ["T1", "T2", "T3"];
const STUDENTS: [(&str, &str); 3] = [("s1", "Shen Yi"), ("s2", "Li Wen"), ("s3", "Zhao Lei")];

/// One randomly chosen engine operation.
#[derive(Debug, Clone)]
enum Op {
    Reserve { student: usize, title: usize },
    Withdraw { student: usize },
    Confirm { title: usize, student: usize },
    Reject { title: usize },
    Delete { title: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..3usize).prop_map(|(student, title)| Op::Reserve { student, title }),
        (0..3usize).prop_map(|student| Op::Withdraw { student }),
        (0..3usize, 0..3usize).prop_map(|(title, student)| Op::Confirm { title, student }),
        (0..3usize).prop_map(|title| Op::Reject { title }),
        (0..3usize).prop_map(|title| Op::Delete { title }),
    ]
}

fn seeded_database() -> Database {
    let db = create_test_database();
    seed_teacher(db.connection(), "t1", "Prof. Tang");
    for (username, display_name) in STUDENTS {
        seed_student(db.connection(), username, display_name);
    }
    for title in TITLES {
        seed_topic(db.connection(), title, "t1");
    }
    db
}

/// Applies one operation, ignoring domain failures (they must be no-ops).
fn apply(db: &mut Database, op: &Op) {
    let plan = match op {
        Op::Reserve { student, title } => ReservePlan::new(
            Identity::new(STUDENTS[*student].0, Role::Student),
            ReserveOptions::new(TITLES[*title]),
        )
        .build_plan(db.connection()),
        Op::Withdraw { student } => {
            WithdrawPlan::new(Identity::new(STUDENTS[*student].0, Role::Student))
                .build_plan(db.connection())
        }
        Op::Confirm { title, student } => ConfirmPlan::new(
            Identity::new("t1", Role::Teacher),
            ConfirmOptions::new(TITLES[*title], STUDENTS[*student].1),
        )
        .build_plan(db.connection()),
        Op::Reject { title } => RejectPlan::new(
            Identity::new("t1", Role::Teacher),
            RejectOptions::new(TITLES[*title]),
        )
        .build_plan(db.connection()),
        Op::Delete { title } => DeletePlan::new(
            Identity::new("t1", Role::Teacher),
            DeleteOptions::new(TITLES[*title]),
        )
        .build_plan(db.connection()),
    };

    if let Ok(plan) = plan {
        // Execution may still fail; failures roll back completely
        let _ = PlanExecutor::new(db).execute(&plan);
    }
}

/// Checks the cross-entity invariants over the whole store.
fn assert_invariants(conn: &Connection) -> Result<(), TestCaseError> {
    // Topic side: held iff unavailable; confirmed implies held by the
    // confirmed student
    for title in TITLES {
        let Some(topic) = Database::get_topic_by_title(conn, title).unwrap() else {
            continue;
        };
        let held = topic.reserved_by().is_some();
        prop_assert_eq!(
            held,
            topic.availability() == crate::topic::Availability::Unavailable,
            "topic '{}' held/availability mismatch",
            title
        );
        if let Some(final_student) = topic.final_student() {
            prop_assert_eq!(
                topic.confirmation_state(),
                crate::topic::ConfirmationState::Confirmed,
                "topic '{}' has a final student without confirmation",
                title
            );
            prop_assert_eq!(
                Some(final_student),
                topic.reserved_by(),
                "topic '{}' final student is not the holder",
                title
            );
        }
    }

    // Student side: the pointer names exactly the one topic held
    for (username, _) in STUDENTS {
        let profile = Database::get_student_profile(conn, username)
            .unwrap()
            .unwrap();
        let held = Database::get_topic_by_holder(conn, username).unwrap();
        prop_assert_eq!(
            profile.current_reservation.as_deref(),
            held.as_ref().map(|t| t.title()),
            "student '{}' pointer disagrees with topic side",
            username
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    // Cross-entity invariants hold after every step of any sequence
    #[test]
    fn invariants_hold_under_random_sequences(
        ops in prop::collection::vec(op_strategy(), 1..25)
    ) {
        let mut db = seeded_database();
        for op in &ops {
            apply(&mut db, op);
            assert_invariants(db.connection())?;
        }
    }

    // Reserve then withdraw restores the topic row exactly
    #[test]
    fn reserve_withdraw_round_trip(student in 0..3usize, title in 0..3usize) {
        let mut db = seeded_database();
        let before = Database::get_topic_by_title(db.connection(), TITLES[title])
            .unwrap()
            .unwrap();

        apply(&mut db, &Op::Reserve { student, title });
        apply(&mut db, &Op::Withdraw { student });

        let after = Database::get_topic_by_title(db.connection(), TITLES[title])
            .unwrap()
            .unwrap();
        prop_assert_eq!(before, after);

        let profile = Database::get_student_profile(db.connection(), STUDENTS[student].0)
            .unwrap()
            .unwrap();
        prop_assert_eq!(profile.current_reservation, None);
    }

    // At most one student ever holds a given topic
    #[test]
    fn holders_are_exclusive(
        ops in prop::collection::vec(op_strategy(), 1..25)
    ) {
        let mut db = seeded_database();
        for op in &ops {
            apply(&mut db, op);

            for title in TITLES {
                let holders: i64 = db
                    .connection()
                    .query_row(
                        "SELECT COUNT(*) FROM students WHERE current_reservation = ?",
                        [title],
                        |row| row.get(0),
                    )
                    .unwrap();
                prop_assert!(holders <= 1, "multiple holders for '{}'", title);
            }
        }
    }
}
