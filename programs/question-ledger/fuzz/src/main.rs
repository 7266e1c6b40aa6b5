//! Fuzz test runner for the Question Ledger program
//!
//! Run with: cargo run --release
//! Or: cargo test (for property-based tests)

use proptest::prelude::*;
use question_ledger_fuzz::*;
use std::time::Instant;

fn main() {
    println!("=== Question Ledger Fuzz Testing ===\n");

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    println!("Running ask/answer fuzz tests...");
    let (p, f) = run_ask_answer_fuzz(200);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running session fuzz tests...");
    let (p, f) = run_session_fuzz(200);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running edge case tests...");
    let (p, f) = run_edge_case_tests();
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);

    if failed > 0 {
        std::process::exit(1);
    }
}

const ASKER: AccountKey = [0x01; 32];

fn run_ask_answer_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let input = any::<AskAnswerInput>()
            .new_tree(&mut runner)
            .expect("Failed to generate AskAnswerInput")
            .current();

        let mut ledger = SimulatedLedger::new(OWNER_KEY, input.min_reward);
        ledger.add_contract(ASKER, input.reward);
        let id = question_id_of(&input.question);

        let asked = simulate_ask(
            &mut ledger,
            ASKER,
            ASKER,
            &input.question,
            input.reward,
            input.ask_timestamp,
        );
        let answered = if asked.is_success() {
            simulate_answer(
                &mut ledger,
                OWNER_KEY,
                id,
                &input.answer,
                input.ask_timestamp + input.answer_delay,
            )
        } else {
            asked.clone()
        };

        if asked.is_invariant_violation() || answered.is_invariant_violation() {
            println!("  [FAIL] Iteration {}: {:?} / {:?}", i, asked, answered);
            failed += 1;
        } else if answered.is_success() && ledger.balance_of(&OWNER_KEY) != input.reward {
            println!(
                "  [FAIL] Iteration {}: owner received {} instead of {}",
                i,
                ledger.balance_of(&OWNER_KEY),
                input.reward
            );
            failed += 1;
        } else {
            passed += 1;
        }
    }

    println!("  ask/answer: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_session_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let session = any::<LedgerSession>()
            .new_tree(&mut runner)
            .expect("Failed to generate LedgerSession")
            .current();

        let mut ledger = new_session_ledger(session.min_reward);
        let initial_lamports = ledger.total_lamports();
        let mut violation = None;

        for (step, action) in session.actions.iter().enumerate() {
            let result = simulate_action(&mut ledger, action, session.start_timestamp + step as i64);
            if result.is_invariant_violation() {
                violation = Some(format!("{:?} after {:?}", result, action));
                break;
            }
        }

        if violation.is_none() && ledger.total_lamports() != initial_lamports {
            violation = Some("lamports not conserved across session".to_string());
        }

        match violation {
            Some(reason) => {
                println!("  [FAIL] Iteration {}: {}", i, reason);
                failed += 1;
            }
            None => passed += 1,
        }
    }

    println!("  session: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_edge_case_tests() -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut check = |name: &str, ok: bool| {
        if ok {
            passed += 1;
        } else {
            println!("  [FAIL] {}", name);
            failed += 1;
        }
    };

    // u64::MAX reward escrows and pays out in full
    {
        let mut ledger = SimulatedLedger::new(OWNER_KEY, 0);
        ledger.add_contract(ASKER, u64::MAX);
        let id = question_id_of(b"How are you?");
        let ok = simulate_ask(&mut ledger, ASKER, ASKER, b"How are you?", u64::MAX, 1).is_success()
            && simulate_answer(&mut ledger, OWNER_KEY, id, b"Rich", 2).is_success()
            && ledger.balance_of(&OWNER_KEY) == u64::MAX;
        check("u64::MAX reward", ok);
    }

    // A second escrow that would overflow the tracked total is rejected
    {
        let mut ledger = SimulatedLedger::new(OWNER_KEY, 0);
        ledger.add_contract(ASKER, u64::MAX);
        ledger.add_contract([0x02; 32], 1);
        let first = simulate_ask(&mut ledger, ASKER, ASKER, b"first", u64::MAX, 1);
        let second = simulate_ask(&mut ledger, [0x02; 32], [0x02; 32], b"second", 1, 1);
        check(
            "escrow total overflow",
            first.is_success() && second.is_error_named("ArithmeticOverflow"),
        );
    }

    // Zero reward questions are answerable with nothing paid
    {
        let mut ledger = SimulatedLedger::new(OWNER_KEY, 0);
        ledger.add_contract(ASKER, 0);
        let id = question_id_of(b"free?");
        let ok = simulate_ask(&mut ledger, ASKER, ASKER, b"free?", 0, 1).is_success()
            && simulate_answer(&mut ledger, OWNER_KEY, id, b"yes", 1).is_success()
            && ledger.balance_of(&OWNER_KEY) == 0;
        check("zero reward", ok);
    }

    // Revoked ids can be asked again
    {
        let mut ledger = SimulatedLedger::new(OWNER_KEY, 0);
        ledger.add_contract(ASKER, 10);
        let id = question_id_of(b"again?");
        let ok = simulate_ask(&mut ledger, ASKER, ASKER, b"again?", 10, 1).is_success()
            && simulate_revoke(&mut ledger, ASKER, id).is_success()
            && simulate_ask(&mut ledger, ASKER, ASKER, b"again?", 10, 2).is_success()
            && ledger.record(&id).map(|q| q.ask_timestamp == 2).unwrap_or(false);
        check("re-ask after revoke", ok);
    }

    // Question and answer exactly at their length limits
    {
        let mut ledger = SimulatedLedger::new(OWNER_KEY, 0);
        ledger.add_contract(ASKER, 0);
        let text = vec![b'q'; MAX_QUESTION_LEN];
        let answer = vec![b'a'; MAX_ANSWER_LEN];
        let id = question_id_of(&text);
        let ok = simulate_ask(&mut ledger, ASKER, ASKER, &text, 0, 1).is_success()
            && simulate_answer(&mut ledger, OWNER_KEY, id, &answer, 1).is_success();
        check("length limits", ok);
    }

    println!("  edge cases: {} passed, {} failed", passed, failed);
    (passed, failed)
}
