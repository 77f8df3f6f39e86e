//! Scripted walk through one game session.
//!
//! Run with: `RUST_LOG=finance_quiz_engine=debug cargo run --example session`
//!
//! The driver plays the host's part: it loads the three data sources, answers
//! every question (mostly correctly), borrows when the balance dips below
//! zero, sits through crises one simulated second at a time, and prints the
//! lifecycle notifications as they arrive.

use std::time::Duration;

use finance_quiz_engine::{
    view_adapter::{current_page_start, hud_snapshot, level_grid, page},
    EventDecision, GameConfig, GameData, GameEvent, GameSession, Phase,
};
use tracing_subscriber::EnvFilter;

fn scenario_json() -> String {
    let scenario = |name: &str, sector: &str| {
        let questions: Vec<String> = (0..20)
            .map(|i| {
                let correct = if i % 3 == 0 { "False" } else { "True" };
                format!(
                    r#"{{ "company": "{name} Co {i}", "sector": "{sector}",
                        "statements": ["Operating margin changed by {i} points"],
                        "table": [ {{ "row": ["Margin", "{i}%"] }} ],
                        "options": ["['True']", "['False']"], "correct": "{correct}",
                        "justification": "Compare the two periods." }}"#
                )
            })
            .collect();
        format!(r#""{name}": [{}]"#, questions.join(","))
    };
    format!("{{ {}, {} }}", scenario("Retail", "Consumer"), scenario("Energy", "Utilities"))
}

const CRISIS: &str = r#"{ "questions": [
    { "question": "A bank run drains deposits", "answer": true },
    { "question": "Inflation raises real wages", "answer": false }
] }"#;

const NARRATIVE: &str = r#"{ "crisisEvents": [ { "text": "Shipping lanes close overnight." } ] }"#;

fn print_events(session: &mut GameSession) {
    for event in session.drain_events() {
        match event {
            GameEvent::RoundOver { correct, delta, balance } => {
                let mark = if correct { "✓" } else { "✗" };
                println!("  {mark} {delta:+}  balance {balance}");
            }
            other => println!("  · {other:?}"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let data = GameData::from_json(&scenario_json(), CRISIS, NARRATIVE)?;
    let mut config = GameConfig::from_json_str(r#"{ "rng_seed": 2024 }"#)?;
    config.events.crisis_probability = 0.5;
    config.events.war_probability = 0.3;

    let mut session = GameSession::new(config, data)?;
    session.login("demo", "demo")?;
    print_events(&mut session);

    let mut answered = 0u32;
    while !session.phase().is_terminal() {
        match session.phase() {
            Phase::AwaitingLevel => session.load_level()?,
            Phase::InQuestion => {
                // Pick the right option four times out of five.
                let choice = match session.current_question() {
                    Some(q) if answered % 5 != 4 => q.correct_option.clone(),
                    Some(q) => q.options.iter().find(|o| **o != q.correct_option).cloned().unwrap_or_default(),
                    None => String::new(),
                };
                answered += 1;
                session.submit_answer(&choice)?;
            }
            Phase::Borrowing(_) => {
                let amount = session.borrow_options().first().copied().unwrap_or(10);
                session.borrow(amount)?;
            }
            Phase::RoundOver => session.advance()?,
            Phase::EventGateCheck => {
                let decision = session.evaluate_events()?;
                if decision != EventDecision::None {
                    println!("  !! {decision:?}");
                }
            }
            Phase::CrisisActive => {
                session.tick(Duration::from_secs(1))?;
                if session.phase() == Phase::CrisisActive {
                    let truth = session.crisis().current_question().map(|q| q.answer).unwrap_or(true);
                    session.answer_crisis(truth)?;
                }
            }
            Phase::WarActive => {
                println!(
                    "  war narrative: {}",
                    session.war().narrative().map(|n| n.text.as_str()).unwrap_or("")
                );
                session.acknowledge_war()?;
            }
            Phase::GameComplete | Phase::GameOver => {}
        }
        print_events(&mut session);
        if answered > 500 {
            break;
        }
    }

    let grid = level_grid(&session);
    let start = current_page_start(&session);
    println!("\nlevel grid page starting at {start}:");
    for cell in page(&grid, start) {
        println!("  level {} ({}): {:?}", cell.flat_index + 1, cell.key, cell.status);
    }
    println!("\n{}", serde_json::to_string_pretty(&hud_snapshot(&session))?);
    Ok(())
}
