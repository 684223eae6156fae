//! Walk through the quiz engine end to end.
//!
//! Run with: `cargo run --example quiz`
//!
//! 1. **One question per topic**: fixed seeds, so the output is reproducible.
//! 2. **Diagram questions**: what a front end receives to draw.
//! 3. **JSON**: the wire shape a web client consumes.
//! 4. **Introspection**: which difficulties and types each topic supports.

use dynamics_quiz_gen::{
    available_topics, difficulties_for, types_for, DispatchSession, GenerateOptions, Question,
    QuestionBody,
};

/// Pretty-print one question with its answer key.
fn print_question(q: &Question) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  [{} / {}]  ID: {}", q.topic, q.difficulty, q.id);
    if let Some(diagram) = &q.diagram {
        println!("  Diagram: {:?}", diagram);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Q: {}", q.prompt);
    println!();
    match &q.body {
        QuestionBody::TrueFalse { answer } => {
            println!("  Answer: {}", if *answer { "True" } else { "False" });
        }
        QuestionBody::MultipleChoice { options, correct_index } => {
            for (i, option) in options.iter().enumerate() {
                let marker = if i == *correct_index { "✓" } else { " " };
                println!("  [{}] {marker} {option}", (b'A' + i as u8) as char);
            }
        }
        QuestionBody::Matching { left_items, right_items, correct_mapping } => {
            for (left, &right) in left_items.iter().zip(correct_mapping) {
                println!("  {left}  →  {}", right_items[right]);
            }
        }
    }
    println!();
    println!("  Why: {}", q.explanation);
    println!();
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut session = DispatchSession::new();

    // ── One per topic ──────────────────────────────────────────────────────
    println!();
    println!("══ One question per topic ══");
    println!();
    for (i, topic) in available_topics().into_iter().enumerate() {
        let options = GenerateOptions::new().with_topics([topic]).with_seed(1000 + i as i32);
        match session.generate_question(&options) {
            Some(q) => print_question(&q),
            None => println!("  {topic}: nothing available"),
        }
    }

    // ── Diagrams ───────────────────────────────────────────────────────────
    println!("══ Diagram questions ══");
    println!();
    let diagrams = GenerateOptions::new().diagrams_only(true);
    for _ in 0..2 {
        if let Some(q) = session.generate_question(&diagrams) {
            print_question(&q);
        }
    }

    // ── JSON ───────────────────────────────────────────────────────────────
    println!("══ JSON ══");
    println!();
    if let Some(q) = session.generate_question(&GenerateOptions::new().with_seed(7)) {
        match serde_json::to_string_pretty(&q) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("serialization failed: {e}"),
        }
    }
    println!();

    // ── Introspection ──────────────────────────────────────────────────────
    println!("══ What each topic supports ══");
    println!();
    for topic in available_topics() {
        let difficulties: Vec<String> = difficulties_for(Some(topic)).iter().map(|d| d.to_string()).collect();
        let types: Vec<String> = types_for(Some(topic)).iter().map(|t| t.to_string()).collect();
        println!("  {:<22} {:<40} {}", topic.to_string(), difficulties.join(", "), types.join(", "));
    }
}
