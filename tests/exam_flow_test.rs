use anyhow::Result;
use exam_prep::app::report::render_result;
use exam_prep::core::catalog::EXAMPLE_FILE;
use exam_prep::core::history::{export_csv, read_history, HISTORY_FILE};
use exam_prep::{
    AttemptPlan, ExamEngine, ExamError, HistorySink, LocalStorage, NoHistory, RunOutcome,
    TerminalRunner,
};
use std::io::Cursor;
use tempfile::TempDir;

const NETWORKING_EXAM: &str = r#"{
  "name": "Networking",
  "description": "TCP/IP fundamentals",
  "passing_score": 50,
  "time_limit": 10,
  "questions": [
    {
      "text": "Which layer does TCP belong to?",
      "type": "single",
      "options": ["Network", "Transport", "Session"],
      "correct_answers": [1],
      "explanation": "TCP is a transport layer protocol"
    },
    {
      "text": "Which of these are private IPv4 ranges?",
      "type": "multiple",
      "options": ["10.0.0.0/8", "8.8.8.0/24", "192.168.0.0/16"],
      "correct_answers": [0, 2]
    }
  ]
}"#;

fn scripted(script: &str) -> TerminalRunner<Cursor<Vec<u8>>, Vec<u8>> {
    TerminalRunner::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
}

#[tokio::test]
async fn test_first_run_seeds_example_exam() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exam_dir = temp_dir.path().join("exam");

    let mut engine = ExamEngine::new(LocalStorage::new(&exam_dir), NoHistory, true);
    let catalog = engine.load().await?;

    assert_eq!(catalog.names(), vec!["Example exam"]);
    assert!(exam_dir.join(EXAMPLE_FILE).is_file());

    // The seeded file must be a valid exam on its own.
    let checks = engine.check().await?;
    assert_eq!(checks.len(), 1);
    assert!(checks[0].is_ok());
    Ok(())
}

#[tokio::test]
async fn test_invalid_files_are_reported_but_do_not_block_loading() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exam_dir = temp_dir.path();
    tokio::fs::write(exam_dir.join("networking.json"), NETWORKING_EXAM).await?;
    tokio::fs::write(
        exam_dir.join("broken.json"),
        r#"{"name": "Broken", "description": "d", "questions": [
            {"text": "q", "type": "single", "options": ["a", "b"], "correct_answers": [0, 1]}
        ]}"#,
    )
    .await?;

    let mut engine = ExamEngine::new(LocalStorage::new(exam_dir), NoHistory, true);
    let catalog = engine.load().await?;
    assert_eq!(catalog.names(), vec!["Networking"]);
    assert!(!exam_dir.join(EXAMPLE_FILE).exists());

    let checks = engine.check().await?;
    let broken = checks.iter().find(|c| c.file == "broken.json").unwrap();
    match &broken.outcome {
        Err(ExamError::ExamValidationError { exam, message }) => {
            assert_eq!(exam, "Broken");
            assert!(message.starts_with("question 1:"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_take_exam_and_record_history() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exam_dir = temp_dir.path().join("exam");
    let results_dir = temp_dir.path().join("results");
    tokio::fs::create_dir_all(&exam_dir).await?;
    tokio::fs::write(exam_dir.join("networking.json"), NETWORKING_EXAM).await?;

    let history = HistorySink::new(LocalStorage::new(&results_dir));
    let mut engine = ExamEngine::new(LocalStorage::new(&exam_dir), history, true);
    engine.load().await?;

    // Right on question 1, half right on question 2.
    let mut runner = scripted("2\nn\n1\nf\n");
    let mut session = engine.start("Networking", AttemptPlan::default())?;
    let result = match runner.run(&mut session)? {
        RunOutcome::Completed(result) => result,
        RunOutcome::Aborted => panic!("attempt should complete"),
    };

    assert_eq!(result.score, 1);
    assert_eq!(result.percentage, 50.0);
    assert!(result.passed);

    let report = render_result(&result, session.exam());
    assert!(report.contains("Your answer:    10.0.0.0/8"));
    assert!(report.contains("Correct answer: 10.0.0.0/8, 192.168.0.0/16"));
    assert!(report.contains("💡 Explanation: TCP is a transport layer protocol"));

    engine.record(&result).await?;
    assert!(results_dir.join(HISTORY_FILE).is_file());

    let entries = read_history(&LocalStorage::new(&results_dir), Some("Networking")).await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].score, 1);

    let mut csv_out = Vec::new();
    export_csv(&entries, &mut csv_out)?;
    assert!(String::from_utf8(csv_out)?.contains("Networking,1,2,50.0,true,false"));
    Ok(())
}

#[tokio::test]
async fn test_shuffled_attempt_keeps_results_in_file_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("networking.json"), NETWORKING_EXAM).await?;

    let mut engine = ExamEngine::new(LocalStorage::new(temp_dir.path()), NoHistory, true);
    engine.load().await?;

    let plan = AttemptPlan {
        shuffle: true,
        seed: Some(11),
    };
    let mut session = engine.start("Networking", plan)?;
    for _ in 0..session.len() {
        let correct = session.current().question.correct_answers.clone();
        session.select(&correct)?;
        session.next();
    }

    let result = session.finish_now();
    assert_eq!(result.score, 2);
    assert_eq!(result.answers[0].question_text, "Which layer does TCP belong to?");
    assert_eq!(result.answers[1].user_answer, vec![0, 2]);
    Ok(())
}

#[tokio::test]
async fn test_unknown_exam_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut engine = ExamEngine::new(LocalStorage::new(temp_dir.path()), NoHistory, false);
    assert!(engine.load().await?.is_empty());

    let err = engine.start("Networking", AttemptPlan::default()).unwrap_err();
    assert!(matches!(err, ExamError::ExamNotFound { .. }));
    Ok(())
}
