//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizkit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizkit").unwrap()
}

const ONE_QUESTION: &str = r#"[
  {
    "type": "MULTIPLE_CHOICE",
    "body": "What is the derivative of sin(x)?",
    "answers": ["-cos(x)", "tan(x)", "cos(x)"],
    "answer": "cos(x)",
    "notes": ["d/dx sin(x) = cos(x)."]
  }
]"#;

fn one_question_pool(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("one.json");
    std::fs::write(&path, ONE_QUESTION).unwrap();
    path
}

#[test]
fn validate_sample_bank() {
    quizkit()
        .arg("validate")
        .arg("--pool")
        .arg("../../question-banks/calculus.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("All question pools valid"));
}

#[test]
fn validate_directory() {
    quizkit()
        .arg("validate")
        .arg("--pool")
        .arg("../../question-banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("calculus.json"))
        .stdout(predicate::str::contains("programming.toml"));
}

#[test]
fn validate_reports_invalid_questions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"[{ "type": "ESSAY", "body": "Discuss" }, { "type": "TEXT", "body": "Read" }]"#,
    )
    .unwrap();

    quizkit()
        .arg("validate")
        .arg("--pool")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[#1] ERROR: unsupported question type: ESSAY"))
        .stdout(predicate::str::contains("[#2] WARNING"))
        .stderr(predicate::str::contains("1 invalid question(s)"));
}

#[test]
fn validate_rejects_a_lone_question_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("one.json");
    std::fs::write(&path, r#"{ "type": "NUMERIC", "body": "2+2", "answer": "4" }"#).unwrap();

    quizkit()
        .arg("validate")
        .arg("--pool")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("All question pools valid").not())
        .stderr(predicate::str::contains("failed to parse JSON"));
}

#[test]
fn take_rejects_zero_count() {
    let dir = TempDir::new().unwrap();
    let pool = one_question_pool(&dir);

    quizkit()
        .arg("take")
        .arg("--pool")
        .arg(&pool)
        .arg("--count")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--count"));
}

#[test]
fn validate_nonexistent_file() {
    quizkit()
        .arg("validate")
        .arg("--pool")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizkit.toml"))
        .stdout(predicate::str::contains("Created question-banks/example.json"));

    assert!(dir.path().join("quizkit.toml").exists());
    assert!(dir.path().join("question-banks/example.json").exists());

    quizkit()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--pool")
        .arg("question-banks/example.json")
        .assert()
        .success();
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn take_correct_answer() {
    let dir = TempDir::new().unwrap();
    let pool = one_question_pool(&dir);

    quizkit()
        .current_dir(dir.path())
        .arg("take")
        .arg("--pool")
        .arg(&pool)
        .arg("--seed")
        .arg("1")
        .write_stdin("3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("All questions are correct!"))
        .stdout(predicate::str::contains("d/dx sin(x) = cos(x)."));
}

#[test]
fn take_wrong_answer_declines_retry() {
    let dir = TempDir::new().unwrap();
    let pool = one_question_pool(&dir);

    quizkit()
        .current_dir(dir.path())
        .arg("take")
        .arg("--pool")
        .arg(&pool)
        .write_stdin("1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrong answer!"))
        .stdout(predicate::str::contains("Some answers are wrong. Try again!"));
}

#[test]
fn take_retry_then_pass_with_json_summary() {
    let dir = TempDir::new().unwrap();
    let pool = one_question_pool(&dir);

    quizkit()
        .current_dir(dir.path())
        .arg("take")
        .arg("--pool")
        .arg(&pool)
        .arg("--seed")
        .arg("42")
        .arg("--json")
        .write_stdin("1\ny\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Attempt 2"))
        .stdout(predicate::str::contains("\"verdict\": \"approved\""))
        .stdout(predicate::str::contains("\"attempts\": 2"));
}

#[test]
fn take_requires_a_source() {
    quizkit()
        .arg("take")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pool"));
}

#[test]
fn render_writes_html() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quiz.html");

    quizkit()
        .arg("render")
        .arg("--pool")
        .arg("../../question-banks/calculus.json")
        .arg("--count")
        .arg("2")
        .arg("--seed")
        .arg("3")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 2 question(s)"));

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>calculus</title>"));
    assert_eq!(html.matches("<article class=\"question\"").count(), 2);
}

#[test]
fn fetch_requires_a_query() {
    quizkit().arg("fetch").assert().failure();
}

#[test]
fn help_output() {
    quizkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz evaluation and session runner"));
}

#[test]
fn version_output() {
    quizkit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizkit"));
}
