//! The `quizkit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizkit.toml").exists() {
        println!("quizkit.toml already exists, skipping.");
    } else {
        std::fs::write("quizkit.toml", SAMPLE_CONFIG)?;
        println!("Created quizkit.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.json");
    if example_path.exists() {
        println!("question-banks/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_POOL)?;
        println!("Created question-banks/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizkit validate --pool question-banks/example.json");
    println!("  2. Run: quizkit take --pool question-banks/example.json");
    println!("  3. Run: quizkit fetch --query derivatives");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizkit configuration

[bank]
base_url = "https://dev.faceittools.com"
timeout_secs = 30

[quiz]
# Questions shown per attempt; remove to show the whole pool.
display_count = 3
"#;

const EXAMPLE_POOL: &str = r#"{
  "status": "success",
  "questions": [
    {
      "type": "MULTIPLE_CHOICE",
      "body": "What is the derivative of sin(x)?",
      "answers": ["-cos(x)", "tan(x)", "cos(x)"],
      "answer": ["cos(x)"],
      "notes": ["d/dx sin(x) = cos(x)."]
    },
    {
      "type": "MULTIPLE_CHOICE",
      "body": "Which of these functions are even?",
      "answers": ["cos(x)", "x^2", "sin(x)"],
      "answer": ["cos(x)", "x^2"],
      "notes": ["f is even when f(-x) = f(x)."]
    },
    {
      "type": "NUMERIC",
      "body": "What is the derivative of x^2 at x = 3?",
      "answer": "6"
    },
    {
      "type": "TEXT",
      "body": "Why is the derivative of a constant zero?",
      "notes": ["A constant does not change, so its rate of change is zero."]
    },
    {
      "type": "CODE",
      "body": "Name a function that adds its arguments.",
      "tests": [
        { "args": [1, 2], "expected": 3 },
        { "args": [-4, 4], "expected": 0 }
      ]
    }
  ]
}
"#;
