//! The `quizkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::parser::{self, PoolFile};

pub fn execute(pool_path: PathBuf) -> Result<()> {
    let files: Vec<PoolFile> = if pool_path.is_dir() {
        parser::load_pool_directory(&pool_path)?
    } else {
        vec![parser::parse_pool_file(&pool_path)?]
    };

    let mut total_warnings = 0;
    let mut total_errors = 0;

    for file in &files {
        println!("Pool: {} ({} questions)", file.name(), file.questions.len());

        let warnings = parser::validate_pool(&file.questions);
        for w in &warnings {
            let prefix = w
                .index
                .map(|i| format!("  [#{}]", i + 1))
                .unwrap_or_else(|| "  ".to_string());
            let level = if w.fatal { "ERROR" } else { "WARNING" };
            println!("{prefix} {level}: {}", w.message);
        }
        total_errors += warnings.iter().filter(|w| w.fatal).count();
        total_warnings += warnings.iter().filter(|w| !w.fatal).count();
    }

    if total_errors > 0 {
        anyhow::bail!("{total_errors} invalid question(s) found");
    }

    if total_warnings == 0 {
        println!("All question pools valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
