//! # Result Auditor
//!
//! Command-line tool to re-run the referee over a recorded submission.
//!
//! The input is the stored session (seed included) next to the result the
//! client sent and the server instant it arrived:
//!
//! ```json
//! { "session": { ... }, "result": { ... }, "submittedAt": 1700000050000 }
//! ```
//!
//! Because validation is deterministic, the verdict and signature printed
//! here match what the server produced at the time.

use std::process;

use brawl_security::{PatternDetector, ResultValidator, SecurityConfig};
use brawl_shared::{GameResult, GameSession};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Submission {
    session: GameSession,
    result: GameResult,
    submitted_at: u64,
}

/// First argument that is neither a flag nor the value of `--config`.
fn submission_path(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            rest.next();
        } else if !arg.starts_with("--") {
            return Some(arg.as_str());
        }
    }
    None
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         BRAWL RESULT AUDITOR                                     ║");
    println!("║         THE REFEREE'S NOTEBOOK                                   ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();

    let Some(submission_path) = submission_path(&args) else {
        println!("Usage: result_auditor <submission.json>");
        println!();
        println!("Options:");
        println!("  --config <policy.toml>  Validate under a custom policy");
        println!("  --verbose               Show debug logs and timing evidence");
        return;
    };

    let verbose = args.iter().any(|a| a == "--verbose");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1));

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match config_path {
        Some(path) => match SecurityConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                println!("Error: {e}");
                process::exit(1);
            }
        },
        None => SecurityConfig::default(),
    };

    println!("Loading submission: {submission_path}");

    let submission: Submission = match std::fs::read_to_string(submission_path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(submission) => submission,
        Err(e) => {
            println!("Error: Could not load submission: {e}");
            process::exit(1);
        }
    };

    let session = &submission.session;
    let result = &submission.result;
    let elapsed_ms = submission.submitted_at.saturating_sub(session.start_time);

    println!();
    println!("┌─ SUBMISSION ─────────────────────────────────────────────────────┐");
    println!("│ Session:            {}", session.session_id);
    println!("│ Player:             {}", session.player_address);
    println!("│ Mode:               {}", session.game_mode);
    println!("│ Elapsed:            {:.1} seconds", elapsed_ms as f64 / 1_000.0);
    println!("│ Claimed Score:      {}", result.score);
    println!("│ Kills:              {}", result.kills);
    println!("│ Accuracy:           {:.1}%", result.accuracy * 100.0);
    println!("│ Events:             {}", result.game_events.len());
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let validator = ResultValidator::new(config.validator.clone());
    let detector = PatternDetector::new((&config.validator).into());
    let patterns = detector.analyze(&result.game_events);
    let verdict = validator.validate(result, session, submission.submitted_at);

    println!("┌─ ANALYSIS RESULTS ───────────────────────────────────────────────┐");
    println!("│ Score Bound:        {}", validator.max_score_for(elapsed_ms));
    println!("│ Pattern Signals:    {}", patterns.count());

    if !patterns.is_clean() {
        println!("│");
        println!("│ SIGNALS:");
        for report in &patterns.signals {
            println!(
                "│  - {:?} (confidence: {:.0}%)",
                report.signal,
                report.confidence * 100.0
            );
            println!("│    {}", report.description);
            if verbose {
                println!("│    intervals: {:?}", report.evidence.intervals);
            }
        }
    }

    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    match (&verdict.reason, &verdict.signature) {
        (None, Some(signature)) => {
            println!("✓ Accepted: score {} (signature {signature})", verdict.score);
        }
        (Some(reason), _) => {
            println!("✗ Rejected: {reason}");
        }
        (None, None) => {
            println!("⚠ Verdict carries neither reason nor signature");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        std::iter::once("result_auditor")
            .chain(raw.iter().copied())
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_path_after_flags() {
        assert_eq!(submission_path(&args(&["--verbose", "sub.json"])), Some("sub.json"));
        assert_eq!(
            submission_path(&args(&["--config", "policy.toml", "sub.json", "--verbose"])),
            Some("sub.json")
        );
        assert_eq!(
            submission_path(&args(&["sub.json", "--config", "policy.toml"])),
            Some("sub.json")
        );
    }

    #[test]
    fn test_no_path() {
        assert_eq!(submission_path(&args(&[])), None);
        assert_eq!(submission_path(&args(&["--verbose", "--config", "policy.toml"])), None);
    }
}
