use anyhow::Result;
use civdraft_engine::{Age, DraftEntity};
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use crate::draft::DraftPreview;
use crate::runner::ScenarioResult;

#[allow(clippy::cast_precision_loss)]
fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (passed as f64 / results.len() as f64) * 100.0
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Draft Scenario Results".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{status} {} (seed {})",
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(results)?)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    writeln!(out, "# Civdraft Scenario Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {} (seed `{}`)\n", result.scenario_name, result.seed)?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn names<T: DraftEntity>(entries: &[T]) -> String {
    if entries.is_empty() {
        return "-".to_string();
    }
    entries
        .iter()
        .map(|entry| entry.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn write_preview_console<W: Write + ?Sized>(
    out: &mut W,
    previews: &[DraftPreview],
) -> Result<()> {
    for preview in previews {
        writeln!(
            out,
            "{} {} [{}]",
            "🎲 Seed".bright_cyan().bold(),
            preview.seed.bold(),
            preview.fingerprint
        )?;
        writeln!(out, "   {}", preview.leaders_status)?;
        writeln!(out, "   {}", preview.civs_status)?;
        for player in &preview.state.players {
            let marker = player.selected_leader_id.as_deref().unwrap_or("-");
            writeln!(out, "   {} (selected: {marker})", player.name.bright_white())?;
            writeln!(out, "     Leaders: {}", names(&player.drafted_leaders))?;
            for age in Age::ALL {
                if player.drafted_civs_by_age.contains_key(&age) {
                    writeln!(out, "     {age}: {}", names(player.drafted_civs(age)))?;
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_preview_json<W: Write + ?Sized>(out: &mut W, previews: &[DraftPreview]) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(previews)?)?;
    Ok(())
}

pub fn write_preview_markdown<W: Write + ?Sized>(
    out: &mut W,
    previews: &[DraftPreview],
) -> Result<()> {
    writeln!(out, "# Civdraft Draft Preview\n")?;
    for preview in previews {
        writeln!(out, "## Seed `{}`\n", preview.seed)?;
        writeln!(out, "- **Fingerprint**: `{}`", preview.fingerprint)?;
        writeln!(
            out,
            "- **Leaders**: {} ({} per player, duplicates {}, {} banned)",
            preview.leaders_status,
            preview.leader_summary.leaders_per_player,
            preview.leader_summary.duplicates,
            preview.leader_summary.banned_count
        )?;
        writeln!(
            out,
            "- **Civilizations**: {} (ages {}, {} per age, duplicates {}, {} banned)\n",
            preview.civs_status,
            preview.civ_summary.ages,
            preview.civ_summary.civs_per_age,
            preview.civ_summary.duplicates,
            preview.civ_summary.banned_count
        )?;
        writeln!(out, "| Player | Leaders | Antiquity | Exploration | Modern |")?;
        writeln!(out, "|---|---|---|---|---|")?;
        for player in &preview.state.players {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                player.name,
                names(&player.drafted_leaders),
                names(player.drafted_civs(Age::Antiquity)),
                names(player.drafted_civs(Age::Exploration)),
                names(player.drafted_civs(Age::Modern))
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}
