//! Make current values match desired values

use anyhow::{Context as AnyhowContext, Result, bail};
use colored::Colorize;
use declarative::{LogFacade, ReconcileContext};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::engine::{self, ExecuteOptions, differ, executor};
use crate::ui;

pub fn run(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let config = super::load_config(ctx)?;
    let shell = super::shell();
    let mut targets = super::select_targets(&config, &shell, args.target.as_deref())?;
    let noop = ctx.noop || config.noop;
    let jobs = args.jobs.unwrap_or(config.jobs);

    // 1. Inspect every resource; unreadable ones are not applied
    let results = engine::inspect_all(&mut targets, jobs)?;
    let mut inspect_failures = 0;
    let mut selected = Vec::new();
    let mut diffs = Vec::new();
    for (target, result) in targets.into_iter().zip(results) {
        match result {
            Ok(diff) => {
                selected.push(target);
                diffs.push(diff);
            }
            Err(e) => {
                inspect_failures += 1;
                ui::error(format!("{}: {e}", target.managed().resource()));
            }
        }
    }

    // 2. Show and plan
    if !args.json {
        differ::display_diff(&diffs);
    }
    let plans: Vec<_> = diffs.iter().map(engine::plan).collect();

    if plans.iter().all(Vec::is_empty) {
        if inspect_failures > 0 {
            bail!("{inspect_failures} resource(s) could not be inspected");
        }
        return Ok(());
    }

    // 3. Confirm (unless --yes, --json or noop)
    if !args.yes && !args.json && !noop && !confirm_proceed()? {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(());
    }

    if noop && !args.json {
        println!();
        ui::info("No-op mode - no changes will be made");
    }

    // 4. Execute
    let logger = LogFacade;
    let reconcile = ReconcileContext::new(&logger).with_noop(noop);
    let summary = engine::execute(
        &mut selected,
        &plans,
        &reconcile,
        shell.as_ref(),
        &ExecuteOptions { jobs },
    )?;

    // 5. Report
    if args.json {
        let json = serde_json::to_string_pretty(&summary.events)
            .context("Failed to serialize change events")?;
        println!("{json}");
    } else {
        if ctx.verbose > 0 {
            for event in &summary.events {
                ui::dim(format!("{}: {}", event.record.source, event.description));
            }
        }
        executor::print_summary(&summary);
    }

    let failed = summary.failed + inspect_failures;
    if failed > 0 {
        bail!("{failed} resource(s) failed");
    }
    Ok(())
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}
