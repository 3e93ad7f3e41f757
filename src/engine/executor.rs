//! Execution engine - run planned commands and report each change

use anyhow::{Context as AnyhowContext, Result, bail};
use colored::Colorize;
use declarative::{
    ChangeEvent, CommandExecutor, ManagedResource, Property, Provider, ReconcileContext, Value,
};
use rayon::prelude::*;

use super::{Step, Target};
use crate::progress;

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Number of resources processed in parallel
    pub jobs: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

/// Summary of execution results
#[derive(Debug, Default)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
    /// Every reported change, in resource order
    pub events: Vec<ChangeEvent>,
    /// One line per failed step
    pub failures: Vec<String>,
}

impl ExecuteSummary {
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Per-resource result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplyResult {
    NoChange,
    Created,
    Modified,
    Removed,
    Skipped,
    Failed,
}

#[derive(Debug)]
struct Outcome {
    result: ApplyResult,
    events: Vec<ChangeEvent>,
    failures: Vec<String>,
}

enum StepResult {
    Applied,
    Noop,
}

/// Execute plans against their targets.
///
/// `plans[i]` belongs to `targets[i]`. Resources run in parallel; the
/// steps of one resource run in order, and a failed create or destroy
/// abandons the rest of that resource's steps.
pub fn execute(
    targets: &mut [Target],
    plans: &[Vec<Step>],
    ctx: &ReconcileContext,
    executor: &dyn CommandExecutor,
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    if targets.len() != plans.len() {
        bail!(
            "{} plans for {} resources",
            plans.len(),
            targets.len()
        );
    }

    let pool = super::pool(opts.jobs)?;
    let pb = progress::bar(targets.len() as u64, "Applying");

    let outcomes: Vec<Outcome> = pool.install(|| {
        targets
            .par_iter_mut()
            .zip(plans.par_iter())
            .map(|(target, steps)| {
                let outcome = apply_target(target, steps, ctx, executor);

                let symbol = match outcome.result {
                    ApplyResult::NoChange => "○",
                    ApplyResult::Created | ApplyResult::Modified | ApplyResult::Removed => "✓",
                    ApplyResult::Failed => "✗",
                    ApplyResult::Skipped => "⊘",
                };
                pb.set_message(format!("{} {}", symbol, target.managed().resource()));
                pb.inc(1);

                outcome
            })
            .collect()
    });

    pb.finish_and_clear();

    let mut summary = ExecuteSummary::default();
    for outcome in outcomes {
        merge_outcome(&mut summary, outcome);
    }
    Ok(summary)
}

fn merge_outcome(summary: &mut ExecuteSummary, outcome: Outcome) {
    match outcome.result {
        ApplyResult::NoChange => summary.no_change += 1,
        ApplyResult::Created => summary.created += 1,
        ApplyResult::Modified => summary.modified += 1,
        ApplyResult::Removed => summary.removed += 1,
        ApplyResult::Skipped => summary.skipped += 1,
        ApplyResult::Failed => summary.failed += 1,
    }
    summary.events.extend(outcome.events);
    summary.failures.extend(outcome.failures);
}

fn apply_target(
    target: &mut Target,
    steps: &[Step],
    ctx: &ReconcileContext,
    executor: &dyn CommandExecutor,
) -> Outcome {
    let mut outcome = Outcome {
        result: ApplyResult::NoChange,
        events: Vec::new(),
        failures: Vec::new(),
    };
    if steps.is_empty() {
        return outcome;
    }

    let (managed, provider) = target.parts_mut();
    let mut applied = Vec::new();

    for step in steps {
        match run_step(managed, provider, step, ctx, executor, &mut outcome.events) {
            Ok(StepResult::Applied) => applied.push(step),
            Ok(StepResult::Noop) => {}
            Err(e) => {
                log::error!("{}: {} failed: {e:#}", managed.resource(), step.describe());
                outcome
                    .failures
                    .push(format!("{}: {}: {e:#}", managed.resource(), step.describe()));
                if matches!(step, Step::Create | Step::Destroy) {
                    break;
                }
            }
        }
    }

    outcome.result = if !outcome.failures.is_empty() {
        ApplyResult::Failed
    } else if applied.contains(&&Step::Create) {
        ApplyResult::Created
    } else if applied.contains(&&Step::Destroy) {
        ApplyResult::Removed
    } else if applied.is_empty() {
        ApplyResult::Skipped
    } else {
        ApplyResult::Modified
    };
    outcome
}

fn run_step(
    managed: &mut ManagedResource,
    provider: &dyn Provider,
    step: &Step,
    ctx: &ReconcileContext,
    executor: &dyn CommandExecutor,
    events: &mut Vec<ChangeEvent>,
) -> Result<StepResult> {
    match step {
        Step::Create | Step::Destroy => {
            let created = *step == Step::Create;
            let resource = managed.resource();

            if ctx.noop || resource.noop {
                let event = ChangeEvent::ensure_would_change(resource, created);
                report_ensure(ctx, resource, &event);
                events.push(event);
                return Ok(StepResult::Noop);
            }

            let command = if created {
                provider.add_command(resource)
            } else {
                provider.delete_command(resource)
            };
            run_command(executor, &command)?;

            let event = ChangeEvent::ensure_changed(resource, created);
            report_ensure(ctx, resource, &event);
            events.push(event);
            Ok(StepResult::Applied)
        }
        Step::Modify { property } => {
            let property = managed
                .properties_mut()
                .iter_mut()
                .find(|p| p.name() == property)
                .with_context(|| format!("no property named '{property}'"))?;
            modify_property(property, provider, ctx, executor, events)
        }
    }
}

fn modify_property(
    property: &mut Property,
    provider: &dyn Provider,
    ctx: &ReconcileContext,
    executor: &dyn CommandExecutor,
    events: &mut Vec<ChangeEvent>,
) -> Result<StepResult> {
    let is = property.is().cloned().unwrap_or(Value::Absent);
    let should = property
        .should()
        .cloned()
        .with_context(|| format!("{} has no desired value", property.path()))?;

    if property.is_noop(ctx) {
        let event = ChangeEvent::would_change(property, &is, &should)?;
        report_property(property, ctx, &event)?;
        events.push(event);
        return Ok(StepResult::Noop);
    }

    let command = provider.modify_command(property)?;
    run_command(executor, &command)?;

    provider.retrieve(property)?;
    if !property.is_in_sync() {
        bail!(
            "{} still out of sync after `{command}` (is {})",
            property.path(),
            property.is().map_or_else(|| "unknown".to_string(), ToString::to_string)
        );
    }

    let event = ChangeEvent::property_changed(property, &is, &should)?;
    report_property(property, ctx, &event)?;
    events.push(event);
    Ok(StepResult::Applied)
}

fn run_command(executor: &dyn CommandExecutor, command: &str) -> Result<()> {
    log::debug!("running `{command}`");
    let output = executor.execute(command)?;
    if !output.success() {
        bail!(
            "`{command}` exited with {}: {}",
            output
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string()),
            output.stderr.trim()
        );
    }
    Ok(())
}

/// Log a property event; a resource without a log level is not an error here
fn report_property(
    property: &Property,
    ctx: &ReconcileContext,
    event: &ChangeEvent,
) -> declarative::Result<()> {
    match property.log(ctx, &event.description) {
        Err(declarative::Error::NoLogLevel { .. }) => {
            log::debug!("{}: {}", property.path(), event.description);
            Ok(())
        }
        other => other,
    }
}

fn report_ensure(ctx: &ReconcileContext, resource: &declarative::Resource, event: &ChangeEvent) {
    if resource.log_level.is_some() {
        ctx.logger.log(&event.record);
    } else {
        log::debug!("{}: {}", event.record.source, event.description);
    }
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!(
            "  {} Configuration applied successfully! ({} changes)",
            "✓".green().bold(),
            summary.total_changes()
        );
    } else {
        println!(
            "  {} Configuration applied with errors",
            "⚠".yellow().bold()
        );
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} resources modified", summary.modified);
    }
    if summary.removed > 0 {
        println!("    • {} resources removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped (noop)", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
        for failure in &summary.failures {
            println!("      {} {}", "✗".red(), failure.dimmed());
        }
    }
}
