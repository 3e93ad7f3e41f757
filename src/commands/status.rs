//! Show current values vs desired values

use anyhow::{Result, bail};

use crate::Context;
use crate::cli::StatusArgs;
use crate::engine::{self, differ};
use crate::ui;

pub fn run(ctx: &Context, args: &StatusArgs) -> Result<()> {
    let config = super::load_config(ctx)?;
    let executor = super::shell();
    let mut targets = super::select_targets(&config, &executor, args.target.as_deref())?;

    if !ctx.quiet {
        ui::header(&format!("Status ({} resources)", targets.len()));
    }

    let jobs = args.jobs.unwrap_or(config.jobs);
    let mut diffs = Vec::new();
    let mut failed = 0;
    let results = engine::inspect_all(&mut targets, jobs)?;
    for (target, result) in targets.iter().zip(results) {
        match result {
            Ok(diff) => diffs.push(diff),
            Err(e) => {
                failed += 1;
                ui::error(format!("{}: {e}", target.managed().resource()));
            }
        }
    }

    if ctx.verbose > 0 {
        for diff in &diffs {
            ui::resource_state(&diff.resource, diff.exists);
            for property in diff.properties.iter().filter(|p| p.in_sync) {
                ui::dim(format!("{} = {}", property.property, property.is));
            }
        }
    }

    differ::display_diff(&diffs);

    if failed > 0 {
        bail!("{failed} resource(s) could not be inspected");
    }
    Ok(())
}
