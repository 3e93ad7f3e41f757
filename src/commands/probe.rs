//! Check that the tools each provider needs are installed

use anyhow::{Result, bail};
use declarative::{Availability, Provider};
use netinfo::{GROUP, NetInfoProvider, USER};

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let executor = super::shell();
    let mut missing = 0;

    if !ctx.quiet {
        ui::header("Providers");
    }

    for provider_type in [&USER, &GROUP] {
        let provider = NetInfoProvider::new(provider_type, executor.clone());
        match provider.probe()? {
            Availability::Available => {
                if !ctx.quiet {
                    ui::success(format!("{} available", provider_type.name));
                }
            }
            Availability::Unavailable { missing: tool } => {
                missing += 1;
                ui::warn(format!("{} unavailable: `{tool}` not found", provider_type.name));
            }
        }
    }

    if missing > 0 {
        bail!("{missing} provider(s) unavailable");
    }
    Ok(())
}
