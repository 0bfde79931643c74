use crate::cli::PkaArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use mdwizard::workflows;
use tracing::info;

pub fn run(args: PkaArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let job = partial_config.merge_pka(&args)?;

    let report = workflows::pka::run(&args.input, &job.output, &job.settings, job.emit_group)?;

    let v = report.pka_velocity;
    let before = report.momentum_before;
    let after = report.momentum_after;
    println!("PKA velocity (atom {}): {:.8e} {:.8e} {:.8e}", job.settings.target_atom, v.x, v.y, v.z);
    println!("Total momentum before: {:.8e} {:.8e} {:.8e}", before.x, before.y, before.z);
    println!("Total momentum after:  {:.8e} {:.8e} {:.8e}", after.x, after.y, after.z);
    println!("Written to: {}", job.output.display());
    Ok(())
}
