use crate::cli::GroupArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use mdwizard::core::models::group::Group;
use mdwizard::workflows;
use tracing::info;

pub fn run(args: GroupArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let bbox = partial_config.merge_group(&args)?;
    info!("Grouping frame {} against box {:?} .. {:?}", args.frame, bbox.min, bbox.max);

    let frame = workflows::structure::write_grouped(&args.input, &args.output, args.frame, &bbox)?;

    let groups = frame.groups().unwrap_or_default();
    let count = |group: Group| groups.iter().filter(|&&g| g == group).count();
    println!(
        "Grouped {} atoms: {} below min, {} above max, {} inside",
        frame.len(),
        count(Group::BelowMin),
        count(Group::AboveMax),
        count(Group::Inside)
    );
    println!("Written to: {}", args.output.display());
    Ok(())
}
