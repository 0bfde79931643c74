use crate::cli::NeighborArgs;
use crate::error::Result;
use mdwizard::engine::error::EngineError;
use mdwizard::engine::neighbors::neighbor_shells;
use mdwizard::workflows;

pub fn run(args: NeighborArgs) -> Result<()> {
    let frame = workflows::structure::read_frame(&args.input, args.frame)?;
    let shells = neighbor_shells(&frame, args.atom, args.cutoff).map_err(EngineError::from)?;

    match shells.shell(args.nth).and_then(|shell| shell.first()) {
        Some(&(index, distance)) => println!(
            "Neighbor {} of atom {}: atom {} ({}) at {:.6} A",
            args.nth,
            args.atom,
            index,
            frame.species()[index],
            distance
        ),
        None => println!(
            "Atom {} has only {} neighbor shell(s) within {} A",
            args.atom,
            shells.len(),
            args.cutoff
        ),
    }
    Ok(())
}
