use crate::cli::RmseArgs;
use crate::error::Result;
use mdwizard::workflows;

pub fn run(args: RmseArgs) -> Result<()> {
    let rmse = workflows::training::run(&args.dir)?;

    println!("Energy RMSE: {:.6} eV/atom", rmse.energy);
    println!("Force RMSE:  {:.6} eV/A", rmse.force);
    match rmse.virial {
        Some(virial) => println!("Virial RMSE: {:.6} eV/atom", virial),
        None => println!("Virial RMSE: n/a (no reference virials)"),
    }
    Ok(())
}
