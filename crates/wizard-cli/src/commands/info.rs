use crate::cli::InfoArgs;
use crate::error::Result;
use mdwizard::workflows;

pub fn run(args: InfoArgs) -> Result<()> {
    let frames = workflows::structure::read_frames(&args.input)?;

    println!("{}: {} frame(s)", args.input.display(), frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let pbc: String = frame
            .pbc()
            .iter()
            .map(|&p| if p { 'T' } else { 'F' })
            .collect();
        println!(
            "  [{}] {} atoms  {}  pbc={}  volume={:.4}",
            i,
            frame.len(),
            frame.formula(),
            pbc,
            frame.cell().determinant().abs()
        );
    }
    Ok(())
}
