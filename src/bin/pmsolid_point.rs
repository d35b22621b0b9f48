use pmsolid::base::{ParamSolid, Settings};
use pmsolid::material::{LoadingPath, StressStrain};
use pmsolid::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "pmsolid_point",
    about = "Runs a material-point simulation along a strain path given in a JSON file"
)]
struct Options {
    /// JSON file with the settings, the material parameters, and the loading path
    input: String,

    /// Prints the states as JSON (one line per increment) instead of a table
    #[structopt(long)]
    json: bool,
}

/// Holds the contents of the input file
#[derive(Deserialize)]
struct Input {
    #[serde(default)]
    settings: Settings,
    param: ParamSolid,
    path: LoadingPath,
}

fn main() -> Result<()> {
    // parse options
    let options = Options::from_args();

    // load data
    let file = File::open(&options.input)?;
    let input: Input = serde_json::from_reader(BufReader::new(file))?;
    let model = StressStrain::new(&input.param, &input.settings)?;

    // run
    let points = input.path.follow(&model)?;

    // results
    if options.json {
        for point in &points {
            println!("{}", serde_json::to_string(&point.state)?);
        }
        return Ok(());
    }
    println!(
        "{:>10} {:>10} {:>13} {:>13} {:>13} {:>13} {:>13} {:>4}",
        "time", "T", "εxx", "σxx", "σyy", "σvm", "ε̄ inel", "it"
    );
    for point in &points {
        let s = &point.state;
        println!(
            "{:>10.4} {:>10.2} {:>13.6e} {:>13.6e} {:>13.6e} {:>13.6e} {:>13.6e} {:>4}",
            point.time,
            point.temperature,
            s.total_strain.get(0, 0),
            s.stress.get(0, 0),
            s.stress.get(1, 1),
            s.stress.von_mises(),
            s.effective_inelastic_strain,
            point.output.iterations
        );
    }
    Ok(())
}
