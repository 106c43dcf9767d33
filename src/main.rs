use {
    blocks::{
        cube::{self, CubeError},
        report::Report,
        rotation::RotationGroup,
        solver::Solver,
    },
    thiserror::Error,
};

#[derive(Error, Debug)]
enum CliError {
    #[error("Error parsing arguments: {0}")]
    Args(#[from] pico_args::Error),
    #[error("Error parsing cubes: {0}")]
    Cube(#[from] CubeError),
    #[error("Error building thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn main() {
    pretty_env_logger::init();

    if let Err(err) = main_inner() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn main_inner() -> Result<(), CliError> {
    let mut args = pico_args::Arguments::from_env();
    let json = args.contains("--json");
    let parallel = args.contains("--parallel");
    let num_threads: Option<usize> = args.opt_value_from_str("--threads")?;

    let free = args
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>();

    let cubes = if free.is_empty() {
        cube::sources()?
    } else {
        cube::parse_cubes(free.as_slice())?
    };

    if let Some(num_threads) = num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }

    let group = RotationGroup::generate();
    let solver = Solver::new(cubes, &group);

    let solutions = if parallel {
        solver.solve_par()
    } else {
        solver.solve()
    };

    let report = Report::new(&solutions, &group);

    if json {
        println!("{}", report.to_json());
    } else {
        print!("{report}");
    }

    Ok(())
}
