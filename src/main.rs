use std::{env,
          error::Error,
          process};

use frontier_lib::error::FrontierError;
use frontier_lib::frontier::{problem::{FrontierProblem, FrontierSettings},
                             strategy::StrategyKind};

const USAGE: &str = "Usage: frontier_cli [--graphs <dir>] (--settings <file> | --graph <name> --strategy <name> \
[--source <vertex>] [--goal <vertex>] [--heuristic <file>] [--forest])";

/// Command line configuration
struct CliArgs {
    graphs_path: String,
    settings: FrontierSettings,
}

/// Parse command line arguments into problem settings
fn parse_args(args: &[String]) -> Result<CliArgs, Box<dyn Error>> {
    let mut graphs_path = "data/".to_string();
    let mut settings_path = None;
    let mut settings = FrontierSettings::new("", "", 0);

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--forest" {
            settings.forest = true;
            i += 1;
            continue;
        }

        let value = args.get(i + 1)
            .ok_or_else(|| format!("Missing value for argument: {}", flag))?;
        match flag {
            "--graphs" => graphs_path = value.clone(),
            "--settings" => settings_path = Some(value.clone()),
            "--graph" => settings.graph_name = value.clone(),
            "--strategy" => settings.strategy_name = value.clone(),
            "--source" => settings.source = value.parse()
                .map_err(|err| format!("Invalid argument: source: {}", err))?,
            "--goal" => settings.goal = Some(value.parse()
                .map_err(|err| format!("Invalid argument: goal: {}", err))?),
            "--heuristic" => settings.heuristic_path = Some(value.clone()),
            _ => return Err(format!("Unknown argument: {}\n{}", flag, USAGE).into())
        }
        i += 2;
    }

    if let Some(path) = settings_path {
        settings = FrontierSettings::from_file(&path)?;
    }
    if settings.graph_name.is_empty() {
        return Err(format!("Missing required argument: --graph\n{}", USAGE).into());
    }
    if settings.strategy_name.is_empty() {
        return Err(format!("Missing required argument: --strategy (one of {:?})\n{}",
                           StrategyKind::available_strategies(), USAGE).into());
    }

    Ok(CliArgs {
        graphs_path,
        settings,
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<_> = env::args().collect();
    let cli = parse_args(&args)?;

    let graphs = frontier_lib::load_graphs(&cli.graphs_path)?;
    let graph = graphs.get(&cli.settings.graph_name)
        .ok_or_else(|| FrontierError::BadSettings {
            message: format!("No such graph '{}' in '{}'", cli.settings.graph_name, cli.graphs_path)
        })?;

    let problem = FrontierProblem::new(graph.clone(), cli.settings)?;
    log::info!("Running {} with the following problem settings: {:?}", problem.strategy(), problem.settings());
    let response = problem.solve()?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn main() {
    // Initialize logger
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{}", err);
        process::exit(1);
    }
}
