#[macro_use]
extern crate log;

use std::{fmt, error::Error};
use optadj::{YamlScript, Method, Logger, AdjError};

#[derive(Debug)]
struct AdjustError(String);

impl fmt::Display for AdjustError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Error for AdjustError {}

#[derive(Debug)]
struct App {
    name:        String,
    log_dir:     Option<String>,
    verbosity:   u32,
    script_path: Option<String>,
}

impl App {
    fn new<S: AsRef<str>>(name: S) -> Result<Self, Box<dyn Error>> {
        let name = name.as_ref().into();
        let mut log_dir = None;
        let mut verbosity = 0;
        let mut script_path = None;

        for (prev_arg, next_arg) in std::env::args().zip(std::env::args().skip(1)) {
            match next_arg.as_str() {
                "-v" => verbosity += 1,
                "-vv" => verbosity += 2,
                "-vvv" => verbosity += 3,
                "--log-dir" => {}
                arg => {
                    if arg.starts_with('-') {
                        return Err(Box::new(AdjustError(format!("Invalid CLI option \"{}\"", arg))))
                    } else if prev_arg == "--log-dir" {
                        log_dir = Some(arg.into());
                    } else if script_path.is_none() {
                        script_path = Some(arg.into());
                    } else {
                        let msg = format!("Unexpected argument \"{}\"", arg);

                        return Err(Box::new(AdjustError(msg)))
                    }
                }
            }
        }

        Ok(App { name, log_dir, verbosity, script_path })
    }
}

fn run(app: &App) -> Result<(), Box<dyn Error>> {
    let path = app
        .script_path
        .as_ref()
        .ok_or_else(|| AdjustError("Missing path to a YAML script".to_owned()))?;

    let script = YamlScript::from_file(path)?;
    let graph = script.get_graph();

    info!(
        "Causal graph {} with {} nodes",
        script.get_name().unwrap_or("<anonymous>"),
        graph.num_nodes()
    );

    for (i, query) in script.get_queries().iter().enumerate() {
        println!(
            "{}. Effect of {} on {}, L = {}, N = {}",
            i + 1,
            graph.show_nodes(&Some(query.treatment).into_iter().collect()),
            graph.show_nodes(&Some(query.outcome).into_iter().collect()),
            graph.show_nodes(&query.forced),
            graph.show_nodes(&query.eligible),
        );

        for &method in Method::all().iter() {
            match query.run(graph, method) {
                Ok(result) => println!("\t{}: {}", method, graph.show_nodes(&result)),
                Err(err @ AdjError::ConditionNotMet) | Err(err @ AdjError::NoAdjustment) => {
                    println!("\t{}: {}", method, err)
                }
                Err(err) => return Err(Box::new(err)),
            }
        }
    }

    Ok(())
}

fn setup_logger(app: &App, level: log::LevelFilter) -> Result<(), Box<dyn Error>> {
    let mut logger = Logger::new(level);

    if let Some(ref log_dir) = app.log_dir {
        logger = logger.with_log_file(log_dir, format!("{}.log", app.name.to_lowercase()))?;
    }

    logger.apply()
}

fn main() {
    let app = match App::new("Adjust") {
        Ok(app) => app,
        Err(err) => {
            eprintln!("[ERROR] {}.", err);
            std::process::exit(-1)
        }
    };

    let log_level = match app.verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Err(err) = setup_logger(&app, log_level) {
        eprintln!("[ERROR] {}.", err);
        std::process::exit(-1)
    }

    if let Err(err) = run(&app) {
        error!("{}", err);
        std::process::exit(-1)
    }
}
