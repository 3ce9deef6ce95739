mod data;
mod static_api;
mod validate;

use data::Data;

use anyhow::Error;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

#[derive(clap::Parser)]
#[command(name = "cockpit-testmap", about = "query the cockpit test map")]
struct Cli {
    /// Load the test map from this file instead of the built-in one
    #[arg(long, global = true)]
    testmap: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Check if the test map is correct
    Check {
        /// Skip one or more validation steps
        #[arg(long)]
        skip: Vec<String>,
    },
    /// Print all the projects we run tests for
    Projects,
    /// Print the contexts of every branch of a project
    TestsForProject { project: String },
    /// Print the qualified contexts to run when an image is refreshed
    TestsForImage { image: String },
    /// Print all the images named in the test map
    Images,
    /// Print the contexts of a project that only run when triggered manually
    ManualContexts { project: String },
    /// Generate the static API
    StaticApi { dest: PathBuf },
}

fn main() {
    let mut env = env_logger::Builder::new();
    env.format_module_path(false);
    env.filter_module("cockpit_testmap", log::LevelFilter::Info);
    if std::env::var("COCKPIT_TESTMAP_FORCE_COLORS").is_ok() {
        env.write_style(env_logger::WriteStyle::Always);
    }
    if let Ok(content) = std::env::var("RUST_LOG") {
        env.parse_filters(&content);
    }
    env.init();

    if let Err(e) = run() {
        error!("{}", e);
        for e in e.chain().skip(1) {
            error!("cause: {}", e);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    let data = Data::load(cli.testmap.as_deref())?;
    let testmap = data.testmap();
    match cli.command {
        Command::Check { skip } => {
            crate::validate::validate(
                &data,
                &skip.iter().map(|s| s.as_ref()).collect::<Vec<_>>(),
            )?;
            info!("the test map is valid");
        }
        Command::Projects => {
            for project in testmap.projects() {
                println!("{}", project);
            }
        }
        Command::TestsForProject { ref project } => {
            for (branch, contexts) in testmap.tests_for_project(project) {
                println!("{}: {}", branch, contexts.join(", "));
            }
        }
        Command::TestsForImage { ref image } => {
            for context in testmap.tests_for_image(image) {
                println!("{}", context);
            }
        }
        Command::Images => {
            for image in testmap.images() {
                println!("{}", image);
            }
        }
        Command::ManualContexts { ref project } => {
            for context in testmap.manual_contexts(project) {
                println!("{}", context);
            }
        }
        Command::StaticApi { ref dest } => {
            let generator = crate::static_api::Generator::new(dest, &data)?;
            generator.generate()?;
        }
    }

    Ok(())
}
