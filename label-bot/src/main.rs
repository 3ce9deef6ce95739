use clap::Parser;
use label_bot::{DEFAULT_COMMENT, DEFAULT_LABEL, DEFAULT_REPO, LabelAll, Repository};
use log::error;
use secrecy::SecretString;

#[derive(clap::Parser)]
#[command(
    name = "label-bot",
    about = "Label every open pull request of a repository"
)]
struct Args {
    /// Apply the proposed changes to GitHub
    #[arg(long)]
    live: bool,

    /// Only print the plan, without even pretending to apply it
    #[arg(long)]
    only_print_plan: bool,

    /// Repository whose open pull requests get labeled
    #[arg(long, default_value = DEFAULT_REPO)]
    repo: Repository,

    /// Label to add
    #[arg(long, default_value = DEFAULT_LABEL)]
    label: String,

    /// Comment explaining the label
    #[arg(long, default_value = DEFAULT_COMMENT)]
    comment: String,

    /// Authentication token with GitHub
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,
}

fn app() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = LabelAll {
        repo: args.repo,
        label: args.label,
        comment: args.comment,
    };
    label_bot::run_label_all(
        SecretString::from(args.github_token),
        &config,
        !args.live,
        args.only_print_plan,
    )
}

fn main() {
    init_log();
    if let Err(err) = app() {
        error!("{}", err);
        for cause in err.chain().skip(1) {
            error!("caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

fn init_log() {
    let mut env = env_logger::Builder::new();
    env.filter_module("label_bot", log::LevelFilter::Info);
    if let Ok(content) = std::env::var("RUST_LOG") {
        env.parse_filters(&content);
    }
    env.init();
}
