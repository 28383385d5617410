use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use edupulse::aggregate::Aggregation;
use edupulse::config::Config;
use edupulse::dashboard::{self, Screen};
use edupulse::export;
use edupulse::filter::{self, FilterSelection, SectionFilter};
use edupulse::generator::{self, GenerationPolicy};
use edupulse::logging;
use edupulse::models::Dataset;
use edupulse::report;
use edupulse::session::Session;
use edupulse::store::DatasetStore;

#[derive(Parser)]
#[command(name = "edupulse")]
#[command(about = "Faculty performance analytics over a synthetic student dataset", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./.edupulse.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Load records from an exported CSV instead of generating them
    #[arg(long)]
    dataset: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, allow_negative_numbers = true)]
    count: Option<i64>,
    #[arg(long, value_enum)]
    policy: Option<GenerationPolicy>,
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    passphrase: String,
}

#[derive(Args)]
struct FilterArgs {
    /// Teacher to include; repeat for several. Defaults to every teacher.
    #[arg(long = "teacher")]
    teachers: Vec<String>,
    /// Section name or "all"
    #[arg(long, default_value = "all")]
    section: SectionFilter,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the dataset and write it as CSV
    Generate {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Log in and list the teachers present in the dataset
    Teachers {
        #[command(flatten)]
        login: LoginArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Log in and render every dashboard view
    Dashboard {
        #[command(flatten)]
        login: LoginArgs,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
        /// Teacher for the faculty deep-dive panel
        #[arg(long)]
        focus: Option<String>,
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,
        /// Write the output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Log in and show one teacher's profile under the given filter
    Profile {
        teacher: String,
        #[command(flatten)]
        login: LoginArgs,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

fn load_dataset(config: &Config, source: &SourceArgs) -> anyhow::Result<Dataset> {
    if let Some(path) = source.dataset.as_ref().or(config.dataset_path.as_ref()) {
        return DatasetStore::load_file(path)
            .with_context(|| format!("failed to load dataset from {}", path.display()));
    }

    let mut key = config.generation_key();
    key.seed = source.seed.unwrap_or(key.seed);
    key.count = source.count.unwrap_or(key.count);
    key.policy = source.policy.unwrap_or(key.policy);
    generator::checked_count(key.count).context("invalid --count")?;

    let mut store = DatasetStore::global()
        .lock()
        .map_err(|_| anyhow::anyhow!("dataset store lock poisoned"))?;
    let dataset = store
        .get_or_generate(key)
        .context("failed to generate dataset")?;
    Ok(dataset)
}

fn selection_for(dataset: &Dataset, filters: &FilterArgs) -> FilterSelection {
    if filters.teachers.is_empty() {
        FilterSelection {
            section: filters.section.clone(),
            ..FilterSelection::all(dataset)
        }
    } else {
        FilterSelection::new(filters.teachers.iter().cloned(), filters.section.clone())
    }
}

fn login(config: &Config, args: &LoginArgs) -> anyhow::Result<Session> {
    let mut session = Session::start();
    if !session.authenticate(&args.username, &args.passphrase, &config.credentials) {
        anyhow::bail!("Invalid Key");
    }
    Ok(session)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose, cli.quiet);

    let config = Config::load_or_default(cli.config.as_deref())?;
    logging::log_config_info(&config);

    match cli.command {
        Commands::Generate { source, out } => {
            let dataset = load_dataset(&config, &source)?;
            let out = out.unwrap_or_else(|| config.export_path.clone());
            export::export_csv(&out, &dataset)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Wrote {} records to {}.", dataset.len(), out.display());
        }
        Commands::Teachers {
            login: login_args,
            source,
        } => {
            let mut session = login(&config, &login_args)?;
            let dataset = load_dataset(&config, &source)?;
            let agg = Aggregation::new(&dataset);
            for teacher in agg.distinct_teachers() {
                println!("{teacher}");
            }
            session.logout();
        }
        Commands::Dashboard {
            login: login_args,
            source,
            filters,
            focus,
            format,
            out,
        } => {
            let mut session = login(&config, &login_args)?;
            let dataset = load_dataset(&config, &source)?;
            let selection = selection_for(&dataset, &filters);

            let view = match dashboard::render(&session, &dataset, &selection, focus.as_deref()) {
                Screen::Dashboard(view) => view,
                Screen::Login => anyhow::bail!("Invalid Key"),
            };
            let rendered = match format {
                OutputFormat::Markdown => report::build_report(&view, chrono::Utc::now()),
                OutputFormat::Json => serde_json::to_string_pretty(&view)?,
            };

            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Dashboard written to {}.", path.display());
                }
                None => println!("{rendered}"),
            }
            session.logout();
        }
        Commands::Profile {
            teacher,
            login: login_args,
            source,
            filters,
        } => {
            let mut session = login(&config, &login_args)?;
            let dataset = load_dataset(&config, &source)?;
            let selection = selection_for(&dataset, &filters);
            let filtered = filter::filter(&dataset, &selection);

            match Aggregation::new(&filtered).individual_profile(&teacher) {
                Ok(profile) => {
                    println!("Profile Analysis: {}", profile.teacher);
                    println!("Records: {}", profile.record_count);
                    println!("Avg Score: {:.1}", profile.mean_score);
                    println!("Avg Late: {:.1}", profile.mean_late_count);
                    println!("Avg Feedback: {:.2}", profile.mean_feedback);
                    println!("Satisfaction: {}", "★".repeat(profile.satisfaction_stars() as usize));
                }
                Err(err) => println!("No profile available. {err}"),
            }
            session.logout();
        }
    }

    Ok(())
}
