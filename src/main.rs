//! Job tailor: scrape fresh postings and tailor a résumé for each match

use clap::Parser;
use job_tailor::cli::{self, Cli, Commands, ConfigAction};
use job_tailor::pipeline::{collect_titles, evaluate_titles, Pipeline, TailorOptions};
use job_tailor::{Config, JobTailorError, Result};
use log::{error, info};
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // Load configuration
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Run {
            max_cvs,
            hours_old,
            skip_pdf,
        } => {
            if let Some(hours) = hours_old {
                config.search.hours_old = hours;
            }
            let options = TailorOptions {
                max_cvs: max_cvs.unwrap_or(config.output.max_cvs),
                skip_pdf,
            };
            info!("Starting full pipeline");
            Pipeline::new(config).run(options).await?;
        }

        Commands::Scrape { hours_old } => {
            if let Some(hours) = hours_old {
                config.search.hours_old = hours;
            }
            let timestamp = job_tailor::output::storage::timestamp();
            let (jobs, path) = Pipeline::new(config).scrape(&timestamp).await?;
            println!("✅ Scraped {} jobs into {}", jobs.len(), path.display());
        }

        Commands::Filter { titles, file, inline } => {
            let titles = collect_titles(titles, file.as_deref())?;
            let pipeline = Pipeline::new(config);
            let filter = pipeline.title_filter(inline)?;

            let verdicts = evaluate_titles(&filter, &titles);
            for (title, verdict) in &verdicts {
                let mark = if verdict.is_accepted() { "✓" } else { "✗" };
                println!("{} {}: {}", mark, title, verdict);
            }
            let accepted = verdicts.iter().filter(|(_, v)| v.is_accepted()).count();
            println!("\n{} of {} titles accepted", accepted, verdicts.len());
        }

        Commands::Tailor {
            jobs,
            max_cvs,
            skip_pdf,
        } => {
            cli::validate_file_extension(&jobs, &["json"])
                .map_err(|e| JobTailorError::InvalidInput(format!("Jobs file: {}", e)))?;
            let options = TailorOptions {
                max_cvs: max_cvs.unwrap_or(config.output.max_cvs),
                skip_pdf,
            };
            let results = Pipeline::new(config).tailor_saved(&jobs, options).await?;
            println!("✅ Tailored {} CVs", results.len());
        }

        Commands::Render { cv } => {
            cli::validate_file_extension(&cv, &["json"])
                .map_err(|e| JobTailorError::InvalidInput(format!("CV file: {}", e)))?;
            Pipeline::new(config).render_saved(&cv)?;
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                println!("📋 Current configuration ({}):", config_path.display());
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| JobTailorError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
            }
            ConfigAction::Reset => {
                Config::default().save_to(&config_path)?;
                println!("✅ Configuration reset to defaults: {}", config_path.display());
            }
        },
    }

    Ok(())
}
