use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use taskflow_core::error::CoreError;
use taskflow_core::generator::InstanceGenerator;
use taskflow_core::models::{TaskStatus, TemplateStatus};
use taskflow_core::repository::{JsonRepository, MaterializationRepository};
use tracing::{debug, info};

mod cli;
mod commands;
mod config;
mod logging;
mod parser;
mod timezone;
mod util;
mod views;

use cli::Commands;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let config = config::Config::new().context("Failed to load configuration")?;

    let today = match cli.today.as_deref() {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid --today '{}', expected YYYY-MM-DD", date))?,
        None => timezone::today_in(config.timezone()?),
    };

    let data_file = config.data_file();
    debug!(path = %data_file.display(), %today, "opening task store");
    let generator = InstanceGenerator::new(config.generation_policy());
    let repository = JsonRepository::open(&data_file, generator)
        .await
        .with_context(|| format!("Failed to open {}", data_file.display()))?;

    // Every command sees templates expanded up to today, except the ones that
    // move the raw collection or report on generation themselves
    let materialize_on_load = !matches!(
        cli.command,
        Commands::Export(_) | Commands::Import(_) | Commands::Generate
    );
    if materialize_on_load {
        let summary = repository.materialize(today).await?;
        if summary.instances_created() > 0 {
            info!(created = summary.instances_created(), "generated instances on load");
        }
    }

    match cli.command {
        Commands::Add(command) => commands::add::add_task(&repository, command, &config, today).await,
        Commands::List(command) => commands::list::list_tasks(&repository, command, today).await,
        Commands::Show(command) => commands::show::show_task(&repository, command, today).await,
        Commands::Edit(command) => commands::edit::edit_task(&repository, command, today).await,
        Commands::Done(command) => {
            commands::status::set_status(&repository, command, TaskStatus::Closed).await
        }
        Commands::Start(command) => {
            commands::status::set_status(&repository, command, TaskStatus::InProgress).await
        }
        Commands::Reopen(command) => {
            commands::status::set_status(&repository, command, TaskStatus::Assigned).await
        }
        Commands::Pause(command) => {
            commands::recurrence::set_template_status(&repository, command, TemplateStatus::Inactive, today)
                .await
        }
        Commands::Resume(command) => {
            commands::recurrence::set_template_status(&repository, command, TemplateStatus::Active, today)
                .await
        }
        Commands::Delete(command) => commands::delete::delete_task(&repository, command).await,
        Commands::Generate => commands::recurrence::generate(&repository, today).await,
        Commands::Preview(command) => commands::recurrence::preview(&repository, command, today).await,
        Commands::Stats => commands::stats::show_stats(&repository, today).await,
        Commands::Export(command) => commands::transfer::export_tasks(&repository, command).await,
        Commands::Import(command) => commands::transfer::import_tasks(&repository, command).await,
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, subject) in tasks {
                    eprintln!("  {} ({})", id.yellow(), subject);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRecurrence(s) => {
                eprintln!("{} Invalid recurrence: {}", "Error:".style(error_style), s.yellow());
            }
            CoreError::NotATemplate(id) => {
                eprintln!(
                    "{} '{}' is not a recurring template",
                    "Error:".style(error_style),
                    id.yellow()
                );
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
