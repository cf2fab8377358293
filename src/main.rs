use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use product_importer::cli::{self, Cli, Command, RunArgs};
use product_importer::export::{issue_log, product_csv::CsvRowSink, template};
use product_importer::history::ImportHistory;
use product_importer::models::Severity;
use product_importer::runner::mapped_field_keys;
use product_importer::util::envfile::load_dotenv_if_present;
use product_importer::validation;
use product_importer::wizard::ImportWizard;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    load_dotenv_if_present()?;
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_import(args).await,
        Command::Template { path } => {
            let target = path.unwrap_or_else(|| Path::new(".").to_path_buf());
            let written = template::write_template(&target)?;
            info!("Template written to {}", written.display());
            Ok(())
        }
        Command::History { history } => {
            let history = ImportHistory::load(&history)?;
            if history.is_empty() {
                println!("No hay importaciones registradas");
                return Ok(());
            }
            for job in history.jobs() {
                println!(
                    "{}  {}  {:<9}  {:>3}%  {} ok / {} con errores / {} total",
                    job.created_at.format("%Y-%m-%d %H:%M:%S"),
                    job.file_name,
                    job.status.as_str(),
                    job.progress,
                    job.success_rows,
                    job.error_rows,
                    job.total_rows
                );
            }
            Ok(())
        }
    }
}

async fn run_import(args: RunArgs) -> Result<()> {
    let config = args.to_config()?;
    let history_path = args.history.clone();
    let history =
        ImportHistory::load(&history_path).context("Failed to load import history")?;
    let mut wizard = ImportWizard::with_history(config, history);

    wizard
        .select_file(&args.input, args.mime.as_deref())
        .with_context(|| format!("Failed to accept {}", args.input.display()))?;

    for raw in &args.map {
        let (column, field) = cli::parse_map_override(raw)?;
        wizard.map_column(column, field)?;
    }
    for column in &args.unmap {
        wizard.unmap_column(column)?;
    }
    for mapping in wizard.mappings() {
        match &mapping.target_field {
            Some(field) => info!("Column {:?} -> {}", mapping.source_column, field),
            None => info!("Column {:?} not mapped", mapping.source_column),
        }
    }

    let issues = wizard.run_validation()?.to_vec();
    for issue in &issues {
        match issue.severity {
            Severity::Error => warn!(
                "row {} [{}] {:?}: {}",
                issue.row, issue.column, issue.value, issue.message
            ),
            Severity::Warning => info!(
                "row {} [{}] {:?}: {}",
                issue.row, issue.column, issue.value, issue.message
            ),
        }
    }
    if let Some(issues_path) = &args.issues {
        issue_log::export_issues_csv(issues_path, &issues)
            .context("Failed to write issue log")?;
        info!("Issue log written to {}", issues_path.display());
    }
    let errors = validation::error_count(&issues);
    if errors > 0 {
        anyhow::bail!(
            "{} blocking errors; fix the file or the mappings and retry",
            errors
        );
    }

    let sink = CsvRowSink::create(&args.out, mapped_field_keys(wizard.mappings()))
        .context("Failed to create output file")?;
    let handle = wizard.start_import(Box::new(sink))?;
    handle.await.context("processing task panicked")?;

    let finished = wizard.current_job().context("job disappeared")?;
    info!(
        "Import {}: {} of {} rows imported ({} rows with errors)",
        finished.status.as_str(),
        finished.success_rows,
        finished.total_rows,
        finished.error_rows
    );

    wizard
        .history()
        .save(&history_path)
        .context("Failed to save import history")?;
    info!("Output written to {}", args.out.display());
    Ok(())
}
