#![warn(missing_docs)]
//! # plagcheck binary
//!
//! Command line entry point for the plagiarism detection client.

use std::io::Read as _;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use plagcheck_app::{
    APP_VERSION, ClientSettings, DetectionClient, init_logging, project_client_status,
    render_health, render_result, render_segment_details, render_tasks,
};
use plagcheck_core::DetectionConfig;
use plagcheck_transport::HttpBackend;
use plagcheck_ui::{DetectionPhase, HealthPhase};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "plagcheck",
    version = APP_VERSION,
    about = "Client for the plagiarism detection service"
)]
struct Cli {
    /// Detection service base URL (overrides PLAGCHECK_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for downloaded reports (overrides PLAGCHECK_REPORT_DIR).
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,

    /// Log progress to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a PDF and print the detection result.
    Detect(DetectArgs),
    /// Check raw text read from a file, or from stdin with `-`.
    Text {
        /// Input path or `-`.
        input: String,
        /// Similarity threshold in 0.50..=1.00.
        #[arg(long, default_value_t = 0.75)]
        threshold: f64,
        /// Skip the web search.
        #[arg(long)]
        no_search: bool,
    },
    /// Probe service health.
    Health,
    /// Download the CSV report for a task.
    Download {
        /// Task id.
        task_id: String,
    },
    /// Show a stored result.
    Result {
        /// Task id.
        task_id: String,
        /// Threshold used for score bands.
        #[arg(long, default_value_t = 0.75)]
        threshold: f64,
        /// Print match detail per segment.
        #[arg(long)]
        details: bool,
    },
    /// List stored tasks.
    Tasks,
    /// Delete a stored task.
    Delete {
        /// Task id.
        task_id: String,
    },
}

#[derive(Debug, Args)]
struct DetectArgs {
    /// PDF document to check.
    file: PathBuf,
    /// Similarity threshold in 0.50..=1.00.
    #[arg(long, default_value_t = 0.75)]
    threshold: f64,
    /// Skip the web search.
    #[arg(long)]
    no_search: bool,
    /// Skip the local corpus.
    #[arg(long)]
    no_local_corpus: bool,
    /// Analyze only the abstract.
    #[arg(long = "abstract", conflicts_with = "chapters_only")]
    extract_abstract: bool,
    /// Analyze only a chapter range.
    #[arg(long)]
    chapters_only: bool,
    /// First chapter when `--chapters-only` is set (default 1).
    #[arg(long)]
    start_chapter: Option<u8>,
    /// Last chapter when `--chapters-only` is set (default 5).
    #[arg(long)]
    end_chapter: Option<u8>,
    /// Save the CSV report after a successful run.
    #[arg(long)]
    download: bool,
    /// Probe service health alongside the detection run.
    #[arg(long)]
    check_health: bool,
    /// Print match detail per segment.
    #[arg(long)]
    details: bool,
}

impl DetectArgs {
    fn config(&self) -> Result<DetectionConfig> {
        let mut config = DetectionConfig::default();
        config.set_threshold(self.threshold)?;
        config.set_use_search(!self.no_search);
        config.set_use_local_corpus(!self.no_local_corpus);
        config.set_chapters_only(self.chapters_only);
        config.set_extract_abstract(self.extract_abstract)?;
        if let Some(start) = self.start_chapter {
            config.set_start_chapter(start)?;
        }
        if let Some(end) = self.end_chapter {
            config.set_end_chapter(end)?;
        }
        Ok(config)
    }
}

/// CLI entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = ClientSettings::from_env(cli.api_url.as_deref())?;
    if let Some(dir) = cli.report_dir {
        settings.report_dir = dir;
    }
    debug!(
        stage = "config",
        action = "resolved",
        api_base = settings.api_base.as_str(),
        report_dir = %settings.report_dir.display(),
        "settings resolved"
    );

    let backend = HttpBackend::new(settings.api_base.clone(), settings.timeouts)?;
    let report_dir = settings.report_dir;
    let new_client = move |config: DetectionConfig| DetectionClient::new(backend, config, report_dir);

    match cli.command {
        Command::Detect(args) => {
            let config = args.config()?;
            let mut client = new_client(config);
            detect(&mut client, &args).await
        }
        Command::Text {
            input,
            threshold,
            no_search,
        } => {
            let mut config = DetectionConfig::default();
            config.set_threshold(threshold)?;
            config.set_use_search(!no_search);
            let text = read_text(&input)?;
            let mut client = new_client(config);
            client.run_text_detection(text).await?;
            print_outcome(&client, false)
        }
        Command::Health => {
            let mut client = new_client(DetectionConfig::default());
            match client.run_health_check().await {
                HealthPhase::HealthOk => {
                    if let Some(status) = client.state().health_status() {
                        println!("{}", render_health(status));
                    }
                    Ok(())
                }
                _ => bail!(
                    "{}",
                    client.state().health_error().unwrap_or("health check failed")
                ),
            }
        }
        Command::Download { task_id } => {
            let mut client = new_client(DetectionConfig::default());
            if client.load_result(&task_id).await != DetectionPhase::Completed {
                bail!(
                    "{}",
                    client.state().detection_error().unwrap_or("task lookup failed")
                );
            }
            if let Some(path) = client.download_report().await? {
                println!("Report saved to {}", path.display());
            }
            Ok(())
        }
        Command::Result {
            task_id,
            threshold,
            details,
        } => {
            let mut config = DetectionConfig::default();
            config.set_threshold(threshold)?;
            let mut client = new_client(config);
            client.load_result(&task_id).await;
            print_outcome(&client, details)
        }
        Command::Tasks => {
            let client = new_client(DetectionConfig::default());
            let tasks = client.list_tasks().await?;
            print!("{}", render_tasks(&tasks));
            Ok(())
        }
        Command::Delete { task_id } => {
            let mut client = new_client(DetectionConfig::default());
            let deletion = client.delete_task(&task_id).await?;
            println!("{} ({})", deletion.message, deletion.task_id);
            Ok(())
        }
    }
}

async fn detect(client: &mut DetectionClient<HttpBackend>, args: &DetectArgs) -> Result<()> {
    client.select_path(&args.file).await?;

    if args.check_health {
        client.run_detection_with_health_check().await?;
        match client.state().health_status() {
            Some(status) => eprintln!("{}", render_health(status)),
            None => eprintln!(
                "health: {}",
                client.state().health_error().unwrap_or("unavailable")
            ),
        }
    } else {
        client.run_detection().await?;
    }

    print_outcome(client, args.details)?;

    if !args.download {
        return Ok(());
    }
    if let Some(path) = client.download_report().await? {
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

fn print_outcome(client: &DetectionClient<HttpBackend>, details: bool) -> Result<()> {
    let status = project_client_status(client.state());
    debug!(
        stage = "cli",
        action = "status",
        detection = %status.detection,
        health = %status.health,
        download = %status.download,
        "client status"
    );

    let Some(result) = client.result() else {
        bail!(
            "{}",
            status.error.as_deref().unwrap_or("detection did not complete")
        );
    };

    print!("{}", render_result(result, client.state().config.threshold()));
    if details {
        println!();
        print!("{}", render_segment_details(result));
    }
    Ok(())
}

fn read_text(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}
