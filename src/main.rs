// Entry point and high-level CLI flow.
//
// - Option [1] loads the dataset once and prints diagnostics.
// - Option [2] picks the region every view is filtered by.
// - Option [3] builds the three views, exports them and prints previews.
use anyhow::{bail, Context, Result};
use clap::Parser;
use seia_dashboard::config::{CliOverrides, Settings};
use seia_dashboard::loader::FileSource;
use seia_dashboard::reports::Dashboard;
use seia_dashboard::util::{format_currency, format_int};
use seia_dashboard::{output, ProjectRepository, RegionFilter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environmental-impact review dashboard: admissions, investment and processing times.
#[derive(Parser, Debug)]
#[command(name = "seia-dashboard", version)]
struct Cli {
    /// Dataset to load (.json or .csv)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Region to filter by ("Todas" for every region)
    #[arg(short, long)]
    region: Option<String>,

    /// Directory the CSV/JSON exports are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows shown in each console preview
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Load, generate the reports once and exit
    #[arg(long)]
    non_interactive: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::default();
    if let Some(path) = &cli.config {
        settings = settings
            .load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
    }
    let settings = settings.load_from_env().apply_cli(CliOverrides {
        data_path: cli.data.clone(),
        output_dir: cli.output_dir.clone(),
        region: cli.region.clone(),
        preview_rows: cli.preview_rows,
    })?;
    Ok(settings)
}

/// Print the "Enter choice:" prompt and read one trimmed line.
///
/// `None` once input is closed or unreadable, so callers can stop looping.
fn read_choice<R: BufRead>(input: &mut R) -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    read_trimmed_line(input)
}

fn read_trimmed_line<R: BufRead>(input: &mut R) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(e) => {
            warn!(error = %e, "failed to read input");
            None
        }
    }
}

/// `true` for `Y`. `N` and closed input both mean "leave the menu".
fn prompt_back_to_menu<R: BufRead>(input: &mut R) -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let Some(answer) = read_trimmed_line(input) else {
            println!();
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the dataset into the repository.
fn handle_load(repo: &ProjectRepository, source: &FileSource) {
    if repo.is_loaded() {
        println!(
            "Dataset already loaded ({} projects).\n",
            format_int(repo.projects().len())
        );
        return;
    }
    let projects = repo.load(source);
    if let Some(err) = repo.error() {
        eprintln!("{}\n", err);
        return;
    }
    println!(
        "Processing dataset... ({} projects loaded from {})",
        format_int(projects.len()),
        source.path().display()
    );
    if let Some(report) = source.report() {
        if report.parse_errors > 0 {
            println!(
                "Note: {} rows skipped due to parse errors.",
                format_int(report.parse_errors)
            );
        }
        if report.invalid_investment > 0 {
            println!(
                "Info: {} projects have an unreadable investment amount.",
                format_int(report.invalid_investment)
            );
        }
        if report.invalid_dates > 0 {
            println!(
                "Info: {} projects have an unreadable entry date.",
                format_int(report.invalid_dates)
            );
        }
    }
    println!();
}

/// Handle option [2]: choose the region filter from the loaded dataset.
fn handle_select_region<R: BufRead>(
    repo: &ProjectRepository,
    filter: &mut RegionFilter,
    input: &mut R,
) {
    let regions = repo.available_regions();
    println!("Current region: {}", filter);
    for (i, r) in regions.iter().enumerate() {
        println!("[{}] {}", i + 1, r);
    }
    let Some(choice) = read_choice(input) else {
        println!("\nRegion left as {}.\n", filter);
        return;
    };
    match pick_region(&regions, &choice) {
        Some(r) => {
            *filter = RegionFilter::new(r.clone());
            println!("Region set to {}.\n", filter);
        }
        None => println!("Invalid choice. Region left as {}.\n", filter),
    }
}

/// Region named by a 1-based menu number or by its exact name.
fn pick_region<'a>(regions: &'a [String], choice: &str) -> Option<&'a String> {
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| regions.get(i))
        .or_else(|| regions.iter().find(|r| *r == choice))
}

/// Handle option [3]: build every view, export it and print previews.
fn handle_generate_reports(
    repo: &ProjectRepository,
    filter: &RegionFilter,
    settings: &Settings,
) -> Result<()> {
    if !repo.is_loaded() {
        println!("Error: No data loaded. Please load the dataset first (option 1).\n");
        return Ok(());
    }

    let dashboard = Dashboard::build(repo.projects(), filter);
    let dir = &settings.output_dir;
    info!(region = %filter, projects = dashboard.project_count, "generating reports");

    println!("Generating reports for region: {}", filter);
    println!("Outputs saved to individual files...\n");
    let rows = settings.preview_rows;

    let adm = &dashboard.admission;
    let file1 = dir.join("report1_admitted_approved.csv");
    output::write_csv(&file1, &adm.projects_table_data)
        .with_context(|| format!("Failed to write {}", file1.display()))?;
    output::preview_table(
        "Report 1: Entered vs. Approved Projects",
        Some("Grouped by entry year"),
        &adm.projects_table_data,
        rows,
    );
    println!(
        "Entered: {} | Approved: {} | Approval rate: {}%",
        format_int(adm.total_entered_projects),
        format_int(adm.total_approved_projects),
        adm.approval_rate
    );
    println!("(Full table exported to {})\n", file1.display());

    let inv = &dashboard.investment;
    let file2 = dir.join("report2_investment.csv");
    output::write_csv(&file2, &inv.investment_table_data)
        .with_context(|| format!("Failed to write {}", file2.display()))?;
    output::preview_table(
        "Report 2: Investment by Year and Type",
        Some("DIA / EIA, entry year"),
        &inv.investment_table_data,
        rows,
    );
    println!(
        "Historical: {} | Average per project: {} | DIA: {} | EIA: {}",
        format_currency(inv.total_historical_investment),
        format_currency(inv.average_investment_per_project),
        format_currency(inv.total_dia_investment),
        format_currency(inv.total_eia_investment)
    );
    println!("(Full table exported to {})\n", file2.display());

    let timing = &dashboard.processing;
    let file3 = dir.join("report3_processing_time.csv");
    output::write_csv(&file3, &timing.processing_time_table_data)
        .with_context(|| format!("Failed to write {}", file3.display()))?;
    output::preview_table(
        "Report 3: Processing Time of Approved Projects",
        Some("Sorted by entry year, then processing days"),
        &timing.processing_time_table_data,
        rows,
    );
    println!(
        "Overall average: {} days",
        format_int(timing.overall_average_processing_time)
    );
    if let Some(p) = &timing.project_with_longest_processing_time {
        println!("Longest: {} (#{}) - {} days", p.project, p.id, format_int(p.days));
    }
    if let Some(p) = &timing.project_with_shortest_processing_time {
        println!("Shortest: {} (#{}) - {} days", p.project, p.id, format_int(p.days));
    }
    println!("(Full table exported to {})\n", file3.display());

    let summary = dir.join("dashboard.json");
    output::write_json(&summary, &dashboard)
        .with_context(|| format!("Failed to write {}", summary.display()))?;
    println!("Dashboard snapshot saved to {}\n", summary.display());
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let repo = ProjectRepository::new();
    let source = FileSource::new(&settings.data_path);
    let mut filter = RegionFilter::new(settings.region.clone());

    if cli.non_interactive {
        handle_load(&repo, &source);
        if let Some(err) = repo.error() {
            bail!(err);
        }
        return handle_generate_reports(&repo, &filter, &settings);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        println!("Select an option:");
        println!("[1] Load the dataset");
        println!("[2] Select region (current: {})", filter);
        println!("[3] Generate Reports\n");
        let Some(choice) = read_choice(&mut input) else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&repo, &source),
            "2" => {
                println!();
                handle_select_region(&repo, &mut filter, &mut input);
            }
            "3" => {
                println!();
                if let Err(e) = handle_generate_reports(&repo, &filter, &settings) {
                    eprintln!("Write error: {:#}\n", e);
                }
                if !prompt_back_to_menu(&mut input) {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
    Ok(())
}
