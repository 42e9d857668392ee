use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use sgpa_planner::grading::{self, EngineError, GradingConfig};
use sgpa_planner::semester::{self, Semester};
use sgpa_planner::{output, telemetry};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_UNREACHABLE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the SGPA and per-subject breakdown for a semester file
    Calc {
        /// Semester file (YAML, or JSON with a .json extension)
        file: PathBuf,
    },
    /// Show the exam score needed for every grade tier
    Critical {
        file: PathBuf,
        /// Only this subject (default: every subject)
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Minimum exam score for one subject to reach a target SGPA
    Plan {
        file: PathBuf,
        /// Subject code to raise
        #[arg(short, long)]
        subject: String,
        /// Target SGPA
        #[arg(short, long)]
        target: f64,
    },
    /// Spread exam score increases across subjects to reach a target SGPA
    Greedy {
        file: PathBuf,
        /// Target SGPA
        #[arg(short, long)]
        target: f64,
    },
    /// Cumulative GPA across several semester files
    Cgpa {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write a config file with the grading policy
    Init {
        /// Write the built-in defaults without prompting
        #[arg(long)]
        defaults: bool,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sgpa-planner")]
#[command(about = "SGPA calculator and exam-score planner", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/sgpa-planner/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Err(e) = telemetry::init(cli.verbose) {
        eprintln!("Logging setup failed: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { defaults, force } = cli.command {
        match sgpa_planner::config::run_init_wizard(config_path, defaults, force) {
            Ok(Some(path)) => println!("Config written to {}", path.display()),
            Ok(None) => {}
            Err(e) => {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match sgpa_planner::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate grading config at startup
    let policy = config.grading();
    if let Err(errors) = grading::validate_grading(&policy) {
        eprintln!("Grading config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    info!(tiers = policy.cutoffs.len(), see_scale = policy.see_scale, "grading policy ready");

    let use_colors = output::should_use_colors();
    let format = cli.format;

    let code = match cli.command {
        Commands::Calc { file } => run_calc(&file, &policy, format, use_colors),
        Commands::Critical { file, subject } => {
            run_critical(&file, subject.as_deref(), &policy, format, use_colors)
        }
        Commands::Plan {
            file,
            subject,
            target,
        } => run_plan(&file, &subject, target, &policy, format, use_colors),
        Commands::Greedy { file, target } => run_greedy(&file, target, &policy, format, use_colors),
        Commands::Cgpa { files } => run_cgpa(&files, &policy, format, use_colors),
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    info!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(code);
}

fn load_semester_or_exit(path: &Path) -> Semester {
    match semester::load_semester(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Semester error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn engine_failure(context: &str, err: EngineError) -> i32 {
    eprintln!("{}: {}", context, err);
    EXIT_INPUT
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            EXIT_INPUT
        }
    }
}

/// Output failures win over the plan outcome.
fn plan_exit_code(printed: i32, target_met: bool) -> i32 {
    if printed != EXIT_SUCCESS {
        printed
    } else if target_met {
        EXIT_SUCCESS
    } else {
        EXIT_UNREACHABLE
    }
}

fn table_only(format: OutputFormat, command: &str) {
    if format == OutputFormat::Tsv {
        warn!("tsv output is not available for '{}', printing a table", command);
    }
}

fn run_calc(file: &Path, policy: &GradingConfig, format: OutputFormat, use_colors: bool) -> i32 {
    let semester = load_semester_or_exit(file);
    let result = match grading::calculate_sgpa(&semester.subjects, policy) {
        Ok(r) => r,
        Err(e) => return engine_failure("Invalid semester", e),
    };

    match format {
        OutputFormat::Json => return print_json(&result),
        OutputFormat::Tsv => println!("{}", output::format_sgpa_tsv(&result)),
        OutputFormat::Table => println!(
            "{}",
            output::format_sgpa_table(&semester.subjects, &result, use_colors)
        ),
    }
    EXIT_SUCCESS
}

#[derive(Serialize)]
struct SubjectCriticals<'a> {
    #[serde(skip)]
    subject: &'a grading::Subject,
    code: &'a str,
    points: Vec<grading::CriticalPoint>,
    next: Option<grading::TierAdvance>,
}

fn run_critical(
    file: &Path,
    only: Option<&str>,
    policy: &GradingConfig,
    format: OutputFormat,
    use_colors: bool,
) -> i32 {
    let semester = load_semester_or_exit(file);
    if let Err(e) = grading::validate_subjects(&semester.subjects, policy) {
        return engine_failure("Invalid semester", e);
    }

    let selected: Vec<&grading::Subject> = match only {
        Some(code) => match semester.subject(code) {
            Some(s) => vec![s],
            None => {
                return engine_failure(
                    "Critical values",
                    EngineError::UnknownSubject {
                        code: code.to_string(),
                    },
                )
            }
        },
        None => semester.subjects.iter().collect(),
    };

    let mut reports = Vec::with_capacity(selected.len());
    for subject in selected {
        let points = match grading::calculate_critical_see_values(subject.cie, policy) {
            Ok(p) => p,
            Err(e) => return engine_failure("Critical values", e),
        };
        reports.push(SubjectCriticals {
            subject,
            code: &subject.code,
            points,
            next: grading::next_tier(subject.cie, subject.see, policy),
        });
    }

    if format == OutputFormat::Json {
        return print_json(&reports);
    }
    table_only(format, "critical");

    let blocks: Vec<String> = reports
        .iter()
        .map(|report| {
            output::format_critical_table(report.subject, &report.points, report.next, use_colors)
        })
        .collect();
    println!("{}", blocks.join("\n\n"));
    EXIT_SUCCESS
}

fn run_plan(
    file: &Path,
    code: &str,
    target: f64,
    policy: &GradingConfig,
    format: OutputFormat,
    use_colors: bool,
) -> i32 {
    let semester = load_semester_or_exit(file);
    let plan = match grading::find_minimal_see_for_target(&semester.subjects, code, target, policy) {
        Ok(p) => p,
        Err(e) => return engine_failure("Plan failed", e),
    };

    let printed = if format == OutputFormat::Json {
        print_json(&plan)
    } else {
        table_only(format, "plan");
        println!("{}", output::format_single_plan(&plan, target, use_colors));
        EXIT_SUCCESS
    };
    plan_exit_code(printed, plan.possible)
}

fn run_greedy(
    file: &Path,
    target: f64,
    policy: &GradingConfig,
    format: OutputFormat,
    use_colors: bool,
) -> i32 {
    let semester = load_semester_or_exit(file);
    let plan = match grading::greedy_global_plan(&semester.subjects, target, policy) {
        Ok(p) => p,
        Err(e) => return engine_failure("Plan failed", e),
    };

    let printed = if format == OutputFormat::Json {
        print_json(&plan)
    } else {
        table_only(format, "greedy");
        println!("{}", output::format_global_plan(&plan, target, use_colors));
        EXIT_SUCCESS
    };
    plan_exit_code(printed, plan.target_reached)
}

fn run_cgpa(
    files: &[PathBuf],
    policy: &GradingConfig,
    format: OutputFormat,
    use_colors: bool,
) -> i32 {
    let mut labels = Vec::with_capacity(files.len());
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let semester = load_semester_or_exit(file);
        let fallback = file.display().to_string();
        labels.push(semester.display_name(&fallback).to_string());
        match grading::calculate_sgpa(&semester.subjects, policy) {
            Ok(r) => results.push(r),
            Err(e) => return engine_failure(&format!("Invalid semester {}", file.display()), e),
        }
    }

    let cgpa = match grading::calculate_cgpa(&results) {
        Ok(c) => c,
        Err(e) => return engine_failure("CGPA failed", e),
    };

    if format == OutputFormat::Json {
        return print_json(&cgpa);
    }
    table_only(format, "cgpa");
    println!("{}", output::format_cgpa(&labels, &cgpa, use_colors));
    EXIT_SUCCESS
}
