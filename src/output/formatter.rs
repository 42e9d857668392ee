use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::grading::{
    CgpaResult, CriticalPoint, GlobalPlan, SgpaResult, SinglePlan, Subject, TierAdvance,
};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a mark without a trailing ".0" (56.5 stays, 90.0 becomes 90)
pub fn format_marks(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let formatted = format!("{:.2}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Format an SGPA/CGPA with exactly two decimals
pub fn format_gpa(value: f64) -> String {
    format!("{:.2}", value)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a subject name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Subject breakdown, one row per subject, followed by the SGPA line.
/// Columns: Code, CIE, SEE, Total, GP, Credits, Weighted, Name
pub fn format_sgpa_table(subjects: &[Subject], result: &SgpaResult, use_colors: bool) -> String {
    let code_width = subjects
        .iter()
        .map(|s| s.code.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    // Code + 6 numeric columns of 8 chars
    let fixed_width = code_width + 6 * 8 + 2;
    let term_width = get_terminal_width();

    let header = format!(
        "{:<cw$}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}  {}",
        "Code",
        "CIE",
        "SEE",
        "Total",
        "GP",
        "Credits",
        "Weighted",
        "Name",
        cw = code_width
    );

    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];

    for (subject, row) in subjects.iter().zip(&result.subjects) {
        let name = match term_width {
            Some(width) if width > fixed_width + 10 => truncate_name(&subject.name, width - fixed_width),
            Some(_) => truncate_name(&subject.name, 20),
            None => subject.name.clone(),
        };
        let gp = format!("{:>8}", row.gp);
        let gp = if use_colors { gp.bold().to_string() } else { gp };

        lines.push(format!(
            "{:<cw$}{:>8}{:>8}{:>8}{}{:>8}{:>8}  {}",
            row.code,
            format_marks(subject.cie),
            format_marks(subject.see),
            format_marks(row.total),
            gp,
            row.credits,
            format_marks(row.weighted),
            name,
            cw = code_width
        ));
    }

    let summary = format!(
        "SGPA {} ({} weighted points / {} credits)",
        format_gpa(result.sgpa),
        format_marks(result.total_weighted),
        result.total_credits
    );
    lines.push(String::new());
    lines.push(if use_colors {
        summary.bold().to_string()
    } else {
        summary
    });

    lines.join("\n")
}

/// Per-subject rows as tab-separated values for scripting
/// Columns: code, total, gp, credits, weighted (no headers, no colors)
pub fn format_sgpa_tsv(result: &SgpaResult) -> String {
    result
        .subjects
        .iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.code,
                format_marks(row.total),
                row.gp,
                row.credits,
                format_marks(row.weighted)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Critical exam scores for one subject, highest tier first
pub fn format_critical_table(
    subject: &Subject,
    points: &[CriticalPoint],
    next: Option<TierAdvance>,
    use_colors: bool,
) -> String {
    let title = if subject.name.is_empty() {
        format!("{} (CIE {})", subject.code, format_marks(subject.cie))
    } else {
        format!(
            "{} {} (CIE {})",
            subject.code,
            subject.name,
            format_marks(subject.cie)
        )
    };

    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];

    for point in points {
        let status = if point.is_guaranteed() {
            "secured".to_string()
        } else if point.reachable {
            format!("needs SEE {}", format_marks(point.see_crit))
        } else {
            "out of reach".to_string()
        };
        let status = match (use_colors, point.is_guaranteed(), point.reachable) {
            (false, _, _) => status,
            (true, true, _) => status.green().to_string(),
            (true, false, true) => status.yellow().to_string(),
            (true, false, false) => status.red().to_string(),
        };
        lines.push(format!(
            "  >= {:>5}  GP {:>2}  {}",
            format_marks(point.cutoff_total),
            point.grade_point,
            status
        ));
    }

    let next_line = match next {
        Some(advance) => format!(
            "  Next tier: GP {} at SEE {} (+{})",
            advance.grade_point,
            format_marks(advance.target_see),
            format_marks(advance.target_see - subject.see)
        ),
        None => "  Next tier: none, already at the best reachable grade".to_string(),
    };
    lines.push(next_line);

    lines.join("\n")
}

/// One-paragraph summary of a single-subject plan
pub fn format_single_plan(plan: &SinglePlan, target_sgpa: f64, use_colors: bool) -> String {
    match (plan.min_see_to_reach_target, plan.achieved_sgpa) {
        (Some(min_see), Some(achieved)) => {
            let headline = format!(
                "{}: SEE {} -> {} (+{})",
                plan.code,
                format_marks(plan.current_see),
                format_marks(min_see),
                format_marks(plan.increase().unwrap_or_default())
            );
            let detail = format!(
                "  Reaches SGPA {} (target {})",
                format_gpa(achieved),
                format_gpa(target_sgpa)
            );
            if use_colors {
                format!("{}\n{}", headline.green().bold(), detail)
            } else {
                format!("{}\n{}", headline, detail)
            }
        }
        _ => {
            let headline = format!(
                "{}: target SGPA {} is out of reach by raising this subject alone",
                plan.code,
                format_gpa(target_sgpa)
            );
            if use_colors {
                headline.red().to_string()
            } else {
                headline
            }
        }
    }
}

/// Ordered steps of a global plan plus the outcome
pub fn format_global_plan(plan: &GlobalPlan, target_sgpa: f64, use_colors: bool) -> String {
    let mut lines = Vec::new();

    if plan.steps.is_empty() {
        lines.push("No exam score changes needed.".to_string());
    }

    for (idx, step) in plan.steps.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let index_str = if use_colors {
            index_str.dimmed().to_string()
        } else {
            index_str
        };
        lines.push(format!(
            "{} {}  SEE {} -> {} (+{})",
            index_str,
            step.code,
            format_marks(step.from_see),
            format_marks(step.to_see),
            format_marks(step.increase_see_by)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "SGPA {} -> {} (target {}, best attainable {})",
        format_gpa(plan.initial_sgpa),
        format_gpa(plan.final_sgpa),
        format_gpa(target_sgpa),
        format_gpa(plan.best_attainable_sgpa)
    ));

    let verdict = if plan.target_reached {
        format!(
            "Target reached with {} extra exam marks.",
            format_marks(plan.total_increase())
        )
    } else {
        "Target not reachable.".to_string()
    };
    lines.push(match (use_colors, plan.target_reached) {
        (false, _) => verdict,
        (true, true) => verdict.green().bold().to_string(),
        (true, false) => verdict.red().bold().to_string(),
    });

    lines.join("\n")
}

/// Per-semester SGPA rows and the cumulative figure
pub fn format_cgpa(labels: &[String], result: &CgpaResult, use_colors: bool) -> String {
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(8);

    let mut lines: Vec<String> = labels
        .iter()
        .zip(&result.semesters)
        .map(|(label, semester)| {
            format!(
                "{:<lw$}  SGPA {}  ({} credits)",
                label,
                format_gpa(semester.sgpa),
                semester.credits,
                lw = label_width
            )
        })
        .collect();

    let summary = format!(
        "CGPA {} over {} credits",
        format_gpa(result.cgpa),
        result.total_credits
    );
    lines.push(String::new());
    lines.push(if use_colors {
        summary.bold().to_string()
    } else {
        summary
    });

    lines.join("\n")
}
