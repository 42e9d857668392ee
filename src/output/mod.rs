pub mod formatter;

pub use formatter::{
    format_cgpa, format_critical_table, format_global_plan, format_gpa, format_marks,
    format_sgpa_table, format_sgpa_tsv, format_single_plan, should_use_colors,
};
