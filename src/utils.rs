use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Format a dollar amount with color
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount).yellow().to_string()
}

/// Format a date in the style shown on return slips
pub fn format_date(date: &chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Green check or red cross for checklist lines
pub fn check_mark(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Spinner shown while a screen is loading
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// One table line, each column left-aligned to its width
pub fn table_row<S: AsRef<str>>(columns: &[S], widths: &[usize]) -> String {
    columns
        .iter()
        .zip(widths)
        .map(|(col, width)| format!("{:<width$}", col.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Border as wide as the columns plus the gaps between them
pub fn table_border(widths: &[usize]) -> String {
    let gaps = 2 * widths.len().saturating_sub(1);
    "=".repeat(widths.iter().sum::<usize>() + gaps)
}

/// Print a bordered table with a heading row
pub fn print_table(headers: &[&str], rows: &[Vec<String>], widths: &[usize]) {
    let border = table_border(widths);
    println!("{}", border);
    println!("{}", table_row(headers, widths).bold());
    println!("{}", border);
    for row in rows {
        println!("{}", table_row(row, widths));
    }
    println!("{}", border);
}
