use crate::core::detect::detect_array_columns;
use crate::core::stats::{summarize_dimensions, DimensionStats};
use crate::core::view::{build_view, config_pareto, DashboardView, ViewOptions};
use crate::core::{pareto_front, row_detail, DetailEntry};
use crate::error::{MooError, MooResult};
use crate::parser;
use crate::selection::{SelectionSet, SelectionToken};
use crate::types::{CategoryMap, Dimension, ObjectiveSenses, RawTable, VariableConfig};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let rounded = (n * 1e6).round() / 1e6;
    let formatted = format!("{:.6}", rounded);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn format_optional(n: Option<f64>) -> String {
    n.map_or_else(|| "-".to_string(), format_number)
}

fn load_inputs(table: &Path, config: Option<&Path>) -> MooResult<(RawTable, VariableConfig)> {
    let raw = parser::load_table(table)?;
    let config = match config {
        Some(path) => parser::parse_config(path)?,
        None => VariableConfig::new(),
    };
    Ok((raw, config))
}

/// Merge a senses file with `NAME=SENSE` flags; flags win
fn collect_senses(senses_file: Option<&Path>, sense_args: &[String]) -> MooResult<ObjectiveSenses> {
    let mut senses = match senses_file {
        Some(path) => parser::parse_senses(path)?,
        None => ObjectiveSenses::new(),
    };
    for arg in sense_args {
        let (name, sense) = parser::parse_sense_arg(arg)?;
        senses.set(name, sense);
    }
    Ok(senses)
}

/// Build a selection from command-line names.
///
/// A plain name that refers to an array column selects both halves.
fn build_selection(variables: &[String], array_columns: &BTreeSet<String>) -> SelectionSet {
    variables.iter().fold(SelectionSet::new(), |selection, raw| {
        let token = SelectionToken::parse(raw);
        if let SelectionToken::Scalar(name) = &token {
            if array_columns.contains(name) {
                return if selection.is_variable_selected(name) {
                    selection
                } else {
                    selection.toggled_variable(name, true)
                };
            }
        }
        if selection.contains(&token) {
            selection
        } else {
            selection.toggled(token)
        }
    })
}

/// Execute the inspect command
pub fn inspect(
    table: PathBuf,
    config: Option<PathBuf>,
    sample_size: usize,
) -> MooResult<()> {
    println!("{}", "🔍 MOO Explorer - Inspecting optimization log".bold().green());
    println!("   File: {}", table.display());
    println!();

    let (raw, config) = load_inputs(&table, config.as_deref())?;
    let array_columns = detect_array_columns(&raw, sample_size);

    println!(
        "{}",
        format!(
            "📊 {} columns, {} rows ({} array columns)",
            raw.columns().len(),
            raw.row_count(),
            array_columns.len()
        )
        .bold()
    );

    for column in raw.columns() {
        let role = match config.category_of(&column.name) {
            Some(category) => category.display_name().bright_blue().to_string(),
            None => "-".dimmed().to_string(),
        };
        if array_columns.contains(&column.name) {
            println!(
                "   {} {} [{}]  selectable as {}_min / {}_max",
                column.name.cyan(),
                "(array)".yellow(),
                role,
                column.name,
                column.name
            );
        } else {
            println!("   {} [{}]", column.name.cyan(), role);
        }
    }

    let missing: Vec<&str> = crate::types::Category::ALL
        .iter()
        .flat_map(|category| config.group(*category).names())
        .filter(|name| !raw.has_column(name))
        .collect();
    if !missing.is_empty() {
        println!();
        println!(
            "{}",
            format!("⚠️  {} configured variables not in the log:", missing.len()).yellow()
        );
        for name in missing {
            println!("   {}", name.dimmed());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    row_count: usize,
    dimensions: &'a [Dimension],
    categories: &'a CategoryMap,
    stats: &'a [DimensionStats],
    pareto: Option<&'a [usize]>,
}

/// Execute the resolve command
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    table: PathBuf,
    config: Option<PathBuf>,
    variables: Vec<String>,
    pareto: bool,
    senses_file: Option<PathBuf>,
    sense_args: Vec<String>,
    json: bool,
) -> MooResult<()> {
    let (raw, config) = load_inputs(&table, config.as_deref())?;
    let array_columns = detect_array_columns(&raw, crate::core::DEFAULT_SAMPLE_SIZE);
    let selection = build_selection(&variables, &array_columns);
    let options = ViewOptions {
        pareto_enabled: pareto,
        senses: collect_senses(senses_file.as_deref(), &sense_args)?,
    };

    let (data, front) = match build_view(&raw, &config, &selection, &options)? {
        DashboardView::Guidance(guidance) => {
            if json {
                println!("{}", serde_json::json!({ "guidance": guidance.message() }));
            } else {
                println!("{}", format!("💡 {}", guidance.message()).yellow());
            }
            return Ok(());
        }
        DashboardView::Ready { data, pareto } => (data, pareto),
    };
    let stats = summarize_dimensions(&data.dimensions);

    if json {
        let report = ResolveReport {
            row_count: data.row_count(),
            dimensions: &data.dimensions,
            categories: &data.categories,
            stats: &stats,
            pareto: front.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "🧭 MOO Explorer - Resolved dimensions".bold().green());
    println!("   File: {}", table.display());
    println!("   Rows: {}", data.row_count());
    println!();

    for stat in &stats {
        let role = match data.categories.get(&stat.label).copied().flatten() {
            Some(category) => category.display_name().bright_blue().to_string(),
            None => "-".dimmed().to_string(),
        };
        let line = format!(
            "   {} [{}]  {}/{} valid, min {}, max {}",
            stat.label.cyan(),
            role,
            stat.valid,
            stat.total,
            format_optional(stat.min),
            format_optional(stat.max)
        );
        if stat.is_all_nan() {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }

    if let Some(front) = front {
        println!();
        print_front(&front);
    }
    Ok(())
}

fn print_front(front: &[usize]) {
    println!(
        "{}",
        format!("🏆 Pareto front: {} solutions", front.len())
            .bold()
            .green()
    );
    let indices: Vec<String> = front.iter().map(|i| i.to_string()).collect();
    println!("   Iterations: {}", indices.join(", "));
}

/// Execute the pareto command
pub fn pareto(
    table: PathBuf,
    config: Option<PathBuf>,
    objectives: Vec<String>,
    senses_file: Option<PathBuf>,
    sense_args: Vec<String>,
    json: bool,
) -> MooResult<()> {
    let (raw, config) = load_inputs(&table, config.as_deref())?;
    let senses = collect_senses(senses_file.as_deref(), &sense_args)?;

    let front = if objectives.is_empty() {
        config_pareto(&raw, &config, &senses)?.ok_or_else(|| {
            MooError::Validation(
                "At least 2 objectives present in the log are needed for a Pareto front \
                 (pass --objective or a config with objectives)"
                    .to_string(),
            )
        })?
    } else {
        pareto_front(&objectives, &raw, &senses)?
    };

    if json {
        println!("{}", serde_json::to_string(&front)?);
        return Ok(());
    }

    println!("{}", "📈 MOO Explorer - Pareto analysis".bold().green());
    println!("   File: {}", table.display());
    for (name, sense) in senses.iter() {
        println!("   {} {}", name.bright_blue(), sense.to_string().dimmed());
    }
    println!();
    print_front(&front);
    Ok(())
}

/// Execute the detail command
pub fn detail(
    table: PathBuf,
    config: Option<PathBuf>,
    iteration: usize,
    json: bool,
) -> MooResult<()> {
    let (raw, config) = load_inputs(&table, config.as_deref())?;
    let entries: Vec<DetailEntry> = row_detail(&raw, iteration, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("📋 Iteration {} of {}", iteration, raw.row_count())
            .bold()
            .green()
    );
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in &entries {
        let name = format!("{:width$}", entry.name, width = width);
        let name = match entry.category {
            Some(_) => name.bright_blue(),
            None => name.normal(),
        };
        println!("   {}  {}", name, entry.display_value());
    }
    Ok(())
}
