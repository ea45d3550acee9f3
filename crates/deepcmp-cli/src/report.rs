use std::io::Write;

use colored::Colorize;
use deepcmp_diff::{ComparisonResult, Difference, Operand};

use crate::cli::OutputFormat;

pub fn write_report(
    out: &mut impl Write,
    result: &ComparisonResult,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write_text(out, result),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_text(out: &mut impl Write, result: &ComparisonResult) -> anyhow::Result<()> {
    for difference in &result.differences {
        write_difference(out, difference)?;
    }

    if result.equal {
        writeln!(out, "{} Documents are equal", "✓".green().bold())?;
    } else if result.differences.is_empty() {
        writeln!(out, "{} Documents differ", "✗".red().bold())?;
    } else {
        let n = result.len();
        let noun = if n == 1 { "difference" } else { "differences" };
        writeln!(out, "{} {n} {noun}", "✗".red().bold())?;
    }
    Ok(())
}

fn write_difference(out: &mut impl Write, difference: &Difference) -> anyhow::Result<()> {
    let path = if difference.path.is_empty() {
        "<root>"
    } else {
        difference.path.as_str()
    };
    writeln!(out, "{}  {}", path.yellow().bold(), difference.message)?;
    // Container pairs can be arbitrarily large; the message says enough.
    if !difference.is_structural() {
        writeln!(out, "    left:  {}", operand_text(&difference.value1))?;
        writeln!(out, "    right: {}", operand_text(&difference.value2))?;
    }
    Ok(())
}

fn operand_text(operand: &Operand) -> String {
    match operand {
        Operand::Present(value) => value.to_json_lossy().to_string(),
        Operand::Missing => operand.to_string().dimmed().to_string(),
    }
}
