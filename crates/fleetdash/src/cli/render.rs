//! Plain-text and JSON output for the CLI.

use std::io::{self, Write};

use serde::Serialize;

use crate::analytics::{AgeOverview, Distribution};
use crate::error::Result;
use crate::record::FleetRecord;
use crate::session::RemovalOutcome;
use crate::storage::StoreStats;
use crate::summary::ChangeSummary;

/// Format a USD amount with thousands separators and no decimals.
#[must_use]
pub fn format_usd(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && digits.chars().any(|c| c != '0') {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Write `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(headers.to_vec()))?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", line(rule.iter().map(String::as_str).collect()))?;
    for row in rows {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

/// Write the fleet table.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_records<W: Write>(out: &mut W, records: &[FleetRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No aircraft to show.");
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.registration.clone(),
                r.aircraft_type.to_string(),
                r.aircraft_variant.clone(),
                date_cell(r.date_of_manufacture),
                date_cell(r.date_of_entry),
                date_cell(r.lifecycle.exit_date()),
                r.lease_type.to_string(),
                date_cell(r.lease_end_date),
                format_usd(r.market_value),
                r.monthly_lease.map(format_usd).unwrap_or_default(),
            ]
        })
        .collect();

    write_table(
        out,
        &[
            "Registration",
            "Type",
            "Variant",
            "Built",
            "Entered",
            "Exited",
            "Lease",
            "Lease End",
            "Market Value",
            "Monthly Lease",
        ],
        &rows,
    )?;
    writeln!(out)?;
    writeln!(out, "{} aircraft", records.len())
}

/// Write the average-age projection, baseline next to the session fleet.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_age_overview<W: Write>(out: &mut W, overview: &AgeOverview) -> io::Result<()> {
    let cell = |average: f64, degraded: bool| {
        if degraded {
            format!("{average:.2}*")
        } else {
            format!("{average:.2}")
        }
    };

    let rows: Vec<Vec<String>> = overview
        .original
        .points()
        .iter()
        .zip(overview.scenario.points())
        .map(|(original, scenario)| {
            vec![
                original.year.to_string(),
                cell(original.average_age, original.degraded),
                cell(scenario.average_age, scenario.degraded),
                format!("{:+.2}", scenario.average_age - original.average_age),
            ]
        })
        .collect();

    writeln!(out, "Average Fleet Age (years, as of 1 January)")?;
    writeln!(out)?;
    write_table(out, &["Year", "Original", "Scenario", "Change"], &rows)?;

    if !overview.original.degraded_years().is_empty()
        || !overview.scenario.degraded_years().is_empty()
    {
        writeln!(out)?;
        writeln!(out, "* average could not be computed for this year")?;
    }
    Ok(())
}

/// Write one categorical breakdown with counts and shares.
///
/// # Errors
///
/// Returns an error if the write fails.
#[allow(clippy::cast_precision_loss)]
pub fn write_distribution<W: Write>(out: &mut W, distribution: &Distribution) -> io::Result<()> {
    writeln!(
        out,
        "{} Distribution (as of {})",
        distribution.field, distribution.date
    )?;
    writeln!(out)?;

    if distribution.is_empty() {
        return writeln!(out, "No active aircraft for the selected date.");
    }

    let total = distribution.total() as f64;
    let rows: Vec<Vec<String>> = distribution
        .sorted()
        .into_iter()
        .map(|(label, count)| {
            vec![
                label.to_string(),
                count.to_string(),
                format!("{:.1}%", count as f64 * 100.0 / total),
            ]
        })
        .collect();

    let field = distribution.field.to_string();
    write_table(out, &[field.as_str(), "Count", "Share"], &rows)?;
    writeln!(out)?;
    writeln!(out, "{} aircraft", distribution.total())
}

/// Write fleet statistics.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_stats<W: Write>(out: &mut W, stats: &StoreStats) -> io::Result<()> {
    writeln!(out, "Fleet Statistics")?;
    writeln!(out, "----------------")?;
    writeln!(out, "Total aircraft:     {}", stats.total)?;
    writeln!(out, "Active:             {}", stats.active)?;
    writeln!(out, "Exited:             {}", stats.exited)?;
    for (lease_type, count) in &stats.active_by_lease {
        writeln!(out, "  {:<18}{count}", format!("{lease_type}:"))?;
    }
    writeln!(
        out,
        "Active value:       {}",
        format_usd(stats.active_market_value)
    )?;
    writeln!(
        out,
        "Monthly lease:      {}",
        format_usd(stats.active_monthly_lease)
    )
}

/// Write the additions and removals for one day.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_change_summary<W: Write>(out: &mut W, summary: &ChangeSummary) -> io::Result<()> {
    writeln!(out, "Changes on {}", summary.date)?;
    if summary.is_empty() {
        return writeln!(out, "No additions or removals recorded.");
    }
    if !summary.added.is_empty() {
        writeln!(out, "Added aircraft:   {}", summary.added.join(", "))?;
    }
    if !summary.removed.is_empty() {
        writeln!(out, "Removed aircraft: {}", summary.removed.join(", "))?;
    }
    Ok(())
}

/// Write the result of a removal.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_removal<W: Write>(out: &mut W, outcome: &RemovalOutcome) -> io::Result<()> {
    if outcome.count() == 0 {
        return writeln!(out, "No active aircraft matched; the fleet is unchanged.");
    }
    writeln!(
        out,
        "Removed {} aircraft effective {}: {}",
        outcome.count(),
        outcome.exit_date,
        outcome.removed.join(", ")
    )?;
    writeln!(
        out,
        "Financial contribution from owned aircraft: {}",
        format_usd(outcome.own_contribution)
    )
}
