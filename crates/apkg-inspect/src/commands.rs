//! Subcommand handlers
//!
//! Handlers write to any `Write` so tests can capture their output; the
//! binary passes a locked stdout.

use crate::config::{Command, InspectConfig, OutputFormat};
use crate::output::{
    EntryRow, HeaderSummary, PayloadSummary, entries_table, entry_rows, header_table,
};
use anyhow::{Context, Result};
use apkg_formats::ArchiveIndex;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Open the configured archive and run the selected subcommand
pub fn run<W: Write>(config: &InspectConfig, out: &mut W) -> Result<()> {
    if !config.has_archive_extension() {
        debug!(
            "Archive path {} lacks the usual extension",
            config.archive.display()
        );
    }

    let mut archive = ArchiveIndex::open_with(&config.archive, config.archive_options())
        .with_context(|| format!("failed to open archive {}", config.archive.display()))?;

    match &config.command {
        Command::Info => info_command(&archive, config.format, out),
        Command::List => list_command(&archive, config.format, out),
        Command::Extract { position, output } => extract_command(
            &mut archive,
            *position,
            output.as_deref(),
            config.format,
            out,
        ),
        Command::Find { id } => find_command(&archive, *id, config.format, out),
    }
}

fn info_command<W: Write>(
    archive: &ArchiveIndex<BufReader<File>>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let summary = HeaderSummary::from(archive.header());
    match format {
        OutputFormat::Table => writeln!(out, "{}", header_table(&summary))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
    }
    Ok(())
}

fn list_command<W: Write>(
    archive: &ArchiveIndex<BufReader<File>>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let rows = entry_rows(archive.entries());
    match format {
        OutputFormat::Table => {
            writeln!(out, "{}", header_table(&HeaderSummary::from(archive.header())))?;
            writeln!(out, "{}", entries_table(&rows))?;
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?,
    }
    Ok(())
}

fn extract_command<W: Write>(
    archive: &mut ArchiveIndex<BufReader<File>>,
    position: usize,
    output: Option<&Path>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let data = archive
        .read_entry(position)
        .with_context(|| format!("failed to read entry {position}"))?;
    let row = EntryRow::new(position, archive.entry(position)?);

    if let Some(path) = output {
        fs::write(path, &data).with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            "Wrote {} bytes of entry {} to {}",
            data.len(),
            position,
            path.display()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Table => out.write_all(&data)?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&PayloadSummary::new(row, &data))?
        )?,
    }
    out.flush()?;
    Ok(())
}

fn find_command<W: Write>(
    archive: &ArchiveIndex<BufReader<File>>,
    id: u64,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let rows: Vec<EntryRow> = archive
        .positions_of(id)
        .map(|position| EntryRow::new(position, &archive.entries()[position]))
        .collect();

    if rows.len() > 1 {
        warn!("Identifier {} appears at {} positions", id, rows.len());
    }

    match format {
        OutputFormat::Table if rows.is_empty() => writeln!(out, "No entries with id {id}")?,
        OutputFormat::Table => writeln!(out, "{}", entries_table(&rows))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?,
    }
    Ok(())
}
