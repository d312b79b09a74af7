//! dbase-raw - inspect dBase III-V .dbf files
//!
//! Usage:
//!   dbase-raw -c <file>          - List the columns
//!   dbase-raw -r <name> <file>   - Print every row of a column (name or number)
//!   dbase-raw -v <file>          - Dump the table as csv

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use dbase_raw::{
    write_csv, CsvOptions, DbfFile, DescriptorCheck, RawColumn, ReadingOptions, Table,
    TrimOption, VersionCheck,
};

#[derive(Parser)]
#[command(name = "dbase-raw")]
#[command(version)]
#[command(about = "Inspect dBase III-V .dbf files", long_about = None)]
struct Cli {
    /// List the column names, types and lengths
    #[arg(short = 'c', long = "columns")]
    columns: bool,

    /// Print all rows of the named column (a column number is also accepted)
    #[arg(short = 'r', long = "rows", value_name = "NAME", allow_hyphen_values = true)]
    rows: Option<String>,

    /// Dump the whole table as csv
    #[arg(short = 'v', long = "csv")]
    csv: bool,

    /// Accept files with bytes between the descriptor terminator and the first record
    #[arg(long)]
    lenient: bool,

    /// Also accept dBase III and IV files flagged as having a memo (0x83, 0x8B)
    #[arg(long)]
    accept_memo_variants: bool,

    /// Leave out records marked as deleted from the csv dump
    #[arg(long)]
    skip_deleted: bool,

    /// Keep the padding of character values
    #[arg(long)]
    no_trim: bool,

    /// Path to the .dbf file
    file: PathBuf,
}

impl Cli {
    fn reading_options(&self) -> ReadingOptions {
        let check = if self.lenient {
            DescriptorCheck::Lenient
        } else {
            DescriptorCheck::Strict
        };
        let trim = if self.no_trim {
            TrimOption::None
        } else {
            TrimOption::BeginEnd
        };
        let version = if self.accept_memo_variants {
            VersionCheck::AcceptMemoVariants
        } else {
            VersionCheck::Strict
        };
        ReadingOptions::default()
            .descriptor_check(check)
            .version_check(version)
            .character_trim(trim)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.columns && cli.rows.is_none() && !cli.csv {
        Cli::command().print_help()?;
        std::process::exit(1);
    }

    let file = DbfFile::open(&cli.file)
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;
    let table = file
        .table_with_options(cli.reading_options())
        .with_context(|| format!("Invalid dBase file {}", cli.file.display()))?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if cli.columns {
        list_columns(&table, &mut out)?;
    }

    if let Some(name) = &cli.rows {
        print_rows(&table, name, &mut out)?;
    }

    if cli.csv {
        let options = CsvOptions {
            skip_deleted: cli.skip_deleted,
            ..CsvOptions::default()
        };
        write_csv(&table, &mut out, options).context("Failed to dump csv")?;
    }

    out.flush()?;
    Ok(())
}

fn list_columns<W: Write>(table: &Table<'_>, out: &mut W) -> Result<()> {
    for (i, field) in table.fields().iter().enumerate() {
        writeln!(
            out,
            "{:>3} {:<10} {} {:>3} {:>2}",
            i,
            field.name(),
            field.field_type(),
            field.length(),
            field.num_decimal_places()
        )?;
    }
    Ok(())
}

fn print_rows<W: Write>(table: &Table<'_>, name: &str, out: &mut W) -> Result<()> {
    let column =
        resolve_column(table, name).with_context(|| format!("Cannot read column '{}'", name))?;

    for value in column.characters(table.options().character_trim) {
        writeln!(out, "{}", value.unwrap_or_default())?;
    }
    Ok(())
}

/// A field name first, then a column number
fn resolve_column(table: &Table<'_>, name: &str) -> Result<RawColumn, dbase_raw::Error> {
    if let Some(index) = table.field_index(name) {
        return table.column(index);
    }
    match name.parse::<i64>() {
        Ok(number) => table.column_at(number),
        Err(_) => table.column_by_name(name),
    }
}
