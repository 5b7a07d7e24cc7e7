//! moonreader-rs command line entry point.

use clap::Parser;
use moonreader_rs::{
    BookType,
    config::{Cli, Command, Config},
    formats,
    library::{self, Export, Scanner},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let default_filter = if cli.verbose {
        "moonreader_rs=debug"
    } else {
        "moonreader_rs=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Find or load config
    let config_path = cli.config.clone().or_else(Config::find_config_file);

    let config = if let Some(ref path) = config_path {
        tracing::debug!(path = %path.display(), "Loading config");
        Config::load(path)?
    } else {
        Config::default()
    };

    match cli.command {
        Some(Command::Export {
            path,
            output,
            workers,
            book_count,
            pretty,
        }) => cmd_export(config, path, output, workers, book_count, pretty),
        Some(Command::Notes { file, book_type }) => cmd_notes(&config, &file, book_type),
        Some(Command::Stats { file }) => cmd_stats(&config, &file),
        Some(Command::Rewrite {
            file,
            output,
            compress,
        }) => cmd_rewrite(&config, &file, output, compress),
        Some(Command::Init { force }) => cmd_init(force),
        None => cmd_export(config, None, None, None, None, false),
    }
}

/// Scan a directory and export every book.
fn cmd_export(
    mut config: Config,
    path: Option<PathBuf>,
    output: Option<PathBuf>,
    workers: Option<usize>,
    book_count: Option<usize>,
    pretty: bool,
) -> anyhow::Result<()> {
    if let Some(workers) = workers {
        anyhow::ensure!(workers > 0, "--workers must be at least 1");
        config.scan.workers = workers;
    }
    if book_count.is_some() {
        config.scan.book_count = book_count;
    }
    config.output.pretty |= pretty;

    let path = path.unwrap_or_else(|| PathBuf::from("."));
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }

    let skip_failed = config.scan.skip_failed;
    let scanner = Scanner::new(config.scan.clone());
    let entries = scanner.scan(&path)?;

    let mut books = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.result {
            Ok(book) => books.push(book),
            Err(e) if skip_failed => {
                tracing::warn!(
                    notes = ?entry.files.notes,
                    stats = ?entry.files.stats,
                    error = %e,
                    "Skipping book"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(books = books.len(), "Exporting");
    let json = Export::new(&books).to_json(config.output.pretty)?;
    write_output(&json, output.as_deref())
}

/// Decode one notes file.
fn cmd_notes(config: &Config, file: &Path, book_type: Option<BookType>) -> anyhow::Result<()> {
    let book_type = match book_type {
        Some(t) => t,
        None => library::book_type_from_file_name(file)?,
    };

    let notes = formats::decode_notes(&std::fs::read(file)?, book_type)?;
    write_json(&notes, config.output.pretty)
}

/// Decode one statistics file.
fn cmd_stats(config: &Config, file: &Path) -> anyhow::Result<()> {
    let stats = formats::decode_statistics(&std::fs::read(file)?)?;
    write_json(&stats, config.output.pretty)
}

/// Decode a notes file and write it back in canonical form.
fn cmd_rewrite(
    config: &Config,
    file: &Path,
    output: Option<PathBuf>,
    compress: bool,
) -> anyhow::Result<()> {
    let book_type = library::book_type_from_file_name(file)?;
    let notes = formats::decode_notes(&std::fs::read(file)?, book_type)?;

    let compress = compress || config.output.compress_notes;
    let data = formats::encode_notes(&notes, book_type, compress)?;

    let target = output.unwrap_or_else(|| file.to_path_buf());
    std::fs::write(&target, data)?;
    println!(
        "Wrote {} notes to {} ({})",
        notes.len(),
        target.display(),
        if compress { "compressed" } else { "plain" }
    );

    Ok(())
}

/// Write a default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from("moonreader-rs.toml");

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, Config::generate_default())?;
    println!("Created config file: {}", config_path.display());

    Ok(())
}

fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    write_output(&json, None)
}

fn write_output(json: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), "Wrote export");
        }
        None => println!("{}", json),
    }

    Ok(())
}
