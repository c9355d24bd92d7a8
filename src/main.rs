mod cli;
mod output;

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use xliff_workspace::model::{FileIdentity, TranslationGroup};
use xliff_workspace::{
    WorkspaceConfig, WorkspaceIndex, WorkspaceWatcher, apply_event, files, scan_with_config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan { path, json } => {
            let config = WorkspaceConfig::load(&path);
            let scan = scan_with_config(&path, &config)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            output::print_scan(&scan, json);
        }

        Commands::Watch { path, json } => {
            // notify may report canonical paths; the index must use the same form.
            let root = path
                .canonicalize()
                .with_context(|| format!("workspace root not found: {}", path.display()))?;
            watch(&root, json).await?;
        }

        Commands::AddLanguage { source, language } => {
            let group = group_of_source(&source)?;
            let created = files::add_language(&group, &language).with_context(|| {
                format!("failed to add language {language} to {}", source.display())
            })?;
            println!("Created {}", created.display());
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "xliff_workspace=debug,xliff_ws=debug"
    } else {
        "xliff_workspace=info,xliff_ws=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn watch(root: &Path, json: bool) -> Result<()> {
    let config = WorkspaceConfig::load(root);
    let scan = scan_with_config(root, &config)
        .with_context(|| format!("failed to scan {}", root.display()))?;
    if !json {
        output::print_scan(&scan, false);
    }

    let mut index = WorkspaceIndex::from_scan_with_config(scan, config.clone());
    let (watcher, mut events) = WorkspaceWatcher::new(root, config);
    watcher
        .start()
        .with_context(|| format!("failed to watch {}", root.display()))?;
    info!(
        root = %root.display(),
        directories = watcher.watched_directories().len(),
        "watching for changes, press Ctrl-C to stop"
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let changed = apply_event(&mut index, &event);
                if !changed {
                    debug!(path = %event.path().display(), "event did not change the index");
                }
                output::print_event(&event, &index, json);
            }
            signal = &mut ctrl_c => {
                signal.context("failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    watcher.stop();
    info!(
        groups = index.len(),
        files = index.total_files(),
        "watcher stopped"
    );
    Ok(())
}

/// Build the translation group a source file belongs to, from its directory
/// alone. Only the file itself is needed to derive the new variant.
fn group_of_source(source: &Path) -> Result<TranslationGroup> {
    if !source.is_file() {
        bail!("source file not found: {}", source.display());
    }
    let Some(file) = FileIdentity::from_path(source) else {
        bail!("not a valid file name: {}", source.display());
    };
    if !xliff_workspace::naming::is_localization_file(source) {
        bail!("not a localization file: {}", source.display());
    }

    let root = file.directory.clone();
    let mut group = TranslationGroup::new(file.group_key(), &root);
    group.insert(file);
    Ok(group)
}
