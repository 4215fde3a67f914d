use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use marks::app::{App, AppEvent};
use marks::bookmarks::{self, Source};
use marks::config::Config;
use marks::storage::{Database, DatabaseError};
use marks::ui;

/// Get the config directory path (~/.config/marks/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("marks");
    Ok(config_dir)
}

/// Atomically copy a file using write-to-temp-then-rename pattern.
/// This ensures the destination is never left in a partial state.
fn atomic_copy(src: &Path, dst: &Path) -> Result<()> {
    // Randomized temp filename: an attacker cannot predict the path, so
    // cannot place a symlink there between check and create.
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let content = std::fs::read(src).with_context(|| {
        format!(
            "Failed to read source file '{}': check file permissions",
            src.display()
        )
    })?;

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true) // Fails atomically if file exists (prevents symlink race)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions or disk space",
                temp_path.display()
            )
        })?;

    temp_file.write_all(&content).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to write to temporary file '{}': disk may be full",
            temp_path.display()
        )
    })?;

    // Sync to disk to ensure data is persisted before rename
    temp_file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to sync temporary file '{}' to disk: disk may be full",
            temp_path.display()
        )
    })?;

    drop(temp_file);

    // Atomic rename (POSIX guarantees atomicity for rename on same filesystem)
    #[cfg(windows)]
    if dst.exists() {
        std::fs::remove_file(dst).with_context(|| {
            let _ = std::fs::remove_file(&temp_path);
            format!(
                "Failed to remove existing '{}' before atomic replace",
                dst.display()
            )
        })?;
    }

    std::fs::rename(&temp_path, dst).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to rename '{}' to '{}': check permissions",
            temp_path.display(),
            dst.display()
        )
    })?;

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "marks", about = "Terminal browser for exported bookmark files")]
struct Args {
    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Import a bookmarks HTML export (copies to config directory)
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Bookmark source: a local HTML file or an http(s) URL.
    /// Overrides the config file.
    #[arg(long, value_name = "PATH_OR_URL")]
    source: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // Directory is user-only on Unix: it holds browsing data.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config = Config::load(&config_dir.join("config.toml"))?;
    let bookmarks_path = config_dir.join("bookmarks.html");
    let db_path = config_dir.join("marks.db");

    // Handle --import flag
    if let Some(import_file) = &args.import {
        // Canonicalize to resolve symlinks and prevent path traversal
        let canonical_import = import_file
            .canonicalize()
            .with_context(|| format!("Failed to resolve import file: {}", import_file.display()))?;

        let metadata = std::fs::metadata(&canonical_import)?;
        if !metadata.is_file() {
            anyhow::bail!("Import path must be a regular file");
        }

        // Basic shape check: a Netscape bookmark export carries DL/DT markup.
        let content = std::fs::read_to_string(&canonical_import).with_context(|| {
            format!("Failed to read import file: {}", canonical_import.display())
        })?;
        let lowered = content.to_lowercase();
        if !lowered.contains("<dl") && !lowered.contains("<dt") {
            anyhow::bail!("File does not appear to be a bookmarks HTML export");
        }

        // Atomic backup of the existing export before overwriting.
        if bookmarks_path.exists() {
            let backup_name = format!(
                "bookmarks.html.backup.{}",
                Utc::now().format("%Y%m%d_%H%M%S")
            );
            let backup_path = config_dir.join(&backup_name);

            atomic_copy(&bookmarks_path, &backup_path).with_context(|| {
                format!(
                    "Failed to create backup at '{}'. Original file is unchanged.",
                    backup_path.display()
                )
            })?;

            if !backup_path.exists() {
                anyhow::bail!(
                    "Backup verification failed: '{}' was not created. Aborting import to protect existing data.",
                    backup_path.display()
                );
            }
            println!("Backed up existing bookmarks to: {}", backup_path.display());
        }

        atomic_copy(&canonical_import, &bookmarks_path).with_context(|| {
            format!(
                "Failed to import '{}'. If a backup was created, your previous bookmarks are preserved there.",
                canonical_import.display()
            )
        })?;
        println!("Imported bookmarks to: {}", bookmarks_path.display());
    }

    // Handle --reset-db flag
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    // Resolve the bookmark source: CLI flag, then config, then the imported
    // file in the config directory.
    let source_spec = args
        .source
        .or(config.source.clone())
        .unwrap_or_else(|| bookmarks_path.to_string_lossy().into_owned());
    let source = Source::from_spec(&source_spec);

    // Open database
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of marks appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    // Create app state and restore persisted session
    let mut app = App::new(db, &config).context("Failed to create application")?;
    app.restore_persisted()
        .await
        .context("Failed to restore persisted state")?;

    // Load and parse the bookmark source. Failure is reported once and the
    // app starts with an empty store instead of exiting.
    match bookmarks::source::load(&app.http_client, &source).await {
        Ok(store) => {
            tracing::info!(
                source = %source.describe(),
                folders = store.folders().len(),
                bookmarks = store.bookmarks().len(),
                "Loaded bookmarks"
            );
            app.install_store(store);
        }
        Err(e) => {
            tracing::warn!(source = %source.describe(), error = %e, "Failed to load bookmarks");
            app.install_store(Default::default());
            app.set_status(format!("Could not load {}: {}", source.describe(), e));
        }
    }

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
