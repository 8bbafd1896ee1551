pub mod api;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use clients::metadata::HttpMetadataClient;
pub use config::Config;
use db::Store;
use domain::VideoId;
use models::User;
use services::{
    CatalogQuery, CatalogService, DefaultImportService, ImportService, RoleAuthorizer,
    SeaOrmCatalogService, import_service::parse_import_lines,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "daemon" | "-d" | "--daemon" => run_daemon(config).await,

        "import" => {
            if args.len() < 3 {
                println!("Usage: lokarr import <file>");
                println!("One external video id per line, optional ',subject' override.");
                return Ok(());
            }
            cmd_import(&config, &args[2]).await
        }

        "list" | "ls" | "l" => cmd_list(&config).await,

        "star" => {
            if args.len() < 3 {
                println!("Usage: lokarr star <video_id>");
                println!("Use 'lokarr list' to see IDs");
                return Ok(());
            }
            cmd_star(&config, &args[2]).await
        }

        "subjects" => cmd_subjects(&config).await,

        "init" | "--init" => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Lokarr - Video Translation Workflow Tracker");
    println!("Tracks volunteer translation and review work over a video catalog");
    println!();
    println!("USAGE:");
    println!("  lokarr <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  list, ls          List the catalog with derived statuses");
    println!("  import <file>     Import videos (one external id per line)");
    println!("  star <id>         Toggle the starred flag on a video");
    println!("  subjects          Show the subject vocabulary and catalog usage");
    println!("  daemon            Run the web API");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  lokarr import backlog.txt         # Import a batch of videos");
    println!("  lokarr list                       # Show catalog with statuses");
    println!("  lokarr star 12                    # Prioritize video 12");
    println!("  lokarr daemon                     # Start the API server");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the database, server and metadata source.");
}

fn catalog_service(store: Store) -> SeaOrmCatalogService {
    SeaOrmCatalogService::new(store, Arc::new(RoleAuthorizer))
}

async fn cmd_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let catalog = catalog_service(store);

    let entries = catalog.search(&CatalogQuery::default()).await?;

    if entries.is_empty() {
        println!("The catalog is empty.");
        println!();
        println!("Import videos with: lokarr import <file>");
        return Ok(());
    }

    println!("Catalog ({} videos)", entries.len());
    println!("{:-<70}", "");

    for entry in entries {
        let star = if entry.video.starred { "★" } else { " " };
        println!("{} [{}] {}", star, entry.video.id, entry.video.title);
        println!(
            "    Subject: {} | Status: {}",
            entry.video.subject, entry.status
        );
    }

    println!();
    println!("Legend: ★ Starred");

    Ok(())
}

async fn cmd_import(config: &Config, path: &str) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(path).await?;
    let (rows, parse_errors) = parse_import_lines(&contents);

    if rows.is_empty() && parse_errors.is_empty() {
        println!("Nothing to import in {path}");
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;
    let source = Arc::new(HttpMetadataClient::new(config.metadata.source_url.clone()));
    let importer = DefaultImportService::new(store, source, Arc::new(RoleAuthorizer));

    let operator = User::local_operator();
    let batch: Vec<_> = rows.iter().map(|(_, row)| row.clone()).collect();
    let outcome = importer.import(&batch, &operator).await?;

    println!();
    println!("{:-<70}", "");
    println!("Import complete!");
    println!("  Imported: {}", outcome.imported);

    let failures = parse_errors.len() + outcome.errors.len();
    if failures > 0 {
        println!("  Failed:   {}", failures);
        for err in &parse_errors {
            println!("    line {}: {}", err.row, err.message);
        }
        for err in &outcome.errors {
            // Map batch positions back to the line numbers in the file.
            let line = rows.get(err.row - 1).map_or(err.row, |(line, _)| *line);
            println!("    line {}: {}", line, err.message);
        }
    }

    Ok(())
}

async fn cmd_star(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let id: i32 = match id_str.parse() {
        Ok(id) => id,
        Err(_) => {
            println!("Invalid video ID: {id_str}");
            println!("Use 'lokarr list' to see video IDs.");
            return Ok(());
        }
    };

    let store = Store::new(&config.general.database_path).await?;
    let catalog = catalog_service(store);

    let operator = User::local_operator();
    match catalog.toggle_star(VideoId::new(id), &operator).await {
        Ok(video) => {
            let state = if video.starred { "starred" } else { "unstarred" };
            println!("✓ {}: {}", state, video.title);
        }
        Err(e) => println!("Failed to toggle star: {e}"),
    }

    Ok(())
}

async fn cmd_subjects(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let used = store.distinct_subjects().await?;

    println!("Subject vocabulary:");
    for subject in domain::SUBJECTS {
        let marker = if used.iter().any(|s| s.as_str() == *subject) {
            "•"
        } else {
            " "
        };
        println!("  {marker} {subject}");
    }

    println!();
    println!("Legend: • In use by the catalog");

    Ok(())
}

async fn run_daemon(config: Config) -> anyhow::Result<()> {
    info!(
        "Lokarr v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let state = api::create_app_state_from_config(config.clone()).await?;

    let server_handle: Option<tokio::task::JoinHandle<()>> = if config.server.enabled {
        let port = config.server.port;
        info!("Starting Web API on port {}", port);

        let app = api::router(state).await;
        let addr = format!("0.0.0.0:{port}");
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        Some(tokio::spawn(async move {
            info!("🌐 Web Server running at http://0.0.0.0:{}", port);
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        info!("Server disabled in config; nothing to serve");
        None
    };

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    if let Some(handle) = server_handle {
        handle.abort();
    }
    info!("Daemon stopped");

    Ok(())
}
