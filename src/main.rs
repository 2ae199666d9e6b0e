//! Galtag CLI application entry point
//!
//! Builds a gallery collection from files, directory scans, index searches or
//! download logs, prints it, and forwards tag operations to the remote index.
//!
//! # Usage
//!
//! ```bash
//! # Load a directory recursively and show only matching records
//! galtag dir ~/Pictures -r --filter sunset
//!
//! # Tag records 0 to 3 and 7 of a search result
//! galtag search beach --select 0-3,7 --tag-selected summer
//!
//! # Boolean tag search
//! galtag advanced --with cat --without blurry
//!
//! # Quiet mode (only output results)
//! galtag -q tags cat
//! ```
//!
//! # Configuration
//!
//! On first run a default configuration is written to the user's config
//! directory (`~/.config/galtag/config.toml` on Linux).

use std::sync::Arc;

use colored::Colorize;
use galtag::{
    GalleryError, LoadOutcome,
    cli::{Cli, Commands, SelectSpec, SelectStep, ViewArgs, path_str, path_strings},
    client::{CommandClient, HttpTransport, QueryClient},
    config::GalleryConfig,
    fs::{FileSystem, LocalFs},
    gallery::GalleryStore,
    logging, output,
    picker::PromptPicker,
    resolver::PathResolver,
    tags::TagStore,
};
use tracing::warn;

type Result<T> = std::result::Result<T, GalleryError>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();
    if let Err(e) = run(cli).await {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GalleryConfig::load_from(path)?,
        None => GalleryConfig::load()?,
    };
    logging::init(&config.log_level)?;
    let quiet = cli.quiet || config.quiet;

    let client = Arc::new(CommandClient::new(HttpTransport::new(&config.endpoint)?));
    let resolver = PathResolver::new(&config.asset_protocol)?;
    let store = GalleryStore::new(Arc::clone(&client), LocalFs, resolver)
        .with_options(config.gallery_options());
    let tags = TagStore::connect(client).await;
    let picker = PromptPicker::new();

    let outcome = match &cli.command {
        Commands::Open { file: Some(file), .. } => store.load_file(path_str(file)?).await?,
        Commands::Open { file: None, .. } => store.open_file(&picker).await?,
        Commands::Dir {
            dir: Some(dir),
            recursive,
            ..
        } => {
            let dir = path_str(dir)?;
            if *recursive {
                store.load_dir_recursive(dir).await?
            } else {
                store.load_dir(dir).await?
            }
        }
        Commands::Dir {
            dir: None,
            recursive,
            ..
        } => {
            if *recursive {
                store.open_dir_recursive(&picker).await?
            } else {
                store.open_dir(&picker).await?
            }
        }
        Commands::Search { text, .. } => store.search(text).await?,
        Commands::Tags { tags, .. } => store.search_by_tags(tags).await?,
        Commands::Advanced { with, without, .. } => {
            store.search_by_tags_advanced(with, without).await?
        }
        Commands::Import { file: Some(file), .. } => store.import_log(path_str(file)?).await?,
        Commands::Import { file: None, .. } => store.open_import_log(&picker).await?,
        command => return run_tag_command(command, &store, &tags, &config, quiet).await,
    };

    if let Some(view) = cli.command.view() {
        show(&store, &tags, outcome, view, quiet).await?;
    }
    Ok(())
}

/// Commands that do not print a collection
async fn run_tag_command<C, F>(
    command: &Commands,
    store: &GalleryStore<C, F>,
    tags: &TagStore<C>,
    config: &GalleryConfig,
    quiet: bool,
) -> Result<()>
where
    C: QueryClient,
    F: FileSystem,
{
    match command {
        Commands::Save { dir, recursive } => {
            let dir = path_str(dir)?;
            if *recursive {
                store.load_dir_recursive(dir).await?;
            } else {
                store.load_dir(dir).await?;
            }
            let confirmation = store.save().await?;
            if !quiet {
                println!("{} {confirmation}", "✓".green());
            }
        }
        Commands::TagList => {
            tags.refresh().await?;
            println!("{}", output::tag_list(&tags.tags(), quiet));
        }
        Commands::TagCreate { name } => {
            tags.create(name).await?;
            if !quiet {
                println!("{} Created tag '{}'", "✓".green(), name.cyan());
                println!("{}", output::tag_list(&tags.tags(), quiet));
            }
        }
        Commands::TagAll { tag, paths } => {
            let summary = tags.bulk_tag(tag, &path_strings(paths)?).await;
            if !quiet {
                summary.print("Tag");
            }
        }
        Commands::UntagAll { tag, paths } => {
            let summary = tags.bulk_untag(tag, &path_strings(paths)?).await;
            if !quiet {
                summary.print("Untag");
            }
        }
        Commands::AutoTag {
            tag,
            paths,
            lenient,
        } => {
            let strict = config.strict_auto_tag && !lenient;
            tags.auto_tag(tag, &path_strings(paths)?, strict).await?;
            if !quiet {
                println!("{} Auto-tag '{}' requested", "✓".green(), tag.cyan());
            }
        }
        Commands::Suggest { path } => {
            let suggested = tags.suggest_tags(path_str(path)?).await?;
            println!("{}", output::tag_list(&suggested, quiet));
        }
        Commands::Params { path } => {
            println!("{}", tags.parameters_of(path_str(path)?).await?);
        }
        _ => {
            return Err(GalleryError::InvalidInput(
                "not a tag command".to_string(),
            ));
        }
    }
    Ok(())
}

/// Apply view options to a freshly loaded collection and print it
async fn show<C, F>(
    store: &GalleryStore<C, F>,
    tags: &TagStore<C>,
    outcome: LoadOutcome,
    view: &ViewArgs,
    quiet: bool,
) -> Result<()>
where
    C: QueryClient,
    F: FileSystem,
{
    match outcome {
        LoadOutcome::Cancelled => {
            if !quiet {
                println!("{}", "Cancelled.".yellow());
            }
            return Ok(());
        }
        LoadOutcome::Superseded => {
            warn!("load was superseded by a newer one");
        }
        LoadOutcome::Replaced { dropped, .. } if dropped > 0 && !quiet => {
            eprintln!("{} {dropped} path(s) could not be resolved", "⚠".yellow());
        }
        LoadOutcome::Replaced { .. } => {}
    }

    if let Some(filter) = &view.filter {
        store.set_filter(filter);
    }
    if let Some(spec) = &view.select {
        apply_selection(store, spec)?;
    }

    output::print_state(&store.snapshot(), quiet);

    if let Some(tag) = &view.tag_selected {
        let summary = tags.bulk_tag(tag, &store.selected_paths()).await;
        if !quiet {
            summary.print("Tag");
        }
    }
    Ok(())
}

/// First step is a plain or shift click, later steps are ctrl clicks
fn apply_selection<C, F>(store: &GalleryStore<C, F>, spec: &SelectSpec) -> Result<()>
where
    C: QueryClient,
    F: FileSystem,
{
    for (n, step) in spec.0.iter().enumerate() {
        match (n, *step) {
            (0, SelectStep::One(index)) => store.select_single(index)?,
            (0, SelectStep::Range(from, to)) => {
                store.select_single(from)?;
                store.extend_range(to)?;
            }
            (_, SelectStep::One(index)) => store.toggle(index)?,
            (_, SelectStep::Range(from, to)) => {
                for index in from.min(to)..=from.max(to) {
                    store.toggle(index)?;
                }
            }
        }
    }
    Ok(())
}
