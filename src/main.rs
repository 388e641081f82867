use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use imagemark::export::{ExportDependencies, ServeMode, WaylandClipboard};
use imagemark::notification::{DesktopNotifier, LogObserver, UiObserver};
use imagemark::{Annotator, Collaborators, Config, ImageFile, Script, ShareOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "imagemark")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("IMAGEMARK_GIT_HASH"), ")"),
    about = "Annotate images with pen, highlighter and eraser, then save or share the result"
)]
struct Cli {
    /// Images to upload; the first one that loads is shown
    #[arg(value_name = "IMAGE")]
    images: Vec<PathBuf>,

    /// TOML script of actions to replay after the upload
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Directory to download the annotation into (overrides config)
    #[arg(long, short = 'o', value_name = "DIR")]
    output: Option<PathBuf>,

    /// Copy the annotation to the clipboard instead of downloading it
    #[arg(long, action = ArgAction::SetTrue)]
    share: bool,

    /// Show notices as desktop notifications
    #[arg(long, action = ArgAction::SetTrue)]
    notify: bool,

    /// Use this config file instead of the default location
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["images", "script"])]
    init_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    if cli.images.is_empty() && cli.script.is_none() {
        bail!("Nothing to annotate: pass one or more images or --script <FILE>");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.output {
        config.export.download_directory = dir.to_string_lossy().into_owned();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let notifier = cli
        .notify
        .then(|| Arc::new(DesktopNotifier::new(runtime.handle().clone())));
    let observer: Arc<dyn UiObserver> = match &notifier {
        Some(notifier) => notifier.clone(),
        None => Arc::new(LogObserver),
    };
    // The process exits right after sharing, so an in-process clipboard
    // offer has to be served before returning.
    let export = ExportDependencies {
        clipboard: Arc::new(WaylandClipboard {
            mode: ServeMode::Foreground,
        }),
        ..ExportDependencies::default()
    };
    let collaborators = Collaborators {
        export,
        observer,
        ..Collaborators::default()
    };
    let mut annotator = Annotator::with_collaborators(&config, collaborators)?;

    runtime.block_on(async {
        if !cli.images.is_empty() {
            let accepted = annotator.replace_all(cli.images.iter().map(ImageFile::from_path));
            if accepted < cli.images.len() {
                log::warn!(
                    "Skipped {} file(s) that are not images",
                    cli.images.len() - accepted
                );
            }
            annotator.settle_reads().await?;
            match annotator.active_image() {
                Some(record) => log::info!("Showing '{}'", record.name()),
                None => log::warn!("No image could be loaded"),
            }
        }

        if let Some(path) = &cli.script {
            let script = Script::load(path)?;
            let base_dir = path.parent().unwrap_or(Path::new("."));
            imagemark::script::run(&mut annotator, &script, base_dir).await?;
        }

        if cli.share {
            match annotator.share_to_clipboard().await? {
                ShareOutcome::Copied => println!("Copied annotation to clipboard"),
                ShareOutcome::Fallback { path } => {
                    println!("Clipboard unavailable; saved annotation to {}", path.display())
                }
            }
        } else {
            let path = annotator.save().await?;
            println!("Saved annotation to {}", path.display());
        }
        anyhow::Ok(())
    })?;

    if let Some(notifier) = &notifier {
        runtime.block_on(notifier.flush());
    }

    Ok(())
}
