use anyhow::{Context, Result};
use citeflag::messaging::{LoggingOpener, Response};
use citeflag::{status_line, Annotator, AnnotatorConfig, SearchChannel, SearchDispatcher, StaticPage};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "citeflag")]
#[command(about = "Flags sentences that assert facts without a nearby citation")]
#[command(version)]
struct Args {
    /// HTML page to scan
    input: PathBuf,

    /// Host name the page was served from (affects banner wording)
    #[arg(long, default_value = "localhost")]
    hostname: String,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Block tag to scan, overriding the configuration
    #[arg(long)]
    tag: Option<String>,

    /// Write the annotated page here
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print flags as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging matches how the host collects component logs
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => AnnotatorConfig::load(path)?,
        None => AnnotatorConfig::default(),
    };
    if let Some(tag) = &args.tag {
        config.block_tag = tag.clone();
    }

    if !args.input.is_file() {
        anyhow::bail!("Input page does not exist: {}", args.input.display());
    }
    let html = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let page = StaticPage::parse_document(&html, args.hostname.clone(), &[config.block_tag.as_str()])?;
    info!("Loaded {} blocks from {}", page.block_count(), args.input.display());

    let (channel, inbox) = SearchChannel::new();
    let dispatcher = tokio::spawn(SearchDispatcher::new(inbox, LoggingOpener).run());

    let mut annotator = Annotator::new(page, config)?.with_search_channel(channel);

    // Drive the component through its command channel like a toolbar would
    let reply = annotator.handle_message(r#"{"action":"scanPage"}"#);
    let response: Option<Response> = reply.as_deref().and_then(|r| serde_json::from_str(r).ok());
    println!("{}", status_line(response.as_ref()));

    if args.json {
        println!("{}", serde_json::to_string_pretty(annotator.flags())?);
    } else {
        for flag in annotator.flags() {
            println!("{}\t{:?}\t{}", flag.block.0, flag.reason, flag.sentence);
        }
    }

    if let Some(output) = &args.output {
        tokio::fs::write(output, annotator.document().to_html())
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Annotated page written to {}", output.display());
    }

    drop(annotator);
    let served = dispatcher.await?;
    info!(served, "Search dispatcher finished");

    Ok(())
}
