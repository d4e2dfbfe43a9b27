use std::fmt;
use std::path::PathBuf;

use roadmap_core::model::TopicId;
use roadmap_core::{EdgeTone, LayoutMode, NodeEmphasis, ValidationMode};
use services::config::parse_width;
use services::{AppConfig, AppServices, IntentOutcome, RoadmapController, RoadmapIntent, RoadmapView};
use storage::StoreLocator;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { command: &'static str, name: &'static str },
    UnknownArg(String),
    InvalidTopicId { raw: String },
    InvalidStore { raw: String, reason: String },
    InvalidWidth { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTopicId { raw } => write!(f, "invalid topic id: {raw}"),
            ArgsError::InvalidStore { raw, reason } => {
                write!(f, "invalid --store value {raw}: {reason}")
            }
            ArgsError::InvalidWidth { raw } => write!(f, "invalid --width value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [show] [--hover <id>] [options]");
    eprintln!("  cargo run -p app -- topic <id> [options]");
    eprintln!("  cargo run -p app -- complete <topic> <video_url> [options]");
    eprintln!("  cargo run -p app -- reset <topic> <video_url> [options]");
    eprintln!("  cargo run -p app -- theme [options]");
    eprintln!("  cargo run -p app -- dismiss-intro [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --store <url>      memory:, file:<path> or sqlite:<url>");
    eprintln!("  --catalog <path>   catalog JSON (topic name -> videos)");
    eprintln!("  --roadmap <path>   roadmap JSON (topics and edges)");
    eprintln!("  --width <px>       viewport width, below 768 uses the mobile layout");
    eprintln!("  --strict           reject edges to unknown topics");
    eprintln!("  --lenient          skip edges to unknown topics with a warning");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --store file:roadmap-state.json");
    eprintln!("  --width 1280");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ROADMAP_STORE, ROADMAP_CATALOG, ROADMAP_GRAPH, ROADMAP_VIEWPORT_WIDTH,");
    eprintln!("  ROADMAP_STRICT, RUST_LOG (default: warn)");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show { hover: Option<TopicId> },
    Topic(TopicId),
    SetCompleted {
        topic: String,
        video_url: String,
        completed: bool,
    },
    Theme,
    DismissIntro,
}

impl Command {
    fn parse(args: &mut Vec<String>) -> Result<Self, ArgsError> {
        let Some(first) = args.first().cloned() else {
            return Ok(Self::Show { hover: None });
        };
        if first.starts_with("--") {
            return Ok(Self::Show {
                hover: take_flag(args, "--hover")?.map(|raw| parse_topic_id(&raw)).transpose()?,
            });
        }
        args.remove(0);

        match first.as_str() {
            "show" => Ok(Self::Show {
                hover: take_flag(args, "--hover")?.map(|raw| parse_topic_id(&raw)).transpose()?,
            }),
            "topic" => {
                let raw = take_operand(args, "topic", "id")?;
                Ok(Self::Topic(parse_topic_id(&raw)?))
            }
            "complete" | "reset" => {
                let command = if first == "complete" { "complete" } else { "reset" };
                let topic = take_operand(args, command, "topic")?;
                let video_url = take_operand(args, command, "video_url")?;
                Ok(Self::SetCompleted {
                    topic,
                    video_url,
                    completed: command == "complete",
                })
            }
            "theme" => Ok(Self::Theme),
            "dismiss-intro" => Ok(Self::DismissIntro),
            _ => Err(ArgsError::UnknownArg(first)),
        }
    }
}

fn take_operand(
    args: &mut Vec<String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    match args.first() {
        Some(value) if !value.starts_with("--") => Ok(args.remove(0)),
        _ => Err(ArgsError::MissingOperand { command, name }),
    }
}

/// Remove `flag <value>` from `args`, wherever it appears.
fn take_flag(args: &mut Vec<String>, flag: &'static str) -> Result<Option<String>, ArgsError> {
    let Some(index) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    args.remove(index);
    if index < args.len() {
        Ok(Some(args.remove(index)))
    } else {
        Err(ArgsError::MissingValue { flag })
    }
}

fn report_usage(err: ArgsError) -> ArgsError {
    eprintln!("{err}");
    print_usage();
    err
}

fn parse_topic_id(raw: &str) -> Result<TopicId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidTopicId {
        raw: raw.to_owned(),
    })
}

/// Apply command-line overrides on top of the environment configuration.
fn apply_flags(
    mut config: AppConfig,
    args: &mut impl Iterator<Item = String>,
) -> Result<AppConfig, ArgsError> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => {
                let value = require_value(args, "--store")?;
                config.store = value
                    .parse::<StoreLocator>()
                    .map_err(|err| ArgsError::InvalidStore {
                        raw: value.clone(),
                        reason: err.to_string(),
                    })?;
            }
            "--catalog" => config.catalog_path = Some(PathBuf::from(require_value(args, "--catalog")?)),
            "--roadmap" => config.roadmap_path = Some(PathBuf::from(require_value(args, "--roadmap")?)),
            "--width" => {
                let value = require_value(args, "--width")?;
                config.viewport_width =
                    parse_width(&value).map_err(|_| ArgsError::InvalidWidth { raw: value })?;
            }
            "--strict" => config.validation = ValidationMode::Strict,
            "--lenient" => config.validation = ValidationMode::Lenient,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(config)
}

/// `sqlx` does not create missing database files; file-backed stores get
/// their parent directory created up front.
fn prepare_store(locator: &StoreLocator) -> std::io::Result<()> {
    let path = match locator {
        StoreLocator::Memory => return Ok(()),
        StoreLocator::JsonFile(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            return Ok(());
        }
        StoreLocator::Sqlite(url) => {
            let rest = url.strip_prefix("sqlite:").unwrap_or(url);
            let rest = rest.strip_prefix("//").unwrap_or(rest);
            if rest.is_empty() || rest.starts_with(':') || rest.starts_with("file:") {
                return Ok(());
            }
            PathBuf::from(rest.split('?').next().unwrap_or(rest))
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
    }
    Ok(())
}

fn render_roadmap(view: &RoadmapView) {
    println!("Machine Learning Prerequisites ({:?}, {:?})", view.layout, view.theme);
    if view.intro_visible {
        println!("Click a topic to see its videos. Run `dismiss-intro` to hide this note.");
    }
    println!("{}", view.hint);
    println!("Overall progress: {}", view.overall);
    println!();

    for (index, node) in view.nodes.iter().enumerate() {
        let marker = match node.emphasis {
            NodeEmphasis::Full => ' ',
            NodeEmphasis::Dimmed => '.',
        };
        let placement = match view.layout {
            LayoutMode::Desktop => {
                format!(" @ ({:.0}%, {:.0}%)", node.position.x(), node.position.y())
            }
            LayoutMode::Mobile => String::new(),
        };
        println!(
            "{marker}{:>2}. [{}] {:<28} {:>4}  {}/{} videos{placement}",
            index + 1,
            node.id,
            node.name,
            node.percent.to_string(),
            node.completed,
            node.total,
        );
    }

    if !view.edges.is_empty() {
        println!();
        for edge in &view.edges {
            let arrow = match edge.tone {
                EdgeTone::Active => "==>",
                EdgeTone::Inactive => "..>",
                EdgeTone::Default => "-->",
            };
            println!("  {} {arrow} {}  {}", edge.from, edge.to, edge.color);
        }
    }
}

fn render_topic(controller: &RoadmapController, id: TopicId) {
    let Some(detail) = controller.topic_detail(id) else {
        eprintln!("no topic with id {id}");
        return;
    };
    println!("{} ({})", detail.name, detail.percent);
    if detail.videos.is_empty() {
        println!("  No videos yet.");
    }
    for row in &detail.videos {
        let check = if row.completed { 'x' } else { ' ' };
        println!("  [{check}] {}  {}", row.title, row.url);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    if matches!(argv.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let command = Command::parse(&mut argv).map_err(report_usage)?;
    let config = apply_flags(AppConfig::from_env()?, &mut argv.into_iter()).map_err(report_usage)?;
    debug!(?command, store = %config.store, "starting");

    prepare_store(&config.store)?;
    let services = AppServices::open(&config).await?;
    let mut controller = services.controller().await;

    match command {
        Command::Show { hover } => {
            if let Some(id) = hover {
                controller.dispatch(RoadmapIntent::PointerEnter(id)).await;
            }
            render_roadmap(&controller.snapshot());
        }
        Command::Topic(id) => {
            controller.dispatch(RoadmapIntent::SelectTopic(id)).await;
            render_topic(&controller, id);
        }
        Command::SetCompleted {
            topic,
            video_url,
            completed,
        } => {
            let intent = RoadmapIntent::SetVideoCompleted {
                topic: topic.clone(),
                video_url: video_url.clone(),
                completed,
            };
            match controller.dispatch(intent).await {
                IntentOutcome::Progress(update) => {
                    println!(
                        "{topic}: {} (overall {})",
                        update.topic_percent, update.overall
                    );
                    if !update.persisted {
                        eprintln!("warning: progress could not be saved");
                    }
                }
                _ => eprintln!("{video_url} is not a video of {topic}"),
            }
        }
        Command::Theme => {
            controller.dispatch(RoadmapIntent::ToggleTheme).await;
            println!("theme: {:?}", controller.theme());
        }
        Command::DismissIntro => {
            controller.dispatch(RoadmapIntent::DismissIntro).await;
            println!("intro: {}", controller.intro().as_str());
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
