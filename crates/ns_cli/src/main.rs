use clap::Parser;
use ns_core::config::{Config, OffsetPolicy, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use ns_core::Topic;
use ns_session::{Dashboard, DashboardState, DashboardView};
use ns_web::AppState;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

mod logging;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let too_long = || format!("Duration too long: {}", s);
        let mut total_seconds = 0u64;
        let mut digits = String::new();
        let mut has_number = false;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86_400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            if digits.is_empty() {
                return Err(format!("Missing number before unit {}", c));
            }
            total_seconds = add_part(total_seconds, &digits, unit).ok_or_else(too_long)?;
            digits.clear();
            has_number = true;
        }

        // A trailing bare number counts as seconds
        if !digits.is_empty() {
            total_seconds = add_part(total_seconds, &digits, 1).ok_or_else(too_long)?;
            has_number = true;
        }

        if !has_number {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

fn add_part(total: u64, digits: &str, unit: u64) -> Option<u64> {
    digits.parse::<u64>().ok()?.checked_mul(unit)?.checked_add(total)
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Stock market news with sentiment scores", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, env = "NS_SOURCE", default_value = "google", help = "News source to use. Available sources: google (default), static")]
    source: String,
    #[arg(long, global = true, env = "NS_SOURCE_URL", help = "Override the news search base url")]
    source_url: Option<String>,
    #[arg(long, global = true, env = "NS_MODEL", default_value = "huggingface", help = "Sentiment model to use. Available models: huggingface (default), lexicon")]
    model: String,
    #[arg(long, global = true, help = "Hugging Face model id")]
    model_name: Option<String>,
    #[arg(long, global = true, help = "Override the inference API base url")]
    model_url: Option<String>,
    #[arg(long, global = true, env = "HF_API_TOKEN", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PAGES, help = "Result pages searched per topic")]
    max_pages: usize,
    #[arg(long, global = true, default_value = "requested", help = "How load more advances: requested (page size) or returned (articles received)")]
    offset_policy: OffsetPolicy,
    #[arg(long, global = true, default_value_t = 4, help = "Articles scored at the same time")]
    concurrency: usize,
    #[arg(long, global = true, default_value = "en")]
    lang: String,
    #[arg(long, global = true, default_value = "US")]
    region: String,
    #[arg(long, global = true, env = "NS_LOG", default_value = "info", help = "Log filter, overridden by RUST_LOG")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the web dashboard
    Serve {
        #[arg(long, env = "NS_BIND", default_value = "0.0.0.0:8501")]
        bind: String,
        /// Forget sessions idle for this long (e.g. 1h, 30m, 1h15m30s)
        #[arg(long, default_value = "1h")]
        session_ttl: HumanDuration,
    },
    /// Print scored news for a topic
    Fetch {
        /// Topic slug or name (e.g. stock-market, "Stock Market", ipo)
        topic: Topic,
        /// Pages to show: the first fetch plus pages-1 load more
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Print the dashboard view as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the available topics
    Topics,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        config.source.kind = self.source.clone();
        config.source.base_url = self.source_url.clone();
        config.source.lang = self.lang.clone();
        config.source.region = self.region.clone();
        config.source.max_pages = self.max_pages;
        config.model.kind = self.model.clone();
        config.model.model_name = self.model_name.clone();
        config.model.base_url = self.model_url.clone();
        config.model.api_key = self.api_key.clone();
        config.model.concurrency = self.concurrency;
        config.pager.page_size = self.page_size;
        config.pager.offset_policy = self.offset_policy;
        config
    }
}

fn build_dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    let source = ns_scrapers::create_source(&config.source)?;
    info!("🦗 News source initialized (using {})", source.name());
    let model = ns_inference::create_model(&config.model)?;
    info!("🧠 Sentiment model initialized (using {})", model.name());
    let dashboard = Dashboard::from_config(source, model, config);
    info!(
        "📐 Pages of {} articles, {:?} offsets, scored by {}",
        dashboard.pager().page_size(),
        dashboard.pager().offset_policy(),
        dashboard.annotator().model_name()
    );
    Ok(dashboard)
}

fn print_view(view: &DashboardView) {
    for entry in &view.cards {
        let article = &entry.article;
        println!("{}. {}", entry.number, article.title);
        println!("   Source: {} | Published on: {}", article.media, article.date);
        println!("   Summary: {}", entry.annotation.summary());
        if !article.description.is_empty() {
            println!("   {}", article.description);
        }
        if !article.link.is_empty() {
            println!("   {}", article.link);
        }
        println!();
    }
    if let Some(message) = &view.message {
        println!("ℹ️  {}", message);
    }
}

async fn fetch(config: &Config, topic: Topic, pages: usize, json: bool) -> anyhow::Result<()> {
    let dashboard = build_dashboard(config)?;
    let mut state = dashboard.fetch(DashboardState::default(), topic).await;
    for _ in 1..pages {
        if !state.can_load_more() {
            break;
        }
        state = dashboard.load_more(state).await;
    }

    let view = state.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("❌ Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutting down");
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let dashboard = build_dashboard(&config)?;
    let ttl = Duration::from_secs(config.web.session_ttl_secs);
    let state = AppState::new(dashboard, ttl);
    let evictor = ns_web::spawn_session_evictor(state.sessions.clone(), (ttl / 4).max(Duration::from_secs(1)));

    let served = ns_web::serve(state, &config.web.bind, shutdown_signal()).await;
    evictor.abort();
    served?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);
    let mut config = cli.config();

    match cli.command {
        Commands::Topics => {
            for topic in Topic::ALL {
                println!("{:<16}{}", topic.slug(), topic);
            }
        }
        Commands::Fetch { topic, pages, json } => {
            config.validate()?;
            fetch(&config, topic, pages.max(1), json).await?;
        }
        Commands::Serve { bind, session_ttl } => {
            config.web.bind = bind;
            config.web.session_ttl_secs = session_ttl.0.as_secs();
            config.validate()?;
            info!("💹 Starting Stock Investor News on {}", config.web.bind);
            serve(config).await?;
        }
    }

    Ok(())
}
