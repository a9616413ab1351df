mod display;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use docdiff_core::{Category, Config, Explorer, Side, Tier, TreeView};
use docdiff_sync::{FetchError, HttpProvider, PairResolver, load_climate, load_provisions};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docdiff", version, about = "Explore cross-document provision and paragraph alignments")]
struct Cli {
    /// Config file (defaults to ./docdiff.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the API base URL.
    #[arg(long, global = true, env = "DOCDIFF_BASE_URL")]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one side's outline with per-tier counterpart counts.
    Outline {
        /// Side: a, b, slug, or label.
        side: String,
        /// Fuzzy filter over provision ids and titles.
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        expand_all: bool,
    },
    /// Show a provision, its counterparts, and comparison notes.
    Compare {
        id: String,
        /// low, medium, or high (defaults to the highest tier with matches).
        #[arg(long, short)]
        tier: Option<Tier>,
        /// Highlight tab: who, when, where, how, tone, penalty.
        #[arg(long)]
        tab: Option<Category>,
        /// Counterpart id to show comparison notes against.
        #[arg(long)]
        with: Option<String>,
        /// Render provision text as HTML instead of terminal text.
        #[arg(long)]
        html: bool,
    },
    /// Show both climate report columns.
    Climate {
        /// Case-insensitive text filter.
        #[arg(long, short)]
        filter: Option<String>,
        /// Anchor paragraph as `side:para_id`, e.g. `ncr:17`.
        #[arg(long)]
        select: Option<String>,
        /// Print a minimap strip per column (skipped while filtering).
        #[arg(long)]
        minimap: bool,
    },
    /// Look up the counterparts of one paragraph.
    Pairs {
        side: String,
        para_id: String,
        /// Show the detail of the N-th match (0-based).
        #[arg(long)]
        detail: Option<usize>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };
    if let Some(url) = &cli.base_url {
        config.server.base_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let guard = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            guard.cancel();
        }
    });
    token
}

/// Split `side:para_id`.
fn parse_anchor(config: &Config, raw: &str) -> anyhow::Result<(Side, String)> {
    let Some((side, para_id)) = raw.split_once(':') else {
        bail!("expected side:para_id, got '{raw}'");
    };
    let side = config
        .climate
        .parse_side(side)
        .with_context(|| format!("unknown climate side '{side}'"))?;
    Ok((side, para_id.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    tracing::debug!("docdiff v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let provider = HttpProvider::from_config(&config.server).context("building HTTP client")?;
    let cancel = cancel_on_interrupt();

    let result = match &cli.command {
        Command::Outline {
            side,
            search,
            expand_all,
        } => {
            let side = config
                .sides
                .parse_side(side)
                .with_context(|| format!("unknown side '{side}'"))?;
            let snapshot = load_provisions(&provider, &config.sides, &cancel).await;
            snapshot.map(|snapshot| {
                let explorer = Explorer::new(snapshot, config.sides.clone(), config.search.tolerance);
                let term = search.as_deref().unwrap_or("");
                let outline = explorer.outline(side);
                let results = explorer.search_index(side).search(term);
                let mut view = TreeView::new();
                view.set_search(term, results.as_ref(), outline);
                if *expand_all {
                    view.expand_all(outline);
                }
                let rows = view.rows(outline, results.as_ref(), explorer.index(), side);
                display::print_outline(&config.sides.spec(side).label, &rows);
            })
        }
        Command::Compare {
            id,
            tier,
            tab,
            with,
            html,
        } => {
            let snapshot = load_provisions(&provider, &config.sides, &cancel).await;
            match snapshot {
                Ok(snapshot) => {
                    let explorer =
                        Explorer::new(snapshot, config.sides.clone(), config.search.tolerance);
                    let side = explorer
                        .side_of(id)
                        .with_context(|| format!("cannot tell which document '{id}' belongs to"))?;
                    let tier = tier.unwrap_or_else(|| explorer.default_tier(side, id));
                    display::print_provision(&explorer, side, id, tier, *tab, *html);
                    if let Some(other) = with {
                        display::print_comparison(&explorer, id, other, *tab);
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Climate {
            filter,
            select,
            minimap,
        } => {
            let anchor = select
                .as_deref()
                .map(|raw| parse_anchor(&config, raw))
                .transpose()?;
            match load_climate(&provider, &config.climate, &cancel).await {
                Ok(snapshot) => {
                    let mut resolver = PairResolver::new(snapshot, &config.climate);
                    if let Some((side, para_id)) = &anchor {
                        resolver.select(&provider, *side, para_id).await;
                    }
                    let term = filter.as_deref().unwrap_or("");
                    for side in Side::BOTH {
                        display::print_column(&resolver, config.climate.label(side), side, term);
                        if display::minimap_visible(*minimap, term) {
                            display::print_minimap(&resolver.minimap(side));
                        }
                    }
                    if anchor.is_some() {
                        display::print_matches(&resolver, &config.climate);
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Pairs {
            side,
            para_id,
            detail,
        } => {
            let side = config
                .climate
                .parse_side(side)
                .with_context(|| format!("unknown climate side '{side}'"))?;
            match load_climate(&provider, &config.climate, &cancel).await {
                Ok(snapshot) => {
                    let mut resolver = PairResolver::new(snapshot, &config.climate);
                    resolver.select(&provider, side, para_id).await;
                    display::print_matches(&resolver, &config.climate);
                    if let Some(index) = detail {
                        match resolver.detail(*index) {
                            Some(d) => display::print_detail(&d, &config.climate),
                            None => bail!("no match at index {index}"),
                        }
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(FetchError::Aborted) => {
            tracing::info!("cancelled");
            Ok(())
        }
        Err(e) => Err(e).context("failed to load explorer data"),
    }
}
