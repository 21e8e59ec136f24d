use clap::{Parser, Subcommand};
use simple_categories::{categories, config, output, site::Site, tags, template::TagRegistry};
use std::path::PathBuf;
use std::sync::Arc;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-categories")]
#[command(about = "Category index pages and a render-time tag for static sites")]
#[command(long_about = "\
Category index pages and a render-time tag for static sites

Every distinct category label across the site's pages gets one index page,
as long as the site has a category_index layout to render it with.

Site structure:

  site/
  ├── config.toml                 # Optional (run 'gen-config' for all keys)
  ├── pages.json                  # [{\"title\", \"url\", \"categories\": [...]}]
  └── _layouts/
      └── category_index.html     # Enables category index pages

Layout variables: {{ title }}, {{ category }}, {{ url }}, {{ page_count }},
{{ pages }}. Tags: {% render_time Rendered at: %}.")]
#[command(version = version_string())]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the category index pages the site would get
    Index,
    /// Print the rendered category index page for one category
    Render {
        /// Category label, exactly as it appears on pages
        category: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Index => {
            let mut site = Site::load(&cli.source)?;
            categories::generate(&mut site);
            output::print_index_output(&site);
        }
        Command::Render { category } => {
            let mut site = Site::load(&cli.source)?;
            categories::generate(&mut site);
            let mut registry = TagRegistry::new();
            tags::register(
                &mut registry,
                &site.config().render_time,
                Arc::new(tags::SystemClock),
            )?;
            print!("{}", site.render_category(&category, &registry)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` directives are honored on top
/// of the verbosity level.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
