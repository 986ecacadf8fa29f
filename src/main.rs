use clap::{Parser, Subcommand};
use quire::{config, generate, index, output, serve, site::Site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("QUIRE_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("QUIRE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Multilingual Markdown blog: static build and dev server")]
#[command(long_about = "\
Multilingual Markdown blog: static build and dev server

One directory per language, one Markdown file per article. The file name is
the URL slug; front-matter carries the rest.

Content structure:

  my-blog/
  ├── config.toml                  # Site config (optional)
  └── articles/
      ├── en/
      │   ├── hello-world.md       # → /en/hello-world
      │   └── on-reading.md
      ├── zh/
      │   └── ni-hao.md            # translationId links it to hello-world
      └── ja/

Front-matter:

  ---
  title: Hello World               # required
  date: 2024-05-01                 # required, YYYY-MM-DD
  category: Essays                 # optional, default \"Uncategorized\"
  translationId: hello             # optional, shared by all translations
  ---

Footnotes ([^1] ... [^1]: text) render as hover tooltips.

Run 'quire gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site directory (holds config.toml and the articles directory)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory for `build`
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page into the output directory
    Build,
    /// Serve pages on demand, rendering each request
    Serve {
        /// Bind address (default from [serve] host)
        #[arg(long)]
        host: Option<String>,
        /// Port (default from [serve] port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate every article's front-matter without building
    Check,
    /// Print the article index as JSON
    Index,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let site = Site::open(&cli.source)?;
            println!("==> Building {} → {}", site.root().display(), cli.output.display());
            let summary = generate::generate(&site, &cli.output)?;
            output::print_build_output(&summary);
            if !summary.failed.is_empty() {
                return Err(format!("{} article page(s) failed", summary.failed.len()).into());
            }
        }
        Command::Serve { host, port } => {
            let site = Site::open(&cli.source)?;
            let host = host.unwrap_or_else(|| site.config().serve.host.clone());
            let port = port.unwrap_or(site.config().serve.port);
            serve::serve(&site, &host, port)?;
        }
        Command::Check => {
            let site = Site::open(&cli.source)?;
            let articles_root = site.index().articles_root().to_path_buf();
            println!("==> Checking {}", articles_root.display());
            let report = index::scan_articles(&articles_root, &site.config().languages)?;
            output::print_check_output(&report, site.config(), &articles_root);
            if !report.rejected.is_empty() {
                let count = report.rejected.len();
                return Err(format!("{count} article(s) have invalid metadata").into());
            }
            println!("==> Content is valid");
        }
        Command::Index => {
            let site = Site::open(&cli.source)?;
            let articles = site.index().articles()?;
            println!("{}", serde_json::to_string_pretty(articles.as_slice())?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `info` by default, `debug` with `-v`; `RUST_LOG` wins when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "quire=debug" } else { "quire=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
