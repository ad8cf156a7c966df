use clap::{CommandFactory, Parser};
use snapback::browser::RenderSession;
use snapback::config::Config;
use snapback::server::StaticServer;
use snapback::{capture, compress, discover, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapback")]
#[command(about = "Element screenshots of local HTML trees, compressed to a size budget")]
#[command(long_about = "\
Element screenshots of local HTML trees, compressed to a size budget

Every directory under DIRECTORY that contains the index file (default
index.html) is rendered in headless Chrome, the selected element is
screenshotted, and the captures are re-encoded in rounds of decaying
quality until each fits under the target size.

Directory structure:

  sites/
  ├── landing/
  │   ├── index.html               # captured → sites/backup_landing.jpg
  │   └── style.css
  ├── pricing/
  │   └── index.html               # captured → sites/backup_pricing.jpg
  └── drafts/
      └── notes.txt                # no index file — skipped

Compressed copies land in an optimized/ folder next to the captures.

The output template accepts {folder}, {quality}, {index}, {selector} and
{wait}; it resolves relative to each index file's directory, so the
default ../backup_{folder}.jpg places captures beside their folders.")]
#[command(version)]
struct Cli {
    /// Root directory to scan for index files
    directory: Option<PathBuf>,

    /// Index file name to search for
    #[arg(short = 'i', long = "index", default_value = "index.html")]
    index: String,

    /// CSS selector of the element to capture
    #[arg(short = 'e', long = "el", default_value = "#container")]
    el: String,

    /// Output filename template, relative to each index file's directory
    #[arg(short = 'o', long = "output", default_value = "../backup_{folder}.jpg")]
    output: String,

    /// Settle seconds between navigation and screenshot
    #[arg(short = 'w', long = "wait", default_value_t = 0.1)]
    wait: f64,

    /// Device pixel scale factor
    #[arg(short = 's', long = "scale", default_value_t = 1.0)]
    scale: f64,

    /// Target file size in kilobytes
    #[arg(short = 't', long = "targetsize", default_value_t = 40)]
    targetsize: u64,

    /// Starting encode quality (0-100)
    #[arg(short = 'q', long = "quality", default_value_t = 100.0)]
    quality: f64,

    /// Local HTTP server port
    #[arg(short = 'p', long = "port", default_value_t = 9181)]
    port: u16,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            index_name: self.index,
            selector: self.el,
            output_template: self.output,
            wait_secs: self.wait,
            scale: self.scale,
            target_bytes: self.targetsize * 1024,
            quality: self.quality,
            port: self.port,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Bare invocation is a help request, not an error.
    let Some(root) = cli.directory.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = cli.into_config();
    // Bad flags must abort before a port is bound or Chrome is launched.
    config.validate()?;

    let targets = discover::discover(&root, &config)?;
    if targets.is_empty() {
        println!("No {} files found under {}", config.index_name, root.display());
        println!("DONE");
        return Ok(());
    }

    println!("==> Capturing {} pages", targets.len());
    let results = {
        // Server and session live exactly as long as the batch; both release
        // on success and on any error below.
        let _server = StaticServer::serve(&root, config.port)?;
        let session = RenderSession::new(&config)?;
        capture::capture_all(&session, &targets, &config)?
    };

    println!("==> Compressing {} captures", results.len());
    let outcome = compress::optimize(&results, &config)?;
    output::print_summary(&outcome, config.target_bytes);

    println!("DONE");
    Ok(())
}
