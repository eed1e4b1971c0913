use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};
use yansi::Paint;

#[derive(Parser)]
#[command(name = "docnav")]
#[command(
    about = "Build a tree from a miniature markup notation and report where a cursor lands after each navigation instruction."
)]
struct Cli {
    /// Optional files to read, concatenated in order (stdin if none)
    files: Vec<String>,

    /// Output cases as JSON
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Print the parsed tree to stderr before running instructions
    #[arg(short = 't', long = "tree")]
    tree: bool,

    /// Log verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = read_input(&cli.files)?;
    let (document, cases) = docnav::process(&input)?;

    if cli.tree {
        eprint!("{}", document.to_tree());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut handle, &cases).context("failed to write JSON")?;
        writeln!(handle)?;
    } else {
        for case in &cases {
            write!(handle, "{}", case)?;
        }
    }
    handle.flush()?;
    Ok(())
}

fn read_input(files: &[String]) -> Result<String> {
    if files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(input);
    }

    let mut input = String::new();
    for path in files {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
        input.push_str(&contents);
        if !input.is_empty() && !input.ends_with('\n') {
            input.push('\n');
        }
    }
    Ok(input)
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
    tracing::info!(?filter, "logging initialised");
}
