// ABOUTME: Main entry point for the code-walk program.
// ABOUTME: Provides CLI interface for showing, presenting and publishing walkthroughs.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use codewalk::{Command, Config, Outcome, RenderConfig, WatchConfig, Walkthrough};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a single step of a walkthrough
    Show(ShowArgs),

    /// Step through a walkthrough interactively
    Present(PresentArgs),

    /// Generate an HTML deck from walkthrough scripts
    Html(HtmlArgs),

    /// Regenerate the HTML deck whenever scripts or sources change
    Watch(WatchArgs),
}

#[derive(Args)]
struct DisplayArgs {
    /// Lines of context around the highlighted range
    #[arg(long)]
    context: Option<usize>,

    /// Hide line numbers
    #[arg(long)]
    no_numbers: bool,

    /// Highlight with ANSI colors
    #[arg(long)]
    color: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Path to the walkthrough script
    script: PathBuf,

    /// Step to show, counting from 1
    #[arg(short, long, default_value_t = 1)]
    step: i64,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Args)]
struct PresentArgs {
    /// Path to the walkthrough script
    script: PathBuf,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceMode {
    Embed,
    Link,
}

#[derive(Args)]
struct DeckArgs {
    /// Walkthrough scripts or glob patterns, in deck order
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<String>,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Option<Vec<String>>,

    /// Mode for CSS/JS: 'embed' to embed content or 'link' to reference
    #[arg(long, value_enum)]
    mode: Option<ResourceMode>,
}

#[derive(Args)]
struct HtmlArgs {
    #[command(flatten)]
    deck: DeckArgs,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    deck: DeckArgs,

    /// Serve the deck over HTTP
    #[arg(long)]
    serve: bool,

    /// Port for the preview server
    #[arg(long)]
    port: Option<u16>,

    /// Debounce time for file events in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

impl DisplayArgs {
    fn render_config(&self, config: &Config) -> RenderConfig {
        config.get_render_config(self.context, Some(!self.no_numbers), Some(self.color))
    }
}

impl DeckArgs {
    fn html_config(&self, config: &Config) -> codewalk::HtmlConfig {
        config.get_html_config(
            self.title.clone(),
            self.css.clone(),
            self.js.clone(),
            self.mode.map(|m| matches!(m, ResourceMode::Embed)),
        )
    }
}

fn show(args: &ShowArgs, config: &Config) -> anyhow::Result<()> {
    let mut walkthrough = Walkthrough::load(&args.script, config)?;
    codewalk::apply(&mut walkthrough.stepper, Command::Jump(args.step))?;
    print!(
        "{}",
        codewalk::render_step(&walkthrough.stepper, &args.display.render_config(config))
    );
    Ok(())
}

fn present(args: &PresentArgs, config: &Config) -> anyhow::Result<()> {
    let mut walkthrough = Walkthrough::load(&args.script, config)?;
    let render_config = args.display.render_config(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if !walkthrough.title.is_empty() {
        println!("{}", walkthrough.title);
    }
    print!("{}", codewalk::render_step(&walkthrough.stepper, &render_config));

    loop {
        print!("step> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }

        let outcome = Command::parse(&line)
            .and_then(|command| codewalk::apply(&mut walkthrough.stepper, command));
        match outcome {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Help) => println!("{}", codewalk::control::HELP),
            Ok(Outcome::Unchanged) => {
                let position = walkthrough.stepper.current_index().map_or(0, |i| i + 1);
                println!("(still at step {}/{})", position, walkthrough.stepper.len());
            }
            Ok(Outcome::Moved) | Ok(Outcome::Redraw) => {
                print!("{}", codewalk::render_step(&walkthrough.stepper, &render_config));
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn html(args: &HtmlArgs, config: &Config) -> anyhow::Result<()> {
    let scripts = codewalk::utils::expand_inputs(&args.deck.input)?;
    let walkthroughs = scripts
        .iter()
        .map(|path| Walkthrough::load(path, config))
        .collect::<codewalk::Result<Vec<_>>>()?;

    let html_content = codewalk::generate_html(&walkthroughs, &args.deck.html_config(config))?;
    codewalk::write_html_to_file(&html_content, &args.deck.output)
        .with_context(|| format!("Failed to write output file {:?}", args.deck.output))?;

    println!("HTML generated successfully: {:?}", args.deck.output);
    Ok(())
}

fn watch(args: &WatchArgs, config: &Config) -> anyhow::Result<()> {
    let watch_config = WatchConfig {
        script_paths: codewalk::utils::expand_inputs(&args.deck.input)?,
        html_output: args.deck.output.clone(),
        html: args.deck.html_config(config),
        debounce_ms: args.debounce_ms,
        serve: args.serve,
        port: args.port.unwrap_or(config.port),
    };
    codewalk::watch_scripts(watch_config, config)?;
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    match &cli.command {
        Some(Commands::Show(args)) => show(args, &config),
        Some(Commands::Present(args)) => present(args, &config),
        Some(Commands::Html(args)) => {
            info!("Executing html command...");
            html(args, &config)
        }
        Some(Commands::Watch(args)) => {
            info!("Executing watch command...");
            watch(args, &config)
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
