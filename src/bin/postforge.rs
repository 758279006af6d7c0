//! CLI binary for postforge.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig` / `FormFields` and prints the rendered result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use postforge::export::{self, SavedImage};
use postforge::preferences::{self, FilePreferenceStore, PreferenceStore, Theme};
use postforge::{
    clipboard, messages, present, BodyEncoding, Client, ClientConfig, FormFields, Platform,
    PostforgeError, Rendered, SubmissionObserver, UiState, VideoAttachment,
};
use std::io::{self, IsTerminal, Read, Write};
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Spinner that mirrors the form's button and loader while a submission runs.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar })
    }
}

impl SubmissionObserver for SpinnerObserver {
    fn on_state(&self, state: &UiState) {
        let view = postforge::view(state);
        match state {
            UiState::Submitting { .. } => {
                self.bar.set_prefix(view.button_label);
                self.bar.set_message(view.loader.unwrap_or_default());
                self.bar.enable_steady_tick(Duration::from_millis(80));
            }
            UiState::Success => {
                self.bar.finish_and_clear();
                eprintln!("{} {}", green("✔"), bold(&view.status));
            }
            UiState::Failed { .. } => {
                self.bar.finish_and_clear();
                eprintln!("{} {}", red("✘"), view.status);
            }
            UiState::Idle => {}
        }
    }

    fn on_sending(&self, label: &str) {
        self.bar.set_prefix(label.to_string());
    }
}

/// A submission failure the spinner has already printed.
#[derive(Debug)]
struct Reported(PostforgeError);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Reported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Wrap a failed submission for `main`, which prints it unless the spinner
/// already did.
fn submit_failure(e: PostforgeError, spinner_shown: bool) -> anyhow::Error {
    if spinner_shown {
        anyhow::Error::new(Reported(e))
    } else {
        let message = e.user_message();
        anyhow::Error::new(e).context(message)
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Text-only brief for two platforms
  postforge submit --topic "Spring collection launch" --platform instagram --platform x

  # Upload a video (platforms optional)
  postforge submit --video clip.mp4 --keywords "behind the scenes"

  # Save an HTML page and the generated image
  postforge submit --topic "Launch" --platform facebook --html out.html --save-images ./images

  # Render a saved webhook answer offline
  postforge render response.json
  curl -s ... | postforge render -

  # Switch the colour theme
  postforge theme toggle

ENVIRONMENT VARIABLES:
  POSTFORGE_ENDPOINT         Webhook URL (default: https://n8n.intelligens.app/webhook/content)
  POSTFORGE_PREFERENCES      Preference file (default: <config dir>/postforge/preferences.json)
  POSTFORGE_CONNECT_TIMEOUT  TCP connect timeout in seconds (default: none)
  RUST_LOG                   Overrides the log filter
"#;

/// Submit content briefs to the automation webhook and render the results.
#[derive(Parser, Debug)]
#[command(
    name = "postforge",
    version,
    about = "Submit content briefs to a social-media automation webhook",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Webhook URL.
    #[arg(long, global = true, env = "POSTFORGE_ENDPOINT")]
    endpoint: Option<String>,

    /// Preference file path.
    #[arg(long, global = true, env = "POSTFORGE_PREFERENCES")]
    preferences: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "POSTFORGE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, global = true, env = "POSTFORGE_QUIET")]
    quiet: bool,

    /// Disable the spinner.
    #[arg(long, global = true, env = "POSTFORGE_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a brief and render the webhook's answer.
    Submit(SubmitArgs),

    /// Render a saved webhook answer (a file, or - for stdin).
    Render {
        input: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show or change the colour theme.
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,
    },
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Topic or brief for the generated posts.
    #[arg(long, env = "POSTFORGE_TOPIC")]
    topic: Option<String>,

    /// Comma-separated keywords.
    #[arg(long, env = "POSTFORGE_KEYWORDS")]
    keywords: Option<String>,

    /// Reference link.
    #[arg(long, env = "POSTFORGE_LINK")]
    link: Option<String>,

    /// Target platform; repeat for several.
    #[arg(short, long = "platform", value_enum)]
    platforms: Vec<PlatformArg>,

    /// Video file to upload (max 100 MB).
    #[arg(long, env = "POSTFORGE_VIDEO")]
    video: Option<PathBuf>,

    /// Send multipart form data even without a video.
    #[arg(long, env = "POSTFORGE_MULTIPART")]
    multipart: bool,

    /// TCP connect timeout in seconds.
    #[arg(long, env = "POSTFORGE_CONNECT_TIMEOUT")]
    connect_timeout: Option<u64>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Print the structured result as JSON instead of text.
    #[arg(long, env = "POSTFORGE_JSON")]
    json: bool,

    /// Also write a standalone HTML page to this file.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Save generated data-URI images into this directory.
    #[arg(long)]
    save_images: Option<PathBuf>,

    /// Copy the text view to the clipboard (OSC 52).
    #[arg(long)]
    copy: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PlatformArg {
    #[value(alias = "ig")]
    Instagram,
    #[value(alias = "twitter")]
    X,
    #[value(alias = "fb")]
    Facebook,
}

impl From<PlatformArg> for Platform {
    fn from(v: PlatformArg) -> Self {
        match v {
            PlatformArg::Instagram => Platform::Instagram,
            PlatformArg::X => Platform::X,
            PlatformArg::Facebook => Platform::Facebook,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are suppressed while the spinner is active.
    let show_progress = !cli.quiet && !cli.no_progress && matches!(cli.command, Command::Submit(_));
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let store = preference_store(&cli)?;

    match cli.command {
        Command::Theme { action } => run_theme(action, &store)?,
        Command::Render { ref input, ref output } => {
            let body = read_input(input).await?;
            let response = postforge::pipeline::transport::parse_body(&body)
                .with_context(|| format!("Failed to parse response from {input}"))?;
            let rendered = postforge::render_detailed(&response);
            let theme = preferences::load_theme(&store);
            emit(&rendered, output, theme, cli.quiet)?
        }
        Command::Submit(ref args) => {
            let rendered = match run_submit(&cli, args, show_progress).await {
                Ok(rendered) => rendered,
                Err(e) if e.is::<Reported>() => return Ok(ExitCode::FAILURE),
                Err(e) => return Err(e),
            };
            let theme = preferences::load_theme(&store);
            emit(&rendered, &args.output, theme, cli.quiet)?
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn preference_store(cli: &Cli) -> Result<FilePreferenceStore> {
    match cli.preferences {
        Some(ref path) => Ok(FilePreferenceStore::new(path)),
        None => FilePreferenceStore::default_location().context("Failed to locate preferences"),
    }
}

fn run_theme(action: ThemeAction, store: &dyn PreferenceStore) -> Result<()> {
    let theme = match action {
        ThemeAction::Show => preferences::load_theme(store),
        ThemeAction::Toggle => preferences::toggle_theme(store).context("Failed to save theme")?,
        ThemeAction::Light => {
            preferences::set_theme(store, Theme::Light).context("Failed to save theme")?
        }
        ThemeAction::Dark => {
            preferences::set_theme(store, Theme::Dark).context("Failed to save theme")?
        }
    };
    println!("{theme}");
    Ok(())
}

/// Map CLI args to a client and submit.
async fn run_submit(cli: &Cli, args: &SubmitArgs, show_progress: bool) -> Result<Rendered> {
    let video = match args.video {
        Some(ref path) => Some(
            VideoAttachment::from_path(path)
                .await
                .with_context(|| format!("Failed to load video {}", path.display()))?,
        ),
        None => None,
    };

    let mut builder = ClientConfig::builder();
    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    if args.multipart {
        builder = builder.body_encoding(BodyEncoding::Multipart);
    }
    if let Some(secs) = args.connect_timeout {
        builder = builder.connect_timeout_secs(secs);
    }
    if show_progress {
        builder = builder.observer(SpinnerObserver::new());
    }
    let config = builder.build().context("Invalid configuration")?;
    let client = Client::new(config).context("Failed to create HTTP client")?;

    let fields = FormFields {
        topic: args.topic.clone(),
        keywords: args.keywords.clone(),
        link: args.link.clone(),
        platforms: args.platforms.iter().copied().map(Platform::from).collect(),
        video,
    };

    match client.submit(fields).await {
        Ok(outcome) => {
            if !cli.quiet && !show_progress {
                eprintln!("{} {}", messages::SUCCESS, dim(&format!("({}ms)", outcome.duration_ms)));
            }
            Ok(outcome.rendered)
        }
        Err(e) => Err(submit_failure(e, show_progress)),
    }
}

async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read response from stdin")?;
        Ok(body)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read {input}"))
    }
}

/// Print the result and run the optional exports.
fn emit(rendered: &Rendered, output: &OutputArgs, theme: Theme, quiet: bool) -> Result<()> {
    let result = &rendered.result;
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if output.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "result": result,
            "diagnostics": rendered.diagnostics,
        }))
        .context("Failed to serialise result")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        let color = handle.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        let text = present::to_text(result, theme, color);
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if let Some(ref path) = output.html {
        export::write_atomic(path, present::to_html(result, theme).as_bytes())
            .context("Failed to write HTML page")?;
        if !quiet {
            eprintln!("{} {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if let Some(ref dir) = output.save_images {
        let saved = export::save_images(result, dir).context("Failed to save images")?;
        if !quiet {
            for image in &saved {
                match image {
                    SavedImage::Written { path, bytes } => eprintln!(
                        "{} {} {}",
                        green("✔"),
                        path.display(),
                        dim(&format!("{bytes} bytes"))
                    ),
                    SavedImage::Remote { url } => eprintln!("{} remote {}", dim("·"), url),
                    SavedImage::Skipped { reason } => eprintln!("{} {}", red("✘"), reason),
                }
            }
            if saved.is_empty() {
                eprintln!("{}", dim("No images to save"));
            }
        }
    }

    if output.copy {
        let text = present::to_text(result, theme, false);
        let copied = match clipboard::sink(handle.is_terminal(), io::stderr().is_terminal()) {
            Some(clipboard::Sink::Stdout) => clipboard::copy_to(&mut handle, &text),
            Some(clipboard::Sink::Stderr) => clipboard::copy_to(&mut io::stderr().lock(), &text),
            None => {
                if !quiet {
                    eprintln!("{}", dim("No terminal attached; clipboard copy skipped"));
                }
                Ok(())
            }
        };
        copied.context("Failed to write clipboard sequence")?;
    }

    Ok(())
}
