//! screen-assist CLI - terminal host for the light switch screen
//!
//! Usage:
//!     screen-assist [OPTIONS]
//!
//! Environment Variables:
//!     OPENAI_API_KEY: API key for the completion endpoint (required)
//!     SCREEN_ASSIST_BASE_URL: API base URL (default: https://api.openai.com/v1)
//!     SCREEN_ASSIST_MODEL: Model name (default: gpt-3.5-turbo)
//!     SCREEN_ASSIST_QUESTION: Question sent with each snapshot
//!     SCREEN_ASSIST_SNAPSHOT_DIR: Directory to save captured snapshots
//!     RUST_LOG: Log filter (default: info)

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use screen_assist::{
    app_content, render, render_text, ApiKey, AskOutcome, AssistantClient, Completion, Intent,
    ModelConfig, ScreenController, ScreenPress, SnapshotSaver, TestRenderer, UiSurface,
    ASK_BUTTON_ID, DEFAULT_QUESTION,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Light switch demo - lets a chat model find and press a button
#[derive(Parser, Debug)]
#[command(name = "screen-assist")]
#[command(about = "Light switch demo - lets a chat model find and press a button")]
#[command(after_help = r#"Examples:
    # Interactive mode
    screen-assist --api-key sk-xxxxx

    # Press the ask button once and exit
    screen-assist --ask

    # Print the snapshot sent to the model
    screen-assist --print-snapshot

    # Use another OpenAI-compatible endpoint
    screen-assist --base-url http://localhost:8000/v1 --model my-model
"#)]
struct Cli {
    /// API base URL
    #[arg(long, env = "SCREEN_ASSIST_BASE_URL", default_value = screen_assist::model::DEFAULT_BASE_URL)]
    base_url: String,

    /// Model name
    #[arg(long, env = "SCREEN_ASSIST_MODEL", default_value = screen_assist::model::DEFAULT_MODEL)]
    model: String,

    /// API key for the completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Question sent with each snapshot
    #[arg(long, env = "SCREEN_ASSIST_QUESTION", default_value = DEFAULT_QUESTION)]
    question: String,

    /// Directory to save captured snapshots (creates a timestamped subdirectory)
    #[arg(long, env = "SCREEN_ASSIST_SNAPSHOT_DIR")]
    snapshot_dir: Option<String>,

    /// Check that the endpoint answers before starting
    #[arg(long)]
    check_api: bool,

    /// Print the snapshot JSON and exit
    #[arg(long)]
    print_snapshot: bool,

    /// Press the ask button once, wait for the reply and exit
    #[arg(long)]
    ask: bool,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Check if the model API is accessible
async fn check_model_api(client: &AssistantClient) -> bool {
    println!("\u{1F50D} Checking model API ({})...", client.config().base_url);

    match client.check_connection().await {
        Ok(()) => {
            println!("\u{2705} Model API check passed!\n");
            true
        }
        Err(e) => {
            println!("\u{274C} Model API check failed: {}", e);
            false
        }
    }
}

fn print_screen(controller: &ScreenController) {
    println!("{}", "=".repeat(50));
    print!("{}", render_text(render(&controller.screen()).root()));
    println!("{}", "=".repeat(50));
}

fn print_intent(intent: &Intent) {
    if let Intent::ShowAlert { title, message } = intent {
        println!("[alert] {}: {}", title, message);
    }
}

fn report_outcome(controller: &ScreenController, result: screen_assist::Result<AskOutcome>) {
    match result {
        Ok(AskOutcome::Pressed { reply, outcome, .. }) => {
            println!("\nAssistant chose: {}", reply);
            print_intent(&outcome.intent);
        }
        Ok(AskOutcome::NoResponse { request_id }) => {
            println!("\nNo response for request {}", request_id);
        }
        Err(e) => {
            error!("Could not act on assistant reply: {}", e);
            println!("\nError: {}", e);
        }
    }
    print_screen(controller);
}

fn report_completion(controller: &mut ScreenController, completion: Completion) {
    let result = controller.apply(completion);
    report_outcome(controller, result);
}

/// Run interactive mode
async fn run_interactive_mode(controller: &mut ScreenController) -> Result<()> {
    println!("\nCommands: ask, press <id>, show, snapshot, quit\n");
    print_screen(controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("\nGoodbye!");
                    break;
                };

                let input = line.trim();
                let (command, arg) = match input.split_once(char::is_whitespace) {
                    Some((command, arg)) => (command, arg.trim()),
                    None => (input, ""),
                };

                match command {
                    "" => continue,
                    "quit" | "exit" | "q" => {
                        println!("Goodbye!");
                        break;
                    }
                    "ask" => press(controller, ASK_BUTTON_ID).await,
                    "press" if !arg.is_empty() => press(controller, arg).await,
                    "show" => print_screen(controller),
                    "snapshot" => match controller.surface().snapshot() {
                        Ok(snapshot) => println!("{}", snapshot.to_pretty_json()?),
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Unknown command: {}", input),
                }
            }
            Some(completion) = controller.next_completion() => {
                println!();
                report_completion(controller, completion);
            }
        }
    }

    Ok(())
}

async fn press(controller: &mut ScreenController, identifier: &str) {
    match controller.press_on_screen(identifier).await {
        Ok(ScreenPress {
            request_id: Some(id),
            ..
        }) => println!("Asked assistant (request {})...", id),
        Ok(ScreenPress { intent, .. }) => print_intent(&intent),
        Err(e) => {
            warn!("Press on {:?} failed: {}", identifier, e);
            println!("Error: {}", e);
        }
    }
}

/// The configured API key, rejecting a missing or blank one
fn require_api_key(key: Option<String>) -> Result<ApiKey> {
    let api_key = ApiKey::from(key.unwrap_or_default());
    if api_key.is_empty() {
        return Err(anyhow!("An API key is required (--api-key or OPENAI_API_KEY)"));
    }
    Ok(api_key)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.quiet);

    let surface = Arc::new(TestRenderer::new(app_content));

    if args.print_snapshot {
        println!("{}", surface.snapshot()?.to_pretty_json()?);
        return Ok(());
    }

    let api_key = require_api_key(args.api_key.clone())?;

    let model_config = ModelConfig::new(&args.base_url, &args.model).with_api_key(api_key);
    let client = AssistantClient::new(model_config);

    if args.check_api && !check_model_api(&client).await {
        std::process::exit(1);
    }

    let mut controller =
        ScreenController::new(Arc::new(client), surface).with_question(&args.question);

    if let Some(dir) = &args.snapshot_dir {
        controller = controller.with_snapshot_saver(SnapshotSaver::new(dir).await?);
    }

    println!("{}", "=".repeat(50));
    println!("Light switch demo");
    println!("Model: {}", args.model);
    println!("Base URL: {}", args.base_url);

    if args.ask {
        let result = controller.ask_and_apply().await;
        report_outcome(&controller, result);
    } else {
        run_interactive_mode(&mut controller).await?;
    }

    Ok(())
}
