use interior_ai_core::{
    config::Config,
    init,
    ImageEditor,
    InteriorAi,
    ProcessingStatus,
};
use anyhow::{bail, Context, Result};
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Redesign a room photo with Gemini", long_about = None)]
struct Args {
    /// Photo of the room to redesign
    image: PathBuf,

    /// Describe the changes, e.g. "paint the walls sage green"
    #[arg(trailing_var_arg = true)]
    prompt: Vec<String>,

    /// Override the model defined in .env
    #[arg(short, long)]
    model: Option<String>,

    /// Directory the generated design is saved into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also print the result as a data URL
    #[arg(long, default_value_t = false)]
    print_data_url: bool,

    /// Print the final state and result record as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    init();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    tracing::debug!(?args, "parsed arguments");

    // Load config and override model if specified via CLI
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(m) = args.model {
        config.model_name = m;
    }

    let mut app = InteriorAi::with_config(config).context("Failed to initialize Gemini client")?;

    // A non-image file is rejected before anything is sent
    if let Err(e) = app.studio_mut().select_file(&args.image) {
        bail!("{}: {}", args.image.display(), e);
    }

    // If prompt was empty, ask now
    let mut prompt_text = args.prompt.join(" ");
    if prompt_text.trim().is_empty() {
        print!("Describe the changes: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        prompt_text = input.trim().to_string();
    }
    app.studio_mut().set_prompt(prompt_text);

    if !app.studio().can_generate() {
        bail!("A non-empty description of the changes is required");
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.green} {msg}")?
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let model = app.studio().editor().model_name().to_string();
    let state = app
        .studio_mut()
        .generate_with_progress(|stage| spinner.set_message(format!("{} ({})", stage.message(), model)))
        .await?
        .clone();

    spinner.finish_and_clear();

    if args.json {
        println!("{}", app.studio().session().to_json()?);
    }

    match state.status {
        ProcessingStatus::Success => {
            let path = app.save_result(&args.output_dir).context("Failed to save generated design")?;
            eprintln!("Saved design to {}", path.display());

            if args.print_data_url {
                if let Some(generated) = app.studio().session().generated() {
                    println!("{}", generated.edited_image);
                }
            }
        }
        _ => bail!("{}", state.message.unwrap_or_default()),
    }

    Ok(())
}
