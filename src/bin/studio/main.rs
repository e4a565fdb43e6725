//! Studio CLI
//!
//! Runs a full session end-to-end against the mock generator: sources ideas,
//! approves the first few, drafts a script, generates b-roll prompts, renders
//! clips, and writes the prompt table and clip timeline to disk.
//!
//! Usage:
//!   studio --credential KEY [--approve 2] [--fail-clip 1] [--out ./out]

mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use videostudio::export::{self, PROMPTS_FILE_NAME, TIMELINE_FILE_NAME};
use videostudio::{MockDelays, MockGenerator, PipelineController, Settings, Stage};

#[derive(Parser)]
#[command(
    name = "studio",
    about = "Run an idea-to-video production session with the mock generator",
    version
)]
struct Args {
    /// Settings file (TOML with `ai_model` and `credential`)
    #[arg(short = 'c', long, default_value = "studio.toml")]
    config: PathBuf,

    /// Generation credential (overrides the settings file)
    #[arg(long, env = "STUDIO_CREDENTIAL")]
    credential: Option<String>,

    /// Script model (overrides the settings file)
    #[arg(short = 'm', long, env = "STUDIO_AI_MODEL")]
    model: Option<String>,

    /// Number of ideas to approve; the rest are rejected
    #[arg(short = 'a', long, default_value = "2")]
    approve: usize,

    /// Batch positions whose first render fails (repeatable)
    #[arg(long)]
    fail_clip: Vec<usize>,

    /// Retry failed clips once after the batch settles
    #[arg(long)]
    retry_failed: bool,

    /// Simulate the reference latencies instead of completing instantly
    #[arg(long)]
    slow: bool,

    /// Output directory for exports
    #[arg(short = 'o', long, default_value = "studio-out")]
    out: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    let mut settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to read settings from {}", args.config.display()))?;
    if let Some(model) = &args.model {
        settings.ai_model = model.clone();
    }
    if let Some(credential) = &args.credential {
        settings.credential = credential.clone();
    }

    let delays = if args.slow {
        MockDelays::default()
    } else {
        MockDelays {
            clip: Duration::from_millis(150),
            clip_stagger: Duration::from_millis(75),
            ..MockDelays::instant()
        }
    };
    let generator = args
        .fail_clip
        .iter()
        .fold(MockGenerator::new().with_delays(delays), |g, &index| {
            g.with_failing_clip(index)
        });

    let mut studio = PipelineController::new(Arc::new(generator), settings);
    println!("Session {}", studio.state().session_id());

    // Stage 1: ideas
    studio.generate_ideas()?;
    studio.run_until_idle().await;
    let ideas: Vec<(String, String)> = studio
        .artifacts()
        .ideas()
        .iter()
        .map(|i| (i.id.clone(), i.title.clone()))
        .collect();
    println!("\n[{}] {} ideas sourced", Stage::Idea, ideas.len());
    for (index, (id, title)) in ideas.iter().enumerate() {
        if index < args.approve {
            studio.approve_idea(id)?;
            println!("  + {}", title);
        } else {
            studio.reject_idea(id)?;
            println!("  - {}", title);
        }
    }
    if let Err(blocked) = studio.check_ready(Stage::Script) {
        anyhow::bail!("Cannot draft a script: {}", blocked);
    }
    studio.advance();

    // Stage 2: script
    studio.generate_script()?;
    studio.run_until_idle().await;
    let version = studio.save_script_version("AI Assistant")?;
    let stats = studio.script_stats();
    println!(
        "\n[{}] {} words, {} characters, {} content lines (saved as {})",
        Stage::Script,
        stats.words,
        stats.characters,
        stats.content_lines,
        version.id
    );
    studio.advance();

    // Stage 3: b-roll prompts
    studio.generate_prompts()?;
    studio.run_until_idle().await;
    println!(
        "\n[{}] {} prompts generated",
        Stage::BRoll,
        studio.artifacts().prompt_count()
    );
    studio.advance();

    // Stage 4: video
    if let Err(blocked) = studio.check_ready(Stage::Video) {
        println!("\n[{}] Video generation unavailable: {}", Stage::Video, blocked);
        println!("Configure a credential with --credential or STUDIO_CREDENTIAL.");
    } else {
        render::render_all(&mut studio, args.retry_failed).await?;
    }

    // Exports
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    let prompts_path = args.out.join(PROMPTS_FILE_NAME);
    std::fs::write(&prompts_path, export::prompts_csv(studio.artifacts())?)
        .context("Failed to write prompt table")?;
    let timeline_path = args.out.join(TIMELINE_FILE_NAME);
    std::fs::write(&timeline_path, export::timeline_json(studio.artifacts())?)
        .context("Failed to write timeline")?;

    println!("\nWrote {}", prompts_path.display());
    println!("Wrote {}", timeline_path.display());

    let summary = export::clip_summary(studio.artifacts());
    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
