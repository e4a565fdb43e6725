//! Clip rendering with progress output

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use videostudio::export;
use videostudio::pipeline::ClipStatus;
use videostudio::{PipelineController, Stage};

/// Dispatches every clip and reports each as it settles.
pub async fn render_all(studio: &mut PipelineController, retry_failed: bool) -> Result<()> {
    let clip_ids = studio.generate_all_clips()?;
    println!("\n[{}] Rendering {} clips", Stage::Video, clip_ids.len());
    settle(studio, clip_ids.len()).await?;

    if retry_failed {
        let failed: Vec<String> = studio
            .artifacts()
            .clips()
            .iter()
            .filter(|c| c.status == ClipStatus::Error)
            .map(|c| c.id.clone())
            .collect();
        if !failed.is_empty() {
            println!("Retrying {} failed clips", failed.len());
            for id in &failed {
                studio.regenerate_clip(id)?;
            }
            settle(studio, failed.len()).await?;
        }
    }

    let summary = export::clip_summary(studio.artifacts());
    println!("\n========================================");
    println!("Render Summary:");
    println!("========================================");
    println!("  Ready:    {}", summary.ready);
    println!("  Failed:   {}", summary.failed);
    println!("  Duration: {:.1}s", summary.total_duration);

    if summary.failed > 0 {
        println!("\nFailed clips:");
        for clip in studio.artifacts().clips() {
            if clip.status == ClipStatus::Error {
                println!(
                    "  {} ({}) - {}",
                    clip.id,
                    clip.script_line,
                    clip.error.as_deref().unwrap_or("Unknown")
                );
            }
        }
    }
    Ok(())
}

/// Applies completions until nothing is in flight, advancing a progress bar.
async fn settle(studio: &mut PipelineController, total: usize) -> Result<()> {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    while let Some(report) = studio.process_next().await {
        match &report.error {
            None => pb.set_message(format!("{} ready", report.unit_id)),
            Some(error) => pb.println(format!("FAIL: {} - {}", report.unit_id, error)),
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok(())
}
