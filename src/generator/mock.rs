//! Deterministic stand-in generator.
//!
//! Serves a fixed set of trending stories, a templated script, keyword-based
//! b-roll prompts and synthetic clip URLs. Clip renders are staggered by
//! batch position so completions arrive out of step with each other.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::Duration;

use super::{ClipRequest, ContentGenerator, GeneratorError, RenderedClip};
use crate::pipeline::model::{IdeaDraft, Interest, ScriptLine, Sentiment};

/// Simulated latency of each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDelays {
    pub ideas: Duration,
    pub script: Duration,
    pub prompt: Duration,
    /// Base latency of every clip render.
    pub clip: Duration,
    /// Extra latency per batch position.
    pub clip_stagger: Duration,
}

impl Default for MockDelays {
    fn default() -> Self {
        Self {
            ideas: Duration::from_millis(1500),
            script: Duration::from_millis(2000),
            prompt: Duration::from_millis(200),
            clip: Duration::from_millis(2000),
            clip_stagger: Duration::from_millis(1000),
        }
    }
}

impl MockDelays {
    /// No latency at all.
    pub fn instant() -> Self {
        Self {
            ideas: Duration::ZERO,
            script: Duration::ZERO,
            prompt: Duration::ZERO,
            clip: Duration::ZERO,
            clip_stagger: Duration::ZERO,
        }
    }

    /// Render latency at batch position `index`, saturating at `Duration::MAX`.
    pub fn clip_latency(&self, index: usize) -> Duration {
        let position = u32::try_from(index).unwrap_or(u32::MAX);
        self.clip
            .saturating_add(self.clip_stagger.saturating_mul(position))
    }
}

/// Deterministic `ContentGenerator`.
#[derive(Debug, Default)]
pub struct MockGenerator {
    delays: MockDelays,
    /// Batch positions whose next render fails once.
    failing_clips: Mutex<HashSet<usize>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set delays.
    pub fn with_delays(mut self, delays: MockDelays) -> Self {
        self.delays = delays;
        self
    }

    /// Builder: Make the next render at batch position `index` fail.
    pub fn with_failing_clip(self, index: usize) -> Self {
        self.failing_clips
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(index);
        self
    }

    fn take_failure(&self, index: usize) -> bool {
        self.failing_clips
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&index)
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn source_ideas(&self) -> Result<Vec<IdeaDraft>, GeneratorError> {
        tokio::time::sleep(self.delays.ideas).await;
        Ok(trending_stories())
    }

    async fn draft_script(
        &self,
        model: &str,
        idea_titles: &[String],
    ) -> Result<String, GeneratorError> {
        tokio::time::sleep(self.delays.script).await;
        if idea_titles.is_empty() {
            return Err(GeneratorError::failed("no topics to write about"));
        }
        tracing::trace!(model, topics = idea_titles.len(), "drafting mock script");
        Ok(script_template(idea_titles))
    }

    async fn synthesize_prompt(&self, line: &ScriptLine) -> Result<String, GeneratorError> {
        tokio::time::sleep(self.delays.prompt).await;
        Ok(prompt_for_line(&line.text).to_string())
    }

    async fn render_clip(&self, request: &ClipRequest) -> Result<RenderedClip, GeneratorError> {
        if request.credential.trim().is_empty() {
            return Err(GeneratorError::unavailable("missing credential"));
        }
        tokio::time::sleep(self.delays.clip_latency(request.index)).await;
        if self.take_failure(request.index) {
            return Err(GeneratorError::failed(format!(
                "render rejected for {}",
                request.clip_id
            )));
        }

        let seed = stable_hash(&request.clip_id);
        Ok(RenderedClip {
            url: format!("https://example.com/video-{}.mp4", request.clip_id),
            duration: 5.0 + (seed % 5000) as f64 / 1000.0,
            thumbnail: Some(format!("https://picsum.photos/seed/{}/320/180", seed)),
        })
    }
}

fn stable_hash(value: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// The fixed story feed served as "trending".
pub fn trending_stories() -> Vec<IdeaDraft> {
    vec![
        IdeaDraft::new(
            "AI Breakthrough in Medical Diagnosis",
            "New AI system achieves 95% accuracy in early cancer detection, potentially saving thousands of lives annually.",
        )
        .with_source("TechCrunch", "https://techcrunch.com")
        .with_sentiment(Sentiment::Positive)
        .with_interest(Interest::High),
        IdeaDraft::new(
            "Climate Summit Announces Major Policy Changes",
            "World leaders commit to aggressive carbon reduction targets with binding agreements and financial support.",
        )
        .with_source("BBC News", "https://bbc.com")
        .with_sentiment(Sentiment::Positive)
        .with_interest(Interest::High),
        IdeaDraft::new(
            "Tech Industry Faces Regulatory Scrutiny",
            "New antitrust legislation targets major tech companies, sparking debate about innovation and competition.",
        )
        .with_source("The Verge", "https://theverge.com")
        .with_sentiment(Sentiment::Neutral)
        .with_interest(Interest::Medium),
        IdeaDraft::new(
            "Breakthrough in Renewable Energy Storage",
            "Scientists develop new battery technology that could revolutionize solar and wind energy reliability.",
        )
        .with_source("MIT Technology Review", "https://technologyreview.com")
        .with_sentiment(Sentiment::Positive)
        .with_interest(Interest::High),
        IdeaDraft::new(
            "Global Supply Chain Disruptions Continue",
            "Ongoing logistical challenges impact consumer prices and product availability across multiple sectors.",
        )
        .with_source("Reuters", "https://reuters.com")
        .with_sentiment(Sentiment::Negative)
        .with_interest(Interest::Medium),
        IdeaDraft::new(
            "Space Tourism Industry Gains Momentum",
            "Private companies announce new commercial spaceflight schedules, making space more accessible to civilians.",
        )
        .with_source("Space.com", "https://space.com")
        .with_sentiment(Sentiment::Positive)
        .with_interest(Interest::Medium),
    ]
}

/// Builds a segmented script with one segment per topic.
pub fn script_template(idea_titles: &[String]) -> String {
    let mut script = String::from(
        "[INTRO]\nWelcome back to the channel! Today we're diving into some of the most exciting developments in technology and science.\n",
    );
    for (index, title) in idea_titles.iter().enumerate() {
        script.push_str(&format!(
            "\n[SEGMENT {}: {}]\nLet's talk about {}. Here is what happened and why it matters.\n",
            index + 1,
            title,
            title
        ));
    }
    script.push_str(
        "\n[OUTRO]\nThat's all for today! Don't forget to like and subscribe for more updates. See you in the next video!",
    );
    script
}

const PROMPT_TECH: &str = "High-tech futuristic laboratory with glowing blue holographic displays, robotic arms performing precise operations, clean white environment with LED lighting, scientists in modern attire observing data, cinematic 4K quality";
const PROMPT_CLIMATE: &str = "Sweeping aerial shot of wind turbines on green hills, solar panels reflecting sunlight, pristine natural landscape, blue sky with white clouds, environmental conservation, sustainable energy, drone footage, golden hour lighting";
const PROMPT_MEDICAL: &str = "Modern hospital interior with advanced medical equipment, doctors reviewing patient scans on large displays, clean sterile environment, professional healthcare workers, state-of-the-art technology, soft clinical lighting";
const PROMPT_SPACE: &str = "Rocket launch pad with spacecraft ready for takeoff, dramatic lighting, smoke and steam effects, mission control center with multiple screens, astronauts in spacesuits, high-tech aerospace facility, epic cinematic shot";
const PROMPT_DEFAULT: &str = "Professional corporate environment, modern office space with natural lighting, business professionals collaborating, clean contemporary design, glass and steel architecture, dynamic camera movement, professional cinematography";

/// Picks a b-roll prompt from keywords in the line.
///
/// Keywords match whole words, checked in priority order.
pub fn prompt_for_line(line: &str) -> &'static str {
    let words: HashSet<String> = line
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    let has = |keys: &[&str]| keys.iter().any(|k| words.contains(*k));

    if has(&["ai", "technology"]) {
        PROMPT_TECH
    } else if has(&["climate", "environment"]) {
        PROMPT_CLIMATE
    } else if has(&["medical", "health"]) {
        PROMPT_MEDICAL
    } else if has(&["space", "rocket"]) {
        PROMPT_SPACE
    } else {
        PROMPT_DEFAULT
    }
}
