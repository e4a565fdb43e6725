//! Per-unit dispatch of generator calls.
//!
//! Each unit runs in its own tokio task. Tasks never touch pipeline state:
//! they only send a `UnitCompletion` over the adapter's channel. The owner of
//! the receiving end (the controller) applies completions one at a time.
//!
//! Every dispatch is stamped with a ticket. Re-dispatching a unit id aborts
//! the older task and supersedes its ticket, so a late completion from an
//! abandoned task is recognisably stale.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::try_join_all;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::debug;

use super::{ClipRequest, ContentGenerator, GeneratorError, RenderedClip};
use crate::pipeline::model::{IdeaDraft, ScriptLine};
use crate::pipeline::stage::Stage;

/// Stage-specific input for one unit.
#[derive(Debug, Clone)]
pub enum UnitRequest {
    /// Idea sourcing takes no input.
    Ideas,
    /// Script drafting over the approved idea titles.
    Script {
        model: String,
        idea_titles: Vec<String>,
    },
    /// Prompt synthesis over every content line, completing as one batch.
    Prompts { lines: Vec<ScriptLine> },
    /// One clip render.
    Clip(ClipRequest),
}

impl UnitRequest {
    /// The stage this request belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            UnitRequest::Ideas => Stage::Idea,
            UnitRequest::Script { .. } => Stage::Script,
            UnitRequest::Prompts { .. } => Stage::BRoll,
            UnitRequest::Clip(_) => Stage::Video,
        }
    }
}

/// Stage-specific output of one unit.
#[derive(Debug, Clone)]
pub enum UnitOutput {
    Ideas(Vec<IdeaDraft>),
    Script(String),
    /// Each content line paired with its generated prompt, in line order.
    Prompts(Vec<(ScriptLine, String)>),
    Clip(RenderedClip),
}

/// Result of one unit, delivered out of band.
#[derive(Debug)]
pub struct UnitCompletion {
    pub unit_id: String,
    pub ticket: u64,
    pub stage: Stage,
    pub outcome: Result<UnitOutput, GeneratorError>,
}

struct InFlight {
    ticket: u64,
    stage: Stage,
    abort: AbortHandle,
}

/// Dispatches units to a `ContentGenerator` and tracks them by unit id.
pub struct GeneratorAdapter {
    generator: Arc<dyn ContentGenerator>,
    tx: mpsc::UnboundedSender<UnitCompletion>,
    in_flight: HashMap<String, InFlight>,
    next_ticket: u64,
}

impl GeneratorAdapter {
    /// Creates an adapter and the receiving end of its completion channel.
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
    ) -> (Self, mpsc::UnboundedReceiver<UnitCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let adapter = Self {
            generator,
            tx,
            in_flight: HashMap::new(),
            next_ticket: 0,
        };
        (adapter, rx)
    }

    /// Spawns a task for one unit and returns its ticket.
    ///
    /// Must be called from within a Tokio runtime. A unit id already in
    /// flight is aborted and superseded.
    pub fn dispatch(&mut self, unit_id: impl Into<String>, request: UnitRequest) -> u64 {
        let unit_id = unit_id.into();
        if let Some(previous) = self.in_flight.remove(&unit_id) {
            debug!(unit = %unit_id, ticket = previous.ticket, "superseding in-flight unit");
            previous.abort.abort();
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let stage = request.stage();
        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        let task_unit_id = unit_id.clone();

        let handle = tokio::spawn(async move {
            // A panicking generator still reports, so the unit never hangs in flight.
            let outcome = AssertUnwindSafe(run_unit(generator.as_ref(), request))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(GeneratorError::failed("generator panicked")));
            // Receiver gone means the controller was dropped; nothing to report to.
            let _ = tx.send(UnitCompletion {
                unit_id: task_unit_id,
                ticket,
                stage,
                outcome,
            });
        });

        debug!(unit = %unit_id, ticket, ?stage, "dispatched unit");
        self.in_flight.insert(
            unit_id,
            InFlight {
                ticket,
                stage,
                abort: handle.abort_handle(),
            },
        );
        ticket
    }

    /// Retires the unit a completion belongs to.
    ///
    /// Returns false when the completion is stale: its unit was cancelled or
    /// re-dispatched after this ticket was issued.
    pub fn settle(&mut self, completion: &UnitCompletion) -> bool {
        match self.in_flight.get(&completion.unit_id) {
            Some(entry) if entry.ticket == completion.ticket => {
                self.in_flight.remove(&completion.unit_id);
                true
            }
            _ => false,
        }
    }

    /// Aborts one in-flight unit. Returns false when it was not in flight.
    pub fn cancel(&mut self, unit_id: &str) -> bool {
        match self.in_flight.remove(unit_id) {
            Some(entry) => {
                entry.abort.abort();
                debug!(unit = %unit_id, ticket = entry.ticket, "cancelled unit");
                true
            }
            None => false,
        }
    }

    pub fn is_in_flight(&self, unit_id: &str) -> bool {
        self.in_flight.contains_key(unit_id)
    }

    /// Number of units in flight for a stage.
    pub fn in_flight_for(&self, stage: Stage) -> usize {
        self.in_flight.values().filter(|e| e.stage == stage).count()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

impl Drop for GeneratorAdapter {
    fn drop(&mut self) {
        for entry in self.in_flight.values() {
            entry.abort.abort();
        }
    }
}

/// Runs one unit against the generator.
async fn run_unit(
    generator: &dyn ContentGenerator,
    request: UnitRequest,
) -> Result<UnitOutput, GeneratorError> {
    match request {
        UnitRequest::Ideas => generator.source_ideas().await.map(UnitOutput::Ideas),
        UnitRequest::Script { model, idea_titles } => generator
            .draft_script(&model, &idea_titles)
            .await
            .map(UnitOutput::Script),
        UnitRequest::Prompts { lines } => {
            let prompts = try_join_all(lines.iter().map(|line| generator.synthesize_prompt(line)))
                .await?;
            Ok(UnitOutput::Prompts(lines.into_iter().zip(prompts).collect()))
        }
        UnitRequest::Clip(request) => generator.render_clip(&request).await.map(UnitOutput::Clip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::mock::{MockDelays, MockGenerator};
    use std::time::Duration;

    fn adapter() -> (GeneratorAdapter, mpsc::UnboundedReceiver<UnitCompletion>) {
        let generator = MockGenerator::new().with_delays(MockDelays {
            ideas: Duration::from_millis(10),
            script: Duration::from_millis(10),
            prompt: Duration::from_millis(10),
            clip: Duration::from_millis(100),
            clip_stagger: Duration::from_millis(50),
        });
        GeneratorAdapter::new(Arc::new(generator))
    }

    fn clip_request(clip_id: &str, index: usize) -> UnitRequest {
        UnitRequest::Clip(ClipRequest {
            clip_id: clip_id.to_string(),
            prompt_id: format!("prompt-{index}"),
            prompt: "Rocket launch pad at dawn".to_string(),
            index,
            credential: "key".to_string(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_units_complete_independently() {
        let (mut adapter, mut rx) = adapter();
        adapter.dispatch("c0", clip_request("c0", 0));
        adapter.dispatch("c1", clip_request("c1", 1));
        assert_eq!(adapter.in_flight_for(Stage::Video), 2);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.unit_id, "c0");
        assert!(adapter.settle(&first));
        assert!(adapter.is_in_flight("c1"));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.unit_id, "c1");
        assert!(adapter.settle(&second));
        assert!(adapter.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_redispatch_supersedes_ticket() {
        let (mut adapter, mut rx) = adapter();
        let old = adapter.dispatch("c0", clip_request("c0", 3));
        let new = adapter.dispatch("c0", clip_request("c0", 0));
        assert_ne!(old, new);

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.ticket, new);
        assert!(adapter.settle(&completion));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_stale_settle() {
        let (mut adapter, _rx) = adapter();
        let ticket = adapter.dispatch("c0", clip_request("c0", 0));
        assert!(adapter.cancel("c0"));
        assert!(!adapter.cancel("c0"));

        let stale = UnitCompletion {
            unit_id: "c0".to_string(),
            ticket,
            stage: Stage::Video,
            outcome: Err(GeneratorError::Cancelled),
        };
        assert!(!adapter.settle(&stale));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_batch_keeps_line_order() {
        let (mut adapter, mut rx) = adapter();
        let lines = vec![
            ScriptLine::new(1, "AI spots tumours early"),
            ScriptLine::new(2, "Climate deals signed"),
        ];
        adapter.dispatch("prompts", UnitRequest::Prompts { lines });

        let completion = rx.recv().await.unwrap();
        match completion.outcome {
            Ok(UnitOutput::Prompts(pairs)) => {
                assert_eq!(pairs.len(), 2);
                assert_eq!(pairs[0].0.number, 1);
                assert_eq!(pairs[1].0.number, 2);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
