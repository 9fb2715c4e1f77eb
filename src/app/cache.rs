use tracing::{debug, info};

use crate::domain::{EngineError, ModelSpec};
use crate::ports::{SpeechEngine, SpeechModel};

/// Single-slot cache for the loaded speech model.
///
/// At most one model is resident at a time. Switching specs drops the
/// held model before the next one is loaded, so two models never occupy
/// accelerator memory together. A failed load leaves the slot empty.
pub struct ModelCache {
    slot: Option<(ModelSpec, Box<dyn SpeechModel>)>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Return a model matching the spec, loading it through the engine
    /// on a miss. A hit reuses the held handle without touching the
    /// backend.
    pub async fn acquire(
        &mut self,
        engine: &dyn SpeechEngine,
        spec: &ModelSpec,
    ) -> Result<&dyn SpeechModel, EngineError> {
        let hit = matches!(&self.slot, Some((held, _)) if held == spec);

        if hit {
            debug!(model = %spec, "Reusing cached model");
        } else {
            // Free the held model first so only one occupies memory.
            if let Some((prior, model)) = self.slot.take() {
                drop(model);
                info!(released = %prior, "Cached model released");
            }

            let model = engine.load(spec).await?;
            info!(model = %spec, engine = engine.name(), "Model loaded");
            self.slot = Some((spec.clone(), model));
        }

        self.slot
            .as_ref()
            .map(|(_, model)| model.as_ref())
            .ok_or_else(|| EngineError::Backend("model cache slot is empty".to_string()))
    }

    /// Drop the held model, if any.
    pub fn release(&mut self) {
        if let Some((spec, model)) = self.slot.take() {
            drop(model);
            info!(released = %spec, "Cached model released");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.is_some()
    }

    /// Spec of the currently held model, if any.
    pub fn current(&self) -> Option<&ModelSpec> {
        self.slot.as_ref().map(|(spec, _)| spec)
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}
