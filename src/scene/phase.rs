//! Forward-only sequencing of incremental actions.

/// One incremental action of a scene script.
///
/// A phase is created when the runner enters it and dropped when it reports completion, so any
/// counters it keeps are scoped to that single run.
pub trait Phase<T> {
    /// Advance by one tick. Returns `true` once the phase is complete.
    fn step(&mut self, target: &mut T) -> bool;
}

/// Builds a phase on entry, looking at the target as it is at that moment.
pub type PhaseFactory<T> = Box<dyn Fn(&T) -> Box<dyn Phase<T>>>;

/// Runs named phases in order, one [`Phase::step`] per update.
pub struct PhaseRunner<T> {
    phases: Vec<(&'static str, PhaseFactory<T>)>,
    cursor: usize,
    active: Option<Box<dyn Phase<T>>>,
}

impl<T> Default for PhaseRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PhaseRunner<T> {
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            cursor: 0,
            active: None,
        }
    }

    /// Append a phase.
    pub fn then(
        mut self,
        name: &'static str,
        factory: impl Fn(&T) -> Box<dyn Phase<T>> + 'static,
    ) -> Self {
        self.phases.push((name, Box::new(factory)));
        self
    }

    /// Step the active phase, entering the next one first if needed. No-op once finished.
    pub fn update(&mut self, target: &mut T) {
        let Some((name, factory)) = self.phases.get(self.cursor) else {
            return;
        };
        let phase = self.active.get_or_insert_with(|| {
            tracing::debug!(phase = *name, index = self.cursor, "entering phase");
            factory(target)
        });
        if phase.step(target) {
            tracing::debug!(phase = *name, "phase complete");
            self.active = None;
            self.cursor += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.phases.len()
    }

    /// Name of the phase that the next update will step.
    pub fn current_phase(&self) -> Option<&'static str> {
        self.phases.get(self.cursor).map(|(name, _)| *name)
    }

    /// Index of the current phase; equals the phase count once finished.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/phase.rs"]
mod tests;
