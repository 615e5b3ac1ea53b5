// Shared helpers for driving whole matches in integration tests.
use arena::domain::ports::{AudioCue, Presenter};
use arena::domain::{Entity, EntityKind, InputEvent, Key};
use arena::interface_adapters::input::{ScriptStep, ScriptedInput};

// Frame-by-frame record of what the loop asked the presentation layer to do.
#[derive(Default)]
pub struct RecordingPresenter {
    pub ticks: Vec<u64>,
    pub last_frame: Vec<Entity>,
    pub cues: Vec<AudioCue>,
    in_frame: Vec<Entity>,
}

impl Presenter for RecordingPresenter {
    fn begin_frame(&mut self, tick: u64) {
        self.ticks.push(tick);
        self.in_frame.clear();
    }

    fn draw(&mut self, entity: &Entity) {
        // Clone so assertions can inspect the state as it was drawn.
        self.in_frame.push(entity.clone());
    }

    fn play(&mut self, cue: &AudioCue) {
        self.cues.push(cue.clone());
    }

    fn end_frame(&mut self) {
        self.last_frame = std::mem::take(&mut self.in_frame);
    }
}

impl RecordingPresenter {
    // Text of every status display in the last drawn frame, in draw order.
    pub fn health_labels(&self) -> Vec<String> {
        self.last_frame
            .iter()
            .filter_map(|e| e.as_status_display().map(|d| d.label()))
            .collect()
    }

    pub fn banner_message(&self) -> Option<String> {
        self.last_frame
            .iter()
            .find_map(|e| e.as_banner().and_then(|b| b.message()))
    }

    pub fn projectile_count(&self) -> usize {
        self.last_frame
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Projectile(_)))
            .count()
    }
}

// Presses `key` on the first of every `every` ticks, `times` times over.
pub fn volley(key: Key, every: u32, times: usize) -> Vec<ScriptStep> {
    (0..times)
        .map(|_| ScriptStep {
            events: vec![InputEvent::KeyDown(key)],
            held: Vec::new(),
            repeat: every,
        })
        .collect()
}

pub fn idle(ticks: u32) -> ScriptStep {
    ScriptStep {
        events: Vec::new(),
        held: Vec::new(),
        repeat: ticks,
    }
}

pub fn script(steps: Vec<ScriptStep>) -> ScriptedInput {
    ScriptedInput::from_steps(steps)
}
