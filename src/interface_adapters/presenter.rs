use crate::domain::entity::Entity;
use crate::domain::ports::{AudioCue, Presenter};
use crate::interface_adapters::protocol::{EntitySnapshotDto, FrameSnapshot};
use std::io::Write;
use tracing::warn;

/// Serializes each frame once and writes it as a single JSON line.
pub struct JsonLinesPresenter<W: Write> {
    out: W,
    frame: Option<FrameSnapshot>,
    failed: bool,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame: None,
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, frame: &FrameSnapshot) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn begin_frame(&mut self, tick: u64) {
        self.frame = Some(FrameSnapshot::new(tick));
    }

    fn draw(&mut self, entity: &Entity) {
        if let Some(frame) = self.frame.as_mut() {
            frame.entities.push(EntitySnapshotDto::from(entity));
        }
    }

    fn play(&mut self, cue: &AudioCue) {
        if let Some(frame) = self.frame.as_mut() {
            frame.cues.push(cue.clone());
        }
    }

    fn end_frame(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };
        if self.failed {
            return;
        }
        // Keep simulating if the sink goes away; report it once.
        if let Err(e) = self.write_frame(&frame) {
            warn!(error = %e, tick = frame.tick, "failed to write frame");
            self.failed = true;
        }
    }
}
