//! Looped playback of a single preloaded buffer.

use super::fsm::{TransitionResult, TransportEvent, TransportFSM, TransportState};
use crate::buffer::SampleBuffer;
use crate::control::PlaybackTarget;
use std::sync::Arc;
use tracing::debug;

/// Owns the loaded buffer and drives the source node's playback.
///
/// The buffer is decoded once and shared; every start reschedules the same
/// `Arc`, so stop/start never reloads from disk.
pub struct TransportController {
    fsm: TransportFSM,
    buffer: Arc<SampleBuffer>,
    target: Arc<dyn PlaybackTarget>,
    looping: bool,
}

impl TransportController {
    pub fn new(buffer: Arc<SampleBuffer>, target: Arc<dyn PlaybackTarget>) -> Self {
        Self {
            fsm: TransportFSM::new(),
            buffer,
            target,
            looping: true,
        }
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn state(&self) -> TransportState {
        self.fsm.state()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == TransportState::Playing
    }

    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Schedule the buffer without playing.
    pub fn arm(&mut self) {
        if self.state() == TransportState::Stopped {
            self.target.schedule(Arc::clone(&self.buffer), self.looping);
            debug!(frames = self.buffer.frames(), "transport armed");
        }
    }

    pub fn start(&mut self) -> TransportState {
        self.send(TransportEvent::Play)
    }

    pub fn play(&mut self) -> TransportState {
        self.send(TransportEvent::Play)
    }

    pub fn pause(&mut self) -> TransportState {
        self.send(TransportEvent::Pause)
    }

    pub fn toggle(&mut self) -> TransportState {
        self.send(TransportEvent::Toggle)
    }

    pub fn stop(&mut self) -> TransportState {
        self.send(TransportEvent::Stop)
    }

    fn send(&mut self, event: TransportEvent) -> TransportState {
        match self.fsm.transition(event) {
            TransitionResult::Started => {
                self.target.schedule(Arc::clone(&self.buffer), self.looping);
                self.target.play();
            }
            TransitionResult::Resumed => self.target.play(),
            TransitionResult::Paused => self.target.pause(),
            TransitionResult::Stopped => self.target.stop(),
            TransitionResult::None => {}
        }

        let state = self.state();
        debug!(?event, ?state, "transport");
        state
    }
}

impl std::fmt::Debug for TransportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportController")
            .field("state", &self.state())
            .field("frames", &self.buffer.frames())
            .field("looping", &self.looping)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        scheduled: Mutex<Vec<Arc<SampleBuffer>>>,
    }

    impl PlaybackTarget for Recorder {
        fn schedule(&self, buffer: Arc<SampleBuffer>, looping: bool) {
            self.calls.lock().push(format!("schedule(looping={looping})"));
            self.scheduled.lock().push(buffer);
        }
        fn play(&self) {
            self.calls.lock().push("play".into());
        }
        fn pause(&self) {
            self.calls.lock().push("pause".into());
        }
        fn stop(&self) {
            self.calls.lock().push("stop".into());
        }
        fn is_playing(&self) -> bool {
            false
        }
    }

    fn buffer() -> Arc<SampleBuffer> {
        Arc::new(SampleBuffer::new(44100, 1, vec![0.5; 64]).unwrap())
    }

    fn controller() -> (TransportController, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (
            TransportController::new(buffer(), recorder.clone()),
            recorder,
        )
    }

    #[test]
    fn test_start_schedules_looped_buffer() {
        let (mut transport, recorder) = controller();
        assert_eq!(transport.start(), TransportState::Playing);
        assert_eq!(
            *recorder.calls.lock(),
            vec!["schedule(looping=true)".to_string(), "play".to_string()]
        );
    }

    #[test]
    fn test_buffer_reused_across_restart() {
        let (mut transport, recorder) = controller();
        transport.start();
        transport.stop();
        transport.start();

        let scheduled = recorder.scheduled.lock();
        assert_eq!(scheduled.len(), 2);
        assert!(Arc::ptr_eq(&scheduled[0], &scheduled[1]));
        assert!(Arc::ptr_eq(&scheduled[0], transport.buffer()));
    }

    #[test]
    fn test_resume_does_not_reschedule() {
        let (mut transport, recorder) = controller();
        transport.start();
        transport.pause();
        assert_eq!(transport.play(), TransportState::Playing);
        assert_eq!(recorder.scheduled.lock().len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (mut transport, _) = controller();
        transport.start();
        transport.toggle();
        assert_eq!(transport.toggle(), TransportState::Playing);

        transport.stop();
        transport.toggle();
        assert_eq!(transport.toggle(), TransportState::Paused);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut transport, _) = controller();
        assert_eq!(transport.stop(), TransportState::Stopped);
        assert_eq!(transport.stop(), TransportState::Stopped);
    }

    #[test]
    fn test_arm_keeps_stopped() {
        let (mut transport, recorder) = controller();
        transport.arm();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert_eq!(recorder.scheduled.lock().len(), 1);
    }

    #[test]
    fn test_one_shot() {
        let recorder = Arc::new(Recorder::default());
        let mut transport = TransportController::new(buffer(), recorder.clone()).with_looping(false);
        transport.start();
        assert_eq!(recorder.calls.lock()[0], "schedule(looping=false)");
    }
}
