//! Transport state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    Play,
    Pause,
    Stop,
    Toggle,
}

/// What the caller must tell the playback target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    None,
    /// From `Stopped`: schedule the buffer, then play.
    Started,
    /// From `Paused`: continue where playback left off.
    Resumed,
    Paused,
    Stopped,
}

#[derive(Debug, Default)]
pub struct TransportFSM {
    state: TransportState,
}

impl TransportFSM {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn transition(&mut self, event: TransportEvent) -> TransitionResult {
        use TransportEvent::*;

        let event = match (event, self.state) {
            (Toggle, TransportState::Playing) => Pause,
            (Toggle, _) => Play,
            (event, _) => event,
        };

        match event {
            Play => match self.state {
                TransportState::Stopped => {
                    self.state = TransportState::Playing;
                    TransitionResult::Started
                }
                TransportState::Paused => {
                    self.state = TransportState::Playing;
                    TransitionResult::Resumed
                }
                TransportState::Playing => TransitionResult::None,
            },

            Pause => match self.state {
                TransportState::Playing => {
                    self.state = TransportState::Paused;
                    TransitionResult::Paused
                }
                _ => TransitionResult::None,
            },

            // Always reported so the target rewinds even if it drifted
            Stop => {
                self.state = TransportState::Stopped;
                TransitionResult::Stopped
            }

            Toggle => TransitionResult::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_pause_resume() {
        let mut fsm = TransportFSM::new();
        assert_eq!(fsm.transition(TransportEvent::Play), TransitionResult::Started);
        assert_eq!(fsm.transition(TransportEvent::Play), TransitionResult::None);
        assert_eq!(fsm.transition(TransportEvent::Pause), TransitionResult::Paused);
        assert_eq!(fsm.transition(TransportEvent::Play), TransitionResult::Resumed);
        assert_eq!(fsm.state(), TransportState::Playing);
    }

    #[test]
    fn test_pause_when_stopped_is_ignored() {
        let mut fsm = TransportFSM::new();
        assert_eq!(fsm.transition(TransportEvent::Pause), TransitionResult::None);
        assert_eq!(fsm.state(), TransportState::Stopped);
    }

    #[test]
    fn test_toggle() {
        let mut fsm = TransportFSM::new();
        assert_eq!(fsm.transition(TransportEvent::Toggle), TransitionResult::Started);
        assert_eq!(fsm.transition(TransportEvent::Toggle), TransitionResult::Paused);
        assert_eq!(fsm.transition(TransportEvent::Toggle), TransitionResult::Resumed);
    }

    #[test]
    fn test_stop_from_anywhere() {
        let mut fsm = TransportFSM::new();
        assert_eq!(fsm.transition(TransportEvent::Stop), TransitionResult::Stopped);
        fsm.transition(TransportEvent::Play);
        fsm.transition(TransportEvent::Pause);
        assert_eq!(fsm.transition(TransportEvent::Stop), TransitionResult::Stopped);
        assert_eq!(fsm.state(), TransportState::Stopped);
    }
}
