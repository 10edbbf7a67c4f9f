use crate::domain::ports::NavigationHost;
use crate::domain::session::{BackTransition, WizardSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackDisposition {
    /// The wizard moved back a step or dismissed an error card.
    Handled,
    /// Ignored: a gateway call is in flight.
    Suppressed,
    /// Passed on to the host, which left the flow.
    Delegated,
}

/// Maps the platform back button onto a wizard session.
///
/// Mid-flow presses walk the session back one step. Presses on the first
/// step, or after the flow has finished, go to the host's own back action.
pub fn on_back_pressed(
    session: &mut WizardSession,
    host: &mut dyn NavigationHost,
) -> BackDisposition {
    if session.is_busy() {
        return BackDisposition::Suppressed;
    }
    match session.back() {
        Ok(BackTransition::Moved { to }) => {
            tracing::debug!(flow = %session.kind(), to, "back");
            BackDisposition::Handled
        }
        Ok(BackTransition::Dismissed) => BackDisposition::Handled,
        Ok(BackTransition::ExitFlow) | Err(_) => {
            host.back();
            BackDisposition::Delegated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::flows::FlowCatalog;
    use crate::domain::flow::FlowKind;
    use crate::infrastructure::in_memory::{NavEvent, RecordingNavigator};

    #[test]
    fn test_back_walks_steps_then_exits() {
        let mut session =
            WizardSession::new(FlowCatalog::default().get(FlowKind::Fastag)).unwrap();
        let mut host = RecordingNavigator::new();
        session.set_field("bank", "HDFC Bank").unwrap();
        session.continue_step().unwrap();

        assert_eq!(on_back_pressed(&mut session, &mut host), BackDisposition::Handled);
        assert!(host.events.is_empty());
        assert_eq!(session.step_index(), 0);

        assert_eq!(on_back_pressed(&mut session, &mut host), BackDisposition::Delegated);
        assert_eq!(host.events, vec![NavEvent::Back]);
    }

    #[test]
    fn test_back_is_suppressed_while_busy() {
        let mut session =
            WizardSession::new(FlowCatalog::default().get(FlowKind::Fastag)).unwrap();
        let mut host = RecordingNavigator::new();
        session.set_field("bank", "HDFC Bank").unwrap();
        session.continue_step().unwrap();
        session.set_field("vehicle_number", "MH12AB1234").unwrap();
        session.continue_step().unwrap();
        assert!(session.is_busy());

        assert_eq!(on_back_pressed(&mut session, &mut host), BackDisposition::Suppressed);
        assert_eq!(session.step_index(), 1);
        assert!(host.events.is_empty());
    }
}
