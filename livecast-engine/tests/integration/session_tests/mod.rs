mod test_echo_round_trip;

use livecast_engine::{ConnectionRole, ControllerState, SessionEvent};

use crate::utils::TestEvent;

/// Controller state reports for `role`, in emission order.
pub fn states_of(events: &[TestEvent], role: ConnectionRole) -> Vec<ControllerState> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::ControllerState { role: r, state } if *r == role => Some(*state),
            _ => None,
        })
        .collect()
}

pub fn count_matching(events: &[TestEvent], pred: impl Fn(&TestEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
