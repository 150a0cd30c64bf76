use livecast_core::ConnectionRole;

use crate::peer::PeerController;
use crate::platform::PeerConnection;

/// Role-indexed slots for the controllers of one streaming attempt.
pub struct Controllers<C: PeerConnection> {
    source: Option<PeerController<C>>,
    sink: Option<PeerController<C>>,
}

impl<C: PeerConnection> Default for Controllers<C> {
    fn default() -> Self {
        Self {
            source: None,
            sink: None,
        }
    }
}

impl<C: PeerConnection> Controllers<C> {
    pub fn get(&self, role: ConnectionRole) -> Option<&PeerController<C>> {
        match role {
            ConnectionRole::Source => self.source.as_ref(),
            ConnectionRole::Sink => self.sink.as_ref(),
        }
    }

    pub fn get_mut(&mut self, role: ConnectionRole) -> Option<&mut PeerController<C>> {
        match role {
            ConnectionRole::Source => self.source.as_mut(),
            ConnectionRole::Sink => self.sink.as_mut(),
        }
    }

    /// Stores a controller in its role's slot, returning whatever was there.
    pub fn insert(&mut self, controller: PeerController<C>) -> Option<PeerController<C>> {
        let slot = match controller.role() {
            ConnectionRole::Source => &mut self.source,
            ConnectionRole::Sink => &mut self.sink,
        };
        slot.replace(controller)
    }

    pub fn take_all(&mut self) -> Vec<PeerController<C>> {
        self.source.take().into_iter().chain(self.sink.take()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerController<C>> {
        self.source.iter().chain(self.sink.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.sink.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }
}
