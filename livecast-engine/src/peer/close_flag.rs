use std::cell::Cell;
use std::rc::Rc;

/// Shared one-way switch checked by suspended operations when they resume.
#[derive(Debug, Clone, Default)]
pub struct CloseFlag(Rc<Cell<bool>>);

impl CloseFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.set(true);
    }

    pub fn is_raised(&self) -> bool {
        self.0.get()
    }
}
