/// Session-wide id source. Buildings and event-log entries draw from the same
/// counter, so an id names at most one thing for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids start at 1; 0 is never issued.
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}
