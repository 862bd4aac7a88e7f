/// Roster snapshot and cursor.
///
/// The roster is the directory's phone numbers at the time of the snapshot.
/// `position` is always in `[0, len)` while the roster is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherState {
    roster: Vec<String>,
    position: usize,
}

impl DispatcherState {
    pub fn new(roster: Vec<String>) -> Self {
        Self {
            roster,
            position: 0,
        }
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Returns the entry under the cursor and moves the cursor one step,
    /// wrapping at the end. `None` for an empty roster.
    pub fn advance(&mut self) -> Option<(usize, String)> {
        let phone_number = self.roster.get(self.position)?.clone();
        let taken = self.position;
        self.position = (self.position + 1) % self.roster.len();
        Some((taken, phone_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(numbers: &[&str]) -> DispatcherState {
        DispatcherState::new(numbers.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn empty_roster_does_not_advance() {
        let mut state = DispatcherState::default();
        assert_eq!(state.advance(), None);
        assert_eq!(state.position(), 0);
    }

    #[test]
    fn advance_wraps_modulo_roster_size() {
        let mut state = roster(&["a", "b", "c"]);

        let taken: Vec<_> = (0..7).map(|_| state.advance().unwrap()).collect();
        let numbers: Vec<_> = taken.iter().map(|(_, n)| n.as_str()).collect();
        let positions: Vec<_> = taken.iter().map(|(p, _)| *p).collect();

        assert_eq!(numbers, ["a", "b", "c", "a", "b", "c", "a"]);
        assert_eq!(positions, [0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(state.position(), 1);
    }

    #[test]
    fn single_entry_roster_stays_at_zero() {
        let mut state = roster(&["only"]);
        assert_eq!(state.advance(), Some((0, "only".to_string())));
        assert_eq!(state.advance(), Some((0, "only".to_string())));
        assert_eq!(state.position(), 0);
    }
}
