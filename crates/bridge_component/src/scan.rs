//! Observer knowledge levels.

wire_enum! {
    /// How much an observer knows about a target object.
    ///
    /// Variants are ordered: knowledge only ever escalates, so the stored
    /// value for an observer is always the maximum of everything it was told.
    #[derive(Default, PartialOrd, Ord)]
    pub enum ScanState {
        /// Nothing beyond the radar blip.
        #[default]
        NotScanned = 0,
        /// Faction and hostility are known.
        FriendOrFoeIdentified = 1,
        /// Full details are known.
        FullyScanned = 2,
    }
}

impl ScanState {
    /// Returns the higher of the two states.
    #[must_use]
    pub fn escalate(self, other: ScanState) -> ScanState {
        self.max(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_knowledge() {
        assert!(ScanState::NotScanned < ScanState::FriendOrFoeIdentified);
        assert!(ScanState::FriendOrFoeIdentified < ScanState::FullyScanned);
    }

    #[test]
    fn test_escalate_never_lowers() {
        assert_eq!(
            ScanState::FullyScanned.escalate(ScanState::NotScanned),
            ScanState::FullyScanned
        );
        assert_eq!(
            ScanState::NotScanned.escalate(ScanState::FriendOrFoeIdentified),
            ScanState::FriendOrFoeIdentified
        );
    }

    #[test]
    fn test_wire_conversion() {
        assert_eq!(ScanState::try_from(2), Ok(ScanState::FullyScanned));
        let err = ScanState::try_from(9).unwrap_err();
        assert_eq!(err.kind, "ScanState");
        assert_eq!(err.value, 9);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let bytes = rmp_serde::to_vec(&ScanState::FriendOrFoeIdentified).unwrap();
        let restored: ScanState = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(restored, ScanState::FriendOrFoeIdentified);
    }
}
