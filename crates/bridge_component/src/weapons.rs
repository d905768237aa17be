//! Weapon tube payloads.

wire_enum! {
    /// A missile type that can be loaded into a weapon tube.
    pub enum MissileType {
        Homing = 0,
        Nuke = 1,
        Mine = 2,
        Emp = 3,
        Hvli = 4,
    }
}

impl MissileType {
    /// Number of missile types, for per-type stock arrays.
    pub const COUNT: usize = 5;

    /// Index into per-type stock arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_wire_order() {
        for (i, &ty) in MissileType::ALL.iter().enumerate() {
            assert_eq!(ty.index(), i);
        }
        assert_eq!(MissileType::ALL.len(), MissileType::COUNT);
    }
}
