//! Crew stations and the scripted affordances shown on them.

wire_enum! {
    /// A crew station on a player ship.
    pub enum CrewPosition {
        Helms = 0,
        Weapons = 1,
        Engineering = 2,
        Science = 3,
        Relay = 4,
        Tactical = 5,
        EngineeringAdvanced = 6,
        Operations = 7,
        SinglePilot = 8,
        DamageControl = 9,
        PowerManagement = 10,
        DatabaseView = 11,
        AltRelay = 12,
        CommsOnly = 13,
        ShipLog = 14,
    }
}

wire_enum! {
    /// The kind of a scripted crew-station affordance.
    pub enum CustomFunctionType {
        /// Read-only caption.
        Info = 0,
        /// Clickable button that invokes a script callback.
        Button = 1,
        /// Pop-up message the crew dismisses.
        Message = 2,
    }
}
