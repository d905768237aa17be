//! NATS subject hierarchy.
//!
//! Every subject lives under a configurable prefix (default `bridge`) and is
//! scoped to one ship:
//!
//! - `{prefix}.ship.{id}.command`: client → server binary commands.
//! - `{prefix}.ship.{id}.state`: server → client MessagePack snapshots.
//! - `{prefix}.ship.{id}.custom`: server → client custom-function catalog.
//! - `{prefix}.ship.{id}.directive`: server → client one-shot directives.

use bridge_component::Entity;

/// Default subject prefix.
pub const DEFAULT_PREFIX: &str = "bridge";

/// `{prefix}.ship.{id}.command`
#[must_use]
pub fn ship_command(prefix: &str, ship: Entity) -> String {
    format!("{prefix}.ship.{}.command", ship.id())
}

/// Wildcard matching the command subject of every ship.
#[must_use]
pub fn all_ship_commands(prefix: &str) -> String {
    format!("{prefix}.ship.*.command")
}

/// `{prefix}.ship.{id}.state`
#[must_use]
pub fn ship_state(prefix: &str, ship: Entity) -> String {
    format!("{prefix}.ship.{}.state", ship.id())
}

/// `{prefix}.ship.{id}.custom`
#[must_use]
pub fn ship_custom(prefix: &str, ship: Entity) -> String {
    format!("{prefix}.ship.{}.custom", ship.id())
}

/// `{prefix}.ship.{id}.directive`
#[must_use]
pub fn ship_directive(prefix: &str, ship: Entity) -> String {
    format!("{prefix}.ship.{}.directive", ship.id())
}

/// Extract the ship from a `{prefix}.ship.{id}.command` subject.
#[must_use]
pub fn parse_command_subject(prefix: &str, subject: &str) -> Option<Entity> {
    let rest = subject.strip_prefix(prefix)?.strip_prefix(".ship.")?;
    let id = rest.strip_suffix(".command")?;
    id.parse::<u64>().ok().and_then(Entity::from_wire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_subjects() {
        assert_eq!(ship_command("bridge", Entity(4)), "bridge.ship.4.command");
        assert_eq!(ship_state("bridge", Entity(4)), "bridge.ship.4.state");
        assert_eq!(ship_custom("x", Entity(1)), "x.ship.1.custom");
        assert_eq!(ship_directive("x", Entity(1)), "x.ship.1.directive");
        assert_eq!(all_ship_commands("bridge"), "bridge.ship.*.command");
    }

    #[test]
    fn test_parse_command_subject() {
        assert_eq!(
            parse_command_subject("bridge", "bridge.ship.17.command"),
            Some(Entity(17))
        );
        assert_eq!(parse_command_subject("bridge", "bridge.ship.0.command"), None);
        assert_eq!(parse_command_subject("bridge", "bridge.ship.17.state"), None);
        assert_eq!(parse_command_subject("bridge", "other.ship.17.command"), None);
        assert_eq!(parse_command_subject("bridge", "bridge.ship.abc.command"), None);
    }
}
