//! End-to-end scenarios: encoded commands through the tick loop.

use bridge_component::{CrewPosition, CustomFunctionType, Entity, MissileType, ScanState};
use bridge_math::Vec2;
use bridge_net::{Command, WireError};
use bridge_net::sync::decode_custom_functions;
use bridge_sim::object::ObjectKind;
use bridge_sim::script::{StaticComms, StaticReply};
use bridge_sim::ship::TubeState;
use bridge_sim::{
    Callback, CommsHandle, CommsState, FactionRelation, ShipSnapshot, SimConfig, TickConfig, TickLoop, World,
};

const DT: f64 = 0.25;

fn send(tick_loop: &mut TickLoop, ship: Entity, command: Command) {
    let bytes = command.encode();
    tick_loop.submit_bytes(ship, &bytes).unwrap();
}

fn run_for(tick_loop: &mut TickLoop, seconds: f64) {
    let ticks = (seconds / DT).round() as usize;
    for _ in 0..ticks {
        tick_loop.tick(DT);
    }
}

fn fleet() -> (TickLoop, Entity, Entity) {
    let mut world = World::with_seed(SimConfig::default(), 42);
    let navy = world.add_faction("Human Navy").unwrap();
    let ship = world.spawn_player_ship("Alpha", Vec2::ZERO);
    let station = world.spawn_station("DS-1", Vec2::new(1500.0, 0.0));
    world.set_faction_id(ship, Some(navy)).unwrap();
    world.set_faction_id(station, Some(navy)).unwrap();
    world.set_reputation_points(ship, 50.0);
    world.object_mut(station).unwrap().comms_script = Some(CommsHandle::new(StaticComms {
        greeting: "DS-1 here. State your business.".into(),
        replies: vec![
            StaticReply {
                text: "Requesting resupply".into(),
                response: "Dock when ready.".into(),
            },
            StaticReply {
                text: "Nothing, out".into(),
                response: "DS-1 out.".into(),
            },
        ],
    }));
    (TickLoop::new(TickConfig::default(), world), ship, station)
}

#[test]
fn test_fire_requires_loaded_tube() {
    let (mut tick_loop, ship, _) = fleet();
    assert_eq!(tick_loop.world().reputation_points(ship), 50.0);

    send(&mut tick_loop, ship, Command::FireTube { tube: 0, angle: 1.57 });
    let output = tick_loop.tick(DT);
    assert_eq!(output.dropped, 1);
    let player = tick_loop.world().player_ship(ship).unwrap();
    assert_eq!(player.tubes()[0].state(), TubeState::Empty);

    send(&mut tick_loop, ship, Command::LoadTube { tube: 0, missile: MissileType::Homing });
    run_for(&mut tick_loop, 8.0);
    let player = tick_loop.world().player_ship(ship).unwrap();
    assert_eq!(player.tubes()[0].state(), TubeState::Loaded);

    send(&mut tick_loop, ship, Command::FireTube { tube: 0, angle: 1.57 });
    let output = tick_loop.tick(DT);
    assert_eq!(output.applied, 1);
    let player = tick_loop.world().player_ship(ship).unwrap();
    assert_eq!(player.tubes()[0].state(), TubeState::Empty);
    let angles: Vec<f32> = tick_loop
        .world()
        .objects()
        .filter_map(|(_, object)| match &object.kind {
            ObjectKind::Missile(missile) => Some(missile.target_angle),
            _ => None,
        })
        .collect();
    assert_eq!(angles, vec![1.57]);
}

#[test]
fn test_station_hail_offers_replies() {
    let (mut tick_loop, ship, station) = fleet();
    send(&mut tick_loop, ship, Command::OpenTextComm(station));
    tick_loop.tick(DT);
    let comms = tick_loop.world().comms(ship).unwrap();
    assert_eq!(comms.state(), CommsState::OpeningChannel);
    assert_eq!(comms.target_name(), "DS-1");

    run_for(&mut tick_loop, 2.0);
    let comms = tick_loop.world().comms(ship).unwrap();
    assert_eq!(comms.state(), CommsState::ChannelOpen);
    assert!(!comms.reply_options().is_empty());

    send(&mut tick_loop, ship, Command::SendComm(0));
    tick_loop.tick(DT);
    let snapshot = ShipSnapshot::capture(tick_loop.world(), ship).unwrap();
    assert_eq!(
        snapshot.comms.incoming_message,
        "DS-1 here. State your business.\n< Requesting resupply\n> Dock when ready."
    );
    assert_eq!(snapshot.comms.reply_options.len(), 2);
}

#[test]
fn test_enemy_station_refuses_hail() {
    let (mut tick_loop, ship, station) = fleet();
    let world = tick_loop.world_mut();
    let kraylor = world.add_faction("Kraylor").unwrap();
    let navy = world.faction_by_name("Human Navy").unwrap();
    world.set_faction_relation(navy, kraylor, FactionRelation::Enemy);
    world.set_faction_id(station, Some(kraylor)).unwrap();

    send(&mut tick_loop, ship, Command::OpenTextComm(station));
    run_for(&mut tick_loop, 2.5);
    let comms = tick_loop.world().comms(ship).unwrap();
    assert_eq!(comms.state(), CommsState::ChannelFailed);

    // Terminal states accept a new hail.
    send(&mut tick_loop, ship, Command::OpenTextComm(station));
    tick_loop.tick(DT);
    assert!(tick_loop.world().comms(ship).unwrap().is_opening());
}

#[test]
fn test_gm_hail_answered() {
    let (mut tick_loop, ship, _) = fleet();
    send(&mut tick_loop, ship, Command::AnswerCommHail(true));
    tick_loop.tick(DT);
    assert_eq!(tick_loop.world().comms(ship).unwrap().state(), CommsState::Inactive);

    tick_loop.world_mut().hail_comms_by_gm(ship, "Fleet Command");
    send(&mut tick_loop, ship, Command::AnswerCommHail(true));
    tick_loop.tick(DT);
    assert_eq!(tick_loop.world().comms(ship).unwrap().state(), CommsState::ChannelOpenGM);

    send(&mut tick_loop, ship, Command::SendCommPlayer("Requesting orders".into()));
    tick_loop.tick(DT);
    let inbox = tick_loop.world_mut().take_gm_messages();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].text, "Requesting orders");
}

#[test]
fn test_custom_function_catalog_sync() {
    let (mut tick_loop, ship, _) = fleet();
    tick_loop.tick(DT);
    {
        let registry = tick_loop
            .world_mut()
            .player_ship_mut(ship)
            .unwrap()
            .custom_functions_mut();
        registry.add_button(CrewPosition::Relay, "foo", "Foo", Callback::new(|| {}), None);
        registry.add_info(CrewPosition::Relay, "foo", "Foo info", None);
    }
    let output = tick_loop.tick(DT);
    let (target, entries) = &output.custom_updates[0];
    assert_eq!(*target, ship);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, CustomFunctionType::Info);

    let bytes = bridge_net::sync::encode_custom_functions(entries);
    let decoded = decode_custom_functions(&bytes).unwrap();
    assert_eq!(&decoded, entries);

    tick_loop
        .world_mut()
        .player_ship_mut(ship)
        .unwrap()
        .custom_functions_mut()
        .remove("foo");
    let output = tick_loop.tick(DT);
    assert!(output.custom_updates[0].1.is_empty());
}

#[test]
fn test_faction_scan_sharing() {
    let (mut tick_loop, ship, _) = fleet();
    let world = tick_loop.world_mut();
    let wingman = world.spawn_player_ship("Beta", Vec2::ZERO);
    let navy = world.faction_by_name("Human Navy").unwrap();
    world.set_faction_id(wingman, Some(navy)).unwrap();
    let raider = world.spawn_cpu_ship("Raider", Vec2::new(3000.0, 0.0));

    send(&mut tick_loop, ship, Command::ScanObject(raider));
    run_for(&mut tick_loop, 6.25);
    let world = tick_loop.world();
    assert_eq!(world.scanned_state_for(raider, ship), ScanState::FullyScanned);
    assert_eq!(world.scanned_state_for(raider, wingman), ScanState::FullyScanned);
    assert_eq!(
        world.object(raider).unwrap().scan.entity_state(wingman),
        ScanState::NotScanned
    );

    // Lower values never replace higher ones.
    tick_loop
        .world_mut()
        .set_scanned_state_for(raider, ship, ScanState::FriendOrFoeIdentified);
    assert_eq!(
        tick_loop.world().scanned_state_for(raider, ship),
        ScanState::FullyScanned
    );
}

#[test]
fn test_reputation_spend() {
    let (mut tick_loop, ship, station) = fleet();
    let world = tick_loop.world_mut();
    assert!(!world.take_reputation_points(ship, 60.0));
    assert_eq!(world.reputation_points(ship), 50.0);
    assert!(world.take_reputation_points(station, 20.0));
    assert_eq!(world.reputation_points(ship), 30.0);
}

#[test]
fn test_malformed_command_bytes_rejected() {
    let (mut tick_loop, ship, _) = fleet();
    assert!(tick_loop.submit_bytes(ship, &[0x07, 0x00]).is_err());
    assert!(tick_loop.submit_bytes(ship, &[0x7F]).is_err());
    assert_eq!(tick_loop.pending(), 0);
}

#[test]
fn test_non_finite_inputs_never_reach_ship_state() {
    let (mut tick_loop, ship, _) = fleet();
    for command in [
        Command::Jump(f32::NAN),
        Command::Impulse(f32::NAN),
        Command::TargetRotation(f32::INFINITY),
        Command::LaunchProbe(Vec2::new(f32::NAN, 0.0)),
    ] {
        assert_eq!(tick_loop.submit_bytes(ship, &command.encode()), Err(WireError::NonFinite));
    }
    assert_eq!(tick_loop.pending(), 0);

    // Commands queued in-process bypass decode and are dropped at apply.
    tick_loop.submit(ship, Command::Impulse(f32::NAN));
    tick_loop.submit(ship, Command::Jump(f32::INFINITY));
    let output = tick_loop.tick(DT);
    assert_eq!((output.applied, output.dropped), (0, 2));
    run_for(&mut tick_loop, 13.0);

    let world = tick_loop.world();
    let player = world.player_ship(ship).unwrap();
    assert_eq!(player.impulse_request(), 0.0);
    assert_eq!(player.jump_delay(), 0.0);
    assert!(world.object(ship).unwrap().position().is_finite());
    assert_eq!(world.object_count(), 2);
}
