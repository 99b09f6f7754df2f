use ghostwire_client::{ClientConfig, ClientEvent};
use ghostwire_server::ServerConfig;
use ghostwire_shared::{GhostConfig, GhostStatus, ObjectKey, Trigger};
use ghostwire_test::{assert_ghost_mask, assert_ghost_pending, ghost_handle, Delivery, TestLink};

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

fn tight_link(packet_bits: u32) -> TestLink {
    let ghosting = GhostConfig {
        packet_bits,
        ..Default::default()
    };
    TestLink::with_configs(
        ServerConfig {
            ghosting,
            ..Default::default()
        },
        ClientConfig { ghosting },
    )
}

fn include(link: &mut TestLink, trigger: Trigger) -> ObjectKey {
    let key = link.server.insert_object(trigger).unwrap();
    link.server.scope_mut(&link.connection).unwrap().include(&key);
    key
}

#[test]
fn group_larger_than_a_packet_stalls_only_itself() {
    init_logger();
    let mut link = tight_link(2000);

    let mut large = Trigger::new();
    large.set_enter_command(&"z".repeat(1023));
    let large = include(&mut link, large);
    let small = include(&mut link, Trigger::new());

    // both creates fit once the enter command is held back
    link.server.tick();
    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(events.len(), 2);
    for net_index in [0, 1] {
        assert!(events.contains(&ClientEvent::GhostCreated { net_index, kind: 0 }));
    }
    assert_ghost_mask(&link.server, &link.connection, &large, Trigger::ENTER_CMD_MASK);
    assert_ghost_pending(&link.server, &link.connection, &large, true);

    let handle = ghost_handle(&link.server, &link.connection, &large);
    let net_index = link.server.world().state().ghost(&handle).unwrap().net_index();
    assert_eq!(link.client.ghost::<Trigger>(net_index).unwrap().enter_command(), "");

    for skips in 1..=2 {
        let (_, events) = link.send(Delivery::Delivered);
        assert!(events.is_empty());
        let state = link.server.world().state();
        let info = state.ghost(&handle).unwrap();
        assert_eq!(info.status(), GhostStatus::Ghosted);
        assert_eq!(info.update_skips(), skips);
    }

    link.server
        .object_mut::<Trigger>(&large)
        .unwrap()
        .set_enter_command("fits();");
    let events = link.tick_and_exchange();
    assert_eq!(events, vec![ClientEvent::GhostUpdated { net_index }]);
    assert_eq!(
        link.client.ghost::<Trigger>(net_index).unwrap().enter_command(),
        "fits();"
    );
    assert!(link.server.scope(&link.connection).unwrap().is_ghosted(&small));
}

#[test]
fn capped_commands_are_created_across_packets() {
    init_logger();
    let mut link = TestLink::new();

    let mut trigger = Trigger::new();
    trigger.set_polyhedron("0 0 0  1 0 0  0 -1 0  0 0 1".parse().unwrap());
    trigger.set_enter_command(&"e".repeat(1023));
    trigger.set_leave_command(&"l".repeat(1023));
    trigger.set_tick_command(&"t".repeat(1023));
    let key = include(&mut link, trigger);

    link.server.tick();
    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(
        events,
        vec![ClientEvent::GhostCreated {
            net_index: 0,
            kind: 0
        }]
    );
    assert_ghost_mask(
        &link.server,
        &link.connection,
        &key,
        Trigger::ENTER_CMD_MASK | Trigger::LEAVE_CMD_MASK | Trigger::TICK_CMD_MASK,
    );

    let handle = ghost_handle(&link.server, &link.connection, &key);
    let mut rounds = 0;
    while link.server.world().is_pending(&handle) {
        let (_, events) = link.send(Delivery::Delivered);
        assert_eq!(events, vec![ClientEvent::GhostUpdated { net_index: 0 }]);
        rounds += 1;
        assert!(rounds <= 3);
    }
    assert_eq!(rounds, 3);

    let object = link.server.object::<Trigger>(&key).unwrap();
    let ghost = link.client.ghost::<Trigger>(0).unwrap();
    assert_eq!(ghost.polyhedron(), object.polyhedron());
    assert_eq!(ghost.enter_command(), object.enter_command());
    assert_eq!(ghost.leave_command(), object.leave_command());
    assert_eq!(ghost.tick_command(), object.tick_command());
}

#[test]
fn kills_are_written_before_creates() {
    init_logger();
    let mut link = TestLink::new();
    let first = include(&mut link, Trigger::new());
    link.tick_and_exchange();

    link.server
        .scope_mut(&link.connection)
        .unwrap()
        .exclude(&first);
    include(&mut link, Trigger::new());

    let events = link.tick_and_exchange();
    assert_eq!(
        events,
        vec![
            ClientEvent::GhostKilled { net_index: 0 },
            ClientEvent::GhostCreated {
                net_index: 1,
                kind: 0
            },
        ]
    );
}

#[test]
fn skipped_updates_gain_priority() {
    let mut link = TestLink::new();
    let older = include(&mut link, Trigger::new());
    let newer = include(&mut link, Trigger::new());
    link.tick_and_exchange();

    for key in [older, newer] {
        link.server
            .object_mut::<Trigger>(&key)
            .unwrap()
            .set_tick_command("tick();");
    }
    link.server.tick();

    let older_handle = ghost_handle(&link.server, &link.connection, &older);
    link.server
        .world()
        .state_mut()
        .record_skip(&older_handle);

    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(
        events,
        vec![
            ClientEvent::GhostUpdated { net_index: 0 },
            ClientEvent::GhostUpdated { net_index: 1 },
        ]
    );
    let state = link.server.world().state();
    let older_priority = state.ghost(&older_handle).unwrap().priority();
    let newer_handle = ghost_handle(&link.server, &link.connection, &newer);
    assert!(older_priority > state.ghost(&newer_handle).unwrap().priority());
}
