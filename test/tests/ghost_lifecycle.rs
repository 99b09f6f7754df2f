use ghostwire_client::ClientEvent;
use ghostwire_shared::{AffineTransform, GhostStatus, Polyhedron, Replicate, Trigger};
use ghostwire_test::{assert_ghost_mask, assert_ghost_pending, ghost_handle, Delivery, TestLink};

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

fn scoped_trigger(link: &mut TestLink) -> ghostwire_shared::ObjectKey {
    let trigger = link.server.insert_object(Trigger::new()).unwrap();
    link.server
        .scope_mut(&link.connection)
        .unwrap()
        .include(&trigger);
    trigger
}

fn status(link: &TestLink, object: &ghostwire_shared::ObjectKey) -> Option<GhostStatus> {
    let handle = ghost_handle(&link.server, &link.connection, object);
    link.server.world().ghost_status(&handle)
}

#[test]
fn scoped_object_is_created_then_updated() {
    init_logger();
    let mut link = TestLink::new();
    let trigger = scoped_trigger(&mut link);

    let events = link.tick_and_exchange();
    assert_eq!(
        events,
        vec![ClientEvent::GhostCreated {
            net_index: 0,
            kind: 0
        }]
    );
    assert_eq!(status(&link, &trigger), Some(GhostStatus::Ghosted));
    assert_ghost_pending(&link.server, &link.connection, &trigger, false);

    link.server
        .object_mut::<Trigger>(&trigger)
        .unwrap()
        .set_transform(AffineTransform::from_position(glam::Vec3::new(4.0, 0.0, 2.0)));
    let events = link.tick_and_exchange();
    assert_eq!(events, vec![ClientEvent::GhostUpdated { net_index: 0 }]);

    let ghost = link.client.ghost::<Trigger>(0).unwrap();
    assert!(ghost.net_object().is_ghost());
    assert_eq!(ghost.transform().position, glam::Vec3::new(4.0, 0.0, 2.0));
}

#[test]
fn nothing_is_written_while_caught_up() {
    let mut link = TestLink::new();
    scoped_trigger(&mut link);
    link.tick_and_exchange();

    let (_, events) = link.send(Delivery::Delivered);
    assert!(events.is_empty());
}

#[test]
fn updates_wait_for_the_create_acknowledgement() {
    init_logger();
    let mut link = TestLink::new();
    let trigger = scoped_trigger(&mut link);

    link.server.tick();
    let (create_packet, events) = link.send(Delivery::InFlight);
    assert_eq!(events.len(), 1);
    assert_eq!(status(&link, &trigger), Some(GhostStatus::Ghosting));

    link.server
        .object_mut::<Trigger>(&trigger)
        .unwrap()
        .set_enter_command("onEnter();");
    link.server.tick();
    assert_ghost_mask(&link.server, &link.connection, &trigger, Trigger::ENTER_CMD_MASK);

    let (_, events) = link.send(Delivery::Delivered);
    assert!(events.is_empty());
    assert_ghost_pending(&link.server, &link.connection, &trigger, true);

    link.deliver(create_packet);
    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(events, vec![ClientEvent::GhostUpdated { net_index: 0 }]);
    assert_eq!(
        link.client.ghost::<Trigger>(0).unwrap().enter_command(),
        "onEnter();"
    );
}

#[test]
fn dropped_create_is_written_again() {
    let mut link = TestLink::new();
    let trigger = scoped_trigger(&mut link);
    link.server
        .object_mut::<Trigger>(&trigger)
        .unwrap()
        .set_tick_command("tick();");

    link.server.tick();
    link.send(Delivery::Dropped);
    assert_eq!(status(&link, &trigger), Some(GhostStatus::NotYetGhosted));
    assert_ghost_mask(&link.server, &link.connection, &trigger, u32::MAX);

    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(
        events,
        vec![ClientEvent::GhostCreated {
            net_index: 0,
            kind: 0
        }]
    );
    assert_eq!(link.client.ghost::<Trigger>(0).unwrap().tick_command(), "tick();");
}

#[test]
fn dropped_update_bits_return_unless_resent() {
    init_logger();
    let mut link = TestLink::new();
    let trigger = scoped_trigger(&mut link);
    link.tick_and_exchange();

    let cube: Polyhedron = "0 0 0  1 0 0  0 -1 0  0 0 1".parse().unwrap();
    {
        let object = link.server.object_mut::<Trigger>(&trigger).unwrap();
        object.set_polyhedron(cube);
        object.set_enter_command("a();");
    }
    link.server.tick();
    let (first, _) = link.send(Delivery::InFlight);
    assert_ghost_pending(&link.server, &link.connection, &trigger, false);

    link.server
        .object_mut::<Trigger>(&trigger)
        .unwrap()
        .set_enter_command("b();");
    link.server.tick();
    link.send(Delivery::InFlight);

    // the newer packet already carries the enter command again
    link.drop_packet(first);
    assert_ghost_mask(&link.server, &link.connection, &trigger, Trigger::POLY_MASK);
    assert_ghost_pending(&link.server, &link.connection, &trigger, true);

    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(events, vec![ClientEvent::GhostUpdated { net_index: 0 }]);
    let ghost = link.client.ghost::<Trigger>(0).unwrap();
    assert_eq!(ghost.polyhedron().points.len(), 8);
    assert_eq!(ghost.enter_command(), "b();");
}

#[test]
fn scope_exit_kills_and_recycles_the_index() {
    init_logger();
    let mut link = TestLink::new();
    let trigger = scoped_trigger(&mut link);
    link.tick_and_exchange();

    link.server
        .scope_mut(&link.connection)
        .unwrap()
        .exclude(&trigger);
    link.server.tick();
    assert!(link
        .server
        .world()
        .state()
        .ghost_for(&link.connection, &trigger)
        .is_none());

    // the kill is lost once, then resent
    link.send(Delivery::Dropped);
    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(events, vec![ClientEvent::GhostKilled { net_index: 0 }]);
    assert_eq!(link.client.ghost_count(), 0);
    assert_eq!(link.server.world().state().ghost_count(&link.connection), 0);

    let other = scoped_trigger(&mut link);
    let events = link.tick_and_exchange();
    assert_eq!(
        events,
        vec![ClientEvent::GhostCreated {
            net_index: 0,
            kind: 0
        }]
    );
    assert!(link
        .server
        .scope(&link.connection)
        .unwrap()
        .is_ghosted(&other));
}

#[test]
fn removed_objects_are_killed_everywhere() {
    let mut link = TestLink::new();
    let trigger = scoped_trigger(&mut link);
    link.tick_and_exchange();

    let removed = link.server.remove_object(&trigger).unwrap();
    assert_eq!(removed.name(), "Trigger");
    assert!(!link.server.scope(&link.connection).unwrap().has(&trigger));

    let (_, events) = link.send(Delivery::Delivered);
    assert_eq!(events, vec![ClientEvent::GhostKilled { net_index: 0 }]);
}

#[test]
fn never_sent_ghosts_leave_silently() {
    let mut link = TestLink::new();
    let trigger = scoped_trigger(&mut link);
    link.server.tick();

    link.server
        .scope_mut(&link.connection)
        .unwrap()
        .clear();
    link.server.tick();

    let (_, events) = link.send(Delivery::Delivered);
    assert!(events.is_empty());
    assert!(!link
        .server
        .scope(&link.connection)
        .unwrap()
        .is_ghosted(&trigger));
}

#[test]
fn scope_always_objects_reach_every_connection() {
    let mut link = TestLink::new();
    let mut trigger = Trigger::new();
    trigger.net_object_mut().set_scope_always(true);
    let trigger = link.server.insert_object(trigger).unwrap();
    let late = link.server.connect();

    link.server.tick();
    for connection in [link.connection, late] {
        assert!(link.server.scope(&connection).unwrap().is_ghosted(&trigger));
    }
    link.server.disconnect(&late).unwrap();
    assert!(link.server.scope(&late).is_err());
}
