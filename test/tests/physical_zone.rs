use glam::Vec3;

use ghostwire_client::ClientEvent;
use ghostwire_shared::{AffineTransform, NetObject, PhysicalZone, Polyhedron};
use ghostwire_test::{assert_ghost_mask, TestLink};

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

fn configured_zone() -> PhysicalZone {
    let mut zone = PhysicalZone::new();
    zone.set_transform(AffineTransform::from_position(Vec3::new(10.0, 0.0, 0.0)));
    zone.set_polyhedron("0 0 0  1 0 0  0 -1 0  0 0 1".parse::<Polyhedron>().unwrap());
    zone.set_modifiers(0.5, -1.0, Vec3::new(0.0, 0.0, 300.0));
    zone
}

#[test]
fn create_carries_the_whole_configuration() {
    init_logger();
    let mut link = TestLink::new();
    let key = link.server.insert_object(configured_zone()).unwrap();
    link.server.scope_mut(&link.connection).unwrap().include(&key);

    let events = link.tick_and_exchange();
    assert_eq!(
        events,
        vec![ClientEvent::GhostCreated {
            net_index: 0,
            kind: 1
        }]
    );

    let ghost = link.client.ghost::<PhysicalZone>(0).unwrap();
    assert_eq!(ghost.velocity_mod(), 0.5);
    assert_eq!(ghost.gravity_mod(), -1.0);
    assert_eq!(ghost.applied_force(), Vec3::new(0.0, 0.0, 300.0));
    assert_eq!(ghost.polyhedron().points.len(), 8);
    assert_eq!(ghost.scene().transform().position, Vec3::new(10.0, 0.0, 0.0));
    assert!(ghost.is_active());
}

#[test]
fn toggling_only_sends_the_active_flag() {
    init_logger();
    let mut link = TestLink::new();
    let key = link.server.insert_object(configured_zone()).unwrap();
    link.server.scope_mut(&link.connection).unwrap().include(&key);
    link.tick_and_exchange();

    link.server
        .object_mut::<PhysicalZone>(&key)
        .unwrap()
        .deactivate();
    link.server.tick();
    assert_ghost_mask(&link.server, &link.connection, &key, PhysicalZone::ACTIVE_MASK);

    // a stale local value proves the configuration block was not resent
    link.client
        .ghost_mut::<PhysicalZone>(0)
        .unwrap()
        .set_modifiers(9.0, 9.0, Vec3::ZERO);

    let (_, events) = link.send(ghostwire_test::Delivery::Delivered);
    assert_eq!(events, vec![ClientEvent::GhostUpdated { net_index: 0 }]);
    let ghost = link.client.ghost::<PhysicalZone>(0).unwrap();
    assert!(!ghost.is_active());
    assert_eq!(ghost.velocity_mod(), 9.0);
}

#[test]
fn reconfiguring_resends_the_initial_block() {
    let mut link = TestLink::new();
    let key = link.server.insert_object(configured_zone()).unwrap();
    link.server.scope_mut(&link.connection).unwrap().include(&key);
    link.tick_and_exchange();

    link.server
        .object_mut::<PhysicalZone>(&key)
        .unwrap()
        .set_modifiers(2.0, 0.0, Vec3::X);
    link.server.tick();
    assert_ghost_mask(
        &link.server,
        &link.connection,
        &key,
        NetObject::INITIAL_UPDATE_MASK,
    );

    link.tick_and_exchange();
    let ghost = link.client.ghost::<PhysicalZone>(0).unwrap();
    assert_eq!(ghost.velocity_mod(), 2.0);
    assert_eq!(ghost.applied_force(), Vec3::X);
    assert!(ghost.is_active());
}
