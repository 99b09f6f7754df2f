use glam::Vec3;

use ghostwire_client::ClientEvent;
use ghostwire_shared::{Polyhedron, Trigger};
use ghostwire_test::{assert_ghost_mask, TestLink};

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

fn ghosted_trigger(link: &mut TestLink, trigger: Trigger) -> ghostwire_shared::ObjectKey {
    let key = link.server.insert_object(trigger).unwrap();
    link.server.scope_mut(&link.connection).unwrap().include(&key);
    link.tick_and_exchange();
    key
}

#[test]
fn longest_command_survives_alone() {
    init_logger();
    let mut link = TestLink::new();
    let mut trigger = Trigger::new();
    trigger.set_leave_command("leave();");
    trigger.set_tick_command("tick();");
    let key = ghosted_trigger(&mut link, trigger);

    let command = "x".repeat(1023);
    link.server
        .object_mut::<Trigger>(&key)
        .unwrap()
        .set_enter_command(&command);
    link.server.tick();
    assert_ghost_mask(&link.server, &link.connection, &key, Trigger::ENTER_CMD_MASK);

    // the ghost's other commands must not be touched by this update
    link.client
        .ghost_mut::<Trigger>(0)
        .unwrap()
        .set_leave_command("local");

    let (_, events) = link.send(ghostwire_test::Delivery::Delivered);
    assert_eq!(events, vec![ClientEvent::GhostUpdated { net_index: 0 }]);
    let ghost = link.client.ghost::<Trigger>(0).unwrap();
    assert_eq!(ghost.enter_command(), command);
    assert_eq!(ghost.leave_command(), "local");
    assert_eq!(ghost.tick_command(), "tick();");
}

#[test]
fn overlong_commands_are_cut_at_the_string_cap() {
    let mut trigger = Trigger::new();
    trigger.set_enter_command(&"y".repeat(2000));
    assert_eq!(trigger.enter_command().len(), 1023);
}

#[test]
fn empty_command_clears_the_ghost() {
    let mut trigger = Trigger::new();
    trigger.set_enter_command("onEnter();");
    let mut link = TestLink::new();
    let key = ghosted_trigger(&mut link, trigger);
    assert_eq!(link.client.ghost::<Trigger>(0).unwrap().enter_command(), "onEnter();");

    link.server
        .object_mut::<Trigger>(&key)
        .unwrap()
        .set_enter_command("");
    link.tick_and_exchange();
    assert_eq!(link.client.ghost::<Trigger>(0).unwrap().enter_command(), "");
}

#[test]
fn polyhedron_rebuilds_the_ghost_bounds() {
    init_logger();
    let mut link = TestLink::new();
    let key = ghosted_trigger(&mut link, Trigger::new());

    let shape: Polyhedron = "-1 -1 0  2 0 0  0 2 0  0 0 4".parse().unwrap();
    link.server
        .object_mut::<Trigger>(&key)
        .unwrap()
        .set_polyhedron(shape.clone());
    link.tick_and_exchange();

    let ghost = link.client.ghost::<Trigger>(0).unwrap();
    assert_eq!(ghost.polyhedron(), &shape);
    let obj_box = ghost.game_base().scene.obj_box();
    assert_eq!(obj_box.min, Vec3::new(-1.0, -1.0, 0.0));
    assert_eq!(obj_box.max, Vec3::new(1.0, 1.0, 4.0));
    assert_eq!(
        ghost.contains_point(Vec3::new(0.0, 0.0, 2.0)),
        link.server
            .object::<Trigger>(&key)
            .unwrap()
            .contains_point(Vec3::new(0.0, 0.0, 2.0))
    );
}
