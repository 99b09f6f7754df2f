use std::collections::VecDeque;

use proptest::prelude::*;

use ghostwire_shared::{ObjectKey, PacketIndex, Trigger};
use ghostwire_test::{Delivery, TestLink};

const TRIGGERS: usize = 3;
const COMMANDS: [&str; 4] = ["", "a();", "b(1, 2);", "schedule(100, c);"];

#[derive(Clone, Debug)]
enum Op {
    SetEnter(usize, usize),
    SetTick(usize, usize),
    Send(Delivery),
    Resolve(bool),
    Tick,
}

fn op() -> impl Strategy<Value = Op> {
    let delivery = prop_oneof![
        Just(Delivery::Delivered),
        Just(Delivery::InFlight),
        Just(Delivery::Dropped),
    ];
    prop_oneof![
        (0..TRIGGERS, 0..COMMANDS.len()).prop_map(|(t, c)| Op::SetEnter(t, c)),
        (0..TRIGGERS, 0..COMMANDS.len()).prop_map(|(t, c)| Op::SetTick(t, c)),
        delivery.prop_map(Op::Send),
        any::<bool>().prop_map(Op::Resolve),
        Just(Op::Tick),
    ]
}

fn setup() -> (TestLink, Vec<ObjectKey>) {
    let mut link = TestLink::new();
    let keys: Vec<ObjectKey> = (0..TRIGGERS)
        .map(|_| link.server.insert_object(Trigger::new()).unwrap())
        .collect();
    for key in &keys {
        link.server.scope_mut(&link.connection).unwrap().include(key);
    }
    link.server.tick();
    (link, keys)
}

proptest! {
    #[test]
    fn ghosts_converge_once_the_link_settles(ops in prop::collection::vec(op(), 1..60)) {
        let (mut link, keys) = setup();
        let mut in_flight: VecDeque<PacketIndex> = VecDeque::new();

        for op in ops {
            match op {
                Op::SetEnter(trigger, command) => {
                    link.server
                        .object_mut::<Trigger>(&keys[trigger])
                        .unwrap()
                        .set_enter_command(COMMANDS[command]);
                }
                Op::SetTick(trigger, command) => {
                    link.server
                        .object_mut::<Trigger>(&keys[trigger])
                        .unwrap()
                        .set_tick_command(COMMANDS[command]);
                }
                Op::Send(delivery) => {
                    let (packet_index, _) = link.send(delivery);
                    if delivery == Delivery::InFlight {
                        in_flight.push_back(packet_index);
                    }
                }
                Op::Resolve(delivered) => {
                    if let Some(packet_index) = in_flight.pop_front() {
                        if delivered {
                            link.deliver(packet_index);
                        } else {
                            link.drop_packet(packet_index);
                        }
                    }
                }
                Op::Tick => link.server.tick(),
            }
        }

        for packet_index in in_flight {
            link.deliver(packet_index);
        }
        for _ in 0..4 {
            link.tick_and_exchange();
        }

        prop_assert_eq!(link.client.ghost_count(), TRIGGERS);
        for key in &keys {
            let state = link.server.world().state();
            let handle = state.ghost_for(&link.connection, key).unwrap();
            let info = state.ghost(&handle).unwrap();
            prop_assert_eq!(info.update_mask(), 0);
            prop_assert!(!state.is_pending(&handle));

            let object = link.server.object::<Trigger>(key).unwrap();
            let ghost = link.client.ghost::<Trigger>(info.net_index()).unwrap();
            prop_assert_eq!(ghost.enter_command(), object.enter_command());
            prop_assert_eq!(ghost.tick_command(), object.tick_command());
        }
    }
}
