use ghostwire_server::ServerError;
use ghostwire_shared::{
    DataBlockError, Trigger, TriggerData, DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST,
};
use ghostwire_test::TestLink;

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

#[test]
fn preload_rebuilds_every_block() {
    init_logger();
    let mut link = TestLink::new();
    link.server
        .add_datablock(DATA_BLOCK_ID_LAST, TriggerData::new(250, true))
        .unwrap();
    link.server
        .add_datablock(DATA_BLOCK_ID_FIRST, TriggerData::new(40, false))
        .unwrap();

    let preload = link.server.write_datablocks();
    assert_eq!(link.client.read_datablocks(&preload).unwrap(), 2);
    assert_eq!(link.client.datablock_count(), 2);

    let first = link
        .client
        .datablock::<TriggerData>(DATA_BLOCK_ID_FIRST)
        .unwrap();
    assert_eq!(first.tick_period_ms(), TriggerData::MIN_TICK_PERIOD_MS);
    assert!(!first.is_client_side());

    let last = link
        .client
        .datablock::<TriggerData>(DATA_BLOCK_ID_LAST)
        .unwrap();
    assert_eq!(last.tick_period_ms(), 250);
    assert!(last.is_client_side());
}

#[test]
fn empty_preload_is_a_single_flag() {
    let mut link = TestLink::new();
    let preload = link.server.write_datablocks();
    assert_eq!(preload.len(), 1);
    assert_eq!(link.client.read_datablocks(&preload).unwrap(), 0);
}

#[test]
fn ids_are_checked() {
    let mut link = TestLink::new();
    let result = link
        .server
        .add_datablock(DATA_BLOCK_ID_FIRST - 1, TriggerData::default());
    assert!(matches!(
        result,
        Err(ServerError::DataBlock(DataBlockError::IdOutOfRange { .. }))
    ));

    link.server
        .add_datablock(7, TriggerData::default())
        .unwrap();
    let result = link.server.add_datablock(7, TriggerData::default());
    assert!(matches!(
        result,
        Err(ServerError::DataBlock(DataBlockError::IdInUse { id: 7 }))
    ));
    assert!(link.server.datablock::<TriggerData>(&7).is_some());
}

#[test]
fn ghosts_resolve_their_datablock() {
    init_logger();
    let mut link = TestLink::new();
    link.server
        .add_datablock(12, TriggerData::new(500, false))
        .unwrap();
    let preload = link.server.write_datablocks();
    link.client.read_datablocks(&preload).unwrap();

    let mut trigger = Trigger::new();
    trigger.game_base_mut().set_data_block(Some(12)).unwrap();
    let key = link.server.insert_object(trigger).unwrap();
    link.server.scope_mut(&link.connection).unwrap().include(&key);
    link.tick_and_exchange();

    let id = link
        .client
        .ghost::<Trigger>(0)
        .unwrap()
        .game_base()
        .data_block()
        .unwrap();
    assert_eq!(id, 12);
    assert_eq!(
        link.client
            .datablock::<TriggerData>(id)
            .unwrap()
            .tick_period_ms(),
        500
    );

    link.server
        .object_mut::<Trigger>(&key)
        .unwrap()
        .game_base_mut()
        .set_data_block(None)
        .unwrap();
    link.tick_and_exchange();
    assert_eq!(
        link.client.ghost::<Trigger>(0).unwrap().game_base().data_block(),
        None
    );
}
