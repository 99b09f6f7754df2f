use ghostwire_server::Server;
use ghostwire_shared::{ConnectionKey, GhostHandle, ObjectKey};

pub fn ghost_handle(server: &Server, connection: &ConnectionKey, object: &ObjectKey) -> GhostHandle {
    server
        .world()
        .ghost_for(connection, object)
        .unwrap_or_else(|| panic!("{object} is not ghosted to {connection}"))
}

pub fn assert_ghost_pending(
    server: &Server,
    connection: &ConnectionKey,
    object: &ObjectKey,
    pending: bool,
) {
    let handle = ghost_handle(server, connection, object);
    assert_eq!(
        server.world().is_pending(&handle),
        pending,
        "pending state of {object} on {connection}"
    );
}

pub fn assert_ghost_mask(server: &Server, connection: &ConnectionKey, object: &ObjectKey, mask: u32) {
    let handle = ghost_handle(server, connection, object);
    let actual = server.world().update_mask_of(&handle);
    assert_eq!(actual, Some(mask), "update mask of {object} on {connection}");
}
