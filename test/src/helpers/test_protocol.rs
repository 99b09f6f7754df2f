use ghostwire_shared::{PhysicalZone, Protocol, Trigger, TriggerData, WaterBlock};

/// Every replicated type and datablock type the tests use, in a fixed
/// registration order shared by server and client.
pub fn protocol() -> Protocol {
    Protocol::builder()
        .add_object::<Trigger>()
        .add_object::<PhysicalZone>()
        .add_object::<WaterBlock>()
        .add_datablock::<TriggerData>()
        .build()
}
