//! Example: Converting a design built from records
//!
//! This example builds a raw design programmatically, the way a parser
//! binding would, then resolves, compacts and encodes it.

use layoutdb::{
    DesignBuilder,
    config::{AppConfig, OutputConfig},
    core::{
        design::{RawDesign, Regions},
        entity::{Instance, Net, Pin},
        geometry::Rect,
        id::EntityId,
        reference::Ref,
    },
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building design from records...\n");

    let id = EntityId::from_raw;

    // Placement regions
    let regions = Regions {
        bounding_box: Rect::new(id(100), 0, 0, 2000, 2000),
        core: Rect::new(id(101), 200, 200, 1800, 1800),
        die: Rect::new(id(102), 0, 0, 2000, 2000),
    };
    let mut raw = RawDesign::named("adder", regions);

    // One cell with two pins, and an input port driving one of them
    raw.instances.push(
        Instance::new(id(1), "u_add")
            .with_master("FA_X1")
            .with_pins(vec![Ref::stub(id(1)), Ref::stub(id(2))]),
    );
    raw.instance_pins.push(
        Pin::new(id(1), "A")
            .with_instance(Ref::stub(id(1)))
            .with_net(Ref::stub(id(1))),
    );
    raw.instance_pins
        .push(Pin::new(id(2), "S").with_instance(Ref::stub(id(1))));
    raw.block_pins
        .push(Pin::block(id(3), "a").with_net(Ref::stub(id(1))));
    raw.nets
        .push(Net::new(id(1), "a").with_pins(vec![Ref::stub(id(1)), Ref::stub(id(3))]));

    // Resolve, then compact
    let builder = DesignBuilder::new(AppConfig::default().with_output(OutputConfig::new(false, true)));
    let design = builder.resolve(&raw)?;
    println!(
        "Resolved: pin A belongs to {}",
        design.instance_pins[0]
            .instance
            .as_ref()
            .and_then(Ref::as_full)
            .map_or("?", |instance| instance.name.as_str())
    );

    let compacted = builder.compact(&design);
    let bytes = builder.encode(&compacted)?;

    println!("{}", String::from_utf8(bytes)?);
    Ok(())
}
