//! Sample diagrams built in code.

use crate::components::PartKind;
use crate::diagram::{ComponentId, Diagram, Wire, WireColor};
use crate::error::Result;
use crate::geometry::Point;

/// Ids of the interesting components in a demo diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoParts {
    pub pickup: ComponentId,
    pub jack: ComponentId,
    pub hot_wire: ComponentId,
    pub ground_wire: ComponentId,
}

fn routed_wire(
    diagram: &mut Diagram,
    start: ComponentId,
    end: ComponentId,
    mid: Point,
    color: WireColor,
) -> Result<ComponentId> {
    let start_point = diagram.pin_position(start)?;
    let end_point = diagram.pin_position(end)?;
    let wire = Wire::new(diagram.next_id(), start, end)
        .with_points(start_point, mid, end_point)
        .with_color(color);
    diagram.insert_wire(wire)
}

/// A single-coil pickup wired straight into a mono output jack.
///
/// Hot goes to the tip on a red wire, ground to the sleeve on a black one.
pub fn strat_pickup_and_jack() -> Result<(Diagram, DemoParts)> {
    let mut diagram = Diagram::new();
    let pickup = diagram.add_part_at(PartKind::StratPickup, Point::new(0.0, 0.0), Some("Neck"))?;
    let jack = diagram.add_part_at(PartKind::MonoJack, Point::new(300.0, 0.0), Some("Output"))?;

    let hot = diagram.pin_named(pickup, "hot")?;
    let ground = diagram.pin_named(pickup, "ground")?;
    let tip = diagram.pin_named(jack, "tip")?;
    let sleeve = diagram.pin_named(jack, "sleeve")?;

    let hot_wire = routed_wire(&mut diagram, hot, tip, Point::new(150.0, 150.0), WireColor::Red)?;
    let ground_wire = routed_wire(&mut diagram, ground, sleeve, Point::new(160.0, 160.0), WireColor::Black)?;
    diagram.drain_events();

    Ok((
        diagram,
        DemoParts {
            pickup,
            jack,
            hot_wire,
            ground_wire,
        },
    ))
}

/// The same pickup and jack with an on-on DPDT switch in the hot leg.
///
/// Returns the switch id alongside the usual ids; `hot_wire` runs from the
/// pickup to the switch. In state 0 the switch connects the pickup to the
/// tip; flipping it cuts the signal.
pub fn strat_through_switch() -> Result<(Diagram, DemoParts, ComponentId)> {
    let mut diagram = Diagram::new();
    let pickup = diagram.add_part_at(PartKind::StratPickup, Point::new(0.0, 0.0), None)?;
    let switch = diagram.add_part_at(PartKind::DpdtOnOn, Point::new(180.0, 0.0), Some("Kill"))?;
    let jack = diagram.add_part_at(PartKind::MonoJack, Point::new(300.0, 0.0), None)?;

    let hot = diagram.pin_named(pickup, "hot")?;
    let ground = diagram.pin_named(pickup, "ground")?;
    let common = diagram.pin_named(switch, "pin2")?;
    let throw = diagram.pin_named(switch, "pin1")?;
    let tip = diagram.pin_named(jack, "tip")?;
    let sleeve = diagram.pin_named(jack, "sleeve")?;

    let hot_wire = diagram.add_wire(hot, common)?;
    diagram.change_wire_color(hot_wire, WireColor::Red)?;
    let out_wire = diagram.add_wire(throw, tip)?;
    diagram.change_wire_color(out_wire, WireColor::Red)?;
    let ground_wire = diagram.add_wire(ground, sleeve)?;
    diagram.drain_events();

    let parts = DemoParts {
        pickup,
        jack,
        hot_wire,
        ground_wire,
    };
    Ok((diagram, parts, switch))
}
