//! Pickups and the induction coils they activate while the simulation runs.
//!
//! A coil is modeled as a lazy follower: whenever either end pin changes and
//! exactly one end is live, the other end receives [`Voltage::HOT`]. Coils are
//! transient; they exist only between `pick_up` and `stop_picking_up`.

use std::cell::Cell;
use std::rc::Rc;

use super::{PickupCapable, PinSlot, Topology, VoltageResettable};
use crate::diagram::{ComponentId, Diagram, SubscriptionId, Voltage, VoltageListener};
use crate::error::{Result, WiringError};
use crate::geometry::Point;

const STRAT_LAYOUT: [PinSlot; 2] = [
    PinSlot::new("hot", 140.0, 105.0),
    PinSlot::new("ground", 159.0, 105.0),
];

const HUMBUCKER_LAYOUT: [PinSlot; 5] = [
    PinSlot::new("north_start", 6.0, 164.0),
    PinSlot::new("north_finish", 19.0, 181.0),
    PinSlot::new("south_finish", 38.0, 182.0),
    PinSlot::new("south_start", 55.0, 172.0),
    PinSlot::new("ground", 62.0, 155.0),
];

/// How a coil behaves when it is activated and neither end is live yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InductionBootstrap {
    /// Only mirror voltage that is already present
    #[default]
    Lazy,
    /// Seed `+1` onto the coil's end pin when both ends are dead
    SeedHot,
}

/// Pickup types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupModel {
    Strat,
    Humbucker,
}

impl PickupModel {
    /// Coil ends as (start, end) layout indices.
    pub fn coil_layout(&self) -> &'static [(usize, usize)] {
        match self {
            // ground -> hot
            PickupModel::Strat => &[(1, 0)],
            // south_finish -> south_start, north_start -> north_finish
            PickupModel::Humbucker => &[(2, 3), (0, 1)],
        }
    }
}

impl Topology for PickupModel {
    fn pin_layout(&self) -> &'static [PinSlot] {
        match self {
            PickupModel::Strat => &STRAT_LAYOUT,
            PickupModel::Humbucker => &HUMBUCKER_LAYOUT,
        }
    }
}

/// The two pins of one coil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilSpec {
    pub start: ComponentId,
    pub end: ComponentId,
}

/// Transient listener mirroring voltage across a coil.
#[derive(Debug)]
pub struct InductionCoil {
    pub spec: CoilSpec,
    /// Pin this coil last drove, cleared on stop
    induced: Cell<Option<ComponentId>>,
}

impl InductionCoil {
    pub fn new(spec: CoilSpec) -> Self {
        Self {
            spec,
            induced: Cell::new(None),
        }
    }

    pub fn induced_pin(&self) -> Option<ComponentId> {
        self.induced.get()
    }

    /// If exactly one end is live, drive the other end hot.
    pub fn induct(&self, diagram: &mut Diagram) -> Result<()> {
        let start_live = diagram.pin(self.spec.start)?.has_voltage();
        let end_live = diagram.pin(self.spec.end)?.has_voltage();
        let (target, from) = match (start_live, end_live) {
            (true, false) => (self.spec.end, self.spec.start),
            (false, true) => (self.spec.start, self.spec.end),
            _ => return Ok(()),
        };
        self.drive(diagram, target, Some(from))
    }

    /// Apply the bootstrap policy, then induct.
    pub fn activate(&self, diagram: &mut Diagram, bootstrap: InductionBootstrap) -> Result<()> {
        if bootstrap == InductionBootstrap::SeedHot
            && !diagram.pin(self.spec.start)?.has_voltage()
            && !diagram.pin(self.spec.end)?.has_voltage()
        {
            log::debug!("coil {} -> {}: seeding hot end", self.spec.start, self.spec.end);
            return self.drive(diagram, self.spec.end, None);
        }
        self.induct(diagram)
    }

    fn drive(&self, diagram: &mut Diagram, target: ComponentId, from: Option<ComponentId>) -> Result<()> {
        log::debug!("coil induces {} on pin {}", Voltage::HOT, target);
        self.induced.set(Some(target));
        diagram.pin_receive_voltage(target, Voltage::HOT, None, from)
    }
}

impl VoltageListener for InductionCoil {
    fn voltage_changed(&self, diagram: &mut Diagram, _pin: ComponentId, _value: Voltage) -> Result<()> {
        self.induct(diagram)
    }
}

/// A coil subscribed to its two pins.
#[derive(Debug, Clone)]
pub struct ActiveCoil {
    pub coil: Rc<InductionCoil>,
    pub subscriptions: Vec<SubscriptionId>,
}

/// A pickup part.
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: ComponentId,
    pub model: PickupModel,
    pub label: Option<String>,
    pub position: Point,
    pub(crate) pins: Vec<ComponentId>,
    active: Vec<ActiveCoil>,
}

impl Pickup {
    pub fn new(id: ComponentId, model: PickupModel, pins: Vec<ComponentId>) -> Self {
        Self {
            id,
            model,
            label: None,
            position: Point::default(),
            pins,
            active: Vec::new(),
        }
    }
}

impl PickupCapable for Pickup {
    fn coils(&self) -> Vec<CoilSpec> {
        self.model
            .coil_layout()
            .iter()
            .filter_map(|&(start, end)| {
                Some(CoilSpec {
                    start: *self.pins.get(start)?,
                    end: *self.pins.get(end)?,
                })
            })
            .collect()
    }

    fn is_picking_up(&self) -> bool {
        !self.active.is_empty()
    }

    fn attach_coils(&mut self, coils: Vec<ActiveCoil>) {
        self.active = coils;
    }

    fn detach_coils(&mut self) -> Vec<ActiveCoil> {
        std::mem::take(&mut self.active)
    }
}

impl Diagram {
    /// Activate a pickup's coils. Does nothing if it is already picking up.
    pub fn pick_up(&mut self, id: ComponentId, bootstrap: InductionBootstrap) -> Result<()> {
        let part = self.part(id)?;
        let name = part.full_name();
        let pickup = part
            .as_pickup()
            .ok_or_else(|| WiringError::not_capable(name.clone(), "pick up"))?;
        if pickup.is_picking_up() {
            return Ok(());
        }
        let specs = pickup.coils();

        let mut active = Vec::with_capacity(specs.len());
        for spec in specs {
            let coil = Rc::new(InductionCoil::new(spec));
            let subscriptions = vec![
                self.on_voltage_changed(spec.start, Rc::clone(&coil) as Rc<dyn VoltageListener>)?,
                self.on_voltage_changed(spec.end, Rc::clone(&coil) as Rc<dyn VoltageListener>)?,
            ];
            active.push(ActiveCoil { coil, subscriptions });
        }
        let coils: Vec<Rc<InductionCoil>> = active.iter().map(|a| Rc::clone(&a.coil)).collect();

        if let Some(pickup) = self.part_mut(id)?.as_pickup_mut() {
            pickup.attach_coils(active);
        }
        log::info!("{} picking up ({} coils)", name, coils.len());

        for coil in coils {
            coil.activate(self, bootstrap)?;
        }
        Ok(())
    }

    /// Detach a pickup's coils and clear whatever they induced.
    pub fn stop_picking_up(&mut self, id: ComponentId) -> Result<()> {
        let part = self.part_mut(id)?;
        let name = part.full_name();
        let active = part
            .as_pickup_mut()
            .ok_or_else(|| WiringError::not_capable(name.clone(), "stop picking up"))?
            .detach_coils();

        for coil in active {
            for subscription in coil.subscriptions {
                self.off(subscription);
            }
            if let Some(induced) = coil.coil.induced_pin() {
                // The pin may have been removed while the simulation ran
                if let Ok(pin) = self.pin_mut(induced) {
                    if pin.has_voltage() {
                        pin.reset_voltage();
                    }
                }
            }
        }
        log::info!("{} stopped picking up", name);
        Ok(())
    }
}
