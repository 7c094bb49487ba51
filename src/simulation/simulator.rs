//! Main simulator interface.

use crate::components::{InductionBootstrap, Part};
use crate::diagram::{ComponentId, Diagram, WireActivity};
use crate::error::Result;

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// How coils start when neither end has voltage.
    pub bootstrap: InductionBootstrap,
    /// Stop and start again after a flip, rotation or wiring change made
    /// while running, so every voltage is rederived.
    pub restart_on_change: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bootstrap: InductionBootstrap::Lazy,
            restart_on_change: true,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coil bootstrap policy.
    pub fn with_bootstrap(mut self, bootstrap: InductionBootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Set whether changes restart a running simulation.
    pub fn with_restart_on_change(mut self, restart_on_change: bool) -> Self {
        self.restart_on_change = restart_on_change;
        self
    }
}

/// Runs the signal simulation over a diagram.
///
/// Starting activates every pickup, then plugs in every jack: a jack grounds
/// its sleeve, and the pickups must already be listening for that ground to
/// find their return path.
#[derive(Debug)]
pub struct Simulator {
    diagram: Diagram,
    config: SimulationConfig,
    running: bool,
}

impl Simulator {
    /// Create a new simulator with default configuration.
    pub fn new(diagram: Diagram) -> Self {
        Self::with_config(diagram, SimulationConfig::default())
    }

    /// Create a new simulator with custom configuration.
    pub fn with_config(diagram: Diagram, config: SimulationConfig) -> Self {
        Self {
            diagram,
            config,
            running: false,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Direct access to the diagram. Changes made here do not restart a
    /// running simulation.
    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn parts_where(&self, predicate: fn(&Part) -> bool) -> Vec<ComponentId> {
        self.diagram.parts().filter(|p| predicate(p)).map(Part::id).collect()
    }

    /// Activate all pickups, then all jacks.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            return Ok(());
        }
        let pickups = self.parts_where(|p| p.as_pickup().is_some());
        let jacks = self.parts_where(|p| p.as_jack().is_some());
        log::info!(
            "starting simulation: {} pickups, {} jacks",
            pickups.len(),
            jacks.len()
        );

        // Mark running first so a failed cascade can still be stopped
        self.running = true;
        for id in pickups {
            self.diagram.pick_up(id, self.config.bootstrap)?;
        }
        for id in jacks {
            self.diagram.jack_in(id)?;
        }
        log::info!("{} wires live", self.diagram.live_wires().len());
        Ok(())
    }

    /// Detach every coil and jack listener and zero all voltages.
    pub fn stop(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        for id in self.parts_where(|p| p.as_pickup().is_some()) {
            self.diagram.stop_picking_up(id)?;
        }
        for id in self.parts_where(|p| p.as_jack().is_some()) {
            self.diagram.jack_out(id)?;
        }
        self.diagram.reset_voltages();
        self.running = false;
        log::info!("simulation stopped");
        Ok(())
    }

    /// Stop and start again.
    pub fn restart(&mut self) -> Result<()> {
        self.stop()?;
        self.start()
    }

    fn changed(&mut self) -> Result<()> {
        if self.running && self.config.restart_on_change {
            log::debug!("diagram changed while running, restarting");
            self.restart()?;
        }
        Ok(())
    }

    /// Flip a switch.
    pub fn flip(&mut self, id: ComponentId) -> Result<i8> {
        let state = self.diagram.flip(id)?;
        self.changed()?;
        Ok(state)
    }

    /// Rotate a potentiometer.
    pub fn rotate(&mut self, id: ComponentId) -> Result<crate::components::Rotation> {
        let rotation = self.diagram.rotate(id)?;
        self.changed()?;
        Ok(rotation)
    }

    /// Draw a wire between two pins.
    pub fn add_wire(&mut self, start: ComponentId, end: ComponentId) -> Result<ComponentId> {
        let id = self.diagram.add_wire(start, end)?;
        self.changed()?;
        Ok(id)
    }

    /// Remove a wire.
    pub fn remove_wire(&mut self, id: ComponentId) -> Result<()> {
        self.diagram.wire(id)?;
        self.diagram.remove(id)?;
        self.changed()
    }

    /// Remove a part and the wires attached to it.
    pub fn remove_part(&mut self, id: ComponentId) -> Result<()> {
        self.diagram.part(id)?;
        self.stop_part(id)?;
        self.diagram.remove_with_wires(id)?;
        self.changed()
    }

    fn stop_part(&mut self, id: ComponentId) -> Result<()> {
        let part = self.diagram.part(id)?;
        if part.as_pickup().is_some() {
            self.diagram.stop_picking_up(id)?;
        } else if part.as_jack().is_some() {
            self.diagram.jack_out(id)?;
        }
        Ok(())
    }

    /// Wires that currently carry voltage.
    pub fn live_wires(&self) -> Vec<WireActivity> {
        self.diagram.live_wires()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PartKind;
    use crate::demos;
    use crate::diagram::Voltage;

    fn voltage(sim: &Simulator, part: ComponentId, pin: &str) -> Voltage {
        let id = sim.diagram().pin_named(part, pin).unwrap();
        sim.diagram().pin(id).unwrap().voltage()
    }

    #[test]
    fn test_strat_into_jack() {
        let (diagram, parts) = demos::strat_pickup_and_jack().unwrap();
        let mut sim = Simulator::new(diagram);
        sim.start().unwrap();

        assert_eq!(voltage(&sim, parts.pickup, "hot"), Voltage::HOT);
        assert_eq!(voltage(&sim, parts.pickup, "ground"), Voltage::GROUND);
        assert_eq!(voltage(&sim, parts.jack, "tip"), Voltage::HOT);
        assert_eq!(voltage(&sim, parts.jack, "sleeve"), Voltage::GROUND);
        assert_eq!(sim.live_wires().len(), 2);
    }

    #[test]
    fn test_stop_resets_everything() {
        let (diagram, parts) = demos::strat_pickup_and_jack().unwrap();
        let mut sim = Simulator::new(diagram);
        sim.start().unwrap();
        sim.stop().unwrap();

        assert!(!sim.is_running());
        assert!(sim.live_wires().is_empty());
        assert!(sim.diagram().pins().all(|p| !p.has_voltage()));
        let hot = sim.diagram().pin_named(parts.pickup, "hot").unwrap();
        assert_eq!(sim.diagram().listener_count(hot), 0);

        // Start again from a clean slate
        sim.start().unwrap();
        assert_eq!(voltage(&sim, parts.jack, "tip"), Voltage::HOT);
    }

    #[test]
    fn test_unwired_jack_only_grounds_sleeve() {
        let mut diagram = Diagram::new();
        let jack = diagram.add_part(PartKind::MonoJack).unwrap();
        let mut sim = Simulator::new(diagram);
        sim.start().unwrap();
        assert_eq!(voltage(&sim, jack, "sleeve"), Voltage::GROUND);
        assert_eq!(voltage(&sim, jack, "tip"), Voltage::NONE);
    }

    #[test]
    fn test_flip_restarts_running_simulation() {
        let (diagram, parts, sw) = demos::strat_through_switch().unwrap();
        let mut sim = Simulator::new(diagram);
        sim.start().unwrap();
        assert_eq!(voltage(&sim, parts.jack, "tip"), Voltage::HOT);

        // State 1 bonds pin2 to pin3: the tip loses signal
        sim.flip(sw).unwrap();
        assert!(sim.is_running());
        assert_eq!(voltage(&sim, parts.jack, "tip"), Voltage::NONE);
        assert_eq!(voltage(&sim, parts.jack, "sleeve"), Voltage::GROUND);

        sim.flip(sw).unwrap();
        assert_eq!(voltage(&sim, parts.jack, "tip"), Voltage::HOT);
    }

    #[test]
    fn test_flip_without_restart_keeps_stale_voltages() {
        let (diagram, parts, sw) = demos::strat_through_switch().unwrap();
        let config = SimulationConfig::new().with_restart_on_change(false);
        let mut sim = Simulator::with_config(diagram, config);
        sim.start().unwrap();
        sim.flip(sw).unwrap();
        assert_eq!(voltage(&sim, parts.jack, "tip"), Voltage::HOT);
    }

    #[test]
    fn test_remove_wire_restarts() {
        let (diagram, parts) = demos::strat_pickup_and_jack().unwrap();
        let mut sim = Simulator::new(diagram);
        sim.start().unwrap();
        sim.remove_wire(parts.hot_wire).unwrap();
        assert_eq!(voltage(&sim, parts.jack, "tip"), Voltage::NONE);
        assert_eq!(sim.live_wires().len(), 1);
    }

    #[test]
    fn test_remove_part_while_running() {
        let (diagram, parts) = demos::strat_pickup_and_jack().unwrap();
        let mut sim = Simulator::new(diagram);
        sim.start().unwrap();
        sim.remove_part(parts.pickup).unwrap();
        assert!(sim.diagram().wires().next().is_none());
        assert_eq!(voltage(&sim, parts.jack, "sleeve"), Voltage::GROUND);
    }

    #[test]
    fn test_seed_hot_drives_unwired_pickup() {
        let mut diagram = Diagram::new();
        let pickup = diagram.add_part(PartKind::StratPickup).unwrap();
        let config = SimulationConfig::new().with_bootstrap(InductionBootstrap::SeedHot);
        let mut sim = Simulator::with_config(diagram, config);
        sim.start().unwrap();
        assert_eq!(voltage(&sim, pickup, "hot"), Voltage::HOT);
    }
}
