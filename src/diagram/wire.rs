//! Wires: user-drawn connections between two pins.

use std::fmt;

use super::types::{ComponentId, Voltage};
use crate::components::VoltageResettable;
use crate::geometry::{self, Point};

/// Insulation colour of a wire. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WireColor {
    #[default]
    Black,
    Red,
    Yellow,
    Green,
    Blue,
}

impl WireColor {
    /// All colours, in palette order.
    pub const ALL: [WireColor; 5] = [
        WireColor::Black,
        WireColor::Red,
        WireColor::Yellow,
        WireColor::Green,
        WireColor::Blue,
    ];

    /// Persisted name.
    pub fn name(&self) -> &'static str {
        match self {
            WireColor::Black => "black",
            WireColor::Red => "red",
            WireColor::Yellow => "yellow",
            WireColor::Green => "green",
            WireColor::Blue => "blue",
        }
    }

    /// Parse a persisted name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for WireColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A wire between exactly two pins.
///
/// The pin references never change after creation. The start/end order is
/// kept because the renderer draws in that direction and the visualizer
/// needs to know which end the voltage came from.
#[derive(Debug, Clone)]
pub struct Wire {
    pub id: ComponentId,
    start_pin: ComponentId,
    end_pin: ComponentId,
    pub color: WireColor,
    start_point: Point,
    mid_point: Point,
    end_point: Point,
    voltage: Voltage,
    voltage_source_pin: Option<ComponentId>,
}

impl Wire {
    /// Create a straight wire with no voltage.
    pub fn new(id: ComponentId, start_pin: ComponentId, end_pin: ComponentId) -> Self {
        Self {
            id,
            start_pin,
            end_pin,
            color: WireColor::default(),
            start_point: Point::default(),
            mid_point: Point::default(),
            end_point: Point::default(),
            voltage: Voltage::NONE,
            voltage_source_pin: None,
        }
    }

    /// Set all three curve points at once (used when drawing or loading).
    pub fn with_points(mut self, start: Point, mid: Point, end: Point) -> Self {
        self.start_point = start;
        self.mid_point = mid;
        self.end_point = end;
        self
    }

    /// Set the colour.
    pub fn with_color(mut self, color: WireColor) -> Self {
        self.color = color;
        self
    }

    pub fn start_pin(&self) -> ComponentId {
        self.start_pin
    }

    pub fn end_pin(&self) -> ComponentId {
        self.end_pin
    }

    pub fn start_point(&self) -> Point {
        self.start_point
    }

    pub fn mid_point(&self) -> Point {
        self.mid_point
    }

    pub fn end_point(&self) -> Point {
        self.end_point
    }

    /// True if either end is attached to `pin`.
    pub fn touches(&self, pin: ComponentId) -> bool {
        self.start_pin == pin || self.end_pin == pin
    }

    /// The end that is not `pin`.
    pub fn other_end(&self, pin: ComponentId) -> ComponentId {
        if self.start_pin == pin {
            self.end_pin
        } else {
            self.start_pin
        }
    }

    /// Current voltage.
    pub fn voltage(&self) -> Voltage {
        self.voltage
    }

    /// True for any non-zero voltage.
    pub fn has_voltage(&self) -> bool {
        self.voltage.is_live()
    }

    /// The pin that most recently supplied this wire's voltage.
    pub fn voltage_source_pin(&self) -> Option<ComponentId> {
        self.voltage_source_pin
    }

    pub(crate) fn set_voltage(&mut self, value: Voltage, from_pin: ComponentId) {
        self.voltage = value;
        self.voltage_source_pin = Some(from_pin);
    }

    /// Move the start end. Only geometry changes; the pins stay the same.
    pub fn update_start_point(&mut self, point: Point) {
        self.start_point = point;
        self.update_mid_point();
    }

    /// Move the end end. Only geometry changes; the pins stay the same.
    pub fn update_end_point(&mut self, point: Point) {
        self.end_point = point;
        self.update_mid_point();
    }

    fn update_mid_point(&mut self) {
        self.mid_point = geometry::recompute_mid_point(self.start_point, self.mid_point, self.end_point);
        log::debug!("wire {} midpoint moved to {}", self.id, self.mid_point);
    }
}

impl VoltageResettable for Wire {
    fn voltage(&self) -> Voltage {
        self.voltage
    }

    fn reset_voltage(&mut self) {
        self.voltage = Voltage::NONE;
        self.voltage_source_pin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_other_end() {
        let w = Wire::new(ComponentId(10), ComponentId(1), ComponentId(2));
        assert_eq!(w.other_end(ComponentId(1)), ComponentId(2));
        assert_eq!(w.other_end(ComponentId(2)), ComponentId(1));
        assert!(w.touches(ComponentId(2)));
        assert!(!w.touches(ComponentId(3)));
    }

    #[test]
    fn test_move_keeps_pins() {
        let mut w = Wire::new(ComponentId(10), ComponentId(1), ComponentId(2)).with_points(
            Point::new(0.0, 0.0),
            Point::new(25.0, 25.0),
            Point::new(50.0, 0.0),
        );
        w.update_end_point(Point::new(50.0, 50.0));
        assert_eq!(w.start_pin(), ComponentId(1));
        assert_eq!(w.end_pin(), ComponentId(2));
        // span ~70.7 -> reduction 1.25; true mid (25, 25) == old mid
        assert_relative_eq!(w.mid_point().x, 25.0);
        assert_relative_eq!(w.mid_point().y, 25.0);
    }

    #[test]
    fn test_color_names() {
        assert_eq!(WireColor::from_name("RED"), Some(WireColor::Red));
        assert_eq!(WireColor::from_name("purple"), None);
        assert_eq!(WireColor::default().to_string(), "black");
    }
}
