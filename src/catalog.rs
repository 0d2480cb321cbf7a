//! BTHome v2 object catalog
//!
//! Static descriptors for every object id the encoder knows how to write.
//! Measurements carry a scale and signedness; states and events are plain
//! codes. The two kinds share only their id and are told apart through
//! [`Descriptor`] wherever a lookup by id is needed.
//!
//! See <https://bthome.io/format/> for the registry these values come from.

use core::fmt;

/// A scaled numeric measurement (temperature, humidity, voltage, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementDescriptor {
    id: u8,
    name: &'static str,
    byte_width: u8,
    scale: f32,
    signed: bool,
}

impl MeasurementDescriptor {
    /// Create a descriptor. `byte_width` must be 1..=5; `scale` must be non-zero.
    pub const fn new(
        id: u8,
        name: &'static str,
        byte_width: u8,
        scale: f32,
        signed: bool,
    ) -> Self {
        assert!(byte_width >= 1 && byte_width <= 5, "byte width must be 1..=5");
        Self {
            id,
            name,
            byte_width,
            scale,
            signed,
        }
    }

    /// Object id written before the value
    pub const fn id(&self) -> u8 {
        self.id
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of little-endian value bytes
    pub const fn byte_width(&self) -> usize {
        self.byte_width as usize
    }

    /// Physical units per encoded step
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether the value is two's complement
    pub const fn is_signed(&self) -> bool {
        self.signed
    }

    /// Size of a full entry (id + value bytes)
    pub const fn entry_size(&self) -> usize {
        1 + self.byte_width as usize
    }
}

/// A binary-sensor state or event code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDescriptor {
    id: u8,
    name: &'static str,
    byte_width: u8,
}

impl StateDescriptor {
    /// Create a descriptor. `byte_width` must be 1 or 2.
    pub const fn new(id: u8, name: &'static str, byte_width: u8) -> Self {
        assert!(byte_width == 1 || byte_width == 2, "byte width must be 1 or 2");
        Self {
            id,
            name,
            byte_width,
        }
    }

    /// Object id written before the state
    pub const fn id(&self) -> u8 {
        self.id
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// State byte plus the step byte for two-byte events
    pub const fn byte_width(&self) -> usize {
        self.byte_width as usize
    }
}

/// Any catalog entry, tagged by kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Descriptor {
    /// Scaled numeric value
    Measurement(MeasurementDescriptor),
    /// State or event code
    State(StateDescriptor),
    /// Length-prefixed bytes (text, raw)
    Variable { id: u8, name: &'static str },
}

impl Descriptor {
    /// Object id
    pub fn id(&self) -> u8 {
        match self {
            Descriptor::Measurement(d) => d.id(),
            Descriptor::State(d) => d.id(),
            Descriptor::Variable { id, .. } => *id,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Descriptor::Measurement(d) => d.name(),
            Descriptor::State(d) => d.name(),
            Descriptor::Variable { name, .. } => *name,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.id())
    }
}

impl From<MeasurementDescriptor> for Descriptor {
    fn from(d: MeasurementDescriptor) -> Self {
        Descriptor::Measurement(d)
    }
}

impl From<StateDescriptor> for Descriptor {
    fn from(d: StateDescriptor) -> Self {
        Descriptor::State(d)
    }
}

const fn m(
    id: u8,
    name: &'static str,
    byte_width: u8,
    scale: f32,
    signed: bool,
) -> MeasurementDescriptor {
    MeasurementDescriptor::new(id, name, byte_width, scale, signed)
}

const fn s(id: u8, name: &'static str) -> StateDescriptor {
    StateDescriptor::new(id, name, 1)
}

// Measurements

pub const PACKET_ID: MeasurementDescriptor = m(0x00, "packet_id", 1, 1.0, false);
pub const BATTERY: MeasurementDescriptor = m(0x01, "battery", 1, 1.0, false);
pub const TEMPERATURE: MeasurementDescriptor = m(0x02, "temperature", 2, 0.01, true);
pub const HUMIDITY: MeasurementDescriptor = m(0x03, "humidity", 2, 0.01, false);
pub const PRESSURE: MeasurementDescriptor = m(0x04, "pressure", 3, 0.01, false);
pub const ILLUMINANCE: MeasurementDescriptor = m(0x05, "illuminance", 3, 0.01, false);
pub const MASS_KG: MeasurementDescriptor = m(0x06, "mass_kg", 2, 0.01, false);
pub const MASS_LB: MeasurementDescriptor = m(0x07, "mass_lb", 2, 0.01, false);
pub const DEWPOINT: MeasurementDescriptor = m(0x08, "dewpoint", 2, 0.01, true);
pub const COUNT_U8: MeasurementDescriptor = m(0x09, "count", 1, 1.0, false);
pub const ENERGY_U24: MeasurementDescriptor = m(0x0A, "energy", 3, 0.001, false);
pub const POWER_U24: MeasurementDescriptor = m(0x0B, "power", 3, 0.01, false);
pub const VOLTAGE_MILLI: MeasurementDescriptor = m(0x0C, "voltage", 2, 0.001, false);
pub const PM2_5: MeasurementDescriptor = m(0x0D, "pm2_5", 2, 1.0, false);
pub const PM10: MeasurementDescriptor = m(0x0E, "pm10", 2, 1.0, false);
pub const CO2: MeasurementDescriptor = m(0x12, "co2", 2, 1.0, false);
pub const TVOC: MeasurementDescriptor = m(0x13, "tvoc", 2, 1.0, false);
pub const MOISTURE_U16: MeasurementDescriptor = m(0x14, "moisture", 2, 0.01, false);
pub const HUMIDITY_U8: MeasurementDescriptor = m(0x2E, "humidity", 1, 1.0, false);
pub const MOISTURE_U8: MeasurementDescriptor = m(0x2F, "moisture", 1, 1.0, false);
pub const COUNT_U16: MeasurementDescriptor = m(0x3D, "count", 2, 1.0, false);
pub const COUNT_U32: MeasurementDescriptor = m(0x3E, "count", 4, 1.0, false);
pub const ROTATION: MeasurementDescriptor = m(0x3F, "rotation", 2, 0.1, true);
pub const DISTANCE_MM: MeasurementDescriptor = m(0x40, "distance_mm", 2, 1.0, false);
pub const DISTANCE_M: MeasurementDescriptor = m(0x41, "distance_m", 2, 0.1, false);
pub const DURATION: MeasurementDescriptor = m(0x42, "duration", 3, 0.001, false);
pub const CURRENT_U16: MeasurementDescriptor = m(0x43, "current", 2, 0.001, false);
pub const SPEED: MeasurementDescriptor = m(0x44, "speed", 2, 0.01, false);
pub const TEMPERATURE_DECI: MeasurementDescriptor = m(0x45, "temperature", 2, 0.1, true);
pub const UV_INDEX: MeasurementDescriptor = m(0x46, "uv_index", 1, 0.1, false);
pub const VOLUME_DECI: MeasurementDescriptor = m(0x47, "volume", 2, 0.1, false);
pub const VOLUME_U16: MeasurementDescriptor = m(0x48, "volume", 2, 1.0, false);
pub const VOLUME_FLOW_RATE: MeasurementDescriptor = m(0x49, "volume_flow_rate", 2, 0.001, false);
pub const VOLTAGE_DECI: MeasurementDescriptor = m(0x4A, "voltage", 2, 0.1, false);
pub const GAS_U24: MeasurementDescriptor = m(0x4B, "gas", 3, 0.001, false);
pub const GAS_U32: MeasurementDescriptor = m(0x4C, "gas", 4, 0.001, false);
pub const ENERGY_U32: MeasurementDescriptor = m(0x4D, "energy", 4, 0.001, false);
pub const VOLUME_U32: MeasurementDescriptor = m(0x4E, "volume", 4, 0.001, false);
pub const WATER: MeasurementDescriptor = m(0x4F, "water", 4, 0.001, false);
pub const TIMESTAMP: MeasurementDescriptor = m(0x50, "timestamp", 4, 1.0, false);
pub const ACCELERATION: MeasurementDescriptor = m(0x51, "acceleration", 2, 0.001, false);
pub const GYROSCOPE: MeasurementDescriptor = m(0x52, "gyroscope", 2, 0.001, false);
pub const VOLUME_STORAGE: MeasurementDescriptor = m(0x55, "volume_storage", 4, 0.001, false);
pub const CONDUCTIVITY: MeasurementDescriptor = m(0x56, "conductivity", 2, 1.0, false);
pub const TEMPERATURE_I8: MeasurementDescriptor = m(0x57, "temperature", 1, 1.0, true);
pub const TEMPERATURE_I8_035: MeasurementDescriptor = m(0x58, "temperature", 1, 0.35, true);
pub const COUNT_I8: MeasurementDescriptor = m(0x59, "count", 1, 1.0, true);
pub const COUNT_I16: MeasurementDescriptor = m(0x5A, "count", 2, 1.0, true);
pub const COUNT_I32: MeasurementDescriptor = m(0x5B, "count", 4, 1.0, true);
pub const POWER_I32: MeasurementDescriptor = m(0x5C, "power", 4, 0.01, true);
pub const CURRENT_I16: MeasurementDescriptor = m(0x5D, "current", 2, 0.001, true);
pub const DIRECTION: MeasurementDescriptor = m(0x5E, "direction", 2, 0.01, false);
pub const PRECIPITATION: MeasurementDescriptor = m(0x5F, "precipitation", 2, 0.1, false);
pub const CHANNEL: MeasurementDescriptor = m(0x60, "channel", 1, 1.0, false);

// Variable-length objects, written with `add_raw`

pub const TEXT_ID: u8 = 0x53;
pub const RAW_ID: u8 = 0x54;

// Binary sensors

pub const GENERIC_BOOLEAN: StateDescriptor = s(0x0F, "generic_boolean");
pub const POWER: StateDescriptor = s(0x10, "power");
pub const OPENING: StateDescriptor = s(0x11, "opening");
pub const BATTERY_LOW: StateDescriptor = s(0x15, "battery_low");
pub const BATTERY_CHARGING: StateDescriptor = s(0x16, "battery_charging");
pub const CARBON_MONOXIDE: StateDescriptor = s(0x17, "carbon_monoxide");
pub const COLD: StateDescriptor = s(0x18, "cold");
pub const CONNECTIVITY: StateDescriptor = s(0x19, "connectivity");
pub const DOOR: StateDescriptor = s(0x1A, "door");
pub const GARAGE_DOOR: StateDescriptor = s(0x1B, "garage_door");
pub const GAS: StateDescriptor = s(0x1C, "gas");
pub const HEAT: StateDescriptor = s(0x1D, "heat");
pub const LIGHT: StateDescriptor = s(0x1E, "light");
pub const LOCK: StateDescriptor = s(0x1F, "lock");
pub const MOISTURE: StateDescriptor = s(0x20, "moisture");
pub const MOTION: StateDescriptor = s(0x21, "motion");
pub const MOVING: StateDescriptor = s(0x22, "moving");
pub const OCCUPANCY: StateDescriptor = s(0x23, "occupancy");
pub const PLUG: StateDescriptor = s(0x24, "plug");
pub const PRESENCE: StateDescriptor = s(0x25, "presence");
pub const PROBLEM: StateDescriptor = s(0x26, "problem");
pub const RUNNING: StateDescriptor = s(0x27, "running");
pub const SAFETY: StateDescriptor = s(0x28, "safety");
pub const SMOKE: StateDescriptor = s(0x29, "smoke");
pub const SOUND: StateDescriptor = s(0x2A, "sound");
pub const TAMPER: StateDescriptor = s(0x2B, "tamper");
pub const VIBRATION: StateDescriptor = s(0x2C, "vibration");
pub const WINDOW: StateDescriptor = s(0x2D, "window");

// Events

pub const BUTTON: StateDescriptor = StateDescriptor::new(0x3A, "button", 1);
pub const DIMMER: StateDescriptor = StateDescriptor::new(0x3B, "dimmer", 2);

/// Button event codes for [`BUTTON`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ButtonEvent {
    None = 0x00,
    Press = 0x01,
    DoublePress = 0x02,
    TriplePress = 0x03,
    LongPress = 0x04,
    LongDoublePress = 0x05,
    LongTriplePress = 0x06,
    HoldPress = 0x80,
}

/// Dimmer event codes for [`DIMMER`], followed by a step count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DimmerEvent {
    None = 0x00,
    RotateLeft = 0x01,
    RotateRight = 0x02,
}

/// Every measurement descriptor, in id order
pub static MEASUREMENTS: &[MeasurementDescriptor] = &[
    PACKET_ID,
    BATTERY,
    TEMPERATURE,
    HUMIDITY,
    PRESSURE,
    ILLUMINANCE,
    MASS_KG,
    MASS_LB,
    DEWPOINT,
    COUNT_U8,
    ENERGY_U24,
    POWER_U24,
    VOLTAGE_MILLI,
    PM2_5,
    PM10,
    CO2,
    TVOC,
    MOISTURE_U16,
    HUMIDITY_U8,
    MOISTURE_U8,
    COUNT_U16,
    COUNT_U32,
    ROTATION,
    DISTANCE_MM,
    DISTANCE_M,
    DURATION,
    CURRENT_U16,
    SPEED,
    TEMPERATURE_DECI,
    UV_INDEX,
    VOLUME_DECI,
    VOLUME_U16,
    VOLUME_FLOW_RATE,
    VOLTAGE_DECI,
    GAS_U24,
    GAS_U32,
    ENERGY_U32,
    VOLUME_U32,
    WATER,
    TIMESTAMP,
    ACCELERATION,
    GYROSCOPE,
    VOLUME_STORAGE,
    CONDUCTIVITY,
    TEMPERATURE_I8,
    TEMPERATURE_I8_035,
    COUNT_I8,
    COUNT_I16,
    COUNT_I32,
    POWER_I32,
    CURRENT_I16,
    DIRECTION,
    PRECIPITATION,
    CHANNEL,
];

/// Every state and event descriptor, in id order
pub static STATES: &[StateDescriptor] = &[
    GENERIC_BOOLEAN,
    POWER,
    OPENING,
    BATTERY_LOW,
    BATTERY_CHARGING,
    CARBON_MONOXIDE,
    COLD,
    CONNECTIVITY,
    DOOR,
    GARAGE_DOOR,
    GAS,
    HEAT,
    LIGHT,
    LOCK,
    MOISTURE,
    MOTION,
    MOVING,
    OCCUPANCY,
    PLUG,
    PRESENCE,
    PROBLEM,
    RUNNING,
    SAFETY,
    SMOKE,
    SOUND,
    TAMPER,
    VIBRATION,
    WINDOW,
    BUTTON,
    DIMMER,
];

/// Find the descriptor registered for an object id
pub fn lookup(id: u8) -> Option<Descriptor> {
    match id {
        TEXT_ID => return Some(Descriptor::Variable { id, name: "text" }),
        RAW_ID => return Some(Descriptor::Variable { id, name: "raw" }),
        _ => {}
    }
    if let Some(d) = MEASUREMENTS.iter().find(|d| d.id() == id) {
        return Some(Descriptor::Measurement(*d));
    }
    STATES
        .iter()
        .find(|d| d.id() == id)
        .map(|d| Descriptor::State(*d))
}
