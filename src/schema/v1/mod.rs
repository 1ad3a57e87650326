//! Generation 1 of the VCU display message set.
//!
//! The earliest firmware pairing: a battery time estimate message and a DC
//! bus voltage message. No raw pattern is reserved for "no data" in this
//! generation — every decoded value is a valid reading.
use embassy_time::Instant;

use crate::error::RegistryError;
use crate::schema::registry::{MessageDef, MessageKey, Registry};
use crate::schema::signal::read_le_u16;
use crate::state::Slot;

/// BattTime: charge/discharge time estimates.
/// B0-1 time-to-empty [min, u16 LE], B2-3 time-to-full [min, u16 LE].
pub const BATT_TIME_ID: u32 = 0x1088_90F1;
/// VCU_BUS_DC: bus voltage triple.
/// B0-1 BMS bus, B2-3 inverter bus, B4-5 delta [0.1 V, u16 LE each].
pub const BUS_DC_ID: u32 = 0x1088_10F1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Remaining-time estimates, in minutes as sent on the wire.
pub struct BattTime {
    pub time_to_empty_min: u16,
    pub time_to_full_min: u16,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// DC bus voltages in volts (wire unit 0.1 V).
pub struct BusDc {
    pub bms_voltage_v: f32,
    pub inv_voltage_v: f32,
    pub delta_voltage_v: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Live state for generation 1: one slot per message.
pub struct V1State {
    pub batt_time: Slot<BattTime>,
    pub bus_dc: Slot<BusDc>,
}

fn decode_batt_time(payload: &[u8], received_at: Instant, state: &mut V1State) {
    let message = BattTime {
        time_to_empty_min: read_le_u16(&payload[0..2]),
        time_to_full_min: read_le_u16(&payload[2..4]),
    };
    state.batt_time.update(message, received_at);

    #[cfg(feature = "defmt")]
    defmt::info!(
        "[dbc] BattTime: TTE={} min, TTF={} min",
        message.time_to_empty_min,
        message.time_to_full_min
    );
}

fn decode_bus_dc(payload: &[u8], received_at: Instant, state: &mut V1State) {
    let message = BusDc {
        bms_voltage_v: f32::from(read_le_u16(&payload[0..2])) / 10.0,
        inv_voltage_v: f32::from(read_le_u16(&payload[2..4])) / 10.0,
        delta_voltage_v: f32::from(read_le_u16(&payload[4..6])) / 10.0,
    };
    state.bus_dc.update(message, received_at);

    #[cfg(feature = "defmt")]
    defmt::info!(
        "[dbc] BusDc: BMS={} V, INV={} V, delta={} V",
        message.bms_voltage_v,
        message.inv_voltage_v,
        message.delta_voltage_v
    );
}

static DEFS: [MessageDef<V1State>; 2] = [
    MessageDef {
        name: "BattTime",
        key: MessageKey {
            id: BATT_TIME_ID,
            extended: true,
        },
        min_len: 4,
        decode: decode_batt_time,
    },
    MessageDef {
        name: "BusDc",
        key: MessageKey {
            id: BUS_DC_ID,
            extended: true,
        },
        min_len: 6,
        decode: decode_bus_dc,
    },
];

/// Build the generation-1 registry.
pub fn registry() -> Result<Registry<V1State>, RegistryError> {
    Registry::new(&DEFS)
}
