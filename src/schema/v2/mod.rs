//! Generation 2 of the VCU display message set.
//!
//! This generation introduced reserved wire patterns for "no data": 0xFF
//! for percent and enum bytes, 0xFFFF for raw times, `i16::MIN` for phase
//! powers. Decoders map those patterns to [`SignalValue::NotAvailable`];
//! the raw sentinel never reaches the decoded state. Times travel in 0.1
//! minute units and are stored in seconds, phase powers in 0.1 kW units
//! and are stored in watts.
use embassy_time::Instant;

use crate::error::RegistryError;
use crate::schema::registry::{MessageDef, MessageKey, Registry};
use crate::schema::signal::{read_le_i16, read_le_u16, SignalValue};
use crate::state::Slot;

/// DisplayStatus: SOC pair, time estimates, main state machine state.
pub const DISPLAY_STATUS_ID: u32 = 0x1088_A0F1;
/// InverterAc: per-phase AC power vector.
pub const INVERTER_AC_ID: u32 = 0x1088_A1F1;

/// Reserved byte pattern meaning "no data" for percent and enum fields.
const UNAVAILABLE_BYTE: u8 = 0xFF;
/// Reserved pattern for raw 0.1 minute time fields.
const UNAVAILABLE_TIME: u16 = 0xFFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// B0 SOC total [%], B1 SOC active [%], B2-3 time-to-full and B4-5
/// time-to-empty [0.1 min u16 LE, stored as seconds], B6 main state enum.
pub struct DisplayStatus {
    pub soc_total_percent: SignalValue<u8>,
    pub soc_active_percent: SignalValue<u8>,
    pub time_to_full_s: SignalValue<u32>,
    pub time_to_empty_s: SignalValue<u32>,
    pub main_state: SignalValue<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Three per-phase inverter AC powers [0.1 kW i16 LE, stored as watts].
pub struct InverterAc {
    pub phase_power_w: [SignalValue<i32>; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Live state for generation 2: one slot per message.
pub struct V2State {
    pub status: Slot<DisplayStatus>,
    pub inverter_ac: Slot<InverterAc>,
}

// Shared by the percent and enum bytes; both reserve 0xFF.
fn decode_byte(raw: u8) -> SignalValue<u8> {
    if raw == UNAVAILABLE_BYTE {
        SignalValue::NotAvailable
    } else {
        SignalValue::Available(raw)
    }
}

// 0.1 min wire units to seconds.
fn decode_time_s(raw: u16) -> SignalValue<u32> {
    if raw == UNAVAILABLE_TIME {
        SignalValue::NotAvailable
    } else {
        SignalValue::Available(u32::from(raw) * 6)
    }
}

fn decode_display_status(payload: &[u8], received_at: Instant, state: &mut V2State) {
    let message = DisplayStatus {
        soc_total_percent: decode_byte(payload[0]),
        soc_active_percent: decode_byte(payload[1]),
        time_to_full_s: decode_time_s(read_le_u16(&payload[2..4])),
        time_to_empty_s: decode_time_s(read_le_u16(&payload[4..6])),
        main_state: decode_byte(payload[6]),
    };
    state.status.update(message, received_at);

    #[cfg(feature = "defmt")]
    defmt::info!(
        "[dbc] DisplayStatus: SOC_TOT={}, SOC_ACTIVE={}, TTF={} s, TTE={} s, STATE={}",
        message.soc_total_percent,
        message.soc_active_percent,
        message.time_to_full_s,
        message.time_to_empty_s,
        message.main_state
    );
}

fn decode_inverter_ac(payload: &[u8], received_at: Instant, state: &mut V2State) {
    let mut phase_power_w = [SignalValue::NotAvailable; 3];
    for (phase, slot) in phase_power_w.iter_mut().enumerate() {
        let raw = read_le_i16(&payload[phase * 2..phase * 2 + 2]);
        *slot = if raw == i16::MIN {
            SignalValue::NotAvailable
        } else {
            // 0.1 kW wire units to watts.
            SignalValue::Available(i32::from(raw) * 100)
        };
    }
    let message = InverterAc { phase_power_w };
    state.inverter_ac.update(message, received_at);

    #[cfg(feature = "defmt")]
    defmt::info!("[dbc] InverterAc: P_AC={} W", message.phase_power_w);
}

static DEFS: [MessageDef<V2State>; 2] = [
    MessageDef {
        name: "DisplayStatus",
        key: MessageKey {
            id: DISPLAY_STATUS_ID,
            extended: true,
        },
        min_len: 8,
        decode: decode_display_status,
    },
    MessageDef {
        name: "InverterAc",
        key: MessageKey {
            id: INVERTER_AC_ID,
            extended: true,
        },
        min_len: 6,
        decode: decode_inverter_ac,
    },
];

/// Build the generation-2 registry.
pub fn registry() -> Result<Registry<V2State>, RegistryError> {
    Registry::new(&DEFS)
}
