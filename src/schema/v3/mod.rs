//! Generation 3 (current) of the VCU display message set.
//!
//! The VCU condensed everything the panel renders into two frames: the
//! debounced operating mode, one remaining-time figure valid for the active
//! mode, worst-case temperatures, and both power flows. This generation
//! reserves no wire pattern for "no data".
use embassy_time::Instant;

use crate::error::RegistryError;
use crate::schema::registry::{MessageDef, MessageKey, Registry};
use crate::schema::signal::{read_le_i16, read_le_u16};
use crate::state::Slot;

/// DisplayStatus: SOC, remaining time, mode, temperatures, DC power.
pub const DISPLAY_STATUS_ID: u32 = 0x1088_A0F1;
/// AcStatus: grid voltage and inverter AC power.
pub const AC_STATUS_ID: u32 = 0x1088_A1F1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Debounced main-state-machine state reported by the VCU.
pub enum OperatingMode {
    Standby,
    Charge,
    Discharge,
    /// Raw value outside the published enum; kept for display/diagnostics.
    Unknown(u8),
}

impl From<u8> for OperatingMode {
    fn from(raw: u8) -> Self {
        match raw {
            0 => OperatingMode::Standby,
            1 => OperatingMode::Charge,
            2 => OperatingMode::Discharge,
            raw => OperatingMode::Unknown(raw),
        }
    }
}

impl OperatingMode {
    /// Raw wire value.
    pub fn as_raw(self) -> u8 {
        match self {
            OperatingMode::Standby => 0,
            OperatingMode::Charge => 1,
            OperatingMode::Discharge => 2,
            OperatingMode::Unknown(raw) => raw,
        }
    }

    /// Rendering name used by the panel.
    pub fn as_str(self) -> &'static str {
        match self {
            OperatingMode::Standby => "standby",
            OperatingMode::Charge => "charge",
            OperatingMode::Discharge => "discharge",
            OperatingMode::Unknown(_) => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// B0 SOC [%], B1-2 remaining time [s, u16 LE] (time-to-full while
/// charging, time-to-empty while discharging), B3 mode, B4 max battery
/// temperature [°C, i8], B5 max inverter temperature [°C, i8], B6-7 DC
/// power [W, i16 LE].
pub struct DisplayStatus {
    pub soc_percent: u8,
    pub remaining_time_s: u16,
    pub mode: OperatingMode,
    pub max_batt_temp_c: i8,
    pub max_inv_temp_c: i8,
    pub dc_power_w: i16,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// B0-1 grid AC voltage [0.1 V u16 LE, stored as volts], B2-3 inverter AC
/// power [W, i16 LE]. B4-7 reserved.
pub struct AcStatus {
    pub grid_voltage_v: f32,
    pub ac_power_w: i16,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Live state for generation 3: one slot per message.
pub struct V3State {
    pub status: Slot<DisplayStatus>,
    pub ac_status: Slot<AcStatus>,
}

fn decode_display_status(payload: &[u8], received_at: Instant, state: &mut V3State) {
    let message = DisplayStatus {
        soc_percent: payload[0],
        remaining_time_s: read_le_u16(&payload[1..3]),
        mode: OperatingMode::from(payload[3]),
        max_batt_temp_c: payload[4] as i8,
        max_inv_temp_c: payload[5] as i8,
        dc_power_w: read_le_i16(&payload[6..8]),
    };
    state.status.update(message, received_at);

    #[cfg(feature = "defmt")]
    defmt::info!(
        "[dbc] DisplayStatus: SOC={}%, Rem={} s, Mode={}, T_batt={} C, T_inv={} C, P_DC={} W",
        message.soc_percent,
        message.remaining_time_s,
        message.mode.as_str(),
        message.max_batt_temp_c,
        message.max_inv_temp_c,
        message.dc_power_w
    );
}

fn decode_ac_status(payload: &[u8], received_at: Instant, state: &mut V3State) {
    let message = AcStatus {
        grid_voltage_v: f32::from(read_le_u16(&payload[0..2])) / 10.0,
        ac_power_w: read_le_i16(&payload[2..4]),
    };
    state.ac_status.update(message, received_at);

    #[cfg(feature = "defmt")]
    defmt::info!(
        "[dbc] AcStatus: V_grid={} V, P_AC={} W",
        message.grid_voltage_v,
        message.ac_power_w
    );
}

static DEFS: [MessageDef<V3State>; 2] = [
    MessageDef {
        name: "DisplayStatus",
        key: MessageKey {
            id: DISPLAY_STATUS_ID,
            extended: true,
        },
        min_len: 7,
        decode: decode_display_status,
    },
    MessageDef {
        name: "AcStatus",
        key: MessageKey {
            id: AC_STATUS_ID,
            extended: true,
        },
        min_len: 4,
        decode: decode_ac_status,
    },
];

/// Build the generation-3 registry.
pub fn registry() -> Result<Registry<V3State>, RegistryError> {
    Registry::new(&DEFS)
}
