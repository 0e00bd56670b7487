// Every editable entry of lcm.conf is described once here. The form, the CLI, and
// validation all walk this table instead of carrying per-field code.
use super::error::{RegisterError, ValidationError};
use super::register::{format_hex, is_hex, parse_hex, RegisterRange};
use super::validate::{validate, NumberKind};

const BINARY_OPTIONS: &[&str] = &["0", "1"];
const TRIGGER_SOURCE_OPTIONS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7"];

const PULSE_HEIGHT: RegisterRange = RegisterRange {
    domain_min: 0.0,
    domain_max: 30.0,
    code_min: 0x40000,
    code_max: 0x40FFF,
};
const PULSE_DELAY: RegisterRange = RegisterRange {
    domain_min: 0.0,
    domain_max: 13650.0,
    code_min: 0x0,
    code_max: 0xFFF,
};
const PULSE_WIDTH: RegisterRange = RegisterRange {
    domain_min: 0.0,
    domain_max: 850.0,
    code_min: 0x0,
    code_max: 0xFF,
};

/// The three pulser outputs of the calibration module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    IU,
    TPC,
    PD,
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IU => "IU",
            Self::TPC => "TPC",
            Self::PD => "PD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// One of a fixed set of raw values
    Choice(&'static [&'static str]),
    /// Free text, optionally stored in double quotes
    Text { quoted: bool },
    /// A whole number, stored as hex
    Count { min: u32, max: u32 },
    /// A physical quantity, stored as a register code
    Physical {
        unit: &'static str,
        register: RegisterRange,
    },
}

/// Description of one editable configuration key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub channel: Option<Channel>,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Inclusive numeric bounds, if the field is numeric
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self.kind {
            FieldKind::Count { min, max } => Some((min as f64, max as f64)),
            FieldKind::Physical { register, .. } => {
                Some((register.domain_min, register.domain_max))
            }
            _ => None,
        }
    }

    /// Human readable name including the channel, e.g. "IU pulse delay"
    pub fn title(&self) -> String {
        match self.channel {
            Some(ch) => format!("{} {}", ch.name(), self.label),
            None => self.label.to_string(),
        }
    }

    /// Convert the stored value into the text shown to the user.
    ///
    /// Hex values of numeric fields are decoded; anything else is taken as already being
    /// in display units.
    pub fn display(&self, raw: &str) -> Result<String, RegisterError> {
        let shown = match self.kind {
            FieldKind::Choice(_) => raw.to_string(),
            FieldKind::Text { quoted } => {
                if quoted {
                    strip_quotes(raw).to_string()
                } else {
                    raw.to_string()
                }
            }
            FieldKind::Count { .. } if is_hex(raw) => parse_hex(raw)?.to_string(),
            FieldKind::Physical { register, .. } if is_hex(raw) => {
                register.decode_hex(raw)?.to_string()
            }
            _ => raw.to_string(),
        };
        Ok(shown)
    }

    /// Validate user text and convert it into the value stored in the config file
    pub fn commit(&self, text: &str) -> Result<String, ValidationError> {
        let text = text.trim();
        match self.kind {
            FieldKind::Choice(options) => {
                if options.iter().any(|o| *o == text) {
                    Ok(text.to_string())
                } else {
                    Err(ValidationError::NotAnOption {
                        field: self.title(),
                        text: text.to_string(),
                        options: options.iter().map(|o| o.to_string()).collect(),
                    })
                }
            }
            FieldKind::Text { quoted } => {
                if quoted {
                    Ok(format!("\"{text}\""))
                } else {
                    Ok(text.to_string())
                }
            }
            FieldKind::Count { min, max } => {
                let value = validate(
                    &self.title(),
                    text,
                    NumberKind::Integer,
                    min as f64,
                    max as f64,
                )?;
                Ok(format_hex(value as u32))
            }
            FieldKind::Physical { register, .. } => {
                let value = validate(
                    &self.title(),
                    text,
                    NumberKind::Float,
                    register.domain_min,
                    register.domain_max,
                )?;
                Ok(register.encode_hex(value))
            }
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Physical { unit, .. } => Some(unit),
            _ => None,
        }
    }
}

fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw)
}

const fn choice(
    key: &'static str,
    label: &'static str,
    channel: Option<Channel>,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        channel,
        kind: FieldKind::Choice(options),
    }
}

const fn physical(
    key: &'static str,
    label: &'static str,
    channel: Option<Channel>,
    unit: &'static str,
    register: RegisterRange,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        channel,
        kind: FieldKind::Physical { unit, register },
    }
}

/// The fields of lcm.conf, in form order
pub static LCM_FIELDS: [FieldSpec; 19] = [
    choice("bias_control", "bias control", None, BINARY_OPTIONS),
    FieldSpec {
        key: "ip",
        label: "ip",
        channel: None,
        kind: FieldKind::Text { quoted: true },
    },
    FieldSpec {
        key: "pulse_sets",
        label: "number of pulse sets",
        channel: None,
        kind: FieldKind::Count { min: 0, max: 131071 },
    },
    physical("pulse_height", "pulse height", None, "V", PULSE_HEIGHT),
    // IU
    choice("iu_nova_enable", "NOvA enable", Some(Channel::IU), BINARY_OPTIONS),
    choice("iu_trigger_source", "trigger source", Some(Channel::IU), TRIGGER_SOURCE_OPTIONS),
    physical("iu_pulse_delay", "pulse delay", Some(Channel::IU), "ns", PULSE_DELAY),
    physical("iu_pulse_width_2", "second pulse width", Some(Channel::IU), "ns", PULSE_WIDTH),
    physical("iu_pulse_width_1", "first pulse width", Some(Channel::IU), "ns", PULSE_WIDTH),
    // TPC
    choice("tpc_nova_enable", "NOvA enable", Some(Channel::TPC), BINARY_OPTIONS),
    choice("tpc_trigger_source", "trigger source", Some(Channel::TPC), TRIGGER_SOURCE_OPTIONS),
    physical("tpc_pulse_delay", "pulse delay", Some(Channel::TPC), "ns", PULSE_DELAY),
    physical("tpc_pulse_width_2", "second pulse width", Some(Channel::TPC), "ns", PULSE_WIDTH),
    physical("tpc_pulse_width_1", "first pulse width", Some(Channel::TPC), "ns", PULSE_WIDTH),
    // PD
    choice("pd_nova_enable", "NOvA enable", Some(Channel::PD), BINARY_OPTIONS),
    choice("pd_trigger_source", "trigger source", Some(Channel::PD), TRIGGER_SOURCE_OPTIONS),
    physical("pd_pulse_delay", "pulse delay", Some(Channel::PD), "ns", PULSE_DELAY),
    physical("pd_pulse_width_2", "second pulse width", Some(Channel::PD), "ns", PULSE_WIDTH),
    physical("pd_pulse_width_1", "first pulse width", Some(Channel::PD), "ns", PULSE_WIDTH),
];

/// Look up a field by its config key
pub fn find_field(key: &str) -> Option<&'static FieldSpec> {
    LCM_FIELDS.iter().find(|f| f.key == key)
}
