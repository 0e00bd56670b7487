use super::error::RegisterError;

/// Linear mapping between a physical domain (volts, nanoseconds, ...) and a fixed-point
/// register code range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisterRange {
    pub domain_min: f64,
    pub domain_max: f64,
    pub code_min: u32,
    pub code_max: u32,
}

impl RegisterRange {
    /// Construct a range, rejecting ones where either span is empty
    pub fn new(
        domain_min: f64,
        domain_max: f64,
        code_min: u32,
        code_max: u32,
    ) -> Result<Self, RegisterError> {
        let range = Self {
            domain_min,
            domain_max,
            code_min,
            code_max,
        };
        range.check()?;
        Ok(range)
    }

    /// Verify neither span is empty. Needed for ranges built as consts.
    pub fn check(&self) -> Result<(), RegisterError> {
        if self.domain_min == self.domain_max || self.code_min == self.code_max {
            return Err(RegisterError::BadRange(
                self.domain_min,
                self.domain_max,
                self.code_min,
                self.code_max,
            ));
        }
        Ok(())
    }

    /// Physical size of a single code
    pub fn step(&self) -> f64 {
        (self.domain_max - self.domain_min) / (self.code_max as f64 - self.code_min as f64)
    }

    pub fn encode(&self, value: f64) -> u32 {
        encode(
            value,
            self.domain_min,
            self.domain_max,
            self.code_min,
            self.code_max,
        )
    }

    pub fn decode(&self, code: u32) -> f64 {
        decode(
            code,
            self.code_min,
            self.code_max,
            self.domain_min,
            self.domain_max,
        )
    }

    /// Encode and render as the register text written to the config file
    pub fn encode_hex(&self, value: f64) -> String {
        format_hex(self.encode(value))
    }

    /// Parse register text from the config file and decode it
    pub fn decode_hex(&self, text: &str) -> Result<f64, RegisterError> {
        Ok(self.decode(parse_hex(text)?))
    }
}

/// Map a physical value onto the register code range, rounding to the nearest code
pub fn encode(value: f64, domain_min: f64, domain_max: f64, code_min: u32, code_max: u32) -> u32 {
    let span = code_max as f64 - code_min as f64;
    let offset = ((value - domain_min) / (domain_max - domain_min) * span).round();
    (code_min as f64 + offset) as u32
}

/// Map a register code back onto the physical domain
pub fn decode(code: u32, code_min: u32, code_max: u32, domain_min: f64, domain_max: f64) -> f64 {
    domain_min
        + (domain_max - domain_min) / (code_max as f64 - code_min as f64)
            * (code as f64 - code_min as f64)
}

/// Render a code the way the hardware config expects it, e.g. `0x800`
pub fn format_hex(code: u32) -> String {
    format!("{code:#x}")
}

/// Check if register text is written in hex (has the `0x` prefix)
pub fn is_hex(text: &str) -> bool {
    text.starts_with("0x") || text.starts_with("0X")
}

/// Parse hex register text, with or without the `0x` prefix
pub fn parse_hex(text: &str) -> Result<u32, RegisterError> {
    let trimmed = text.trim();
    let digits = if is_hex(trimmed) {
        &trimmed[2..]
    } else {
        trimmed
    };
    u32::from_str_radix(digits, 16).map_err(|_| RegisterError::BadRegister(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pulse_delay_within_one_step() {
        let delay = RegisterRange::new(0.0, 13650.0, 0x0, 0xFFF).unwrap();
        let value = delay.decode_hex("0x800").unwrap();
        assert!((value - 6826.667).abs() < 0.01);
        assert!((value - 6829.4).abs() < delay.step());
    }

    #[test]
    fn test_encode_pulse_height() {
        let height = RegisterRange::new(0.0, 30.0, 0x40000, 0x40FFF).unwrap();
        assert_eq!(height.encode_hex(0.0), "0x40000");
        assert_eq!(height.encode_hex(30.0), "0x40fff");
        assert_eq!(height.encode(15.0), 0x40800);
    }

    #[test]
    fn test_decode_encode_within_one_step() {
        let ranges = [
            RegisterRange::new(0.0, 13650.0, 0x0, 0xFFF).unwrap(),
            RegisterRange::new(0.0, 850.0, 0x0, 0xFF).unwrap(),
            RegisterRange::new(0.0, 30.0, 0x40000, 0x40FFF).unwrap(),
            RegisterRange::new(-5.0, 5.0, 0x10, 0x20).unwrap(),
        ];
        for range in ranges.iter() {
            for i in 0..=100 {
                let v = range.domain_min + (range.domain_max - range.domain_min) * i as f64 / 100.0;
                let back = range.decode(range.encode(v));
                assert!((back - v).abs() <= range.step());
            }
        }
    }

    #[test]
    fn test_bad_range() {
        assert!(RegisterRange::new(0.0, 0.0, 0x0, 0xFF).is_err());
        assert!(RegisterRange::new(0.0, 1.0, 0xFF, 0xFF).is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x800"), Ok(0x800));
        assert_eq!(parse_hex("0XfF"), Ok(0xFF));
        assert_eq!(parse_hex("1f"), Ok(0x1F));
        assert_eq!(
            parse_hex("0xzz"),
            Err(RegisterError::BadRegister(String::from("0xzz")))
        );
    }
}
