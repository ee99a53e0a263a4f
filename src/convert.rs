//! Unit conversions between physical radio parameters and register encodings
//!
//! Everything here is a pure function of its inputs. The CC1101 encodes most
//! analog quantities as an exponent/mantissa pair referenced to the crystal
//! frequency, so only discrete steps can be represented: each getter returns
//! the value the chip will actually use, which may differ from what was asked
//! for by up to one quantization step.

use crate::Error;

/// Crystal oscillator frequency in Hz
pub const FXOSC_HZ: f64 = 26_000_000.0;
/// Crystal oscillator frequency in MHz
pub const FXOSC_MHZ: f64 = 26.0;

const TWO_POW_16: f64 = 65_536.0;
const TWO_POW_17: f64 = 131_072.0;
const TWO_POW_28: f64 = 268_435_456.0;

/// Carrier frequency bands supported by the synthesizer, inclusive, in MHz
pub const FREQUENCY_BANDS_MHZ: [(f64, f64); 3] = [(300.0, 348.0), (387.0, 464.0), (779.0, 928.0)];

/// Receiver channel filter bandwidths in kHz, indexed by `4 * exponent + mantissa`
pub const CHANNEL_BANDWIDTH_KHZ: [u16; 16] = [
    812, 650, 541, 464, 406, 325, 270, 232, 203, 162, 135, 116, 102, 81, 68, 58,
];

/// Upper output power bound in dBm for each PA table index
pub const PA_POWER_LEVELS_DBM: [i8; 8] = [-30, -20, -15, -10, 0, 5, 7, 10];

/// RSSI offset for the 433 MHz band at 1.2-250 kBaud, in dB
pub const RSSI_OFFSET_DB: f32 = 74.0;

/// Returns true when `mhz` falls inside one of [`FREQUENCY_BANDS_MHZ`]
pub fn is_supported_frequency(mhz: f64) -> bool {
    FREQUENCY_BANDS_MHZ
        .iter()
        .any(|&(low, high)| mhz >= low && mhz <= high)
}

/// Computes the FREQ2, FREQ1, FREQ0 bytes for a carrier frequency in MHz.
///
/// The word is built byte by byte from the remainder modulo the crystal
/// frequency, which keeps each intermediate value small enough to stay exact
/// in floating point.
///
/// # Errors
/// * [`Error::InvalidParameter`] - frequency outside the supported bands
pub fn frequency_to_registers(mhz: f64) -> Result<[u8; 3], Error> {
    if !is_supported_frequency(mhz) {
        return Err(Error::InvalidParameter);
    }

    let mut word = [0u8; 3];
    let mut remainder = mhz;
    for (index, byte) in word.iter_mut().enumerate() {
        let scaled = if index == 0 { remainder } else { remainder * 256.0 };
        remainder = scaled % FXOSC_MHZ;
        *byte = ((scaled - remainder) / FXOSC_MHZ) as u8;
    }

    Ok(word)
}

/// Carrier frequency in MHz for the FREQ2, FREQ1, FREQ0 bytes
pub fn registers_to_frequency(word: [u8; 3]) -> f64 {
    let [freq2, freq1, freq0] = word;
    f64::from(freq2) * FXOSC_MHZ
        + f64::from(freq1) * FXOSC_MHZ / 256.0
        + f64::from(freq0) * FXOSC_MHZ / TWO_POW_16
}

/// Computes `(DRATE_E, DRATE_M)` for a data rate in kBaud.
///
/// The exponent search stops at the first exponent whose rounded mantissa is
/// below 256; it does not look for a better fit at larger exponents.
///
/// # Errors
/// * [`Error::InvalidParameter`] - rate too low or too high to encode
pub fn baud_to_registers(kbaud: f64) -> Result<(u8, u8), Error> {
    if !(kbaud > 0.0) {
        return Err(Error::InvalidParameter);
    }

    for exponent in 0..16u8 {
        let step = f64::from(1u32 << exponent) * FXOSC_HZ;
        let mantissa = (kbaud * 1000.0 * TWO_POW_28 / step - 256.0 + 0.5) as i32;
        if mantissa < 256 {
            return u8::try_from(mantissa)
                .map(|mantissa| (exponent, mantissa))
                .map_err(|_| Error::InvalidParameter);
        }
    }

    Err(Error::InvalidParameter)
}

/// Data rate in kBaud for a `(DRATE_E, DRATE_M)` pair
pub fn registers_to_baud(exponent: u8, mantissa: u8) -> f64 {
    let exponent = f64::from(1u32 << (exponent & 0x0F));
    FXOSC_HZ * (256.0 + f64::from(mantissa)) * exponent / TWO_POW_28 / 1000.0
}

/// Computes `(DEVIATION_E, DEVIATION_M)` for a frequency deviation in kHz.
///
/// Same first-fit search as the data rate, over the 3-bit exponent. The
/// mantissa is truncated and clamped at zero.
///
/// # Errors
/// * [`Error::InvalidParameter`] - deviation not positive or above ~406 kHz
pub fn deviation_to_registers(khz: f64) -> Result<(u8, u8), Error> {
    if !(khz > 0.0) {
        return Err(Error::InvalidParameter);
    }

    for exponent in 0..8u8 {
        let step = f64::from(1u32 << exponent) * FXOSC_HZ;
        let mantissa = (khz * 1000.0 * TWO_POW_17 / step - 8.0) as i32;
        if mantissa < 8 {
            return Ok((exponent, mantissa.max(0) as u8));
        }
    }

    Err(Error::InvalidParameter)
}

/// Frequency deviation in kHz for a `(DEVIATION_E, DEVIATION_M)` pair
pub fn registers_to_deviation(exponent: u8, mantissa: u8) -> f64 {
    let exponent = f64::from(1u32 << (exponent & 0x07));
    FXOSC_HZ * (8.0 + f64::from(mantissa & 0x07)) * exponent / TWO_POW_17 / 1000.0
}

/// Computes `(CHANBW_E, CHANBW_M)` for a channel filter bandwidth in kHz.
///
/// Picks the first entry of [`CHANNEL_BANDWIDTH_KHZ`] that is less than or
/// equal to the requested value, so a value equal to a table entry selects
/// exactly that entry.
///
/// # Errors
/// * [`Error::InvalidParameter`] - bandwidth outside 58..=812 kHz
pub fn bandwidth_to_registers(khz: u16) -> Result<(u8, u8), Error> {
    if !(58..=812).contains(&khz) {
        return Err(Error::InvalidParameter);
    }

    let index = CHANNEL_BANDWIDTH_KHZ
        .iter()
        .position(|&limit| khz >= limit)
        .ok_or(Error::InvalidParameter)?;

    Ok(((index / 4) as u8, (index % 4) as u8))
}

/// Channel filter bandwidth in kHz for a `(CHANBW_E, CHANBW_M)` pair
pub fn registers_to_bandwidth(exponent: u8, mantissa: u8) -> u16 {
    CHANNEL_BANDWIDTH_KHZ[usize::from(exponent & 0x03) * 4 + usize::from(mantissa & 0x03)]
}

/// PA table index for an output power in dBm, rounded up to the next level.
///
/// # Errors
/// * [`Error::InvalidParameter`] - power outside -30..=10 dBm
pub fn power_to_pa_index(dbm: i8) -> Result<u8, Error> {
    if !(-30..=10).contains(&dbm) {
        return Err(Error::InvalidParameter);
    }

    PA_POWER_LEVELS_DBM
        .iter()
        .position(|&level| dbm <= level)
        .map(|index| index as u8)
        .ok_or(Error::InvalidParameter)
}

/// Output power level in dBm for a PA table index
pub fn pa_index_to_power(index: u8) -> i8 {
    PA_POWER_LEVELS_DBM[usize::from(index & 0x07)]
}

/// Converts a raw RSSI status byte (two's complement, half-dB steps) to dBm
pub fn rssi_to_dbm(raw: u8) -> f32 {
    let half_db = if raw < 128 {
        f32::from(raw)
    } else {
        f32::from(raw) - 256.0
    };
    half_db / 2.0 - RSSI_OFFSET_DB
}

const fn field_mask(width: u8) -> u8 {
    if width >= 8 {
        0xFF
    } else {
        (1 << width) - 1
    }
}

/// Extracts a `width`-bit field starting at bit `offset`
pub const fn field(byte: u8, width: u8, offset: u8) -> u8 {
    (byte >> offset) & field_mask(width)
}

/// Replaces a `width`-bit field starting at bit `offset`, keeping all other
/// bits. Excess bits of `value` are dropped.
pub const fn with_field(byte: u8, value: u8, width: u8, offset: u8) -> u8 {
    let mask = field_mask(width) << offset;
    (byte & !mask) | ((value << offset) & mask)
}

/// Like [`with_field`], but rejects values that do not fit in `width` bits.
///
/// # Errors
/// * [`Error::InvalidArgument`] - `value` has bits set above `width`
pub fn set_field(byte: u8, value: u8, width: u8, offset: u8) -> Result<u8, Error> {
    if value > field_mask(width) {
        return Err(Error::InvalidArgument);
    }
    Ok(with_field(byte, value, width, offset))
}

/// Checks that `value` fits in a `width`-bit field
pub fn check_field(value: u8, width: u8) -> Result<u8, Error> {
    if value > field_mask(width) {
        Err(Error::InvalidArgument)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_round_trips_at_band_edges() {
        for mhz in [300.0, 348.0, 387.0, 464.0, 779.0, 928.0, 433.92, 868.3] {
            let word = frequency_to_registers(mhz).unwrap();
            let back = registers_to_frequency(word);
            assert!((back - mhz).abs() <= 0.025, "{mhz} MHz came back as {back}");
        }
    }

    #[test]
    fn frequency_word_for_300_mhz() {
        assert_eq!(frequency_to_registers(300.0), Ok([11, 137, 216]));
    }

    #[test]
    fn frequency_outside_bands_is_rejected() {
        for mhz in [0.0, 299.9, 348.1, 386.9, 500.0, 778.9, 928.1, f64::NAN] {
            assert_eq!(frequency_to_registers(mhz), Err(Error::InvalidParameter));
        }
    }

    #[test]
    fn baud_rate_stays_within_one_percent() {
        for kbaud in [1.0, 9.6, 38.4, 250.0] {
            let (exponent, mantissa) = baud_to_registers(kbaud).unwrap();
            let back = registers_to_baud(exponent, mantissa);
            assert!(
                ((back - kbaud) / kbaud).abs() <= 0.01,
                "{kbaud} kBaud came back as {back}"
            );
        }
    }

    #[test]
    fn baud_rate_takes_first_fitting_exponent() {
        assert_eq!(baud_to_registers(1.0), Ok((5, 67)));
        assert_eq!(baud_to_registers(9.6), Ok((8, 131)));
        assert_eq!(baud_to_registers(38.4), Ok((10, 131)));
        assert_eq!(baud_to_registers(250.0), Ok((13, 59)));
    }

    #[test]
    fn unencodable_baud_rates_are_rejected() {
        assert_eq!(baud_to_registers(0.0), Err(Error::InvalidParameter));
        assert_eq!(baud_to_registers(-9.6), Err(Error::InvalidParameter));
        assert_eq!(baud_to_registers(0.01), Err(Error::InvalidParameter));
        assert_eq!(baud_to_registers(5000.0), Err(Error::InvalidParameter));
    }

    #[test]
    fn deviation_is_truncated_to_the_step_below() {
        assert_eq!(deviation_to_registers(20.0), Ok((3, 4)));
        let back = registers_to_deviation(3, 4);
        assert!((back - 19.043).abs() < 0.001);
        assert_eq!(deviation_to_registers(1.0), Ok((0, 0)));
        assert_eq!(deviation_to_registers(500.0), Err(Error::InvalidParameter));
    }

    #[test]
    fn bandwidth_matches_table_entry_exactly() {
        assert_eq!(bandwidth_to_registers(102), Ok((3, 0)));
        assert_eq!(registers_to_bandwidth(3, 0), 102);
        assert_eq!(bandwidth_to_registers(812), Ok((0, 0)));
        assert_eq!(bandwidth_to_registers(58), Ok((3, 3)));
    }

    #[test]
    fn bandwidth_between_entries_selects_the_narrower_one() {
        assert_eq!(bandwidth_to_registers(811), Ok((0, 1)));
        assert_eq!(bandwidth_to_registers(100), Ok((3, 1)));
        assert_eq!(bandwidth_to_registers(300), Ok((1, 2)));
    }

    #[test]
    fn bandwidth_outside_table_is_rejected() {
        assert_eq!(bandwidth_to_registers(57), Err(Error::InvalidParameter));
        assert_eq!(bandwidth_to_registers(813), Err(Error::InvalidParameter));
    }

    #[test]
    fn power_follows_the_staircase() {
        assert_eq!(power_to_pa_index(-30), Ok(0));
        assert_eq!(power_to_pa_index(-25), Ok(1));
        assert_eq!(power_to_pa_index(0), Ok(4));
        assert_eq!(power_to_pa_index(6), Ok(6));
        assert_eq!(power_to_pa_index(10), Ok(7));
        assert_eq!(power_to_pa_index(11), Err(Error::InvalidParameter));
        assert_eq!(power_to_pa_index(-31), Err(Error::InvalidParameter));
        assert_eq!(pa_index_to_power(6), 7);
    }

    #[test]
    fn rssi_conversion() {
        assert_eq!(rssi_to_dbm(200), -102.0);
        assert_eq!(rssi_to_dbm(50), -49.0);
        assert_eq!(rssi_to_dbm(128), -138.0);
        assert_eq!(rssi_to_dbm(0), -74.0);
    }

    #[test]
    fn set_field_keeps_unrelated_bits() {
        assert_eq!(set_field(0b1010_0101, 0b11, 2, 4), Ok(0b1011_0101));
        assert_eq!(set_field(0xFF, 0, 1, 2), Ok(0b1111_1011));
        assert_eq!(field(0b1011_0101, 2, 4), 0b11);
    }

    #[test]
    fn set_field_rejects_oversized_values() {
        assert_eq!(set_field(0x00, 4, 2, 0), Err(Error::InvalidArgument));
        assert_eq!(check_field(8, 3), Err(Error::InvalidArgument));
        assert_eq!(check_field(7, 3), Ok(7));
    }
}
