//! BMP280 driver with support for I2C and SPI buses.
//!
//! # Example
//!
//! ```
//! # let mut i2c_txn = vec![
//! #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xD0], vec![0x58]),
//! #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xE0, 0xB6]),
//! # ];
//! # for (reg, word) in [
//! #   (0x88u8, 27504u16), (0x8A, 26435), (0x8C, -1000i16 as u16), (0x8E, 36477),
//! #   (0x90, -10685i16 as u16), (0x92, 3024), (0x94, 2855), (0x96, 140),
//! #   (0x98, -7i16 as u16), (0x9A, 15500), (0x9C, -14500i16 as u16), (0x9E, 6000),
//! # ] {
//! #   i2c_txn.push(ehm::eh1::i2c::Transaction::write_read(0x76, vec![reg], word.to_le_bytes().to_vec()));
//! # }
//! # i2c_txn.extend([
//! #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b00100111]),
//! #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b00100100]),
//! #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF5, 0b00000000]),
//! #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b00100111]),
//! #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFA], vec![0x7E]),
//! #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFB], vec![0xED]),
//! #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFC], vec![0x00]),
//! #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF7], vec![0x65]),
//! #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF8], vec![0x5A]),
//! #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF9], vec![0xC0]),
//! # ]);
//! # let i2c = ehm::eh1::i2c::Mock::new(&i2c_txn);
//! # let delay = ehm::eh1::delay::NoopDelay::new();
//! use bmp280_multibus::{i2c1::Address, Bmp280, Sample};
//!
//! let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
//! bmp.init()?;
//! let sample: Sample = bmp.sample()?;
//! assert_eq!(sample.temperature, 25.08);
//! # let (bus, _delay) = bmp.free();
//! # bus.free().done();
//! # Ok::<(), bmp280_multibus::Error<eh1::i2c::ErrorKind>>(())
//! ```
//!
//! # Features
//!
//! * `serde`: Implement `Serialize` and `Deserialize` for [`Sample`].
//! * `defmt`: Derive `defmt::Format` for public types and log with `defmt`.
//! * `log`: Log with the `log` facade. Mutually exclusive with `defmt`.
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg), feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

// must come first so the logging macros are visible to the other modules
mod fmt;

use core::time::Duration;

pub use eh0;
pub use eh1;

use eh1::delay::DelayNs;

/// BMP280 I2C bus implementation with embedded-hal version 0.2
pub mod i2c0;
/// BMP280 I2C bus implementation with embedded-hal version 1
pub mod i2c1;
/// BMP280 SPI bus implementation with embedded-hal version 1
pub mod spi1;

/// BMP280 chip ID.
pub const CHIP_ID: u8 = 0x58;

/// Delay after every register write, in milliseconds.
///
/// The device needs this time before a write is guaranteed to take effect.
pub const SETTLE_DELAY_MS: u32 = 5;

/// Pressure returned when the calibration is degenerate.
///
/// The compensation formula divides by a term derived only from the
/// calibration coefficients. When that term is zero, which happens with an
/// all-zero (unloaded) or corrupt calibration, the result is this value
/// instead of a division fault. A real reading is never exactly zero pascal,
/// so this does not collide with a measurement.
pub const INVALID_PRESSURE: f64 = 0.0;

/// Maximum SPI bus frequency in hertz.
pub const SPI_MAX_FREQ: u32 = 10_000_000;

const RESET_MAGIC: u8 = 0xB6;

/// Register addresses.
///
/// from Table 18: Memory map
mod reg {
    pub const TEMP_XLSB: u8 = 0xFC;
    pub const TEMP_LSB: u8 = 0xFB;
    pub const TEMP_MSB: u8 = 0xFA;
    pub const PRESS_XLSB: u8 = 0xF9;
    pub const PRESS_LSB: u8 = 0xF8;
    pub const PRESS_MSB: u8 = 0xF7;
    pub const CONFIG: u8 = 0xF5;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const STATUS: u8 = 0xF3;
    pub const RESET: u8 = 0xE0;
    pub const ID: u8 = 0xD0;
    pub const DIG_P9: u8 = 0x9E;
    pub const DIG_P8: u8 = 0x9C;
    pub const DIG_P7: u8 = 0x9A;
    pub const DIG_P6: u8 = 0x98;
    pub const DIG_P5: u8 = 0x96;
    pub const DIG_P4: u8 = 0x94;
    pub const DIG_P3: u8 = 0x92;
    pub const DIG_P2: u8 = 0x90;
    pub const DIG_P1: u8 = 0x8E;
    pub const DIG_T3: u8 = 0x8C;
    pub const DIG_T2: u8 = 0x8A;
    pub const DIG_T1: u8 = 0x88;
}

/// BMP280 calibration data.
///
/// Trimming parameters programmed into the device at the factory, see
/// chapter 3.11.2 in the [datasheet].
///
/// [datasheet]: https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bmp280-ds001.pdf
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct Calibration {
    pub t1: u16, // 0x88..0x89
    pub t2: i16, // 0x8A..0x8B
    pub t3: i16, // 0x8C..0x8D
    pub p1: u16, // 0x8E..0x8F
    pub p2: i16, // 0x90..0x91
    pub p3: i16, // 0x92..0x93
    pub p4: i16, // 0x94..0x95
    pub p5: i16, // 0x96..0x97
    pub p6: i16, // 0x98..0x99
    pub p7: i16, // 0x9A..0x9B
    pub p8: i16, // 0x9C..0x9D
    pub p9: i16, // 0x9E..0x9F
}

impl Calibration {
    /// Example trimming parameters from chapter 3.12 of the datasheet.
    ///
    /// Useful to check the compensation math without a device.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Calibration;
    ///
    /// let t_fine: i32 = Calibration::DATASHEET.compensate_temperature(519888);
    /// assert_eq!(t_fine, 128422);
    /// assert_eq!(bmp280_multibus::celsius(t_fine), 25.08);
    /// ```
    pub const DATASHEET: Self = Calibration {
        t1: 27504,
        t2: 26435,
        t3: -1000,
        p1: 36477,
        p2: -10685,
        p3: 3024,
        p4: 2855,
        p5: 140,
        p6: -7,
        p7: 15500,
        p8: -14500,
        p9: 6000,
    };

    /// Compensate a raw 20-bit temperature code.
    ///
    /// Returns the fine temperature `t_fine`, the intermediate that the
    /// pressure compensation depends on. Convert it to degrees Celsius with
    /// [`celsius`].
    ///
    /// This is the 32-bit integer formula from chapter 3.11.3 of the
    /// datasheet. Products that overflow 32 bits wrap, exactly as the vendor
    /// reference code does on its target.
    pub fn compensate_temperature(&self, raw: u32) -> i32 {
        let raw: i32 = raw as i32;
        let t1: i32 = self.t1 as i32;
        let t2: i32 = self.t2 as i32;
        let t3: i32 = self.t3 as i32;

        let var1: i32 = ((raw >> 3) - (t1 << 1)).wrapping_mul(t2) >> 11;
        let delta: i32 = (raw >> 4) - t1;
        let var2: i32 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(t3)) >> 14;

        var1.wrapping_add(var2)
    }

    /// Compensate a raw 20-bit pressure code, returning pascal.
    ///
    /// `t_fine` must come from [`Calibration::compensate_temperature`] on a
    /// temperature code sampled together with `raw`.
    ///
    /// Returns [`INVALID_PRESSURE`] when the calibration is degenerate.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{Calibration, INVALID_PRESSURE};
    ///
    /// let t_fine: i32 = Calibration::DATASHEET.compensate_temperature(519888);
    /// let pa: f64 = Calibration::DATASHEET.compensate_pressure(415148, t_fine);
    /// assert_eq!(pa, 25772151.0 / 256.0);
    ///
    /// let pa: f64 = Calibration::default().compensate_pressure(415148, t_fine);
    /// assert_eq!(pa, INVALID_PRESSURE);
    /// ```
    pub fn compensate_pressure(&self, raw: u32, t_fine: i32) -> f64 {
        // The magical math and magical numbers come from the datasheet,
        // chapter 3.11.3, 64-bit integer variant.
        let p1: i64 = self.p1.into();
        let p2: i64 = self.p2.into();
        let p3: i64 = self.p3.into();
        let p4: i64 = self.p4.into();
        let p5: i64 = self.p5.into();
        let p6: i64 = self.p6.into();
        let p7: i64 = self.p7.into();
        let p8: i64 = self.p8.into();
        let p9: i64 = self.p9.into();

        let var1: i64 = i64::from(t_fine) - 128000;
        let var2: i64 = var1.wrapping_mul(var1).wrapping_mul(p6);
        let var2: i64 = var2.wrapping_add(var1.wrapping_mul(p5) << 17);
        let var2: i64 = var2.wrapping_add(p4 << 35);
        let var1: i64 =
            (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8).wrapping_add(var1.wrapping_mul(p2) << 12);
        let var1: i64 = ((1i64 << 47).wrapping_add(var1)).wrapping_mul(p1) >> 33;

        if var1 == 0 {
            warn!("degenerate calibration, pressure unavailable");
            return INVALID_PRESSURE;
        }

        let p: i64 = 1048576 - i64::from(raw);
        let p: i64 = ((p << 31).wrapping_sub(var2))
            .wrapping_mul(3125)
            .wrapping_div(var1);
        let var1: i64 = p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
        let var2: i64 = p8.wrapping_mul(p) >> 19;
        let p: i64 = (p.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(p7 << 4);

        (p as f64) / 256.0
    }
}

/// Convert a fine temperature from [`Calibration::compensate_temperature`]
/// to degrees Celsius.
///
/// The value is rounded to a resolution of 0.01 °C first, as in the
/// datasheet.
///
/// # Example
///
/// ```
/// assert_eq!(bmp280_multibus::celsius(128422), 25.08);
/// assert_eq!(bmp280_multibus::celsius(0), 0.0);
/// ```
pub fn celsius(t_fine: i32) -> f64 {
    let centi: i32 = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
    f64::from(centi) / 100.0
}

/// Oversampling settings for temperature and pressure data.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Oversampling {
    /// Skipped, output set to `0x80000`.
    Skip = 0b000,
    /// Oversampling × 1
    X1 = 0b001,
    /// Oversampling × 2
    X2 = 0b010,
    /// Oversampling × 4
    X4 = 0b011,
    /// Oversampling × 8
    X8 = 0b100,
    /// Oversampling × 16
    X16 = 0b101,
}

impl From<Oversampling> for u8 {
    fn from(x: Oversampling) -> Self {
        x as u8
    }
}

impl Oversampling {
    /// Reset value of the osrs fields.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Oversampling;
    ///
    /// assert_eq!(Oversampling::RESET, Oversampling::Skip);
    /// ```
    pub const RESET: Self = Self::Skip;

    /// Legal values, in index order.
    pub const TABLE: [Self; 6] = [
        Self::Skip,
        Self::X1,
        Self::X2,
        Self::X4,
        Self::X8,
        Self::X16,
    ];

    /// Look up an oversampling setting by its index in [`Oversampling::TABLE`].
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Oversampling;
    ///
    /// assert_eq!(Oversampling::from_index(0), Some(Oversampling::Skip));
    /// assert_eq!(Oversampling::from_index(5), Some(Oversampling::X16));
    /// assert_eq!(Oversampling::from_index(6), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::TABLE.get(index).copied()
    }
}

impl Default for Oversampling {
    fn default() -> Self {
        Oversampling::RESET
    }
}

/// Sensor mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Sleep mode.
    Sleep = 0b00,
    /// Forced mode.
    Forced = 0b01,
    /// Normal mode.
    Normal = 0b11,
}

impl From<Mode> for u8 {
    fn from(x: Mode) -> Self {
        x as u8
    }
}

impl Mode {
    /// Reset value of the mode field in the [`CtrlMeas`] register.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Mode;
    ///
    /// assert_eq!(Mode::RESET, Mode::Sleep);
    /// ```
    pub const RESET: Self = Mode::Sleep;

    /// Legal values, in index order.
    pub const TABLE: [Self; 3] = [Self::Sleep, Self::Forced, Self::Normal];

    /// Look up a mode by its index in [`Mode::TABLE`].
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Mode;
    ///
    /// assert_eq!(Mode::from_index(2), Some(Mode::Normal));
    /// assert_eq!(Mode::from_index(3), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::TABLE.get(index).copied()
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::RESET
    }
}

/// t<sub>standby</sub> settings.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Standby {
    /// 0.5 ms
    Micros500 = 0b000,
    /// 62.5 ms
    Micros62500 = 0b001,
    /// 125 ms
    Millis125 = 0b010,
    /// 250 ms
    Millis250 = 0b011,
    /// 500 ms
    Millis500 = 0b100,
    /// 1000 ms
    Millis1000 = 0b101,
    /// 2000 ms
    Millis2000 = 0b110,
    /// 4000 ms
    Millis4000 = 0b111,
}

impl Standby {
    /// Reset value of the standby field in the [`Config`] register.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Standby;
    ///
    /// assert_eq!(Standby::RESET, Standby::Micros500);
    /// ```
    pub const RESET: Self = Standby::Micros500;

    /// Legal values, in index order.
    pub const TABLE: [Self; 8] = [
        Self::Micros500,
        Self::Micros62500,
        Self::Millis125,
        Self::Millis250,
        Self::Millis500,
        Self::Millis1000,
        Self::Millis2000,
        Self::Millis4000,
    ];

    /// Look up a standby time by its index in [`Standby::TABLE`].
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Standby;
    ///
    /// assert_eq!(Standby::from_index(7), Some(Standby::Millis4000));
    /// assert_eq!(Standby::from_index(8), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::TABLE.get(index).copied()
    }

    /// Convert the standby enumeration to a duration.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Standby;
    /// use core::time::Duration;
    ///
    /// assert_eq!(Standby::Micros500.duration(), Duration::from_micros(500));
    /// assert_eq!(
    ///     Standby::Micros62500.duration(),
    ///     Duration::from_micros(62500)
    /// );
    /// assert_eq!(Standby::Millis125.duration(), Duration::from_millis(125));
    /// assert_eq!(Standby::Millis2000.duration(), Duration::from_millis(2000));
    /// assert_eq!(Standby::Millis4000.duration(), Duration::from_millis(4000));
    /// ```
    pub const fn duration(&self) -> Duration {
        match self {
            Standby::Micros500 => Duration::from_micros(500),
            Standby::Micros62500 => Duration::from_micros(62500),
            Standby::Millis125 => Duration::from_millis(125),
            Standby::Millis250 => Duration::from_millis(250),
            Standby::Millis500 => Duration::from_millis(500),
            Standby::Millis1000 => Duration::from_millis(1000),
            Standby::Millis2000 => Duration::from_millis(2000),
            Standby::Millis4000 => Duration::from_millis(4000),
        }
    }
}

impl Default for Standby {
    fn default() -> Self {
        Standby::RESET
    }
}

/// Filter settings.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Filter {
    /// Filter off.
    Off = 0b000,
    /// Filter coefficient of 2.
    X2 = 0b001,
    /// Filter coefficient of 4.
    X4 = 0b010,
    /// Filter coefficient of 8.
    X8 = 0b011,
    /// Filter coefficient of 16.
    X16 = 0b100,
}

impl Filter {
    /// Reset value of the filter field in the [`Config`] register.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Filter;
    ///
    /// assert_eq!(Filter::RESET, Filter::Off);
    /// ```
    pub const RESET: Self = Filter::Off;

    /// Legal values, in index order.
    pub const TABLE: [Self; 5] = [Self::Off, Self::X2, Self::X4, Self::X8, Self::X16];

    /// Look up a filter coefficient by its index in [`Filter::TABLE`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::TABLE.get(index).copied()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::RESET
    }
}

impl From<Filter> for u8 {
    fn from(x: Filter) -> Self {
        x as u8
    }
}

/// Config register.
///
/// Standby time and IIR filter coefficient.
/// Writes to the config register in normal mode may be ignored.
/// In sleep mode writes are not ignored.
///
/// All methods on this struct are constant so that you can create a
/// configuration value at compile time.
///
/// # Example
///
/// ```
/// use bmp280_multibus::{Config, Filter, Standby};
///
/// const CONFIG: Config = Config::RESET
///     .set_standby_time(Standby::Millis1000)
///     .set_filter(Filter::X16);
/// assert_eq!(CONFIG.bits(), 0b10110000);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config(u8);

impl Config {
    /// Get the reset value of the config register.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Config;
    ///
    /// assert_eq!(Config::RESET, Config::default());
    /// ```
    pub const RESET: Self = Config(0x00);

    /// Raw register value.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Set the inactive duration t<sub>standby</sub> in normal mode.
    ///
    /// See [`Standby`] for settings, and chapter 3.6.3 in the [datasheet] for
    /// details.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{Config, Standby};
    ///
    /// let mut cfg: Config = Config::default();
    /// assert_eq!(cfg.standby_time(), Standby::default());
    /// for standby in Standby::TABLE {
    ///     cfg = cfg.set_standby_time(standby);
    ///     assert_eq!(cfg.standby_time(), standby);
    /// }
    /// ```
    ///
    /// [datasheet]: https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bmp280-ds001.pdf
    #[must_use = "set_standby_time returns a modified Config"]
    pub const fn set_standby_time(self, s: Standby) -> Config {
        Config((self.0 & 0x1F) | ((s as u8) << 5))
    }

    /// Get the standby time.
    pub const fn standby_time(&self) -> Standby {
        match self.0 >> 5 {
            0b000 => Standby::Micros500,
            0b001 => Standby::Micros62500,
            0b010 => Standby::Millis125,
            0b011 => Standby::Millis250,
            0b100 => Standby::Millis500,
            0b101 => Standby::Millis1000,
            0b110 => Standby::Millis2000,
            _ => Standby::Millis4000,
        }
    }

    /// Set the time constant of the IIR filter.
    ///
    /// See [`Filter`] for settings, and chapter 3.3.3 in the [datasheet] for
    /// details.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{Config, Filter};
    ///
    /// let mut cfg: Config = Config::default();
    /// assert_eq!(cfg.filter(), Filter::default());
    /// for filter in Filter::TABLE {
    ///     cfg = cfg.set_filter(filter);
    ///     assert_eq!(cfg.filter(), filter);
    /// }
    /// ```
    ///
    /// [datasheet]: https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bmp280-ds001.pdf
    #[must_use = "set_filter returns a modified Config"]
    pub const fn set_filter(self, f: Filter) -> Config {
        Config((self.0 & 0b11100011) | ((f as u8) << 2))
    }

    /// Get the filter coefficient.
    pub const fn filter(&self) -> Filter {
        match (self.0 >> 2) & 0b111 {
            0b000 => Filter::Off,
            0b001 => Filter::X2,
            0b010 => Filter::X4,
            0b011 => Filter::X8,
            _ => Filter::X16,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::RESET
    }
}

/// Measurement control register.
///
/// This configures the pressure and temperature data acquisition options of the
/// device.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtrlMeas(u8);

impl CtrlMeas {
    /// Get the reset value of the ctrl_meas register.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::CtrlMeas;
    ///
    /// assert_eq!(CtrlMeas::RESET, CtrlMeas::default());
    /// ```
    pub const RESET: Self = CtrlMeas(0x00);

    /// Raw register value.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{CtrlMeas, Mode, Oversampling};
    ///
    /// let ctrl_meas: CtrlMeas = CtrlMeas::RESET
    ///     .set_osrs_t(Oversampling::X2)
    ///     .set_osrs_p(Oversampling::X16)
    ///     .set_mode(Mode::Normal);
    /// assert_eq!(ctrl_meas.bits(), (0b010 << 5) | (0b101 << 2) | 0b11);
    /// ```
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Set the oversampling for temperature data.
    ///
    /// See [`Oversampling`] for settings, and chapter 3.3.2 in the [datasheet]
    /// for details.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{CtrlMeas, Oversampling};
    ///
    /// let mut ctrl_meas: CtrlMeas = CtrlMeas::default();
    /// assert_eq!(ctrl_meas.osrs_t(), Oversampling::default());
    /// for os in Oversampling::TABLE {
    ///     ctrl_meas = ctrl_meas.set_osrs_t(os);
    ///     assert_eq!(ctrl_meas.osrs_t(), os);
    /// }
    /// ```
    ///
    /// [datasheet]: https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bmp280-ds001.pdf
    #[must_use = "set_osrs_t returns a modified CtrlMeas"]
    pub const fn set_osrs_t(self, os: Oversampling) -> CtrlMeas {
        CtrlMeas((self.0 & 0b00011111) | ((os as u8) << 5))
    }

    /// Get the temperature data oversampling.
    pub const fn osrs_t(&self) -> Oversampling {
        match (self.0 >> 5) & 0b111 {
            0b000 => Oversampling::Skip,
            0b001 => Oversampling::X1,
            0b010 => Oversampling::X2,
            0b011 => Oversampling::X4,
            0b100 => Oversampling::X8,
            _ => Oversampling::X16,
        }
    }

    /// Set the oversampling for pressure data.
    ///
    /// See [`Oversampling`] for settings, and chapter 3.3.1 in the [datasheet]
    /// for details.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{CtrlMeas, Oversampling};
    ///
    /// let mut ctrl_meas: CtrlMeas = CtrlMeas::default();
    /// assert_eq!(ctrl_meas.osrs_p(), Oversampling::default());
    /// for os in Oversampling::TABLE {
    ///     ctrl_meas = ctrl_meas.set_osrs_p(os);
    ///     assert_eq!(ctrl_meas.osrs_p(), os);
    /// }
    /// ```
    ///
    /// [datasheet]: https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bmp280-ds001.pdf
    #[must_use = "set_osrs_p returns a modified CtrlMeas"]
    pub const fn set_osrs_p(self, os: Oversampling) -> CtrlMeas {
        CtrlMeas((self.0 & 0b11100011) | ((os as u8) << 2))
    }

    /// Get the pressure data oversampling.
    pub const fn osrs_p(&self) -> Oversampling {
        match (self.0 >> 2) & 0b111 {
            0b000 => Oversampling::Skip,
            0b001 => Oversampling::X1,
            0b010 => Oversampling::X2,
            0b011 => Oversampling::X4,
            0b100 => Oversampling::X8,
            _ => Oversampling::X16,
        }
    }

    /// Set the sensor mode for the device.
    ///
    /// See [`Mode`] for setting, and chapter 3.6 in the [datasheet] for details.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{CtrlMeas, Mode};
    ///
    /// let mut ctrl_meas: CtrlMeas = CtrlMeas::default();
    /// assert_eq!(ctrl_meas.mode(), Mode::default());
    /// for mode in Mode::TABLE {
    ///     ctrl_meas = ctrl_meas.set_mode(mode);
    ///     assert_eq!(ctrl_meas.mode(), mode);
    /// }
    /// ```
    ///
    /// [datasheet]: https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bmp280-ds001.pdf
    #[must_use = "set_mode returns a modified CtrlMeas"]
    pub const fn set_mode(self, m: Mode) -> CtrlMeas {
        CtrlMeas((self.0 & 0xFC) | (m as u8))
    }

    /// Get the mode.
    pub const fn mode(&self) -> Mode {
        match self.0 & 0b11 {
            0b00 => Mode::Sleep,
            0b11 => Mode::Normal,
            _ => Mode::Forced,
        }
    }
}

impl Default for CtrlMeas {
    fn default() -> Self {
        CtrlMeas::RESET
    }
}

/// Status register
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u8);

impl Status {
    /// Get the reset value of the status register.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Status;
    ///
    /// assert_eq!(Status::RESET, Status::default());
    /// ```
    pub const RESET: Self = Status(0x00);

    /// Measuring field.
    ///
    /// Automatically set to `true` whenever a conversion is running and back to
    /// `false` when the results have been transferred to the data registers.
    ///
    /// # Example
    ///
    /// ```
    /// assert!(!bmp280_multibus::Status::RESET.measuring());
    /// ```
    pub const fn measuring(&self) -> bool {
        self.0 & (1 << 3) != 0
    }

    /// im_update field.
    ///
    /// Automatically set to `true` when the NVM data are being copied to image
    /// registers and back to `false` when the copying is done.
    /// The data is copied at power-on-reset and before every conversion.
    ///
    /// # Example
    ///
    /// ```
    /// assert!(!bmp280_multibus::Status::RESET.im_update());
    /// ```
    pub const fn im_update(&self) -> bool {
        self.0 & 1 != 0
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::RESET
    }
}

/// One of the five sampling settings.
///
/// Carried by [`Error::InvalidSetting`] to name the rejected index.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Pressure [`Oversampling`].
    PressureOversampling,
    /// Temperature [`Oversampling`].
    TemperatureOversampling,
    /// Power [`Mode`].
    Mode,
    /// [`Standby`] time.
    Standby,
    /// IIR [`Filter`].
    Filter,
}

/// BMP280 sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// `config` register value.
    pub config: Config,
    /// `ctrl_meas` register value.
    pub ctrl_meas: CtrlMeas,
}

impl Settings {
    /// Settings applied by [`Bmp280::init`].
    ///
    /// Temperature and pressure oversampling × 1, normal mode, 0.5 ms
    /// standby and the IIR filter off.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::Settings;
    ///
    /// assert_eq!(Settings::INITIAL.ctrl_meas.bits(), 0b001_001_11);
    /// assert_eq!(Settings::INITIAL.config.bits(), 0);
    /// ```
    pub const INITIAL: Settings = Settings {
        config: Config::RESET
            .set_standby_time(Standby::Micros500)
            .set_filter(Filter::Off),
        ctrl_meas: CtrlMeas::RESET
            .set_osrs_t(Oversampling::X1)
            .set_osrs_p(Oversampling::X1)
            .set_mode(Mode::Normal),
    };

    /// Create a new settings structure with the register reset values.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{Config, CtrlMeas, Filter, Mode, Oversampling, Settings, Standby};
    ///
    /// const SETTINGS: Settings = Settings {
    ///     config: Config::RESET
    ///         .set_standby_time(Standby::Millis1000)
    ///         .set_filter(Filter::X16),
    ///     ctrl_meas: CtrlMeas::RESET
    ///         .set_osrs_t(Oversampling::X16)
    ///         .set_osrs_p(Oversampling::X16)
    ///         .set_mode(Mode::Normal),
    /// };
    /// assert_ne!(SETTINGS, Settings::new());
    /// ```
    pub const fn new() -> Settings {
        Settings {
            config: Config::RESET,
            ctrl_meas: CtrlMeas::RESET,
        }
    }

    /// Build settings from indices into the legal-value tables.
    ///
    /// Arguments index [`Oversampling::TABLE`] (pressure, then temperature),
    /// [`Mode::TABLE`], [`Standby::TABLE`] and [`Filter::TABLE`].
    /// The first out-of-range index is returned as the error.
    ///
    /// # Example
    ///
    /// ```
    /// use bmp280_multibus::{Mode, Oversampling, Setting, Settings, Standby};
    ///
    /// let settings: Settings = Settings::from_indices(5, 1, 2, 7, 0)?;
    /// assert_eq!(settings.ctrl_meas.osrs_p(), Oversampling::X16);
    /// assert_eq!(settings.ctrl_meas.osrs_t(), Oversampling::X1);
    /// assert_eq!(settings.ctrl_meas.mode(), Mode::Normal);
    /// assert_eq!(settings.config.standby_time(), Standby::Millis4000);
    ///
    /// assert_eq!(Settings::from_indices(0, 0, 3, 0, 0), Err(Setting::Mode));
    /// # Ok::<(), Setting>(())
    /// ```
    pub fn from_indices(
        pressure_oversampling: usize,
        temperature_oversampling: usize,
        mode: usize,
        standby: usize,
        filter: usize,
    ) -> Result<Settings, Setting> {
        let osrs_p: Oversampling = Oversampling::from_index(pressure_oversampling)
            .ok_or(Setting::PressureOversampling)?;
        let osrs_t: Oversampling = Oversampling::from_index(temperature_oversampling)
            .ok_or(Setting::TemperatureOversampling)?;
        let mode: Mode = Mode::from_index(mode).ok_or(Setting::Mode)?;
        let standby: Standby = Standby::from_index(standby).ok_or(Setting::Standby)?;
        let filter: Filter = Filter::from_index(filter).ok_or(Setting::Filter)?;

        Ok(Settings {
            config: Config::RESET.set_standby_time(standby).set_filter(filter),
            ctrl_meas: CtrlMeas::RESET
                .set_osrs_t(osrs_t)
                .set_osrs_p(osrs_p)
                .set_mode(mode),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}

/// A sensor sample from the BMP280.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Temperature reading in celsius.
    pub temperature: f64,
    /// Pressure reading in pascal.
    ///
    /// [`INVALID_PRESSURE`] if the calibration is degenerate.
    pub pressure: f64,
}

/// BMP280 error.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<B> {
    /// Bus error.
    Bus(B),
    /// The chip ID register did not hold [`CHIP_ID`].
    ///
    /// Contains the value that was read. Usually the wrong device sits at
    /// the address, or a BME280 (`0x60`) is connected.
    DeviceNotFound(u8),
    /// A settings index was outside its table.
    ///
    /// Returned before anything is written to the device.
    InvalidSetting(Setting),
}

impl<B> From<B> for Error<B> {
    #[inline]
    fn from(e: B) -> Self {
        Error::Bus(e)
    }
}

/// BMP280 bus.
pub trait Bmp280Bus {
    /// BMP280 bus error.
    type Error;

    /// Read from the BMP280.
    ///
    /// # I2C
    ///
    /// ```text
    /// Read example (BMP280 Datasheet Figure 8: I2C multiple byte read)
    /// +-------+---------------+----+------+------------------+------+
    /// | Start | Slave Address | RW | ACKS | Register Address | ACKS |
    /// +-------+---------------+----+------+------------------+------+
    /// | S     | 111011x       |  0 |      | xxxxxxxx         |      |
    /// +-------+---------------+----+------+------------------+------+
    ///
    ///     +-------+---------------+----+------+---------------+------+---------------+--------+------+
    /// ... | Start | Slave Address | RW | ACKS | Register Data | ACKM | Register Data | NOACKM | Stop |
    ///     +-------+---------------+----+------+---------------+------+---------------+--------+------+
    /// ... | S     | 111011x       |  1 |      | xxxxxxxx      |      | xxxxxxxx      |        | P    |
    ///     +-------+---------------+----+------+---------------+------+---------------+--------+------+
    /// ```
    ///
    /// # SPI
    ///
    /// ```text
    /// Read example (BMP280 Datasheet Figure 10: SPI multiple byte read)
    /// +-------+----+------------------+---------------+
    /// | Start | RW | Register Address | Register Data |
    /// +-------+----+------------------+---------------+
    /// | CSB=0 |  1 | xxxxxxx          | xxxxxxxx      |
    /// +-------+----+------------------+---------------+
    ///
    ///     +---------------+-------+
    /// ... | Register Data | Stop  |
    ///     +---------------+-------+
    /// ... | xxxxxxxx      | CSB=0 |
    ///     +---------------+-------+
    /// ```
    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write a single register to the BMP280.
    ///
    /// # I2C
    ///
    /// ```text
    /// Write example (BMP280 Datasheet Figure 7: I2C write)
    /// +-------+---------------+----+------+------------------+------+---------------+------+------+
    /// | Start | Slave Address | RW | ACKS | Register Address | ACKS | Register Data | ACKS | Stop |
    /// +-------+---------------+----+------+------------------+------+---------------+------+------+
    /// | S     | 111011x       |  0 |      | xxxxxxxx         |      | xxxxxxxx      |      | P    |
    /// +-------+---------------+----+------+------------------+------+---------------+------+------+
    /// ```
    ///
    /// # SPI
    ///
    /// ```text
    /// Write example (BMP280 Datasheet Figure 9: SPI write)
    /// +-------+----+------------------+---------------+-------+
    /// | Start | RW | Register Address | Register Data | Stop  |
    /// +-------+----+------------------+---------------+-------+
    /// | CSB=0 |  0 | xxxxxxx          | xxxxxxxx      | CSB=1 |
    /// +-------+----+------------------+---------------+-------+
    /// ```
    fn write_reg(&mut self, reg: u8, data: u8) -> Result<(), Self::Error>;

    /// Read a single register.
    fn read_byte(&mut self, reg: u8) -> Result<u8, Self::Error> {
        let mut buf: [u8; 1] = [0];
        self.read_regs(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian 16-bit word starting at `reg`.
    fn read_word(&mut self, reg: u8) -> Result<u16, Self::Error> {
        let mut buf: [u8; 2] = [0; 2];
        self.read_regs(reg, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read the calibration from the chip.
    ///
    /// One word read per coefficient, in register order.
    fn calibration(&mut self) -> Result<Calibration, Self::Error> {
        Ok(Calibration {
            t1: self.read_word(reg::DIG_T1)?,
            t2: self.read_word(reg::DIG_T2)? as i16,
            t3: self.read_word(reg::DIG_T3)? as i16,
            p1: self.read_word(reg::DIG_P1)?,
            p2: self.read_word(reg::DIG_P2)? as i16,
            p3: self.read_word(reg::DIG_P3)? as i16,
            p4: self.read_word(reg::DIG_P4)? as i16,
            p5: self.read_word(reg::DIG_P5)? as i16,
            p6: self.read_word(reg::DIG_P6)? as i16,
            p7: self.read_word(reg::DIG_P7)? as i16,
            p8: self.read_word(reg::DIG_P8)? as i16,
            p9: self.read_word(reg::DIG_P9)? as i16,
        })
    }
}

/// BMP280 driver.
///
/// Owns the bus, the delay used for settle times, the calibration and the
/// last applied [`Settings`]. Call [`Bmp280::init`] before reading.
#[derive(Debug)]
pub struct Bmp280<B, D> {
    bus: B,
    delay: D,
    cal: Calibration,
    settings: Settings,
}

impl<I2C, E, D> Bmp280<crate::i2c0::Bmp280Bus<I2C>, D>
where
    I2C: eh0::blocking::i2c::Write<Error = E> + eh0::blocking::i2c::WriteRead<Error = E>,
    D: DelayNs,
{
    /// Creates a new `Bmp280` driver from an embedded-hal version 0.2 I2C
    /// peripheral, an I2C device address, and a delay.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh0::i2c::Mock::new(&[]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c0::Address, Bmp280};
    ///
    /// let bmp: Bmp280<_, _> = Bmp280::from_i2c0(i2c, Address::SdoGnd, delay);
    /// # bmp.free().0.free().done();
    /// ```
    pub fn from_i2c0(i2c: I2C, address: crate::i2c0::Address, delay: D) -> Self {
        let bus = crate::i2c0::Bmp280Bus::new(i2c, address);
        Self::new(bus, delay)
    }
}

impl<I2C, E, D> Bmp280<crate::i2c1::Bmp280Bus<I2C>, D>
where
    I2C: eh1::i2c::I2c<Error = E>,
    D: DelayNs,
{
    /// Creates a new `Bmp280` driver from an embedded-hal version 1 I2C
    /// peripheral, an I2C device address, and a delay.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280};
    ///
    /// let bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// # bmp.free().0.free().done();
    /// ```
    pub fn from_i2c1(i2c: I2C, address: crate::i2c1::Address, delay: D) -> Self {
        let bus = crate::i2c1::Bmp280Bus::new(i2c, address);
        Self::new(bus, delay)
    }
}

impl<SPI, E, D> Bmp280<crate::spi1::Bmp280Bus<SPI>, D>
where
    SPI: eh1::spi::SpiDevice<Error = E>,
    D: DelayNs,
{
    /// Creates a new `Bmp280` driver from an embedded-hal version 1 SPI device
    /// and a delay.
    ///
    /// # Example
    ///
    /// ```
    /// # let spi = ehm::eh1::spi::Mock::<u8>::new(&[]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::Bmp280;
    ///
    /// let bmp: Bmp280<_, _> = Bmp280::from_spi1(spi, delay);
    /// # bmp.free().0.free().done();
    /// ```
    pub fn from_spi1(spi: SPI, delay: D) -> Self {
        let bus: crate::spi1::Bmp280Bus<SPI> = crate::spi1::Bmp280Bus::new(spi);
        Self::new(bus, delay)
    }
}

impl<B, E, D> Bmp280<B, D>
where
    B: Bmp280Bus<Error = E>,
    D: DelayNs,
{
    /// Create a new BMP280 from a [`Bmp280Bus`] and a delay.
    ///
    /// No bus traffic happens here; the calibration holds
    /// [`Calibration::default`] until [`Bmp280::init`] succeeds.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{
    ///     i2c1::{Address, Bmp280Bus},
    ///     Bmp280, Calibration,
    /// };
    ///
    /// let bus: Bmp280Bus<_> = Bmp280Bus::new(i2c, Address::SdoGnd);
    /// let bmp: Bmp280<_, _> = Bmp280::new(bus, delay);
    /// assert_eq!(*bmp.calibration(), Calibration::default());
    /// # bmp.free().0.free().done();
    /// ```
    pub fn new(bus: B, delay: D) -> Self {
        Self {
            bus,
            delay,
            cal: Calibration::default(),
            settings: Settings::new(),
        }
    }

    /// Free the bus and delay from the BMP280.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{
    ///     i2c1::{Address, Bmp280Bus},
    ///     Bmp280,
    /// };
    ///
    /// let bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// let (bus, delay) = bmp.free();
    /// let mut i2c = bus.free();
    /// # i2c.done();
    /// ```
    #[inline]
    pub fn free(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Calibration in use.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280, Calibration};
    ///
    /// let bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// let cal: &Calibration = bmp.calibration();
    /// assert_eq!(cal.p1, 0);
    /// # bmp.free().0.free().done();
    /// ```
    pub fn calibration(&self) -> &Calibration {
        &self.cal
    }

    /// Settings most recently applied in full by [`Bmp280::settings`].
    ///
    /// A failed write leaves this unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b00100101]),
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF5, 0b00000000]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280, Mode, Settings};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// assert_eq!(bmp.active_settings(), Settings::default());
    /// // pressure x1, temperature x1, forced, 0.5 ms, filter off
    /// bmp.configure(1, 1, 1, 0, 0)?;
    /// assert_eq!(bmp.active_settings().ctrl_meas.mode(), Mode::Forced);
    /// # bmp.free().0.free().done();
    /// # Ok::<(), bmp280_multibus::Error<eh1::i2c::ErrorKind>>(())
    /// ```
    pub fn active_settings(&self) -> Settings {
        self.settings
    }

    /// Bring up the device.
    ///
    /// In order: verify the chip ID, soft reset, load the calibration, and
    /// apply [`Settings::INITIAL`]. Reads are only meaningful after this
    /// returns `Ok`.
    ///
    /// # Errors
    ///
    /// * [`Error::DeviceNotFound`] if the chip ID is not [`CHIP_ID`]. Nothing
    ///   is written to the device and the calibration is left untouched.
    /// * [`Error::Bus`] on any bus failure.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        let id: u8 = self.chip_id()?;
        if id != CHIP_ID {
            warn!("unexpected chip ID {:#x}", id);
            return Err(Error::DeviceNotFound(id));
        }
        debug!("chip ID ok");

        self.reset()?;
        self.load_calibration()?;
        self.settings(&Settings::INITIAL)?;
        Ok(())
    }

    /// BMP280 chip ID.
    ///
    /// The return value is a constant, [`CHIP_ID`].
    ///
    /// This register is useful as a sanity check to ensure communications are
    /// working with the BMP280.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xD0], vec![0x58]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280, CHIP_ID};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// let chip_id: u8 = bmp.chip_id()?;
    /// assert_eq!(chip_id, CHIP_ID);
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn chip_id(&mut self) -> Result<u8, E> {
        self.bus.read_byte(reg::ID)
    }

    /// Reset the BMP280.
    ///
    /// Blocks for [`SETTLE_DELAY_MS`] after the reset command.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xE0, 0xB6]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// bmp.reset()?;
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn reset(&mut self) -> Result<(), E> {
        debug!("soft reset");
        self.write_settled(reg::RESET, RESET_MAGIC)
    }

    /// Get the status of the device.
    ///
    /// # Example
    ///
    /// Check if a conversion is running.
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF3], vec![0x08]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280, Status};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// let status: Status = bmp.status()?;
    /// assert!(status.measuring());
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn status(&mut self) -> Result<Status, E> {
        Ok(Status(self.bus.read_byte(reg::STATUS)?))
    }

    /// Read the calibration from the device and keep it.
    ///
    /// [`Bmp280::init`] calls this after the soft reset.
    ///
    /// # Example
    ///
    /// ```
    /// # let mut txn = Vec::new();
    /// # for (reg, word) in [
    /// #   (0x88u8, 27504u16), (0x8A, 26435), (0x8C, -1000i16 as u16), (0x8E, 36477),
    /// #   (0x90, -10685i16 as u16), (0x92, 3024), (0x94, 2855), (0x96, 140),
    /// #   (0x98, -7i16 as u16), (0x9A, 15500), (0x9C, -14500i16 as u16), (0x9E, 6000),
    /// # ] {
    /// #   txn.push(ehm::eh1::i2c::Transaction::write_read(0x76, vec![reg], word.to_le_bytes().to_vec()));
    /// # }
    /// # let i2c = ehm::eh1::i2c::Mock::new(&txn);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280, Calibration};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// bmp.load_calibration()?;
    /// assert_eq!(*bmp.calibration(), Calibration::DATASHEET);
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn load_calibration(&mut self) -> Result<(), E> {
        self.cal = self.bus.calibration()?;
        debug!("calibration loaded");
        Ok(())
    }

    /// Configure the BMP280 from table indices.
    ///
    /// See [`Settings::from_indices`] for the meaning of the arguments.
    /// All indices are validated before anything is written.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b01010001]),
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF5, 0b00010000]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280, Error, Setting};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// // pressure x8, temperature x2, forced, 0.5 ms, filter x16
    /// bmp.configure(4, 2, 1, 0, 4)?;
    /// assert_eq!(
    ///     bmp.configure(0, 0, 0, 0, 5),
    ///     Err(Error::InvalidSetting(Setting::Filter))
    /// );
    /// # bmp.free().0.free().done();
    /// # Ok::<(), Error<eh1::i2c::ErrorKind>>(())
    /// ```
    pub fn configure(
        &mut self,
        pressure_oversampling: usize,
        temperature_oversampling: usize,
        mode: usize,
        standby: usize,
        filter: usize,
    ) -> Result<(), Error<E>> {
        let settings: Settings = Settings::from_indices(
            pressure_oversampling,
            temperature_oversampling,
            mode,
            standby,
            filter,
        )
        .map_err(Error::InvalidSetting)?;
        self.settings(&settings)?;
        Ok(())
    }

    /// Configure the BMP280 settings.
    ///
    /// The `config` register is ignored by the device in normal mode, so
    /// when `settings` selects normal mode the device is put to sleep for
    /// the `config` write and then returned to normal mode.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b10010011]),
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b10010000]),
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF5, 0b10110000]),
    /// #   ehm::eh1::i2c::Transaction::write(0x76, vec![0xF4, 0b10010011]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{
    ///     i2c1::Address, Bmp280, Config, CtrlMeas, Filter, Mode, Oversampling, Settings, Standby,
    /// };
    ///
    /// const SETTINGS: Settings = Settings {
    ///     config: Config::RESET
    ///         .set_standby_time(Standby::Millis1000)
    ///         .set_filter(Filter::X16),
    ///     ctrl_meas: CtrlMeas::RESET
    ///         .set_osrs_t(Oversampling::X8)
    ///         .set_osrs_p(Oversampling::X8)
    ///         .set_mode(Mode::Normal),
    /// };
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// bmp.settings(&SETTINGS)?;
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn settings(&mut self, settings: &Settings) -> Result<(), E> {
        let ctrl_meas: CtrlMeas = settings.ctrl_meas;
        let config: Config = settings.config;
        trace!("ctrl_meas {:#x} config {:#x}", ctrl_meas.0, config.0);

        self.write_settled(reg::CTRL_MEAS, ctrl_meas.0)?;
        if ctrl_meas.mode() == Mode::Normal {
            self.write_settled(reg::CTRL_MEAS, ctrl_meas.set_mode(Mode::Sleep).0)?;
            self.write_settled(reg::CONFIG, config.0)?;
            self.write_settled(reg::CTRL_MEAS, ctrl_meas.0)?;
        } else {
            self.write_settled(reg::CONFIG, config.0)?;
        }

        self.settings = *settings;
        Ok(())
    }

    /// Read the temperature in celsius.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFA], vec![0x00]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFB], vec![0x00]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFC], vec![0x00]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// let celsius: f64 = bmp.read_temperature()?;
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn read_temperature(&mut self) -> Result<f64, E> {
        let t_fine: i32 = self.read_t_fine()?;
        Ok(celsius(t_fine))
    }

    /// Read the pressure in pascal.
    ///
    /// A fresh temperature reading is taken first because pressure
    /// compensation depends on it.
    ///
    /// Returns [`INVALID_PRESSURE`] if the calibration is degenerate, for
    /// example when [`Bmp280::init`] has not succeeded.
    ///
    /// # Example
    ///
    /// ```
    /// # let mut txn = Vec::new();
    /// # for (reg, word) in [
    /// #   (0x88u8, 27504u16), (0x8A, 26435), (0x8C, -1000i16 as u16), (0x8E, 36477),
    /// #   (0x90, -10685i16 as u16), (0x92, 3024), (0x94, 2855), (0x96, 140),
    /// #   (0x98, -7i16 as u16), (0x9A, 15500), (0x9C, -14500i16 as u16), (0x9E, 6000),
    /// # ] {
    /// #   txn.push(ehm::eh1::i2c::Transaction::write_read(0x76, vec![reg], word.to_le_bytes().to_vec()));
    /// # }
    /// # txn.extend([
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFA], vec![0x7E]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFB], vec![0xED]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFC], vec![0x00]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF7], vec![0x65]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF8], vec![0x5A]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF9], vec![0xC0]),
    /// # ]);
    /// # let i2c = ehm::eh1::i2c::Mock::new(&txn);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// bmp.load_calibration()?;
    /// // temperature registers 0xFA..=0xFC are read before 0xF7..=0xF9
    /// let pascal: f64 = bmp.read_pressure()?;
    /// assert_eq!(pascal, 100672.46484375);
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn read_pressure(&mut self) -> Result<f64, E> {
        let t_fine: i32 = self.read_t_fine()?;
        let raw: u32 = self.read_raw([reg::PRESS_MSB, reg::PRESS_LSB, reg::PRESS_XLSB])?;
        Ok(self.cal.compensate_pressure(raw, t_fine))
    }

    /// Read a temperature and pressure sample from the BMP280.
    ///
    /// Both values share a single temperature reading.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFA], vec![0x80]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFB], vec![0x00]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xFC], vec![0x00]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF7], vec![0x80]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF8], vec![0x00]),
    /// #   ehm::eh1::i2c::Transaction::write_read(0x76, vec![0xF9], vec![0x00]),
    /// # ]);
    /// # let delay = ehm::eh1::delay::NoopDelay::new();
    /// use bmp280_multibus::{i2c1::Address, Bmp280, Sample, INVALID_PRESSURE};
    ///
    /// let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, delay);
    /// // no calibration loaded yet
    /// let sample: Sample = bmp.sample()?;
    /// assert_eq!(sample.pressure, INVALID_PRESSURE);
    /// # bmp.free().0.free().done();
    /// # Ok::<(), eh1::i2c::ErrorKind>(())
    /// ```
    pub fn sample(&mut self) -> Result<Sample, E> {
        let t_fine: i32 = self.read_t_fine()?;
        let raw: u32 = self.read_raw([reg::PRESS_MSB, reg::PRESS_LSB, reg::PRESS_XLSB])?;
        Ok(Sample {
            temperature: celsius(t_fine),
            pressure: self.cal.compensate_pressure(raw, t_fine),
        })
    }

    fn read_t_fine(&mut self) -> Result<i32, E> {
        let raw: u32 = self.read_raw([reg::TEMP_MSB, reg::TEMP_LSB, reg::TEMP_XLSB])?;
        Ok(self.cal.compensate_temperature(raw))
    }

    // msb [7:0] = x[19:12]
    // lsb [7:0] = x[11:4]
    // xlsb[7:4] = x[3:0]
    fn read_raw(&mut self, regs: [u8; 3]) -> Result<u32, E> {
        let msb: u8 = self.bus.read_byte(regs[0])?;
        let lsb: u8 = self.bus.read_byte(regs[1])?;
        let xlsb: u8 = self.bus.read_byte(regs[2])?;
        Ok((u32::from(msb) << 12) | (u32::from(lsb) << 4) | (u32::from(xlsb) >> 4))
    }

    fn write_settled(&mut self, reg: u8, data: u8) -> Result<(), E> {
        self.bus.write_reg(reg, data)?;
        self.delay.delay_ms(SETTLE_DELAY_MS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_error_converts() {
        fn chip_id(ok: bool) -> Result<u8, u8> {
            if ok {
                Ok(CHIP_ID)
            } else {
                Err(7)
            }
        }
        fn id() -> Result<u8, Error<u8>> {
            Ok(chip_id(false)?)
        }
        assert_eq!(chip_id(true), Ok(CHIP_ID));
        assert_eq!(id(), Err(Error::Bus(7)));
    }

    #[test]
    fn datasheet_temperature() {
        let t_fine: i32 = Calibration::DATASHEET.compensate_temperature(519888);
        assert_eq!(t_fine, 128422);
        assert_eq!(celsius(t_fine), 25.08);
    }

    #[test]
    fn datasheet_pressure() {
        let t_fine: i32 = Calibration::DATASHEET.compensate_temperature(519888);
        let pressure: f64 = Calibration::DATASHEET.compensate_pressure(415148, t_fine);
        // the datasheet prints 100653.27 Pa, but its own constants and
        // formula give this value
        assert_eq!(pressure, 100672.46484375);
    }

    #[test]
    fn degenerate_calibration() {
        let cal = Calibration {
            p1: 0,
            ..Calibration::DATASHEET
        };
        assert_eq!(cal.compensate_pressure(415148, 128422), INVALID_PRESSURE);
        assert_eq!(
            Calibration::default().compensate_pressure(0xFFFFF, 0),
            INVALID_PRESSURE
        );
    }

    #[test]
    fn temperature_overflow_wraps() {
        let cal = Calibration {
            t1: 0,
            t2: i16::MAX,
            t3: i16::MAX,
            ..Calibration::default()
        };
        // (0xFFFFF >> 3) * 32767 does not fit in 32 bits
        let t_fine: i32 = cal.compensate_temperature(0xFFFFF);
        let var1: i32 = ((0xFFFFFi64 >> 3) * 32767) as i32 >> 11;
        let var2: i32 = ((((0xFFFFFi64 >> 4).pow(2)) as i32 >> 12).wrapping_mul(32767)) >> 14;
        assert_eq!(t_fine, var1.wrapping_add(var2));
    }

    #[test]
    fn celsius_rounding() {
        assert_eq!(celsius(-128422), -25.08);
        assert_eq!(celsius(51), 0.01);
        assert_eq!(celsius(25), 0.0);
    }

    #[test]
    fn index_tables() {
        for (idx, os) in Oversampling::TABLE.iter().enumerate() {
            assert_eq!(*os as usize, idx);
        }
        for (idx, standby) in Standby::TABLE.iter().enumerate() {
            assert_eq!(*standby as usize, idx);
        }
        for (idx, filter) in Filter::TABLE.iter().enumerate() {
            assert_eq!(*filter as usize, idx);
        }
        assert_eq!(Mode::TABLE.map(u8::from), [0b00, 0b01, 0b11]);
    }

    #[test]
    fn from_indices_bounds() {
        for p in 0..6 {
            for t in 0..6 {
                for m in 0..3 {
                    for s in 0..8 {
                        for f in 0..5 {
                            assert!(Settings::from_indices(p, t, m, s, f).is_ok());
                        }
                    }
                }
            }
        }
        assert_eq!(
            Settings::from_indices(6, 0, 0, 0, 0),
            Err(Setting::PressureOversampling)
        );
        assert_eq!(
            Settings::from_indices(0, 6, 0, 0, 0),
            Err(Setting::TemperatureOversampling)
        );
        assert_eq!(Settings::from_indices(0, 0, 3, 0, 0), Err(Setting::Mode));
        assert_eq!(Settings::from_indices(0, 0, 0, 8, 0), Err(Setting::Standby));
        assert_eq!(Settings::from_indices(0, 0, 0, 0, 5), Err(Setting::Filter));
        assert_eq!(
            Settings::from_indices(usize::MAX, 0, 0, 0, usize::MAX),
            Err(Setting::PressureOversampling)
        );
    }

    #[test]
    fn initial_settings_encoding() {
        assert_eq!(Settings::from_indices(1, 1, 2, 0, 0), Ok(Settings::INITIAL));
        assert_eq!(Settings::INITIAL.ctrl_meas.0, 0x27);
        assert_eq!(Settings::INITIAL.config.0, 0x00);
    }
}
