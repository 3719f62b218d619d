pub use crate::i2c1::Address;

use eh0::blocking::i2c::{Write, WriteRead};

/// BMP280 bus over an embedded-hal 0.2 I2C peripheral.
///
/// Each register access is one blocking transfer: a `write_read` for reads
/// and a two byte `write` for writes.
#[derive(Debug)]
pub struct Bmp280Bus<I2C> {
    i2c: I2C,
    address: Address,
}

impl<I2C, E> Bmp280Bus<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    /// Wrap an I2C peripheral for the BMP280 at `address`.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh0::i2c::Mock::new(&[
    /// #   ehm::eh0::i2c::Transaction::write_read(0x76, vec![0xD0], vec![0x58]),
    /// # ]);
    /// use bmp280_multibus::{i2c0::{Address, Bmp280Bus}, Bmp280Bus as _, CHIP_ID};
    ///
    /// let mut bmp: Bmp280Bus<_> = Bmp280Bus::new(i2c, Address::SdoGnd);
    /// assert_eq!(bmp.read_byte(0xD0)?, CHIP_ID);
    /// let mut i2c = bmp.free();
    /// # i2c.done();
    /// # Ok::<(), ehm::eh0::MockError>(())
    /// ```
    #[inline]
    pub fn new(i2c: I2C, address: Address) -> Self {
        Self { i2c, address }
    }

    /// Release the I2C peripheral.
    #[inline]
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> crate::Bmp280Bus for Bmp280Bus<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = E;

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address.into(), &[reg], buf)
    }

    fn write_reg(&mut self, reg: u8, data: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address.into(), &[reg, data])
    }
}
