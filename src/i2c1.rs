/// I2C device address, selected by the SDO pin.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Address {
    /// SDO tied to GND.
    SdoGnd = 0x76,
    /// SDO tied to V<sub>DDIO</sub>.
    SdoVddio = 0x77,
}

impl From<Address> for u8 {
    #[inline]
    fn from(address: Address) -> Self {
        address as u8
    }
}

/// BMP280 bus over an embedded-hal 1 I2C peripheral.
#[derive(Debug)]
pub struct Bmp280Bus<I2C> {
    i2c: I2C,
    address: Address,
}

impl<I2C, E> Bmp280Bus<I2C>
where
    I2C: eh1::i2c::I2c<Error = E>,
{
    /// Wrap an I2C peripheral for the BMP280 at `address`.
    ///
    /// # Example
    ///
    /// ```
    /// # let i2c = ehm::eh1::i2c::Mock::new(&[]);
    /// use bmp280_multibus::i2c1::{Address, Bmp280Bus};
    ///
    /// let bmp: Bmp280Bus<_> = Bmp280Bus::new(i2c, Address::SdoVddio);
    /// assert_eq!(bmp.address(), Address::SdoVddio);
    /// # bmp.free().done();
    /// ```
    #[inline]
    pub fn new(i2c: I2C, address: Address) -> Self {
        Self { i2c, address }
    }

    /// Device address this bus talks to.
    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Release the I2C peripheral.
    #[inline]
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> crate::Bmp280Bus for Bmp280Bus<I2C>
where
    I2C: eh1::i2c::I2c<Error = E>,
{
    type Error = E;

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address.into(), &[reg], buf)
    }

    fn write_reg(&mut self, reg: u8, data: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address.into(), &[reg, data])
    }
}
