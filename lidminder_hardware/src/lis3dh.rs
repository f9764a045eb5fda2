use rppal::i2c::I2c;
use tracing::trace;

use crate::error::{HwError, Result};
use lidminder_traits::{Accelerometer, OrientationSample};

const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL1: u8 = 0x20;
const REG_CTRL4: u8 = 0x23;
const REG_OUT_X_L: u8 = 0x28;
/// Set on the register address to auto-increment during burst reads.
const AUTO_INCREMENT: u8 = 0x80;

const WHO_AM_I: u8 = 0x33;
/// 100 Hz, all axes enabled.
const CTRL1_100HZ_XYZ: u8 = 0x57;
/// High-resolution mode, ±2 g full scale.
const CTRL4_HR_2G: u8 = 0x08;

/// m/s² per digit in high-resolution ±2 g mode (12-bit, 1 mg/digit).
const MS2_PER_DIGIT: f32 = 9.80665 / 1024.0;

/// LIS3DH 3-axis accelerometer on I²C.
pub struct Lis3dh {
    i2c: I2c,
}

impl Lis3dh {
    pub fn new(bus: u8, addr: u8) -> Result<Self> {
        let mut i2c = I2c::with_bus(bus).map_err(i2c_err)?;
        i2c.set_slave_address(u16::from(addr)).map_err(i2c_err)?;

        let mut id = [0u8; 1];
        i2c.write_read(&[REG_WHO_AM_I], &mut id).map_err(i2c_err)?;
        if id[0] != WHO_AM_I {
            return Err(HwError::UnexpectedDevice(id[0]));
        }

        i2c.write(&[REG_CTRL1, CTRL1_100HZ_XYZ]).map_err(i2c_err)?;
        i2c.write(&[REG_CTRL4, CTRL4_HR_2G]).map_err(i2c_err)?;
        Ok(Self { i2c })
    }

    fn read_raw(&mut self) -> Result<(i16, i16, i16)> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(&[REG_OUT_X_L | AUTO_INCREMENT], &mut buf)
            .map_err(i2c_err)?;
        // Left-justified 12-bit two's complement in each 16-bit pair.
        let x = i16::from_le_bytes([buf[0], buf[1]]) >> 4;
        let y = i16::from_le_bytes([buf[2], buf[3]]) >> 4;
        let z = i16::from_le_bytes([buf[4], buf[5]]) >> 4;
        trace!(x, y, z, "lis3dh raw read");
        Ok((x, y, z))
    }
}

fn i2c_err(e: rppal::i2c::Error) -> HwError {
    HwError::I2c(e.to_string())
}

impl Accelerometer for Lis3dh {
    fn sample(
        &mut self,
    ) -> std::result::Result<OrientationSample, Box<dyn std::error::Error + Send + Sync>> {
        let (x, y, z) = self.read_raw()?;
        Ok(OrientationSample::new(
            f32::from(x) * MS2_PER_DIGIT,
            f32::from(y) * MS2_PER_DIGIT,
            f32::from(z) * MS2_PER_DIGIT,
        ))
    }
}
