use bmp280_multibus::{i2c1::Address, Bmp280, Calibration, Error, Sample, CHIP_ID};
use ehm::eh1::{
    delay::NoopDelay,
    i2c::{Mock, Transaction},
};

const ADDR: u8 = 0x76;

fn calibration_txn(cal: &Calibration) -> Vec<Transaction> {
    [
        (0x88, cal.t1),
        (0x8A, cal.t2 as u16),
        (0x8C, cal.t3 as u16),
        (0x8E, cal.p1),
        (0x90, cal.p2 as u16),
        (0x92, cal.p3 as u16),
        (0x94, cal.p4 as u16),
        (0x96, cal.p5 as u16),
        (0x98, cal.p6 as u16),
        (0x9A, cal.p7 as u16),
        (0x9C, cal.p8 as u16),
        (0x9E, cal.p9 as u16),
    ]
    .into_iter()
    .map(|(reg, word): (u8, u16)| {
        Transaction::write_read(ADDR, vec![reg], word.to_le_bytes().to_vec())
    })
    .collect()
}

fn init_txn() -> Vec<Transaction> {
    let mut txn: Vec<Transaction> = vec![
        Transaction::write_read(ADDR, vec![0xD0], vec![CHIP_ID]),
        Transaction::write(ADDR, vec![0xE0, 0xB6]),
    ];
    txn.extend(calibration_txn(&Calibration::DATASHEET));
    txn.extend([
        Transaction::write(ADDR, vec![0xF4, 0b001_001_11]),
        Transaction::write(ADDR, vec![0xF4, 0b001_001_00]),
        Transaction::write(ADDR, vec![0xF5, 0x00]),
        Transaction::write(ADDR, vec![0xF4, 0b001_001_11]),
    ]);
    txn
}

fn temperature_txn() -> [Transaction; 3] {
    // 519888
    [
        Transaction::write_read(ADDR, vec![0xFA], vec![0x7E]),
        Transaction::write_read(ADDR, vec![0xFB], vec![0xED]),
        Transaction::write_read(ADDR, vec![0xFC], vec![0x00]),
    ]
}

fn pressure_txn() -> [Transaction; 3] {
    // 415148
    [
        Transaction::write_read(ADDR, vec![0xF7], vec![0x65]),
        Transaction::write_read(ADDR, vec![0xF8], vec![0x5A]),
        Transaction::write_read(ADDR, vec![0xF9], vec![0xC0]),
    ]
}

#[test]
fn i2c1_init() {
    let i2c = Mock::new(&init_txn());

    let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, NoopDelay::new());
    bmp.init().unwrap();
    assert_eq!(*bmp.calibration(), Calibration::DATASHEET);
    assert_eq!(
        bmp.active_settings(),
        bmp280_multibus::Settings::INITIAL
    );
    bmp.free().0.free().done();
}

#[test]
fn i2c1_wrong_chip_id() {
    let i2c = Mock::new(&[Transaction::write_read(ADDR, vec![0xD0], vec![0x60])]);

    let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, NoopDelay::new());
    assert_eq!(bmp.init(), Err(Error::DeviceNotFound(0x60)));
    assert_eq!(*bmp.calibration(), Calibration::default());
    bmp.free().0.free().done();
}

#[test]
fn i2c1_sample() {
    let mut txn: Vec<Transaction> = init_txn();
    txn.extend(temperature_txn());
    txn.extend(pressure_txn());
    let i2c = Mock::new(&txn);

    let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, NoopDelay::new());
    bmp.init().unwrap();
    let sample: Sample = bmp.sample().unwrap();
    assert_eq!(
        sample,
        Sample {
            temperature: 25.08,
            pressure: 25772151.0 / 256.0,
        }
    );
    bmp.free().0.free().done();
}

#[test]
fn i2c1_read_pressure_reads_temperature_first() {
    let mut txn: Vec<Transaction> = init_txn();
    txn.extend(temperature_txn());
    txn.extend(pressure_txn());
    txn.extend(temperature_txn());
    let i2c = Mock::new(&txn);

    let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, NoopDelay::new());
    bmp.init().unwrap();
    assert_eq!(bmp.read_pressure().unwrap(), 100672.46484375);
    assert_eq!(bmp.read_temperature().unwrap(), 25.08);
    bmp.free().0.free().done();
}

#[test]
fn i2c1_bus_error() {
    let i2c = Mock::new(&[
        Transaction::write_read(ADDR, vec![0xD0], vec![CHIP_ID]),
        Transaction::write(ADDR, vec![0xE0, 0xB6]).with_error(eh1::i2c::ErrorKind::Other),
    ]);

    let mut bmp: Bmp280<_, _> = Bmp280::from_i2c1(i2c, Address::SdoGnd, NoopDelay::new());
    assert!(matches!(bmp.init(), Err(Error::Bus(_))));
    assert_eq!(*bmp.calibration(), Calibration::default());
    bmp.free().0.free().done();
}
