//! Driver behaviour against an in-memory register file.
//!
//! Bus traffic and delays go to one shared log so their relative order can
//! be checked.

use std::{cell::RefCell, rc::Rc};

use bmp280_multibus::{
    Bmp280, Bmp280Bus, Calibration, Error, Mode, Setting, Settings, INVALID_PRESSURE,
    SETTLE_DELAY_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Read(u8),
    Write(u8, u8),
    DelayNs(u32),
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BusFault;

struct FakeBus {
    regs: [u8; 256],
    log: Log,
    fail_writes: bool,
    fail_reg: Option<u8>,
}

impl FakeBus {
    fn new(log: Log) -> Self {
        let mut regs = [0u8; 256];
        regs[0xD0] = bmp280_multibus::CHIP_ID;
        Self {
            regs,
            log,
            fail_writes: false,
            fail_reg: None,
        }
    }

    fn load(&mut self, cal: &Calibration) {
        let words: [u16; 12] = [
            cal.t1,
            cal.t2 as u16,
            cal.t3 as u16,
            cal.p1,
            cal.p2 as u16,
            cal.p3 as u16,
            cal.p4 as u16,
            cal.p5 as u16,
            cal.p6 as u16,
            cal.p7 as u16,
            cal.p8 as u16,
            cal.p9 as u16,
        ];
        for (n, word) in words.iter().enumerate() {
            let [lo, hi] = word.to_le_bytes();
            self.regs[0x88 + 2 * n] = lo;
            self.regs[0x89 + 2 * n] = hi;
        }
    }

    fn set_raw(&mut self, msb_reg: usize, raw: u32) {
        self.regs[msb_reg] = (raw >> 12) as u8;
        self.regs[msb_reg + 1] = (raw >> 4) as u8;
        self.regs[msb_reg + 2] = (raw << 4) as u8;
    }
}

impl Bmp280Bus for FakeBus {
    type Error = BusFault;

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Read(reg));
        let start: usize = reg.into();
        buf.copy_from_slice(&self.regs[start..start + buf.len()]);
        Ok(())
    }

    fn write_reg(&mut self, reg: u8, data: u8) -> Result<(), Self::Error> {
        if self.fail_writes || self.fail_reg == Some(reg) {
            return Err(BusFault);
        }
        self.log.borrow_mut().push(Event::Write(reg, data));
        self.regs[usize::from(reg)] = data;
        Ok(())
    }
}

struct FakeDelay {
    log: Log,
}

impl eh1::delay::DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ns(us * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms * 1_000_000);
    }
}

const SETTLE: Event = Event::DelayNs(SETTLE_DELAY_MS * 1_000_000);

fn driver() -> (Bmp280<FakeBus, FakeDelay>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut bus = FakeBus::new(log.clone());
    bus.load(&Calibration::DATASHEET);
    bus.set_raw(0xFA, 519888);
    bus.set_raw(0xF7, 415148);
    let delay = FakeDelay { log: log.clone() };
    (Bmp280::new(bus, delay), log)
}

#[test]
fn init_order() {
    let (mut bmp, log) = driver();
    bmp.init().unwrap();

    let mut expected: Vec<Event> = vec![Event::Read(0xD0), Event::Write(0xE0, 0xB6), SETTLE];
    expected.extend((0..12).map(|n| Event::Read(0x88 + 2 * n)));
    expected.extend([
        Event::Write(0xF4, 0x27),
        SETTLE,
        Event::Write(0xF4, 0x24),
        SETTLE,
        Event::Write(0xF5, 0x00),
        SETTLE,
        Event::Write(0xF4, 0x27),
        SETTLE,
    ]);
    assert_eq!(*log.borrow(), expected);
    assert_eq!(*bmp.calibration(), Calibration::DATASHEET);
}

#[test]
fn init_wrong_chip_id() {
    let (bmp, log) = driver();
    let (mut bus, delay) = bmp.free();
    bus.regs[0xD0] = 0x55;
    let mut bmp = Bmp280::new(bus, delay);

    assert_eq!(bmp.init(), Err(Error::DeviceNotFound(0x55)));
    assert_eq!(*bmp.calibration(), Calibration::default());
    assert_eq!(*log.borrow(), vec![Event::Read(0xD0)]);
}

#[test]
fn init_write_failure_propagates() {
    let (bmp, log) = driver();
    let (mut bus, delay) = bmp.free();
    bus.fail_writes = true;
    let mut bmp = Bmp280::new(bus, delay);

    assert_eq!(bmp.init(), Err(Error::Bus(BusFault)));
    // no retry, no settle delay after a failed write
    assert_eq!(*log.borrow(), vec![Event::Read(0xD0)]);
}

#[test]
fn normal_mode_sleeps_around_config_write() {
    let (mut bmp, log) = driver();
    // pressure x16, temperature x2, normal, 125 ms, filter x4
    bmp.configure(5, 2, 2, 2, 2).unwrap();

    let ctrl_meas: u8 = (0b010 << 5) | (0b101 << 2) | 0b11;
    let config: u8 = (0b010 << 5) | (0b010 << 2);
    assert_eq!(
        *log.borrow(),
        vec![
            Event::Write(0xF4, ctrl_meas),
            SETTLE,
            Event::Write(0xF4, ctrl_meas & !0b11),
            SETTLE,
            Event::Write(0xF5, config),
            SETTLE,
            Event::Write(0xF4, ctrl_meas),
            SETTLE,
        ]
    );
    assert_eq!(bmp.active_settings().ctrl_meas.mode(), Mode::Normal);
}

#[test]
fn non_normal_modes_write_twice() {
    for mode in [0, 1] {
        let (mut bmp, log) = driver();
        bmp.configure(1, 1, mode, 7, 4).unwrap();

        let ctrl_meas: u8 = (0b001 << 5) | (0b001 << 2) | u8::from(Mode::TABLE[mode]);
        let config: u8 = (0b111 << 5) | (0b100 << 2);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Write(0xF4, ctrl_meas),
                SETTLE,
                Event::Write(0xF5, config),
                SETTLE,
            ]
        );
    }
}

#[test]
fn invalid_index_writes_nothing() {
    let cases: [([usize; 5], Setting); 5] = [
        ([6, 0, 0, 0, 0], Setting::PressureOversampling),
        ([0, 6, 0, 0, 0], Setting::TemperatureOversampling),
        ([0, 0, 3, 0, 0], Setting::Mode),
        ([0, 0, 0, 8, 0], Setting::Standby),
        ([0, 0, 0, 0, 5], Setting::Filter),
    ];
    for ([p, t, m, s, f], setting) in cases {
        let (mut bmp, log) = driver();
        let before: Settings = bmp.active_settings();
        assert_eq!(
            bmp.configure(p, t, m, s, f),
            Err(Error::InvalidSetting(setting))
        );
        assert!(log.borrow().is_empty());
        assert_eq!(bmp.active_settings(), before);
    }
}

#[test]
fn read_pressure_samples_temperature_first() {
    let (mut bmp, log) = driver();
    bmp.init().unwrap();
    log.borrow_mut().clear();

    assert_eq!(bmp.read_pressure().unwrap(), 25772151.0 / 256.0);
    assert_eq!(
        *log.borrow(),
        vec![
            Event::Read(0xFA),
            Event::Read(0xFB),
            Event::Read(0xFC),
            Event::Read(0xF7),
            Event::Read(0xF8),
            Event::Read(0xF9),
        ]
    );
}

#[test]
fn readings_are_not_cached() {
    let (mut bmp, log) = driver();
    bmp.init().unwrap();
    log.borrow_mut().clear();

    assert_eq!(bmp.read_temperature().unwrap(), 25.08);
    assert_eq!(bmp.read_temperature().unwrap(), 25.08);
    assert_eq!(log.borrow().len(), 6);
}

#[test]
fn pressure_before_init_is_sentinel() {
    let (mut bmp, _log) = driver();
    assert_eq!(bmp.read_pressure().unwrap(), INVALID_PRESSURE);
}

#[test]
fn failed_config_write_keeps_previous_settings() {
    let (bmp, log) = driver();
    let (mut bus, delay) = bmp.free();
    bus.fail_reg = Some(0xF5);
    let mut bmp = Bmp280::new(bus, delay);

    assert_eq!(bmp.configure(1, 1, 2, 0, 0), Err(Error::Bus(BusFault)));
    assert_eq!(bmp.active_settings(), Settings::default());
    assert_eq!(
        *log.borrow(),
        vec![
            Event::Write(0xF4, 0x27),
            SETTLE,
            Event::Write(0xF4, 0x24),
            SETTLE,
        ]
    );
}
