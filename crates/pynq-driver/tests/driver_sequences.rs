//! Driver command sequence tests
//!
//! Every driver runs against the software mailbox; the recorded program,
//! pin writes and opcodes are checked against what each co-processor
//! program expects.

use pynq_chip::codec::{encode_float, encode_int};
use pynq_driver::drivers::DEFAULT_MOTOR_PINS;
use pynq_driver::prelude::*;
use pynq_driver::{
    Brightness, Direction, Gesture, GestureSensor, GroveAutoAlarm, GroveGesGame, GroveImu,
    GroveMulti, GrovePCounter, GrovePSensor, GroveUsRanger, LineReading, LineTracker, RunUsRanger,
    CONFIG_IOP_SWITCH,
};

const IMU_SAMPLE: [f32; 11] = [
    0.0, 0.0, 16384.0, 0.0, 131.072, 0.0, 4096.0, 0.0, 0.0, 23.5, 101_325.0,
];

#[test]
fn imu_loads_program_without_pins() {
    let mailbox = SoftwareMailbox::default().with_float_response(0x3, &IMU_SAMPLE);
    let mut imu = GroveImu::new(mailbox, GroveGroup::I2c).expect("IMU init");

    let sample = imu.get_data().expect("IMU sample");
    assert_eq!(sample.accel, [0.0, 0.0, 1.0]);
    assert!((sample.gyro[1] - 1.0).abs() < 1e-6);
    assert_eq!(sample.compass, [1200.0, 0.0, 0.0]);
    assert_eq!(sample.temperature, 23.5);
    assert!(imu.heading().expect("heading").abs() < 1e-9);
    assert!((imu.atm().expect("atm") - 1.0).abs() < 1e-9);

    let mailbox = imu.into_inner();
    assert_eq!(mailbox.program(), Some("grove_imu.bin"));
    assert!(mailbox.writes().is_empty());
    assert_eq!(mailbox.commands(), &[CONFIG_IOP_SWITCH, 0x3, 0x3, 0x3]);
}

#[test]
fn imu_rejects_digital_connector() {
    let err = GroveImu::new(SoftwareMailbox::default(), GroveGroup::G3).unwrap_err();
    assert!(matches!(err, PynqError::InvalidPin { .. }));
}

#[test]
fn imu_through_boxed_mailbox() {
    let boxed: Box<dyn Mailbox> =
        Box::new(SoftwareMailbox::default().with_float_response(0x3, &IMU_SAMPLE));
    let mut imu = GroveImu::new(boxed, GroveGroup::I2c).expect("IMU init");
    assert_eq!(imu.get_data().expect("sample").pressure, 101_325.0);
}

#[test]
fn multisensor_scaling() {
    let mailbox = SoftwareMailbox::default()
        .with_float_response(0x3, &IMU_SAMPLE)
        .with_float_response(0x5, &[24.0, 55.0])
        .with_float_response(0x7, &[1.65]);
    let mut multi = GroveMulti::new(mailbox, GroveGroup::I2c, GroveGroup::G2, AnalogChannel::A0)
        .expect("multisensor init");

    let dht = multi.dht_data().expect("DHT");
    assert_eq!(dht.temperature, 24.0);
    assert_eq!(dht.humidity, 55.0);
    assert!((multi.light_lux().expect("light") - 175.0).abs() < 1e-4);
    assert!(multi.altitude().expect("altitude").abs() < 1e-6);

    let mailbox = multi.into_inner();
    assert_eq!(mailbox.program(), Some("arduino_grove_multisensor.bin"));
    assert_eq!(mailbox.writes()[0], (0, vec![2, 0]));
}

#[test]
fn multisensor_connector_checks() {
    let err = GroveMulti::new(
        SoftwareMailbox::default(),
        GroveGroup::G1,
        GroveGroup::G2,
        AnalogChannel::A0,
    )
    .unwrap_err();
    assert!(matches!(err, PynqError::InvalidPin { .. }));

    let err = GroveMulti::new(
        SoftwareMailbox::default(),
        GroveGroup::I2c,
        GroveGroup::I2c,
        AnalogChannel::A0,
    )
    .unwrap_err();
    assert!(matches!(err, PynqError::InvalidPin { peripheral: "DHT11", .. }));
}

#[test]
fn ranger_converts_cycles_with_board_clock() {
    let mailbox = SoftwareMailbox::default().with_response(0x3, &[1_160_000]);
    let mut ranger =
        GroveUsRanger::new(mailbox, GroveGroup::G1, BoardConfig::default()).expect("ranger init");
    assert!((ranger.distance_cm().expect("distance") - 200.0).abs() < 1e-6);

    let mailbox = ranger.into_inner();
    assert_eq!(mailbox.writes()[0], (0, vec![0, 1]));
    assert_eq!(mailbox.commands(), &[CONFIG_IOP_SWITCH, 0x3]);
}

#[test]
fn ranger_on_slower_clock() {
    // 50 MHz: 20 ns per cycle, so half the cycles give the same distance
    let config = BoardConfig::default().with_fclk0_mhz(50.0);
    let mailbox = SoftwareMailbox::default().with_response(0x3, &[580_000]);
    let mut ranger = GroveUsRanger::new(mailbox, GroveGroup::G6, config).expect("ranger init");
    assert!((ranger.distance_cm().expect("distance") - 200.0).abs() < 1e-6);
}

#[test]
fn ranger_out_of_range() {
    let mailbox = SoftwareMailbox::default().with_response(0x3, &[u32::MAX]);
    let mut ranger =
        GroveUsRanger::new(mailbox, GroveGroup::G1, BoardConfig::default()).expect("ranger init");
    assert_eq!(
        ranger.distance_cm().expect("distance"),
        pynq_driver::drivers::OUT_OF_RANGE_CM
    );
}

#[test]
fn autoalarm_writes_both_pin_pairs() {
    let mailbox = SoftwareMailbox::default();
    let mut alarm = GroveAutoAlarm::new(
        mailbox,
        GroveGroup::G1,
        GroveGroup::G4,
        BoardConfig::default(),
    )
    .expect("alarm init");
    alarm.write_binary(0b11_1111_1111).expect("leds");

    let mailbox = alarm.into_inner();
    assert_eq!(mailbox.program(), Some("arduino_grove_autoalarm.bin"));
    assert_eq!(mailbox.writes()[0], (0, vec![0, 1, 6, 7]));
    assert_eq!(mailbox.writes()[1], (0, vec![0x3FF]));
    assert_eq!(mailbox.commands(), &[CONFIG_IOP_SWITCH, 0x5]);
}

#[test]
fn pcounter_sequence() {
    let mailbox = SoftwareMailbox::default()
        .with_response(0xB, &[0b10_0000_0001])
        .with_response(0xD, &[1]);
    let mut counter =
        GrovePCounter::new(mailbox, GroveGroup::G4, GroveGroup::G3).expect("counter init");

    counter.reset().expect("reset");
    counter.write_level(5, 3, true).expect("level");
    counter
        .write_brightness(0x3FF, [Brightness::High; 10])
        .expect("brightness");
    assert_eq!(counter.read().expect("read"), "1000000001");
    assert!(counter.read_pir().expect("pir"));

    let mailbox = counter.into_inner();
    assert_eq!(mailbox.writes()[0], (0, vec![6, 3]));
    assert_eq!(mailbox.writes()[1], (0, vec![5, 3, 1]));
    assert_eq!(mailbox.writes()[2].1.len(), 11);
    assert_eq!(mailbox.writes()[2].1[1], 0xFF);
    assert_eq!(mailbox.commands(), &[CONFIG_IOP_SWITCH, 0x3, 0x9, 0x7, 0xB, 0xD]);
}

#[test]
fn pcounter_level_validation() {
    let mut counter = GrovePCounter::new(SoftwareMailbox::default(), GroveGroup::G4, GroveGroup::G3)
        .expect("counter init");
    assert!(matches!(
        counter.write_level(11, 0, false),
        Err(PynqError::InvalidArgument { .. })
    ));
    assert!(matches!(
        counter.write_level(4, 4, false),
        Err(PynqError::InvalidArgument { .. })
    ));
    assert_eq!(counter.into_inner().commands(), &[CONFIG_IOP_SWITCH]);
}

#[test]
fn psensor_relay_and_timeout() {
    let mailbox = SoftwareMailbox::default()
        .with_stalled(0x3)
        .with_response(0x5, &[0]);
    let mut psensor =
        GrovePSensor::new(mailbox, GroveGroup::G1, GroveGroup::G7).expect("psensor init");

    psensor.write_relay(true).expect("relay");
    let err = psensor.read_pir().unwrap_err();
    assert!(matches!(
        err,
        PynqError::Timeout {
            opcode: 0x3,
            duration_ms: 1000
        }
    ));

    let mailbox = psensor.into_inner();
    assert_eq!(mailbox.writes()[0], (0, vec![0, 12]));
    assert_eq!(mailbox.writes()[1], (0, vec![1]));
}

#[test]
fn missing_program_is_reported() {
    let mailbox = SoftwareMailbox::default().with_missing_program("arduino_grove_psensor.bin");
    let err = GrovePSensor::new(mailbox, GroveGroup::G1, GroveGroup::G2).unwrap_err();
    assert!(matches!(err, PynqError::ProgramLoad { .. }));
}

#[test]
fn gesture_game() {
    let mailbox = SoftwareMailbox::default().with_response(0x3, &[7]);
    let mut game = GroveGesGame::new(mailbox, GroveGroup::G4).expect("game init");
    assert_eq!(game.gesture().expect("gesture"), Some(Gesture::Clockwise));
    game.write_binary(1).expect("leds");

    let mailbox = game.into_inner();
    assert_eq!(mailbox.writes()[0], (0, vec![6, 7]));
    assert_eq!(mailbox.commands(), &[CONFIG_IOP_SWITCH, 0x3, 0x5]);
}

#[test]
fn gesture_game_unknown_code() {
    let mailbox = SoftwareMailbox::default().with_response(0x3, &[42]);
    let mut game = GroveGesGame::new(mailbox, GroveGroup::G4).expect("game init");
    assert_eq!(game.gesture().expect("gesture"), None);
}

#[test]
fn gesture_sensor_init_flags() {
    let ready = SoftwareMailbox::default()
        .with_response(CONFIG_IOP_SWITCH, &[1, 1])
        .with_response(0x3, &[1, 9]);
    let mut sensor = GestureSensor::new(ready).expect("sensor init");
    assert_eq!(sensor.read_gesture().expect("gesture"), Some(Gesture::Wave));

    let chip_down = SoftwareMailbox::default().with_response(CONFIG_IOP_SWITCH, &[0, 1]);
    match GestureSensor::new(chip_down) {
        Err(PynqError::InitFailed { reason }) => assert!(reason.contains("chip")),
        other => panic!("expected InitFailed, got {other:?}"),
    }

    let engine_down = SoftwareMailbox::default().with_response(CONFIG_IOP_SWITCH, &[1, 0]);
    match GestureSensor::new(engine_down) {
        Err(PynqError::InitFailed { reason }) => assert!(reason.contains("gesture sensor")),
        other => panic!("expected InitFailed, got {other:?}"),
    }
}

#[test]
fn gesture_sensor_invalid_reading() {
    let mailbox = SoftwareMailbox::default()
        .with_response(CONFIG_IOP_SWITCH, &[1, 1])
        .with_response(0x3, &[0, 4]);
    let mut sensor = GestureSensor::new(mailbox).expect("sensor init");
    assert_eq!(sensor.read_gesture().expect("gesture"), None);
}

#[test]
fn linetracker_decodes_mixed_words() {
    let words = [
        encode_int(1),
        encode_int(0),
        encode_float(2.5),
        encode_float(0.25),
    ];
    let mailbox = SoftwareMailbox::default().with_response(0x3, &words);
    let mut tracker = LineTracker::with_default_channels(mailbox).expect("tracker init");

    assert_eq!(
        tracker.read().expect("read"),
        LineReading {
            digital_left: 1,
            digital_right: 0,
            analog_left: 2.5,
            analog_right: 0.25,
        }
    );
    assert_eq!(tracker.into_inner().writes()[0], (0, vec![3, 2]));
}

#[test]
fn motor_car_sequence() {
    let mailbox = SoftwareMailbox::default().with_response(0x7, &[10, 20, 30, 40]);
    let mut car = RunUsRanger::new(mailbox, &DEFAULT_MOTOR_PINS).expect("car init");

    car.move_to(Direction::RotateLeft, 50).expect("move");
    assert_eq!(car.velocity().expect("velocity"), 25.0);
    car.pwm_control_default().expect("pwm");
    car.stop().expect("stop");

    let mailbox = car.into_inner();
    assert_eq!(mailbox.program(), Some("arduino_run_usranger.bin"));
    assert_eq!(mailbox.writes()[0], (0, DEFAULT_MOTOR_PINS.to_vec()));
    assert_eq!(mailbox.writes()[1], (0, vec![4, 50]));
    assert_eq!(mailbox.commands(), &[CONFIG_IOP_SWITCH, 0x5, 0x7, 0x9, 0x3]);
}

#[test]
fn motor_car_validation() {
    let err = RunUsRanger::new(SoftwareMailbox::default(), &DEFAULT_MOTOR_PINS[..11]).unwrap_err();
    assert!(matches!(err, PynqError::InvalidPin { .. }));

    let mut pins = DEFAULT_MOTOR_PINS;
    pins[3] = 22;
    let err = RunUsRanger::new(SoftwareMailbox::default(), &pins).unwrap_err();
    assert!(matches!(err, PynqError::InvalidPin { .. }));

    let mut car = RunUsRanger::new(SoftwareMailbox::default(), &DEFAULT_MOTOR_PINS).expect("car");
    assert!(matches!(
        car.move_to(Direction::Forward, 101),
        Err(PynqError::InvalidArgument { .. })
    ));
    assert!(matches!(
        car.pwm_control(0, 10, 11),
        Err(PynqError::InvalidArgument { .. })
    ));
    assert_eq!(car.into_inner().commands(), &[CONFIG_IOP_SWITCH]);
}

#[test]
fn mailbox_bounds_from_config() {
    let config = BoardConfig::default().with_mailbox_words(4);
    let mailbox = SoftwareMailbox::from_config(&config).with_float_response(0x3, &IMU_SAMPLE);
    let mut imu = GroveImu::new(mailbox, GroveGroup::I2c).expect("IMU init");
    assert!(matches!(
        imu.get_data(),
        Err(PynqError::OutOfBounds { limit: 4, .. })
    ));
}

/// Transport that accepts everything but never returns any words.
#[derive(Debug, Default)]
struct EmptyReadMailbox;

impl Mailbox for EmptyReadMailbox {
    fn load_program(&mut self, _program: &str) -> Result<()> {
        Ok(())
    }

    fn write_mailbox(&mut self, _offset: usize, _words: &[u32]) -> Result<()> {
        Ok(())
    }

    fn read_mailbox(&mut self, _offset: usize, _count: usize) -> Result<Vec<u32>> {
        Ok(Vec::new())
    }

    fn write_blocking_command(&mut self, _opcode: u32) -> Result<()> {
        Ok(())
    }
}

#[test]
fn empty_single_word_read_is_an_error() {
    let mut ranger = GroveUsRanger::new(EmptyReadMailbox, GroveGroup::G1, BoardConfig::default())
        .expect("ranger init");
    assert!(matches!(
        ranger.distance_cm(),
        Err(PynqError::OutOfRange { .. })
    ));

    let mut psensor =
        GrovePSensor::new(EmptyReadMailbox, GroveGroup::G1, GroveGroup::G2).expect("psensor init");
    assert!(matches!(psensor.read_pir(), Err(PynqError::OutOfRange { .. })));

    let mut counter = GrovePCounter::new(EmptyReadMailbox, GroveGroup::G4, GroveGroup::G3)
        .expect("counter init");
    assert!(matches!(counter.read(), Err(PynqError::OutOfRange { .. })));
}
