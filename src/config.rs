// ** CALIBRATION CONFIGURATION ** //

// Magnetometer calibration offsets (hard iron correction)
// Obtained from the `calibrate` tool: rotate board 360° and record min/max X,Y values
pub const X_OFFSET: f64 = -2776.0; // (X_min + X_max) / 2
pub const Y_OFFSET: f64 = 2556.0; // (Y_min + Y_max) / 2
pub const HEADING_OFFSET: f64 = 88.0; // Overall heading correction for this board mounting

/// I2C address of the LIS3MDL magnetometer.
pub const MAGNETOMETER_I2C_ADDR: u16 = 0x1C;

// ** GPIO CONFIGURATION ** //
/// Toggle switch that turns the flashlight on (active low, pull-up).
pub const GPIO_TORCH_SWITCH: u8 = 23;
/// Output driving the torch LED.
pub const GPIO_TORCH_LED: u8 = 24;

// ** TARGET STORE CONFIGURATION ** //
pub const TARGET_LATITUDE_KEY: &str = "latitude";
pub const TARGET_LONGITUDE_KEY: &str = "longitude";
/// Default target is the North Pole (lat: 90, long: 0).
pub const DEFAULT_TARGET_LATITUDE: f64 = 90.0;
pub const DEFAULT_TARGET_LONGITUDE: f64 = 0.0;
pub const DEFAULT_STORE_PATH: &str = "compass-target.json";

// ** DISPLAY CONFIGURATION ** //
/// Coordinate readouts keep at most this many characters of the number.
pub const COORDINATE_LABEL_CHARS: usize = 9;

// ** MAIN CONFIGURATION ** //
pub const DEFAULT_GPS_DEVICE: &str = "/dev/serial0";
pub const COMPASS_POLL_INTERVAL_MS: u64 = 100;
/// Switch debounce / event wait per loop iteration.
pub const LOOP_INTERVAL_MS: u64 = 20;
pub const STATUS_UPDATE_INTERVAL_SECS: u64 = 5;
