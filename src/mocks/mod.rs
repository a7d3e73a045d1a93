pub mod mock_gpio;
pub mod mock_i2c;
