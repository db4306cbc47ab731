use embassy_time::{Duration, Ticker};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::gpio::AnyPin;
use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcConfig, AdcPin, Attenuation},
    delay::Delay,
    gpio::{Flex, Input, InputConfig, Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c},
    peripherals::{ADC1, GPIO4, I2C1, SPI2},
    spi::master::{Config as SpiConfig, Spi},
    time::Rate,
};

use crate::config::{EPAPER_SPI_MHZ, OLED_I2C_KHZ, RelayPolarity};
use crate::model::SignalLevel;
use crate::traits::{MoistureSensor, RelayPin, Scheduler, TelemetrySink};

#[derive(Debug, Clone, Copy)]
pub enum DisplayType {
    EPaper,
    SSD1306,
}

/// Capacitive/resistive probe on ADC1, GPIO4
pub struct SoilSensorHardware<'a> {
    adc: Adc<'a, ADC1<'a>, Blocking>,
    pin: AdcPin<GPIO4<'a>, ADC1<'a>>,
}

impl<'a> SoilSensorHardware<'a> {
    pub fn new(adc_periph: ADC1<'a>, gpio: GPIO4<'a>) -> Self {
        let mut config = AdcConfig::new();
        let pin = config.enable_pin(gpio, Attenuation::_11dB);
        let adc = Adc::new(adc_periph, config);

        Self { adc, pin }
    }
}

impl MoistureSensor for SoilSensorHardware<'_> {
    fn read_raw(&mut self) -> Result<u16, &'static str> {
        nb::block!(self.adc.read_oneshot(&mut self.pin)).map_err(|_| "ADC read failed")
    }
}

/// Pump relay input on a push-pull GPIO.
///
/// The input buffer stays enabled so readback senses the pad, not the output
/// register. A shorted or overloaded line reads back unlike what was driven.
pub struct RelayHardware<'a> {
    pin: Flex<'a>,
}

impl<'a> RelayHardware<'a> {
    /// Configure the pin already at the de-energized level so the pump never blips at boot
    pub fn new<P>(gpio: P, polarity: RelayPolarity) -> Self
    where
        P: Into<AnyPin<'a>>,
    {
        let idle = match polarity {
            RelayPolarity::ActiveLow => Level::High,
            RelayPolarity::ActiveHigh => Level::Low,
        };
        let mut pin = Flex::new(gpio.into());
        pin.set_level(idle);
        pin.apply_output_config(&OutputConfig::default());
        pin.set_output_enable(true);
        pin.set_input_enable(true);

        Self { pin }
    }
}

impl RelayPin for RelayHardware<'_> {
    fn set_level(&mut self, level: SignalLevel) -> Result<(), &'static str> {
        let level = match level {
            SignalLevel::Low => Level::Low,
            SignalLevel::High => Level::High,
        };
        self.pin.set_level(level);
        Ok(())
    }

    fn read_back(&mut self) -> Option<SignalLevel> {
        Some(if self.pin.is_high() {
            SignalLevel::High
        } else {
            SignalLevel::Low
        })
    }
}

/// Telemetry over the esp-println serial console
pub struct SerialTelemetry;

impl TelemetrySink for SerialTelemetry {
    fn write_line(&mut self, line: &str) -> Result<(), &'static str> {
        esp_println::println!("{}", line);
        Ok(())
    }
}

/// Fixed-period cycle source backed by an embassy ticker
pub struct TickerScheduler {
    ticker: Ticker,
}

impl TickerScheduler {
    pub fn every_ms(period_ms: u64) -> Self {
        Self {
            ticker: Ticker::every(Duration::from_millis(period_ms)),
        }
    }
}

impl Scheduler for TickerScheduler {
    async fn next_cycle(&mut self) -> bool {
        self.ticker.next().await;
        true
    }
}

pub struct DisplayHardware<'a> {
    pub spi: ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, Delay>,
    pub busy: Input<'a>,
    pub dc: Output<'a>,
    pub rst: Output<'a>,
    pub delay: Delay,
}

impl<'a> DisplayHardware<'a> {
    pub fn new<CS, MOSI, SCK, DC, RST, BUSY>(
        spi_periph: SPI2<'a>,
        cs_gpio: CS,
        mosi_gpio: MOSI,
        sck_gpio: SCK,
        dc_gpio: DC,
        rst_gpio: RST,
        busy_gpio: BUSY,
    ) -> Result<Self, &'static str>
    where
        CS: Into<AnyPin<'a>>,
        MOSI: Into<AnyPin<'a>>,
        SCK: Into<AnyPin<'a>>,
        DC: Into<AnyPin<'a>>,
        RST: Into<AnyPin<'a>>,
        BUSY: Into<AnyPin<'a>>,
    {
        let delay = Delay::new();
        let delay_for_spi = Delay::new();

        let spi_bus = Spi::new(
            spi_periph,
            SpiConfig::default().with_frequency(Rate::from_mhz(EPAPER_SPI_MHZ)),
        )
        .map_err(|_| "SPI config rejected")?
        .with_sck(sck_gpio.into())
        .with_mosi(mosi_gpio.into());

        let cs = Output::new(cs_gpio.into(), Level::High, OutputConfig::default());
        let dc = Output::new(dc_gpio.into(), Level::Low, OutputConfig::default());
        let rst = Output::new(rst_gpio.into(), Level::High, OutputConfig::default());
        let busy = Input::new(busy_gpio.into(), InputConfig::default());

        let spi =
            ExclusiveDevice::new(spi_bus, cs, delay_for_spi).map_err(|_| "SPI CS setup failed")?;

        Ok(Self {
            spi,
            busy,
            dc,
            rst,
            delay,
        })
    }
}

pub struct SSD1306Hardware<'a> {
    pub i2c: I2c<'a, Blocking>,
    pub delay: Delay,
}

impl<'a> SSD1306Hardware<'a> {
    pub fn new<SDA, SCL>(i2c_periph: I2C1<'a>, sda: SDA, scl: SCL) -> Result<Self, &'static str>
    where
        SDA: Into<AnyPin<'a>>,
        SCL: Into<AnyPin<'a>>,
    {
        let i2c = I2c::new(
            i2c_periph,
            I2cConfig::default().with_frequency(Rate::from_khz(OLED_I2C_KHZ)),
        )
        .map_err(|_| "I2C config rejected")?
        .with_sda(sda.into())
        .with_scl(scl.into());

        let delay = Delay::new();

        Ok(Self { i2c, delay })
    }
}
