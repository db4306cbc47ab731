#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;

use farmtech_irrigation::{
    config::SystemConfig,
    display::{EpaperPanel, OledPanel},
    hardware::{
        self, DisplayType, RelayHardware, SerialTelemetry, SoilSensorHardware, TickerScheduler,
    },
    logic::{self, IrrigationSystem},
    traits::{Display, MoistureSensor, RelayPin},
};

// Choose your display type here
// DisplayType::EPaper - Uses SPI on GPIO10(CS), GPIO11(MOSI), GPIO12(SCK), GPIO13(DC), GPIO14(RST), GPIO15(BUSY)
// DisplayType::SSD1306 - Uses I2C on GPIO2(SDA), GPIO1(SCL), address 0x3C
const DISPLAY_TYPE: DisplayType = DisplayType::SSD1306; // or DisplayType::EPaper

const CONFIG: SystemConfig = SystemConfig::DEFAULT;

esp_bootloader_esp_idf::esp_app_desc!();

async fn control_loop<S, R, D>(sensor: S, relay: R, display: D)
where
    S: MoistureSensor,
    R: RelayPin,
    D: Display,
{
    let mut system = IrrigationSystem::new(&CONFIG, sensor, relay, display, SerialTelemetry);
    system.boot();
    Timer::after(Duration::from_millis(CONFIG.splash_ms)).await;

    let mut scheduler = TickerScheduler::every_ms(CONFIG.cycle_period_ms);
    logic::run(&mut system, &mut scheduler).await;

    // The ticker never ends the loop
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_println::println!("=== FarmTech Irrigation ===");

    if let Err(e) = CONFIG.validate() {
        esp_println::println!("[ERROR] Invalid configuration: {}", e);
        loop {
            Timer::after(Duration::from_secs(1)).await;
        }
    }

    // Initialize RTOS timer for embassy
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Relay on GPIO5, moisture probe on GPIO4 (ADC1).
    // Relay first so the pump is held off while the rest comes up
    let relay = RelayHardware::new(peripherals.GPIO5, CONFIG.relay_polarity);
    let sensor = SoilSensorHardware::new(peripherals.ADC1, peripherals.GPIO4);

    match DISPLAY_TYPE {
        DisplayType::EPaper => {
            let panel = hardware::DisplayHardware::new(
                peripherals.SPI2,
                peripherals.GPIO10,
                peripherals.GPIO11,
                peripherals.GPIO12,
                peripherals.GPIO13,
                peripherals.GPIO14,
                peripherals.GPIO15,
            )
            .and_then(EpaperPanel::new);

            match panel {
                Ok(panel) => control_loop(sensor, relay, panel).await,
                Err(e) => {
                    esp_println::println!("[ERROR] e-Paper unavailable: {}", e);
                    control_loop(sensor, relay, NoDisplay).await
                }
            }
        }
        DisplayType::SSD1306 => {
            match hardware::SSD1306Hardware::new(
                peripherals.I2C1,
                peripherals.GPIO2,
                peripherals.GPIO1,
            ) {
                Ok(hw) => control_loop(sensor, relay, OledPanel::new(hw)).await,
                Err(e) => {
                    esp_println::println!("[ERROR] OLED unavailable: {}", e);
                    control_loop(sensor, relay, NoDisplay).await
                }
            }
        }
    }
}

/// Stand-in when the panel cannot be brought up; irrigation keeps running
struct NoDisplay;

impl Display for NoDisplay {
    fn init(&mut self) -> Result<(), &'static str> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), &'static str> {
        Ok(())
    }

    fn draw_text(&mut self, _text: &str, _x: i32, _y: i32) -> Result<(), &'static str> {
        Ok(())
    }

    fn update(&mut self) -> Result<(), &'static str> {
        Ok(())
    }
}
