use embedded_graphics::{
    mono_font::{MonoTextStyle, MonoTextStyleBuilder, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text, TextStyleBuilder},
};
use embedded_hal_bus::spi::ExclusiveDevice;
use epd_waveshare::{
    color::Color,
    epd2in13_v2::{Display2in13, Epd2in13},
    prelude::WaveshareDisplay,
};
use esp_hal::{
    Blocking,
    delay::Delay,
    gpio::{Input, Output},
    i2c::master::I2c,
    spi::master::Spi,
};
use ssd1306::{
    I2CDisplayInterface, Ssd1306,
    mode::{BufferedGraphicsMode, DisplayConfig},
    prelude::I2CInterface,
    rotation::DisplayRotation,
    size::DisplaySize128x64,
};

use crate::config::OLED_I2C_ADDR;
use crate::hardware::{DisplayHardware, SSD1306Hardware};
use crate::traits::Display;

const BUSY_TIMEOUT_MS: u32 = 10_000;

type Oled<'a> = Ssd1306<
    I2CInterface<I2c<'a, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

type EpaperSpi<'a> = ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, Delay>;

/// 128x64 SSD1306 OLED showing the status rows
pub struct OledPanel<'a> {
    display: Oled<'a>,
}

impl<'a> OledPanel<'a> {
    pub fn new(hw: SSD1306Hardware<'a>) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(hw.i2c, OLED_I2C_ADDR);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self { display }
    }
}

impl Display for OledPanel<'_> {
    fn init(&mut self) -> Result<(), &'static str> {
        esp_println::println!("[OLED] Initializing SSD1306");
        self.display.init().map_err(|_| "Failed to init SSD1306")
    }

    fn clear(&mut self) -> Result<(), &'static str> {
        self.display.clear_buffer();
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), &'static str> {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.display)
            .map_err(|_| "Failed to draw text")?;
        Ok(())
    }

    fn update(&mut self) -> Result<(), &'static str> {
        self.display.flush().map_err(|_| "Failed to flush SSD1306")
    }
}

/// Wait for the e-Paper display BUSY pin to go LOW
fn wait_for_display_ready(busy: &Input<'_>, delay: &Delay) -> Result<(), &'static str> {
    let timeout_cycles = BUSY_TIMEOUT_MS / 10;

    for _ in 0..timeout_cycles {
        if !busy.is_high() {
            return Ok(());
        }
        delay.delay_millis(10);
    }

    Err("Display BUSY timeout")
}

/// Waveshare 2.13" e-Paper HAT showing the status rows
pub struct EpaperPanel<'a> {
    spi: EpaperSpi<'a>,
    delay: Delay,
    epd: Epd2in13<EpaperSpi<'a>, Input<'a>, Output<'a>, Output<'a>, Delay>,
    frame: Display2in13,
}

impl<'a> EpaperPanel<'a> {
    pub fn new(hw: DisplayHardware<'a>) -> Result<Self, &'static str> {
        let DisplayHardware {
            mut spi,
            busy,
            dc,
            rst,
            mut delay,
        } = hw;

        esp_println::println!("[EPD] Initializing Waveshare 2.13\" e-Paper HAT V4");
        wait_for_display_ready(&busy, &delay)?;

        let epd = Epd2in13::new(&mut spi, busy, dc, rst, &mut delay, None)
            .map_err(|_| "Failed to create EPD driver")?;

        Ok(Self {
            spi,
            delay,
            epd,
            frame: Display2in13::default(),
        })
    }
}

impl Display for EpaperPanel<'_> {
    fn init(&mut self) -> Result<(), &'static str> {
        self.clear()
    }

    fn clear(&mut self) -> Result<(), &'static str> {
        self.frame
            .clear(Color::White)
            .map_err(|_| "Failed to clear display")
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), &'static str> {
        let text_style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(Color::Black)
            .background_color(Color::White)
            .build();

        let baseline_style = TextStyleBuilder::new().baseline(Baseline::Top).build();

        Text::with_text_style(text, Point::new(x, y), text_style, baseline_style)
            .draw(&mut self.frame)
            .map_err(|_| "Failed to draw text")?;
        Ok(())
    }

    fn update(&mut self) -> Result<(), &'static str> {
        self.epd
            .update_and_display_frame(&mut self.spi, self.frame.buffer(), &mut self.delay)
            .map_err(|_| "Failed to update display")
    }
}
