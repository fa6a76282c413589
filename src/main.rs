#![no_std]
#![no_main]

extern crate alloc;

// Required for ESP-IDF bootloader compatibility
// Use explicit parameters to ensure correct efuse block revision values
esp_bootloader_esp_idf::esp_app_desc!(
    env!("CARGO_PKG_VERSION"),  // version
    env!("CARGO_PKG_NAME"),     // project_name
    "00:00:00",                 // build_time
    "2025-01-01",               // build_date
    "0.0.0",                    // idf_ver (not using IDF)
    0x10000,                    // mmu_page_size (64KB)
    0,                          // min_efuse_blk_rev_full (accept all)
    u16::MAX                    // max_efuse_blk_rev_full (accept all)
);

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal_bus::spi::{NoDelay, RefCellDevice};
use esp_backtrace as _;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode as SpiMode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};
use esp_hal::{Async, Blocking};
use log::{error, info};
use static_cell::StaticCell;

use motorhud_firmware::boot::BootError;
use motorhud_firmware::config;
use motorhud_firmware::display::oled::{init_panel, Oled};
use motorhud_firmware::display::{HudDisplay, PanelOrientation};
use motorhud_firmware::hud::HudController;
use motorhud_firmware::spp::{SppPort, UartSppBridge};
use motorhud_firmware::tasks;
use motorhud_firmware::telemetry::TelemetryState;

type SpiBus = Spi<'static, Blocking>;
type HudPanel = Oled<RefCellDevice<'static, SpiBus, Output<'static>, NoDelay>, Output<'static>>;
type SppLink = UartSppBridge<Uart<'static, Async>, Output<'static>, embassy_time::Delay>;

/// Type alias for the BLE controller
type BleController = trouble_host::prelude::ExternalController<
    esp_radio::ble::controller::BleConnector<'static>,
    10,
>;

/// Telemetry shared by the SPP loop, the BLE task and the renderer
static TELEMETRY: TelemetryState<CriticalSectionRawMutex> = TelemetryState::new();

/// Static executor for embassy
static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

/// Static cell for esp-radio controller (needed for 'static lifetime)
static RADIO_CONTROLLER: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();

/// Shared SPI bus for both panels
static SPI_BUS: StaticCell<RefCell<SpiBus>> = StaticCell::new();

/// Panel mounting, as seen through the visor
const LEFT_ORIENTATION: PanelOrientation = PanelOrientation {
    rotate180: false,
    mirror_x: true,
    mirror_y: false,
};
const RIGHT_ORIENTATION: PanelOrientation = LEFT_ORIENTATION;

/// Log the failure and idle forever; the HUD is useless half-initialised.
fn halt(err: BootError) -> ! {
    error!("boot failed at {:?}, halting", err);
    let delay = Delay::new();
    loop {
        delay.delay_millis(1000);
    }
}

/// Unwrap a bring-up step or halt
fn or_halt<T>(result: Result<T, BootError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => halt(err),
    }
}

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger(log::LevelFilter::Info);

    // Initialise heap allocator for BLE support (64KB - BLE requires significant heap)
    esp_alloc::heap_allocator!(size: 64 * 1024);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Initialise the RTOS scheduler with timer - MUST be done before any async operations
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Panels share SCLK/MOSI, each has its own CS, DC and RST (see config)
    let spi = or_halt(BootError::Bus.check(Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(config::spi::FREQUENCY_MHZ))
            .with_mode(SpiMode::_0),
    )))
    .with_sck(peripherals.GPIO12)
    .with_mosi(peripherals.GPIO11);
    let bus: &'static RefCell<SpiBus> = SPI_BUS.init(RefCell::new(spi));

    let mut delay = Delay::new();

    // config::left_panel
    let left_cs = Output::new(peripherals.GPIO5, Level::High, OutputConfig::default());
    let left_dc = Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default());
    let mut left_rst = Output::new(peripherals.GPIO6, Level::High, OutputConfig::default());
    // config::right_panel
    let right_cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());
    let right_dc = Output::new(peripherals.GPIO7, Level::Low, OutputConfig::default());
    let mut right_rst = Output::new(peripherals.GPIO16, Level::High, OutputConfig::default());

    let left_dev = or_halt(BootError::Bus.check(RefCellDevice::new(bus, left_cs, NoDelay)));
    let right_dev = or_halt(BootError::Bus.check(RefCellDevice::new(bus, right_cs, NoDelay)));

    let left: HudPanel = or_halt(BootError::Panel.check(init_panel(
        left_dev,
        left_dc,
        &mut left_rst,
        &mut delay,
        LEFT_ORIENTATION,
    )));
    let right: HudPanel = or_halt(BootError::Panel.check(init_panel(
        right_dev,
        right_dc,
        &mut right_rst,
        &mut delay,
        RIGHT_ORIENTATION,
    )));

    // The cause (a DisplayError from the first flush) is logged by check
    let hud = or_halt(BootError::WaitingView.check(HudController::start(
        &TELEMETRY,
        HudDisplay::new(left, right),
    )));
    info!("HUD: panels ready");

    // SPP bridge module on UART1
    let uart = or_halt(BootError::Spp.check(Uart::new(
        peripherals.UART1,
        UartConfig::default().with_baudrate(config::spp::BAUD_RATE),
    )))
    .with_tx(peripherals.GPIO17)
    .with_rx(peripherals.GPIO18)
    .into_async();
    // config::spp::KEY, low keeps the module in data mode
    let spp_key = Output::new(peripherals.GPIO21, Level::Low, OutputConfig::default());
    let spp = UartSppBridge::new(uart, spp_key, embassy_time::Delay);

    // Initialise esp-radio for BLE support (must be after esp_rtos::start)
    let radio = or_halt(BootError::Radio.check(esp_radio::init()));
    let radio_controller = RADIO_CONTROLLER.init(radio);

    let ble_connector = or_halt(BootError::Radio.check(
        esp_radio::ble::controller::BleConnector::new(
            radio_controller,
            peripherals.BT,
            esp_radio::ble::Config::default(),
        ),
    ));

    // Wrap in ExternalController for trouble-host compatibility
    let controller: BleController = trouble_host::prelude::ExternalController::new(ble_connector);

    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(hud_loop(spp, hud));
        spawner.must_spawn(ble_host_task(controller));
    })
}

/// Bring up the SPP link, then run the control loop
#[embassy_executor::task]
async fn hud_loop(
    mut spp: SppLink,
    hud: HudController<'static, CriticalSectionRawMutex, HudPanel>,
) {
    or_halt(BootError::Spp.check(spp.begin(config::spp::DEVICE_NAME).await));
    info!("SPP: ready as '{}'", config::spp::DEVICE_NAME);

    tasks::hud_task(&TELEMETRY, spp, hud).await
}

/// Task that manages BLE connectivity; setup failure halts the firmware
#[embassy_executor::task]
async fn ble_host_task(controller: BleController) {
    if let Err(err) = tasks::ble_task(controller, &TELEMETRY).await {
        halt(err);
    }
}
