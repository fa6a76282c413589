//! BLE task for telemetry ingress
//!
//! Runs the BLE host, advertises the Nordic UART Service and feeds every
//! RX write into the BLE line framer. PING replies are notified on TX of
//! the connection the line arrived on.

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{info, warn};
use trouble_host::prelude::*;

use crate::ble::service::{NordicUartService, NUS_SERVICE_UUID_LE, NUS_TX_SIZE};
use crate::boot::BootError;
use crate::commands::{ReplySerialiser, TransportId};
use crate::config;
use crate::dispatcher::LineDispatcher;
use crate::protocol::framing::LineFramer;
use crate::telemetry::TelemetryState;

/// Number of maximum concurrent connections
const CONNECTIONS_MAX: usize = 1;
/// Number of L2CAP channels
const L2CAP_CHANNELS_MAX: usize = 3;

/// BLE GATT Server with Nordic UART Service
#[gatt_server(mutex_type = CriticalSectionRawMutex)]
struct Server {
    nus: NordicUartService,
}

/// Encode the advertising payload and the scan response.
///
/// The service UUID goes in the advertisement, the name in the scan
/// response, so neither has to share the 31 byte limit.
fn encode_advertising(
    device_name: &str,
    adv_data: &mut [u8; 31],
    scan_data: &mut [u8; 31],
) -> Result<(usize, usize), BootError> {
    let adv_len = BootError::Ble.check(AdStructure::encode_slice(
        &[
            AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
            AdStructure::ServiceUuids128(&[NUS_SERVICE_UUID_LE]),
        ],
        adv_data,
    ))?;
    let scan_len = BootError::Ble.check(AdStructure::encode_slice(
        &[AdStructure::CompleteLocalName(device_name.as_bytes())],
        scan_data,
    ))?;
    Ok((adv_len, scan_len))
}

/// Main BLE task that manages the Bluetooth stack and connections
///
/// Advertises the NUS service UUID with the device name in the scan
/// response, serves one central at a time and goes back to advertising
/// after each disconnect. The line framer lives for the whole task, so a
/// partial line can be finished on the next connection.
///
/// A GATT server or advertising data that cannot be set up comes back as
/// [`BootError::Ble`], which the caller treats as a boot failure.
pub async fn ble_task<C: Controller>(
    controller: C,
    state: &'static TelemetryState<CriticalSectionRawMutex>,
) -> Result<(), BootError> {
    let device_name = config::ble::DEVICE_NAME;
    info!("BLE: starting as '{}'", device_name);

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX> =
        HostResources::new();

    let stack = trouble_host::new(controller, &mut resources)
        .set_random_address(Address::random(config::ble::ADDRESS));

    let Host {
        mut peripheral,
        mut runner,
        ..
    } = stack.build();

    let gap = GapConfig::Peripheral(PeripheralConfig {
        name: device_name,
        appearance: &appearance::UNKNOWN,
    });
    let server: Server = BootError::Ble.check(Server::new_with_config(gap))?;

    let mut adv_data = [0u8; 31];
    let mut scan_data = [0u8; 31];
    let (adv_len, scan_len) = encode_advertising(device_name, &mut adv_data, &mut scan_data)?;

    let runner_task = runner.run();

    let peripheral_task = async {
        let dispatcher = LineDispatcher::new();
        let serialiser = ReplySerialiser::new();
        let mut framer = LineFramer::new();

        loop {
            info!("BLE: advertising");
            let advertiser = match peripheral
                .advertise(
                    &Default::default(),
                    Advertisement::ConnectableScannableUndirected {
                        adv_data: &adv_data[..adv_len],
                        scan_data: &scan_data[..scan_len],
                    },
                )
                .await
            {
                Ok(a) => a,
                Err(e) => {
                    warn!("BLE: advertising failed: {:?}", e);
                    continue;
                }
            };

            let acceptor = match advertiser.accept().await {
                Ok(a) => a,
                Err(_) => continue,
            };

            let conn = match acceptor.with_attribute_server(&*server) {
                Ok(c) => c,
                Err(_) => continue,
            };
            info!("BLE: central connected");

            loop {
                match conn.next().await {
                    GattConnectionEvent::Disconnected { reason } => {
                        info!("BLE: central disconnected ({:?})", reason);
                        break;
                    }
                    GattConnectionEvent::Gatt { event } => match event {
                        GattEvent::Write(write_event) => {
                            if write_event.handle() == server.nus.rx.handle {
                                for line in framer.feed(write_event.data()) {
                                    let Some(msg) =
                                        dispatcher.handle_line(&line, TransportId::Ble, state)
                                    else {
                                        continue;
                                    };

                                    let encoded =
                                        serialiser.serialise(&msg.reply, msg.destination);
                                    let Ok(tx) = <[u8; NUS_TX_SIZE]>::try_from(encoded.as_slice())
                                    else {
                                        warn!("BLE: reply does not fit TX ({} bytes)", encoded.len());
                                        continue;
                                    };
                                    if let Err(e) = server.nus.tx.notify(&conn, &tx).await {
                                        warn!("BLE: notify failed: {:?}", e);
                                    }
                                }
                            }
                            let _ = write_event.accept();
                        }
                        GattEvent::Read(read_event) => {
                            let _ = read_event.accept();
                        }
                        GattEvent::Other(other_event) => {
                            let _ = other_event.accept();
                        }
                    },
                    _ => {}
                }
            }
        }
    };

    select(runner_task, peripheral_task).await;
    Ok(())
}
