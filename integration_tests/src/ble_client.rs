//! BLE client for the MotorHUD Nordic UART Service.
//!
//! The HUD is found from adapter events instead of polling the peripheral
//! list. TX notifications are forwarded into a channel, and readers pull
//! `\n`-terminated replies out of it.

#![allow(dead_code)]

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, timeout, timeout_at, Instant};
use uuid::Uuid;

const NUS_SERVICE: Uuid = Uuid::from_u128(0x6e400001_b5a3_f393_e0a9_e50e24dcca9e);
/// Central writes lines here
const NUS_RX: Uuid = Uuid::from_u128(0x6e400002_b5a3_f393_e0a9_e50e24dcca9e);
/// HUD notifies replies here
const NUS_TX: Uuid = Uuid::from_u128(0x6e400003_b5a3_f393_e0a9_e50e24dcca9e);

/// Notified bytes not yet handed to a reader
struct Inbox {
    chunks: mpsc::UnboundedReceiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl Inbox {
    fn pull_queued(&mut self) {
        while let Ok(chunk) = self.chunks.try_recv() {
            self.pending.extend(chunk);
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        Some(self.pending.drain(..=end).collect())
    }
}

/// Connected HUD over BLE.
pub struct BleClient {
    hud: Peripheral,
    rx: Characteristic,
    tx: Characteristic,
    inbox: Mutex<Inbox>,
}

impl BleClient {
    /// Scan for a device advertising NUS under `name` and connect.
    pub async fn connect_by_name(name: &str, scan_timeout: Duration) -> Result<Self> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .context("no Bluetooth adapter")?;

        let hud = timeout(scan_timeout, discover(&adapter, name))
            .await
            .map_err(|_| anyhow!("'{}' not seen within {:?}", name, scan_timeout))??;
        adapter.stop_scan().await?;

        hud.connect().await?;
        hud.discover_services().await?;
        let rx = characteristic(&hud, NUS_RX)?;
        let tx = characteristic(&hud, NUS_TX)?;

        hud.subscribe(&tx).await?;
        let mut notifications = hud.notifications().await?;
        let (sender, chunks) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(n) = notifications.next().await {
                if n.uuid == NUS_TX && sender.send(n.value).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            hud,
            rx,
            tx,
            inbox: Mutex::new(Inbox {
                chunks,
                pending: Vec::new(),
            }),
        })
    }

    /// Write raw bytes to RX as a single GATT write.
    pub async fn write(&self, data: &[u8]) -> Result<()> {
        self.hud
            .write(&self.rx, data, WriteType::WithoutResponse)
            .await?;
        Ok(())
    }

    /// Send PING and return the raw notified reply.
    pub async fn ping(&self, response_timeout: Duration) -> Result<Vec<u8>> {
        self.clear_buffer().await;
        self.write(&crate::protocol::ping()).await?;
        self.wait_for_reply(response_timeout).await
    }

    /// Wait until a complete `\n`-terminated reply has been notified.
    pub async fn wait_for_reply(&self, response_timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + response_timeout;
        let mut inbox = self.inbox.lock().await;

        loop {
            if let Some(line) = inbox.take_line() {
                return Ok(line);
            }
            let chunk = timeout_at(deadline, inbox.chunks.recv())
                .await
                .map_err(|_| anyhow!("Timeout waiting for BLE reply"))?
                .context("notification stream closed")?;
            inbox.pending.extend(chunk);
        }
    }

    /// Return everything notified within `window`.
    pub async fn collect_for(&self, window: Duration) -> Vec<u8> {
        sleep(window).await;
        let mut inbox = self.inbox.lock().await;
        inbox.pull_queued();
        std::mem::take(&mut inbox.pending)
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.hud.unsubscribe(&self.tx).await?;
        self.hud.disconnect().await?;
        Ok(())
    }

    /// Drop anything notified but not yet read.
    pub async fn clear_buffer(&self) {
        let mut inbox = self.inbox.lock().await;
        inbox.pull_queued();
        inbox.pending.clear();
    }
}

/// Scan until a NUS advertiser reports `name`, from its advertisement or
/// its scan response.
async fn discover(adapter: &Adapter, name: &str) -> Result<Peripheral> {
    let mut events = adapter.events().await?;
    adapter
        .start_scan(ScanFilter {
            services: vec![NUS_SERVICE],
        })
        .await?;

    while let Some(event) = events.next().await {
        let id = match event {
            CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
            _ => continue,
        };
        let candidate = adapter.peripheral(&id).await?;
        let advertised = candidate.properties().await?.and_then(|p| p.local_name);
        if advertised.as_deref() == Some(name) {
            return Ok(candidate);
        }
    }

    Err(anyhow!("adapter stopped reporting events"))
}

fn characteristic(hud: &Peripheral, uuid: Uuid) -> Result<Characteristic> {
    hud.characteristics()
        .into_iter()
        .find(|c| c.uuid == uuid)
        .with_context(|| format!("HUD has no characteristic {}", uuid))
}
