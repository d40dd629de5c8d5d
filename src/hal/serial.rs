use anyhow::{Context, Result};
use log::info;
use tokio::io::BufReader;
use tokio::time::Duration;
use tokio_serial::{SerialPortBuilderExt, SerialPortType, SerialStream};

pub const DEFAULT_BAUD_RATE: u32 = 38400;

/// A serial line that stays silent this long produces a TIMEOUT event
pub const DEFAULT_SERIAL_TIMEOUT: Duration = Duration::from_secs(1);

/// Open `port` at `baud_rate` as a buffered async byte stream
pub fn open_port(port: &str, baud_rate: u32) -> Result<BufReader<SerialStream>> {
    info!("Opening serial port: {} at {} baud", port, baud_rate);
    let stream = tokio_serial::new(port, baud_rate)
        .open_native_async()
        .with_context(|| format!("Failed to open serial port {}", port))?;
    Ok(BufReader::new(stream))
}

/// A serial port present on this machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub name: String,
    pub kind: String,
}

pub fn available_ports() -> Result<Vec<PortEntry>> {
    let ports = tokio_serial::available_ports().context("Failed to enumerate serial ports")?;
    Ok(ports
        .into_iter()
        .map(|port| PortEntry {
            kind: describe(&port.port_type),
            name: port.port_name,
        })
        .collect())
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => match &usb.product {
            Some(product) => format!("usb {:04x}:{:04x} {}", usb.vid, usb.pid, product),
            None => format!("usb {:04x}:{:04x}", usb.vid, usb.pid),
        },
        SerialPortType::PciPort => "pci".to_string(),
        SerialPortType::BluetoothPort => "bluetooth".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_serial::UsbPortInfo;

    #[test]
    fn test_describe_usb_port() {
        let usb = SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x2341,
            pid: 0x0043,
            serial_number: None,
            manufacturer: None,
            product: Some("Arduino Uno".to_string()),
        });
        assert_eq!(describe(&usb), "usb 2341:0043 Arduino Uno");
        assert_eq!(describe(&SerialPortType::PciPort), "pci");
    }

    #[tokio::test]
    async fn test_missing_port_is_error() {
        assert!(open_port("/dev/gesturelab-no-such-port", DEFAULT_BAUD_RATE).is_err());
    }
}
