//! Host link over a real serial port.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use doorlock_hardware::{HardwareError, SerialDevice};
use doorlock_protocol::{LINE_TERMINATOR, LineCodec, ProtocolError};
use serialport::SerialPort;
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

use crate::config::SerialConfig;

/// Longest a single poll waits on an idle port.
const READ_TIMEOUT: Duration = Duration::from_millis(5);

/// Line link to the host on top of `serialport`.
pub struct PortLink<P: Read + Write + Send = Box<dyn SerialPort>> {
    port: P,
    codec: LineCodec,
    rx: BytesMut,
}

impl PortLink {
    /// Open the configured port.
    pub fn open(config: &SerialConfig) -> anyhow::Result<Self> {
        let path = config.port.to_string_lossy();
        let port = serialport::new(path.as_ref(), config.baudrate)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("Failed to open serial port at {:?}", config.port))?;
        debug!(port = %path, baudrate = config.baudrate, "Serial port open");
        Ok(Self::new(port))
    }
}

impl<P: Read + Write + Send> PortLink<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            codec: LineCodec::new(),
            rx: BytesMut::with_capacity(256),
        }
    }

    /// Move whatever the port has buffered into `rx` without blocking.
    fn fill(&mut self) -> doorlock_hardware::Result<()> {
        let mut chunk = [0u8; 64];
        match self.port.read(&mut chunk) {
            Ok(0) => Err(HardwareError::disconnected("serial port")),
            Ok(n) => {
                trace!(bytes = n, "Serial read");
                self.rx.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn next_line(&mut self) -> doorlock_hardware::Result<Option<String>> {
        loop {
            match self.codec.decode(&mut self.rx) {
                Ok(reply) => return Ok(reply.map(|r| r.to_string())),
                Err(ProtocolError::LineTooLong { length, max }) => {
                    warn!(length, max, "Dropping oversize line from host");
                }
                Err(e) => return Err(HardwareError::invalid_data(e.to_string())),
            }
        }
    }
}

impl<P: Read + Write + Send> SerialDevice for PortLink<P> {
    fn send_line(&mut self, line: &str) -> doorlock_hardware::Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(LINE_TERMINATOR.as_bytes())?;
        self.port.flush()?;
        Ok(())
    }

    fn poll_line(&mut self) -> doorlock_hardware::Result<Option<String>> {
        if let Some(line) = self.next_line()? {
            return Ok(Some(line));
        }
        self.fill()?;
        self.next_line()
    }
}
