use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::vision_pipeline::common::error::{PipelineError, Result};

/// A camera that captures one compressed still at a time into an internal FIFO.
pub trait CaptureSource {
    /// Clears any previous frame and triggers a new capture.
    fn start_capture(&mut self) -> Result<()>;

    /// Polls the capture-complete flag.
    fn capture_done(&mut self) -> Result<bool>;

    /// Length in bytes of the last completed capture.
    fn frame_len(&mut self) -> Result<usize>;

    /// Copies the last capture into `buf`, which is exactly [`frame_len`](Self::frame_len) long.
    fn read_frame(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Triggers a capture and waits for it to complete.
    ///
    /// Fails with [`PipelineError::CaptureTimeout`] if the source has not
    /// signalled completion after `timeout`.
    fn capture(&mut self, timeout: Duration, poll_interval: Duration) -> Result<()> {
        self.start_capture()?;

        let started = Instant::now();
        loop {
            if self.capture_done()? {
                debug!("Capture complete after {:?}", started.elapsed());
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(PipelineError::CaptureTimeout(timeout));
            }
            trace!("Capture pending");
            std::thread::sleep(poll_interval);
        }
    }

    /// Moves the last capture into `buf`, returning its length.
    ///
    /// Nothing is copied when the frame does not fit.
    fn transfer(&mut self, buf: &mut [u8]) -> Result<usize> {
        let len = self.frame_len()?;
        if len > buf.len() {
            return Err(PipelineError::TransferBufferTooSmall {
                required: len,
                capacity: buf.len(),
            });
        }

        self.read_frame(&mut buf[..len])?;
        debug!("Transferred {} byte frame", len);
        Ok(len)
    }
}
