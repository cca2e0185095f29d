use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Drives the UI thread: polls the input driver and hands each event to a
/// handler.
///
/// The handler also runs with `None` once per poll interval, which is where
/// pending focus updates are picked up and the screen is redrawn. The focus
/// feed runs on its own thread and never goes through this loop.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Run until the handler returns [`ControlFlow::Quit`].
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (drags, wheel) before the next tick so the
                // panel keeps up with the pointer.
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
