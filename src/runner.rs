use std::io;
use std::time::{Duration, Instant};

use crate::app::App;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::overlay::OverlayHost;

/// Drive `app` until it asks to quit. The screen is redrawn only when a tick
/// or an event changed something. The panel is hidden before returning.
pub fn run_app<D, O, H>(
    driver: &mut D,
    output: &mut O,
    app: &mut App<H>,
    poll_interval: Duration,
) -> io::Result<()>
where
    D: InputDriver,
    O: OutputDriver,
    H: OverlayHost,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    let result = event_loop.run(|driver, event| {
        let now = Instant::now();
        let flow = match event {
            Some(evt) => app.handle_event(&evt, now),
            None => {
                if app.tick(now) {
                    output.draw(|mut frame| app.render(&mut frame))?;
                }
                ControlFlow::Continue
            }
        };
        if let Some(enabled) = app.state_mut().take_mouse_capture_change()
            && let Err(err) = driver.set_mouse_capture(enabled)
        {
            tracing::warn!("failed to change mouse capture: {err}");
        }
        Ok(flow)
    });
    app.hide_overlay();
    result
}
