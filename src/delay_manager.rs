use std::thread;
use std::time::Duration;

use log::debug;

pub fn request_delay(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    debug!("Waiting for {:.2} seconds (Request Delay)...", delay.as_secs_f64());
    thread::sleep(delay);
}
