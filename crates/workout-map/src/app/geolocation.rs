//! One-shot position lookup
//!
//! The result arrives through a `tokio` oneshot channel which the app polls
//! every frame. On the web the browser answers asynchronously; on native the
//! position comes from the command line.

use crate::app::settings::Settings;
use tokio::sync::oneshot;
use workout_map_lib::{Coords, GeolocationError};

pub type PositionResult = Result<Coords, GeolocationError>;

/// Ask for the current position once. The receiver yields exactly one value.
pub fn request_position(
    ctx: &egui::Context,
    settings: &Settings,
) -> oneshot::Receiver<PositionResult> {
    let (tx, rx) = oneshot::channel();
    platform::request(ctx.clone(), settings, tx);
    rx
}

/// Non-blocking check of a pending request. `None` while still waiting.
pub fn poll_position(rx: &mut oneshot::Receiver<PositionResult>) -> Option<PositionResult> {
    match rx.try_recv() {
        Ok(result) => Some(result),
        Err(oneshot::error::TryRecvError::Empty) => None,
        // Nobody will ever answer
        Err(oneshot::error::TryRecvError::Closed) => Some(Err(GeolocationError::Denied)),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;

    pub fn request(
        ctx: egui::Context,
        settings: &Settings,
        tx: oneshot::Sender<PositionResult>,
    ) {
        let result = settings.fixed_position().ok_or_else(|| {
            tracing::info!("No --latitude/--longitude given, position unavailable");
            GeolocationError::Denied
        });
        let _ = tx.send(result);
        ctx.request_repaint();
    }
}

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::{JsCast, JsValue, closure::Closure};
    use web_sys::GeolocationPosition;
    use web_sys::js_sys::Function;

    type SharedSender = Rc<RefCell<Option<oneshot::Sender<PositionResult>>>>;

    fn resolve(sender: &SharedSender, ctx: &egui::Context, result: PositionResult) {
        if let Some(tx) = sender.borrow_mut().take() {
            let _ = tx.send(result);
        }
        ctx.request_repaint();
    }

    pub fn request(
        ctx: egui::Context,
        _settings: &Settings,
        tx: oneshot::Sender<PositionResult>,
    ) {
        let geolocation = match web_sys::window().map(|w| w.navigator().geolocation()) {
            Some(Ok(geolocation)) => geolocation,
            _ => {
                tracing::warn!("navigator.geolocation is not available");
                let _ = tx.send(Err(GeolocationError::Unavailable));
                return;
            }
        };

        let sender: SharedSender = Rc::new(RefCell::new(Some(tx)));

        let on_success = {
            let sender = sender.clone();
            let ctx = ctx.clone();
            Closure::once_into_js(move |position: GeolocationPosition| {
                let coords = position.coords();
                let coords = Coords::new(coords.latitude(), coords.longitude());
                resolve(&sender, &ctx, Ok(coords));
            })
        };
        let on_error = {
            let sender = sender.clone();
            let ctx = ctx.clone();
            Closure::once_into_js(move |error: JsValue| {
                tracing::debug!("getCurrentPosition failed: {:?}", error);
                resolve(&sender, &ctx, Err(GeolocationError::Denied));
            })
        };

        if let Err(e) = geolocation.get_current_position_with_error_callback(
            on_success.unchecked_ref::<Function>(),
            Some(on_error.unchecked_ref::<Function>()),
        ) {
            tracing::warn!("getCurrentPosition threw: {:?}", e);
            resolve(&sender, &ctx, Err(GeolocationError::Denied));
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_position_from_flags() {
        let settings =
            Settings::parse_from(["workout-map", "--latitude", "38.7", "--longitude", "-9.1"]);
        let mut rx = request_position(&egui::Context::default(), &settings);
        assert_eq!(poll_position(&mut rx), Some(Ok(Coords::new(38.7, -9.1))));
    }

    #[test]
    fn test_denied_without_flags() {
        let mut rx = request_position(&egui::Context::default(), &Settings::default());
        assert_eq!(poll_position(&mut rx), Some(Err(GeolocationError::Denied)));
    }

    #[test]
    fn test_pending_and_dropped_sender() {
        let (tx, mut rx) = oneshot::channel::<PositionResult>();
        assert_eq!(poll_position(&mut rx), None);
        drop(tx);
        assert_eq!(poll_position(&mut rx), Some(Err(GeolocationError::Denied)));
    }
}
