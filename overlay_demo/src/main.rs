//! Overlay demo application
//!
//! Drives the anchor engine against a simulated viewer: a pinhole camera that
//! orbits slowly while figures are placed with a click and a lasso. Prints
//! per-frame visibility and finally the exported roster as RON.
//!
//! Usage: `overlay_demo [config.toml|config.ron] [export.ron]`

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anchor_engine::foundation::logging;
use anchor_engine::foundation::time::FrameClock;
use anchor_engine::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME: Duration = Duration::from_millis(16);
const VIEWPORT: ViewportSize = ViewportSize { width: 1280, height: 720 };

/// Simulated viewer that takes a few frames to finish loading its scan
struct SimulatedViewer {
    frames_until_ready: u32,
}

impl ViewerConnector for SimulatedViewer {
    fn poll_connect(&mut self) -> ConnectPoll {
        if self.frames_until_ready == 0 {
            ConnectPoll::Ready
        } else {
            self.frames_until_ready -= 1;
            ConnectPoll::Pending
        }
    }

    fn disconnect(&mut self) {
        log::debug!("Simulated viewer released");
    }
}

struct DemoApp {
    overlay: Overlay<PerspectiveProjector>,
    clock: FrameClock,
    poses_seen: Rc<Cell<u64>>,
}

impl DemoApp {
    fn new(config: OverlayConfig) -> Result<Self, OverlayError> {
        log::info!("Creating overlay demo...");
        let mut overlay = Overlay::new(
            config,
            PerspectiveProjector::default(),
            Box::new(SimulatedViewer { frames_until_ready: 5 }),
            Box::new(StdRng::seed_from_u64(2024)),
        )?;
        overlay.set_viewport(VIEWPORT);

        let poses_seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&poses_seen);
        overlay
            .viewer_mut()
            .subscribe_pose(Box::new(move |_: &CameraPose| counter.set(counter.get() + 1)));

        Ok(Self {
            overlay,
            clock: FrameClock::new(),
            poses_seen,
        })
    }

    fn camera(yaw: f32) -> CameraPose {
        CameraPose::new(Vec3::new(0.0, 1.6, 0.0), -25.0, yaw, 70.0)
    }

    /// Advance the connection until it settles
    fn connect(&mut self) {
        self.overlay.connect();
        loop {
            let delta = self.clock.advance(FRAME);
            match self.overlay.advance_connection(delta) {
                Some(LinkEvent::Connected) => break,
                Some(LinkEvent::FellBack(error)) => {
                    log::warn!("Continuing without viewer: {}", error);
                    break;
                }
                None => {}
            }
        }
        log::info!("Connection settled after {} frames", self.clock.frame_count());
    }

    fn place(&mut self) -> Result<(), OverlayError> {
        self.overlay.on_pose_changed(Self::camera(0.0));
        self.overlay
            .on_hover(Some(HoverIntersection::on_floor(Vec3::new(0.0, 0.0, -4.0), Some(0))));

        self.overlay.begin_single(Role::Teacher);
        if let Some((id, placement)) = self.overlay.click(Vec2::new(640.0, 500.0)) {
            log::info!("Single placement {:?}: {:?}", id, placement);
        }
        self.overlay.cancel_placement();

        self.overlay.begin_bulk(24, RoleChoice::Mixed);
        self.overlay.lasso_press(Vec2::new(440.0, 420.0))?;
        for pixel in [
            Vec2::new(640.0, 400.0),
            Vec2::new(840.0, 420.0),
            Vec2::new(900.0, 620.0),
            Vec2::new(640.0, 660.0),
            Vec2::new(380.0, 620.0),
        ] {
            self.overlay.lasso_drag(pixel);
        }
        let outcome = self.overlay.lasso_release()?;
        log::info!(
            "Lasso placed {}/{} ({} anchored, {} legacy)",
            outcome.placed.len(),
            outcome.requested,
            outcome.anchored,
            outcome.legacy
        );
        Ok(())
    }

    /// Orbit the camera, publishing several poses per frame
    fn orbit(&mut self, frames: u32) {
        for frame in 0..frames {
            self.clock.advance(FRAME);
            for step in 0..3 {
                let yaw = (frame * 3 + step) as f32 * 0.5;
                self.overlay.on_pose_changed(Self::camera(yaw));
            }
            if let Some(states) = self.overlay.on_frame() {
                let visible = states.iter().filter(|s| s.is_visible()).count();
                let top = states.iter().map(|s| s.stack_order).max().unwrap_or(0);
                log::debug!(
                    "Frame {}: {}/{} visible, top stack order {}",
                    self.clock.frame_count(),
                    visible,
                    states.len(),
                    top
                );
            }
        }
        log::info!(
            "Orbited {} frames, observers saw {} poses",
            frames,
            self.poses_seen.get()
        );
    }

    fn report(&self) -> Result<String, ron::Error> {
        let roster = self.overlay.roster();
        let occupancy = roster.occupancy();
        log::info!(
            "Occupancy {}/{} ({:?})",
            occupancy.count,
            occupancy.limit,
            occupancy.level
        );
        for (role, count) in roster.role_counts() {
            log::info!("  {}: {}", role, count);
        }
        ron::ser::to_string_pretty(&roster.export(), ron::ser::PrettyConfig::default())
    }

    fn run(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        self.connect();
        self.place()?;
        self.orbit(120);
        let export = self.report()?;
        self.overlay.disconnect();
        Ok(export)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => OverlayConfig::load_from_file(&path)?,
        None => OverlayConfig::default(),
    };
    logging::init_with_level(&config.log_level);

    let mut app = DemoApp::new(config)?;
    let export = app.run()?;

    match args.next() {
        Some(path) => {
            std::fs::write(&path, export)?;
            log::info!("Roster written to {}", path);
        }
        None => println!("{export}"),
    }
    Ok(())
}
