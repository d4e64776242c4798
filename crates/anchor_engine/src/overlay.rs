//! # Overlay
//!
//! The owned context that ties the engine together. One [`Overlay`] holds the
//! viewer link and session state, the figure roster, the placement session
//! and the update scheduler; the host drives it with viewer callbacks and one
//! [`Overlay::on_frame`] call per display frame.
//!
//! ## Frame flow
//!
//! ```text
//! viewer pose ──on_pose_changed──> ViewerContext ──> FrameScheduler (pending)
//!                                                          │
//! display frame ──on_frame──> take_due ──> VisualPass ──> Vec<VisualState>
//! ```

use std::time::Duration;

use rand::RngCore;

use crate::core::config::OverlayConfig;
use crate::foundation::math::Vec2;
use crate::geometry::{NormalizedPoint, Polygon, ViewportSize};
use crate::placement::{BulkOutcome, PlacementMode, PlacementSession, Promoter, SingleTarget};
use crate::projection::{CameraPose, ForwardProjector};
use crate::sampling::RegionSampler;
use crate::scene::{Appearance, FigureId, FigureRoster, Placement, Role, RoleChoice};
use crate::update::{FrameScheduler, VisualPass, VisualState};
use crate::viewer::{
    FloorContext, HoverIntersection, LinkEvent, ViewerConnector, ViewerContext, ViewerLink,
};
use crate::OverlayError;

/// Role used for single placements outside an explicit single session
pub const DEFAULT_ROLE: Role = Role::Student;

/// Figure overlay bound to one viewer
pub struct Overlay<P: ForwardProjector> {
    config: OverlayConfig,
    projector: P,
    viewport: ViewportSize,
    context: ViewerContext,
    link: ViewerLink,
    roster: FigureRoster,
    session: PlacementSession,
    scheduler: FrameScheduler,
    sampler: RegionSampler,
    rng: Box<dyn RngCore>,
    states: Vec<VisualState>,
}

impl<P: ForwardProjector> Overlay<P> {
    /// Create an overlay
    ///
    /// The configuration is validated first. The random source drives
    /// sampling, role mixing and appearance; pass a seeded generator for
    /// reproducible layouts.
    pub fn new(
        config: OverlayConfig,
        projector: P,
        connector: Box<dyn ViewerConnector>,
        rng: Box<dyn RngCore>,
    ) -> Result<Self, OverlayError> {
        config.validate()?;
        Ok(Self {
            link: ViewerLink::new(connector, &config.viewer),
            roster: FigureRoster::new(config.roster.clone()),
            sampler: RegionSampler::new(config.sampling.clone()),
            config,
            projector,
            viewport: ViewportSize::default(),
            context: ViewerContext::new(),
            session: PlacementSession::new(),
            scheduler: FrameScheduler::new(),
            rng,
            states: Vec::new(),
        })
    }

    // ---- viewer lifecycle ----

    /// Start connecting to the viewer
    pub fn connect(&mut self) {
        self.link.connect();
    }

    /// Advance the connection attempt by one frame's worth of time
    pub fn advance_connection(&mut self, delta: Duration) -> Option<LinkEvent> {
        let event = self.link.advance(delta)?;
        if let LinkEvent::FellBack(_) = event {
            self.context.disconnect();
            self.scheduler.reset();
        }
        self.scheduler.request_refresh();
        Some(event)
    }

    /// Drop the viewer connection and all viewer-derived state
    pub fn disconnect(&mut self) {
        self.link.disconnect();
        self.context.disconnect();
        self.scheduler.reset();
        self.scheduler.request_refresh();
    }

    /// Whether world anchoring is available
    pub fn is_3d(&self) -> bool {
        self.link.is_connected()
    }

    /// Viewer link
    pub fn link(&self) -> &ViewerLink {
        &self.link
    }

    /// Viewer session state
    pub fn viewer(&self) -> &ViewerContext {
        &self.context
    }

    /// Viewer session state, for registering pose observers
    pub fn viewer_mut(&mut self) -> &mut ViewerContext {
        &mut self.context
    }

    // ---- viewer callbacks ----

    /// A new camera pose arrived from the viewer
    pub fn on_pose_changed(&mut self, pose: CameraPose) {
        if !self.link.is_connected() {
            log::trace!("Ignoring pose while not connected");
            return;
        }
        self.context.publish_pose(pose);
        self.scheduler.request(pose);
    }

    /// The viewer's pointer moved over (or off) the model
    pub fn on_hover(&mut self, intersection: Option<HoverIntersection>) {
        if self.link.is_connected() {
            self.context.update_intersection(intersection);
        }
    }

    /// The viewport was resized
    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        if self.viewport != viewport {
            log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
            self.scheduler.request_refresh();
        }
    }

    /// Current viewport size
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Display frame boundary
    ///
    /// Runs at most one position update, using the latest pose, when one was
    /// scheduled since the previous frame. Returns the fresh visual state, or
    /// `None` when nothing ran.
    pub fn on_frame(&mut self) -> Option<&[VisualState]> {
        let pose = self.scheduler.take_due()?;
        let pose = if self.link.is_connected() { pose } else { None };
        let states = self.pass(pose.as_ref())?;
        self.states = states;
        Some(&self.states)
    }

    /// Recompute every figure's visual state immediately
    ///
    /// When the viewport has not been laid out the previous state is
    /// returned unchanged.
    pub fn recompute_visual_state(&mut self) -> Vec<VisualState> {
        let pose = if self.link.is_connected() { self.context.current_pose() } else { None };
        if let Some(states) = self.pass(pose.as_ref()) {
            self.states = states;
        }
        self.states.clone()
    }

    /// Visual state computed by the last pass
    pub fn visual_state(&self) -> &[VisualState] {
        &self.states
    }

    fn pass(&self, pose: Option<&CameraPose>) -> Option<Vec<VisualState>> {
        VisualPass::new(&self.projector, pose, self.viewport, &self.config.perspective).run(&self.roster)
    }

    // ---- placement ----

    /// Place one figure
    ///
    /// The role comes from the active single session, or [`DEFAULT_ROLE`].
    /// Returns `None` when a world target arrives while the viewer is in 2D
    /// mode; nothing is added in that case.
    pub fn place_single(
        &mut self,
        target: SingleTarget,
        floor: Option<FloorContext>,
    ) -> Option<(FigureId, Placement)> {
        let role = match self.session.mode() {
            PlacementMode::Single { role } => *role,
            _ => DEFAULT_ROLE,
        };
        let placement = self.promoter().single(target, floor)?;
        let appearance = Appearance::random(&mut *self.rng);
        let id = self.roster.add(role, appearance, placement);
        log::info!(
            "Placed {} ({})",
            self.roster.get(id).map_or("figure", |f| f.name.as_str()),
            if placement.is_anchored() { "3D" } else { "2D" }
        );
        self.scheduler.request_refresh();
        Some((id, placement))
    }

    /// Sample a lasso and place up to `count` figures inside it
    pub fn place_bulk(
        &mut self,
        polygon: &Polygon,
        count: usize,
        role_choice: RoleChoice,
        floor: Option<FloorContext>,
    ) -> BulkOutcome {
        let sampled = self.sampler.sample(polygon, count, &mut *self.rng);
        let placements = self.promoter().batch(&sampled.points, floor);

        let mut outcome = BulkOutcome {
            requested: count,
            ..BulkOutcome::default()
        };
        for placement in placements {
            let role = role_choice.resolve(&mut *self.rng);
            let appearance = Appearance::random(&mut *self.rng);
            if placement.is_anchored() {
                outcome.anchored += 1;
            } else {
                outcome.legacy += 1;
            }
            outcome.placed.push(self.roster.add(role, appearance, placement));
        }

        log::info!(
            "Placed {} of {} figures ({} in 3D, {} in 2D)",
            outcome.placed.len(),
            count,
            outcome.anchored,
            outcome.legacy
        );
        self.scheduler.request_refresh();
        outcome
    }

    fn promoter(&self) -> Promoter<'_, P> {
        let pose = if self.link.is_connected() { self.context.pose() } else { None };
        Promoter::new(&self.projector, pose, self.viewport, &self.config.projection)
    }

    // ---- interactive session ----

    /// Enter single placement mode
    pub fn begin_single(&mut self, role: Role) {
        self.session.begin_single(role);
    }

    /// Enter bulk mode, capturing the current hover intersection
    pub fn begin_bulk(&mut self, count: usize, role_choice: RoleChoice) {
        let intersection = if self.link.is_connected() { self.context.current_intersection() } else { None };
        self.session.begin_bulk(count, role_choice, intersection);
    }

    /// Abandon the active placement without touching the roster
    pub fn cancel_placement(&mut self) {
        self.session.cancel();
    }

    /// Placement session
    pub fn session(&self) -> &PlacementSession {
        &self.session
    }

    /// A click in single mode
    ///
    /// Connected to the viewer, the click lands where the viewer's pointer
    /// hits the model. Otherwise it is placed at the clicked viewport
    /// fraction. Returns `None` outside single mode or when the click cannot
    /// be placed.
    pub fn click(&mut self, pixel: Vec2) -> Option<(FigureId, Placement)> {
        if !matches!(self.session.mode(), PlacementMode::Single { .. }) {
            return None;
        }
        if self.link.is_connected() {
            let hit = self.context.current_intersection()?;
            return self.place_single(SingleTarget::World(hit.position), Some(hit.into()));
        }
        let point = NormalizedPoint::from_pixels(pixel.x, pixel.y, self.viewport)?;
        self.place_single(SingleTarget::Screen(point), None)
    }

    /// Begin drawing a lasso
    pub fn lasso_press(&mut self, pixel: Vec2) -> Result<(), OverlayError> {
        Ok(self.session.press(pixel)?)
    }

    /// Extend the lasso
    pub fn lasso_drag(&mut self, pixel: Vec2) {
        self.session.drag(pixel);
    }

    /// Close the lasso and place its figures
    pub fn lasso_release(&mut self) -> Result<BulkOutcome, OverlayError> {
        let request = self.session.release(self.viewport)?;
        Ok(self.place_bulk(&request.polygon, request.count, request.role_choice, request.floor_context))
    }

    // ---- roster ----

    /// Placed figures
    pub fn roster(&self) -> &FigureRoster {
        &self.roster
    }

    /// Remove a figure
    pub fn remove_figure(&mut self, id: FigureId) -> bool {
        let removed = self.roster.remove(id).is_some();
        if removed {
            self.scheduler.request_refresh();
        }
        removed
    }

    /// Rename a figure
    pub fn rename_figure(&mut self, id: FigureId, name: &str) -> bool {
        self.roster.rename(id, name)
    }

    /// Set a figure's manual scale (clamped); returns the stored value
    pub fn set_manual_scale(&mut self, id: FigureId, scale: f32) -> Option<f32> {
        let stored = self.roster.set_manual_scale(id, scale)?;
        self.scheduler.request_refresh();
        Some(stored)
    }

    /// Restore a figure's manual scale to 1.0
    pub fn reset_manual_scale(&mut self, id: FigureId) -> bool {
        self.set_manual_scale(id, 1.0).is_some()
    }

    /// Remove every figure
    pub fn clear_figures(&mut self) -> usize {
        let removed = self.roster.clear();
        if removed > 0 {
            log::info!("Cleared {} figures", removed);
            self.scheduler.request_refresh();
        }
        removed
    }

    /// Active configuration
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Change perspective strength (percent) and schedule a refresh
    pub fn set_perspective_strength(&mut self, percent: u8) {
        self.config.perspective = self.config.perspective.clone().with_strength_percent(percent);
        self.scheduler.request_refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::geometry::{ScreenPoint, WorldPoint};
    use crate::update::Visibility;
    use crate::viewer::{ConnectPoll, ViewerError};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Ready;

    impl ViewerConnector for Ready {
        fn poll_connect(&mut self) -> ConnectPoll {
            ConnectPoll::Ready
        }
    }

    struct Silent;

    impl ViewerConnector for Silent {
        fn poll_connect(&mut self) -> ConnectPoll {
            ConnectPoll::Pending
        }
    }

    /// Affine floor projector that shifts with yaw: 50 px per world unit
    fn affine(p: &WorldPoint, pose: &CameraPose, _: ViewportSize) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            400.0 + 50.0 * p.x + pose.rotation.y,
            300.0 + 50.0 * p.z,
            5.0 - p.z,
        ))
    }

    type Projector = fn(&WorldPoint, &CameraPose, ViewportSize) -> Option<ScreenPoint>;

    fn overlay(connector: Box<dyn ViewerConnector>) -> Overlay<Projector> {
        let mut overlay = Overlay::new(
            OverlayConfig::default(),
            affine as Projector,
            connector,
            Box::new(StdRng::seed_from_u64(99)),
        )
        .unwrap();
        overlay.set_viewport(ViewportSize::new(800, 600));
        overlay
    }

    fn connected() -> Overlay<Projector> {
        let mut overlay = overlay(Box::new(Ready));
        overlay.connect();
        assert_eq!(overlay.advance_connection(Duration::from_millis(16)), Some(LinkEvent::Connected));
        overlay.on_pose_changed(CameraPose::default());
        overlay.on_hover(Some(HoverIntersection::on_floor(Vec3::new(0.0, 0.0, 0.0), Some(1))));
        overlay
    }

    fn square() -> Polygon {
        Polygon::rectangle(NormalizedPoint::new(0.3, 0.3), NormalizedPoint::new(0.7, 0.7))
    }

    #[test]
    fn test_pose_burst_runs_one_pass_with_last_pose() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let projector = move |p: &WorldPoint, pose: &CameraPose, v: ViewportSize| {
            counter.set(counter.get() + 1);
            affine(p, pose, v)
        };
        let mut overlay = Overlay::new(
            OverlayConfig::default(),
            projector,
            Box::new(Ready),
            Box::new(StdRng::seed_from_u64(1)),
        )
        .unwrap();
        overlay.set_viewport(ViewportSize::new(800, 600));
        overlay.connect();
        overlay.advance_connection(Duration::ZERO);
        overlay.on_pose_changed(CameraPose::default());
        let (id, _) = overlay.place_single(SingleTarget::World(Vec3::new(1.0, 0.0, 0.0)), None).unwrap();
        overlay.on_frame();

        let before = calls.get();
        for yaw in 1..=10 {
            overlay.on_pose_changed(CameraPose::new(Vec3::zeros(), 0.0, yaw as f32, 70.0));
        }
        let states = overlay.on_frame().unwrap().to_vec();

        assert_eq!(calls.get() - before, 1);
        assert_eq!(states[0].figure_id, id);
        assert_eq!(states[0].visibility, Visibility::Visible { x: 460.0, y: 300.0 });
        assert!(overlay.on_frame().is_none());
    }

    #[test]
    fn test_timeout_enters_2d_mode() {
        let mut overlay = overlay(Box::new(Silent));
        overlay.connect();
        let mut event = None;
        for _ in 0..31 {
            event = overlay.advance_connection(Duration::from_secs(1)).or(event);
        }

        assert_eq!(event, Some(LinkEvent::FellBack(ViewerError::Timeout(Duration::from_secs(30)))));
        assert!(!overlay.is_3d());

        overlay.on_pose_changed(CameraPose::default());
        assert!(overlay.viewer().current_pose().is_none());

        let outcome = overlay.place_bulk(&square(), 10, RoleChoice::Mixed, None);
        assert_eq!(outcome.legacy, 10);
        assert_eq!(outcome.anchored, 0);
    }

    #[test]
    fn test_world_placement_rejected_after_fallback() {
        struct Refused;

        impl ViewerConnector for Refused {
            fn poll_connect(&mut self) -> ConnectPoll {
                ConnectPoll::Failed("scan not found".to_string())
            }
        }

        let mut overlay = overlay(Box::new(Refused));
        overlay.connect();
        assert!(matches!(
            overlay.advance_connection(Duration::from_millis(16)),
            Some(LinkEvent::FellBack(_))
        ));

        let floor = HoverIntersection::on_floor(Vec3::zeros(), Some(0)).into();
        assert!(overlay.place_single(SingleTarget::World(Vec3::new(0.0, 0.0, -4.0)), Some(floor)).is_none());
        assert!(overlay.roster().is_empty());

        let point = NormalizedPoint::new(0.25, 0.75);
        let (id, placement) = overlay.place_single(SingleTarget::Screen(point), Some(floor)).unwrap();
        assert_eq!(placement, Placement::Legacy(point));
        let states = overlay.recompute_visual_state();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].figure_id, id);
        assert!(states[0].is_visible());
    }

    #[test]
    fn test_bulk_lasso_anchors_figures() {
        let mut overlay = connected();
        overlay.begin_bulk(12, RoleChoice::Fixed(Role::Student));
        overlay.lasso_press(Vec2::new(200.0, 150.0)).unwrap();
        overlay.lasso_drag(Vec2::new(600.0, 150.0));
        overlay.lasso_drag(Vec2::new(600.0, 450.0));
        overlay.lasso_drag(Vec2::new(200.0, 450.0));

        let outcome = overlay.lasso_release().unwrap();

        assert_eq!(outcome.placed.len(), 12);
        assert_eq!(outcome.anchored, 12);
        assert!(!outcome.is_short());
        assert!(!overlay.session().is_active());
        for (_, figure) in overlay.roster().iter() {
            let Placement::Anchored(anchor) = figure.placement else {
                panic!("expected anchored figure");
            };
            assert_eq!(anchor.floor_index, Some(1));
            assert_eq!(anchor.position.y, 0.0);
        }
    }

    #[test]
    fn test_cancelled_session_leaves_roster_unchanged() {
        let mut overlay = connected();
        overlay.begin_bulk(5, RoleChoice::Mixed);
        overlay.lasso_press(Vec2::new(100.0, 100.0)).unwrap();
        overlay.lasso_drag(Vec2::new(300.0, 100.0));
        overlay.lasso_drag(Vec2::new(200.0, 300.0));
        overlay.cancel_placement();

        assert!(overlay.lasso_release().is_err());
        assert!(overlay.roster().is_empty());
    }

    #[test]
    fn test_click_uses_hover_when_connected() {
        let mut overlay = connected();
        overlay.begin_single(Role::Teacher);
        let (id, placement) = overlay.click(Vec2::new(10.0, 10.0)).unwrap();

        assert!(placement.is_anchored());
        let figure = overlay.roster().get(id).unwrap();
        assert_eq!(figure.role, Role::Teacher);
        assert!(figure.name.starts_with("Teacher "));
    }

    #[test]
    fn test_click_outside_single_mode_is_ignored() {
        let mut overlay = connected();
        assert!(overlay.click(Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_recompute_hides_behind_camera() {
        let mut overlay = connected();
        let (behind, _) = overlay.place_single(SingleTarget::World(Vec3::new(0.0, 0.0, 6.0)), None).unwrap();
        let (ahead, _) = overlay.place_single(SingleTarget::World(Vec3::new(0.0, 0.0, -2.0)), None).unwrap();

        let states = overlay.recompute_visual_state();
        let find = |id| states.iter().find(|s| s.figure_id == id).unwrap();
        assert_eq!(find(behind).visibility, Visibility::Hidden);
        assert!(find(ahead).is_visible());
        assert_eq!(find(ahead).stack_order, 930);
    }

    #[test]
    fn test_unlaid_viewport_keeps_previous_state() {
        let mut overlay = connected();
        overlay.place_single(SingleTarget::World(Vec3::zeros()), None).unwrap();
        let before = overlay.recompute_visual_state();

        overlay.set_viewport(ViewportSize::new(0, 0));
        overlay.place_single(SingleTarget::World(Vec3::new(1.0, 0.0, 0.0)), None).unwrap();
        assert_eq!(overlay.recompute_visual_state(), before);
        assert!(overlay.on_frame().is_none());
    }

    #[test]
    fn test_roster_edits_schedule_refresh() {
        let mut overlay = connected();
        let (id, _) = overlay.place_single(SingleTarget::World(Vec3::zeros()), None).unwrap();
        overlay.on_frame();

        assert_eq!(overlay.set_manual_scale(id, 9.0), Some(4.0));
        let scale = overlay.on_frame().unwrap()[0].scale;
        // Depth 5 at the default 70% strength, times the clamped manual scale
        assert_relative_eq!(scale, crate::scale::depth_scale(5.0, 0.7) * 4.0);
        assert_eq!(overlay.clear_figures(), 1);
        assert!(overlay.on_frame().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = OverlayConfig::default().with_occupancy_limit(0);
        let result = Overlay::new(config, affine as Projector, Box::new(Ready), Box::new(StdRng::seed_from_u64(0)));
        assert!(matches!(result, Err(OverlayError::Config(_))));
    }
}
