use crate::collision::CollisionQuery;
use glam::Vec3;
use mazerun_common::{GameConfig, LookConfig, MovementConfig, SpeedConfig};
use mazerun_protocol::MoveAction;

/// The four held movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn set(&mut self, action: MoveAction, pressed: bool) {
        match action {
            MoveAction::Forward => self.forward = pressed,
            MoveAction::Backward => self.backward = pressed,
            MoveAction::Left => self.left = pressed,
            MoveAction::Right => self.right = pressed,
        }
    }

    pub fn get(&self, action: MoveAction) -> bool {
        match action {
            MoveAction::Forward => self.forward,
            MoveAction::Backward => self.backward,
            MoveAction::Left => self.left,
            MoveAction::Right => self.right,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Local intent: -Z forward, +X right. Opposing keys cancel.
    pub fn intent(&self) -> Vec3 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec3::new(
            axis(self.left, self.right),
            0.0,
            axis(self.forward, self.backward),
        )
    }
}

/// Current speed with its default and ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedProfile {
    default: f32,
    max: f32,
    current: f32,
}

impl SpeedProfile {
    pub fn new(config: SpeedConfig) -> Self {
        Self {
            default: config.default,
            max: config.max,
            current: config.default.min(config.max),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn default_speed(&self) -> f32 {
        self.default
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Set the current speed, capped at `max`. Non-finite values leave it unchanged.
    pub fn set(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        self.current = value.min(self.max);
    }

    pub fn reset(&mut self) {
        self.current = self.default;
    }
}

/// What a movement step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No key combination produced a direction.
    Idle,
    /// The displacement was committed.
    Moved(Vec3),
    /// The displacement was discarded: geometry lies within clearance of the target.
    Blocked { hit_distance: f32 },
}

/// First-person player: position, view orientation, held keys and speed.
///
/// Pitch > 0 looks down. Yaw 0 faces +X; positive yaw turns toward +Z.
#[derive(Debug, Clone)]
pub struct PlayerController {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    input: InputState,
    speed: SpeedProfile,
    eye_height: f32,
    movement: MovementConfig,
    look: LookConfig,
}

impl PlayerController {
    /// Place the player at `(x, eye_height, z)` of `spawn`.
    pub fn new(spawn: Vec3, config: &GameConfig) -> Self {
        Self {
            position: Vec3::new(spawn.x, config.eye_height, spawn.z),
            yaw: 0.0,
            pitch: 0.0,
            input: InputState::default(),
            speed: SpeedProfile::new(config.speed),
            eye_height: config.eye_height,
            movement: config.movement,
            look: config.look,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn speed(&self) -> &SpeedProfile {
        &self.speed
    }

    pub fn speed_mut(&mut self) -> &mut SpeedProfile {
        &mut self.speed
    }

    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-self.look.pitch_limit, self.look.pitch_limit);
    }

    /// View direction, including pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            -self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Apply one pointer-drag sample. `dt` only matters when look is dt-scaled.
    pub fn rotate(&mut self, dx: f32, dy: f32, dt: f32) {
        let sensitivity = if self.look.scale_by_dt {
            self.look.dt_sensitivity * dt
        } else {
            self.look.sensitivity
        };
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch + dy * sensitivity)
            .clamp(-self.look.pitch_limit, self.look.pitch_limit);
    }

    /// Candidate world-space displacement for this frame, ignoring collisions.
    ///
    /// Basis vectors are flattened onto the XZ plane, so pitch never adds a
    /// vertical component.
    pub fn desired_displacement(&self, dt: f32) -> Option<Vec3> {
        let intent = self.input.intent();
        if intent.length_squared() < self.movement.min_intent_sq {
            return None;
        }
        let intent = intent.normalize();
        let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
        let forward = flatten(self.forward());
        let right = flatten(self.right());
        let world = forward * -intent.z + right * intent.x;
        Some(world * self.speed.current * dt)
    }

    /// Advance one frame: resolve the held keys into a displacement, commit it
    /// unless geometry sits within clearance of the target, then pin the
    /// height to eye level.
    pub fn step(&mut self, dt: f32, collision: &dyn CollisionQuery) -> MoveOutcome {
        let outcome = match self.desired_displacement(dt) {
            None => MoveOutcome::Idle,
            Some(displacement) => self.try_move(displacement, collision),
        };
        self.position.y = self.eye_height;
        outcome
    }

    fn try_move(&mut self, displacement: Vec3, collision: &dyn CollisionQuery) -> MoveOutcome {
        let length = displacement.length();
        if !length.is_finite() {
            tracing::warn!(?displacement, "non-finite step discarded");
            return MoveOutcome::Blocked { hit_distance: 0.0 };
        }
        if length <= f32::EPSILON {
            return MoveOutcome::Idle;
        }
        let direction = displacement / length;
        let reach = length + self.movement.clearance_margin;
        match collision.cast_ray(self.position, direction, reach) {
            Some(hit) if hit.distance - length <= self.movement.clearance_threshold => {
                tracing::trace!(hit = hit.distance, step = length, "move blocked");
                MoveOutcome::Blocked {
                    hit_distance: hit.distance,
                }
            }
            _ => {
                self.position += displacement;
                MoveOutcome::Moved(displacement)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{OpenSpace, RayHit};
    use std::f32::consts::FRAC_PI_2;

    /// A flat wall `distance` ahead in every direction.
    struct WallAt(f32);

    impl CollisionQuery for WallAt {
        fn cast_ray(&self, _: Vec3, _: Vec3, max_distance: f32) -> Option<RayHit> {
            (self.0 <= max_distance).then_some(RayHit { distance: self.0 })
        }
    }

    fn player() -> PlayerController {
        PlayerController::new(Vec3::ZERO, &GameConfig::default())
    }

    fn press(p: &mut PlayerController, action: MoveAction) {
        p.input_mut().set(action, true);
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn intent_cancels_opposing_keys() {
        let mut input = InputState::default();
        input.forward = true;
        input.backward = true;
        assert_eq!(input.intent(), Vec3::ZERO);
        input.right = true;
        assert_eq!(input.intent(), Vec3::X);
    }

    #[test]
    fn spawns_at_eye_height() {
        let p = PlayerController::new(Vec3::new(3.0, 0.0, -1.0), &GameConfig::default());
        assert_eq!(p.position(), Vec3::new(3.0, 1.8, -1.0));
    }

    #[test]
    fn forward_moves_along_view_scaled_by_dt() {
        let mut p = player();
        press(&mut p, MoveAction::Forward);
        let outcome = p.step(0.5, &OpenSpace);
        // yaw 0 faces +X, default speed 7.2 u/s over half a second.
        assert!(matches!(outcome, MoveOutcome::Moved(_)));
        assert!(approx(p.position(), Vec3::new(3.6, 1.8, 0.0)));
    }

    #[test]
    fn displacement_scales_linearly_with_dt() {
        let mut p = player();
        press(&mut p, MoveAction::Right);
        let a = p.desired_displacement(1.0 / 60.0).unwrap();
        let b = p.desired_displacement(1.0 / 30.0).unwrap();
        assert!(approx(a * 2.0, b));
    }

    #[test]
    fn strafing_follows_yaw() {
        let mut p = player();
        p.set_orientation(FRAC_PI_2, 0.0);
        // Facing +Z; right is -X.
        press(&mut p, MoveAction::Right);
        p.step(1.0, &OpenSpace);
        assert!(approx(p.position(), Vec3::new(-7.2, 1.8, 0.0)));
    }

    #[test]
    fn diagonal_is_normalized() {
        let mut p = player();
        press(&mut p, MoveAction::Forward);
        press(&mut p, MoveAction::Left);
        let d = p.desired_displacement(1.0).unwrap();
        assert!((d.length() - 7.2).abs() < 1e-4);
    }

    #[test]
    fn pitch_never_adds_vertical_motion() {
        let mut p = player();
        p.set_orientation(0.3, 1.4);
        press(&mut p, MoveAction::Forward);
        let d = p.desired_displacement(1.0).unwrap();
        assert_eq!(d.y, 0.0);
        assert!((d.length() - 7.2).abs() < 1e-4);
    }

    #[test]
    fn no_keys_no_motion() {
        let mut p = player();
        assert_eq!(p.step(1.0, &OpenSpace), MoveOutcome::Idle);
        assert_eq!(p.position(), Vec3::new(0.0, 1.8, 0.0));
    }

    #[test]
    fn wall_within_clearance_blocks_whole_step() {
        let mut p = player();
        press(&mut p, MoveAction::Forward);
        // Step of 0.12 toward a wall 0.4 away would leave 0.28 < 0.35.
        let outcome = p.step(1.0 / 60.0, &WallAt(0.4));
        assert_eq!(outcome, MoveOutcome::Blocked { hit_distance: 0.4 });
        assert_eq!(p.position(), Vec3::new(0.0, 1.8, 0.0));
    }

    #[test]
    fn wall_beyond_clearance_allows_step() {
        let mut p = player();
        press(&mut p, MoveAction::Forward);
        // 0.12 step, wall at 0.7 inside the 0.72 ray: 0.58 clearance left.
        let outcome = p.step(1.0 / 60.0, &WallAt(0.7));
        assert!(matches!(outcome, MoveOutcome::Moved(_)));
        assert!(approx(p.position(), Vec3::new(0.12, 1.8, 0.0)));
    }

    #[test]
    fn never_commits_into_clearance() {
        for wall in [0.0, 0.1, 0.35, 0.36, 0.47, 0.5, 0.6, 0.8] {
            let mut p = player();
            press(&mut p, MoveAction::Forward);
            let step = 0.12;
            if let MoveOutcome::Moved(d) = p.step(1.0 / 60.0, &WallAt(wall)) {
                assert!(wall - d.length() > 0.35, "wall at {wall} step {step}");
            }
        }
    }

    #[test]
    fn overflowing_step_is_discarded() {
        let mut p = player();
        p.speed_mut().set(-1e30);
        press(&mut p, MoveAction::Forward);
        // 1e30 / 60 squared overflows, so the step length is infinite.
        let outcome = p.step(1.0 / 60.0, &OpenSpace);
        assert!(matches!(outcome, MoveOutcome::Blocked { .. }));
        assert_eq!(p.position(), Vec3::new(0.0, 1.8, 0.0));
    }

    #[test]
    fn height_is_pinned_every_frame() {
        let mut p = player();
        p.position.y = 4.0;
        p.step(0.016, &OpenSpace);
        assert_eq!(p.position().y, 1.8);
    }

    #[test]
    fn speed_clamps_to_max() {
        let mut s = SpeedProfile::new(SpeedConfig {
            default: 10.0,
            max: 50.0,
        });
        s.set(100.0);
        assert_eq!(s.current(), 50.0);
        s.set(20.0);
        assert_eq!(s.current(), 20.0);
        s.set(f32::NAN);
        assert_eq!(s.current(), 20.0);
        s.set(f32::NEG_INFINITY);
        assert_eq!(s.current(), 20.0);
        s.reset();
        assert_eq!(s.current(), 10.0);
    }

    #[test]
    fn speed_values_at_or_below_max_are_exact() {
        let mut s = SpeedProfile::new(SpeedConfig {
            default: 1.0,
            max: 50.0,
        });
        for v in [-3.0, 0.0, 0.5, 49.99, 50.0] {
            s.set(v);
            assert_eq!(s.current(), v);
        }
    }

    #[test]
    fn pitch_stays_clamped_under_any_drag() {
        let mut p = player();
        for dy in [1000.0, -5000.0, 370.0, 370.0, 370.0, -1.0, 99999.0] {
            p.rotate(3.0, dy, 0.016);
            assert!(p.pitch().abs() <= 1.48);
        }
        assert_eq!(p.pitch(), 1.48);
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut p = player();
        for _ in 0..10 {
            p.rotate(1000.0, 0.0, 0.016);
        }
        assert!((p.yaw() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn dt_scaled_look() {
        let mut config = GameConfig::default();
        config.look.scale_by_dt = true;
        let mut p = PlayerController::new(Vec3::ZERO, &config);
        p.rotate(10.0, 0.0, 0.5);
        assert!((p.yaw() - 0.2).abs() < 1e-6);
    }
}
