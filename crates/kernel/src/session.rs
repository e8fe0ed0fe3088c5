use crate::clock::SessionClock;
use crate::collectible::CollectibleSet;
use crate::collision::{CollisionQuery, MazeCollider};
use crate::maze::{LayoutError, MazeLayout, MazeModel};
use crate::player::{MoveOutcome, PlayerController};
use crate::spawn::{SpawnError, SpawnPool};
use glam::Vec3;
use mazerun_common::{ConfigError, GameConfig};
use mazerun_protocol::{Command, CommandQueue, ElapsedTime, EventSink, GameEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

/// Setup failures. All of them are fatal for the session and surface from
/// [`SessionBuilder::build`]; nothing here is retried per frame.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no maze layout supplied")]
    MissingLayout,
    #[error("no collision query configured")]
    MissingCollider,
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

enum ColliderChoice {
    Unset,
    Maze,
    Custom(Box<dyn CollisionQuery>),
}

/// Explicit placement that bypasses the spawn pool.
struct Placement {
    player: Vec3,
    collectibles: Vec<Vec3>,
}

/// Assembles a [`Session`] and validates its preconditions.
pub struct SessionBuilder {
    config: GameConfig,
    layout: Option<MazeLayout>,
    collider: ColliderChoice,
    seed: Option<u64>,
    clock: SessionClock,
    placement: Option<Placement>,
}

impl SessionBuilder {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            layout: None,
            collider: ColliderChoice::Unset,
            seed: None,
            clock: SessionClock::wall(),
            placement: None,
        }
    }

    pub fn layout(mut self, layout: MazeLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Collide against the maze's own walls, floor and ceiling.
    pub fn maze_collider(mut self) -> Self {
        self.collider = ColliderChoice::Maze;
        self
    }

    /// Collide through a host-supplied query, e.g. an engine's ray picker.
    pub fn collider(mut self, query: impl CollisionQuery + 'static) -> Self {
        self.collider = ColliderChoice::Custom(Box::new(query));
        self
    }

    /// Seed placement randomness. Without a seed the RNG draws from OS entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn clock(mut self, clock: SessionClock) -> Self {
        self.clock = clock;
        self
    }

    /// Use fixed world positions instead of drawing from the spawn pool.
    pub fn place(mut self, player: Vec3, collectibles: Vec<Vec3>) -> Self {
        self.placement = Some(Placement {
            player,
            collectibles,
        });
        self
    }

    pub fn build(self) -> Result<Session, SessionError> {
        let layout = self.layout.ok_or(SessionError::MissingLayout)?;
        self.config.validate()?;
        let config = self.config;
        let maze = Arc::new(MazeModel::new(layout)?);

        let collision: Box<dyn CollisionQuery> = match self.collider {
            ColliderChoice::Unset => return Err(SessionError::MissingCollider),
            ColliderChoice::Maze => Box::new(MazeCollider::new(Arc::clone(&maze), &config)),
            ColliderChoice::Custom(query) => query,
        };

        let placement = match self.placement {
            Some(placement) => placement,
            None => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                draw_placement(&maze, &config, &mut rng)?
            }
        };

        let player = PlayerController::new(placement.player, &config);
        let collectibles = CollectibleSet::new(placement.collectibles, config.pickup_radius_sq);
        tracing::info!(
            width = maze.width(),
            height = maze.height(),
            walls = maze.walls().len(),
            collectibles = collectibles.spawned(),
            player = ?player.position(),
            "session ready"
        );

        let outbox = vec![
            GameEvent::Ready,
            GameEvent::Spawned {
                count: collectibles.spawned(),
            },
        ];
        Ok(Session {
            maze,
            config,
            player,
            collectibles,
            collision,
            clock: self.clock,
            active: true,
            xray: false,
            frame: 0,
            outbox,
        })
    }
}

/// One player spawn, then a collectible for every third remaining spawn point.
fn draw_placement(
    maze: &MazeModel,
    config: &GameConfig,
    rng: &mut StdRng,
) -> Result<Placement, SpawnError> {
    let cells = if maze.spawns().is_empty() {
        tracing::warn!(center = %maze.center(), "maze has no spawn points, using its centre");
        vec![maze.center()]
    } else {
        maze.spawns().to_vec()
    };
    let mut pool = SpawnPool::new(cells);
    let start = pool.draw_one(rng)?;
    let count = pool.len() / 3;
    let collectibles = pool
        .draw_many(rng, count)?
        .into_iter()
        .map(|c| maze.cell_to_world(c, config.cell_size, config.collectible_height))
        .collect();
    Ok(Placement {
        player: maze.cell_to_world(start, config.cell_size, config.eye_height),
        collectibles,
    })
}

/// One play-through: owns the player, collectibles and activity gate, and
/// buffers outbound events until the host drains them.
///
/// Protocol handling and the frame step both take `&mut self`, so they can
/// only run one at a time on the owning thread.
pub struct Session {
    maze: Arc<MazeModel>,
    config: GameConfig,
    player: PlayerController,
    collectibles: CollectibleSet,
    collision: Box<dyn CollisionQuery>,
    clock: SessionClock,
    active: bool,
    xray: bool,
    frame: u64,
    outbox: Vec<GameEvent>,
}

impl Session {
    /// Start assembling a session with the given tunables.
    pub fn builder(config: GameConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// The validated maze this session runs in.
    pub fn maze(&self) -> &MazeModel {
        &self.maze
    }

    /// Tunables fixed at build time.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Player position, orientation, held keys and speed.
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Collectibles still in the world.
    pub fn collectibles(&self) -> &CollectibleSet {
        &self.collectibles
    }

    /// Whether frames currently move the player and check pickups.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Renderer-facing see-through flag. The simulation never reads it.
    pub fn xray_enabled(&self) -> bool {
        self.xray
    }

    /// Frames stepped so far, active or not.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Time since the session started, as reported by `get_time`.
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// True once `win` has been emitted.
    pub fn is_won(&self) -> bool {
        self.collectibles.win_announced()
    }

    /// Events emitted but not yet drained.
    pub fn events(&self) -> &[GameEvent] {
        &self.outbox
    }

    /// Take all pending events in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Drain pending events into a transport.
    pub fn flush_to(&mut self, sink: &mut dyn EventSink) {
        for event in self.outbox.drain(..) {
            sink.emit(&event);
        }
    }

    /// Decode and apply one raw wire message. Malformed input is ignored.
    pub fn handle_message(&mut self, raw: &str) {
        if let Some(command) = Command::parse(raw) {
            self.apply(command);
        }
    }

    /// Apply one decoded command immediately.
    pub fn apply(&mut self, command: Command) {
        tracing::debug!(%command, active = self.active, "apply");
        match command {
            Command::Move { action, pressed } => {
                if self.active {
                    self.player.input_mut().set(action, pressed);
                }
            }
            Command::SetSpeed { value } => self.player.speed_mut().set(value),
            Command::ResetSpeed => self.player.speed_mut().reset(),
            Command::Active { active } => {
                if !active {
                    self.player.input_mut().clear();
                }
                self.active = active;
            }
            Command::XRay { enabled } => self.xray = enabled,
            Command::GetTime => self.outbox.push(GameEvent::Time {
                elapsed: ElapsedTime(self.clock.elapsed()),
            }),
        }
    }

    /// Apply everything queued since the last frame, in arrival order.
    pub fn apply_queued(&mut self, queue: &mut CommandQueue) {
        for command in queue.drain() {
            self.apply(command);
        }
    }

    /// Pointer-drag look sample. Ignored while inactive.
    pub fn look(&mut self, dx: f32, dy: f32, dt: f32) {
        if self.active {
            self.player.rotate(dx, dy, dt);
        }
    }

    /// Drain the queue, then advance one frame.
    pub fn run_frame(&mut self, queue: &mut CommandQueue, dt: f32) {
        self.apply_queued(queue);
        self.step(dt);
    }

    /// Advance one frame of `dt` seconds: move, then collect, then check for the win.
    ///
    /// Events land in the outbox in the order collect, remaining, win.
    pub fn step(&mut self, dt: f32) {
        let _span = tracing::info_span!("session_step", frame = self.frame).entered();
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "invalid frame delta, treating as zero");
            0.0
        };
        self.clock.advance(dt);
        self.frame += 1;
        if !self.active {
            return;
        }

        if let MoveOutcome::Moved(d) = self.player.step(dt, self.collision.as_ref()) {
            tracing::trace!(dx = d.x, dz = d.z, pos = ?self.player.position(), "moved");
        }

        for pickup in self.collectibles.check_pickups(self.player.position()) {
            tracing::info!(id = %pickup.id, remaining = pickup.remaining, "collectible picked up");
            self.outbox.push(GameEvent::Collect { id: pickup.id });
            self.outbox.push(GameEvent::Remaining {
                count: pickup.remaining,
            });
        }
        if self.collectibles.take_win() {
            tracing::info!(frame = self.frame, elapsed = ?self.clock.elapsed(), "all collectibles found");
            self.outbox.push(GameEvent::Win);
        }
    }
}
