use mazerun_common::GridCoord;
use mazerun_kernel::Session;
use std::collections::BTreeSet;
use std::time::Duration;

/// Read-only queries against a session for debugging and host tooling.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let player = session.player();
        let p = player.position();
        SessionSummary {
            frame: session.frame(),
            elapsed: session.elapsed(),
            active: session.is_active(),
            position: [p.x, p.y, p.z],
            yaw: player.yaw(),
            pitch: player.pitch(),
            speed: player.speed().current(),
            spawned: session.collectibles().spawned(),
            remaining: session.collectibles().remaining(),
            won: session.is_won(),
            pending_events: session.events().len(),
        }
    }

    /// ASCII top-down map, one row per grid line.
    ///
    /// `#` wall, `o` live collectible, `@` player, `.` open floor. The player
    /// wins over a collectible sharing its cell.
    pub fn minimap(session: &Session) -> String {
        let maze = session.maze();
        let cell_size = session.config().cell_size;
        let collectibles: BTreeSet<GridCoord> = session
            .collectibles()
            .alive()
            .iter()
            .map(|c| maze.world_to_cell(c.position, cell_size))
            .collect();
        let player = maze.world_to_cell(session.player().position(), cell_size);

        let mut out = String::with_capacity(((maze.width() + 1) * maze.height()) as usize);
        for y in 0..maze.height() as i32 {
            for x in 0..maze.width() as i32 {
                let cell = GridCoord::new(x, y);
                let ch = if cell == player {
                    '@'
                } else if maze.is_wall(cell) {
                    '#'
                } else if collectibles.contains(&cell) {
                    'o'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub frame: u64,
    pub elapsed: Duration,
    pub active: bool,
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub spawned: usize,
    pub remaining: usize,
    pub won: bool,
    pub pending_events: usize,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session: frame={} elapsed={:.2}s active={} pos=({:.2}, {:.2}, {:.2}) yaw={:.3} pitch={:.3} speed={:.2} collectibles={}/{} won={} pending_events={}",
            self.frame,
            self.elapsed.as_secs_f32(),
            self.active,
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw,
            self.pitch,
            self.speed,
            self.spawned - self.remaining,
            self.spawned,
            self.won,
            self.pending_events,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use mazerun_common::GameConfig;
    use mazerun_kernel::{MazeLayout, OpenSpace, SessionClock};

    fn session() -> Session {
        let layout = MazeLayout {
            width: 4,
            height: 3,
            walls: vec![GridCoord::new(0, 0), GridCoord::new(3, 2)],
            spawns: vec![],
        };
        // Player in cell (1,1), collectible in cell (2,1).
        Session::builder(GameConfig::default())
            .layout(layout)
            .collider(OpenSpace)
            .clock(SessionClock::simulated())
            .place(Vec3::new(-1.0, 1.8, 0.0), vec![Vec3::new(1.0, 1.5, 0.0)])
            .build()
            .unwrap()
    }

    #[test]
    fn summary_fresh_session() {
        let s = session();
        let summary = SessionInspector::summary(&s);
        assert_eq!(summary.frame, 0);
        assert!(summary.active);
        assert_eq!(summary.spawned, 1);
        assert_eq!(summary.remaining, 1);
        assert_eq!(summary.pending_events, 2); // ready + spawned
        assert_eq!(summary.position, [-1.0, 1.8, 0.0]);
    }

    #[test]
    fn summary_tracks_frames() {
        let mut s = session();
        s.step(0.5);
        s.step(0.5);
        let summary = SessionInspector::summary(&s);
        assert_eq!(summary.frame, 2);
        assert_eq!(summary.elapsed, Duration::from_secs(1));
    }

    #[test]
    fn summary_display() {
        let s = session();
        let text = format!("{}", SessionInspector::summary(&s));
        assert!(text.contains("frame=0"));
        assert!(text.contains("collectibles=0/1"));
    }

    #[test]
    fn minimap_marks_everything() {
        let s = session();
        assert_eq!(SessionInspector::minimap(&s), "#...\n.@o.\n...#\n");
    }

    #[test]
    fn minimap_drops_collected_items() {
        let mut s = session();
        s.handle_message("move|forward|true");
        for _ in 0..10 {
            s.step(1.0 / 60.0);
        }
        assert!(s.collectibles().is_empty());
        assert!(!SessionInspector::minimap(&s).contains('o'));
    }
}
