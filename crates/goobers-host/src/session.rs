use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use goobers_core::events::{EffectKind, EffectSink};
use goobers_core::player::Player;
use goobers_race::GooberRace;
use goobers_race::arena::Arena;
use goobers_race::config::RaceConfig;
use goobers_race::map::RaceMap;
use goobers_race::scoring::RaceOutcome;

use crate::config::HostConfig;

/// Commands sent from the input source to the frame loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaCommand {
    KeyDown(String),
    KeyUp(String),
    Stop,
}

/// Broadcasts sent from the frame loop to the render target.
#[derive(Debug, Clone)]
pub enum ArenaBroadcast {
    /// MessagePack-encoded `RaceSnapshot`, one per frame.
    Snapshot(Bytes),
    Effect(EffectKind),
    /// Sent once when the race ends, just before `Stopped`.
    Outcome(RaceOutcome),
    /// The loop has exited and the arena is torn down. Always last.
    Stopped,
}

/// Everything needed to start one arena visit.
pub struct ArenaSessionConfig {
    pub players: Vec<Player>,
    pub race: RaceConfig,
    /// Reuse a map when re-entering the arena; `None` picks one.
    pub map: Option<RaceMap>,
    pub host: HostConfig,
}

pub struct ArenaHandle {
    pub commands: mpsc::UnboundedSender<ArenaCommand>,
    pub broadcasts: mpsc::UnboundedReceiver<ArenaBroadcast>,
    pub join: JoinHandle<()>,
}

impl ArenaHandle {
    pub fn key_down(&self, key: &str) {
        let _ = self.commands.send(ArenaCommand::KeyDown(key.to_string()));
    }

    pub fn key_up(&self, key: &str) {
        let _ = self.commands.send(ArenaCommand::KeyUp(key.to_string()));
    }

    /// Ask the loop to stop. Harmless once the loop has already exited.
    pub fn stop(&self) {
        let _ = self.commands.send(ArenaCommand::Stop);
    }
}

/// Spawn the arena frame loop as a tokio task.
pub fn spawn_arena_session(config: ArenaSessionConfig, sink: Box<dyn EffectSink>) -> ArenaHandle {
    let race = match config.map {
        Some(map) => GooberRace::with_map(config.players, config.race, map),
        None => GooberRace::new(config.players, config.race),
    };
    let arena = Arena::new(race, sink, config.host.audio.clone());

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let host = config.host;
    let join = tokio::spawn(async move {
        run_frame_loop(arena, &host, cmd_rx, broadcast_tx).await;
    });

    ArenaHandle {
        commands: cmd_tx,
        broadcasts: broadcast_rx,
        join,
    }
}

/// Step the arena once per frame until the race ends or a stop is requested.
async fn run_frame_loop(
    mut arena: Arena,
    host: &HostConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<ArenaCommand>,
    broadcast_tx: mpsc::UnboundedSender<ArenaBroadcast>,
) {
    let mut interval = tokio::time::interval(host.frame_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let started = Instant::now();

    tracing::info!(
        frame_rate_hz = host.frame_rate_hz,
        map = %arena.race().map().name,
        "Arena session started"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = arena.step(started.elapsed());

                for kind in report.effects {
                    let _ = broadcast_tx.send(ArenaBroadcast::Effect(kind));
                }

                match arena.snapshot().encode() {
                    Ok(data) => {
                        let _ = broadcast_tx.send(ArenaBroadcast::Snapshot(Bytes::from(data)));
                    },
                    Err(e) => tracing::error!(
                        frame = arena.frame(), error = %e, "Failed to encode snapshot"
                    ),
                }

                if report.ended {
                    if let Some(outcome) = arena.outcome() {
                        let _ = broadcast_tx.send(ArenaBroadcast::Outcome(outcome.clone()));
                    }
                    break;
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ArenaCommand::KeyDown(key)) => arena.on_key_down(&key),
                    Some(ArenaCommand::KeyUp(key)) => arena.on_key_up(&key),
                    Some(ArenaCommand::Stop) | None => {
                        tracing::info!(frame = arena.frame(), "Arena session stopped");
                        break;
                    },
                }
            }
        }
    }

    arena.teardown();
    let _ = broadcast_tx.send(ArenaBroadcast::Stopped);
}
