use std::time::Duration;

use tracing_subscriber::EnvFilter;

use goobers_core::player::Character;
use goobers_core::record::records_to_json;
use goobers_core::roster::Roster;
use goobers_core::time::timestamp_now;
use goobers_host::config::HostConfig;
use goobers_host::session::{ArenaBroadcast, ArenaSessionConfig, spawn_arena_session};
use goobers_host::sink::TracingSink;
use goobers_race::config::RaceConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Goobers headless race starting");

    let host = HostConfig::load();
    let race = RaceConfig::load();

    let mut roster = Roster::new();
    for (slot, character) in Character::presets()
        .into_iter()
        .take(host.demo_players)
        .enumerate()
    {
        if let Err(e) = roster.assign(slot, character) {
            tracing::error!(slot, error = %e, "Could not fill slot");
        }
    }
    if !roster.can_start() {
        tracing::error!("No racers on the roster, nothing to run");
        return;
    }

    let players = roster.players();
    let timeout = Duration::from_secs(host.demo_timeout_secs);
    let mut handle = spawn_arena_session(
        ArenaSessionConfig {
            players: players.clone(),
            race,
            map: None,
            host,
        },
        Box::new(TracingSink),
    );

    // Every scripted racer keeps running right, jumping and dashing.
    for player in &players {
        handle.key_down(&player.controls.right);
        handle.key_down(&player.controls.jump);
        handle.key_down(&player.controls.dash);
    }

    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);
    let mut stopping = false;
    let mut frames: u64 = 0;

    loop {
        tokio::select! {
            msg = handle.broadcasts.recv() => match msg {
                Some(ArenaBroadcast::Snapshot(_)) => frames += 1,
                Some(ArenaBroadcast::Effect(kind)) => tracing::debug!(?kind, "Effect"),
                Some(ArenaBroadcast::Outcome(outcome)) => {
                    tracing::info!(
                        winner = %outcome.winner,
                        elapsed = outcome.elapsed.as_secs_f64(),
                        "Race over"
                    );
                    for s in &outcome.standings {
                        tracing::info!(
                            place = s.place,
                            player = %s.player_id,
                            character = %s.character.name,
                            time = ?s.finish_time.map(|t| t.as_secs_f64()),
                            "Standing"
                        );
                    }
                    match records_to_json(&outcome.records(&timestamp_now())) {
                        Ok(json) => tracing::info!(records = %json, "Race results"),
                        Err(e) => tracing::error!(error = %e, "Failed to encode race results"),
                    }
                },
                Some(ArenaBroadcast::Stopped) | None => break,
            },
            _ = &mut deadline, if !stopping => {
                tracing::warn!(secs = timeout.as_secs(), "Nobody finished in time, stopping");
                handle.stop();
                stopping = true;
            }
        }
    }

    if let Err(e) = handle.join.await {
        tracing::error!(error = %e, "Arena task failed");
    }
    tracing::info!(frames, "Goobers headless race finished");
}
