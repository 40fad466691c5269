use ringbuf::traits::{Consumer, Producer};
use std::time::{Duration, Instant};
use stepseq::audio::clock::AudioClock;
use stepseq::audio::renderer::{
    RendererResult, SoundRenderer, TriggerDescriptor, TriggerKind,
};
use stepseq::messaging::notification::NotificationLevel;
use stepseq::sequencer::PATTERN_LENGTH;
use stepseq::{
    Engine, EngineCommand, EngineConfig, ParameterUpdate, TransportCommand,
    create_command_channel, create_notification_channel, create_step_channel,
};

const COMMAND_RINGBUFFER_CAPACITY: usize = 64;
const STEP_RINGBUFFER_CAPACITY: usize = 256;
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 64;

/// Renderer stand-in: logs triggers against a wall-clock audio time
struct LogRenderer {
    started: Instant,
}

impl AudioClock for LogRenderer {
    fn now_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl SoundRenderer for LogRenderer {
    fn trigger(&mut self, trigger: &TriggerDescriptor) {
        let voice = match trigger.kind {
            TriggerKind::Melodic { waveform } => format!("{:?} {:.2} Hz", waveform, trigger.frequency),
            TriggerKind::Percussive { instrument } => instrument.to_string(),
        };
        log::debug!(
            "step {:>3} @ {:.3}s..{:.3}s {}",
            trigger.step,
            trigger.start_seconds,
            trigger.stop_seconds,
            voice
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                return;
            }
        },
        None => EngineConfig::default(),
    };

    let started = Instant::now();
    let factory = move || -> RendererResult<LogRenderer> { Ok(LogRenderer { started }) };

    let (step_tx, mut step_rx) = create_step_channel(STEP_RINGBUFFER_CAPACITY);
    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);
    let (mut command_tx, mut command_rx) = create_command_channel(COMMAND_RINGBUFFER_CAPACITY);

    let mut engine = match Engine::new(config, factory) {
        Ok(engine) => engine
            .with_step_sink(step_tx)
            .with_notifications(notification_tx),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    // (time, command) script standing in for a UI
    let script: Vec<(u64, EngineCommand)> = vec![
        (0, TransportCommand::Play.into()),
        (2000, ParameterUpdate::Tempo(320.0).into()),
        (3000, TransportCommand::Pause.into()),
        (4000, TransportCommand::Play.into()),
        (5000, TransportCommand::Reset.into()),
        (5500, TransportCommand::Play.into()),
        (7000, TransportCommand::Reset.into()),
    ];
    let end = Duration::from_millis(7500);
    let mut script = script.into_iter().peekable();

    while started.elapsed() < end {
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;

        while let Some((at, _)) = script.peek() {
            if (*at as f64) > now_ms {
                break;
            }
            if let Some((_, command)) = script.next() {
                if command_tx.try_push(command).is_err() {
                    log::warn!("Command channel full");
                }
            }
        }

        engine.drain_commands(&mut command_rx);
        engine.tick(now_ms);

        while let Some(step) = step_rx.try_pop() {
            let cells: String = (0..PATTERN_LENGTH as u64)
                .map(|i| if i == step % PATTERN_LENGTH as u64 { '#' } else { '.' })
                .collect();
            println!("{} {}", cells, step);
        }
        while let Some(notification) = notification_rx.try_pop() {
            // Transport changes are already in the log; only surface problems
            if notification.is_at_least(NotificationLevel::Warning) {
                eprintln!("{notification}");
            }
        }

        // Sleep until the next timer or scripted command, whichever comes first
        let next_command = script.peek().map(|(at, _)| *at as f64);
        let wake_ms = [engine.next_deadline_ms(), next_command]
            .into_iter()
            .flatten()
            .fold(now_ms + 50.0, f64::min);
        let sleep_ms = (wake_ms - started.elapsed().as_secs_f64() * 1000.0).max(1.0);
        std::thread::sleep(Duration::from_secs_f64(sleep_ms / 1000.0));
    }

    println!("\n=== Stopped at step {} ===", engine.current_step());
}
