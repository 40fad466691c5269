// Stepseq - Library exports for tests, benchmarks and the demo binary

pub mod audio;
pub mod config;
pub mod engine;
pub mod messaging;
pub mod sequencer;
pub mod state;
pub mod synth;

// Re-export commonly used types for convenience
pub use audio::clock::{AudioClock, ManualClock, SampleClock};
pub use audio::renderer::{
    RecordingRenderer, RendererError, RendererFactory, SoundRenderer, TriggerDescriptor,
    TriggerKind,
};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineError, EngineResult};
pub use messaging::channels::{
    create_command_channel, create_notification_channel, create_step_channel,
};
pub use messaging::command::{EngineCommand, ParameterUpdate, TransportCommand};
pub use sequencer::{DrumInstrument, StepSink, Tempo, TimerHandle, TransportState};
pub use state::{ParameterError, ParameterState};
pub use synth::envelope::AdsrParams;
pub use synth::oscillator::WaveformType;
