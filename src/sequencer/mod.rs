// Sequencer module
// Step timeline, patterns, transport and the lookahead scheduler

pub mod pattern;
pub mod resolver;
pub mod scheduler;
pub mod timeline;
pub mod timer;
pub mod transport;

pub use pattern::{DrumInstrument, DrumPatterns, Melody, PATTERN_LENGTH};
pub use resolver::{ResolvedNote, ResolvedStep, resolve};
pub use scheduler::{StepScheduler, StepSink};
pub use timeline::Tempo;
pub use timer::{TimerHandle, TimerQueue};
pub use transport::{Transport, TransportState};
