// Command types - Communication caller → engine

use crate::sequencer::pattern::{Chord, DrumInstrument};
use crate::synth::delay::DelayField;
use crate::synth::envelope::EnvelopeField;
use crate::synth::lfo::LfoField;
use crate::synth::oscillator::{OscillatorField, WaveformType};
use serde::{Deserialize, Serialize};

/// Transport commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportCommand {
    Play,
    Pause,
    Reset,
}

/// One parameter update, tagged by parameter group
///
/// Wire shape: `{"group": "<group>", "payload": <group-specific value>}`.
/// Field-level groups carry `{"field": "<name>", "value": <value>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "group", content = "payload", rename_all = "camelCase")]
pub enum ParameterUpdate {
    /// Tempo in BPM
    Tempo(f64),
    /// Replace the whole melody
    Melody(Vec<Chord>),
    /// Flip one drum cell
    DrumToggle {
        instrument: DrumInstrument,
        step: usize,
    },
    /// Voice waveform
    Waveform(WaveformType),
    Envelope(EnvelopeField),
    Lfo(LfoField),
    Oscillator(OscillatorField),
    Delay(DelayField),
}

impl ParameterUpdate {
    /// Decode an update from its JSON wire form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Group name as it appears on the wire
    pub fn group(&self) -> &'static str {
        match self {
            ParameterUpdate::Tempo(_) => "tempo",
            ParameterUpdate::Melody(_) => "melody",
            ParameterUpdate::DrumToggle { .. } => "drumToggle",
            ParameterUpdate::Waveform(_) => "waveform",
            ParameterUpdate::Envelope(_) => "envelope",
            ParameterUpdate::Lfo(_) => "lfo",
            ParameterUpdate::Oscillator(_) => "oscillator",
            ParameterUpdate::Delay(_) => "delay",
        }
    }
}

/// Everything the engine accepts over its command channel
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Transport(TransportCommand),
    Update(ParameterUpdate),
}

impl From<TransportCommand> for EngineCommand {
    fn from(command: TransportCommand) -> Self {
        EngineCommand::Transport(command)
    }
}

impl From<ParameterUpdate> for EngineCommand {
    fn from(update: ParameterUpdate) -> Self {
        EngineCommand::Update(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tempo() {
        let update = ParameterUpdate::from_json(r#"{"group":"tempo","payload":128}"#).unwrap();
        assert_eq!(update, ParameterUpdate::Tempo(128.0));
    }

    #[test]
    fn test_decode_drum_toggle() {
        let update = ParameterUpdate::from_json(
            r#"{"group":"drumToggle","payload":{"instrument":"kick","step":3}}"#,
        )
        .unwrap();
        assert_eq!(
            update,
            ParameterUpdate::DrumToggle {
                instrument: DrumInstrument::Kick,
                step: 3
            }
        );
        assert_eq!(update.group(), "drumToggle");
    }

    #[test]
    fn test_decode_field_update() {
        let update = ParameterUpdate::from_json(
            r#"{"group":"envelope","payload":{"field":"attack","value":0.05}}"#,
        )
        .unwrap();
        assert_eq!(update, ParameterUpdate::Envelope(EnvelopeField::Attack(0.05)));

        let update = ParameterUpdate::from_json(
            r#"{"group":"lfo","payload":{"field":"waveform","value":"triangle"}}"#,
        )
        .unwrap();
        assert_eq!(update, ParameterUpdate::Lfo(LfoField::Waveform(WaveformType::Triangle)));
    }

    #[test]
    fn test_decode_melody() {
        let update = ParameterUpdate::from_json(
            r#"{"group":"melody","payload":[[220.0,277.18],[246.94]]}"#,
        )
        .unwrap();
        assert_eq!(
            update,
            ParameterUpdate::Melody(vec![vec![220.0, 277.18], vec![246.94]])
        );
    }

    #[test]
    fn test_unknown_group_rejected() {
        assert!(ParameterUpdate::from_json(r#"{"group":"reverb","payload":0.5}"#).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ParameterUpdate::from_json(
            r#"{"group":"delay","payload":{"field":"wetness","value":0.5}}"#
        )
        .is_err());
    }

    #[test]
    fn test_transport_command_names() {
        let command: TransportCommand = serde_json::from_str("\"pause\"").unwrap();
        assert_eq!(command, TransportCommand::Pause);
    }
}
