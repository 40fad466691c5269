// Module synthèse - Paramètres de voix transmis au moteur de rendu

pub mod delay;
pub mod envelope;
pub mod lfo;
pub mod oscillator;
