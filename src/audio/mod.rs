// Module audio - Horloge audio et interface du moteur de rendu

pub mod clock;
pub mod renderer;
