use crate::render::Rgb;

// Shell colours, named after the compound that burns that colour
pub const PALETTE: [Rgb; 10] = [
    Rgb(255, 30, 30),   // Strontium (intense red)
    Rgb(220, 50, 50),   // Lithium (medium red)
    Rgb(255, 140, 0),   // Calcium (orange)
    Rgb(255, 220, 0),   // Sodium (yellow)
    Rgb(0, 255, 100),   // Barium (green)
    Rgb(60, 120, 255),  // Copper halides (blue)
    Rgb(100, 100, 255), // Caesium (indigo)
    Rgb(180, 50, 255),  // Potassium/Rubidium (violet)
    Rgb(255, 200, 50),  // Charcoal/Iron (gold)
    Rgb(255, 255, 255), // Titanium/Magnesium (white)
];

/// Night sky the show fades toward when no `--bg-color` is given.
pub const NIGHT_SKY: Rgb = Rgb(0, 0, 0);

pub fn pick(rng: &mut fastrand::Rng) -> Rgb {
    PALETTE[rng.usize(0..PALETTE.len())]
}
