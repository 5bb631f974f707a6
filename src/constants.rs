//! Physical and astronomical constants in CGS units.

/// Newton's gravitational constant (cm^3 g^-1 s^-2)
pub const G: f64 = 6.67259e-8;

/// Solar mass (g)
pub const M_SUN: f64 = 1.98892e33;

/// Solar radius (cm)
pub const R_SUN: f64 = 6.955e10;

/// Earth radius (cm)
pub const R_EARTH: f64 = 6.3781e8;

/// Earth mass (g)
pub const M_EARTH: f64 = 5.97219e27;

/// Astronomical unit (cm)
pub const AU: f64 = 1.49597871e13;

/// Jupiter mass (g)
pub const M_JUP: f64 = 1.899e30;

/// Boltzmann constant (erg K^-1)
pub const K_B: f64 = 1.380658e-16;

/// Proton mass (g)
pub const M_P: f64 = 1.6726231e-24;

/// Hydrogen atom mass (g)
pub const M_H: f64 = 1.6733e-24;

/// Speed of light (cm s^-1)
pub const C: f64 = 2.99792458e10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydrogen_heavier_than_proton() {
        // mH = mp + me minus binding energy; the difference is tiny.
        assert!(M_H > M_P);
        assert!((M_H - M_P) / M_P < 1e-3);
    }

    #[test]
    fn test_mass_ordering() {
        assert!(M_SUN > M_JUP);
        assert!(M_JUP > M_EARTH);
    }

    #[test]
    fn test_au_in_solar_radii() {
        // 1 AU is roughly 215 solar radii.
        let ratio = AU / R_SUN;
        assert!((214.0..217.0).contains(&ratio));
    }
}
