// dl-core/src/units.rs

use uom::si::f64::{
    Length as UomLength, Mass as UomMass, Power as UomPower, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Power = UomPower;
pub type Volume = UomVolume;

#[inline]
pub fn liters(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

/// Extract a volume back to liters.
#[inline]
pub fn as_liters(v: Volume) -> f64 {
    use uom::si::volume::liter;
    v.get::<liter>()
}

pub mod constants {
    /// Gravitational acceleration used by the friction and rolling
    /// resistance formulas (m/s²).
    pub const G_MPS2: f64 = 9.81;

    /// m/s to km/h.
    pub const MPS_TO_KMH: f64 = 3.6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = liters(50.0);
        let _p = kw(150.0);
        let _l = m(0.3);
        let _mass = kg(1200.0);
    }

    #[test]
    fn liters_round_trip() {
        let v = liters(42.5);
        assert!((as_liters(v) - 42.5).abs() < 1e-12);
    }

    #[test]
    fn kw_is_si_watts() {
        let p = kw(150.0);
        assert!((p.value - 150_000.0).abs() < 1e-9);
    }
}
