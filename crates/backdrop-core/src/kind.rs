//! Keys naming every available background.

use std::fmt;
use std::str::FromStr;

/// Returned when a string does not name a known background.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown background '{0}'")]
pub struct UnknownBackground(pub String);

/// Every background the manager can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum BackgroundKind {
    #[default]
    Particle,
    StructuralMesh,
    PolyurethaneFlow,
    CrackInjection,
    CrackInjectionBlue,
    CrackInjectionGreen,
    CrackInjectionPurple,
    CrackInjectionOrange,
    Network,
    Dots,
    Hexagon,
    Snow,
    Ripple,
    Lightning,
    Fractal,
    Concrete,
    Particles2,
    InteractiveCracks,
    Magnetic,
    InjectionFlow,
}

impl BackgroundKind {
    /// All backgrounds in menu order.
    pub const ALL: [BackgroundKind; 20] = [
        BackgroundKind::Particle,
        BackgroundKind::StructuralMesh,
        BackgroundKind::PolyurethaneFlow,
        BackgroundKind::CrackInjection,
        BackgroundKind::CrackInjectionBlue,
        BackgroundKind::CrackInjectionGreen,
        BackgroundKind::CrackInjectionPurple,
        BackgroundKind::CrackInjectionOrange,
        BackgroundKind::Network,
        BackgroundKind::Dots,
        BackgroundKind::Hexagon,
        BackgroundKind::Snow,
        BackgroundKind::Ripple,
        BackgroundKind::Lightning,
        BackgroundKind::Fractal,
        BackgroundKind::Concrete,
        BackgroundKind::Particles2,
        BackgroundKind::InteractiveCracks,
        BackgroundKind::Magnetic,
        BackgroundKind::InjectionFlow,
    ];

    /// The selection key, also the source file stem used by the exporter.
    pub fn key(self) -> &'static str {
        match self {
            BackgroundKind::Particle => "particle",
            BackgroundKind::StructuralMesh => "structuralmesh",
            BackgroundKind::PolyurethaneFlow => "polyurethaneflow",
            BackgroundKind::CrackInjection => "crackinjection",
            BackgroundKind::CrackInjectionBlue => "crackinjectionblue",
            BackgroundKind::CrackInjectionGreen => "crackinjectiongreen",
            BackgroundKind::CrackInjectionPurple => "crackinjectionpurple",
            BackgroundKind::CrackInjectionOrange => "crackinjectionorange",
            BackgroundKind::Network => "network",
            BackgroundKind::Dots => "dots",
            BackgroundKind::Hexagon => "hexagon",
            BackgroundKind::Snow => "snow",
            BackgroundKind::Ripple => "ripple",
            BackgroundKind::Lightning => "lightning",
            BackgroundKind::Fractal => "fractal",
            BackgroundKind::Concrete => "concrete",
            BackgroundKind::Particles2 => "particles2",
            BackgroundKind::InteractiveCracks => "interactivecracks",
            BackgroundKind::Magnetic => "magnetic",
            BackgroundKind::InjectionFlow => "injectionflow",
        }
    }

    /// Human readable name for menus.
    pub fn label(self) -> &'static str {
        match self {
            BackgroundKind::Particle => "Particles",
            BackgroundKind::StructuralMesh => "Structural mesh",
            BackgroundKind::PolyurethaneFlow => "Polyurethane flow",
            BackgroundKind::CrackInjection => "Crack injection",
            BackgroundKind::CrackInjectionBlue => "Crack injection (blue)",
            BackgroundKind::CrackInjectionGreen => "Crack injection (green)",
            BackgroundKind::CrackInjectionPurple => "Crack injection (purple)",
            BackgroundKind::CrackInjectionOrange => "Crack injection (orange)",
            BackgroundKind::Network => "Network",
            BackgroundKind::Dots => "Dots",
            BackgroundKind::Hexagon => "Hexagons",
            BackgroundKind::Snow => "Snow",
            BackgroundKind::Ripple => "Ripples",
            BackgroundKind::Lightning => "Lightning",
            BackgroundKind::Fractal => "Fractal",
            BackgroundKind::Concrete => "Concrete",
            BackgroundKind::Particles2 => "Particle trails",
            BackgroundKind::InteractiveCracks => "Interactive cracks",
            BackgroundKind::Magnetic => "Magnetic field",
            BackgroundKind::InjectionFlow => "Injection flow",
        }
    }

    /// Cycle to the next background.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous background.
    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }
}

impl fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BackgroundKind {
    type Err = UnknownBackground;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|k| k.key() == wanted)
            .ok_or_else(|| UnknownBackground(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for kind in BackgroundKind::ALL {
            assert_eq!(kind.key().parse::<BackgroundKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_is_lenient_about_separators() {
        assert_eq!(
            "crack-injection-blue".parse::<BackgroundKind>(),
            Ok(BackgroundKind::CrackInjectionBlue)
        );
        assert_eq!(
            "Structural_Mesh".parse::<BackgroundKind>(),
            Ok(BackgroundKind::StructuralMesh)
        );
        assert!("fire".parse::<BackgroundKind>().is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(BackgroundKind::InjectionFlow.next(), BackgroundKind::Particle);
        assert_eq!(BackgroundKind::Particle.prev(), BackgroundKind::InjectionFlow);
        assert_eq!(BackgroundKind::Particle.next(), BackgroundKind::StructuralMesh);
    }
}
