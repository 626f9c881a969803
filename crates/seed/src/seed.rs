use rand::Rng;

/// Number of decimal places kept when a fresh seed is generated.
pub const SEED_DECIMALS: usize = 10;

/// Errors from seed parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeedError {
    #[error("seed is empty")]
    Empty,
    #[error("seed {0:?} is not a decimal number")]
    NotANumber(String),
    #[error("seed {0} is not finite")]
    NotFinite(f64),
}

/// The decimal value that fully determines a procedural session.
///
/// The canonical text form (see [`Seed::canonical_text`]) is what feeds the
/// generator, so `0.50` and `0.5` name the same world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed(f64);

impl Seed {
    /// Wrap a raw value. Rejects NaN and infinities.
    pub fn from_value(value: f64) -> Result<Self, SeedError> {
        if !value.is_finite() {
            return Err(SeedError::NotFinite(value));
        }
        // Normalise -0 so it hashes like 0.
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    /// Parse decimal text, e.g. from a `?seed=` query parameter.
    pub fn parse(text: &str) -> Result<Self, SeedError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SeedError::Empty);
        }
        let value: f64 = text
            .parse()
            .map_err(|_| SeedError::NotANumber(text.to_string()))?;
        Self::from_value(value)
    }

    /// A fresh seed from OS entropy, rounded to [`SEED_DECIMALS`] places.
    pub fn random() -> Self {
        let raw: f64 = rand::thread_rng().r#gen();
        let value = format!("{raw:.prec$}", prec = SEED_DECIMALS).parse().unwrap_or(raw);
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Shortest decimal text that round-trips, using exponent notation only
    /// outside `[1e-6, 1e21)` the way browsers print numbers.
    pub fn canonical_text(&self) -> String {
        number_to_text(self.0)
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical_text())
    }
}

impl std::str::FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn number_to_text(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}
