use crate::config::ConfigError;

/// How long a factory-produced value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Produced once on first request, then shared
    Singleton,
    /// New value for each request
    #[default]
    Transient,
}

impl Lifetime {
    pub fn is_singleton(&self) -> bool {
        matches!(self, Lifetime::Singleton)
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Lifetime::Transient)
    }

    /// Get the lifetime name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Transient => "transient",
        }
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Lifetime {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "singleton" => Ok(Lifetime::Singleton),
            "transient" => Ok(Lifetime::Transient),
            _ => Err(ConfigError::invalid_value(
                "lifetime",
                s,
                "singleton or transient",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_from_str() {
        assert_eq!("singleton".parse::<Lifetime>().unwrap(), Lifetime::Singleton);
        assert_eq!("Transient".parse::<Lifetime>().unwrap(), Lifetime::Transient);
        assert!("scoped".parse::<Lifetime>().is_err());
    }

    #[test]
    fn test_lifetime_display() {
        assert_eq!(format!("{}", Lifetime::Singleton), "singleton");
        assert_eq!(format!("{}", Lifetime::Transient), "transient");
        assert!(Lifetime::default().is_transient());
    }
}
