use crate::types::err::{self};

/// An option, paired with its name and the bounds on its value.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub value: T,
}

impl<T: Clone> ConfigOption<T> {
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }
}

impl<T: PartialOrd> ConfigOption<T> {
    /// Sets the value of the option, if `value` is within the bounds of the option.
    pub fn set(&mut self, value: T) -> Result<(), err::ConfigError> {
        if value < self.min || self.max < value {
            log::error!("Value for {} out of range", self.name);
            return Err(err::ConfigError::OutOfRange(self.name));
        }
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod option_tests {
    use super::*;

    #[test]
    fn bounds_are_respected() {
        let mut option = ConfigOption {
            name: "growth",
            min: -1,
            max: 4,
            value: 0,
        };

        assert!(option.set(4).is_ok());
        assert_eq!(option.value, 4);
        assert_eq!(option.set(-2), Err(err::ConfigError::OutOfRange("growth")));
        assert_eq!(option.value, 4);
        assert_eq!(option.min_max(), (-1, 4));
    }
}
