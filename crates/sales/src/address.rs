use serde::{Deserialize, Serialize};

use commerce_core::ValueObject;

/// Destination recorded on an order when it ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub number: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ValueObject for ShippingAddress {}

impl ShippingAddress {
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            number: number.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
            country: country.into(),
        }
    }
}

/// Single-line form: `"{street} {number}, {city}, {state} {zip_code}, {country}"`.
impl core::fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {}, {}, {} {}, {}",
            self.street, self.number, self.city, self.state, self.zip_code, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_single_line() {
        let address = ShippingAddress::new("Main St", "42", "Springfield", "IL", "62701", "USA");
        assert_eq!(address.to_string(), "Main St 42, Springfield, IL 62701, USA");
    }

    #[test]
    fn equal_by_value() {
        let a = ShippingAddress::new("A", "1", "City", "ST", "00000", "Country");
        let b = ShippingAddress::new("A".to_string(), "1", "City", "ST", "00000", "Country");
        assert_eq!(a, b);
    }
}
