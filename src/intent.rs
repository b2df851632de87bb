//! Intent classification from the set of recognized entity types.
//!
//! Evaluated top-down, first match wins:
//! 1. `component_type` present → `search_by_type`
//! 2. `stock_status` → `filter_by_stock`
//! 3. `location` → `filter_by_location`
//! 4. any value/unit type, `package` or `manufacturer` → `search_by_specification`
//! 5. `price` → `filter_by_price`

use nlq_types::{EntityType, Intent, ParsedEntities};

pub fn classify(entities: &ParsedEntities) -> Option<Intent> {
    if entities.contains(EntityType::ComponentType) {
        return Some(Intent::SearchByType);
    }
    if entities.contains(EntityType::StockStatus) {
        return Some(Intent::FilterByStock);
    }
    if entities.contains(EntityType::Location) {
        return Some(Intent::FilterByLocation);
    }
    let is_specification = |ty: &EntityType| {
        ty.is_value_unit() || matches!(ty, EntityType::Package | EntityType::Manufacturer)
    };
    if entities.entity_types().iter().any(is_specification) {
        return Some(Intent::SearchBySpecification);
    }
    if entities.contains(EntityType::Price) {
        return Some(Intent::FilterByPrice);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use nlq_types::{EntityValue, PriceRange, StockStatus};
    use rust_decimal::Decimal;

    fn entities(values: &[(EntityType, EntityValue)]) -> ParsedEntities {
        let mut parsed = ParsedEntities::new();
        for (ty, value) in values {
            parsed.set(*ty, value.clone()).unwrap();
        }
        parsed
    }

    fn cheap() -> EntityValue {
        EntityValue::Price(PriceRange::at_most(Decimal::from(5)))
    }

    #[test]
    fn test_component_type_dominates() {
        let parsed = entities(&[
            (EntityType::Price, cheap()),
            (EntityType::Location, EntityValue::text("A1")),
            (EntityType::ComponentType, EntityValue::text("resistor")),
        ]);
        assert_eq!(classify(&parsed), Some(Intent::SearchByType));
    }

    #[test]
    fn test_precedence_without_component_type() {
        let stock_and_location = entities(&[
            (EntityType::StockStatus, EntityValue::Stock(StockStatus::Low)),
            (EntityType::Location, EntityValue::text("A1")),
        ]);
        assert_eq!(classify(&stock_and_location), Some(Intent::FilterByStock));

        let location_and_price = entities(&[
            (EntityType::Location, EntityValue::text("A1")),
            (EntityType::Price, cheap()),
        ]);
        assert_eq!(classify(&location_and_price), Some(Intent::FilterByLocation));

        let spec_and_price = entities(&[
            (EntityType::Capacitance, EntityValue::text("100µF")),
            (EntityType::Price, cheap()),
        ]);
        assert_eq!(classify(&spec_and_price), Some(Intent::SearchBySpecification));
    }

    #[test]
    fn test_single_types() {
        let manufacturer = entities(&[(EntityType::Manufacturer, EntityValue::text("TDK"))]);
        assert_eq!(classify(&manufacturer), Some(Intent::SearchBySpecification));

        let price = entities(&[(EntityType::Price, cheap())]);
        assert_eq!(classify(&price), Some(Intent::FilterByPrice));
    }

    #[test]
    fn test_no_entities_no_intent() {
        assert_eq!(classify(&ParsedEntities::new()), None);
    }
}
