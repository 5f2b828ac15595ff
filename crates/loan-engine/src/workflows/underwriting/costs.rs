use super::domain::{CostMultipliers, PropertyCosts, PropertyDetails};

/// Price the plot and construction. Inputs are trusted to be validated.
pub fn estimate_property_costs(
    details: &PropertyDetails,
    multipliers: CostMultipliers,
) -> PropertyCosts {
    let built_up_area = details.plot_size_sqft * details.floors as f64;
    let cost_per_sqft = details.base_cost_per_sqft * multipliers.luxury * multipliers.location;
    let construction_cost = built_up_area * cost_per_sqft;

    let (plot_cost, property_value) = if details.include_plot {
        (details.plot_price, details.plot_price + construction_cost)
    } else {
        (0.0, construction_cost)
    };

    PropertyCosts {
        built_up_area,
        cost_per_sqft,
        construction_cost,
        plot_cost,
        property_value,
    }
}
