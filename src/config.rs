//! Layout parameters for a settlement cell and the values derived from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat record of every named scalar that shapes the cell map.
///
/// Lengths are metres, angles are degrees, durations are abstract "days"
/// used only by the grazing rotation. Every field has a default so partial
/// YAML files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParameters {
    // spatial
    pub num_guilds: u32,
    pub guild_spacing: f64,
    pub inner_area_ha: f64,
    pub num_compounds: u32,
    pub compound_spacing: f64,
    pub greenhouse_length: f64,
    pub greenhouse_width: f64,
    pub polygon_sides: u32,
    pub dome_diameter: f64,

    // school
    pub school_polygon_sides: u32,
    pub school_building_radius: f64,
    pub school_water_distance: f64,
    pub school_water_ring_width: f64,
    pub school_water_depth: f64,

    // paths
    pub bamboo_path_width: f64,
    pub canal_path_width: f64,
    pub bamboo_outer_path_width: f64,
    pub radial_path_width: f64,
    pub outer_pond_path_width: f64,

    // urban sector
    pub show_urban_sector: bool,
    pub urban_sector_angle: f64,
    pub urban_sector_angle_outer: f64,
    pub urban_pond_inner_diameter: f64,
    pub urban_pond_inner_depth: f64,
    pub urban_pond_outer_diameter: f64,
    pub urban_pond_outer_depth: f64,
    pub urban_streets: u32,
    pub urban_streets_outer: u32,
    pub urban_cross_streets_inner: u32,
    pub urban_cross_streets_outer: u32,
    pub urban_street_width: f64,
    pub central_canal_width: f64,

    // water
    pub perimeter_canal_width: f64,
    pub perimeter_canal_depth: f64,
    pub guild_canal_width: f64,
    pub inter_guild_canal_width: f64,
    pub guild_moat_offset: f64,
    pub guild_moat_width: f64,
    pub guild_moat_depth: f64,

    // grazing
    pub show_grazing_cells: bool,
    pub occupation_days: u32,
    pub recovery_days: u32,

    // silvopasture trees
    pub black_locust_trees: u32,
    pub oak_ash_trees: u32,
    pub walnut_trees: u32,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            num_guilds: 10,
            guild_spacing: 700.0,
            inner_area_ha: 600.0,
            num_compounds: 8,
            compound_spacing: 25.0,
            greenhouse_length: 22.0,
            greenhouse_width: 18.0,
            polygon_sides: 6,
            dome_diameter: 6.0,

            school_polygon_sides: 6,
            school_building_radius: 30.0,
            school_water_distance: 20.0,
            school_water_ring_width: 5.0,
            school_water_depth: 2.0,

            bamboo_path_width: 5.5,
            canal_path_width: 6.0,
            bamboo_outer_path_width: 6.0,
            radial_path_width: 6.0,
            outer_pond_path_width: 3.0,

            show_urban_sector: true,
            urban_sector_angle: 25.0,
            urban_sector_angle_outer: 50.0,
            urban_pond_inner_diameter: 100.0,
            urban_pond_inner_depth: 3.0,
            urban_pond_outer_diameter: 100.0,
            urban_pond_outer_depth: 3.0,
            urban_streets: 3,
            urban_streets_outer: 9,
            urban_cross_streets_inner: 5,
            urban_cross_streets_outer: 3,
            urban_street_width: 4.0,
            central_canal_width: 6.0,

            perimeter_canal_width: 30.0,
            perimeter_canal_depth: 5.0,
            guild_canal_width: 2.0,
            inter_guild_canal_width: 2.0,
            guild_moat_offset: 5.0,
            guild_moat_width: 3.0,
            guild_moat_depth: 2.0,

            show_grazing_cells: true,
            occupation_days: 2,
            recovery_days: 45,

            black_locust_trees: 19_800,
            oak_ash_trees: 4_560,
            walnut_trees: 1_400,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("layout parse error: {0}")]
    Parse(String),
    #[error("{field} must be a finite non-negative length, got {value}")]
    Length { field: &'static str, value: f64 },
    #[error("{field} must be an angle in [0, 360), got {value}")]
    Angle { field: &'static str, value: f64 },
    #[error("{field} needs at least 3 sides, got {value}")]
    Sides { field: &'static str, value: u32 },
    #[error("{field} must be at most {max}, got {value}")]
    Count {
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("occupation_days must be positive when recovery_days is set")]
    Rotation,
}

/// Upper bounds on the counted features a layout may ask for.
pub const MAX_GUILDS: u32 = 360;
pub const MAX_COMPOUNDS: u32 = 64;
pub const MAX_POLYGON_SIDES: u32 = 64;
pub const MAX_STREETS: u32 = 100;
pub const MAX_RECOVERY_DAYS: u32 = 3_650;
pub const MAX_TREES_PER_SPECIES: u32 = 1_000_000;

impl LayoutParameters {
    /// The small cell the dashboard falls back to when no simulation state
    /// is supplied: 8 guilds, 50 ha interior, no urban wedge.
    pub fn compact() -> Self {
        Self {
            num_guilds: 8,
            guild_spacing: 200.0,
            inner_area_ha: 50.0,
            show_urban_sector: false,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let params: LayoutParameters =
            serde_yaml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("guild_spacing", self.guild_spacing),
            ("inner_area_ha", self.inner_area_ha),
            ("compound_spacing", self.compound_spacing),
            ("greenhouse_length", self.greenhouse_length),
            ("greenhouse_width", self.greenhouse_width),
            ("dome_diameter", self.dome_diameter),
            ("school_building_radius", self.school_building_radius),
            ("school_water_distance", self.school_water_distance),
            ("school_water_ring_width", self.school_water_ring_width),
            ("school_water_depth", self.school_water_depth),
            ("bamboo_path_width", self.bamboo_path_width),
            ("canal_path_width", self.canal_path_width),
            ("bamboo_outer_path_width", self.bamboo_outer_path_width),
            ("radial_path_width", self.radial_path_width),
            ("outer_pond_path_width", self.outer_pond_path_width),
            ("urban_pond_inner_diameter", self.urban_pond_inner_diameter),
            ("urban_pond_inner_depth", self.urban_pond_inner_depth),
            ("urban_pond_outer_diameter", self.urban_pond_outer_diameter),
            ("urban_pond_outer_depth", self.urban_pond_outer_depth),
            ("urban_street_width", self.urban_street_width),
            ("central_canal_width", self.central_canal_width),
            ("perimeter_canal_width", self.perimeter_canal_width),
            ("perimeter_canal_depth", self.perimeter_canal_depth),
            ("guild_canal_width", self.guild_canal_width),
            ("inter_guild_canal_width", self.inter_guild_canal_width),
            ("guild_moat_offset", self.guild_moat_offset),
            ("guild_moat_width", self.guild_moat_width),
            ("guild_moat_depth", self.guild_moat_depth),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Length { field, value });
            }
        }

        let angles = [
            ("urban_sector_angle", self.urban_sector_angle),
            ("urban_sector_angle_outer", self.urban_sector_angle_outer),
        ];
        for (field, value) in angles {
            if !value.is_finite() || !(0.0..360.0).contains(&value) {
                return Err(ConfigError::Angle { field, value });
            }
        }

        let sides = [
            ("polygon_sides", self.polygon_sides),
            ("school_polygon_sides", self.school_polygon_sides),
        ];
        for (field, value) in sides {
            if value < 3 {
                return Err(ConfigError::Sides { field, value });
            }
        }

        let counts = [
            ("num_guilds", self.num_guilds, MAX_GUILDS),
            ("num_compounds", self.num_compounds, MAX_COMPOUNDS),
            ("polygon_sides", self.polygon_sides, MAX_POLYGON_SIDES),
            ("school_polygon_sides", self.school_polygon_sides, MAX_POLYGON_SIDES),
            ("urban_streets", self.urban_streets, MAX_STREETS),
            ("urban_streets_outer", self.urban_streets_outer, MAX_STREETS),
            ("urban_cross_streets_inner", self.urban_cross_streets_inner, MAX_STREETS),
            ("urban_cross_streets_outer", self.urban_cross_streets_outer, MAX_STREETS),
            ("occupation_days", self.occupation_days, MAX_RECOVERY_DAYS),
            ("recovery_days", self.recovery_days, MAX_RECOVERY_DAYS),
            ("black_locust_trees", self.black_locust_trees, MAX_TREES_PER_SPECIES),
            ("oak_ash_trees", self.oak_ash_trees, MAX_TREES_PER_SPECIES),
            ("walnut_trees", self.walnut_trees, MAX_TREES_PER_SPECIES),
        ];
        for (field, value, max) in counts {
            if value > max {
                return Err(ConfigError::Count { field, value, max });
            }
        }

        if self.occupation_days == 0 && self.recovery_days > 0 {
            return Err(ConfigError::Rotation);
        }

        Ok(())
    }

    pub fn total_silvopasture_trees(&self) -> u32 {
        self.black_locust_trees
            .saturating_add(self.oak_ash_trees)
            .saturating_add(self.walnut_trees)
    }
}

const PEOPLE_PER_DOME: u32 = 2;

/// Figures derived from the layout by the wider settlement simulation.
/// Only the subset the map needs is reproduced here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementSystems {
    pub guild_diameter: f64,
    pub guild_ring_radius: f64,
    pub compound_radius: f64,
    pub people_per_compound: u32,
    pub people_per_guild: u32,
    pub total_people: u32,
    pub num_grazing_paddocks: u32,
    pub area_per_paddock_ha: f64,
    pub num_fruit_trees: u32,
    pub orchard_zone_area_ha: f64,
    pub bamboo_area_ha: f64,
    pub pasture_ha: f64,
    pub num_students: u32,
}

impl SettlementSystems {
    /// Counts saturate so unvalidated layouts still derive.
    pub fn derive(params: &LayoutParameters) -> Self {
        let people_per_compound = params.polygon_sides.saturating_mul(PEOPLE_PER_DOME);
        let people_per_guild = params.num_compounds.saturating_mul(people_per_compound);
        Self {
            guild_diameter: 150.0,
            guild_ring_radius: 60.0,
            compound_radius: 15.0,
            people_per_compound,
            people_per_guild,
            total_people: params.num_guilds.saturating_mul(people_per_guild),
            num_grazing_paddocks: 24,
            area_per_paddock_ha: 1.0,
            num_fruit_trees: 5_000,
            orchard_zone_area_ha: 50.0,
            bamboo_area_ha: 80.0,
            pasture_ha: 100.0 + 50.0,
            num_students: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_cell() {
        let params = LayoutParameters::default();
        assert_eq!(params.num_guilds, 10);
        assert_eq!(params.guild_spacing, 700.0);
        assert_eq!(params.inner_area_ha, 600.0);
        assert_eq!(params.urban_sector_angle_outer, 50.0);
        assert_eq!(params.total_silvopasture_trees(), 25_760);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let params = LayoutParameters::from_yaml_str("num_guilds: 6\nshow_urban_sector: false\n")
            .expect("layout parses");
        assert_eq!(params.num_guilds, 6);
        assert!(!params.show_urban_sector);
        assert_eq!(params.num_compounds, 8);
    }

    #[test]
    fn yaml_round_trip() {
        let params = LayoutParameters::compact();
        let text = params.to_yaml_string().unwrap();
        let loaded = LayoutParameters::from_yaml_str(&text).unwrap();
        assert_eq!(params, loaded);
    }

    #[test]
    fn rejects_negative_length() {
        let params = LayoutParameters {
            perimeter_canal_width: -1.0,
            ..LayoutParameters::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::Length {
                field: "perimeter_canal_width",
                value: -1.0
            })
        );
    }

    #[test]
    fn rejects_full_turn_angle() {
        let params = LayoutParameters {
            urban_sector_angle: 360.0,
            ..LayoutParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Angle { field: "urban_sector_angle", .. })
        ));
    }

    #[test]
    fn rejects_degenerate_polygons_and_rotation() {
        let params = LayoutParameters {
            school_polygon_sides: 2,
            ..LayoutParameters::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::Sides { .. })));

        let params = LayoutParameters {
            occupation_days: 0,
            ..LayoutParameters::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::Rotation));
    }

    #[test]
    fn unknown_yaml_is_a_parse_error() {
        let err = LayoutParameters::from_yaml_str("num_guilds: many").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_oversized_counts() {
        let params = LayoutParameters {
            num_guilds: 100_000,
            num_compounds: 100_000,
            ..LayoutParameters::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::Count {
                field: "num_guilds",
                value: 100_000,
                max: MAX_GUILDS
            })
        );

        let params = LayoutParameters {
            recovery_days: u32::MAX,
            ..LayoutParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::Count { field: "recovery_days", .. })
        ));
    }

    #[test]
    fn largest_valid_layout_derives() {
        let params = LayoutParameters {
            num_guilds: MAX_GUILDS,
            num_compounds: MAX_COMPOUNDS,
            polygon_sides: MAX_POLYGON_SIDES,
            black_locust_trees: MAX_TREES_PER_SPECIES,
            oak_ash_trees: MAX_TREES_PER_SPECIES,
            walnut_trees: MAX_TREES_PER_SPECIES,
            ..LayoutParameters::default()
        };
        assert!(params.validate().is_ok());
        let systems = SettlementSystems::derive(&params);
        assert_eq!(systems.total_people, 360 * 64 * 64 * 2);
        assert_eq!(params.total_silvopasture_trees(), 3_000_000);
    }

    #[test]
    fn unvalidated_counts_saturate() {
        let params = LayoutParameters {
            num_guilds: u32::MAX,
            num_compounds: u32::MAX,
            black_locust_trees: u32::MAX,
            ..LayoutParameters::default()
        };
        let systems = SettlementSystems::derive(&params);
        assert_eq!(systems.people_per_guild, u32::MAX);
        assert_eq!(systems.total_people, u32::MAX);
        assert_eq!(params.total_silvopasture_trees(), u32::MAX);
    }

    #[test]
    fn systems_count_people() {
        let systems = SettlementSystems::derive(&LayoutParameters::default());
        assert_eq!(systems.people_per_compound, 12);
        assert_eq!(systems.people_per_guild, 96);
        assert_eq!(systems.total_people, 960);
        assert_eq!(systems.guild_diameter, 150.0);
    }
}
