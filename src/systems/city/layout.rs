// pure city lattice generator
// positions are deterministic per cell index, only the sampled sizes vary

use bevy::math::Vec2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::systems::GenError;

// lattice generation parameters
// footprints and heights are sampled with integer granularity
#[derive(Clone)]
pub struct CityParams {
    pub city_size: u32,
    pub footprint_min: i32,
    pub footprint_max: i32,
    pub height_min: i32,
    pub height_max: i32,
    pub street_width: f32,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            city_size: crate::config::CITY_SIZE,
            footprint_min: crate::config::FOOTPRINT_MIN,
            footprint_max: crate::config::FOOTPRINT_MAX,
            height_min: crate::config::BUILDING_HEIGHT_MIN,
            height_max: crate::config::BUILDING_HEIGHT_MAX,
            street_width: crate::config::STREET_WIDTH,
        }
    }
}

impl CityParams {
    // must be checked before any sampling happens
    pub fn validate(&self) -> Result<(), GenError> {
        if self.footprint_min > self.footprint_max {
            return Err(GenError::InvalidRange {
                min: self.footprint_min,
                max: self.footprint_max,
            });
        }
        if self.height_min > self.height_max {
            return Err(GenError::InvalidRange {
                min: self.height_min,
                max: self.height_max,
            });
        }
        Ok(())
    }

    // lattice step along both axes
    // uses the footprint maximum so the grid stays regular even though
    // individual footprints vary
    pub fn step(&self) -> f32 {
        self.footprint_max as f32 + self.street_width
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Antenna {
    pub shrink: f32, // applied to the tier top face
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoofTier {
    pub shrink: f32,
    pub height: f32,
    pub antenna: Option<Antenna>,
}

// one building, computed once per cell and consumed immediately
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingVolume {
    pub footprint: f32,
    pub height: f32,
    pub tier: Option<RoofTier>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityCell {
    pub row: u32,
    pub col: u32,
    pub position: Vec2, // ground plane, lattice space
    pub volume: BuildingVolume,
}

// row-major lazy sequence of city_size^2 cells
pub struct CityLayout {
    params: CityParams,
    rng: StdRng,
    next: u32,
}

// fails fast on inverted ranges, before the rng is touched
pub fn layout(params: &CityParams, rng: StdRng) -> Result<CityLayout, GenError> {
    params.validate()?;
    Ok(CityLayout {
        params: params.clone(),
        rng,
        next: 0,
    })
}

impl Iterator for CityLayout {
    type Item = CityCell;

    fn next(&mut self) -> Option<CityCell> {
        let size = self.params.city_size;
        if self.next >= size * size {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let row = index / size;
        let col = index % size;
        let step = self.params.step();

        // sampling order is fixed so the stream stays reproducible per seed
        let footprint = self
            .rng
            .random_range(self.params.footprint_min..=self.params.footprint_max)
            as f32;
        let height = self
            .rng
            .random_range(self.params.height_min..=self.params.height_max)
            as f32;

        // roof tier with probability 1/3
        let tier = if self.rng.random_range(0..3) == 0 {
            // antenna coin is flipped whenever a tier exists, then gated on
            // the building being near the height maximum
            let antenna_coin = self.rng.random_range(0..2) == 0;
            let antenna = if antenna_coin && height >= (self.params.height_max - 1) as f32 {
                Some(Antenna {
                    shrink: 1.0 / (crate::config::ANTENNA_SHRINK_DIVISOR * footprint),
                    height: height / crate::config::ANTENNA_HEIGHT_DIVISOR,
                })
            } else {
                None
            };
            Some(RoofTier {
                shrink: crate::config::TIER_SHRINK,
                height: 1.0 - 1.0 / footprint,
                antenna,
            })
        } else {
            None
        };

        Some(CityCell {
            row,
            col,
            position: Vec2::new(col as f32 * step, row as f32 * step),
            volume: BuildingVolume {
                footprint,
                height,
                tier,
            },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = (self.params.city_size * self.params.city_size) as usize;
        let left = total - self.next as usize;
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn small_params() -> CityParams {
        CityParams {
            city_size: 2,
            footprint_min: 3,
            footprint_max: 4,
            height_min: 5,
            height_max: 15,
            street_width: 1.0,
        }
    }

    fn cells(params: &CityParams, seed: u64) -> Vec<CityCell> {
        layout(params, StdRng::seed_from_u64(seed))
            .unwrap()
            .collect()
    }

    #[test]
    fn produces_city_size_squared_cells() {
        for size in [1, 2, 5, 9] {
            let params = CityParams {
                city_size: size,
                ..small_params()
            };
            assert_eq!(cells(&params, 1).len(), (size * size) as usize);
        }
    }

    #[test]
    fn lattice_positions_match_worked_example() {
        // footprint_max + street_width = 5 per step
        let got: Vec<Vec2> = cells(&small_params(), 42)
            .iter()
            .map(|c| c.position)
            .collect();
        assert_eq!(
            got,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(5.0, 0.0),
                Vec2::new(0.0, 5.0),
                Vec2::new(5.0, 5.0),
            ]
        );
    }

    #[test]
    fn positions_do_not_depend_on_seed() {
        let a = cells(&small_params(), 7);
        let b = cells(&small_params(), 991);
        for (ca, cb) in a.iter().zip(&b) {
            assert_eq!(ca.position, cb.position);
            assert_eq!((ca.row, ca.col), (cb.row, cb.col));
        }
    }

    #[test]
    fn samples_stay_inside_configured_ranges() {
        let params = CityParams {
            city_size: 20,
            ..small_params()
        };
        for cell in cells(&params, 3) {
            let v = cell.volume;
            assert!((3.0..=4.0).contains(&v.footprint));
            assert!((5.0..=15.0).contains(&v.height));
            if let Some(tier) = v.tier {
                assert_eq!(tier.shrink, 0.75);
                assert_eq!(tier.height, 1.0 - 1.0 / v.footprint);
            }
        }
    }

    #[test]
    fn tier_frequency_is_about_one_third() {
        let params = CityParams {
            city_size: 100, // 10_000 trials
            ..small_params()
        };
        let tiers = cells(&params, 1234)
            .iter()
            .filter(|c| c.volume.tier.is_some())
            .count();
        let freq = tiers as f64 / 10_000.0;
        assert!(
            (freq - 1.0 / 3.0).abs() < 0.02,
            "tier frequency {freq} too far from 1/3"
        );
    }

    #[test]
    fn antennas_only_on_tall_tiered_buildings() {
        let params = CityParams {
            city_size: 60,
            ..small_params()
        };
        let mut seen = 0;
        for cell in cells(&params, 5) {
            let v = cell.volume;
            if let Some(RoofTier {
                antenna: Some(antenna),
                ..
            }) = v.tier
            {
                seen += 1;
                assert!(v.height >= 14.0);
                assert_eq!(antenna.height, v.height / 7.0);
                assert_eq!(antenna.shrink, 1.0 / (10.0 * v.footprint));
            }
        }
        assert!(seen > 0, "expected at least one antenna in 3600 cells");
    }

    #[test]
    fn inverted_range_fails_before_sampling() {
        let params = CityParams {
            footprint_min: 5,
            footprint_max: 4,
            ..small_params()
        };
        assert_eq!(
            layout(&params, StdRng::seed_from_u64(0)).err(),
            Some(GenError::InvalidRange { min: 5, max: 4 })
        );

        let params = CityParams {
            height_min: 16,
            height_max: 15,
            ..small_params()
        };
        assert!(layout(&params, StdRng::seed_from_u64(0)).is_err());
    }
}
