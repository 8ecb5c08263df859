use crate::error::GeneratorError;
use configuration::GeneratorSettings;
use core_types::{PerformanceSeries, RiskLevel};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pools of names, creators and descriptions to draw listings from.
///
/// Each generated listing removes one entry from every pool, so no two
/// listings share a name, creator or description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionaries {
    pub names: Vec<String>,
    pub creators: Vec<String>,
    pub descriptions: Vec<String>,
}

impl Dictionaries {
    fn is_exhausted(&self) -> bool {
        self.names.is_empty() || self.creators.is_empty() || self.descriptions.is_empty()
    }
}

/// A listed trading-bot product, in the shape the catalog stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertAdvisor {
    pub id: u32,
    pub name: String,
    pub creator: String,
    pub description: String,
    pub price: u32,
    pub stars: u8,
    pub reviews: u32,
    pub performance: Performance,
    pub image: String,
    pub historical_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// Advertised ROI in percent.
    pub roi: f64,
    pub risk_level: RiskLevel,
    /// Advertised win rate in percent.
    pub win_rate: u32,
    pub data: PerformanceSeries,
}

/// Produces `days` daily account values starting from `initial_value`.
///
/// Each day the value moves by `value * (roi/100) * (win_rate/100) * u`, with
/// `u` uniform in `[-1, 1)`. Stored values are rounded to cents; the walk
/// itself keeps full precision.
pub fn generate_performance_data<R: Rng + ?Sized>(
    rng: &mut R,
    days: usize,
    roi_pct: f64,
    win_rate_pct: f64,
    initial_value: f64,
) -> Result<PerformanceSeries, GeneratorError> {
    let scale = (roi_pct / 100.0) * (win_rate_pct / 100.0);
    let mut value = initial_value;
    let mut data = Vec::with_capacity(days);

    for _ in 0..days {
        let change = scale * rng.gen_range(-1.0..1.0);
        value += value * change;
        data.push(round_cents(value));
    }

    Ok(PerformanceSeries::new(data)?)
}

/// Generates demo listings within the bounds of a `GeneratorSettings`.
pub struct ListingGenerator<'a, R: Rng> {
    settings: &'a GeneratorSettings,
    rng: R,
}

impl<'a, R: Rng> ListingGenerator<'a, R> {
    pub fn new(settings: &'a GeneratorSettings, rng: R) -> Self {
        Self { settings, rng }
    }

    /// Generates up to `settings.count` listings, consuming entries from `dictionaries`.
    ///
    /// Stops early, returning what it has, once any dictionary runs dry.
    pub fn generate(
        &mut self,
        dictionaries: &mut Dictionaries,
    ) -> Result<Vec<ExpertAdvisor>, GeneratorError> {
        let capacity = self
            .settings
            .count
            .min(dictionaries.names.len())
            .min(dictionaries.creators.len())
            .min(dictionaries.descriptions.len());
        let mut listings = Vec::with_capacity(capacity);

        for _ in 0..self.settings.count {
            if dictionaries.is_exhausted() {
                tracing::warn!(
                    generated = listings.len(),
                    requested = self.settings.count,
                    "Dictionaries exhausted; stopping listing generation early"
                );
                break;
            }
            listings.push(self.next_listing(dictionaries)?);
        }

        tracing::info!(count = listings.len(), "Generated Expert Advisor listings");
        Ok(listings)
    }

    fn next_listing(
        &mut self,
        dictionaries: &mut Dictionaries,
    ) -> Result<ExpertAdvisor, GeneratorError> {
        let s = self.settings;
        let days = self.rng.gen_range(s.min_days..=s.max_days);
        let roi = round_cents(self.rng.gen_range(s.min_roi_pct..=s.max_roi_pct));
        let win_rate = self.rng.gen_range(s.min_win_rate_pct..=s.max_win_rate_pct);

        let name = take_random(&mut self.rng, &mut dictionaries.names);
        let creator = take_random(&mut self.rng, &mut dictionaries.creators);
        let description = take_random(&mut self.rng, &mut dictionaries.descriptions);

        let risk_level = RiskLevel::ALL[self.rng.gen_range(0..RiskLevel::ALL.len())];
        let data = generate_performance_data(
            &mut self.rng,
            days,
            roi,
            f64::from(win_rate),
            s.initial_value,
        )?;

        let slug = slugify(&name);
        tracing::debug!(%name, days, roi, win_rate, "Generated listing");

        Ok(ExpertAdvisor {
            id: self.rng.gen_range(1..=10_000),
            price: self.rng.gen_range(0..=s.max_price),
            stars: self.rng.gen_range(1..=5),
            reviews: self.rng.gen_range(10..=500),
            performance: Performance {
                roi,
                risk_level,
                win_rate,
                data,
            },
            image: format!("{slug}.png"),
            historical_data: format!("{slug}.json"),
            name,
            creator,
            description,
        })
    }
}

/// Removes and returns a random entry. `pool` must not be empty.
fn take_random<R: Rng + ?Sized>(rng: &mut R, pool: &mut Vec<String>) -> String {
    let index = rng.gen_range(0..pool.len());
    pool.remove(index)
}

/// `"Golden Scalper Pro"` -> `"golden_scalper_pro"`.
fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dictionaries(n: usize) -> Dictionaries {
        Dictionaries {
            names: (0..n).map(|i| format!("Alpha Bot {i}")).collect(),
            creators: (0..n).map(|i| format!("Creator {i}")).collect(),
            descriptions: (0..n).map(|i| format!("Description {i}")).collect(),
        }
    }

    #[test]
    fn performance_data_has_one_point_per_day() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = generate_performance_data(&mut rng, 90, 20.0, 75.0, 5000.0).unwrap();
        assert_eq!(series.len(), 90);
        assert!(series.is_strictly_positive());
    }

    #[test]
    fn daily_moves_stay_within_roi_times_win_rate() {
        let mut rng = StdRng::seed_from_u64(11);
        let series = generate_performance_data(&mut rng, 60, 50.0, 95.0, 5000.0).unwrap();
        let bound = 0.5 * 0.95;
        // Both neighbours are rounded to cents, so allow a couple of cents of slack.
        let mut previous = 5000.0;
        for &value in series.values() {
            let step = (value - previous).abs();
            assert!(step <= previous * bound + 0.02, "step {step} from {previous} too large");
            previous = value;
        }
    }

    #[test]
    fn values_are_rounded_to_cents() {
        let mut rng = StdRng::seed_from_u64(3);
        let series = generate_performance_data(&mut rng, 30, 10.0, 60.0, 5000.0).unwrap();
        for &value in series.values() {
            assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_days_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_performance_data(&mut rng, 0, 10.0, 60.0, 5000.0).unwrap_err();
        assert!(matches!(err, GeneratorError::Series(_)));
    }

    #[test]
    fn same_seed_produces_same_listings() {
        let settings = GeneratorSettings {
            count: 5,
            ..GeneratorSettings::default()
        };
        let first = ListingGenerator::new(&settings, StdRng::seed_from_u64(42))
            .generate(&mut dictionaries(10))
            .unwrap();
        let second = ListingGenerator::new(&settings, StdRng::seed_from_u64(42))
            .generate(&mut dictionaries(10))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn listings_respect_configured_bounds() {
        let settings = GeneratorSettings {
            count: 8,
            ..GeneratorSettings::default()
        };
        let mut dicts = dictionaries(8);
        let listings = ListingGenerator::new(&settings, StdRng::seed_from_u64(5))
            .generate(&mut dicts)
            .unwrap();

        assert_eq!(listings.len(), 8);
        for ea in &listings {
            assert!((30..=365).contains(&ea.performance.data.len()));
            assert!((5.0..=50.0).contains(&ea.performance.roi));
            assert!((50..=95).contains(&ea.performance.win_rate));
            assert!((1..=10_000).contains(&ea.id));
            assert!(ea.price <= 2000);
            assert!((1..=5).contains(&ea.stars));
            assert!((10..=500).contains(&ea.reviews));
        }
    }

    #[test]
    fn names_are_unique_and_consumed_from_dictionaries() {
        let settings = GeneratorSettings {
            count: 4,
            ..GeneratorSettings::default()
        };
        let mut dicts = dictionaries(6);
        let listings = ListingGenerator::new(&settings, StdRng::seed_from_u64(9))
            .generate(&mut dicts)
            .unwrap();

        let mut names: Vec<_> = listings.iter().map(|ea| ea.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
        assert_eq!(dicts.names.len(), 2);
        assert_eq!(dicts.creators.len(), 2);
        assert_eq!(dicts.descriptions.len(), 2);
        assert!(listings.iter().all(|ea| !dicts.names.contains(&ea.name)));
    }

    #[test]
    fn stops_early_when_a_dictionary_runs_out() {
        let settings = GeneratorSettings {
            count: 10,
            ..GeneratorSettings::default()
        };
        let mut dicts = dictionaries(5);
        dicts.creators.truncate(3);

        let listings = ListingGenerator::new(&settings, StdRng::seed_from_u64(2))
            .generate(&mut dicts)
            .unwrap();
        assert_eq!(listings.len(), 3);
        assert!(dicts.creators.is_empty());
    }

    #[test]
    fn huge_count_is_bounded_by_the_dictionaries() {
        let settings = GeneratorSettings {
            count: usize::MAX,
            ..GeneratorSettings::default()
        };
        let mut dicts = dictionaries(1);
        let listings = ListingGenerator::new(&settings, StdRng::seed_from_u64(4))
            .generate(&mut dicts)
            .unwrap();
        assert_eq!(listings.len(), 1);
        assert!(dicts.names.is_empty());
    }

    #[test]
    fn file_names_derive_from_the_listing_name() {
        assert_eq!(slugify("Golden  Scalper\tPro"), "golden_scalper_pro");

        let settings = GeneratorSettings {
            count: 1,
            ..GeneratorSettings::default()
        };
        let mut dicts = Dictionaries {
            names: vec!["Night Owl EA".to_string()],
            creators: vec!["FX Labs".to_string()],
            descriptions: vec!["Trades the Asian session.".to_string()],
        };
        let listing = ListingGenerator::new(&settings, StdRng::seed_from_u64(0))
            .generate(&mut dicts)
            .unwrap()
            .remove(0);
        assert_eq!(listing.image, "night_owl_ea.png");
        assert_eq!(listing.historical_data, "night_owl_ea.json");
    }
}
