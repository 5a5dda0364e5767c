//! Cities: the points a tour visits.

use rand::Rng;
use std::fmt;

/// An immutable named point in the plane.
///
/// Two cities with the same coordinates are still distinct: the engine
/// identifies a city by its position in the input list, never by value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    x: f64,
    y: f64,
    name: String,
}

impl City {
    /// Creates a city at `(x, y)`.
    pub fn new(x: f64, y: f64, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            name: name.into(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Euclidean distance to `other`.
    ///
    /// Coordinates are expected to be finite.
    pub fn distance(&self, other: &City) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Generates `count` cities on an integer grid `[0, width) × [0, height)`,
    /// named `"0"`, `"1"`, ... in creation order.
    pub fn random_grid<R: Rng>(count: usize, width: u32, height: u32, rng: &mut R) -> Vec<City> {
        let width = width.max(1);
        let height = height.max(1);
        (0..count)
            .map(|i| {
                let x = rng.random_range(0..width);
                let y = rng.random_range(0..height);
                City::new(f64::from(x), f64::from(y), i.to_string())
            })
            .collect()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) - {}", self.x, self.y, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_numflow::random::create_rng;

    #[test]
    fn test_distance_pythagorean() {
        let a = City::new(0.0, 0.0, "A");
        let b = City::new(3.0, 4.0, "B");
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = City::new(12.5, -3.0, "A");
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_display() {
        let a = City::new(1.0, 2.0, "7");
        assert_eq!(a.to_string(), "(1, 2) - 7");
    }

    #[test]
    fn test_random_grid_bounds_and_names() {
        let mut rng = create_rng(42);
        let cities = City::random_grid(25, 500, 300, &mut rng);
        assert_eq!(cities.len(), 25);
        for (i, c) in cities.iter().enumerate() {
            assert_eq!(c.name(), i.to_string());
            assert!((0.0..500.0).contains(&c.x()));
            assert!((0.0..300.0).contains(&c.y()));
            assert_eq!(c.x().fract(), 0.0);
        }
    }
}
