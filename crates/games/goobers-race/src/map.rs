use rand::Rng;
use serde::{Deserialize, Serialize};

/// Y of the top surface of the ground strips.
pub const GROUND_Y: f32 = 500.0;
/// Height of a regular (thin) platform.
pub const PLATFORM_HEIGHT: f32 = 20.0;
/// Height of a thick, grabbable platform.
pub const THICK_PLATFORM_HEIGHT: f32 = 60.0;
/// Edge length of a spike's square footprint.
pub const SPIKE_SIZE: f32 = 30.0;

/// Axis-aligned rectangle with its origin at the top-left corner (y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap test; touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Solid ground or ledge. Players land on its top; thick ones can also be grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    pub fn is_thick(&self, threshold: f32) -> bool {
        self.rect.height >= threshold
    }
}

/// Hazard that kills on contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub rect: Rect,
}

impl Spike {
    /// A spike sitting on a surface whose top is at `surface_y`.
    pub const fn on_surface(x: f32, surface_y: f32) -> Self {
        Self {
            rect: Rect::new(x, surface_y - SPIKE_SIZE, SPIKE_SIZE, SPIKE_SIZE),
        }
    }
}

/// The static layout for one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceMap {
    pub name: String,
    pub platforms: Vec<Platform>,
    pub spikes: Vec<Spike>,
}

impl RaceMap {
    pub fn new(name: &str, platforms: Vec<Platform>, spikes: Vec<Spike>) -> Self {
        Self {
            name: name.to_string(),
            platforms,
            spikes,
        }
    }

    /// A map with nothing in it. Racers fall and respawn forever.
    pub fn empty() -> Self {
        Self::new("Void", Vec::new(), Vec::new())
    }

    /// Whether any spike overlaps any platform.
    pub fn has_buried_spikes(&self) -> bool {
        self.spikes
            .iter()
            .any(|s| self.platforms.iter().any(|p| s.rect.overlaps(&p.rect)))
    }
}

fn classic_jumps() -> RaceMap {
    RaceMap::new(
        "Classic Jumps",
        vec![
            Platform::new(0.0, GROUND_Y, 800.0, PLATFORM_HEIGHT),
            Platform::new(900.0, 450.0, 200.0, THICK_PLATFORM_HEIGHT),
            Platform::new(1200.0, 400.0, 200.0, PLATFORM_HEIGHT),
            Platform::new(1500.0, GROUND_Y, 300.0, PLATFORM_HEIGHT),
        ],
        vec![
            Spike::on_surface(850.0, GROUND_Y),
            Spike::on_surface(1150.0, 450.0),
        ],
    )
}

fn staircase() -> RaceMap {
    RaceMap::new(
        "Staircase",
        vec![
            Platform::new(0.0, GROUND_Y, 400.0, PLATFORM_HEIGHT),
            Platform::new(500.0, 460.0, 200.0, THICK_PLATFORM_HEIGHT),
            Platform::new(750.0, 420.0, 200.0, PLATFORM_HEIGHT),
            Platform::new(1000.0, 380.0, 200.0, THICK_PLATFORM_HEIGHT),
            Platform::new(1250.0, 440.0, 200.0, PLATFORM_HEIGHT),
            Platform::new(1500.0, GROUND_Y, 300.0, PLATFORM_HEIGHT),
        ],
        vec![
            Spike::on_surface(450.0, GROUND_Y),
            Spike::on_surface(720.0, 460.0),
            Spike::on_surface(970.0, 420.0),
        ],
    )
}

fn valley_of_death() -> RaceMap {
    RaceMap::new(
        "Valley of Death",
        vec![
            Platform::new(0.0, GROUND_Y, 300.0, PLATFORM_HEIGHT),
            Platform::new(400.0, 350.0, 150.0, THICK_PLATFORM_HEIGHT),
            Platform::new(650.0, 300.0, 100.0, PLATFORM_HEIGHT),
            Platform::new(850.0, 350.0, 150.0, THICK_PLATFORM_HEIGHT),
            Platform::new(1100.0, 450.0, 200.0, PLATFORM_HEIGHT),
            Platform::new(1400.0, GROUND_Y, 400.0, PLATFORM_HEIGHT),
        ],
        vec![
            Spike::on_surface(350.0, GROUND_Y),
            Spike::on_surface(570.0, 350.0),
            Spike::on_surface(770.0, 300.0),
            Spike::on_surface(1050.0, 350.0),
        ],
    )
}

fn islands() -> RaceMap {
    RaceMap::new(
        "Islands",
        vec![
            Platform::new(0.0, GROUND_Y, 250.0, PLATFORM_HEIGHT),
            Platform::new(350.0, 400.0, 100.0, THICK_PLATFORM_HEIGHT),
            Platform::new(550.0, 350.0, 150.0, PLATFORM_HEIGHT),
            Platform::new(800.0, 420.0, 120.0, THICK_PLATFORM_HEIGHT),
            Platform::new(1050.0, 380.0, 100.0, PLATFORM_HEIGHT),
            Platform::new(1250.0, 450.0, 150.0, THICK_PLATFORM_HEIGHT),
            Platform::new(1500.0, GROUND_Y, 300.0, PLATFORM_HEIGHT),
        ],
        vec![
            Spike::on_surface(300.0, GROUND_Y),
            Spike::on_surface(720.0, 350.0),
            Spike::on_surface(1020.0, 420.0),
        ],
    )
}

const LAYOUTS: &[fn() -> RaceMap] = &[classic_jumps, staircase, valley_of_death, islands];

/// Number of hand-authored layouts.
pub fn catalog_len() -> usize {
    LAYOUTS.len()
}

/// Layout at `index`, wrapping around the catalog.
pub fn map_by_index(index: usize) -> RaceMap {
    LAYOUTS[index % LAYOUTS.len()]()
}

/// Pick a layout uniformly at random.
pub fn generate_map<R: Rng + ?Sized>(rng: &mut R) -> RaceMap {
    let index = rng.random_range(0..LAYOUTS.len());
    let map = map_by_index(index);
    tracing::debug!(index, name = %map.name, "Race map selected");
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn catalog_has_at_least_four_layouts() {
        assert!(catalog_len() >= 4);
    }

    #[test]
    fn spikes_never_overlap_platforms() {
        for i in 0..catalog_len() {
            let map = map_by_index(i);
            assert!(!map.has_buried_spikes(), "{} buries a spike", map.name);
        }
    }

    #[test]
    fn every_layout_starts_on_ground() {
        for i in 0..catalog_len() {
            let map = map_by_index(i);
            let first = map.platforms[0].rect;
            assert_eq!(first.x, 0.0);
            assert_eq!(first.y, GROUND_Y);
        }
    }

    #[test]
    fn index_wraps() {
        assert_eq!(map_by_index(catalog_len() + 1), map_by_index(1));
    }

    #[test]
    fn same_seed_same_map() {
        let a = generate_map(&mut StdRng::seed_from_u64(7));
        let b = generate_map(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn selection_covers_the_catalog() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(generate_map(&mut rng).name);
        }
        assert_eq!(seen.len(), catalog_len());
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9.9, 9.9, 1.0, 1.0)));
    }

    #[test]
    fn thickness_threshold_is_inclusive() {
        assert!(Platform::new(0.0, 0.0, 10.0, 60.0).is_thick(THICK_PLATFORM_HEIGHT));
        assert!(!Platform::new(0.0, 0.0, 10.0, 20.0).is_thick(THICK_PLATFORM_HEIGHT));
    }
}
