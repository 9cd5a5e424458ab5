/// Predefined mesh sets for populating a grid
use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::{Error, Result};
use crate::geometry::{Point, Vector};
use crate::mesh::{Mesh, Rgba};
use crate::physics::Kinematics;
use crate::shapes;

/// Demo mesh sets, numbered as on the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoScene {
    /// Assorted shapes, most of them drifting
    Mixed = 1,
    /// A small cube thrown upward under gravity
    Projectile = 2,
    /// A regular polygon with a random side count
    RandomPolygon = 3,
    /// Stacked translucent circles of decreasing size
    Circles = 4,
    /// A slab moving toward the viewer
    Approaching = 5,
    /// Six cubes around the origin, one on each axis
    Surround = 6,
}

/// Highest number accepted by [`DemoScene::from_number`]; slots above the
/// last scene are empty.
pub const MAX_SCENE_NUMBER: u8 = 9;

impl DemoScene {
    /// Scenes loaded at start-up and on reset
    pub const INITIAL: [DemoScene; 2] = [DemoScene::Mixed, DemoScene::Circles];

    /// Scene for a number key. `Ok(None)` for empty slots.
    pub fn from_number(n: u8) -> Result<Option<Self>> {
        let scene = match n {
            1 => Self::Mixed,
            2 => Self::Projectile,
            3 => Self::RandomPolygon,
            4 => Self::Circles,
            5 => Self::Approaching,
            6 => Self::Surround,
            7..=MAX_SCENE_NUMBER => return Ok(None),
            _ => {
                return Err(Error::invalid(format!(
                    "scene number should be between 1 and {MAX_SCENE_NUMBER}, got {n}"
                )))
            }
        };
        Ok(Some(scene))
    }

    pub fn build(self, roll: &mut DistinctRoll) -> Result<Vec<Mesh>> {
        let meshes = match self {
            Self::Mixed => mixed()?,
            Self::Projectile => vec![Mesh::at(&shapes::cube(0.2), Point::new(0.0, 0.0, 4.0), None)
                .with_kinematics(Kinematics::new(
                    Vector::new(0.0, 10.0, -1.5),
                    Vector::new(0.0, -9.81, 0.0),
                ))],
            Self::RandomPolygon => {
                let sides = roll.next(3..=12)?;
                vec![Mesh::at(
                    &shapes::polygon(sides, 0.2)?,
                    Point::new(0.0, 0.0, 3.0),
                    None,
                )]
            }
            Self::Circles => circles()?,
            Self::Approaching => vec![Mesh::at(
                &shapes::cuboid(2.0, 2.0, 1.0),
                Point::new(0.0, 0.0, 5.0),
                None,
            )
            .with_kinematics(Kinematics::with_velocity(Vector::new(0.0, 0.0, -0.2)))],
            Self::Surround => [
                (5.0, 0.0, 0.0),
                (-5.0, 0.0, 0.0),
                (0.0, 5.0, 0.0),
                (0.0, -5.0, 0.0),
                (0.0, 0.0, 5.0),
                (0.0, 0.0, -5.0),
            ]
            .into_iter()
            .map(|(x, y, z)| Mesh::at(&shapes::cube(1.0), Point::new(x, y, z), None))
            .collect(),
        };
        Ok(meshes)
    }
}

fn kinematic(mesh: Mesh, velocity: Vector) -> Mesh {
    mesh.with_kinematics(Kinematics::with_velocity(velocity))
}

fn mixed() -> Result<Vec<Mesh>> {
    let far_cube = Mesh::at(
        &shapes::cube(10000.0),
        Point::new(10000.0, -2000.0, 40000.0),
        Some(Rgba::rgb(0.0, 0.4, 0.8)),
    );
    let cube = Mesh::at(
        &shapes::cube(1.0),
        Point::new(1.0, -0.2, 4.0),
        Some(Rgba::rgb(0.0, 1.0, 0.0)),
    );
    let cuboid = Mesh::at(
        &shapes::cuboid(0.8, 1.8, 0.2),
        Point::new(-2.0, 0.3, 5.0),
        Some(Rgba::BLACK),
    );
    let pyramid = Mesh::at(
        &shapes::square_based_pyramid(2.0, 2.0),
        Point::new(-0.5, -1.0, 6.0),
        Some(Rgba::rgb(1.0, 0.0, 0.0)),
    );
    let triangle = Mesh::from_raw(
        vec![
            Point::new(1.0, 1.0, 6.0),
            Point::new(2.0, 1.0, 6.0),
            Point::new(1.0, 2.0, 6.0),
        ],
        vec![[0, 1, 2]],
    )?
    .with_kinematics(Kinematics::with_acceleration(Vector::new(0.0, -0.01, 0.0)));
    let small_cube = Mesh::at(
        &shapes::cube(0.3),
        Point::new(0.0, 0.0, 5.0),
        Some(Rgba::rgb(0.9, 0.8, 0.8)),
    );

    Ok(vec![
        kinematic(far_cube, Vector::new(-100.0, 0.0, 0.0)),
        kinematic(cube, Vector::new(0.03, 0.0, 0.0)),
        kinematic(cuboid, Vector::zeros()),
        kinematic(pyramid, Vector::new(0.0, 0.0, 0.1)),
        triangle,
        kinematic(small_cube, Vector::zeros()),
    ])
}

fn circles() -> Result<Vec<Mesh>> {
    let translucent = || Some(Rgba::random(0.5));
    Ok(vec![
        Mesh::at(&shapes::circle(1.0, 64)?, Point::new(0.0, 0.0, 4.1), translucent()),
        Mesh::at(&shapes::circle(0.8, 12)?, Point::new(0.0, 0.0, 4.0), translucent()),
        Mesh::at(&shapes::circle(0.6, 8)?, Point::new(0.0, 0.0, 3.9), translucent()),
        Mesh::at(
            &shapes::centered_circle(0.4, 5)?,
            Point::new(0.0, 0.0, 3.8),
            translucent(),
        ),
        Mesh::at(&shapes::circle(0.2, 3)?, Point::new(0.0, 0.0, 3.7), translucent()),
    ])
}

/// Random integers that never repeat the previous draw
#[derive(Debug, Default)]
pub struct DistinctRoll {
    previous: Option<usize>,
}

impl DistinctRoll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform draw from `range`, different from the last value returned
    pub fn next(&mut self, range: RangeInclusive<usize>) -> Result<usize> {
        if range.start() >= range.end() {
            return Err(Error::invalid(format!(
                "range {range:?} has fewer than two values"
            )));
        }
        let mut rng = rand::thread_rng();
        loop {
            let value = rng.gen_range(range.clone());
            if Some(value) != self.previous {
                self.previous = Some(value);
                return Ok(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_numbers() {
        assert_eq!(DemoScene::from_number(4).unwrap(), Some(DemoScene::Circles));
        assert_eq!(DemoScene::from_number(8).unwrap(), None);
        assert!(DemoScene::from_number(0).is_err());
        assert!(DemoScene::from_number(10).is_err());
    }

    #[test]
    fn test_scene_sizes() {
        let mut roll = DistinctRoll::new();
        let sizes: Vec<usize> = [
            DemoScene::Mixed,
            DemoScene::Projectile,
            DemoScene::RandomPolygon,
            DemoScene::Circles,
            DemoScene::Approaching,
            DemoScene::Surround,
        ]
        .into_iter()
        .map(|scene| scene.build(&mut roll).unwrap().len())
        .collect();
        assert_eq!(sizes, vec![6, 1, 1, 5, 1, 6]);
    }

    #[test]
    fn test_mixed_scene_is_all_kinematic() {
        let meshes = DemoScene::Mixed.build(&mut DistinctRoll::new()).unwrap();
        assert!(meshes.iter().all(Mesh::is_kinematic));
    }

    #[test]
    fn test_circles_are_translucent() {
        let meshes = DemoScene::Circles.build(&mut DistinctRoll::new()).unwrap();
        assert!(meshes.iter().all(|m| m.color.a == 0.5));
    }

    #[test]
    fn test_roll_never_repeats() {
        let mut roll = DistinctRoll::new();
        let mut previous = roll.next(3..=4).unwrap();
        for _ in 0..50 {
            let value = roll.next(3..=4).unwrap();
            assert!((3..=4).contains(&value));
            assert_ne!(value, previous);
            previous = value;
        }
    }

    #[test]
    fn test_roll_needs_two_values() {
        assert!(DistinctRoll::new().next(3..=3).is_err());
    }
}
