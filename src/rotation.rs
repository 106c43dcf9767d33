use {
    crate::cube::{Cube, Face, FACES},
    log::debug,
    rustc_hash::FxHashSet,
    thiserror::Error,
};

/// Order of the rotation group of a cube.
pub const GROUP_ORDER: usize = 24;

/// Tips between each run of four twists. Tipping along a single axis keeps
/// revisiting the same four front faces, so the two axes alternate.
pub const TIPS: [Rotation; 6] = [
    Rotation::TIP_UP,
    Rotation::TIP_RIGHT,
    Rotation::TIP_UP,
    Rotation::TIP_RIGHT,
    Rotation::TIP_UP,
    Rotation::TIP_RIGHT,
];

/// A reorientation of a cube as a permutation of face indices: the rotated
/// view shows at face `i` the color the cube had at face `self[i]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Rotation([usize; FACES]);

impl Rotation {
    pub const IDENTITY: Self = Self([0, 1, 2, 3, 4, 5]);

    // spin about the front-back axis
    pub const TWIST: Self = Self([0, 2, 3, 4, 1, 5]);

    // under face comes to the front
    pub const TIP_UP: Self = Self([1, 5, 2, 0, 4, 3]);

    // left face comes to the front
    pub const TIP_RIGHT: Self = Self([4, 1, 0, 3, 5, 2]);

    /// This rotation followed by `motion`.
    pub fn then(&self, motion: &Self) -> Self {
        Self(motion.0.map(|i| self.0[i]))
    }

    pub fn inverse(&self) -> Self {
        let mut inverse = [0; FACES];
        for (i, &p) in self.0.iter().enumerate() {
            inverse[p] = i;
        }
        Self(inverse)
    }

    pub fn apply(&self, cube: &Cube) -> Cube {
        let colors = cube.colors();
        Cube::new(self.0.map(|i| colors[i]))
    }

    /// Face of the original cube that ends up at `face`.
    pub fn source_of(&self, face: Face) -> Face {
        Face::ALL[self.0[face.index()]]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; FACES];
        self.0
            .iter()
            .all(|&i| i < FACES && !std::mem::replace(&mut seen[i], true))
    }

    /// Whether this rotation keeps the hidden right-left axis in place, so
    /// applying it to every cube in the frame yields the same frame turned over.
    pub fn preserves_hidden_axis(&self) -> bool {
        self.source_of(Face::Right).is_hidden()
    }
}

wrapper_for!(Rotation, [usize; FACES]);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RotationGroupError {
    #[error("Expected {expected} distinct rotations but the generators produced only {distinct}")]
    NotDistinct { distinct: usize, expected: usize },
}

/// Every orientation of a cube, identity first.
#[derive(Clone, Debug)]
pub struct RotationGroup(Vec<Rotation>);

impl RotationGroup {
    /// Panics if the generators fail to produce all 24 orientations; the
    /// search is meaningless on a partial group.
    pub fn generate() -> Self {
        Self::generate_with(TIPS)
    }

    pub fn generate_with(tips: [Rotation; 6]) -> Self {
        match Self::try_generate_with(tips) {
            Ok(group) => group,
            Err(err) => panic!("rotation group is corrupt: {err}"),
        }
    }

    pub fn try_generate_with(tips: [Rotation; 6]) -> Result<Self, RotationGroupError> {
        let mut rotations = Vec::with_capacity(GROUP_ORDER);
        let mut rotation = Rotation::IDENTITY;

        for tip in tips {
            for _ in 0..4 {
                rotations.push(rotation);
                rotation = rotation.then(&Rotation::TWIST);
            }
            rotation = rotation.then(&tip);
        }

        let distinct = rotations.iter().collect::<FxHashSet<_>>().len();
        if distinct != GROUP_ORDER {
            return Err(RotationGroupError::NotDistinct {
                distinct,
                expected: GROUP_ORDER,
            });
        }

        debug!("generated {} rotations", rotations.len());

        Ok(Self(rotations))
    }

    pub fn index_of(&self, rotation: &Rotation) -> Option<usize> {
        self.0.iter().position(|r| r == rotation)
    }

    /// The eight rotations of the whole frame: quarter turns about the hidden
    /// axis, each optionally combined with swapping front and back.
    pub fn frame_symmetries(&self) -> Vec<Rotation> {
        self.0
            .iter()
            .filter(|r| r.preserves_hidden_axis())
            .copied()
            .collect()
    }
}

wrapper_for!(RotationGroup, Vec<Rotation>);

#[test]
fn test_group_is_distinct_and_valid() {
    let group = RotationGroup::generate();

    assert_eq!(group.len(), GROUP_ORDER);
    assert!(group.iter().all(Rotation::is_permutation));
    assert_eq!(group.iter().collect::<FxHashSet<_>>().len(), GROUP_ORDER);
    assert!(group[0].is_identity());
    assert_eq!(group.index_of(&Rotation::IDENTITY), Some(0));
}

#[test]
fn test_generation_order() {
    let group = RotationGroup::generate();

    assert_eq!(*group[1], [0, 2, 3, 4, 1, 5]);
    assert_eq!(*group[3], [0, 4, 1, 2, 3, 5]);
    assert_eq!(*group[4], [1, 5, 2, 0, 4, 3]);
    assert_eq!(*group[5], [1, 2, 0, 4, 5, 3]);

    // each run of four shares a front face, and every face gets a turn
    let fronts = group
        .chunks(4)
        .map(|run| {
            assert!(run.iter().all(|r| r[0] == run[0][0]));
            run[0][0]
        })
        .collect::<FxHashSet<_>>();
    assert_eq!(fronts.len(), FACES);
}

#[test]
fn test_group_closure() {
    let group = RotationGroup::generate();

    for a in group.iter() {
        assert!(group.contains(&a.inverse()));
        assert!(a.then(&a.inverse()).is_identity());

        for b in group.iter() {
            assert!(group.contains(&a.then(b)));
        }
    }
}

#[test]
fn test_apply_composes() {
    let group = RotationGroup::generate();
    let cube: Cube = "bgyrry".parse().unwrap();

    for a in group.iter() {
        for b in group.iter() {
            assert_eq!(a.then(b).apply(&cube), b.apply(&a.apply(&cube)));
        }
    }
}

#[test]
fn test_motions() {
    let cube: Cube = "bgyrry".parse().unwrap();

    // twist keeps front and back, cycles the ring
    let twisted = Rotation::TWIST.apply(&cube);
    assert_eq!(twisted[Face::Front], cube[Face::Front]);
    assert_eq!(twisted[Face::Back], cube[Face::Back]);
    assert_eq!(twisted[Face::Under], cube[Face::Right]);

    assert_eq!(Rotation::TIP_UP.source_of(Face::Front), Face::Under);
    assert_eq!(Rotation::TIP_RIGHT.source_of(Face::Front), Face::Left);

    for motion in [Rotation::TWIST, Rotation::TIP_UP, Rotation::TIP_RIGHT] {
        let mut r = motion;
        for _ in 0..3 {
            assert!(!r.is_identity());
            r = r.then(&motion);
        }
        assert!(r.is_identity());
    }
}

#[test]
fn test_single_axis_tips_fall_short() {
    assert_eq!(
        RotationGroup::try_generate_with([Rotation::TIP_UP; 6]).unwrap_err(),
        RotationGroupError::NotDistinct {
            distinct: 16,
            expected: GROUP_ORDER
        }
    );
    assert!(RotationGroup::try_generate_with([Rotation::TIP_RIGHT; 6]).is_err());
}

#[test]
#[should_panic(expected = "rotation group is corrupt")]
fn test_corrupt_group_is_fatal() {
    RotationGroup::generate_with([Rotation::TIP_RIGHT; 6]);
}

#[test]
fn test_frame_symmetries() {
    let group = RotationGroup::generate();
    let symmetries = group.frame_symmetries();

    assert_eq!(symmetries.len(), 8);
    assert!(symmetries[0].is_identity());

    for a in &symmetries {
        assert!(a.source_of(Face::Left).is_hidden());
        for b in &symmetries {
            assert!(symmetries.contains(&a.then(b)));
        }
    }
}
