use {
    std::{fmt, ops::Index, str::FromStr},
    thiserror::Error,
};

pub const FACES: usize = 6;
pub const COLORS: usize = 4;
pub const CUBES: usize = 4;

/// The four blocks on the table, faces listed in [`Face`] order.
pub const SOURCE_CUBES: [&str; CUBES] = ["bgyyyr", "bgyrry", "bgygbr", "bggryr"];

/// Position of a face as seen by someone looking at the cube.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Face {
    Front,
    Under,
    Right,
    Above,
    Left,
    Back,
}

impl Face {
    pub const ALL: [Self; FACES] = [
        Self::Front,
        Self::Under,
        Self::Right,
        Self::Above,
        Self::Left,
        Self::Back,
    ];

    /// Faces left visible by the frame.
    pub const RING: [Self; 4] = [Self::Front, Self::Under, Self::Above, Self::Back];

    pub fn index(self) -> usize {
        self as usize
    }

    // covered by the neighbouring cubes
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Right | Self::Left)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Color {
    Blue,
    Green,
    Yellow,
    Red,
}

impl Color {
    pub const ALL: [Self; COLORS] = [Self::Blue, Self::Green, Self::Yellow, Self::Red];

    pub fn symbol(self) -> char {
        match self {
            Self::Blue => 'b',
            Self::Green => 'g',
            Self::Yellow => 'y',
            Self::Red => 'r',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == symbol)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CubeError {
    #[error("A cube has exactly 6 faces but {len} were given")]
    WrongLength { len: usize },
    #[error("Invalid color {symbol:?} at face {position}, expected one of b, g, y, r")]
    InvalidColor { symbol: char, position: usize },
    #[error("The frame holds exactly 4 cubes but {count} were given")]
    WrongCount { count: usize },
}

/// Six face colors indexed by [`Face`]. Rotating a cube yields a new one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cube([Color; FACES]);

impl Cube {
    pub fn new(colors: [Color; FACES]) -> Self {
        Self(colors)
    }

    pub fn colors(&self) -> [Color; FACES] {
        self.0
    }

    pub fn with_face(mut self, face: Face, color: Color) -> Self {
        self.0[face.index()] = color;
        self
    }

    pub fn ring_colors(&self) -> [Color; 4] {
        Face::RING.map(|face| self[face])
    }
}

impl Index<Face> for Cube {
    type Output = Color;

    fn index(&self, face: Face) -> &Self::Output {
        &self.0[face.index()]
    }
}

impl FromStr for Cube {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != FACES {
            return Err(CubeError::WrongLength { len });
        }

        let mut colors = [Color::Blue; FACES];
        for (position, (slot, symbol)) in colors.iter_mut().zip(s.chars()).enumerate() {
            *slot = Color::from_symbol(symbol)
                .ok_or(CubeError::InvalidColor { symbol, position })?;
        }

        Ok(Self(colors))
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{}", c.symbol()))
    }
}

pub fn parse_cubes<S: AsRef<str>>(strs: &[S]) -> Result<[Cube; CUBES], CubeError> {
    let cubes = strs
        .iter()
        .map(|s| s.as_ref().parse())
        .collect::<Result<Vec<Cube>, _>>()?;

    cubes
        .try_into()
        .map_err(|cubes: Vec<Cube>| CubeError::WrongCount { count: cubes.len() })
}

pub fn sources() -> Result<[Cube; CUBES], CubeError> {
    parse_cubes(&SOURCE_CUBES)
}

#[test]
fn test_parse_round_trip_sources() {
    let cubes = sources().unwrap();

    for (cube, s) in cubes.iter().zip(SOURCE_CUBES) {
        assert_eq!(cube.to_string(), s);
    }

    assert_eq!(cubes[0][Face::Front], Color::Blue);
    assert_eq!(cubes[0][Face::Back], Color::Red);
    assert_eq!(cubes[3][Face::Right], Color::Green);
}

#[test]
fn test_malformed_cubes() {
    assert_eq!(
        "bgyyy".parse::<Cube>(),
        Err(CubeError::WrongLength { len: 5 })
    );
    assert_eq!(
        "bgyyyrr".parse::<Cube>(),
        Err(CubeError::WrongLength { len: 7 })
    );
    assert_eq!(
        "bgyxyr".parse::<Cube>(),
        Err(CubeError::InvalidColor {
            symbol: 'x',
            position: 3
        })
    );
    assert_eq!(
        "Bgyyyr".parse::<Cube>(),
        Err(CubeError::InvalidColor {
            symbol: 'B',
            position: 0
        })
    );
    assert_eq!(
        parse_cubes(&["bgyyyr", "bgyrry", "bgygbr"]),
        Err(CubeError::WrongCount { count: 3 })
    );
}

#[test]
fn test_ring_excludes_hidden_faces() {
    let cube: Cube = "bgyryb".parse().unwrap();

    assert_eq!(
        cube.ring_colors(),
        [Color::Blue, Color::Green, Color::Red, Color::Blue]
    );
    assert!(Face::RING.iter().all(|face| !face.is_hidden()));
    assert_eq!(Face::ALL.iter().filter(|face| face.is_hidden()).count(), 2);

    let repainted = cube.with_face(Face::Left, Color::Red);
    assert_eq!(repainted.ring_colors(), cube.ring_colors());
    assert_eq!(repainted.to_string(), "bgyrrb");
}
