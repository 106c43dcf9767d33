use {
    crate::{
        cube::{Color, Cube, Face, COLORS, CUBES},
        rotation::{Rotation, RotationGroup},
    },
    log::{debug, info, trace},
    ndarray::Array2,
    rayon::prelude::*,
    std::{
        fmt,
        sync::atomic::{AtomicUsize, Ordering},
    },
};

/// `[cube][rotation]` to the rotated view; every column is the same rotation.
pub type ViewTable = Array2<Cube>;

pub fn view_table(cubes: &[Cube; CUBES], group: &RotationGroup) -> ViewTable {
    let table = Array2::from_shape_fn((CUBES, group.len()), |(c, r)| group[r].apply(&cubes[c]));
    debug!("built {:?} view table", table.dim());
    table
}

/// Colors already shown on each visible side of the frame.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Rings {
    front: heapless::Vec<Color, CUBES>,
    under: heapless::Vec<Color, CUBES>,
    above: heapless::Vec<Color, CUBES>,
    back: heapless::Vec<Color, CUBES>,
}

impl Rings {
    pub fn accepts(&self, view: &Cube) -> bool {
        !(self.front.contains(&view[Face::Front])
            || self.under.contains(&view[Face::Under])
            || self.back.contains(&view[Face::Back])
            || self.above.contains(&view[Face::Above]))
    }

    pub fn extended(&self, view: &Cube) -> Option<Self> {
        if !self.accepts(view) {
            return None;
        }

        let mut next = self.clone();
        next.front.push(view[Face::Front]).ok()?;
        next.under.push(view[Face::Under]).ok()?;
        next.above.push(view[Face::Above]).ok()?;
        next.back.push(view[Face::Back]).ok()?;
        Some(next)
    }

    pub fn ring(&self, face: Face) -> Option<&[Color]> {
        match face {
            Face::Front => Some(self.front.as_slice()),
            Face::Under => Some(self.under.as_slice()),
            Face::Above => Some(self.above.as_slice()),
            Face::Back => Some(self.back.as_slice()),
            Face::Right | Face::Left => None,
        }
    }

    pub fn placed(&self) -> usize {
        self.front.len()
    }

    /// Every ring shows each color exactly once.
    pub fn is_complete(&self) -> bool {
        [&self.front, &self.under, &self.above, &self.back]
            .into_iter()
            .all(|ring| ring.len() == COLORS && Color::ALL.iter().all(|c| ring.contains(c)))
    }
}

impl fmt::Display for Rings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, face) in Face::RING.into_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{face:?}=")?;
            for c in self.ring(face).unwrap_or_default() {
                write!(f, "{}", c.symbol())?;
            }
        }
        Ok(())
    }
}

/// Views chosen for the first few cubes, with the rings they fill.
#[derive(Clone, Default, Debug)]
pub struct PartialAssignment {
    views: heapless::Vec<Cube, CUBES>,
    rings: Rings,
}

impl PartialAssignment {
    pub fn extended(&self, view: &Cube) -> Option<Self> {
        let rings = self.rings.extended(view)?;
        let mut views = self.views.clone();
        views.push(*view).ok()?;
        Some(Self { views, rings })
    }

    pub fn views(&self) -> &[Cube] {
        &self.views
    }

    pub fn rings(&self) -> &Rings {
        &self.rings
    }
}

/// One view per source cube, in source order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Solution([Cube; CUBES]);

impl Solution {
    pub fn views(&self) -> &[Cube; CUBES] {
        &self.0
    }

    pub fn rings(&self) -> Option<Rings> {
        self.0
            .iter()
            .try_fold(Rings::default(), |rings, view| rings.extended(view))
    }

    /// The same arrangement with every cube turned by `rotation`.
    pub fn transformed(&self, rotation: &Rotation) -> Self {
        Self(self.0.map(|view| rotation.apply(&view)))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, view) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{view}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Solutions {
    solutions: Vec<Solution>,
    nodes: usize,
}

impl Solutions {
    /// Candidate views examined during the search.
    pub fn nodes(&self) -> usize {
        self.nodes
    }
}

// carries the node count alongside, so no `wrapper_for!`
impl std::ops::Deref for Solutions {
    type Target = [Solution];

    fn deref(&self) -> &Self::Target {
        &self.solutions
    }
}

pub struct Solver {
    cubes: [Cube; CUBES],
    table: ViewTable,
}

impl Solver {
    pub fn new(cubes: [Cube; CUBES], group: &RotationGroup) -> Self {
        let table = view_table(&cubes, group);
        Self { cubes, table }
    }

    pub fn cubes(&self) -> &[Cube; CUBES] {
        &self.cubes
    }

    pub fn table(&self) -> &ViewTable {
        &self.table
    }

    pub fn solve(&self) -> Solutions {
        let now = std::time::Instant::now();
        let solutions = search(&self.table);
        log_summary(&solutions, now.elapsed());
        solutions
    }

    /// Same result as [`Solver::solve`], with the first cube's rotations
    /// explored on the rayon pool.
    pub fn solve_par(&self) -> Solutions {
        let now = std::time::Instant::now();
        let solutions = search_par(&self.table);
        log_summary(&solutions, now.elapsed());
        solutions
    }
}

fn log_summary(solutions: &Solutions, elapsed: std::time::Duration) {
    info!(
        "found {} solutions visiting {} nodes in {:?}",
        solutions.len(),
        solutions.nodes(),
        elapsed
    );
}

pub(crate) fn search(table: &ViewTable) -> Solutions {
    assert_eq!(table.nrows(), CUBES, "view table must hold one row per cube");

    let nodes = AtomicUsize::new(0);
    let mut solutions = Vec::new();

    recurse(table, 0, &PartialAssignment::default(), &nodes, &mut solutions);

    Solutions {
        solutions,
        nodes: nodes.into_inner(),
    }
}

pub(crate) fn search_par(table: &ViewTable) -> Solutions {
    assert_eq!(table.nrows(), CUBES, "view table must hold one row per cube");

    let nodes = AtomicUsize::new(0);
    let base = PartialAssignment::default();

    // indexed collect keeps branches in rotation order
    let branches: Vec<Vec<Solution>> = (0..table.ncols())
        .into_par_iter()
        .map(|r| {
            let mut out = Vec::new();
            place(table, 0, &table[[0, r]], &base, &nodes, &mut out);
            out
        })
        .collect();

    Solutions {
        solutions: branches.into_iter().flatten().collect(),
        nodes: nodes.into_inner(),
    }
}

fn recurse(
    table: &ViewTable,
    cube: usize,
    partial: &PartialAssignment,
    nodes: &AtomicUsize,
    out: &mut Vec<Solution>,
) {
    for view in table.row(cube) {
        place(table, cube, view, partial, nodes, out);
    }
}

fn place(
    table: &ViewTable,
    cube: usize,
    view: &Cube,
    partial: &PartialAssignment,
    nodes: &AtomicUsize,
    out: &mut Vec<Solution>,
) {
    let visited = nodes.fetch_add(1, Ordering::Relaxed) + 1;
    if visited % 1000 == 0 {
        trace!("visited {visited} nodes");
    }

    let Some(partial) = partial.extended(view) else {
        return;
    };

    if cube + 1 < table.nrows() {
        recurse(table, cube + 1, &partial, nodes, out);
    } else if let Ok(views) = <[Cube; CUBES]>::try_from(partial.views()) {
        debug!("solution {}: {}", Solution(views), partial.rings());
        out.push(Solution(views));
    }
}

#[cfg(test)]
fn known_solver() -> Solver {
    Solver::new(crate::cube::sources().unwrap(), &RotationGroup::generate())
}

#[test]
fn test_view_table() {
    let solver = known_solver();
    let table = solver.table();

    assert_eq!(table.dim(), (CUBES, 24));

    for (c, cube) in solver.cubes().iter().enumerate() {
        // identity comes first
        assert_eq!(table[[c, 0]], *cube);

        let mut original = cube.colors();
        original.sort();
        for view in table.row(c) {
            let mut colors = view.colors();
            colors.sort();
            assert_eq!(colors, original);
        }
    }
}

#[test]
fn test_rings_reject_repeats() {
    let a: Cube = "bgyryb".parse().unwrap();
    let b: Cube = "gbyyrr".parse().unwrap();
    let other: Cube = "rrbbgg".parse().unwrap();

    let rings = Rings::default().extended(&a).unwrap();
    assert_eq!(rings.placed(), 1);

    // same under color as `a`
    assert!(rings.extended(&"ygbbbr".parse().unwrap()).is_none());
    // same back color as `a` on its back face
    assert!(rings.extended(&"ryrgrb".parse().unwrap()).is_none());

    let rings = rings.extended(&b).unwrap();
    assert_eq!(rings.ring(Face::Front), Some(&[Color::Blue, Color::Green][..]));
    assert_eq!(rings.ring(Face::Right), None);
    assert!(!rings.is_complete());

    // right and left never matter
    assert!(rings.accepts(&other.with_face(Face::Right, Color::Blue)));
}

#[cfg(test)]
#[test_log::test]
fn test_known_instance() {
    let solutions = known_solver().solve();

    assert_eq!(solutions.len(), 8);
    assert_eq!(solutions.len() % 8, 0);
    assert_eq!(solutions.nodes(), 8280);

    assert_eq!(
        solutions[0].to_string(),
        "bgyyyr, ryrbyg, ybgrgb, grbgry"
    );
    assert_eq!(
        solutions[7].to_string(),
        "ybyryg, brrgyy, rygbgb, ggbyrr"
    );

    for solution in solutions.iter() {
        let rings = solution.rings().unwrap();
        assert_eq!(rings.placed(), CUBES);
        assert!(rings.is_complete());
    }
}

#[cfg(test)]
#[test_log::test]
fn test_search_is_deterministic() {
    let solver = known_solver();

    assert_eq!(solver.solve(), solver.solve());
    assert_eq!(solver.solve(), known_solver().solve());
}

#[cfg(test)]
#[test_log::test]
fn test_parallel_matches_sequential() {
    let solver = known_solver();

    assert_eq!(solver.solve_par(), solver.solve());
}

#[test]
fn test_solutions_use_their_own_cube() {
    let solver = known_solver();
    let group = RotationGroup::generate();

    for solution in solver.solve().iter() {
        for (c, view) in solution.views().iter().enumerate() {
            assert!(group
                .iter()
                .any(|r| r.apply(&solver.cubes()[c]) == *view));
        }
    }
}

#[test]
fn test_hidden_faces_are_ignored() {
    use rand::seq::SliceRandom;

    let mut rng = rand::thread_rng();
    let solver = known_solver();
    let expected = solver.solve();

    for _ in 0..20 {
        let repainted = solver.table().map(|view| {
            [Face::Right, Face::Left].into_iter().fold(*view, |view, face| {
                view.with_face(face, *Color::ALL.choose(&mut rng).unwrap())
            })
        });

        let solutions = search(&repainted);
        assert_eq!(solutions.len(), expected.len());
        assert_eq!(solutions.nodes(), expected.nodes());

        for (a, b) in solutions.iter().zip(expected.iter()) {
            assert_eq!(a.rings(), b.rings());
        }
    }
}

#[test]
fn test_unsolvable_cubes() {
    // two all-blue cubes always clash
    let cubes = crate::cube::parse_cubes(&["bbbbbb", "bbbbbb", "bgyrry", "bgygbr"]).unwrap();
    let solutions = Solver::new(cubes, &RotationGroup::generate()).solve();

    assert!(solutions.is_empty());
    assert!(solutions.nodes() > 0);
}

#[test]
fn test_accumulators_never_repeat() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let solver = known_solver();
    let table = solver.table();

    for _ in 0..1000 {
        let mut partial = PartialAssignment::default();

        for cube in 0..CUBES {
            let view = &table[[cube, rng.gen_range(0..table.ncols())]];
            let Some(next) = partial.extended(view) else {
                assert!(!partial.rings().accepts(view));
                break;
            };
            partial = next;

            assert_eq!(partial.views().len(), cube + 1);
            assert_eq!(partial.rings().placed(), cube + 1);
            for face in Face::RING {
                let ring = partial.rings().ring(face).unwrap();
                assert_eq!(ring.len(), cube + 1);
                assert!(ring
                    .iter()
                    .enumerate()
                    .all(|(i, c)| !ring[i + 1..].contains(c)));
            }
        }

        if partial.views().len() == CUBES {
            assert!(partial.rings().is_complete());
        }
    }
}

#[test]
#[should_panic(expected = "one row per cube")]
fn test_search_rejects_short_table() {
    let table = known_solver().table().slice(ndarray::s![..2, ..]).to_owned();
    search(&table);
}
